//! The one-call expansion pipeline: tokenize, expand, assemble, collapse.
//!
//! Expansion completes in full before any output exists — there is no
//! streaming. The output stack accumulates in reverse document order, so it
//! is flipped once, concatenated, and the final escape collapse runs exactly
//! once over the assembled buffer.

use crate::diagnostics::StencilError;
use crate::escape;
use crate::macros::MacroTable;
use crate::text::{Text, WorkStack};
use crate::{chunker, expander};

/// Expands `input` against `table` and returns the finished output bytes.
/// The table keeps any definitions the document made, so callers can thread
/// one table through several documents.
pub fn expand_document(input: &Text, table: &mut MacroTable) -> Result<Text, StencilError> {
    let mut chunks = WorkStack::new();
    chunker::chunk_into(input, &mut chunks);

    let mut expanded = WorkStack::new();
    expander::process(&mut chunks, table, &mut expanded)?;

    let assembled = expanded.flip().concat();
    Ok(escape::collapse_final(&assembled))
}

/// Convenience wrapper over a fresh table, for tests and embedding. The
/// result is a lossy UTF-8 view of the output bytes.
pub fn expand_str(source: &str) -> Result<String, StencilError> {
    let mut table = MacroTable::new();
    let output = expand_document(&Text::from(source), &mut table)?;
    Ok(output.to_lossy().into_owned())
}
