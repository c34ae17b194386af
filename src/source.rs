//! Input acquisition: whole files and standard input, read fully into memory.
//!
//! Contents are raw bytes — no encoding negotiation, no header handling. Any
//! unreadable input is a fatal [`StencilError::FileError`] naming the path.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::diagnostics::StencilError;
use crate::text::Text;

/// Reads all of standard input into one buffer.
pub fn read_stdin() -> Result<Text, StencilError> {
    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .map_err(|source| StencilError::FileError {
            path: "<stdin>".into(),
            source,
        })?;
    Ok(Text::from_bytes(buffer))
}

/// Reads one file fully.
pub fn read_file(path: &Path) -> Result<Text, StencilError> {
    fs::read(path)
        .map(Text::from_bytes)
        .map_err(|source| StencilError::FileError {
            path: path.display().to_string(),
            source,
        })
}

/// Reads a file whose path arrived as document bytes (an `\include` target).
pub fn read_file_text(path: &Text) -> Result<Text, StencilError> {
    let path = path.to_lossy().into_owned();
    read_file(Path::new(&path))
}

/// Reads the whole input document: standard input when no paths are given,
/// otherwise every named file concatenated in argument order.
pub fn read_input(paths: &[PathBuf]) -> Result<Text, StencilError> {
    if paths.is_empty() {
        return read_stdin();
    }
    let mut document = Text::new();
    for path in paths {
        document.append(&read_file(path)?);
    }
    Ok(document)
}
