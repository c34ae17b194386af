//! The chunker: turns a byte document into an ordered sequence of chunks.
//!
//! Chunks are pushed onto a [`WorkStack`] such that popping the stack walks
//! the document left to right. Four things shape chunk boundaries:
//!
//! - comments are excised, together with the rest of their line and all
//!   leading whitespace on the following line(s);
//! - a balanced brace group, braces included, is a single chunk;
//! - a newline outside braces is isolated into its own one-byte chunk;
//! - an escape outside braces begins a fresh chunk (the start of a macro
//!   invocation), unless it pairs with a special byte, in which case the pair
//!   stays inside the current chunk as one literal unit.
//!
//! Concatenating the chunks in pop order reproduces the input minus comments.

use crate::syntax::{is_space, is_special, BRACE_CLOSE, BRACE_OPEN, COMMENT, ESCAPE, NEWLINE};
use crate::text::{Text, WorkStack};

/// Tokenizes `input` and pushes its chunks onto `stack` in reverse, so the
/// first chunk of the document ends up on top.
///
/// The expander calls this against its own input stack to re-tokenize
/// generated text: branch bodies, included files, substituted templates.
pub fn chunk_into(input: &Text, stack: &mut WorkStack) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut chunks: Vec<Text> = Vec::new();

    // Scanning state: signed brace depth (unbalanced closers flow through as
    // literal text rather than aborting), pending-chunk length, and at most
    // one excised comment extent per pending chunk.
    let mut depth: i32 = 0;
    let mut chunk_len: usize = 0;
    let mut comment_start: usize = 0;
    let mut comment_len: usize = 0;

    let mut i = 0;
    while i < len {
        match bytes[i] {
            COMMENT => {
                if chunk_len > 0 && comment_len == 0 && depth == 0 {
                    chunks.push(cut(bytes, i - chunk_len, 0, 0, chunk_len));
                    chunk_len = 0;
                }

                let start = i;
                loop {
                    while i < len && bytes[i] != NEWLINE {
                        i += 1;
                    }
                    if i < len {
                        i += 1; // the newline belongs to the comment
                    }
                    while i < len && is_space(bytes[i]) {
                        i += 1;
                    }
                    // Consecutive comment blocks collapse into one region.
                    if !(i < len && bytes[i] == COMMENT) {
                        break;
                    }
                }

                comment_start = start;
                comment_len = i - start;
                if depth == 0 {
                    // Outside braces the pending chunk was already flushed,
                    // so the region is simply skipped, not excised.
                    comment_len = 0;
                }
                continue; // `i` already sits on the first preserved byte
            }

            BRACE_OPEN => {
                if depth == 0 && chunk_len > 0 {
                    chunks.push(cut(
                        bytes,
                        i - chunk_len - comment_len,
                        comment_start,
                        comment_start + comment_len,
                        chunk_len,
                    ));
                    chunk_len = 0;
                    comment_len = 0;
                    comment_start = 0;
                }
                chunk_len += 1;
                depth += 1;
            }

            BRACE_CLOSE => {
                chunk_len += 1;
                depth -= 1;
                if depth == 0 {
                    // The whole balanced group, braces included, is one chunk.
                    chunks.push(cut(
                        bytes,
                        i + 1 - chunk_len - comment_len,
                        comment_start,
                        comment_start + comment_len,
                        chunk_len,
                    ));
                    chunk_len = 0;
                    comment_len = 0;
                    comment_start = 0;
                }
            }

            NEWLINE => {
                if depth != 0 {
                    chunk_len += 1;
                } else {
                    if chunk_len > 0 {
                        chunks.push(cut(
                            bytes,
                            i - chunk_len - comment_len,
                            comment_start,
                            comment_start + comment_len,
                            chunk_len,
                        ));
                        chunk_len = 0;
                        comment_len = 0;
                        comment_start = 0;
                    }
                    chunks.push(Text::from_byte(NEWLINE));
                }
            }

            ESCAPE => {
                if i + 1 < len && is_special(bytes[i + 1]) {
                    // One literal unit; the second byte is never re-read, so
                    // an escaped brace does not touch the depth counter.
                    chunk_len += 2;
                    i += 2;
                    continue;
                }
                if chunk_len > 0 && depth == 0 {
                    chunks.push(cut(
                        bytes,
                        i - chunk_len - comment_len,
                        comment_start,
                        comment_start + comment_len,
                        chunk_len,
                    ));
                    chunk_len = 0;
                    comment_len = 0;
                    comment_start = 0;
                }
                chunk_len += 1;
            }

            _ => {
                chunk_len += 1;
            }
        }
        i += 1;
    }

    if chunk_len > 0 {
        chunks.push(cut(
            bytes,
            len - chunk_len - comment_len,
            comment_start,
            comment_start + comment_len,
            chunk_len,
        ));
    }

    for chunk in chunks.into_iter().rev() {
        stack.push(chunk);
    }
}

/// Convenience wrapper returning a fresh stack whose pop order is document
/// order.
pub fn chunk(input: &Text) -> WorkStack {
    let mut stack = WorkStack::new();
    chunk_into(input, &mut stack);
    stack
}

/// Copies `want` chunk bytes starting at `from`, skipping the half-open
/// comment extent `[comment_start, comment_end)` when one is recorded.
fn cut(bytes: &[u8], from: usize, comment_start: usize, comment_end: usize, want: usize) -> Text {
    let mut data = Vec::with_capacity(want);
    let mut remaining = want;

    if comment_start != comment_end {
        let mut i = from;
        while i < comment_start && i < bytes.len() && remaining > 0 {
            data.push(bytes[i]);
            i += 1;
            remaining -= 1;
        }
        let mut j = comment_end;
        while remaining > 0 && j < bytes.len() {
            data.push(bytes[j]);
            j += 1;
            remaining -= 1;
        }
    } else {
        let end = (from + remaining).min(bytes.len());
        data.extend_from_slice(&bytes[from..end]);
    }

    Text::from_bytes(data)
}
