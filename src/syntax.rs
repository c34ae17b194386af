//! Byte-level character classes and argument-shape predicates shared by the
//! chunker and the expander.
//!
//! The document format is byte oriented: the classes below are exact byte
//! comparisons, never Unicode-aware. Two classes matter during escaping:
//! *special* bytes are the ones the tokenizer itself interprets, *preserved*
//! bytes keep their backslash all the way into the final output.

/// Introduces a macro invocation, or escapes the byte after it.
pub const ESCAPE: u8 = b'\\';
/// Marks the argument substitution point inside a macro value.
pub const PLACEHOLDER: u8 = b'#';
/// Outside brace groups, a newline is isolated into its own chunk.
pub const NEWLINE: u8 = b'\n';
pub const BRACE_OPEN: u8 = b'{';
pub const BRACE_CLOSE: u8 = b'}';
/// Starts a comment running to the end of the line.
pub const COMMENT: u8 = b'%';

/// Bytes with syntactic meaning to the tokenizer.
pub fn is_special(byte: u8) -> bool {
    matches!(
        byte,
        ESCAPE | PLACEHOLDER | BRACE_OPEN | BRACE_CLOSE | COMMENT
    )
}

/// Bytes whose backslash escape survives the final collapse.
pub fn is_preserved(byte: u8) -> bool {
    matches!(
        byte,
        b'[' | b']' | b'(' | b')' | b'+' | b'-' | b'*' | b'/' | b'='
    )
}

/// Whitespace as the comment skipper sees it (ASCII, including vertical tab).
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

/// A well-formed brace argument: opens with `{`, closes with `}`, and every
/// unescaped brace in between balances without the depth ever going negative.
///
/// Escaping is judged by a single byte of lookbehind, matching the tokenizer:
/// a brace directly preceded by a backslash does not count toward nesting.
pub fn is_valid_arg(bytes: &[u8]) -> bool {
    let len = bytes.len();
    if len < 2 || bytes[0] != BRACE_OPEN || bytes[len - 1] != BRACE_CLOSE {
        return false;
    }

    let mut depth: i32 = 0;
    for i in 1..len - 1 {
        if bytes[i] == BRACE_OPEN && bytes[i - 1] != ESCAPE {
            depth += 1;
        } else if bytes[i] == BRACE_CLOSE && bytes[i - 1] != ESCAPE {
            depth -= 1;
        }
        if depth < 0 {
            return false;
        }
    }

    depth == 0
}

/// A brace argument acceptable as a new macro name: non-empty interior.
pub fn is_valid_def_arg(bytes: &[u8]) -> bool {
    bytes.len() > 2 && is_valid_arg(bytes)
}

/// Whether the interior of a brace argument is ASCII alphanumeric throughout.
pub fn arg_is_alnum(bytes: &[u8]) -> bool {
    if bytes.len() < 2 {
        return true;
    }
    bytes[1..bytes.len() - 1]
        .iter()
        .all(|b| b.is_ascii_alphanumeric())
}
