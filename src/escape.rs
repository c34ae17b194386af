//! Backslash-escape collapsing.
//!
//! Two single-pass transforms share one routine and differ only in whether
//! escapes of special bytes are also stripped. The intermediate collapse runs
//! on literal chunks during expansion and must keep special-byte escapes
//! intact, since the chunk may still be concatenated and re-tokenized. The
//! final collapse runs once over the fully assembled output and strips every
//! escape except those of preserved bytes.

use crate::syntax::{is_preserved, is_special, ESCAPE};
use crate::text::Text;

fn collapse(input: &Text, strip_special: bool) -> Text {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == ESCAPE && i + 1 < bytes.len() {
            let next = bytes[i + 1];
            if !is_preserved(next) && (strip_special || !is_special(next)) {
                out.push(next);
                i += 2;
                continue;
            }
        }
        // A kept backslash does not shield the byte after it: that byte is
        // re-examined on the next iteration, so `\\a` still collapses its
        // second pair under the intermediate rules.
        out.push(bytes[i]);
        i += 1;
    }

    Text::from_bytes(out)
}

/// Intermediate collapse: strips a backslash only when the byte after it is
/// neither special nor preserved.
pub fn collapse_intermediate(input: &Text) -> Text {
    collapse(input, false)
}

/// Final collapse: strips a backslash whenever the byte after it is not
/// preserved. Applied exactly once, to the assembled output, right before
/// emission.
pub fn collapse_final(input: &Text) -> Text {
    collapse(input, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intermediate(s: &str) -> String {
        collapse_intermediate(&Text::from(s)).to_string()
    }

    fn fin(s: &str) -> String {
        collapse_final(&Text::from(s)).to_string()
    }

    #[test]
    fn intermediate_keeps_special_and_preserved_pairs() {
        assert_eq!(intermediate(r"\{x\}"), r"\{x\}");
        assert_eq!(intermediate(r"\%"), r"\%");
        assert_eq!(intermediate(r"\("), r"\(");
        assert_eq!(intermediate(r"\="), r"\=");
    }

    #[test]
    fn intermediate_strips_plain_pairs() {
        assert_eq!(intermediate(r"\a"), "a");
        assert_eq!(intermediate(r"a\bc"), "abc");
    }

    #[test]
    fn final_strips_special_but_not_preserved() {
        assert_eq!(fin(r"\{x\}"), "{x}");
        assert_eq!(fin(r"\%"), "%");
        assert_eq!(fin(r"\("), r"\(");
        assert_eq!(fin(r"\a"), "a");
    }

    #[test]
    fn trailing_backslash_is_kept() {
        assert_eq!(intermediate(r"x\"), r"x\");
        assert_eq!(fin(r"x\"), r"x\");
    }

    #[test]
    fn doubled_backslash_shields_nothing() {
        // The kept first backslash leaves the second to pair with `a`.
        assert_eq!(intermediate(r"\\a"), r"\a");
        assert_eq!(fin(r"\\a"), r"\a");
    }

    #[test]
    fn final_collapse_is_idempotent_under_intermediate() {
        // Once the final collapse has run, the only remaining escapes sit
        // before preserved bytes, which the intermediate pass also keeps.
        for source in [r"a\b\{c\}\(d\)", r"\%x\=y", r"plain", r"tail\"] {
            let finished = collapse_final(&Text::from(source));
            assert_eq!(collapse_intermediate(&finished), finished);
        }
    }
}
