// Tokenization order and boundary rules: popping the stack must walk the
// document left to right, with comments excised and groups/newlines isolated.

use stencil::chunker::chunk;
use stencil::text::Text;

fn chunks(source: &str) -> Vec<String> {
    let mut stack = chunk(&Text::from(source));
    let mut out = Vec::new();
    while let Some(c) = stack.pop() {
        out.push(c.to_string());
    }
    out
}

#[test]
fn literal_run_is_one_chunk() {
    assert_eq!(chunks("hello world"), vec!["hello world"]);
}

#[test]
fn newlines_outside_braces_are_isolated() {
    assert_eq!(chunks("a\nb\n"), vec!["a", "\n", "b", "\n"]);
}

#[test]
fn balanced_group_is_one_chunk_braces_included() {
    assert_eq!(chunks("{a{b}c}"), vec!["{a{b}c}"]);
    assert_eq!(chunks("x{y}z"), vec!["x", "{y}", "z"]);
}

#[test]
fn newline_inside_a_group_stays_in_the_chunk() {
    assert_eq!(chunks("{a\nb}"), vec!["{a\nb}"]);
}

#[test]
fn escape_outside_braces_starts_a_fresh_chunk() {
    assert_eq!(chunks(r"ab\foo"), vec!["ab", r"\foo"]);
}

#[test]
fn escaped_special_bytes_stay_inside_the_chunk() {
    assert_eq!(chunks(r"a\{b"), vec![r"a\{b"]);
    assert_eq!(chunks(r"a\%b"), vec![r"a\%b"]);
    assert_eq!(chunks(r"\\"), vec![r"\\"]);
}

#[test]
fn trailing_escape_becomes_its_own_chunk() {
    assert_eq!(chunks("ab\\"), vec!["ab", "\\"]);
}

#[test]
fn comment_eats_rest_of_line_and_leading_whitespace() {
    assert_eq!(chunks("text %comment\n   next"), vec!["text ", "next"]);
}

#[test]
fn consecutive_comment_blocks_collapse() {
    assert_eq!(chunks("a %one\n%two\nb"), vec!["a ", "b"]);
}

#[test]
fn comment_at_start_of_input_is_skipped() {
    assert_eq!(chunks("%c\nafter"), vec!["after"]);
}

#[test]
fn comment_inside_a_group_is_excised_from_the_chunk() {
    assert_eq!(chunks("{a %c\n b}"), vec!["{a b}"]);
}

#[test]
fn unbalanced_closer_flows_through_as_literal_text() {
    assert_eq!(chunks("}{"), vec!["}{"]);
}

#[test]
fn concatenating_chunks_reproduces_comment_free_input() {
    for source in ["plain text", "a\nb{c}d\n", r"x\{y\}z", r"one \two{three}"] {
        assert_eq!(chunks(source).concat(), source, "{source}");
    }
}
