// Escape-collapse contracts at the pipeline level: what survives to the
// output, and the idempotence of the finished form.

use stencil::escape::{collapse_final, collapse_intermediate};
use stencil::expand_str;
use stencil::text::Text;

#[test]
fn finished_output_is_a_fixed_point_of_the_intermediate_collapse() {
    // Once the final collapse has run, the only escapes left sit before
    // preserved bytes (or dangle at the very end); the intermediate pass
    // keeps both, so re-collapsing changes nothing.
    for source in [
        "plain text\n",
        r"\{group\} and \% and \#",
        r"math \(a\) \[b\] \= stays escaped",
        r"\def{m}{value #}\m{arg}",
        "tail\\",
    ] {
        let finished = expand_str(source).unwrap();
        let text = Text::from(finished.as_str());
        assert_eq!(
            collapse_intermediate(&text),
            text,
            "not a fixed point for {source:?}"
        );
    }
}

#[test]
fn final_collapse_strips_special_escapes_only_once() {
    let once = collapse_final(&Text::from(r"\{a\}"));
    assert_eq!(once, Text::from("{a}"));
    // A second application finds no pairs left to strip.
    assert_eq!(collapse_final(&once), once);
}

#[test]
fn preserved_escapes_outlive_both_collapses() {
    let text = Text::from(r"\(x\) \[y\] \+ \- \* \/ \=");
    assert_eq!(collapse_intermediate(&text), text);
    assert_eq!(collapse_final(&text), text);
}
