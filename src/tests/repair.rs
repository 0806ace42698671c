use super::*;
use pretty_assertions::assert_eq;

#[test]
fn documented_examples() {
    repaired("<div>", "&lt;div&gt;");
    repaired("<div>ok</div>", "<div>ok</div>");
}

#[test]
fn mixed_content() {
    repaired(
        "<p>One</p><p>Two<br>\n<em>three</em>",
        "<p>One</p>&lt;p&gt;Two<br>\n<em>three</em>",
    );
    repaired(
        "<span title=\"a > b\">x",
        "&lt;span title=\"a > b\"&gt;x",
    );
}

#[test]
fn every_unclosed_opener_is_encoded() {
    repaired("<b><i>x", "&lt;b&gt;&lt;i&gt;x");
    repaired("<a><a></a>", "&lt;a&gt;<a></a>");
}

#[test]
fn stray_closers_and_brackets() {
    repaired("</div>", "</div>");
    repaired("a < b </b> c", "a < b </b> c");
    repaired("<<<<", "<<<<");
    repaired("<!-- <x> -->", "<!-- &lt;x&gt; -->");
}

#[test]
fn raw_text_survives() {
    repaired(
        "<script>if (a<b) {}</script><div>",
        "<script>if (a<b) {}</script>&lt;div&gt;",
    );
}

#[test]
fn output_keeps_untouched_text() {
    for input in ["<div>", "x < y", "<p><p><p>", "</a><b>", "<a b=c>"] {
        let output = encode_invalid_tags(input).unwrap();
        assert!(output.len() >= input.len(), "{:?} -> {:?}", input, output);
    }
}

#[test]
fn malformed_attributes_are_errors() {
    assert_eq!(
        encode_invalid_tags("<p>ok</p><a href=\"x>y"),
        Err(ParseError::MalformedAttribute { offset: 12 })
    );
}
