use super::*;
use pretty_assertions::assert_eq;

#[test]
fn append_and_prepend() {
    compare(&append_to_tag("<ul></ul>", "<li>x</li>", None).unwrap(), "<ul><li>x</li></ul>");
    compare(
        &prepend_to_tag("<ul><li>b</li></ul>", "<li>a</li>", None).unwrap(),
        "<ul><li>a</li><li>b</li></ul>",
    );
    compare(
        &append_to_tag("<p class=\"x\">Hi</P>", " there", None).unwrap(),
        "<p class=\"x\">Hi there</P>",
    );
}

#[test]
fn keep_existing_child() {
    let tag = "<ul><li>a</li><li>b</li></ul>";
    compare(&append_to_tag(tag, "<li>c</li>", Some(IfExists::Keep)).unwrap(), tag);
    compare(&prepend_to_tag(tag, "<li>c</li>", Some(IfExists::Keep)).unwrap(), tag);
}

#[test]
fn replace_existing_child() {
    let tag = "<ul><li>a</li><li>b</li></ul>";
    compare(
        &append_to_tag(tag, "<li>c</li>", Some(IfExists::Replace)).unwrap(),
        "<ul><li>c</li><li>b</li></ul>",
    );
}

#[test]
fn policy_without_a_matching_child() {
    compare(
        &append_to_tag("<div><p>x</p></div>", "<span>y</span>", Some(IfExists::Keep)).unwrap(),
        "<div><p>x</p><span>y</span></div>",
    );
    // Only direct children count.
    compare(
        &prepend_to_tag("<div><p><b>x</b></p></div>", "<b>y</b>", Some(IfExists::Replace)).unwrap(),
        "<div><b>y</b><p><b>x</b></p></div>",
    );
}

#[test]
fn void_tags_reject_content() {
    assert_eq!(
        append_to_tag("<img src=\"a.png\">", "<b>x</b>", None),
        Err(MutationError::NotAContainer {
            tag_type: "img".to_string()
        })
    );
    assert_eq!(
        prepend_to_tag("<span/>", "x", None).unwrap_err().to_string(),
        "<span> can't have children"
    );
}

#[test]
fn broken_tags_are_reported() {
    assert!(matches!(
        append_to_tag("<div>", "x", None),
        Err(MutationError::Parse(ParseError::UnterminatedTag { .. }))
    ));
    assert_eq!(
        append_to_tag("plain", "x", None),
        Err(MutationError::Parse(ParseError::NoTagFound))
    );
}

#[test]
fn modify_merges_classes_and_groups() {
    compare(
        &modify_tag_attributes(
            "<div class=\"a b\" data-x=\"1\" title=\"t\">body <b>text</b></div>",
            attrs! {
                "class" => "b c",
                "data-y" => "2",
                "title" => false,
                "id" => "main",
            },
        )
        .unwrap(),
        "<div id=\"main\" class=\"a b c\" data-x=\"1\" data-y=\"2\">body <b>text</b></div>",
    );
}

#[test]
fn modify_removes_classes() {
    compare(
        &modify_tag_attributes(
            "<button class=\"btn active\" disabled>Go</button>",
            attrs! { "removeClass" => "active", "disabled" => false },
        )
        .unwrap(),
        "<button class=\"btn\">Go</button>",
    );
}

#[test]
fn modify_merges_styles() {
    compare(
        &modify_tag_attributes(
            "<p style=\"color: red; margin: 0\">x</p>",
            attrs! { "style" => "color: blue; padding: 1px" },
        )
        .unwrap(),
        "<p style=\"color: blue; margin: 0; padding: 1px;\">x</p>",
    );
}

#[test]
fn modify_void_and_self_closing() {
    compare(
        &modify_tag_attributes("<input type=text>", attrs! { "required" => true }).unwrap(),
        "<input type=\"text\" required>",
    );
    compare(
        &modify_tag_attributes("<br/>", attrs! { "class" => "clear" }).unwrap(),
        "<br class=\"clear\"/>",
    );
}

#[test]
fn modify_leaves_the_rest_alone() {
    let tag = "<a  href='/x?a=1&amp;b=2'  >Q&amp;A</a>";
    compare(
        &modify_tag_attributes(tag, AttributeMap::new()).unwrap(),
        "<a href=\"/x?a=1&amp;b=2\"  >Q&amp;A</a>",
    );
}
