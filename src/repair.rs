//! Best-effort repair of fragments with unclosed tags.

use crate::error::ParseError;
use crate::parser::TagParser;

/// Encodes the opening tags of unclosed elements so they show up as text
/// instead of swallowing the rest of the page.
///
/// Well-formed elements are copied through untouched.  An opening tag whose
/// closing tag can't be found has its `<` and `>` encoded, and scanning
/// resumes right after it.  Stray closing tags are left as they are.
///
/// A malformed attribute list is still an error: there is no telling where
/// the tag would end.
///
/// ```
/// # use tagsmith::encode_invalid_tags;
/// assert_eq!(encode_invalid_tags("<div>").unwrap(), "&lt;div&gt;");
/// assert_eq!(encode_invalid_tags("<div>ok</div>").unwrap(), "<div>ok</div>");
/// assert_eq!(
///     encode_invalid_tags("<p>a<br></p><b class=\"x\">b").unwrap(),
///     "<p>a<br></p>&lt;b class=\"x\"&gt;b",
/// );
/// ```
pub fn encode_invalid_tags(html: &str) -> Result<String, ParseError> {
    let mut parser = TagParser::new(html);
    let mut out = String::with_capacity(html.len());
    let mut offset = 0;

    while offset < html.len() {
        match parser.parse(offset) {
            Ok(tag) => {
                out.push_str(&html[offset..tag.end]);
                offset = tag.end;
            }
            Err(ParseError::NoTagFound) => break,
            Err(ParseError::UnterminatedTag {
                tag_type,
                start,
                body_start: Some(body_start),
                ..
            }) => {
                log::debug!("encoding unterminated <{}> at {}", tag_type, start);
                out.push_str(&html[offset..start]);
                out.push_str("&lt;");
                out.push_str(&html[start + 1..body_start - 1]);
                out.push_str("&gt;");
                offset = body_start;
            }
            Err(ParseError::UnterminatedTag { tag_type, start, .. }) => {
                // Only the `<name` part is known to be a tag.
                let next = start + tag_type.len() + 1;
                out.push_str(&html[offset..next]);
                offset = next;
            }
            Err(ParseError::ClosingTagAtOffset { name, start }) => {
                let next = start + name.len() + 2;
                out.push_str(&html[offset..next]);
                offset = next;
            }
            Err(e @ ParseError::MalformedAttribute { .. }) => return Err(e),
        }
    }

    out.push_str(&html[offset..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn repaired(html: &str) -> String {
        encode_invalid_tags(html).unwrap()
    }

    #[test]
    fn well_formed_passes_through() {
        assert_eq!(repaired(""), "");
        assert_eq!(repaired("just text"), "just text");
        assert_eq!(repaired("a <b>bold</b> <img src=x> c"), "a <b>bold</b> <img src=x> c");
    }

    #[test]
    fn unclosed_openers_are_encoded() {
        assert_eq!(repaired("<div>"), "&lt;div&gt;");
        assert_eq!(repaired("x<div id=\"a\">y"), "x&lt;div id=\"a\"&gt;y");
        assert_eq!(repaired("<div><p>ok</p>"), "&lt;div&gt;<p>ok</p>");
    }

    #[test]
    fn stray_closers_are_kept() {
        assert_eq!(repaired("a</div>b<i>c</i>"), "a</div>b<i>c</i>");
        assert_eq!(repaired("</p><p>"), "</p>&lt;p&gt;");
    }

    #[test]
    fn inner_breakage_stays_inside_a_closed_element() {
        assert_eq!(repaired("<div><b></div>"), "<div><b></div>");
    }

    #[test]
    fn lone_angle_brackets() {
        assert_eq!(repaired("<<<<"), "<<<<");
        assert_eq!(repaired("1 < 2 > 0"), "1 < 2 > 0");
    }

    #[test]
    fn malformed_attributes_propagate() {
        assert_eq!(
            encode_invalid_tags("ok <a href=\"x>"),
            Err(ParseError::MalformedAttribute { offset: 6 })
        );
    }
}
