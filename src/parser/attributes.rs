//! Scanning of the attribute list inside an opening tag.

use crate::character_set::{is_space, ATTRIBUTE_NAME_END};
use crate::entity;
use crate::error::ParseError;
use crate::nodes::{AttributeMap, AttributeValue};
use crate::normalize::normalize_tag_attributes;
use crate::parser::find_tag;

/// One attribute as it appears in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedAttribute {
    /// The attribute name, as written.
    pub name: String,
    /// `Boolean(true)` for a bare attribute, otherwise the decoded value.
    pub value: AttributeValue,
    /// Where the name begins.
    pub start: usize,
    /// Just past the value (or the name, for a bare attribute).
    pub end: usize,
}

fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_space(bytes[i]) {
        i += 1;
    }
    i
}

/// Scans one attribute starting at `offset`, which should sit at or before
/// an attribute boundary inside a tag.
///
/// Returns `Ok(None)` once the end of the attribute list is reached; the
/// list ends where optional whitespace is followed by `>` or `/>`.
///
/// ```
/// # use tagsmith::{parse_tag_attribute, AttributeValue};
/// let attr = parse_tag_attribute("<a href='x&amp;y' hidden>", 2).unwrap().unwrap();
/// assert_eq!(attr.name, "href");
/// assert_eq!(attr.value, AttributeValue::Scalar("x&y".into()));
/// assert_eq!((attr.start, attr.end), (3, 17));
/// ```
pub fn parse_tag_attribute(
    html: &str,
    offset: usize,
) -> Result<Option<ScannedAttribute>, ParseError> {
    let bytes = html.as_bytes();
    let name_start = skip_spaces(bytes, offset);
    let mut i = name_start;
    while i < bytes.len() && !ATTRIBUTE_NAME_END[bytes[i] as usize] {
        i += 1;
    }

    if i == name_start {
        // No name here, so this had better be the end of the tag.
        let mut j = i;
        if bytes.get(j) == Some(&b'/') {
            j += 1;
        }
        if bytes.get(j) != Some(&b'>') {
            return Err(ParseError::MalformedAttribute { offset });
        }
        return Ok(None);
    }

    let name = html[name_start..i].to_string();
    let mut value = AttributeValue::Boolean(true);

    let eq = skip_spaces(bytes, i);
    if bytes.get(eq) == Some(&b'=') {
        i = skip_spaces(bytes, eq + 1);

        match bytes.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => {
                let close = match bytes[i + 1..].iter().position(|&c| c == q) {
                    Some(rel) => i + 1 + rel,
                    None => return Err(ParseError::MalformedAttribute { offset: name_start }),
                };
                value = AttributeValue::Scalar(
                    entity::unescape_html(&html[i + 1..close]).into_owned(),
                );
                i = close + 1;
            }
            Some(_) => {
                let org = i;
                while i < bytes.len() && !is_space(bytes[i]) && bytes[i] != b'>' {
                    i += 1;
                }
                if i > org {
                    value = AttributeValue::Scalar(entity::unescape_html(&html[org..i]).into_owned());
                }
            }
            None => (),
        }
    }

    log::trace!("attribute {:?} at {}..{}", name, name_start, i);

    Ok(Some(ScannedAttribute {
        name,
        value,
        start: name_start,
        end: i,
    }))
}

/// Scans the raw attributes of the tag whose name ends at `anchor`.  Returns
/// the attributes in source order along with the offset where the list ends.
pub(crate) fn scan_attributes(
    html: &str,
    mut anchor: usize,
) -> Result<(AttributeMap, usize), ParseError> {
    let mut attributes = AttributeMap::new();
    while let Some(attr) = parse_tag_attribute(html, anchor)? {
        anchor = attr.end;
        attributes.insert(attr.name, attr.value);
    }
    Ok((attributes, anchor))
}

/// Parses the attributes of the first tag found at or after `offset`.
///
/// Returns the normalized attributes together with the span they occupy,
/// from just after the tag name to the end of the last attribute.  Replacing
/// that span with freshly rendered attributes rewrites the tag in place.
///
/// With `decode`, scalar values are decoded a second time, for markup that
/// was encoded twice.
pub fn parse_tag_attributes(
    html: &str,
    offset: usize,
    decode: bool,
) -> Result<(AttributeMap, usize, usize), ParseError> {
    let (tag_type, tag_start) = find_tag(html, offset)?;
    let start = tag_start + tag_type.len() + 1;
    let (raw, end) = scan_attributes(html, start)?;
    let mut attributes = normalize_tag_attributes(raw);

    if decode {
        for value in attributes.values_mut() {
            if let AttributeValue::Scalar(s) = value {
                if let std::borrow::Cow::Owned(decoded) = entity::unescape_html(s) {
                    *s = decoded;
                }
            }
        }
    }

    Ok((attributes, start, end))
}
