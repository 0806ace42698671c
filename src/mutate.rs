//! Splicing content and attributes into existing tags.

use std::fmt;
use std::str::FromStr;

use crate::error::MutationError;
use crate::nodes::{AttributeMap, AttributeValue};
use crate::normalize::{dedup, explode_class, normalize_tag_attributes};
use crate::parser::attributes::parse_tag_attributes;
use crate::parser::{find_tag, parse_tag};
use crate::render::render_tag_attributes;

/// What to do when the tag already has a direct child of the same type as
/// the one being added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfExists {
    /// Leave the tag as it is.
    Keep,
    /// Swap the existing child for the new content.
    Replace,
}

impl FromStr for IfExists {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(IfExists::Keep),
            "replace" => Ok(IfExists::Replace),
            _ => Err(MutationError::InvalidPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for IfExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IfExists::Keep => "keep",
            IfExists::Replace => "replace",
        })
    }
}

#[derive(Clone, Copy)]
enum Position {
    BodyStart,
    BodyEnd,
}

/// Inserts `html` at the end of `tag`'s body, just before its closing tag.
///
/// ```
/// # use tagsmith::append_to_tag;
/// assert_eq!(append_to_tag("<ul></ul>", "<li>x</li>", None).unwrap(), "<ul><li>x</li></ul>");
/// ```
pub fn append_to_tag(tag: &str, html: &str, if_exists: Option<IfExists>) -> Result<String, MutationError> {
    add_to_tag(tag, html, Position::BodyEnd, if_exists)
}

/// Inserts `html` at the start of `tag`'s body, just after its opening tag.
pub fn prepend_to_tag(tag: &str, html: &str, if_exists: Option<IfExists>) -> Result<String, MutationError> {
    add_to_tag(tag, html, Position::BodyStart, if_exists)
}

fn add_to_tag(
    tag: &str,
    html: &str,
    position: Position,
    if_exists: Option<IfExists>,
) -> Result<String, MutationError> {
    let info = parse_tag(tag, 0)?;
    let (body_start, body_end) = match (info.body_start, info.body_end) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            return Err(MutationError::NotAContainer {
                tag_type: info.tag_type,
            })
        }
    };

    if let Some(policy) = if_exists {
        let (child_type, _) = find_tag(html, 0)?;
        if let Some(child) = info.first_child_of_type(&child_type) {
            log::debug!("<{}> already has a <{}> child; {}", info.tag_type, child_type, policy);
            return Ok(match policy {
                IfExists::Keep => tag.to_string(),
                IfExists::Replace => splice(tag, child.start, child.end, html),
            });
        }
    }

    let at = match position {
        Position::BodyStart => body_start,
        Position::BodyEnd => body_end,
    };
    Ok(splice(tag, at, at, html))
}

/// Replaces `s[from..to]` with `insertion`.
fn splice(s: &str, from: usize, to: usize, insertion: &str) -> String {
    let mut out = String::with_capacity(s.len() - (to - from) + insertion.len());
    out.push_str(&s[..from]);
    out.push_str(insertion);
    out.push_str(&s[to..]);
    out
}

/// Merges `attributes` into the opening tag of `tag`, rewriting only its
/// attribute list.
///
/// The new attributes are normalized first.  Class lists are combined,
/// grouped attributes and style properties are merged key by key, and
/// anything else is overwritten.  An attribute set to `false` is removed,
/// and classes listed under `removeClass` are taken out of the merged class
/// list.
///
/// ```
/// # use tagsmith::{modify_tag_attributes, AttributeMap};
/// let mut attrs = AttributeMap::new();
/// attrs.insert("class".into(), "b c".into());
/// attrs.insert("data-id".into(), "2".into());
/// assert_eq!(
///     modify_tag_attributes("<div class=\"a b\">text</div>", attrs).unwrap(),
///     "<div class=\"a b c\" data-id=\"2\">text</div>",
/// );
/// ```
pub fn modify_tag_attributes(tag: &str, attributes: AttributeMap) -> Result<String, MutationError> {
    let removed = attributes
        .get("removeClass")
        .map(explode_class)
        .unwrap_or_default();
    let attributes = normalize_tag_attributes(attributes);
    let (mut merged, start, end) = parse_tag_attributes(tag, 0, true)?;
    merge_attributes(&mut merged, attributes);

    if let Some(AttributeValue::OrderedSet(classes)) = merged.get_mut("class") {
        let mut kept = dedup(std::mem::take(classes));
        kept.retain(|class| !removed.contains(class));
        *classes = kept;
    }

    Ok(splice(tag, start, end, &render_tag_attributes(&merged)))
}

/// Deep-merges `new` into `old`.  Sets are appended to, maps are merged
/// recursively, and everything else is replaced.
pub fn merge_attributes(old: &mut AttributeMap, new: AttributeMap) {
    for (name, value) in new {
        match old.get_mut(&name) {
            Some(existing) => merge_value(existing, value),
            None => {
                old.insert(name, value);
            }
        }
    }
}

fn merge_value(existing: &mut AttributeValue, value: AttributeValue) {
    match (existing, value) {
        (AttributeValue::OrderedSet(classes), AttributeValue::OrderedSet(more)) => {
            classes.extend(more)
        }
        (AttributeValue::Grouped(map), AttributeValue::Grouped(more)) => merge_attributes(map, more),
        (slot, value) => *slot = value,
    }
}
