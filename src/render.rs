//! Serializing attribute maps back into markup.

use std::fmt::{self, Write};

use serde_json::{Map, Value};

use crate::entity::escape;
use crate::nodes::{AttributeMap, AttributeValue};
use crate::normalize::{dedup, GROUPING_PREFIXES};

/// Attributes that are always rendered first, in this order, when present.
pub const ATTRIBUTE_ORDER: &[&str] = &[
    "type", "id", "class", "name", "value", "href", "src", "srcset", "form", "action", "method",
    "selected", "checked", "readonly", "disabled", "multiple", "size", "maxlength", "minlength",
    "width", "height", "rows", "cols", "alt", "title", "rel", "media",
];

/// Renders `attributes` as they would appear inside an opening tag, each
/// preceded by a space.
///
/// ```
/// # use tagsmith::{render_tag_attributes, AttributeMap, AttributeValue};
/// let mut attrs = AttributeMap::new();
/// attrs.insert("title".into(), "a \"quote\"".into());
/// attrs.insert("hidden".into(), true.into());
/// attrs.insert("id".into(), "main".into());
/// attrs.insert("draggable".into(), false.into());
/// assert_eq!(
///     render_tag_attributes(&attrs),
///     " id=\"main\" title=\"a &quot;quote&quot;\" hidden",
/// );
/// ```
pub fn render_tag_attributes(attributes: &AttributeMap) -> String {
    let mut out = String::new();
    // Writing to a String can't fail.
    let _ = write_tag_attributes(&mut out, attributes);
    out
}

/// Like [`render_tag_attributes`], writing to `w`.
pub fn write_tag_attributes(w: &mut dyn Write, attributes: &AttributeMap) -> fmt::Result {
    let prioritized = ATTRIBUTE_ORDER
        .iter()
        .filter_map(|&name| attributes.get_key_value(name));
    let rest = attributes
        .iter()
        .filter(|(name, _)| !ATTRIBUTE_ORDER.contains(&name.as_str()));

    for (name, value) in prioritized.chain(rest) {
        write_attribute(w, name, value)?;
    }
    Ok(())
}

fn write_attribute(w: &mut dyn Write, name: &str, value: &AttributeValue) -> fmt::Result {
    match value {
        AttributeValue::Boolean(true) => write!(w, " {}", name),
        AttributeValue::Boolean(false) => Ok(()),
        AttributeValue::Scalar(s) => write!(w, " {}=\"{}\"", name, escape(s)),
        AttributeValue::Grouped(map) if GROUPING_PREFIXES.contains(&name) => {
            for (key, v) in map {
                match v {
                    AttributeValue::Boolean(true) => write!(w, " {}-{}", name, key)?,
                    AttributeValue::Boolean(false) => (),
                    AttributeValue::Scalar(s) => write!(w, " {}-{}=\"{}\"", name, key, escape(s))?,
                    nested => write!(w, " {}-{}='{}'", name, key, escape(&to_json(nested)))?,
                }
            }
            Ok(())
        }
        AttributeValue::OrderedSet(classes) if name == "class" => {
            let classes = dedup(
                classes
                    .iter()
                    .flat_map(|c| c.split(' '))
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
            if classes.is_empty() {
                return Ok(());
            }
            write!(w, " class=\"{}\"", escape(&classes.join(" ")))
        }
        AttributeValue::Grouped(styles) if name == "style" => {
            let css = css_style_from_map(styles);
            if css.is_empty() {
                return Ok(());
            }
            write!(w, " style=\"{}\"", escape(&css))
        }
        other => write!(w, " {}='{}'", name, escape(&to_json(other))),
    }
}

/// Renders a style property map as CSS declarations.
///
/// ```
/// # use tagsmith::{css_style_from_map, AttributeMap};
/// let mut styles = AttributeMap::new();
/// styles.insert("color".into(), "red".into());
/// styles.insert("margin".into(), "0 auto".into());
/// assert_eq!(css_style_from_map(&styles), "color: red; margin: 0 auto;");
/// ```
pub fn css_style_from_map(styles: &AttributeMap) -> String {
    let mut css = String::new();
    for (property, value) in styles {
        let value = match value {
            AttributeValue::Scalar(s) => s.as_str(),
            AttributeValue::Boolean(true) => "",
            _ => continue,
        };
        if !css.is_empty() {
            css.push(' ');
        }
        let _ = write!(css, "{}: {};", property, value);
    }
    css
}

/// A JSON rendering of a value, for attributes holding structured data.
fn to_json(value: &AttributeValue) -> String {
    json_value(value).to_string()
}

fn json_value(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Boolean(b) => Value::Bool(*b),
        AttributeValue::Scalar(s) => Value::String(s.clone()),
        AttributeValue::OrderedSet(items) => items.iter().cloned().map(Value::String).collect(),
        AttributeValue::Grouped(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), json_value(v)))
                .collect::<Map<String, Value>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: Vec<(&str, AttributeValue)>) -> AttributeMap {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn priority_order() {
        let rendered = render_tag_attributes(&attrs(vec![
            ("data-x", "1".into()),
            ("href", "/a".into()),
            ("class", AttributeValue::OrderedSet(vec!["b".into()])),
            ("type", "button".into()),
        ]));
        assert_eq!(rendered, " type=\"button\" class=\"b\" href=\"/a\" data-x=\"1\"");
    }

    #[test]
    fn empty_class_and_style_are_skipped() {
        let rendered = render_tag_attributes(&attrs(vec![
            ("class", AttributeValue::OrderedSet(vec![])),
            ("style", AttributeValue::Grouped(AttributeMap::new())),
        ]));
        assert_eq!(rendered, "");
    }

    #[test]
    fn class_tokens_are_deduplicated() {
        let rendered = render_tag_attributes(&attrs(vec![(
            "class",
            AttributeValue::OrderedSet(vec!["a b".into(), "b".into(), "c".into()]),
        )]));
        assert_eq!(rendered, " class=\"a b c\"");
    }

    #[test]
    fn grouped_prefixes_expand() {
        let data = attrs(vec![
            ("id", "7".into()),
            ("on", true.into()),
            ("off", false.into()),
            ("list", AttributeValue::OrderedSet(vec!["a".into(), "b\"".into()])),
        ]);
        let rendered = render_tag_attributes(&attrs(vec![("data", AttributeValue::Grouped(data))]));
        assert_eq!(
            rendered,
            " data-id=\"7\" data-on data-list='[&quot;a&quot;,&quot;b\\&quot;&quot;]'"
        );
    }

    #[test]
    fn style_is_escaped() {
        let style = attrs(vec![("font-family", "\"Fira Sans\"".into())]);
        let rendered = render_tag_attributes(&attrs(vec![("style", AttributeValue::Grouped(style))]));
        assert_eq!(rendered, " style=\"font-family: &quot;Fira Sans&quot;;\"");
    }

    #[test]
    fn other_structures_become_json() {
        let rendered = render_tag_attributes(&attrs(vec![(
            "x-props",
            AttributeValue::Grouped(attrs(vec![("n", "1".into())])),
        )]));
        assert_eq!(rendered, " x-props='{&quot;n&quot;:&quot;1&quot;}'");
    }

    #[test]
    fn json_keeps_key_order_and_escapes_controls() {
        let props = attrs(vec![
            ("z", "tab\there".into()),
            ("a", AttributeValue::OrderedSet(vec!["\u{1}".into()])),
            ("m", true.into()),
        ]);
        let rendered = render_tag_attributes(&attrs(vec![("x-props", AttributeValue::Grouped(props))]));
        assert_eq!(
            rendered,
            " x-props='{&quot;z&quot;:&quot;tab\\there&quot;,&quot;a&quot;:[&quot;\\u0001&quot;],&quot;m&quot;:true}'"
        );
    }
}
