//! Turning raw attribute values into their structured forms.

use lazy_static::lazy_static;
use regex::Regex;

use crate::nodes::{AttributeMap, AttributeValue};

/// Attribute name prefixes whose members are gathered into one grouped
/// value: `data-foo="1"` becomes `data: {foo: "1"}`.
pub const GROUPING_PREFIXES: &[&str] = &["aria", "data", "data-hx", "data-ng", "hx", "ng"];

lazy_static! {
    /// [`GROUPING_PREFIXES`], longest first, so the most specific prefix
    /// claims an attribute.
    static ref SORTED_GROUPING_PREFIXES: Vec<&'static str> = {
        let mut prefixes = GROUPING_PREFIXES.to_vec();
        prefixes.sort_by(|a, b| b.len().cmp(&a.len()));
        prefixes
    };

    static ref CSS_URL: Regex = Regex::new(r"(?i)\burl\(.*\)").unwrap();
    static ref DECLARATION_SEPARATOR: Regex = Regex::new(r"\s*;\s*").unwrap();
    static ref PROPERTY_SEPARATOR: Regex = Regex::new(r"\s*:\s*").unwrap();
}

/// The grouping prefixes, longest first.
pub fn sorted_grouping_prefixes() -> &'static [&'static str] {
    &SORTED_GROUPING_PREFIXES
}

/// Splits `name` into its grouping prefix and the rest, if it has one.
///
/// ```
/// # use tagsmith::split_grouped_name;
/// assert_eq!(split_grouped_name("data-hx-get"), Some(("data-hx", "get")));
/// assert_eq!(split_grouped_name("data-id"), Some(("data", "id")));
/// assert_eq!(split_grouped_name("database"), None);
/// ```
pub fn split_grouped_name(name: &str) -> Option<(&'static str, &str)> {
    sorted_grouping_prefixes().iter().find_map(|&prefix| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .map(|rest| (prefix, rest))
    })
}

/// Splits a class attribute value into its class names.
pub fn explode_class(value: &AttributeValue) -> Vec<String> {
    match value {
        AttributeValue::Boolean(_) => vec![],
        AttributeValue::Scalar(s) => s.split_whitespace().map(str::to_string).collect(),
        AttributeValue::OrderedSet(v) => v.clone(),
        AttributeValue::Grouped(m) => m
            .values()
            .filter_map(AttributeValue::as_str)
            .flat_map(str::split_whitespace)
            .map(str::to_string)
            .collect(),
    }
}

/// Splits a style attribute value into an ordered property map.
///
/// `url(...)` values are masked while splitting, so semicolons and colons
/// inside them survive.
pub fn explode_style(value: &AttributeValue) -> AttributeMap {
    let s = match value {
        AttributeValue::Scalar(s) => s,
        AttributeValue::Grouped(m) => return m.clone(),
        AttributeValue::Boolean(_) | AttributeValue::OrderedSet(_) => return AttributeMap::new(),
    };

    let mut urls = vec![];
    let masked = CSS_URL.replace_all(s, |caps: &regex::Captures| {
        urls.push(caps[0].to_string());
        format!("\u{0}url{}\u{0}", urls.len() - 1)
    });

    let unmask = |v: &str| -> String {
        if urls.is_empty() {
            return v.to_string();
        }
        let mut out = v.to_string();
        for (i, url) in urls.iter().enumerate() {
            out = out.replace(&format!("\u{0}url{}\u{0}", i), url);
        }
        out
    };

    let mut styles = AttributeMap::new();
    for declaration in DECLARATION_SEPARATOR.split(&masked) {
        if declaration.is_empty() {
            continue;
        }
        let mut parts = PROPERTY_SEPARATOR.splitn(declaration, 2);
        let name = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();
        styles.insert(name.to_string(), AttributeValue::Scalar(unmask(value)));
    }
    styles
}

/// Converts raw attribute values into their structured forms.
///
/// * `false` stays `false`: the attribute is to be dropped.
/// * `class` and `removeClass` become ordered sets of class names.
/// * `style` becomes an ordered map of properties.
/// * Attributes named `<prefix>-<rest>` for one of the
///   [`GROUPING_PREFIXES`] are gathered under `<prefix>`, keyed by `<rest>`.
/// * `removeClass` is then subtracted from `class` and dropped.
///
/// Everything else passes through untouched.
pub fn normalize_tag_attributes(raw: AttributeMap) -> AttributeMap {
    let mut normalized = AttributeMap::with_capacity(raw.len());

    for (name, value) in raw {
        if value.is_false() {
            normalized.insert(name, value);
            continue;
        }

        match name.as_str() {
            "class" | "removeClass" => {
                let classes = dedup(explode_class(&value));
                normalized.insert(name, AttributeValue::OrderedSet(classes));
            }
            "style" => {
                normalized.insert(name, AttributeValue::Grouped(explode_style(&value)));
            }
            _ => match split_grouped_name(&name) {
                Some((prefix, rest)) => {
                    let group = normalized
                        .entry(prefix.to_string())
                        .or_insert_with(|| AttributeValue::Grouped(AttributeMap::new()));
                    if !matches!(group, AttributeValue::Grouped(_)) {
                        *group = AttributeValue::Grouped(AttributeMap::new());
                    }
                    if let AttributeValue::Grouped(m) = group {
                        m.insert(rest.to_string(), value);
                    }
                }
                None => {
                    normalized.insert(name, value);
                }
            },
        }
    }

    if let Some(remove) = normalized.shift_remove("removeClass") {
        let remove = explode_class(&remove);
        let class = normalized
            .entry("class".to_string())
            .or_insert_with(|| AttributeValue::OrderedSet(vec![]));
        let kept = explode_class(class)
            .into_iter()
            .filter(|c| !remove.contains(c))
            .collect();
        *class = AttributeValue::OrderedSet(kept);
    }

    normalized
}

/// Drops repeated entries, keeping the first of each.
pub(crate) fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = rustc_hash::FxHashSet::default();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: &[(&str, AttributeValue)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn scalar(s: &str) -> AttributeValue {
        AttributeValue::Scalar(s.to_string())
    }

    fn set(items: &[&str]) -> AttributeValue {
        AttributeValue::OrderedSet(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn prefixes_longest_first() {
        let sorted = sorted_grouping_prefixes();
        assert_eq!(sorted.len(), GROUPING_PREFIXES.len());
        assert!(sorted.windows(2).all(|w| w[0].len() >= w[1].len()));
        assert_eq!(&sorted[..2], &["data-hx", "data-ng"]);
    }

    #[test]
    fn classes_and_groups() {
        let normalized = normalize_tag_attributes(attrs(&[
            ("class", scalar("a b a")),
            ("data-foo", scalar("1")),
        ]));
        assert_eq!(
            normalized,
            attrs(&[
                ("class", set(&["a", "b"])),
                ("data", AttributeValue::Grouped(attrs(&[("foo", scalar("1"))]))),
            ])
        );
    }

    #[test]
    fn most_specific_prefix_wins() {
        let normalized = normalize_tag_attributes(attrs(&[
            ("data-hx-get", scalar("/x")),
            ("data-id", scalar("7")),
            ("aria-label", scalar("Close")),
            ("hxa", scalar("no")),
        ]));
        assert_eq!(normalized["data-hx"], AttributeValue::Grouped(attrs(&[("get", scalar("/x"))])));
        assert_eq!(normalized["data"], AttributeValue::Grouped(attrs(&[("id", scalar("7"))])));
        assert_eq!(normalized["aria"], AttributeValue::Grouped(attrs(&[("label", scalar("Close"))])));
        assert_eq!(normalized["hxa"], scalar("no"));
    }

    #[test]
    fn remove_class() {
        let normalized = normalize_tag_attributes(attrs(&[
            ("class", scalar("btn active  big")),
            ("removeClass", scalar("active")),
        ]));
        assert_eq!(normalized, attrs(&[("class", set(&["btn", "big"]))]));

        let normalized = normalize_tag_attributes(attrs(&[("removeClass", scalar("x"))]));
        assert_eq!(normalized, attrs(&[("class", set(&[]))]));
    }

    #[test]
    fn false_means_drop() {
        let normalized = normalize_tag_attributes(attrs(&[
            ("class", AttributeValue::Boolean(false)),
            ("data-x", AttributeValue::Boolean(false)),
        ]));
        assert_eq!(normalized["class"], AttributeValue::Boolean(false));
        assert_eq!(normalized["data-x"], AttributeValue::Boolean(false));
    }

    #[test]
    fn styles() {
        let style = explode_style(&scalar(
            "color: red;background:url(data:image/png;base64,AA==) no-repeat ; ;margin:0",
        ));
        assert_eq!(
            style,
            attrs(&[
                ("color", scalar("red")),
                ("background", scalar("url(data:image/png;base64,AA==) no-repeat")),
                ("margin", scalar("0")),
            ])
        );
        assert_eq!(explode_style(&scalar("")), AttributeMap::new());
        assert_eq!(explode_style(&scalar("bare")), attrs(&[("bare", scalar(""))]));
    }

    #[test]
    fn class_from_other_shapes() {
        assert_eq!(explode_class(&AttributeValue::Boolean(true)), Vec::<String>::new());
        assert_eq!(explode_class(&set(&["x", "y"])), vec!["x", "y"]);
    }

    #[test]
    fn patterns_compile() {
        lazy_static::initialize(&SORTED_GROUPING_PREFIXES);
        lazy_static::initialize(&CSS_URL);
        lazy_static::initialize(&DECLARATION_SEPARATOR);
        lazy_static::initialize(&PROPERTY_SEPARATOR);
    }
}
