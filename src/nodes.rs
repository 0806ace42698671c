//! The parsed tag tree and attribute values.

use indexmap::IndexMap;
use std::fmt;

/// An ordered attribute map.  Iteration follows insertion order; a repeated
/// key keeps its first position but takes the later value.
pub type AttributeMap = IndexMap<String, AttributeValue>;

/// The value of one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// A value-less attribute such as `disabled` when `true`.  `false` means
    /// the attribute is omitted entirely when rendered.
    Boolean(bool),

    /// A plain string value.
    Scalar(String),

    /// An ordered collection of tokens, as used for `class`.
    OrderedSet(Vec<String>),

    /// A nested map: the properties of a `style` attribute, or every
    /// attribute sharing a grouping prefix such as `data-`.
    Grouped(AttributeMap),
}

impl AttributeValue {
    /// The string value, if this is a [`AttributeValue::Scalar`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The tokens, if this is an [`AttributeValue::OrderedSet`].
    pub fn as_set(&self) -> Option<&[String]> {
        match self {
            AttributeValue::OrderedSet(v) => Some(v),
            _ => None,
        }
    }

    /// The nested map, if this is an [`AttributeValue::Grouped`].
    pub fn as_map(&self) -> Option<&AttributeMap> {
        match self {
            AttributeValue::Grouped(m) => Some(m),
            _ => None,
        }
    }

    /// Whether this value would be dropped on rendering.
    pub fn is_false(&self) -> bool {
        matches!(self, AttributeValue::Boolean(false))
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Scalar(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Scalar(s)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(v: Vec<String>) -> Self {
        AttributeValue::OrderedSet(v)
    }
}

impl From<AttributeMap> for AttributeValue {
    fn from(m: AttributeMap) -> Self {
        AttributeValue::Grouped(m)
    }
}

/// A child of a [`ParsedTag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Tag(ParsedTag),

    /// Text (or anything that didn't parse as a tag) between elements.
    Text(String),
}

impl Node {
    /// The nested tag, if this node is one.
    pub fn as_tag(&self) -> Option<&ParsedTag> {
        match self {
            Node::Tag(t) => Some(t),
            Node::Text(_) => None,
        }
    }
}

/// One element found in a fragment.
///
/// All offsets are byte positions into the string the tag was parsed from.
///
/// ``` text
/// <div class="x">body</div>
/// ^              ^   ^     ^
/// start          |   |     end
///       body_start   body_end
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    /// The lower-cased tag name.
    pub tag_type: String,

    /// Normalized attributes, in source order.
    pub attributes: AttributeMap,

    /// Text and element children, in source order.  Empty for void
    /// elements; a raw-text element holds at most one text child.
    pub children: Vec<Node>,

    /// The position of the opening `<`.
    pub start: usize,

    /// Where the body begins, just after the opening tag's `>`.  `None` for
    /// void elements.
    pub body_start: Option<usize>,

    /// Where the closing tag begins.  `None` for void elements.
    pub body_end: Option<usize>,

    /// The position just past the final `>`.
    pub end: usize,
}

impl ParsedTag {
    /// Whether the element is void, either by type or by `/>` syntax.
    pub fn is_void(&self) -> bool {
        self.body_start.is_none()
    }

    /// The direct element children.
    pub fn child_tags(&self) -> impl Iterator<Item = &ParsedTag> {
        self.children.iter().filter_map(Node::as_tag)
    }

    /// The first direct element child of the given (lower-case) type.
    pub fn first_child_of_type(&self, tag_type: &str) -> Option<&ParsedTag> {
        self.child_tags().find(|t| t.tag_type == tag_type)
    }

    /// The slice of `html` this tag was parsed from.
    pub fn outer_html<'h>(&self, html: &'h str) -> &'h str {
        &html[self.start..self.end]
    }

    /// The body of this tag within `html`, if it isn't void.
    pub fn inner_html<'h>(&self, html: &'h str) -> Option<&'h str> {
        match (self.body_start, self.body_end) {
            (Some(s), Some(e)) => Some(&html[s..e]),
            _ => None,
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}<{}", "", self.tag_type, indent = depth * 2)?;
        for (name, value) in &self.attributes {
            write!(f, " {}={:?}", name, value)?;
        }
        writeln!(f, "> [{}..{})", self.start, self.end)?;
        for child in &self.children {
            match child {
                Node::Tag(t) => t.fmt_indented(f, depth + 1)?,
                Node::Text(s) => writeln!(f, "{:indent$}{:?}", "", s, indent = (depth + 1) * 2)?,
            }
        }
        Ok(())
    }
}

/// An indented outline of the tree, one node per line.
impl fmt::Display for ParsedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
