//! A forgiving scanner and rewriter for HTML fragments.
//!
//! tagsmith works directly on markup strings, the way templating code
//! usually needs to: find the first tag in a fragment, read its attributes,
//! add children to it, merge new attributes into it, namespace the ids in
//! it.  Untouched bytes are preserved exactly.
//!
//! ```
//! use tagsmith::{append_to_tag, modify_tag_attributes, parse_tag, AttributeMap};
//!
//! let html = "<ul class=\"menu\"><li>Home</li></ul>";
//! let tag = parse_tag(html, 0).unwrap();
//! assert_eq!(tag.tag_type, "ul");
//! assert_eq!(tag.child_tags().count(), 1);
//!
//! let html = append_to_tag(html, "<li>About</li>", None).unwrap();
//! assert_eq!(html, "<ul class=\"menu\"><li>Home</li><li>About</li></ul>");
//!
//! let mut attrs = AttributeMap::new();
//! attrs.insert("class".into(), "open".into());
//! assert_eq!(
//!     modify_tag_attributes(&html, attrs).unwrap(),
//!     "<ul class=\"menu open\"><li>Home</li><li>About</li></ul>",
//! );
//! ```
//!
//! Malformed input is reported through [`ParseError`]; nothing here panics
//! on bad markup.  [`encode_invalid_tags`] offers a best-effort alternative
//! to failing.

#![deny(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]
#![allow(unknown_lints, clippy::doc_markdown, clippy::manual_range_contains)]

mod character_set;
pub mod entity;
mod error;
mod mutate;
pub mod namespace;
pub mod nodes;
pub mod normalize;
pub mod parser;
mod render;
mod repair;
mod strings;

pub use error::{MutationError, ParseError};
pub use mutate::{append_to_tag, merge_attributes, modify_tag_attributes, prepend_to_tag, IfExists};
pub use namespace::{
    id, namespace_attributes, namespace_html, namespace_id, namespace_input_name, namespace_inputs,
};
pub use nodes::{AttributeMap, AttributeValue, Node, ParsedTag};
pub use normalize::{explode_class, explode_style, normalize_tag_attributes, split_grouped_name};
pub use parser::attributes::{parse_tag_attribute, parse_tag_attributes, ScannedAttribute};
pub use parser::{find_tag, parse_tag, TagParser};
pub use render::{css_style_from_map, render_tag_attributes, write_tag_attributes, ATTRIBUTE_ORDER};
pub use repair::encode_invalid_tags;
pub use strings::{
    decode_doubles, encode_params, encode_spaces, unwrap_condition, unwrap_noscript, widont,
};
