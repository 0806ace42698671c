//! Errors raised while scanning and rewriting tags.

use crate::nodes::AttributeMap;
use thiserror::Error;

/// A failure to scan a tag out of a string.
///
/// Besides reporting the failure, the variants carry as much of the tag as
/// was recognised; [`crate::encode_invalid_tags`] uses this to decide how
/// much of the input can safely be treated as markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// There is no opening tag at or after the offset.
    #[error("could not find an HTML tag")]
    NoTagFound,

    /// The first tag at or after the offset closes an element.
    #[error("found closing tag </{name}> at offset {start} where an opening tag was expected")]
    ClosingTagAtOffset {
        /// The lower-cased name of the closing tag.
        name: String,
        /// The position of its `<`.
        start: usize,
    },

    /// An attribute list that never reaches a `>`, or a quoted value with no
    /// closing quote.
    #[error("malformed HTML tag attribute at offset {offset}")]
    MalformedAttribute {
        /// Where the offending attribute (or attribute list) begins.
        offset: usize,
    },

    /// The opening tag was read but its closing tag is missing.
    #[error("could not find a </{tag_type}> tag")]
    UnterminatedTag {
        /// The lower-cased tag name.
        tag_type: String,
        /// The attributes parsed from the opening tag.
        attributes: AttributeMap,
        /// The position of the opening `<`.
        start: usize,
        /// Just past the opening tag's `>`.
        body_start: Option<usize>,
    },
}

impl ParseError {
    /// The type of the tag involved, if one was identified.
    pub fn tag_type(&self) -> Option<&str> {
        match self {
            ParseError::ClosingTagAtOffset { name, .. } => Some(name),
            ParseError::UnterminatedTag { tag_type, .. } => Some(tag_type),
            ParseError::NoTagFound | ParseError::MalformedAttribute { .. } => None,
        }
    }

    /// Where the tag involved starts, if known.
    pub fn start(&self) -> Option<usize> {
        match self {
            ParseError::ClosingTagAtOffset { start, .. } => Some(*start),
            ParseError::UnterminatedTag { start, .. } => Some(*start),
            ParseError::MalformedAttribute { offset } => Some(*offset),
            ParseError::NoTagFound => None,
        }
    }

    /// Where the unterminated tag's body starts, if the opening tag was
    /// complete.
    pub fn body_start(&self) -> Option<usize> {
        match self {
            ParseError::UnterminatedTag { body_start, .. } => *body_start,
            _ => None,
        }
    }

    /// Whether this error means the input is broken beyond what repair mode
    /// can work around.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::MalformedAttribute { .. })
    }
}

/// A failure to modify a tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The tag (or the HTML being inserted) didn't parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Content can't be added to a void element.
    #[error("<{tag_type}> can't have children")]
    NotAContainer {
        /// The void element's type.
        tag_type: String,
    },

    /// An `if_exists` policy other than `keep` or `replace`.
    #[error("invalid if-exists policy: {0:?}")]
    InvalidPolicy(String),
}
