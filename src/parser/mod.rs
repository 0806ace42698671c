//! Locating and parsing tags in an HTML fragment.
//!
//! This is a forgiving scanner, not an HTML5 parser: it knows which elements
//! are void and which hold raw text, and otherwise simply pairs an opening
//! tag with the next matching closing tag at the right depth.

pub mod attributes;

use rustc_hash::FxHashMap;

use crate::character_set::is_tag_name_byte;
use crate::error::ParseError;
use crate::nodes::{AttributeMap, Node, ParsedTag};
use crate::normalize::normalize_tag_attributes;
use crate::strings::{find_byte, find_bytes_ignore_ascii_case};
use self::attributes::scan_attributes;

/// Elements that never have a body or closing tag.
pub static VOID_ELEMENTS: phf::Set<&'static str> = phf::phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "source", "track", "wbr",
};

/// Elements whose body is opaque text, never scanned for tags.
pub static RAW_TEXT_ELEMENTS: phf::Set<&'static str> = phf::phf_set! {
    "script", "style",
};

/// Finds the first opening tag at or after `offset`, returning its
/// lower-cased name and the position of its `<`.
///
/// A `<` only introduces a tag when a name character follows it, so
/// comments, doctypes and stray `<`s are skipped over.  If the first tag
/// found is a closing tag, that's an error: it marks the end of whatever
/// the caller was scanning.
pub fn find_tag(html: &str, offset: usize) -> Result<(String, usize), ParseError> {
    let bytes = html.as_bytes();
    let lt = jetscii::bytes!(b'<');
    let mut i = offset;

    while i < bytes.len() {
        let pos = match lt.find(&bytes[i..]) {
            Some(rel) => i + rel,
            None => break,
        };

        let closing = bytes.get(pos + 1) == Some(&b'/');
        let name_start = if closing { pos + 2 } else { pos + 1 };
        let mut name_end = name_start;
        while name_end < bytes.len() && is_tag_name_byte(bytes[name_end]) {
            name_end += 1;
        }

        if name_end > name_start {
            let name = html[name_start..name_end].to_ascii_lowercase();
            if closing {
                return Err(ParseError::ClosingTagAtOffset { name, start: pos });
            }
            return Ok((name, pos));
        }

        i = pos + 1;
    }

    Err(ParseError::NoTagFound)
}

/// Parses the first tag at or after `offset`, along with everything nested
/// inside it.
///
/// ```
/// let tag = tagsmith::parse_tag("<p>Hi <b>there</b></p>", 0).unwrap();
/// assert_eq!(tag.tag_type, "p");
/// assert_eq!((tag.body_start, tag.body_end, tag.end), (Some(3), Some(18), 22));
/// assert_eq!(tag.children.len(), 2);
/// ```
pub fn parse_tag(html: &str, offset: usize) -> Result<ParsedTag, ParseError> {
    TagParser::new(html).parse(offset)
}

/// An element whose opening tag has been read but whose children haven't
/// all been found yet.
struct Frame {
    tag_type: String,
    attributes: AttributeMap,
    start: usize,
    body_start: usize,
    children: Vec<Node>,
    cursor: usize,
}

enum Opened {
    Void(ParsedTag),
    Container(Frame),
}

/// A tag parser bound to one string.
///
/// Parsing is iterative, with an explicit stack of open elements, so deeply
/// nested input can't exhaust the native stack.  The parser also remembers
/// what it has already learnt about the string: which opening tags turned
/// out to be unterminated, and where the next closing tag of each type
/// lies.  Reusing one parser for repeated calls against the same string
/// (as [`crate::encode_invalid_tags`] does) keeps the total work near
/// linear even on input full of unclosed tags.
#[derive(Debug)]
pub struct TagParser<'h> {
    html: &'h str,
    unterminated: FxHashMap<usize, ParseError>,
    closing_after: FxHashMap<String, (usize, Option<usize>)>,
}

impl<'h> TagParser<'h> {
    /// Creates a parser for `html`.
    pub fn new(html: &'h str) -> Self {
        TagParser {
            html,
            unterminated: FxHashMap::default(),
            closing_after: FxHashMap::default(),
        }
    }

    /// Parses the first tag at or after `offset`.  See [`parse_tag`].
    pub fn parse(&mut self, offset: usize) -> Result<ParsedTag, ParseError> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut opened = self.open(offset);

        loop {
            let mut outcome = match opened {
                Ok(Opened::Void(tag)) => Ok(tag),
                Ok(Opened::Container(frame)) => {
                    if RAW_TEXT_ELEMENTS.contains(frame.tag_type.as_str()) {
                        self.close(frame)
                    } else {
                        let cursor = frame.cursor;
                        stack.push(frame);
                        opened = self.open(cursor);
                        continue;
                    }
                }
                Err(e) => Err(e),
            };

            // Hand the outcome to the innermost open element.  A child that
            // failed to parse means that element has no more children, so it
            // gets closed in turn and its own outcome goes up a level.
            loop {
                let mut parent = match stack.pop() {
                    Some(parent) => parent,
                    None => return outcome,
                };

                match outcome {
                    Ok(tag) => {
                        if tag.start > parent.cursor {
                            parent
                                .children
                                .push(Node::Text(self.html[parent.cursor..tag.start].to_string()));
                        }
                        parent.cursor = tag.end;
                        parent.children.push(Node::Tag(tag));
                        let cursor = parent.cursor;
                        stack.push(parent);
                        opened = self.open(cursor);
                        break;
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(_) => outcome = self.close(parent),
                }
            }
        }
    }

    /// Reads the opening tag found at or after `offset`.
    fn open(&mut self, offset: usize) -> Result<Opened, ParseError> {
        let (tag_type, start) = find_tag(self.html, offset)?;
        if let Some(e) = self.unterminated.get(&start) {
            return Err(e.clone());
        }

        let (raw, attr_end) = scan_attributes(self.html, start + tag_type.len() + 1)?;
        let attributes = normalize_tag_attributes(raw);
        let end = find_byte(self.html, b'>', attr_end)
            .map(|gt| gt + 1)
            .ok_or(ParseError::MalformedAttribute { offset: start })?;

        let self_closing = self.html.as_bytes()[end - 2] == b'/';
        if self_closing || VOID_ELEMENTS.contains(tag_type.as_str()) {
            log::trace!("void <{}> at {}..{}", tag_type, start, end);
            return Ok(Opened::Void(ParsedTag {
                tag_type,
                attributes,
                children: vec![],
                start,
                body_start: None,
                body_end: None,
                end,
            }));
        }

        Ok(Opened::Container(Frame {
            tag_type,
            attributes,
            start,
            body_start: end,
            children: vec![],
            cursor: end,
        }))
    }

    /// Finds the closing tag for `frame`, which has no more children.
    fn close(&mut self, mut frame: Frame) -> Result<ParsedTag, ParseError> {
        let body_end = match self.find_closing(&frame.tag_type, frame.cursor) {
            Some(pos) => pos,
            None => {
                log::trace!("unterminated <{}> at {}", frame.tag_type, frame.start);
                let e = ParseError::UnterminatedTag {
                    tag_type: frame.tag_type,
                    attributes: frame.attributes,
                    start: frame.start,
                    body_start: Some(frame.body_start),
                };
                self.unterminated.insert(frame.start, e.clone());
                return Err(e);
            }
        };

        if body_end > frame.cursor {
            frame
                .children
                .push(Node::Text(self.html[frame.cursor..body_end].to_string()));
        }

        let end = body_end + frame.tag_type.len() + 3;
        Ok(ParsedTag {
            tag_type: frame.tag_type,
            attributes: frame.attributes,
            children: frame.children,
            start: frame.start,
            body_start: Some(frame.body_start),
            body_end: Some(body_end),
            end,
        })
    }

    fn find_closing(&mut self, tag_type: &str, from: usize) -> Option<usize> {
        let pattern = format!("</{}>", tag_type);
        let bytes = self.html.as_bytes();

        let found = match self.closing_after.get(tag_type) {
            Some(&(known_from, next)) if from >= known_from && next.map_or(true, |n| from <= n) => {
                return next;
            }
            Some(&(known_from, next)) if from < known_from => {
                // Only a match starting before `known_from` can beat `next`.
                let limit = (known_from + pattern.len() - 1).min(bytes.len());
                find_bytes_ignore_ascii_case(&bytes[..limit], pattern.as_bytes(), from).or(next)
            }
            _ => find_bytes_ignore_ascii_case(bytes, pattern.as_bytes(), from),
        };

        self.closing_after.insert(tag_type.to_string(), (from, found));
        found
    }
}
