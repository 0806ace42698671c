//! Hiding `<textarea>` bodies from text-level rewriting.
//!
//! A textarea's body is literal text, so markup-looking content inside it
//! (`<div id="a">` typed by a user, say) must come through a rewrite
//! untouched.  [`shield`] swaps each such body for an opaque marker and
//! [`unshield`] puts the bodies back afterwards.

use crate::character_set::is_tag_name_byte;
use crate::strings::{find_byte, find_ignore_ascii_case, random_string};

const OPEN: &str = "<textarea";
const CLOSE: &str = "</textarea>";

/// The bodies taken out by [`shield`], in document order, keyed by the
/// marker that replaced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers(Vec<(String, String)>);

impl Markers {
    /// Whether nothing was shielded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of shielded bodies.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The `(marker, original body)` pairs, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(m, b)| (m.as_str(), b.as_str()))
    }
}

/// Replaces the body of every `<textarea>` containing a `<` with a unique
/// marker.  Bodies without a `<` are left in place.
///
/// An unterminated textarea stops the scan; it and everything after it is
/// left as is.
pub fn shield(html: &str) -> (String, Markers) {
    let mut markers = Markers::default();
    let mut out = String::new();
    let mut offset = 0;

    while let Some(pos) = find_ignore_ascii_case(html, OPEN, offset) {
        let after_name = pos + OPEN.len();
        if html
            .as_bytes()
            .get(after_name)
            .map_or(false, |&b| is_tag_name_byte(b))
        {
            // `<textareas>` or similar; not ours.
            out.push_str(&html[offset..after_name]);
            offset = after_name;
            continue;
        }

        let body_start = match find_byte(html, b'>', after_name) {
            Some(gt) => gt + 1,
            None => break,
        };
        let body_end = match find_ignore_ascii_case(html, CLOSE, body_start) {
            Some(close) => close,
            None => break,
        };
        let outer_end = body_end + CLOSE.len();
        let body = &html[body_start..body_end];

        if body.contains('<') {
            let marker = format!("{{marker:{}}}", random_string(16));
            out.push_str(&html[offset..body_start]);
            out.push_str(&marker);
            out.push_str(&html[body_end..outer_end]);
            markers.0.push((marker, body.to_string()));
        } else {
            out.push_str(&html[offset..outer_end]);
        }

        offset = outer_end;
    }

    out.push_str(&html[offset..]);
    (out, markers)
}

/// Puts shielded bodies back, in a single left-to-right pass.  A marker that
/// no longer appears (because the rewrite removed it) is skipped.
pub fn unshield(html: &str, markers: &Markers) -> String {
    if markers.is_empty() {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len());
    let mut offset = 0;

    for (marker, body) in markers.iter() {
        match html[offset..].find(marker) {
            Some(rel) => {
                let pos = offset + rel;
                out.push_str(&html[offset..pos]);
                out.push_str(body);
                offset = pos + marker.len();
            }
            None => log::debug!("textarea marker {} is gone; skipping", marker),
        }
    }

    out.push_str(&html[offset..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_bodies_with_markup() {
        let html = "<textarea>plain</textarea><TEXTAREA name=x><b>bold</b></TEXTAREA>";
        let (shielded, markers) = shield(html);
        assert_eq!(markers.len(), 1);

        let (marker, body) = markers.iter().next().unwrap();
        assert_eq!(body, "<b>bold</b>");
        assert_eq!(
            shielded,
            format!("<textarea>plain</textarea><TEXTAREA name=x>{}</TEXTAREA>", marker)
        );
        assert_eq!(unshield(&shielded, &markers), html);
    }

    #[test]
    fn markers_are_unique() {
        let (_, markers) = shield("<textarea><</textarea><textarea><</textarea>");
        let all = markers.iter().map(|(m, _)| m).collect::<Vec<_>>();
        assert_eq!(all.len(), 2);
        assert_ne!(all[0], all[1]);
    }

    #[test]
    fn untouched_without_textareas() {
        let html = "<div id=\"a\">x</div>";
        let (shielded, markers) = shield(html);
        assert!(markers.is_empty());
        assert_eq!(shielded, html);
        assert_eq!(unshield(html, &markers), html);
    }

    #[test]
    fn unterminated_textarea_stops_scan() {
        let html = "<textarea><b></textarea><textarea><i>";
        let (shielded, markers) = shield(html);
        assert_eq!(markers.len(), 1);
        assert!(shielded.ends_with("</textarea><textarea><i>"));
    }

    #[test]
    fn similar_names_are_ignored() {
        let html = "<textareas><b></textareas>";
        let (shielded, markers) = shield(html);
        assert!(markers.is_empty());
        assert_eq!(shielded, html);
    }

    #[test]
    fn missing_markers_are_skipped() {
        let (shielded, markers) = shield("<textarea><a></textarea><textarea><b></textarea>");
        let first = markers.iter().next().unwrap().0.to_string();
        let damaged = shielded.replacen(&first, "", 1);
        assert_eq!(
            unshield(&damaged, &markers),
            "<textarea></textarea><textarea><b></textarea>"
        );
    }
}
