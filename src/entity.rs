//! HTML character reference decoding and escaping.

use std::borrow::Cow;
use std::char;
use std::cmp::min;

include!(concat!(env!("OUT_DIR"), "/entitydata.rs"));

const MAX_DIGITS: usize = 8;

/// Decodes a single character reference at the start of `text`, which is
/// positioned just after the `&`.  Returns the decoded text and the number of
/// bytes consumed, including the terminating `;`.
pub fn unescape(text: &str) -> Option<(Cow<'static, str>, usize)> {
    let bytes = text.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'#' {
        let mut codepoint: u32 = 0;
        let mut i;

        let num_digits = if bytes[1].is_ascii_digit() {
            i = 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                codepoint = (codepoint * 10) + (bytes[i] - b'0') as u32;
                codepoint = min(codepoint, 0x11_0000);
                i += 1;
            }
            i - 1
        } else if bytes[1] == b'x' || bytes[1] == b'X' {
            i = 2;
            while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                codepoint = (codepoint * 16) + (bytes[i] as char).to_digit(16).unwrap_or(0);
                codepoint = min(codepoint, 0x11_0000);
                i += 1;
            }
            i - 2
        } else {
            return None;
        };

        if (1..=MAX_DIGITS).contains(&num_digits) && i < bytes.len() && bytes[i] == b';' {
            if codepoint == 0 || (0xD800..=0xDFFF).contains(&codepoint) || codepoint >= 0x11_0000 {
                codepoint = 0xFFFD;
            }
            let ch = char::from_u32(codepoint).unwrap_or('\u{FFFD}');
            return Some((Cow::Owned(ch.to_string()), i + 1));
        }
        return None;
    }

    let size = min(bytes.len(), entitydata::MAX_NAME_LENGTH + 1);
    for i in 1..size {
        match bytes[i] {
            b';' => return lookup(&text[..i]).map(|e| (Cow::Borrowed(e), i + 1)),
            b if b.is_ascii_alphanumeric() => (),
            _ => return None,
        }
    }

    None
}

fn lookup(name: &str) -> Option<&'static str> {
    entitydata::TRANSLATED_ENTITIES.get(name).copied()
}

/// Decodes every well-formed, semicolon-terminated character reference in
/// `src`.  Anything that isn't one is left alone, `&` included.
pub fn unescape_html(src: &str) -> Cow<'_, str> {
    let Some(first) = src.find('&') else {
        return Cow::Borrowed(src);
    };

    let mut v = String::with_capacity(src.len());
    v.push_str(&src[..first]);
    let mut i = first;
    let size = src.len();

    while i < size {
        let org = i;
        while i < size && src.as_bytes()[i] != b'&' {
            i += 1;
        }

        if i > org {
            v.push_str(&src[org..i]);
        }

        if i >= size {
            break;
        }

        i += 1;
        match unescape(&src[i..]) {
            Some((chs, len)) => {
                v.push_str(&chs);
                i += len;
            }
            None => v.push('&'),
        }
    }

    Cow::Owned(v)
}

/// Escapes the five characters that are unsafe inside a quoted attribute
/// value or text content.  Existing references are escaped again.
pub fn escape(src: &str) -> Cow<'_, str> {
    let needs = |b: u8| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\'');
    if !src.bytes().any(needs) {
        return Cow::Borrowed(src);
    }

    let mut v = String::with_capacity(src.len() + 16);
    let mut org = 0;
    for (i, b) in src.bytes().enumerate() {
        let replacement = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#039;",
            _ => continue,
        };
        v.push_str(&src[org..i]);
        v.push_str(replacement);
        org = i + 1;
    }
    v.push_str(&src[org..]);
    Cow::Owned(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_numeric() {
        assert_eq!(unescape_html("a &amp; b"), "a & b");
        assert_eq!(unescape_html("&lt;p&gt;"), "<p>");
        assert_eq!(unescape_html("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(unescape_html("&copy; 2024"), "\u{a9} 2024");
    }

    #[test]
    fn leaves_malformed_references() {
        assert_eq!(unescape_html("fish & chips"), "fish & chips");
        assert_eq!(unescape_html("&amp"), "&amp");
        assert_eq!(unescape_html("&nosuchthing;"), "&nosuchthing;");
        assert_eq!(unescape_html("&#;"), "&#;");
        assert_eq!(unescape_html("&#0;"), "\u{fffd}");
    }

    #[test]
    fn borrows_when_untouched() {
        assert!(matches!(unescape_html("plain"), Cow::Borrowed(_)));
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn escapes_specials() {
        assert_eq!(
            escape("<a href=\"x\">it's & more</a>"),
            "&lt;a href=&quot;x&quot;&gt;it&#039;s &amp; more&lt;/a&gt;"
        );
    }
}
