use crate::entity;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// Finds `needle` in `haystack` at or after `from`, ignoring ASCII case.
pub fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    find_bytes_ignore_ascii_case(haystack.as_bytes(), needle.as_bytes(), from)
}

pub fn find_bytes_ignore_ascii_case(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    let hay = haystack.get(from..)?;
    if needle.is_empty() {
        return Some(from);
    }
    if needle.len() > hay.len() {
        return None;
    }

    if needle[0] != b'<' {
        return hay
            .windows(needle.len())
            .position(|w| w.eq_ignore_ascii_case(needle))
            .map(|p| from + p);
    }

    let lt = jetscii::bytes!(b'<');
    let mut i = 0;
    while let Some(rel) = lt.find(&hay[i..]) {
        let pos = i + rel;
        if hay.len() - pos < needle.len() {
            return None;
        }
        if hay[pos..pos + needle.len()].eq_ignore_ascii_case(needle) {
            return Some(from + pos);
        }
        i = pos + 1;
    }
    None
}

/// Finds the first occurrence of `b` at or after `from`.
pub fn find_byte(haystack: &str, b: u8, from: usize) -> Option<usize> {
    haystack
        .as_bytes()
        .get(from..)?
        .iter()
        .position(|&c| c == b)
        .map(|p| from + p)
}

const RANDOM_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A random alphanumeric string of `len` characters.  Not suitable for
/// anything security-sensitive.
pub fn random_string(len: usize) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let state = RandomState::new();
    let mut out = String::with_capacity(len);
    while out.len() < len {
        let mut hasher = state.build_hasher();
        hasher.write_u64(COUNTER.fetch_add(1, Ordering::Relaxed));
        let mut bits = hasher.finish();
        // 62^10 < 2^64, so each hash is good for ten characters.
        for _ in 0..10 {
            if out.len() == len {
                break;
            }
            let ix = (bits % RANDOM_ALPHABET.len() as u64) as usize;
            out.push(RANDOM_ALPHABET[ix] as char);
            bits /= RANDOM_ALPHABET.len() as u64;
        }
    }
    out
}

lazy_static! {
    static ref WIDONT: Regex = Regex::new(r"(\S)\s+(\S+\s*)$").unwrap();
    static ref DOUBLE_ENCODED: Regex = Regex::new(r"&amp;(\w+);").unwrap();
    static ref CONDITIONAL_COMMENT: Regex =
        Regex::new(r"(?s)^<!--\[if (.*?)\]>(?:<!-->)?\n(.*)\n<!(?:--<!)?\[endif\]-->$").unwrap();
    static ref NOSCRIPT: Regex = Regex::new(r"(?s)^<noscript>(.*)</noscript>$").unwrap();
}

/// Joins the last word to the one before it with a non-breaking space, so a
/// heading never wraps with a single word on its final line.
///
/// ```
/// assert_eq!(tagsmith::widont("a tale of two cities"), "a tale of two&nbsp;cities");
/// ```
pub fn widont(s: &str) -> Cow<'_, str> {
    WIDONT.replace(s, "$1&nbsp;$2")
}

/// Undoes double encoding of character references: `&amp;lt;` becomes
/// `&lt;`.
pub fn decode_doubles(html: &str) -> Cow<'_, str> {
    DOUBLE_ENCODED.replace_all(html, "&$1;")
}

/// Replaces spaces with `%20`.
pub fn encode_spaces(s: &str) -> String {
    s.replace(' ', "%20")
}

/// Replaces `{key}` tokens in `html` with the HTML-encoded value for that
/// key.  Keys may be given with or without their braces.  Where keys overlap
/// the longest one wins, and replaced text is never rescanned.
pub fn encode_params(html: &str, params: &[(&str, &str)]) -> String {
    let mut tokens = params
        .iter()
        .map(|(k, v)| {
            (
                format!("{{{}}}", k.trim_matches(|c| c == '{' || c == '}')),
                entity::escape(v),
            )
        })
        .collect::<Vec<_>>();
    tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(html.len());
    let mut org = 0;
    let mut i = 0;
    while let Some(rel) = html[i..].find('{') {
        let pos = i + rel;
        match tokens.iter().find(|(k, _)| html[pos..].starts_with(k.as_str())) {
            Some((k, v)) => {
                out.push_str(&html[org..pos]);
                out.push_str(v);
                i = pos + k.len();
                org = i;
            }
            None => i = pos + 1,
        }
    }
    out.push_str(&html[org..]);
    out
}

/// Strips an IE conditional comment wrapper, returning the wrapped content
/// and the condition, if there was one.
pub fn unwrap_condition(content: &str) -> (&str, Option<&str>) {
    match CONDITIONAL_COMMENT.captures(content) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(condition), Some(inner)) => (inner.as_str(), Some(condition.as_str())),
            _ => (content, None),
        },
        None => (content, None),
    }
}

/// Strips a `<noscript>` wrapper, returning the wrapped content and whether
/// there was one.
pub fn unwrap_noscript(content: &str) -> (&str, bool) {
    match NOSCRIPT.captures(content).and_then(|caps| caps.get(1)) {
        Some(inner) => (inner.as_str(), true),
        None => (content, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn case_insensitive_search() {
        assert_eq!(find_ignore_ascii_case("<p>x</P>", "</p>", 0), Some(4));
        assert_eq!(find_ignore_ascii_case("<p>x</P>", "</p>", 5), None);
        assert_eq!(find_ignore_ascii_case("a<<</DIV >", "</div>", 0), None);
        assert_eq!(find_ignore_ascii_case("xTextArea", "textarea", 0), Some(1));
    }

    #[test]
    fn random_strings() {
        let a = random_string(10);
        let b = random_string(10);
        assert_eq!(a.len(), 10);
        assert!(a.bytes().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
        assert_eq!(random_string(25).len(), 25);
    }

    #[test]
    fn widont_single_word() {
        assert_eq!(widont("word"), "word");
        assert_eq!(widont("two words "), "two&nbsp;words ");
    }

    #[test]
    fn doubles() {
        assert_eq!(decode_doubles("&amp;lt; &amp; &amp;#039;"), "&lt; &amp; &amp;#039;");
    }

    #[test]
    fn params() {
        assert_eq!(
            encode_params(
                "<p>{name} says {greeting}{}</p>",
                &[("name", "<Bob>"), ("{greeting}", "\"hi\"")]
            ),
            "<p>&lt;Bob&gt; says &quot;hi&quot;{}</p>"
        );
        assert_eq!(encode_params("{a}{ab}", &[("a", "1"), ("ab", "2")]), "12");
    }

    #[test]
    fn conditions() {
        let wrapped = "<!--[if lt IE 9]>\n<script src=\"x.js\"></script>\n<![endif]-->";
        assert_eq!(
            unwrap_condition(wrapped),
            ("<script src=\"x.js\"></script>", Some("lt IE 9"))
        );
        assert_eq!(unwrap_condition("<p>hi</p>"), ("<p>hi</p>", None));
    }

    #[test]
    fn noscript() {
        assert_eq!(unwrap_noscript("<noscript><img></noscript>"), ("<img>", true));
        assert_eq!(unwrap_noscript("<img>"), ("<img>", false));
    }

    #[test]
    fn patterns_compile() {
        lazy_static::initialize(&WIDONT);
        lazy_static::initialize(&DOUBLE_ENCODED);
        lazy_static::initialize(&CONDITIONAL_COMMENT);
        lazy_static::initialize(&NOSCRIPT);
    }
}
