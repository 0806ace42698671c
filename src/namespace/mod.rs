//! Namespacing ids, input names and class names within a fragment.
//!
//! Markup from several sources often lands on one page, so each source's
//! ids (and optionally its classes) get a namespace prefix.  References to
//! those ids, in `for`/`href`/`aria-*` attributes, `url(#...)` calls and
//! `<style>` selectors, are rewritten to match.
//!
//! The passes work on text rather than on a parsed tree.  Textarea bodies
//! are [shielded](shield) for the duration.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::strings::random_string;

pub mod shield;

pub use self::shield::{shield, unshield, Markers};

lazy_static! {
    static ref PLACEHOLDER_ID: Regex = Regex::new(r"^__[A-Z_]+__").unwrap();
    static ref NON_ID_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.]+").unwrap();
    static ref INPUT_NAME: Regex = Regex::new(r#"([^'"\[\]]+)([^'"]*)"#).unwrap();
    static ref NAME_ATTRIBUTE: Regex =
        Regex::new(r#"(?i)(name=)(?:"([^'"\[\]]+)([^'"]*)"|'([^'"\[\]]+)([^'"]*)')"#).unwrap();
    static ref ID_ATTRIBUTE: Regex =
        Regex::new(r#"(?i)(\sid=)(?:"([^'"\s]*)"|'([^'"\s]*)')"#).unwrap();
    static ref REFERENCE_ATTRIBUTE: Regex = Regex::new(concat!(
        r"(?i)(\s)(for|list|xlink:href|href|aria-labelledby|aria-describedby|aria-controls",
        r"|data-target|data-reverse-target|data-target-prefix)",
        r#"=(?:"([^'"]+)"|'([^'"]+)')"#,
    ))
    .unwrap();
    static ref REFERENCE_DELIMITER: Regex = Regex::new(r"[,\s+]+").unwrap();
    static ref URL_REFERENCE: Regex = Regex::new(r#"(?i)(url\(#)([^'"\s)]*)\)"#).unwrap();
    static ref CLASS_ATTRIBUTE: Regex =
        Regex::new(r#"(?i)\bclass=(?:"([^'"]+)"|'([^'"]+)')"#).unwrap();
    static ref STYLE_BLOCK: Regex = Regex::new(r"(?is)(<style\b[^>]*>)(.*?)(</style>)").unwrap();
    static ref ID_SELECTOR: Regex = Regex::new(r"#([\w-]+)").unwrap();
    static ref CLASS_SELECTOR: Regex = Regex::new(r"\.([\w-]+)").unwrap();
}

/// Normalizes `s` into something usable as an element id.
///
/// Runs of characters other than ASCII letters, digits, `_` and `.` become a
/// single `-`, and leading or trailing dashes are trimmed.  If nothing is
/// left, a random 10-character id is generated.  Values that start with a
/// placeholder such as `__NAMESPACE__` are returned as they are.
///
/// ```
/// # use tagsmith::id;
/// assert_eq!(id("Hello, world!"), "Hello-world");
/// assert_eq!(id("__NAMESPACE__-field"), "__NAMESPACE__-field");
/// ```
pub fn id(s: &str) -> String {
    if PLACEHOLDER_ID.is_match(s) {
        return s.to_string();
    }

    let id = NON_ID_CHARS.replace_all(s, "-");
    let id = id.trim_matches('-');
    if id.is_empty() {
        random_string(10)
    } else {
        id.to_string()
    }
}

/// Namespaces an element id.  Without a namespace the id is only
/// normalized.
pub fn namespace_id(id_value: &str, namespace: Option<&str>) -> String {
    match namespace {
        None => id(id_value),
        Some(ns) => id(&format!("{}-{}", ns, id_value)),
    }
}

/// Namespaces an input name using bracket notation: `title` becomes
/// `ns[title]` and `fields[body]` becomes `ns[fields][body]`.
pub fn namespace_input_name(name: &str, namespace: Option<&str>) -> String {
    match namespace {
        None => name.to_string(),
        Some(ns) => INPUT_NAME
            .replace_all(name, |caps: &Captures| format!("{}[{}]{}", ns, &caps[1], &caps[2]))
            .into_owned(),
    }
}

/// Runs both [`namespace_inputs`] and [`namespace_attributes`] over `html`.
///
/// ```
/// # use tagsmith::namespace_html;
/// assert_eq!(
///     namespace_html("<label for=\"q\"></label><input id=\"q\" name=\"q\">", "search", false),
///     "<label for=\"search-q\"></label><input id=\"search-q\" name=\"search[q]\">",
/// );
/// ```
pub fn namespace_html(html: &str, namespace: &str, with_classes: bool) -> String {
    let (html, markers) = shield(html);
    let html = rewrite_input_names(&html, namespace);
    let html = rewrite_attributes(&html, namespace, with_classes);
    unshield(&html, &markers)
}

/// Namespaces the value of every `name` attribute, as
/// [`namespace_input_name`] does.  Names that start with a bracket are left
/// alone.
pub fn namespace_inputs(html: &str, namespace: &str) -> String {
    let (html, markers) = shield(html);
    let html = rewrite_input_names(&html, namespace);
    unshield(&html, &markers)
}

/// Namespaces `id` attributes and the things that refer to them.
///
/// This covers `for`, `list`, `href`, `xlink:href`, `aria-labelledby`,
/// `aria-describedby`, `aria-controls`, `data-target`,
/// `data-reverse-target` and `data-target-prefix` attributes, `url(#...)`
/// references, and id selectors inside `<style>` blocks.  With
/// `with_classes`, `class` attributes and class selectors are namespaced
/// too.
pub fn namespace_attributes(html: &str, namespace: &str, with_classes: bool) -> String {
    let (html, markers) = shield(html);
    let html = rewrite_attributes(&html, namespace, with_classes);
    unshield(&html, &markers)
}

fn rewrite_input_names(html: &str, namespace: &str) -> String {
    rewrite_matches(&NAME_ATTRIBUTE, html, |caps| {
        let start = caps.get(0).map_or(0, |m| m.start());
        if preceded_by(html, start, |c| is_word_char(c) || c == '-') {
            return None;
        }
        let (quote, name, rest) = match (caps.get(2), caps.get(3)) {
            (Some(name), Some(rest)) => ('"', name.as_str(), rest.as_str()),
            _ => ('\'', caps.get(4)?.as_str(), caps.get(5)?.as_str()),
        };
        Some(format!("{}{}{}[{}]{}{}", &caps[1], quote, namespace, name, rest, quote))
    })
}

fn rewrite_attributes(html: &str, namespace: &str, with_classes: bool) -> String {
    let ns = id(namespace);

    let mut ids = FxHashSet::default();
    let html = ID_ATTRIBUTE.replace_all(html, |caps: &Captures| {
        let (quote, value) = quoted(caps, 2, 3);
        ids.insert(value.to_string());
        format!("{}{}{}-{}{}", &caps[1], quote, ns, value, quote)
    });
    log::trace!("namespacing {} id(s) under {:?}", ids.len(), ns);

    let html = REFERENCE_ATTRIBUTE.replace_all(&html, |caps: &Captures| {
        let attribute = &caps[2];
        let (quote, value) = quoted(caps, 3, 4);
        format!(
            "{}{}={}{}{}",
            &caps[1],
            attribute,
            quote,
            rewrite_references(value, attribute, &ids, &ns),
            quote
        )
    });

    let html = URL_REFERENCE.replace_all(&html, |caps: &Captures| {
        if ids.contains(&caps[2]) {
            format!("{}{}-{})", &caps[1], ns, &caps[2])
        } else {
            caps[0].to_string()
        }
    });

    let html = if with_classes {
        rewrite_matches(&CLASS_ATTRIBUTE, &html, |caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            if preceded_by(&html, start, |c| is_word_char(c) || c == '-') {
                return None;
            }
            let (quote, value) = quoted(caps, 1, 2);
            let classes = value
                .split_whitespace()
                .map(|class| format!("{}-{}", ns, class))
                .collect::<Vec<_>>();
            Some(format!("class={}{}{}", quote, classes.join(" "), quote))
        })
    } else {
        html.into_owned()
    };

    STYLE_BLOCK
        .replace_all(&html, |caps: &Captures| {
            let css = rewrite_selectors(&caps[2], &ids, &ns, with_classes);
            format!("{}{}{}", &caps[1], css, &caps[3])
        })
        .into_owned()
}

/// Rewrites a list of id references such as `a b` or `#a,#b`.
fn rewrite_references(value: &str, attribute: &str, ids: &FxHashSet<String>, ns: &str) -> String {
    let always = attribute.eq_ignore_ascii_case("data-target-prefix");
    let is_href = attribute.eq_ignore_ascii_case("href");

    // Tokens alternate with the delimiters between them.
    let mut pieces: SmallVec<[&str; 8]> = SmallVec::new();
    let mut last = 0;
    for delimiter in REFERENCE_DELIMITER.find_iter(value) {
        pieces.push(&value[last..delimiter.start()]);
        pieces.push(delimiter.as_str());
        last = delimiter.end();
    }
    pieces.push(&value[last..]);

    let mut out = String::with_capacity(value.len() + ns.len() + 1);
    for (i, piece) in pieces.into_iter().enumerate() {
        if i % 2 == 1 || piece.is_empty() || piece.starts_with('.') {
            out.push_str(piece);
            continue;
        }

        let (hash, reference) = match piece.strip_prefix('#') {
            Some(rest) => ("#", rest),
            None => ("", piece),
        };
        out.push_str(hash);
        if ids.contains(reference) || always || (is_href && !hash.is_empty()) {
            out.push_str(ns);
            out.push('-');
        }
        out.push_str(reference);
    }
    out
}

fn rewrite_selectors(css: &str, ids: &FxHashSet<String>, ns: &str, with_classes: bool) -> String {
    let css = rewrite_matches(&ID_SELECTOR, css, |caps| {
        if !is_selector(css, caps, &[',', '{']) || !ids.contains(&caps[1]) {
            return None;
        }
        Some(format!("#{}-{}", ns, &caps[1]))
    });

    if !with_classes {
        return css;
    }

    rewrite_matches(&CLASS_SELECTOR, &css, |caps| {
        if !is_selector(&css, caps, &[',', ':', '{']) {
            return None;
        }
        Some(format!(".{}-{}", ns, &caps[1]))
    })
}

/// Whether a selector match stands on its own: not glued to a word or a
/// quote before it, and followed by whitespace or one of `follow`.
fn is_selector(css: &str, caps: &Captures<'_>, follow: &[char]) -> bool {
    match caps.get(0) {
        Some(m) => {
            !preceded_by(css, m.start(), |c| is_word_char(c) || c == '\'' || c == '"')
                && followed_by(css, m.end(), |c| c.is_whitespace() || follow.contains(&c))
        }
        None => false,
    }
}

/// Replaces each match of `re` in `text` for which `rewrite` returns a
/// replacement.  When `rewrite` declines a match, the search resumes one
/// character into it.
fn rewrite_matches<F>(re: &Regex, text: &str, mut rewrite: F) -> String
where
    F: FnMut(&Captures<'_>) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut at = 0;

    while at <= text.len() {
        let caps = match re.captures_at(text, at) {
            Some(caps) => caps,
            None => break,
        };
        let (start, end) = match caps.get(0) {
            Some(m) => (m.start(), m.end()),
            None => break,
        };

        match rewrite(&caps) {
            Some(replacement) => {
                out.push_str(&text[copied..start]);
                out.push_str(&replacement);
                copied = end;
                at = if end > start { end } else { next_char(text, end) };
            }
            None => at = next_char(text, start),
        }
    }

    out.push_str(&text[copied..]);
    out
}

/// Handles the alternation between a double-quoted value in group `double`
/// and a single-quoted one in group `single`.
fn quoted<'t>(caps: &Captures<'t>, double: usize, single: usize) -> (char, &'t str) {
    match caps.get(double) {
        Some(m) => ('"', m.as_str()),
        None => ('\'', caps.get(single).map_or("", |m| m.as_str())),
    }
}

fn preceded_by(text: &str, at: usize, pred: impl Fn(char) -> bool) -> bool {
    text[..at].chars().next_back().map_or(false, pred)
}

fn followed_by(text: &str, at: usize, pred: impl Fn(char) -> bool) -> bool {
    text[at..].chars().next().map_or(false, pred)
}

fn next_char(text: &str, at: usize) -> usize {
    at + text[at..].chars().next().map_or(1, char::len_utf8)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
