//! Cleanup of extracted text.
//!
//! [`normalize`] runs a fixed sequence of passes over one definition or
//! heading string:
//!
//! 1. trim surrounding whitespace
//! 2. drop anything shaped like a tag (`<...>`), only if a `<` is present
//! 3. tighten parentheses: `( x )` becomes `(x)`
//! 4. drop whitespace before `, . ; : ! ?`
//! 5. collapse whitespace runs to one space
//! 6. decode character and entity references
//!
//! Entity decoding is last and single-pass, so `&amp;lt;` decodes to `&lt;`
//! and a decoded `<` is never stripped as markup.

use std::borrow::Cow;
use std::sync::LazyLock;

use memchr::memchr;
use quick_xml::escape::resolve_html5_entity;
use regex::Regex;

/// Matches `<...>` tag remnants
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Matches `(` followed by whitespace
static PAREN_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s+").unwrap());

/// Matches whitespace followed by `)`
static PAREN_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\)").unwrap());

/// Matches whitespace before sentence punctuation
static SPACE_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+([,.;:!?])").unwrap());

/// Matches any whitespace run
static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Longest entity name considered.
const MAX_ENTITY_NAME: usize = 32;

/// Named references that HTML also accepts without the trailing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Normalize a raw text fragment. See the module docs for the passes.
///
/// # Examples
///
/// ```
/// use wikidict::text::normalize;
///
/// assert_eq!(normalize("  casa ( f. ) , llar  "), "casa (f.), llar");
/// assert_eq!(normalize("<i>fish</i> &amp; chips"), "fish & chips");
/// ```
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut text: Cow<'_, str> = Cow::Borrowed(raw.trim());

    if memchr(b'<', text.as_bytes()).is_some() {
        text = Cow::Owned(TAG_RE.replace_all(&text, "").into_owned());
    }

    let text = PAREN_OPEN_RE.replace_all(&text, "(");
    let text = PAREN_CLOSE_RE.replace_all(&text, ")");
    let text = SPACE_PUNCT_RE.replace_all(&text, "$1");
    let text = MULTI_SPACE_RE.replace_all(&text, " ");

    decode_entities(&text).into_owned()
}

/// Decode numeric (`&#233;`, `&#xE9;`) and named (`&eacute;`) references.
///
/// Unknown or malformed references are left as written. Numeric references
/// may omit the trailing `;`. Named ones may too when they are among the
/// legacy HTML names (`&amp`, `&copy`), and the longest such prefix wins, so
/// `&copy2024` reads `©2024`. Code points in `0x80..=0x9F` are read as
/// Windows-1252, the way browsers treat them. Surrogates and values past
/// U+10FFFF become U+FFFD; control characters and noncharacters are dropped.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if memchr(b'&', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match decode_reference(tail) {
            Some((decoded, consumed)) => {
                decoded.push_to(&mut out);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

enum Decoded {
    Char(char),
    Str(&'static str),
}

impl Decoded {
    fn push_to(self, out: &mut String) {
        match self {
            Decoded::Char(c) => out.push(c),
            Decoded::Str(s) => out.push_str(s),
        }
    }
}

/// Decode the reference at the start of `tail` (which begins with `&`).
/// Returns the replacement and the number of bytes consumed.
fn decode_reference(tail: &str) -> Option<(Decoded, usize)> {
    let bytes = tail.as_bytes();
    if bytes.get(1) == Some(&b'#') {
        return decode_numeric(bytes);
    }

    let name_len = bytes[1..]
        .iter()
        .take(MAX_ENTITY_NAME)
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return None;
    }

    let name = &tail[1..1 + name_len];
    if bytes.get(1 + name_len) == Some(&b';')
        && let Some(decoded) = resolve_html5_entity(name)
    {
        return Some((Decoded::Str(decoded), name_len + 2));
    }

    (2..=name_len)
        .rev()
        .map(|len| &name[..len])
        .find(|prefix| LEGACY_ENTITIES.contains(prefix))
        .and_then(|prefix| {
            resolve_html5_entity(prefix).map(|s| (Decoded::Str(s), prefix.len() + 1))
        })
}

fn decode_numeric(bytes: &[u8]) -> Option<(Decoded, usize)> {
    let (radix, start) = match bytes.get(2) {
        Some(b'x' | b'X') => (16, 3),
        _ => (10, 2),
    };

    let digits = bytes[start..]
        .iter()
        .take_while(|b| (**b as char).is_digit(radix))
        .count();
    if digits == 0 {
        return None;
    }

    let value = bytes[start..start + digits]
        .iter()
        .try_fold(0u32, |acc, &b| {
            let digit = (b as char).to_digit(radix)?;
            acc.checked_mul(radix)?.checked_add(digit)
        })
        .unwrap_or(u32::MAX);

    let mut consumed = start + digits;
    if bytes.get(consumed) == Some(&b';') {
        consumed += 1;
    }

    Some((code_point(value), consumed))
}

fn code_point(value: u32) -> Decoded {
    if (0x80..=0x9F).contains(&value) {
        let byte = [value as u8];
        let (decoded, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(&byte);
        return Decoded::Char(decoded.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    match value {
        0 | 0xD800..=0xDFFF | 0x11_0000..=u32::MAX => Decoded::Char(char::REPLACEMENT_CHARACTER),
        v if is_dropped_code_point(v) => Decoded::Str(""),
        v => Decoded::Char(char::from_u32(v).unwrap_or(char::REPLACEMENT_CHARACTER)),
    }
}

/// C0 controls other than tab, newline, form feed and CR, DEL, and the
/// Unicode noncharacters.
fn is_dropped_code_point(value: u32) -> bool {
    matches!(value, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF)
        || value & 0xFFFE == 0xFFFE
}
