//! Pure text transforms shared by every extraction path.
//!
//! All functions are fail-soft: input that does not match a pattern is
//! passed through unchanged, never rejected. The catalog templates emit
//! well-formed non-nested inline tags, so tag stripping does not need
//! nesting awareness.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[a-zA-Z0-9#]+;").expect("valid entity regex"));
static PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([:;,])\s*").expect("valid punctuation regex"));

/// Named entities observed in the catalog templates. `&middot;` is
/// intentionally absent; it only occurs inside label strings, which are
/// matched in their raw entity form.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&nbsp;", " "),
    ("&aacute;", "á"),
    ("&eacute;", "é"),
    ("&iacute;", "í"),
    ("&oacute;", "ó"),
    ("&uacute;", "ú"),
    ("&ntilde;", "ñ"),
    ("&ccedil;", "ç"),
    ("&egrave;", "è"),
    ("&agrave;", "à"),
    ("&igrave;", "ì"),
    ("&ograve;", "ò"),
    ("&ugrave;", "ù"),
    ("&uuml;", "ü"),
    ("&ldquo;", "\""),
    ("&rdquo;", "\""),
    ("&lsquo;", "'"),
    ("&rsquo;", "'"),
];

/// Removes every `<...>` markup span. A `<` with no closing `>` is kept
/// as-is.
#[must_use]
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Resolves named and numeric (`&#NN;`, `&#xHH;`) entities to their
/// characters. Unknown named entities and out-of-range numeric entities
/// pass through unchanged.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let entity = &caps[0];
            decode_one(entity).unwrap_or_else(|| entity.to_string())
        })
        .into_owned()
}

fn decode_one(entity: &str) -> Option<String> {
    // Interior of "&...;".
    let body = &entity[1..entity.len() - 1];

    if let Some(hex) = body.strip_prefix("#x") {
        let code = u32::from_str_radix(hex, 16).ok()?;
        return char::from_u32(code).map(String::from);
    }
    if let Some(dec) = body.strip_prefix('#') {
        let code = dec.parse::<u32>().ok()?;
        return char::from_u32(code).map(String::from);
    }

    let lower = entity.to_lowercase();
    NAMED_ENTITIES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, ch)| (*ch).to_string())
}

/// Collapses whitespace runs to a single space, normalizes spacing around
/// `:`, `;` and `,` to "symbol plus one space", and trims. Idempotent.
#[must_use]
pub fn clean_punctuation_spacing(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    PUNCT_RE
        .replace_all(&collapsed, "${1} ")
        .trim()
        .to_string()
}

/// Drops the statement of responsibility that catalog titles append after
/// the last `/`, then cleans punctuation spacing.
#[must_use]
pub fn normalize_title(text: &str) -> String {
    let trimmed = match text.rfind('/') {
        Some(idx) => &text[..idx],
        None => text,
    };
    clean_punctuation_spacing(trimmed)
}
