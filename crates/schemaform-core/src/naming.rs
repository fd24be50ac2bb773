//! Identifier → display text helpers.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalogs::{ABBREVIATIONS, READ_MODEL_PREFIX, READ_MODEL_SUFFIX, SAVE_MODEL_PREFIX};

/// lowercase/digit followed by a capital: `productName` → `product Name`
static RE_LOWER_UPPER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

/// acronym followed by a word: `HTMLContent` → `HTML Content`
static RE_ACRONYM_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());

static RE_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_\-\s]+").unwrap());

/// Number field names that suggest a monetary amount.
static RE_CURRENCY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(price|cost|amount|total|fee|salary|balance|revenue)").unwrap()
});

/// Turn a field or model identifier into a human label.
pub fn format_label(name: &str) -> String {
    let spaced = RE_SEPARATORS.replace_all(name.trim(), " ");
    let spaced = RE_LOWER_UPPER.replace_all(&spaced, "$1 $2");
    let spaced = RE_ACRONYM_WORD.replace_all(&spaced, "$1 $2");

    spaced
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let word = if i == 0 { capitalize(word) } else { word.to_string() };
            let fixed = ABBREVIATIONS
                .get(capitalize(&word).as_str())
                .map(|abbr| abbr.to_string());
            fixed.unwrap_or(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn suggests_currency(field_name: &str) -> bool {
    RE_CURRENCY_NAME.is_match(field_name)
}

/// Read-model identifier with a leading `Query` and trailing `Model` removed.
pub fn model_stem(model_id: &str) -> &str {
    let mut stem = model_id;
    if let Some(rest) = stem.strip_prefix(READ_MODEL_PREFIX) {
        if rest.starts_with(|c: char| c.is_ascii_uppercase()) {
            stem = rest;
        }
    }
    if let Some(rest) = stem.strip_suffix(READ_MODEL_SUFFIX) {
        if !rest.is_empty() {
            stem = rest;
        }
    }
    stem
}

/// Replace the identifier's leading capitalized token with `Save`.
pub fn derive_save_model(model_id: &str) -> String {
    let boundary = model_id
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_ascii_uppercase())
        .map(|(i, _)| i);
    match boundary {
        Some(i) => format!("{SAVE_MODEL_PREFIX}{}", &model_id[i..]),
        None => format!("{SAVE_MODEL_PREFIX}{}", capitalize(model_id)),
    }
}

/// Naive English plural for entity labels.
pub fn pluralize(label: &str) -> String {
    let lower = label.to_ascii_lowercase();
    if lower.ends_with('y')
        && !lower.ends_with("ay")
        && !lower.ends_with("ey")
        && !lower.ends_with("oy")
        && !lower.ends_with("uy")
    {
        format!("{}ies", &label[..label.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        format!("{label}es")
    } else {
        format!("{label}s")
    }
}

/// Lowercase dash-separated id for a fieldset label.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;
    for c in label.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
