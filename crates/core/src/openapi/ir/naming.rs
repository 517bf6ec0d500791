//! Tool name derivation.
//!
//! A tool name comes from the operationId when one is declared, otherwise from
//! the HTTP method and the static path segments (`GET /users/{id}` becomes
//! `GetUserById`). Names are made unique per run by [`NameRegistry`].

use std::collections::HashSet;

use super::api::HttpMethod;
use super::utils::{capitalize_first, is_identifier, to_pascal_case, to_snake_case};

/// Base used when a path has no static segments.
const FALLBACK_BASE: &str = "Resource";

/// Derive the tool name for one operation. The result is always a valid
/// identifier.
pub fn resolve_tool_name(method: &HttpMethod, path: &str, operation_id: Option<&str>) -> String {
    if let Some(name) = operation_id.and_then(name_from_operation_id) {
        return name;
    }

    let base = path_base(path);
    let prefix = verb_prefix(method);

    if prefix == "Get" {
        if has_id_segment(path) {
            format!("Get{}ById", inflect_last_word(&base, singularize))
        } else {
            format!("Get{}", inflect_last_word(&base, pluralize))
        }
    } else {
        format!("{prefix}{}", inflect_last_word(&base, singularize))
    }
}

fn name_from_operation_id(operation_id: &str) -> Option<String> {
    let trimmed = operation_id.trim();
    if is_identifier(trimmed) {
        return Some(capitalize_first(trimmed));
    }

    let pascal = to_pascal_case(trimmed);
    if pascal.is_empty() {
        return None;
    }
    if pascal.starts_with(|c: char| c.is_ascii_digit()) {
        Some(format!("_{pascal}"))
    } else {
        Some(pascal)
    }
}

/// Static path segments, stripped to ASCII alphanumerics and capitalized.
fn path_base(path: &str) -> String {
    let base: String = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !is_template_segment(segment))
        .map(|segment| {
            let cleaned: String = segment.chars().filter(char::is_ascii_alphanumeric).collect();
            capitalize_first(&cleaned)
        })
        .collect();

    if base.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        base
    }
}

fn is_template_segment(segment: &str) -> bool {
    segment.contains('{')
}

fn has_id_segment(path: &str) -> bool {
    path.split('/')
        .filter(|segment| is_template_segment(segment))
        .any(|segment| segment.to_ascii_lowercase().contains("id"))
}

fn verb_prefix(method: &HttpMethod) -> String {
    match method {
        HttpMethod::Get => "Get".to_string(),
        HttpMethod::Post => "Create".to_string(),
        HttpMethod::Put | HttpMethod::Patch => "Update".to_string(),
        HttpMethod::Delete => "Delete".to_string(),
        HttpMethod::Custom(token) => capitalize_first(&token.to_ascii_lowercase()),
    }
}

/// Apply an inflection to the last word of a PascalCase name.
fn inflect_last_word(name: &str, inflect: fn(&str) -> String) -> String {
    let (head, last) = name.split_at(last_word_start(name));
    format!("{head}{}", inflect(last))
}

/// Byte offset of the last PascalCase word, using the same boundaries as
/// [`to_snake_case`].
fn last_word_start(name: &str) -> usize {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut start = 0;
    for (i, &(offset, c)) in chars.iter().enumerate() {
        if !c.is_ascii_uppercase() || i == 0 {
            continue;
        }
        let prev = chars[i - 1].1;
        let next = chars.get(i + 1).map(|&(_, n)| n);
        let boundary = prev.is_ascii_lowercase()
            || prev.is_ascii_digit()
            || (prev.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase()));
        if boundary {
            start = offset;
        }
    }
    start
}

/// Tracks claimed tool names and suffixes collisions with 2, 3, ...
///
/// Names are compared by their snake_case function identifier, so `GetUsers`
/// and `GETUsers` collide.
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name`, or the first free `name2`, `name3`, ... if it is taken.
    pub fn claim(&mut self, name: &str) -> String {
        if self.taken.insert(to_snake_case(name)) {
            return name.to_string();
        }
        let mut n: usize = 2;
        loop {
            let candidate = format!("{name}{n}");
            if self.taken.insert(to_snake_case(&candidate)) {
                return candidate;
            }
            n += 1;
        }
    }
}

// =============================================================================
// Inflection
// =============================================================================

/// Words with the same singular and plural form.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
    "data",
    "metadata",
];

/// (singular, plural) pairs the suffix rules get wrong.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("ox", "oxen"),
    ("quiz", "quizzes"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("index", "indices"),
    ("knife", "knives"),
    ("life", "lives"),
    ("wife", "wives"),
    ("leaf", "leaves"),
    ("half", "halves"),
    ("wolf", "wolves"),
    ("shelf", "shelves"),
    ("calf", "calves"),
    ("loaf", "loaves"),
    ("thief", "thieves"),
    ("hero", "heroes"),
    ("potato", "potatoes"),
    ("tomato", "tomatoes"),
    ("echo", "echoes"),
    ("movie", "movies"),
    ("cookie", "cookies"),
    ("cache", "caches"),
    ("niche", "niches"),
];

/// Singulars ending in `s` that pluralize with `es`.
const ES_BASES: &[&str] = &[
    "alias", "status", "bus", "campus", "virus", "bonus", "census", "canvas", "atlas", "gas",
];

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Keep the casing of `original` on a whole-word replacement.
fn match_case(original: &str, replacement: &str) -> String {
    if is_all_upper(original) {
        replacement.to_ascii_uppercase()
    } else if original.starts_with(|c: char| c.is_ascii_uppercase()) {
        capitalize_first(replacement)
    } else {
        replacement.to_string()
    }
}

fn is_all_upper(word: &str) -> bool {
    word.len() > 1 && !word.chars().any(|c| c.is_ascii_lowercase())
}

/// Drop `strip` trailing bytes and append `suffix` in the word's casing.
fn replace_suffix(word: &str, strip: usize, suffix: &str) -> String {
    let stem = &word[..word.len() - strip];
    if is_all_upper(word) {
        format!("{stem}{}", suffix.to_ascii_uppercase())
    } else {
        format!("{stem}{suffix}")
    }
}

/// Best-effort English singular form. Idempotent.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.len() <= 1 || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == lower) {
        return match_case(word, singular);
    }
    if ES_BASES.iter().any(|base| lower.ends_with(base)) {
        return word.to_string();
    }
    if ES_BASES.iter().any(|base| lower.ends_with(&format!("{base}es"))) {
        return replace_suffix(word, 2, "");
    }
    if lower.len() > 3 && lower.ends_with("ies") {
        return replace_suffix(word, 3, "y");
    }
    if ["xes", "ches", "shes", "sses", "zzes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return replace_suffix(word, 2, "");
    }
    if ["ss", "us", "is"].iter().any(|suffix| lower.ends_with(suffix)) {
        return word.to_string();
    }
    if lower.ends_with('s') {
        return replace_suffix(word, 1, "");
    }
    word.to_string()
}

/// Best-effort English plural form. Idempotent: a word that is already the
/// plural of its singular is returned unchanged.
pub fn pluralize(word: &str) -> String {
    let singular = singularize(word);
    if singular != word && raw_pluralize(&singular) == word {
        return word.to_string();
    }
    raw_pluralize(word)
}

fn raw_pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
        return word.to_string();
    }
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return replace_suffix(word, 0, "es");
    }
    let mut tail = lower.chars().rev();
    if tail.next() == Some('y') && tail.next().is_some_and(is_consonant) {
        return replace_suffix(word, 1, "ies");
    }
    replace_suffix(word, 0, "s")
}
