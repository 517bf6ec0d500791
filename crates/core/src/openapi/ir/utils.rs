//! Common utilities for Rust code generation.
//!
//! Identifier checks, case conversion and literal escaping shared by naming,
//! codegen and emission.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Rust keywords (strict and reserved) that cannot be used as plain identifiers.
pub static RUST_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
        "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box",
        "do", "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual",
        "yield",
    ]
    .into_iter()
    .collect()
});

/// Check whether a name is a syntactically valid identifier: an ASCII letter or
/// underscore followed by ASCII alphanumerics or underscores.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Escape a string for use inside a Rust string literal.
pub fn escape_rust_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Escape a string for use as literal text inside a `format!` template.
pub fn escape_format_literal(s: &str) -> String {
    escape_rust_string(s).replace('{', "{{").replace('}', "}}")
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert a PascalCase or camelCase identifier to snake_case.
///
/// Acronym runs stay together: `GetHTTPStatus` becomes `get_http_status`.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Split on every non-alphanumeric character and capitalize each piece.
///
/// `pet-store v2` becomes `PetStoreV2`.
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(capitalize_first)
        .collect()
}

/// Sanitize a raw name into a snake_case Rust identifier.
/// - Non-alphanumeric characters become word separators
/// - Prepends `_` if it starts with a digit
/// - Appends `_` to keywords
pub fn sanitize_rust_identifier(name: &str) -> String {
    let words: Vec<String> = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(to_snake_case)
        .collect();

    let mut result = words.join("_");
    if result.is_empty() {
        return "_empty".to_string();
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result = format!("_{result}");
    }

    if RUST_KEYWORDS.contains(result.as_str()) {
        result.push('_');
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_foo"));
        assert!(is_identifier("Foo123"));
        assert!(is_identifier("createPet"));

        assert!(!is_identifier(""));
        assert!(!is_identifier("123foo"));
        assert!(!is_identifier("foo-bar"));
        assert!(!is_identifier("foo.bar"));
        assert!(!is_identifier("foo bar"));
        assert!(!is_identifier("$foo"));
    }

    #[test]
    fn test_escape_rust_string() {
        assert_eq!(escape_rust_string("hello"), "hello");
        assert_eq!(escape_rust_string("hel\"lo"), "hel\\\"lo");
        assert_eq!(escape_rust_string("hel\\lo"), "hel\\\\lo");
        assert_eq!(escape_rust_string("line\nbreak"), "line\\nbreak");
        assert_eq!(escape_rust_string("a\r\tb"), "a\\r\\tb");
    }

    #[test]
    fn test_escape_format_literal() {
        assert_eq!(escape_format_literal("/users"), "/users");
        assert_eq!(escape_format_literal("{id}"), "{{id}}");
        assert_eq!(escape_format_literal("a\"{b}"), "a\\\"{{b}}");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("foo"), "Foo");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("a"), "A");
        assert_eq!(capitalize_first("ABC"), "ABC");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("fooBar"), "foo_bar");
        assert_eq!(to_snake_case("FooBar"), "foo_bar");
        assert_eq!(to_snake_case("foo"), "foo");
        assert_eq!(to_snake_case("GetUserById"), "get_user_by_id");
        assert_eq!(to_snake_case("GetHTTPStatus"), "get_http_status");
        assert_eq!(to_snake_case("GetV2Users"), "get_v2_users");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("petstore"), "Petstore");
        assert_eq!(to_pascal_case("pet-store v2"), "PetStoreV2");
        assert_eq!(to_pascal_case("my_api"), "MyApi");
        assert_eq!(to_pascal_case("--"), "");
    }

    #[test]
    fn test_sanitize_rust_identifier() {
        assert_eq!(sanitize_rust_identifier("foo"), "foo");
        assert_eq!(sanitize_rust_identifier("userId"), "user_id");
        assert_eq!(sanitize_rust_identifier("foo-bar"), "foo_bar");
        assert_eq!(sanitize_rust_identifier("page[size]"), "page_size");
        assert_eq!(sanitize_rust_identifier("123foo"), "_123foo");
        assert_eq!(sanitize_rust_identifier("type"), "type_");
        assert_eq!(sanitize_rust_identifier("self"), "self_");
        assert_eq!(sanitize_rust_identifier("$"), "_empty");
    }
}
