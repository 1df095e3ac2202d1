//!
//! Common naming helpers.
//!
//! Everything the column mapper and the join layer need to reason about
//! names: camelCase to snake_case, accessor-prefix stripping, normalized
//! comparison forms, alias delimiter trimming and identifier legality.

use once_cell::sync::Lazy;
use regex::Regex;

pub static UNDERSCORE: &str = "_";
pub static EMPTY: &str = "";

/// Prefixes commonly carried by accessor-style field names.
static ACCESSOR_PREFIXES: &[&str] = &["get", "set", "has", "is"];

static FIELD_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

static SQL_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").unwrap());

/// Convert a camelCase or PascalCase name to snake_case.
/// Existing underscores are preserved, runs of capitals stay together
/// (`parseURLPart` -> `parse_url_part`).
pub fn snake_case(arg: &str) -> String {
    let chars = arg.chars().collect::<Vec<char>>();
    let mut out = String::with_capacity(arg.len() + 4);
    for (i, ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_numeric());
            let next_lower = i + 1 < chars.len() && chars[i + 1].is_lowercase();
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if prev_lower || (prev_upper && next_lower) {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(*ch);
        }
    }
    out
}

/// Strip accessor prefixes (`get`/`set`/`has`/`is` followed by an upper-case
/// letter) and field-decoration prefixes (`m_`, `_`, `$`).
pub fn strip_accessor_prefix(arg: &str) -> &str {
    for prefix in ACCESSOR_PREFIXES {
        if let Some(rest) = arg.strip_prefix(prefix) {
            if rest.starts_with(|c: char| c.is_uppercase()) {
                return rest;
            }
        }
    }
    if let Some(rest) = arg.strip_prefix("m_") {
        return rest;
    }
    if let Some(rest) = arg.strip_prefix('_') {
        return rest;
    }
    if let Some(rest) = arg.strip_prefix('$') {
        return rest;
    }
    arg
}

/// Normalized comparison form: lower-cased with underscores removed.
pub fn normalized(arg: &str) -> String {
    arg.chars()
        .filter(|c| *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Normalized form used by the edit-distance fallback: a leading boolean
/// `is_`/`is` marker is dropped before lower-casing and underscore removal.
pub fn normalized_for_distance(arg: &str) -> String {
    let arg = arg
        .strip_prefix("is_")
        .or_else(|| {
            arg.strip_prefix("is")
                .filter(|rest| rest.starts_with(|c: char| c.is_uppercase()))
        })
        .unwrap_or(arg);
    normalized(arg)
}

/// Trim surrounding quote and bracket delimiters from a declared alias,
/// e.g. `"dept_name"`, `'dept_name'` or `[dept_name]`.
pub fn trim_delimiters(arg: &str) -> &str {
    let arg = arg.trim();
    let trimmed = arg
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| arg.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .or_else(|| arg.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
        .or_else(|| arg.strip_prefix('[').and_then(|s| s.strip_suffix(']')));
    trimmed.unwrap_or(arg)
}

/// The stem of a boolean-style field name: `isActive` -> `Active`,
/// `has_children` -> `children`. Returns `None` for non-boolean names.
pub fn boolean_stem(arg: &str) -> Option<&str> {
    for prefix in ["is", "has", "can"] {
        if let Some(rest) = arg.strip_prefix(prefix) {
            if rest.starts_with(|c: char| c.is_uppercase()) {
                return Some(rest);
            }
            if let Some(rest) = rest.strip_prefix('_') {
                if !rest.is_empty() {
                    return Some(rest);
                }
            }
        }
    }
    None
}

/// Whether `arg` is a legal object-field identifier.
pub fn is_field_ident(arg: &str) -> bool {
    FIELD_IDENT.is_match(arg)
}

/// Whether `arg` is a legal unquoted identifier in the target schema.
pub fn is_sql_ident(arg: &str) -> bool {
    SQL_IDENT.is_match(arg)
}

/// Levenshtein edit distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a = a.chars().collect::<Vec<char>>();
    let b = b.chars().collect::<Vec<char>>();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev = (0..=b.len()).collect::<Vec<usize>>();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("createdAt"), "created_at");
        assert_eq!(snake_case("isActive"), "is_active");
        assert_eq!(snake_case("parseURLPart"), "parse_url_part");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("id"), "id");
    }

    #[test]
    fn test_strip_accessor_prefix() {
        assert_eq!(strip_accessor_prefix("getName"), "Name");
        assert_eq!(strip_accessor_prefix("isActive"), "Active");
        assert_eq!(strip_accessor_prefix("m_count"), "count");
        assert_eq!(strip_accessor_prefix("_hidden"), "hidden");
        assert_eq!(strip_accessor_prefix("$ref"), "ref");
        // `island` is not an accessor, the prefix is part of the word
        assert_eq!(strip_accessor_prefix("island"), "island");
    }

    #[test]
    fn test_normalized() {
        assert_eq!(normalized("Is_Active"), "isactive");
        assert_eq!(normalized_for_distance("is_active"), "active");
        assert_eq!(normalized_for_distance("isActive"), "active");
        assert_eq!(normalized_for_distance("display_name"), "displayname");
    }

    #[test]
    fn test_trim_delimiters() {
        assert_eq!(trim_delimiters("\"dept_name\""), "dept_name");
        assert_eq!(trim_delimiters("[dept_name]"), "dept_name");
        assert_eq!(trim_delimiters("`dept_name`"), "dept_name");
        assert_eq!(trim_delimiters("dept_name"), "dept_name");
        assert_eq!(trim_delimiters("\"unbalanced"), "\"unbalanced");
    }

    #[test]
    fn test_boolean_stem() {
        assert_eq!(boolean_stem("isActive"), Some("Active"));
        assert_eq!(boolean_stem("has_children"), Some("children"));
        assert_eq!(boolean_stem("canEdit"), Some("Edit"));
        assert_eq!(boolean_stem("island"), None);
        assert_eq!(boolean_stem("name"), None);
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_identifiers() {
        assert!(is_field_ident("dept_name"));
        assert!(!is_field_ident("dept-name"));
        assert!(!is_field_ident("1name"));
        assert!(is_sql_ident("t$payload"));
        assert!(!is_sql_ident("no spaces"));
    }
}
