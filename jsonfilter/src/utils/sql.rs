//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Use this when building LIKE patterns from user input to prevent
/// unintended pattern matching. Pair with `ESCAPE '\'` in the SQL text.
///
/// # Example
///
/// ```
/// use jsonfilter::utils::sql::escape_like_pattern;
///
/// let user_input = "100% match_test";
/// assert_eq!(escape_like_pattern(user_input), "100\\% match\\_test");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Check that a name can be spliced into SQL text as an unquoted identifier
///
/// Accepts ASCII letters, digits and underscores, not starting with a digit.
pub fn is_safe_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check that a JSON object key can be placed inside a PostgreSQL text-array
/// path literal (`'{a,b}'`) without quoting
///
/// An unquoted `NULL` element is read as SQL NULL, not as the key "null".
pub fn is_safe_json_key(s: &str) -> bool {
    !s.is_empty()
        && !s.eq_ignore_ascii_case("null")
        && s.chars().all(|c| {
            !c.is_whitespace() && !matches!(c, '\'' | '"' | '\\' | '{' | '}' | ',' | ';')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern_no_special_chars() {
        assert_eq!(escape_like_pattern("hello"), "hello");
    }

    #[test]
    fn test_escape_like_pattern_percent() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
    }

    #[test]
    fn test_escape_like_pattern_underscore() {
        assert_eq!(escape_like_pattern("foo_bar"), "foo\\_bar");
    }

    #[test]
    fn test_escape_like_pattern_backslash() {
        assert_eq!(escape_like_pattern("path\\file"), "path\\\\file");
    }

    #[test]
    fn test_escape_like_pattern_multiple() {
        assert_eq!(escape_like_pattern("100%_\\test"), "100\\%\\_\\\\test");
    }

    #[test]
    fn test_is_safe_identifier() {
        assert!(is_safe_identifier("config"));
        assert!(is_safe_identifier("_meta2"));
        assert!(!is_safe_identifier(""));
        assert!(!is_safe_identifier("2fa"));
        assert!(!is_safe_identifier("config; DROP TABLE x"));
        assert!(!is_safe_identifier("a.b"));
    }

    #[test]
    fn test_is_safe_json_key() {
        assert!(is_safe_json_key("type"));
        assert!(is_safe_json_key("first-name"));
        assert!(is_safe_json_key("0"));
        assert!(!is_safe_json_key(""));
        assert!(!is_safe_json_key("it's"));
        assert!(!is_safe_json_key("a,b"));
        assert!(!is_safe_json_key("a}"));
        assert!(!is_safe_json_key("two words"));
        assert!(!is_safe_json_key("null"));
        assert!(!is_safe_json_key("NULL"));
        assert!(is_safe_json_key("nullable"));
    }
}
