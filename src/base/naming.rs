//! Identifier transforms shared by every target.

use unicode_ident::{is_xid_continue, is_xid_start};

/// Prefix marking synthesized identifiers and logical keys.
pub const SYNTHETIC_PREFIX: char = '$';

/// Build a synthetic logical key, e.g. `synthetic("get:user") == "$get:user"`.
pub fn synthetic(key: &str) -> String {
    let mut s = String::with_capacity(key.len() + 1);
    s.push(SYNTHETIC_PREFIX);
    s.push_str(key);
    s
}

pub fn is_synthetic(name: &str) -> bool {
    name.starts_with(SYNTHETIC_PREFIX)
}

/// Error returned when a name cannot become a host-language identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidIdentifier(pub String);

/// Convert an IDL name into an exported CamelCase identifier.
///
/// `get_user_by_id` becomes `GetUserById`, `$getUser_args` becomes
/// `GetUserArgs`. An underscore is kept in front of a segment that starts with
/// a digit (`v_2` becomes `V_2`).
pub fn identify(raw: &str) -> Result<String, InvalidIdentifier> {
    let name = raw.trim_start_matches(SYNTHETIC_PREFIX);
    let mut out = String::with_capacity(name.len());

    for segment in name.split('_').filter(|s| !s.is_empty()) {
        let starts_with_digit = segment.starts_with(|c: char| c.is_ascii_digit());
        if starts_with_digit && !out.is_empty() {
            out.push('_');
        }
        out.push_str(&upper_first_rune(segment));
    }

    if is_valid_identifier(&out) {
        Ok(out)
    } else {
        Err(InvalidIdentifier(raw.to_string()))
    }
}

pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || is_xid_start(c) => chars.all(is_xid_continue),
        _ => false,
    }
}

pub fn upper_first_rune(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lower_first_rune(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `GetUserIP` → `get_user_ip`, `HTTP1Method` → `http1_method`.
pub fn snakify(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let mut out = String::with_capacity(id.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// `GetUserIP` → `getUserIp`, `Get_API` → `getApi`.
pub fn lower_camel_case(id: &str) -> String {
    let snake = snakify(id);
    let mut out = String::with_capacity(snake.len());
    for word in snake.split('_').filter(|w| !w.is_empty()) {
        if out.is_empty() {
            out.push_str(word);
        } else {
            out.push_str(&upper_first_rune(word));
        }
    }
    out
}

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type",
    "var",
];

pub fn is_go_keyword(s: &str) -> bool {
    GO_KEYWORDS.contains(&s)
}

/// Lower-case parameter name, escaped with `_` when it is a keyword.
pub fn parameter_name(identified: &str) -> String {
    let name = lower_first_rune(identified);
    if is_go_keyword(&name) {
        format!("_{name}")
    } else {
        name
    }
}

/// Identifier suffix for a field id; negative ids render as `_<abs>`.
pub fn id_suffix(id: i32) -> String {
    if id < 0 {
        format!("_{}", id.unsigned_abs())
    } else {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a", "a")]
    #[case("A", "a")]
    #[case("AB", "ab")]
    #[case("HTTPRequest", "http_request")]
    #[case("HTTP1Method", "http1_method")]
    #[case("GetUserIP", "get_user_ip")]
    fn test_snakify(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(snakify(input), expected);
    }

    #[rstest]
    #[case("a", "a")]
    #[case("A", "a")]
    #[case("AB", "ab")]
    #[case("HTTPRequest", "httpRequest")]
    #[case("HTTP1Method", "http1Method")]
    #[case("GetUserIP", "getUserIp")]
    #[case("GetAPI", "getApi")]
    #[case("Get_API", "getApi")]
    fn test_lower_camel_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(lower_camel_case(input), expected);
    }

    #[rstest]
    #[case("user", "User")]
    #[case("get_user_by_id", "GetUserById")]
    #[case("$getUser_args", "GetUserArgs")]
    #[case("v_2", "V_2")]
    #[case("_private", "Private")]
    fn test_identify(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(identify(input).unwrap(), expected);
    }

    #[test]
    fn test_identify_rejects_garbage() {
        assert!(identify("user-name").is_err());
        assert!(identify("").is_err());
        assert!(identify("1abc").is_err());
    }

    #[test]
    fn test_parameter_name_escapes_keywords() {
        assert_eq!(parameter_name("Type"), "_type");
        assert_eq!(parameter_name("UserId"), "userId");
    }

    #[test]
    fn test_id_suffix() {
        assert_eq!(id_suffix(3), "3");
        assert_eq!(id_suffix(-3), "_3");
    }

    #[test]
    fn test_synthetic_keys() {
        assert_eq!(synthetic("get:user"), "$get:user");
        assert!(is_synthetic("$Read"));
        assert!(!is_synthetic("Read"));
    }
}
