//! Short printed codes derived from identifiers

/// Length of a full derived code
pub const CODE_LENGTH: usize = 6;

/// Printed when an identifier has no alphanumeric characters at all
pub const PLACEHOLDER_CODE: &str = "######";

/// Last [`CODE_LENGTH`] ASCII alphanumeric characters of `identifier`.
///
/// Identifiers with fewer alphanumerics yield a shorter code; an identifier
/// with none yields an empty string (see [`derive_code_or_placeholder`]).
pub fn derive_code(identifier: &str) -> String {
    let alphanumeric: Vec<char> = identifier
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let start = alphanumeric.len().saturating_sub(CODE_LENGTH);
    alphanumeric[start..].iter().collect()
}

/// Like [`derive_code`], substituting [`PLACEHOLDER_CODE`] for an empty result.
pub fn derive_code_or_placeholder(identifier: &str) -> String {
    let code = derive_code(identifier);
    if code.is_empty() {
        log::warn!(
            "Identifier {:?} has no alphanumeric characters, using {}",
            identifier,
            PLACEHOLDER_CODE
        );
        PLACEHOLDER_CODE.to_string()
    } else {
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_six_of_url() {
        assert_eq!(derive_code("https://example.com/item/AbC123xYz"), "123xYz");
        assert_eq!(derive_code("https://t.co/q?id=9f-8e_7d.6c"), "8e7d6c");
    }

    #[test]
    fn test_code_spans_separators() {
        // Runs are concatenated before taking the tail
        assert_eq!(derive_code("ab/cd/ef/gh"), "cdefgh");
    }

    #[test]
    fn test_short_and_empty_codes() {
        assert_eq!(derive_code("a-b"), "ab");
        assert_eq!(derive_code("///"), "");
        assert_eq!(derive_code_or_placeholder("///"), PLACEHOLDER_CODE);
        assert_eq!(derive_code_or_placeholder("x1"), "x1");
    }

    #[test]
    fn test_non_ascii_is_skipped() {
        assert_eq!(derive_code("héllo-wörld-42"), "wrld42");
    }

    #[test]
    fn test_full_length_property() {
        let samples = [
            "https://example.org/a/b/c/0123456789",
            "abcdef",
            "__A_B_C_D_E_F_G__",
            "https://shop.example/p/Z9?ref=qq77",
        ];
        for url in samples {
            let all: String = url.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            let code = derive_code(url);
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(all.ends_with(&code));
        }
    }
}
