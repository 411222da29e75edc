//! Key classification: which field names carry identifiers

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Default naming convention: `id` in its common casings, optionally
/// suffixing a word stem, with plural forms (`id`, `ID`, `userId`,
/// `userIDs`, `ids`, ...).
pub const DEFAULT_ID_PATTERN: &str = r"^\w*((id|iD)s?|(Id|Ids|ID(s|S)?))$";

fn default_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DEFAULT_ID_PATTERN).expect("default pattern compiles"))
}

/// Naming-pattern half of the classifier configuration.
#[derive(Debug, Clone, Default)]
pub enum KeyPattern {
    /// Use the built-in convention ([`DEFAULT_ID_PATTERN`]).
    #[default]
    Default,
    /// Disable name matching entirely; only the explicit key list
    /// classifies.
    Disabled,
    /// Use a caller-supplied pattern instead of the built-in one.
    Custom(Regex),
}

/// Decides whether a field name carries an identifier.
///
/// A key is identifier-bearing when the naming pattern (if enabled)
/// matches it, **or** when it appears in the explicit key list. The two
/// axes are independent and combine with logical OR; with the pattern
/// disabled and an empty list, no key ever matches.
///
/// A pure predicate over strings: no side effects, no failure modes.
#[derive(Debug, Clone)]
pub struct KeyMatcher {
    pattern: Option<Regex>,
    key_list: HashSet<String>,
}

impl Default for KeyMatcher {
    fn default() -> Self {
        Self::new(KeyPattern::Default, Vec::<String>::new())
    }
}

impl KeyMatcher {
    /// Build a matcher from the pattern configuration plus explicit key
    /// names.
    pub fn new<I, S>(pattern: KeyPattern, key_list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pattern = match pattern {
            KeyPattern::Default => Some(default_pattern().clone()),
            KeyPattern::Disabled => None,
            KeyPattern::Custom(re) => Some(re),
        };
        Self {
            pattern,
            key_list: key_list.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `key` should be treated as identifier-bearing.
    pub fn is_id_key(&self, key: &str) -> bool {
        if let Some(pattern) = &self.pattern {
            if pattern.is_match(key) {
                return true;
            }
        }
        self.key_list.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pattern_matches_common_id_keys() {
        let matcher = KeyMatcher::default();
        for key in ["id", "Id", "ID", "userId", "userID", "userid"] {
            assert!(matcher.is_id_key(key), "expected '{key}' to match");
        }
    }

    #[test]
    fn default_pattern_matches_plural_id_keys() {
        let matcher = KeyMatcher::default();
        for key in ["ids", "Ids", "IDs", "IDS", "userIds", "userIDs"] {
            assert!(matcher.is_id_key(key), "expected '{key}' to match");
        }
    }

    #[test]
    fn default_pattern_rejects_other_keys() {
        let matcher = KeyMatcher::default();
        for key in ["name", "entities", "identity", "users", "idx", "di"] {
            assert!(!matcher.is_id_key(key), "expected '{key}' not to match");
        }
    }

    #[test]
    fn custom_pattern_replaces_the_default() {
        let matcher = KeyMatcher::new(
            KeyPattern::Custom(Regex::new("user").unwrap()),
            Vec::<String>::new(),
        );
        assert!(matcher.is_id_key("user"));
        assert!(matcher.is_id_key("username"));
        assert!(!matcher.is_id_key("id"));
    }

    #[test]
    fn key_list_matches_with_pattern_disabled() {
        let matcher = KeyMatcher::new(KeyPattern::Disabled, ["user"]);
        assert!(matcher.is_id_key("user"));
        assert!(!matcher.is_id_key("id"));
    }

    #[test]
    fn key_list_is_or_combined_with_the_pattern() {
        let matcher = KeyMatcher::new(KeyPattern::Default, ["user"]);
        assert!(matcher.is_id_key("user"));
        assert!(matcher.is_id_key("id"));
    }

    #[test]
    fn disabled_pattern_and_empty_list_match_nothing() {
        let matcher = KeyMatcher::new(KeyPattern::Disabled, Vec::<String>::new());
        for key in ["id", "userId", "ids", "user", ""] {
            assert!(!matcher.is_id_key(key));
        }
    }

    #[test]
    fn key_list_matching_is_exact() {
        let matcher = KeyMatcher::new(KeyPattern::Disabled, ["user"]);
        assert!(!matcher.is_id_key("users"));
        assert!(!matcher.is_id_key("User"));
    }
}
