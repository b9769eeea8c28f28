use regex::{Regex, RegexBuilder};
use shared_types::CalculationTarget;
use tracing::warn;

/// A compiled party pattern.
///
/// Patterns that are not valid regular expressions are matched as literal
/// text, ignoring case.
#[derive(Debug, Clone)]
pub struct PartyMatcher {
    pattern: String,
    kind: MatcherKind,
}

#[derive(Debug, Clone)]
enum MatcherKind {
    Regex(Regex),
    Literal(Regex),
    /// Lower-cased needle, used only if the escaped literal exceeds the
    /// regex size limit
    Substring(String),
}

impl PartyMatcher {
    pub fn compile(pattern: &str) -> Self {
        let kind = match Regex::new(pattern) {
            Ok(regex) => MatcherKind::Regex(regex),
            Err(e) => {
                warn!(pattern, error = %e, "Invalid pattern, matching it as literal text");
                match RegexBuilder::new(&regex::escape(pattern))
                    .case_insensitive(true)
                    .build()
                {
                    Ok(regex) => MatcherKind::Literal(regex),
                    Err(_) => MatcherKind::Substring(pattern.to_lowercase()),
                }
            }
        };

        Self {
            pattern: pattern.to_string(),
            kind,
        }
    }

    pub fn is_match(&self, value: &str) -> bool {
        match &self.kind {
            MatcherKind::Regex(regex) | MatcherKind::Literal(regex) => regex.is_match(value),
            MatcherKind::Substring(needle) => value.to_lowercase().contains(needle.as_str()),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True when the pattern failed to compile and is matched literally
    pub fn is_literal_fallback(&self) -> bool {
        !matches!(self.kind, MatcherKind::Regex(_))
    }
}

/// Decides who an expenditure belongs to. The owner pattern is checked
/// first, so a value matching both patterns is the owner's.
pub fn classify(value: &str, owner: &PartyMatcher, spouse: &PartyMatcher) -> CalculationTarget {
    if owner.is_match(value) {
        CalculationTarget::Owner
    } else if spouse.is_match(value) {
        CalculationTarget::Spouse
    } else {
        CalculationTarget::Shared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_pattern() {
        let matcher = PartyMatcher::compile("夫|主人");
        assert!(!matcher.is_literal_fallback());
        assert!(matcher.is_match("夫カード"));
        assert!(matcher.is_match("ご主人"));
        assert!(!matcher.is_match("妻カード"));
    }

    #[test]
    fn test_regex_is_case_sensitive() {
        let matcher = PartyMatcher::compile("Amazon");
        assert!(matcher.is_match("Amazon.co.jp"));
        assert!(!matcher.is_match("AMAZON"));
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_literal() {
        let matcher = PartyMatcher::compile("(foo");
        assert!(matcher.is_literal_fallback());
        assert_eq!(matcher.pattern(), "(foo");
        assert!(matcher.is_match("bar (foo baz"));
        assert!(matcher.is_match("(FOO)"));
        assert!(!matcher.is_match("foo"));
    }

    #[test]
    fn test_literal_fallback_treats_metacharacters_literally() {
        let matcher = PartyMatcher::compile("a.b[");
        assert!(matcher.is_literal_fallback());
        assert!(matcher.is_match("xA.B[y"));
        assert!(!matcher.is_match("axb["));
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let matcher = PartyMatcher::compile("");
        assert!(matcher.is_match(""));
        assert!(matcher.is_match("anything"));
    }

    #[test]
    fn test_classify_precedence() {
        let owner = PartyMatcher::compile("食費");
        let spouse = PartyMatcher::compile("趣味");

        assert_eq!(classify("食費", &owner, &spouse), CalculationTarget::Owner);
        assert_eq!(classify("趣味", &owner, &spouse), CalculationTarget::Spouse);
        assert_eq!(classify("食費と趣味", &owner, &spouse), CalculationTarget::Owner);
        assert_eq!(classify("住居", &owner, &spouse), CalculationTarget::Shared);
    }
}
