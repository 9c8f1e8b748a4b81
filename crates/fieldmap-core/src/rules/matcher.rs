//! Rule matching against field keys.

use regex::RegexBuilder;
use tracing::debug;

use super::rule::{ClassificationRule, MatchType};
use crate::config::DEFAULT_REGEX_SIZE_LIMIT;

/// Check whether `field_key` matches `rule`.
///
/// Literal match types compare lowercased key and pattern. Regex rules are
/// compiled case-insensitively and searched anywhere in the original key. A
/// regex that fails to compile matches nothing.
pub fn matches(field_key: &str, rule: &ClassificationRule) -> bool {
    matches_with_limit(field_key, rule, DEFAULT_REGEX_SIZE_LIMIT)
}

/// [`matches`] with an explicit compiled-size limit for regex rules.
pub fn matches_with_limit(field_key: &str, rule: &ClassificationRule, regex_size_limit: usize) -> bool {
    if !rule.is_effective() {
        return false;
    }

    let key = || field_key.to_lowercase();
    let pattern = || rule.pattern.to_lowercase();
    match rule.match_type {
        MatchType::StartsWith => key().starts_with(&pattern()),
        MatchType::EndsWith => key().ends_with(&pattern()),
        MatchType::Contains => key().contains(&pattern()),
        MatchType::Equals => key() == pattern(),
        MatchType::Regex => regex_match(field_key, rule, regex_size_limit),
    }
}

fn regex_match(field_key: &str, rule: &ClassificationRule, size_limit: usize) -> bool {
    match RegexBuilder::new(&rule.pattern)
        .case_insensitive(true)
        .size_limit(size_limit)
        .build()
    {
        Ok(re) => re.is_match(field_key),
        Err(e) => {
            debug!(rule = %rule.id, pattern = %rule.pattern, error = %e, "regex rule does not compile, treating as no match");
            false
        }
    }
}
