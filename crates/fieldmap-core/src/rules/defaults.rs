//! Built-in rule set.

use super::rule::{ClassificationRule, MatchType};
use crate::schema::Entity;

const DEFAULT_RULES: [(&str, &str, Entity); 5] = [
    ("rule-1", "m_", Entity::Mother),
    ("rule-2", "f_", Entity::Father),
    ("rule-3", "b_", Entity::Informant),
    ("rule-4", "r_", Entity::Registrar),
    ("rule-5", "c_", Entity::Child),
];

/// A fresh copy of the built-in prefix rules.
///
/// Every call builds new values; callers may edit the result freely.
pub fn default_rules() -> Vec<ClassificationRule> {
    DEFAULT_RULES
        .iter()
        .map(|&(id, pattern, entity)| ClassificationRule::new(id, MatchType::StartsWith, pattern, entity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = default_rules();
        let summary: Vec<_> = rules
            .iter()
            .map(|r| (r.id.as_str(), r.pattern.as_str(), r.target_entity))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("rule-1", "m_", Entity::Mother),
                ("rule-2", "f_", Entity::Father),
                ("rule-3", "b_", Entity::Informant),
                ("rule-4", "r_", Entity::Registrar),
                ("rule-5", "c_", Entity::Child),
            ]
        );
        assert!(rules.iter().all(|r| r.is_active && r.match_type == MatchType::StartsWith));
    }

    #[test]
    fn test_default_rules_are_independent_copies() {
        let mut first = default_rules();
        first[0].pattern = "edited".into();
        assert_eq!(default_rules()[0].pattern, "m_");
    }
}
