//! First-match-wins classification pass.

use std::borrow::Borrow;

use tracing::{debug, instrument};

use super::diff::{ClassificationDiff, ProposedChange};
use crate::config::DEFAULT_REGEX_SIZE_LIMIT;
use crate::rules::{matches_with_limit, ClassificationRule};
use crate::schema::FieldSet;

/// Compute the entity changes `rules` would make to `fields`.
///
/// For each field the rules are scanned in order and the first match decides
/// the candidate entity. Fields with no match, or whose stored entity already
/// equals the candidate, are left out. Neither input is modified, so the same
/// snapshot and rules always give the same diff.
pub fn classify<R: Borrow<ClassificationRule>>(fields: &FieldSet, rules: &[R]) -> ClassificationDiff {
    classify_with_limit(fields, rules, DEFAULT_REGEX_SIZE_LIMIT)
}

/// [`classify`] with an explicit regex compiled-size limit.
#[instrument(skip_all, fields(field_count = fields.len(), rule_count = rules.len()))]
pub fn classify_with_limit<R: Borrow<ClassificationRule>>(
    fields: &FieldSet,
    rules: &[R],
    regex_size_limit: usize,
) -> ClassificationDiff {
    let mut changes = Vec::new();

    for (key, def) in fields.iter() {
        let Some(rule) = rules
            .iter()
            .map(|r| <R as Borrow<ClassificationRule>>::borrow(r))
            .find(|rule| matches_with_limit(key, rule, regex_size_limit))
        else {
            continue;
        };

        if def.entity.is(rule.target_entity) {
            continue;
        }

        changes.push(ProposedChange {
            key: key.to_string(),
            previous: def.entity.clone(),
            entity: rule.target_entity,
            rule: rule.id.clone(),
        });
    }

    debug!(changes = changes.len(), "classification complete");
    ClassificationDiff::from_changes(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{default_rules, MatchType};
    use crate::schema::{Entity, FieldDefinition, FieldEntity};

    fn general_fields(keys: &[&str]) -> FieldSet {
        keys.iter()
            .map(|k| (*k, FieldDefinition::new(Entity::General)))
            .collect()
    }

    #[test]
    fn test_first_match_wins_over_specificity() {
        let rules = vec![
            ClassificationRule::starts_with("a", "m_", Entity::Mother),
            ClassificationRule::starts_with("b", "m_name", Entity::General),
        ];
        let fields = FieldSet::new().with_field("m_name", FieldDefinition::new(Entity::Child));

        let diff = classify(&fields, &rules);
        assert_eq!(diff.get("m_name"), Some(Entity::Mother));
        assert_eq!(diff.iter().next().unwrap().rule.as_str(), "a");
    }

    #[test]
    fn test_noop_reassignment_is_suppressed() {
        let rules = vec![ClassificationRule::starts_with("a", "m_", Entity::Mother)];
        let fields = FieldSet::new().with_field("m_name", FieldDefinition::new(Entity::Mother));

        assert!(classify(&fields, &rules).is_empty());
    }

    #[test]
    fn test_matching_rule_shadows_later_rules_even_when_noop() {
        // The first match decides, even if it changes nothing.
        let rules = vec![
            ClassificationRule::starts_with("a", "m_", Entity::Mother),
            ClassificationRule::new("b", MatchType::Contains, "name", Entity::Child),
        ];
        let fields = FieldSet::new().with_field("m_name", FieldDefinition::new(Entity::Mother));

        assert!(classify(&fields, &rules).is_empty());
    }

    #[test]
    fn test_empty_or_inactive_rules_give_empty_diff() {
        let fields = general_fields(&["m_name", "f_name"]);
        let none: Vec<ClassificationRule> = Vec::new();
        assert!(classify(&fields, &none).is_empty());

        let inactive: Vec<_> = default_rules().into_iter().map(|r| r.inactive()).collect();
        assert!(classify(&fields, &inactive).is_empty());
    }

    #[test]
    fn test_end_to_end_prefix_rules() {
        let rules = vec![
            ClassificationRule::starts_with("a", "m_", Entity::Mother),
            ClassificationRule::starts_with("b", "f_", Entity::Father),
        ];
        let fields = general_fields(&["m_name", "f_name", "x_name"]);

        let diff = classify(&fields, &rules);
        let request = diff.to_update_request();
        assert_eq!(request.len(), 2);
        assert_eq!(request["m_name"], Entity::Mother);
        assert_eq!(request["f_name"], Entity::Father);
        assert!(!request.contains_key("x_name"));
    }

    #[test]
    fn test_unassigned_and_unrecognized_fields_are_reassigned() {
        let rules = vec![ClassificationRule::new("g", MatchType::Contains, "note", Entity::General)];
        let mut unrecognized = FieldDefinition::unassigned();
        unrecognized.entity = FieldEntity::Unrecognized("witness".into());
        let fields = FieldSet::new()
            .with_field("note_a", FieldDefinition::unassigned())
            .with_field("note_b", unrecognized)
            .with_field("note_c", FieldDefinition::new(Entity::General));

        let diff = classify(&fields, &rules);
        let keys: Vec<_> = diff.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["note_a", "note_b"]);
        assert_eq!(
            diff.iter().nth(1).unwrap().previous,
            FieldEntity::Unrecognized("witness".into())
        );
    }

    #[test]
    fn test_classify_is_pure() {
        let rules = default_rules();
        let fields = general_fields(&["m_name", "c_dob", "b_phone", "other"]);
        let before = fields.clone();

        let first = classify(&fields, &rules);
        let second = classify(&fields, &rules);

        assert_eq!(first, second);
        assert_eq!(fields, before);
        assert_eq!(rules, default_rules());
    }

    #[test]
    fn test_accepts_borrowed_rules() {
        let rules = default_rules();
        let borrowed: Vec<&ClassificationRule> = rules.iter().collect();
        let fields = general_fields(&["r_office"]);

        assert_eq!(classify(&fields, &borrowed).get("r_office"), Some(Entity::Registrar));
    }
}
