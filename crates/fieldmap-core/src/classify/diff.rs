//! Classification results.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::rules::RuleId;
use crate::schema::{Entity, FieldEntity};

/// A single proposed reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedChange {
    /// Field key.
    pub key: String,
    /// Value currently stored in the schema.
    pub previous: FieldEntity,
    /// Entity the first matching rule assigns.
    pub entity: Entity,
    /// The rule that matched.
    pub rule: RuleId,
}

/// Whether a classification would change anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStatus {
    /// Every matched field already has its target entity.
    Unchanged,
    /// This many fields would be reassigned.
    Pending(usize),
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffStatus::Unchanged => f.write_str("no fields need regrouping (already correctly grouped)"),
            DiffStatus::Pending(1) => f.write_str("1 field will be regrouped"),
            DiffStatus::Pending(n) => write!(f, "{} fields will be regrouped", n),
        }
    }
}

/// The fields whose entity would change, in field-set order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassificationDiff {
    changes: Vec<ProposedChange>,
}

impl ClassificationDiff {
    pub(crate) fn from_changes(changes: Vec<ProposedChange>) -> Self {
        Self { changes }
    }

    /// Number of reassigned fields.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether nothing would change.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Summary status.
    pub fn status(&self) -> DiffStatus {
        if self.changes.is_empty() {
            DiffStatus::Unchanged
        } else {
            DiffStatus::Pending(self.changes.len())
        }
    }

    /// Proposed changes in field-set order.
    pub fn iter(&self) -> impl Iterator<Item = &ProposedChange> {
        self.changes.iter()
    }

    /// The proposed entity for `key`, if it would change.
    pub fn get(&self, key: &str) -> Option<Entity> {
        self.changes.iter().find(|c| c.key == key).map(|c| c.entity)
    }

    /// `(key, entity)` pairs for a bulk update.
    pub fn updates(&self) -> impl Iterator<Item = (&str, Entity)> + Clone {
        self.changes.iter().map(|c| (c.key.as_str(), c.entity))
    }

    /// The bulk-update request handed to the persistence collaborator.
    pub fn to_update_request(&self) -> BTreeMap<String, Entity> {
        self.updates().map(|(k, e)| (k.to_string(), e)).collect()
    }
}

impl<'a> IntoIterator for &'a ClassificationDiff {
    type Item = &'a ProposedChange;
    type IntoIter = std::slice::Iter<'a, ProposedChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(key: &str, entity: Entity) -> ProposedChange {
        ProposedChange {
            key: key.into(),
            previous: FieldEntity::Assigned(Entity::General),
            entity,
            rule: RuleId::from("rule-1"),
        }
    }

    #[test]
    fn test_status() {
        assert_eq!(ClassificationDiff::default().status(), DiffStatus::Unchanged);
        let diff = ClassificationDiff::from_changes(vec![change("m_a", Entity::Mother)]);
        assert_eq!(diff.status(), DiffStatus::Pending(1));
        assert_eq!(diff.status().to_string(), "1 field will be regrouped");
        assert_eq!(DiffStatus::Pending(3).to_string(), "3 fields will be regrouped");
    }

    #[test]
    fn test_update_request() {
        let diff = ClassificationDiff::from_changes(vec![
            change("m_a", Entity::Mother),
            change("f_a", Entity::Father),
        ]);

        assert_eq!(diff.get("f_a"), Some(Entity::Father));
        assert_eq!(diff.get("x"), None);

        let request = diff.to_update_request();
        assert_eq!(request.len(), 2);
        assert_eq!(request["m_a"], Entity::Mother);
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"f_a":"father","m_a":"mother"}"#
        );
    }
}
