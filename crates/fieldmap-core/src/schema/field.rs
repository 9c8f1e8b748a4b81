//! Field definitions.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use super::entity::Entity;

/// The entity value a field definition currently holds.
///
/// Schemas come from outside, so the stored value is kept as-is instead of being
/// coerced: the classifier compares against exactly what the schema says, and
/// only the grouping view falls back to [`Entity::General`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldEntity {
    /// A recognized entity.
    Assigned(Entity),
    /// No entity recorded.
    #[default]
    Unassigned,
    /// A value outside the taxonomy, kept verbatim.
    Unrecognized(String),
}

impl FieldEntity {
    /// Interpret a raw wire value.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => FieldEntity::Unassigned,
            Some(name) => match Entity::parse(name) {
                Ok(entity) => FieldEntity::Assigned(entity),
                Err(_) => FieldEntity::Unrecognized(name.to_string()),
            },
        }
    }

    /// The entity this field is displayed under.
    pub fn effective(&self) -> Entity {
        match self {
            FieldEntity::Assigned(entity) => *entity,
            FieldEntity::Unassigned | FieldEntity::Unrecognized(_) => Entity::General,
        }
    }

    /// Whether the stored value is exactly `entity`.
    pub fn is(&self, entity: Entity) -> bool {
        matches!(self, FieldEntity::Assigned(current) if *current == entity)
    }

    /// Whether no entity is recorded.
    pub fn is_unassigned(&self) -> bool {
        matches!(self, FieldEntity::Unassigned)
    }
}

impl From<Entity> for FieldEntity {
    fn from(entity: Entity) -> Self {
        FieldEntity::Assigned(entity)
    }
}

impl fmt::Display for FieldEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldEntity::Assigned(entity) => write!(f, "{}", entity),
            FieldEntity::Unassigned => f.write_str("(none)"),
            FieldEntity::Unrecognized(raw) => write!(f, "{} (unrecognized)", raw),
        }
    }
}

impl Serialize for FieldEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldEntity::Assigned(entity) => serializer.serialize_str(entity.as_str()),
            FieldEntity::Unassigned => serializer.serialize_none(),
            FieldEntity::Unrecognized(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for FieldEntity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(FieldEntity::from_raw(raw.as_deref()))
    }
}

/// One form field as supplied by the schema provider.
///
/// Only `entity`, `group` and `order` are interpreted. Every other attribute is
/// carried through untouched so an updated schema can be written back. Keys
/// given as an explicit `null` are written back as `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "FieldDefinitionWire", into = "FieldDefinitionWire")]
pub struct FieldDefinition {
    /// Current entity assignment.
    pub entity: FieldEntity,
    /// Opaque grouping tag.
    pub group: Option<String>,
    /// Display position; missing sorts as 0.
    pub order: Option<Number>,
    /// Remaining schema attributes.
    pub attributes: Map<String, Value>,
    nulls: NullKeys,
}

/// Interpreted keys that were present in the source as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct NullKeys {
    entity: bool,
    group: bool,
    order: bool,
}

/// On-disk shape: `None` is an absent key, `Some(None)` an explicit `null`.
#[derive(Serialize, Deserialize)]
struct FieldDefinitionWire {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    entity: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    group: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    order: Option<Option<Number>>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn to_wire<T>(value: Option<T>, was_null: bool) -> Option<Option<T>> {
    match value {
        Some(value) => Some(Some(value)),
        None if was_null => Some(None),
        None => None,
    }
}

impl From<FieldDefinitionWire> for FieldDefinition {
    fn from(wire: FieldDefinitionWire) -> Self {
        let nulls = NullKeys {
            entity: matches!(wire.entity, Some(None)),
            group: matches!(wire.group, Some(None)),
            order: matches!(wire.order, Some(None)),
        };
        Self {
            entity: FieldEntity::from_raw(wire.entity.flatten().as_deref()),
            group: wire.group.flatten(),
            order: wire.order.flatten(),
            attributes: wire.attributes,
            nulls,
        }
    }
}

impl From<FieldDefinition> for FieldDefinitionWire {
    fn from(def: FieldDefinition) -> Self {
        let entity = match def.entity {
            FieldEntity::Assigned(entity) => Some(entity.as_str().to_string()),
            FieldEntity::Unassigned => None,
            FieldEntity::Unrecognized(raw) => Some(raw),
        };
        Self {
            entity: to_wire(entity, def.nulls.entity),
            group: to_wire(def.group, def.nulls.group),
            order: to_wire(def.order, def.nulls.order),
            attributes: def.attributes,
        }
    }
}

impl FieldDefinition {
    /// Create a definition assigned to `entity`.
    pub fn new(entity: Entity) -> Self {
        Self {
            entity: FieldEntity::Assigned(entity),
            ..Default::default()
        }
    }

    /// Create a definition with no entity recorded.
    pub fn unassigned() -> Self {
        Self::default()
    }

    /// Set the group tag.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the display order.
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(Number::from(order));
        self
    }

    /// Set an extra schema attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sort key for display ordering.
    pub fn order_key(&self) -> f64 {
        self.order.as_ref().and_then(Number::as_f64).unwrap_or(0.0)
    }

    /// The entity this field is displayed under.
    pub fn effective_entity(&self) -> Entity {
        self.entity.effective()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_entity_from_raw() {
        assert_eq!(FieldEntity::from_raw(Some("mother")), FieldEntity::Assigned(Entity::Mother));
        assert_eq!(FieldEntity::from_raw(None), FieldEntity::Unassigned);
        assert_eq!(
            FieldEntity::from_raw(Some("aunt")),
            FieldEntity::Unrecognized("aunt".into())
        );
    }

    #[test]
    fn test_effective_entity_falls_back_to_general() {
        assert_eq!(FieldEntity::Assigned(Entity::Father).effective(), Entity::Father);
        assert_eq!(FieldEntity::Unassigned.effective(), Entity::General);
        assert_eq!(FieldEntity::Unrecognized("aunt".into()).effective(), Entity::General);
    }

    #[test]
    fn test_is_compares_stored_value() {
        assert!(FieldEntity::Assigned(Entity::General).is(Entity::General));
        assert!(!FieldEntity::Unassigned.is(Entity::General));
        assert!(!FieldEntity::Unrecognized("general ".into()).is(Entity::General));
    }

    #[test]
    fn test_definition_builder() {
        let def = FieldDefinition::new(Entity::Child)
            .with_group("birth")
            .with_order(3)
            .with_attribute("label", "Date of birth");

        assert_eq!(def.effective_entity(), Entity::Child);
        assert_eq!(def.group.as_deref(), Some("birth"));
        assert_eq!(def.order_key(), 3.0);
        assert_eq!(def.attributes.get("label"), Some(&json!("Date of birth")));
        assert_eq!(FieldDefinition::unassigned().order_key(), 0.0);
    }

    #[test]
    fn test_deserialize_keeps_extra_attributes() {
        let def: FieldDefinition = serde_json::from_value(json!({
            "entity": "informant",
            "order": 2.5,
            "type": "text",
            "required": true
        }))
        .unwrap();

        assert_eq!(def.entity, FieldEntity::Assigned(Entity::Informant));
        assert_eq!(def.group, None);
        assert_eq!(def.order_key(), 2.5);
        assert_eq!(def.attributes.get("type"), Some(&json!("text")));

        let back = serde_json::to_value(&def).unwrap();
        assert_eq!(
            back,
            json!({"entity": "informant", "order": 2.5, "type": "text", "required": true})
        );
    }

    #[test]
    fn test_deserialize_unknown_and_null_entity() {
        let def: FieldDefinition = serde_json::from_value(json!({"entity": "witness"})).unwrap();
        assert_eq!(def.entity, FieldEntity::Unrecognized("witness".into()));
        assert_eq!(serde_json::to_value(&def).unwrap(), json!({"entity": "witness"}));

        let def: FieldDefinition = serde_json::from_value(json!({"entity": null})).unwrap();
        assert!(def.entity.is_unassigned());

        let def: FieldDefinition = serde_json::from_value(json!({})).unwrap();
        assert!(def.entity.is_unassigned());
    }

    #[test]
    fn test_explicit_nulls_are_written_back() {
        let source = json!({"entity": null, "group": null, "order": null, "label": "A"});
        let def: FieldDefinition = serde_json::from_value(source.clone()).unwrap();

        assert!(def.entity.is_unassigned());
        assert_eq!(def.group, None);
        assert_eq!(def.order_key(), 0.0);
        assert_eq!(serde_json::to_value(&def).unwrap(), source);

        // Absent keys stay absent.
        let def: FieldDefinition = serde_json::from_value(json!({"label": "B"})).unwrap();
        assert_eq!(serde_json::to_value(&def).unwrap(), json!({"label": "B"}));
    }

    #[test]
    fn test_assigned_value_replaces_explicit_null() {
        let mut def: FieldDefinition =
            serde_json::from_value(json!({"entity": null, "group": null})).unwrap();
        def.entity = FieldEntity::Assigned(Entity::Mother);

        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({"entity": "mother", "group": null})
        );
    }
}
