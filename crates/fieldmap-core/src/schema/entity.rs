//! Entity taxonomy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Semantic role a form field belongs to.
///
/// The variant order is the canonical section order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Entity {
    /// The registered child.
    Child,
    /// The child's mother.
    Mother,
    /// The child's father.
    Father,
    /// The person reporting the event.
    Informant,
    /// The registering officer.
    Registrar,
    /// Fallback for fields that belong to no person.
    #[default]
    General,
}

impl Entity {
    /// All entities in section order.
    pub const ALL: [Entity; 6] = [
        Entity::Child,
        Entity::Mother,
        Entity::Father,
        Entity::Informant,
        Entity::Registrar,
        Entity::General,
    ];

    /// Parse a wire name. Matching is exact: `"Mother"` is rejected.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name {
            "child" => Ok(Entity::Child),
            "mother" => Ok(Entity::Mother),
            "father" => Ok(Entity::Father),
            "informant" => Ok(Entity::Informant),
            "registrar" => Ok(Entity::Registrar),
            "general" => Ok(Entity::General),
            other => Err(Error::UnknownEntity(other.to_string())),
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Child => "child",
            Entity::Mother => "mother",
            Entity::Father => "father",
            Entity::Informant => "informant",
            Entity::Registrar => "registrar",
            Entity::General => "general",
        }
    }

    /// Human-readable section title.
    pub fn label(&self) -> &'static str {
        match self {
            Entity::Child => "Child",
            Entity::Mother => "Mother",
            Entity::Father => "Father",
            Entity::Informant => "Informant",
            Entity::Registrar => "Registrar",
            Entity::General => "General",
        }
    }

    /// Position in [`Entity::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Entity::parse(s)
    }
}

impl TryFrom<String> for Entity {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Entity::parse(&value)
    }
}

impl From<Entity> for &'static str {
    fn from(entity: Entity) -> Self {
        entity.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for entity in Entity::ALL {
            assert_eq!(Entity::parse(entity.as_str()).unwrap(), entity);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(
            Entity::parse("grandmother"),
            Err(Error::UnknownEntity(name)) if name == "grandmother"
        ));
        assert!(Entity::parse("Mother").is_err());
        assert!(Entity::parse("").is_err());
    }

    #[test]
    fn test_index_matches_section_order() {
        for (i, entity) in Entity::ALL.iter().enumerate() {
            assert_eq!(entity.index(), i);
        }
        assert_eq!(Entity::default(), Entity::General);
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(serde_json::to_string(&Entity::Informant).unwrap(), "\"informant\"");
        let entity: Entity = serde_json::from_str("\"registrar\"").unwrap();
        assert_eq!(entity, Entity::Registrar);
        assert!(serde_json::from_str::<Entity>("\"uncle\"").is_err());
    }
}
