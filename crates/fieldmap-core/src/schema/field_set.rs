//! Keyed collection of field definitions.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::entity::Entity;
use super::field::{FieldDefinition, FieldEntity};
use crate::error::{Error, Result};

/// Field definitions keyed by field key, iterated in insertion order.
///
/// Serializes as a JSON object. Field order in the source document is kept,
/// along with every attribute and explicit `null`, so a schema that is loaded,
/// updated, and saved again only differs in the values that actually changed.
/// Within one definition `entity`, `group` and `order` are written first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    entries: Vec<(String, FieldDefinition)>,
    index: HashMap<String, usize>,
}

impl FieldSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of field definitions.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Insert a definition. An existing key keeps its position and the old
    /// definition is returned.
    pub fn insert(&mut self, key: impl Into<String>, def: FieldDefinition) -> Option<FieldDefinition> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, def)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, def));
                None
            }
        }
    }

    /// Builder-style insert.
    pub fn with_field(mut self, key: impl Into<String>, def: FieldDefinition) -> Self {
        self.insert(key, def);
        self
    }

    /// Look up a definition.
    pub fn get(&self, key: &str) -> Option<&FieldDefinition> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, definition)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Overwrite the entity of every listed key, or of none.
    ///
    /// All keys are checked before anything is written, so an unknown key leaves
    /// the set untouched.
    pub fn set_entities<'a, I>(&mut self, updates: I) -> Result<usize>
    where
        I: IntoIterator<Item = (&'a str, Entity)> + Clone,
    {
        if let Some((missing, _)) = updates.clone().into_iter().find(|(k, _)| !self.contains_key(k)) {
            return Err(Error::UnknownField(missing.to_string()));
        }

        let mut written = 0;
        for (key, entity) in updates {
            if let Some(&pos) = self.index.get(key) {
                self.entries[pos].1.entity = FieldEntity::Assigned(entity);
                written += 1;
            }
        }
        Ok(written)
    }
}

impl<K: Into<String>> FromIterator<(K, FieldDefinition)> for FieldSet {
    fn from_iter<T: IntoIterator<Item = (K, FieldDefinition)>>(iter: T) -> Self {
        let mut set = FieldSet::new();
        for (key, def) in iter {
            set.insert(key, def);
        }
        set
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, def) in &self.entries {
            map.serialize_entry(key, def)?;
        }
        map.end()
    }
}

struct FieldSetVisitor;

impl<'de> Visitor<'de> for FieldSetVisitor {
    type Value = FieldSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of field definitions keyed by field key")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<FieldSet, A::Error> {
        let mut set = FieldSet::new();
        while let Some((key, def)) = access.next_entry::<String, FieldDefinition>()? {
            set.insert(key, def);
        }
        Ok(set)
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(FieldSetVisitor)
    }
}
