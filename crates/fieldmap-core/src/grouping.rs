//! Section grouping view.
//!
//! Partitions a field set by each field's *current* entity for display. Rules
//! play no part here; this is a read-only projection recomputed on demand.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::config::FieldmapConfig;
use crate::schema::{Entity, FieldSet};

/// A field as listed in a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldEntry {
    /// Field key.
    pub key: String,
    /// Alias if one is set, else the key.
    pub label: String,
}

/// The first labels of a section plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPreview<'a> {
    /// Leading labels, in display order.
    pub labels: Vec<&'a str>,
    /// Fields not listed.
    pub remaining: usize,
}

/// All fields displayed under one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// The section's entity.
    pub entity: Entity,
    /// Fields in display order.
    pub fields: Vec<FieldEntry>,
}

impl Section {
    /// Number of fields in the section.
    pub fn count(&self) -> usize {
        self.fields.len()
    }

    /// Whether the section has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The first `limit` labels and the count of the rest.
    pub fn preview(&self, limit: usize) -> SectionPreview<'_> {
        let labels: Vec<&str> = self.fields.iter().take(limit).map(|f| f.label.as_str()).collect();
        SectionPreview {
            remaining: self.fields.len() - labels.len(),
            labels,
        }
    }
}

/// One section per entity, in canonical entity order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionGrouping {
    sections: Vec<Section>,
}

impl SectionGrouping {
    /// The section for `entity`. Always present, possibly empty.
    pub fn section(&self, entity: Entity) -> &Section {
        &self.sections[entity.index()]
    }

    /// Every section, including empty ones.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sections that contain at least one field.
    pub fn active_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.is_empty())
    }

    /// Number of sections with fields.
    pub fn active_count(&self) -> usize {
        self.active_sections().count()
    }

    /// Number of displayed fields across all sections.
    pub fn total_fields(&self) -> usize {
        self.sections.iter().map(Section::count).sum()
    }

    /// Keys of displayed fields that fall under [`Entity::General`].
    pub fn orphan_fields(&self) -> impl Iterator<Item = &str> {
        self.section(Entity::General).fields.iter().map(|f| f.key.as_str())
    }
}

/// Group `fields` by their current entity.
///
/// Fields tagged with the hidden-merge group prefix are skipped. The rest are
/// sorted by `order` (missing counts as 0, ties keep field-set order) and
/// placed under their effective entity, so unknown or missing entities land in
/// the general section.
pub fn group(
    fields: &FieldSet,
    aliases: &HashMap<String, String>,
    config: &FieldmapConfig,
) -> SectionGrouping {
    let mut visible: Vec<_> = fields
        .iter()
        .filter(|(_, def)| !config.is_hidden_group(def.group.as_deref()))
        .collect();
    // sort_by is stable; -0.0 and 0.0 compare equal
    visible.sort_by(|(_, a), (_, b)| {
        a.order_key()
            .partial_cmp(&b.order_key())
            .unwrap_or(Ordering::Equal)
    });

    let mut sections: Vec<Section> = Entity::ALL
        .iter()
        .map(|&entity| Section {
            entity,
            fields: Vec::new(),
        })
        .collect();

    for (key, def) in visible {
        let label = match aliases.get(key) {
            Some(alias) if !alias.is_empty() => alias.clone(),
            _ => key.to_string(),
        };
        sections[def.effective_entity().index()].fields.push(FieldEntry {
            key: key.to_string(),
            label,
        });
    }

    SectionGrouping { sections }
}
