//! fieldmap core - entity taxonomy, classification rules, and section grouping.
//!
//! This crate assigns form fields to the semantic entity they describe
//! (child, mother, father, ...) using an ordered list of pattern rules, and
//! projects a field set into per-entity sections for display.

pub mod classify;
pub mod config;
pub mod error;
pub mod grouping;
pub mod rules;
pub mod schema;

pub use classify::{
    classify, ApplyOutcome, BulkEntityUpdate, ClassificationDiff, DiffStatus, ProposedChange,
    RuleSession,
};
pub use config::FieldmapConfig;
pub use error::{Error, Result};
pub use grouping::{group, FieldEntry, Section, SectionGrouping, SectionPreview};
pub use rules::{
    default_rules, matches, matches_with_limit, ClassificationRule, MatchType, RuleId, RulePatch,
    RuleStore,
};
pub use schema::{Entity, FieldDefinition, FieldEntity, FieldSet};
