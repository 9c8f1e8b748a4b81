//! Form schema model.
//!
//! The schema is owned by an external provider. This module only describes the
//! parts the classifier and the grouping view read: the entity taxonomy and the
//! per-field entity, group tag, and display order.

mod entity;
mod field;
mod field_set;

pub use entity::Entity;
pub use field::{FieldDefinition, FieldEntity};
pub use field_set::FieldSet;
