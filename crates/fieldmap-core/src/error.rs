//! Core error types.

use thiserror::Error;

use crate::rules::RuleId;

/// Core errors.
#[derive(Debug, Error)]
pub enum Error {
    /// An entity name outside the closed taxonomy.
    #[error("unknown entity '{0}' (expected one of: child, mother, father, informant, registrar, general)")]
    UnknownEntity(String),

    /// A match type name outside the supported set.
    #[error("unknown match type '{0}' (expected one of: starts_with, ends_with, contains, regex, equals)")]
    UnknownMatchType(String),

    /// No rule with this id in the store.
    #[error("rule not found: {0}")]
    RuleNotFound(RuleId),

    /// Two rules share an id.
    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(RuleId),

    /// A bulk update names a field the set does not contain.
    #[error("unknown field in bulk update: {0}")]
    UnknownField(String),

    /// Apply was requested while no rule can match anything.
    #[error("no active rules to apply")]
    NoActiveRules,

    /// JSON encoding or decoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
