//! Classification rules.
//!
//! Rules are evaluated in list order and the first match wins, so the store
//! keeps an explicit sequence alongside the id lookup.

mod defaults;
mod matcher;
mod rule;
mod store;

pub use defaults::default_rules;
pub use matcher::{matches, matches_with_limit};
pub use rule::{ClassificationRule, MatchType, RuleId, RulePatch};
pub use store::RuleStore;
