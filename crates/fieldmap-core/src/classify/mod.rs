//! Rule-based classification of fields into entities.
//!
//! [`classify`] is a pure pass over a field-set snapshot and a rule list. The
//! [`RuleSession`] wraps it with the editor workflow: preview, invalidate on
//! edit, and apply through a [`BulkEntityUpdate`] sink.

mod classifier;
mod diff;
mod session;

pub use classifier::{classify, classify_with_limit};
pub use diff::{ClassificationDiff, DiffStatus, ProposedChange};
pub use session::{ApplyOutcome, BulkEntityUpdate, RuleSession};
