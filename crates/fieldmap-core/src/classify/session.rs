//! Rule editing session: preview, invalidation, and apply.

use tracing::{info, instrument, warn};

use super::classifier::classify_with_limit;
use super::diff::ClassificationDiff;
use crate::config::FieldmapConfig;
use crate::error::{Error, Result};
use crate::rules::{RuleId, RulePatch, RuleStore};
use crate::schema::FieldSet;

/// Receiver of an approved bulk entity update.
///
/// Implementations must apply the whole diff or nothing.
pub trait BulkEntityUpdate {
    /// Apply every change in `diff`, returning how many fields were updated.
    fn apply_entity_updates(&mut self, diff: &ClassificationDiff) -> Result<usize>;
}

impl BulkEntityUpdate for FieldSet {
    fn apply_entity_updates(&mut self, diff: &ClassificationDiff) -> Result<usize> {
        self.set_entities(diff.updates())
    }
}

/// Result of [`RuleSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The sink accepted this many updates.
    Applied {
        /// Number of fields reassigned.
        updated: usize,
    },
    /// The rules would change nothing; the sink was not called.
    NothingToApply,
}

/// An editor session over a rule store.
///
/// Every rule edit made through the session drops the cached preview and the
/// last applied count, so a preview is never shown for rules it was not
/// computed from.
#[derive(Debug, Clone)]
pub struct RuleSession {
    store: RuleStore,
    config: FieldmapConfig,
    preview: Option<(u64, ClassificationDiff)>,
    applied_count: Option<usize>,
}

impl Default for RuleSession {
    fn default() -> Self {
        Self::new(FieldmapConfig::default())
    }
}

impl RuleSession {
    /// Start a session with the built-in rules.
    pub fn new(config: FieldmapConfig) -> Self {
        Self::with_store(RuleStore::new(), config)
    }

    /// Start a session over an existing store.
    pub fn with_store(store: RuleStore, config: FieldmapConfig) -> Self {
        Self {
            store,
            config,
            preview: None,
            applied_count: None,
        }
    }

    /// The rules being edited.
    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Session configuration.
    pub fn config(&self) -> &FieldmapConfig {
        &self.config
    }

    fn invalidate(&mut self) {
        self.preview = None;
        self.applied_count = None;
    }

    /// Append a blank rule.
    pub fn add_rule(&mut self) -> RuleId {
        let id = self.store.add();
        self.invalidate();
        id
    }

    /// Patch a rule by id.
    pub fn update_rule(&mut self, id: &RuleId, patch: &RulePatch) -> Result<()> {
        self.store.update(id, patch)?;
        self.invalidate();
        Ok(())
    }

    /// Delete a rule by id.
    pub fn remove_rule(&mut self, id: &RuleId) -> bool {
        let removed = self.store.remove(id).is_some();
        self.invalidate();
        removed
    }

    /// Move a rule to a new priority position.
    pub fn move_rule(&mut self, id: &RuleId, position: usize) -> Result<()> {
        self.store.move_to(id, position)?;
        self.invalidate();
        Ok(())
    }

    /// Restore the built-in rules.
    pub fn reset_to_defaults(&mut self) {
        self.store.reset_to_defaults();
        self.invalidate();
    }

    fn compute(&self, fields: &FieldSet) -> ClassificationDiff {
        classify_with_limit(fields, &self.store.ordered(), self.config.regex_size_limit)
    }

    /// Compute and cache what the current rules would change.
    pub fn preview(&mut self, fields: &FieldSet) -> &ClassificationDiff {
        let diff = self.compute(fields);
        self.applied_count = None;
        let revision = self.store.revision();
        &self.preview.insert((revision, diff)).1
    }

    /// The cached preview, if the rules have not changed since it was computed.
    pub fn cached_preview(&self) -> Option<&ClassificationDiff> {
        match &self.preview {
            Some((revision, diff)) if *revision == self.store.revision() => Some(diff),
            _ => None,
        }
    }

    /// Number of fields updated by the last successful apply.
    pub fn applied_count(&self) -> Option<usize> {
        self.applied_count
    }

    /// Classify `fields` and hand the diff to `sink`.
    ///
    /// Refused when no rule can match. An empty diff is not sent.
    #[instrument(skip_all)]
    pub fn apply<S>(&mut self, fields: &FieldSet, sink: &mut S) -> Result<ApplyOutcome>
    where
        S: BulkEntityUpdate + ?Sized,
    {
        let diff = self.checked_diff(fields)?;
        self.commit(diff, sink)
    }

    /// Classify `fields` and write the result back into the same set.
    #[instrument(skip_all)]
    pub fn apply_in_place(&mut self, fields: &mut FieldSet) -> Result<ApplyOutcome> {
        let diff = self.checked_diff(fields)?;
        self.commit(diff, fields)
    }

    fn checked_diff(&self, fields: &FieldSet) -> Result<ClassificationDiff> {
        if self.store.active_count() == 0 {
            return Err(Error::NoActiveRules);
        }
        Ok(self.compute(fields))
    }

    fn commit<S>(&mut self, diff: ClassificationDiff, sink: &mut S) -> Result<ApplyOutcome>
    where
        S: BulkEntityUpdate + ?Sized,
    {
        if diff.is_empty() {
            return Ok(ApplyOutcome::NothingToApply);
        }

        match sink.apply_entity_updates(&diff) {
            Ok(updated) => {
                info!(updated, "applied entity rules");
                self.applied_count = Some(updated);
                self.preview = None;
                Ok(ApplyOutcome::Applied { updated })
            }
            Err(e) => {
                warn!(error = %e, pending = diff.len(), "bulk entity update rejected");
                Err(e)
            }
        }
    }
}
