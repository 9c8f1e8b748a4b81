//! Session-scoped rule store.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::defaults::default_rules;
use super::rule::{ClassificationRule, RuleId, RulePatch};
use crate::error::{Error, Result};

/// Ordered, id-addressed list of classification rules.
///
/// Rules are held in an id map with a separate id sequence for priority order.
/// Edits go through id lookup and never disturb the position of other rules.
#[derive(Debug, Clone)]
pub struct RuleStore {
    rules: HashMap<RuleId, ClassificationRule>,
    order: Vec<RuleId>,
    next_id: u64,
    revision: u64,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    /// Create a store holding the built-in rules.
    pub fn new() -> Self {
        let mut store = Self::empty();
        store.load(default_rules());
        store
    }

    /// Create a store with no rules.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Create a store from a loaded rule list, keeping its order.
    pub fn from_rules(rules: impl IntoIterator<Item = ClassificationRule>) -> Result<Self> {
        let rules: Vec<_> = rules.into_iter().collect();
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if !seen.insert(&rule.id) {
                return Err(Error::DuplicateRuleId(rule.id.clone()));
            }
        }

        let mut store = Self::empty();
        store.load(rules);
        Ok(store)
    }

    fn load(&mut self, rules: Vec<ClassificationRule>) {
        self.rules.clear();
        self.order.clear();
        for rule in rules {
            self.order.push(rule.id.clone());
            self.rules.insert(rule.id.clone(), rule);
        }
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn fresh_id(&mut self) -> RuleId {
        loop {
            let id = RuleId::new(format!("rule-{}", self.next_id));
            self.next_id += 1;
            if !self.rules.contains_key(&id) {
                return id;
            }
        }
    }

    /// Append a blank rule at the lowest priority and return its id.
    pub fn add(&mut self) -> RuleId {
        let id = self.fresh_id();
        self.order.push(id.clone());
        self.rules.insert(id.clone(), ClassificationRule::blank(id.clone()));
        self.bump();
        debug!(rule = %id, "added rule");
        id
    }

    /// Merge `patch` into the rule with `id`.
    pub fn update(&mut self, id: &RuleId, patch: &RulePatch) -> Result<&ClassificationRule> {
        let rule = self
            .rules
            .get_mut(id)
            .ok_or_else(|| Error::RuleNotFound(id.clone()))?;
        patch.apply_to(rule);
        self.bump();
        debug!(rule = %id, ?patch, "updated rule");
        Ok(&self.rules[id])
    }

    /// Delete the rule with `id`, returning it if it existed.
    pub fn remove(&mut self, id: &RuleId) -> Option<ClassificationRule> {
        let removed = self.rules.remove(id)?;
        self.order.retain(|other| other != id);
        self.bump();
        debug!(rule = %id, "removed rule");
        Some(removed)
    }

    /// Move the rule with `id` to `position` (clamped to the end of the list).
    pub fn move_to(&mut self, id: &RuleId, position: usize) -> Result<()> {
        let from = self
            .order
            .iter()
            .position(|other| other == id)
            .ok_or_else(|| Error::RuleNotFound(id.clone()))?;
        let moved = self.order.remove(from);
        let to = position.min(self.order.len());
        self.order.insert(to, moved);
        self.bump();
        debug!(rule = %id, from, to, "moved rule");
        Ok(())
    }

    /// Replace every rule with a fresh copy of the built-in set.
    pub fn reset_to_defaults(&mut self) {
        self.load(default_rules());
        self.bump();
        debug!("reset rules to defaults");
    }

    /// Look up a rule by id.
    pub fn get(&self, id: &RuleId) -> Option<&ClassificationRule> {
        self.rules.get(id)
    }

    /// Rules in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassificationRule> {
        self.order.iter().map(|id| &self.rules[id])
    }

    /// Rules in priority order, collected for evaluation.
    pub fn ordered(&self) -> Vec<&ClassificationRule> {
        self.iter().collect()
    }

    /// Owned copy of the rules in priority order.
    pub fn to_vec(&self) -> Vec<ClassificationRule> {
        self.iter().cloned().collect()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the store holds no rules.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Rules that are active and have a pattern.
    pub fn active_count(&self) -> usize {
        self.rules.values().filter(|r| r.is_effective()).count()
    }

    /// Counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
