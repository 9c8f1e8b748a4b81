//! Classification rule definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::schema::Entity;

/// How a rule's pattern is compared against a field key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum MatchType {
    /// Key begins with the pattern.
    #[default]
    StartsWith,
    /// Key ends with the pattern.
    EndsWith,
    /// Key contains the pattern.
    Contains,
    /// Pattern is a regular expression searched in the key.
    Regex,
    /// Key equals the pattern.
    Equals,
}

impl MatchType {
    /// All match types in editor order.
    pub const ALL: [MatchType; 5] = [
        MatchType::StartsWith,
        MatchType::EndsWith,
        MatchType::Contains,
        MatchType::Regex,
        MatchType::Equals,
    ];

    /// Parse a wire name.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name {
            "starts_with" => Ok(MatchType::StartsWith),
            "ends_with" => Ok(MatchType::EndsWith),
            "contains" => Ok(MatchType::Contains),
            "regex" => Ok(MatchType::Regex),
            "equals" => Ok(MatchType::Equals),
            other => Err(Error::UnknownMatchType(other.to_string())),
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::StartsWith => "starts_with",
            MatchType::EndsWith => "ends_with",
            MatchType::Contains => "contains",
            MatchType::Regex => "regex",
            MatchType::Equals => "equals",
        }
    }

    /// Label shown in the rule editor.
    pub fn label(&self) -> &'static str {
        match self {
            MatchType::StartsWith => "starts with",
            MatchType::EndsWith => "ends with",
            MatchType::Contains => "contains",
            MatchType::Regex => "regex",
            MatchType::Equals => "equals",
        }
    }

    /// Example pattern for an empty input.
    pub fn placeholder(&self) -> &'static str {
        match self {
            MatchType::Regex => "^[mf]_.*",
            _ => "m_",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchType::parse(s)
    }
}

impl TryFrom<String> for MatchType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MatchType::parse(&value)
    }
}

impl From<MatchType> for &'static str {
    fn from(match_type: MatchType) -> Self {
        match_type.as_str()
    }
}

/// Stable rule identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One pattern rule mapping matching field keys to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRule {
    /// Unique identifier.
    pub id: RuleId,
    /// Comparison mode.
    pub match_type: MatchType,
    /// Literal text or regex source.
    pub pattern: String,
    /// Entity assigned to matching fields.
    pub target_entity: Entity,
    /// Inactive rules never match.
    pub is_active: bool,
}

impl ClassificationRule {
    /// Create an active rule.
    pub fn new(
        id: impl Into<RuleId>,
        match_type: MatchType,
        pattern: impl Into<String>,
        target_entity: Entity,
    ) -> Self {
        Self {
            id: id.into(),
            match_type,
            pattern: pattern.into(),
            target_entity,
            is_active: true,
        }
    }

    /// Create an active `starts_with` rule.
    pub fn starts_with(id: impl Into<RuleId>, pattern: impl Into<String>, target: Entity) -> Self {
        Self::new(id, MatchType::StartsWith, pattern, target)
    }

    /// Create an active `regex` rule.
    pub fn regex(id: impl Into<RuleId>, pattern: impl Into<String>, target: Entity) -> Self {
        Self::new(id, MatchType::Regex, pattern, target)
    }

    /// The rule a freshly added editor row starts with.
    pub fn blank(id: impl Into<RuleId>) -> Self {
        Self::new(id, MatchType::StartsWith, "", Entity::General)
    }

    /// Mark the rule inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Whether the rule can match anything at all.
    pub fn is_effective(&self) -> bool {
        self.is_active && !self.pattern.is_empty()
    }

    /// Parse a JSON array of rules.
    pub fn list_from_json(json: &str) -> Result<Vec<ClassificationRule>, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Partial update for a rule. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulePatch {
    /// New comparison mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    /// New pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// New target entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_entity: Option<Entity>,
    /// New active flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl RulePatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match type.
    pub fn match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = Some(match_type);
        self
    }

    /// Set the pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the target entity.
    pub fn target_entity(mut self, entity: Entity) -> Self {
        self.target_entity = Some(entity);
        self
    }

    /// Set the active flag.
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.match_type.is_none()
            && self.pattern.is_none()
            && self.target_entity.is_none()
            && self.is_active.is_none()
    }

    /// Merge the present fields into `rule`. The id is never touched.
    pub fn apply_to(&self, rule: &mut ClassificationRule) {
        if let Some(match_type) = self.match_type {
            rule.match_type = match_type;
        }
        if let Some(pattern) = &self.pattern {
            rule.pattern = pattern.clone();
        }
        if let Some(entity) = self.target_entity {
            rule.target_entity = entity;
        }
        if let Some(is_active) = self.is_active {
            rule.is_active = is_active;
        }
    }
}
