//! Classification and grouping configuration.

/// Group-tag prefix marking fields merged into another field and hidden from display.
pub const DEFAULT_HIDDEN_GROUP_PREFIX: &str = "merged_hidden_";

/// Number of labels shown per section before collapsing into "+N more".
pub const DEFAULT_SECTION_PREVIEW_LIMIT: usize = 5;

/// Compiled-size ceiling for regex rules, in bytes.
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1024 * 1024;

/// Configuration shared by the matcher, session and grouping view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldmapConfig {
    /// Fields whose group starts with this prefix are excluded from sections.
    pub hidden_group_prefix: String,

    /// Labels listed per section in a preview.
    pub section_preview_limit: usize,

    /// Regex patterns compiling beyond this size are treated as malformed.
    pub regex_size_limit: usize,
}

impl Default for FieldmapConfig {
    fn default() -> Self {
        Self {
            hidden_group_prefix: DEFAULT_HIDDEN_GROUP_PREFIX.to_string(),
            section_preview_limit: DEFAULT_SECTION_PREVIEW_LIMIT,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

impl FieldmapConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hidden-merge group prefix.
    pub fn with_hidden_group_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.hidden_group_prefix = prefix.into();
        self
    }

    /// Set how many labels a section preview lists.
    pub fn with_section_preview_limit(mut self, limit: usize) -> Self {
        self.section_preview_limit = limit;
        self
    }

    /// Set the regex compiled-size limit.
    pub fn with_regex_size_limit(mut self, limit: usize) -> Self {
        self.regex_size_limit = limit;
        self
    }

    /// Check whether a group tag marks a hidden merged field.
    ///
    /// An empty prefix hides nothing.
    pub fn is_hidden_group(&self, group: Option<&str>) -> bool {
        match group {
            Some(g) if !self.hidden_group_prefix.is_empty() => g.starts_with(&self.hidden_group_prefix),
            _ => false,
        }
    }
}
