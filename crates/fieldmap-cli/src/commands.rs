//! Subcommand execution and file handling.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fieldmap_core::{
    group, ApplyOutcome, ClassificationRule, FieldSet, FieldmapConfig, RuleSession, RuleStore,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::formatter::Formatter;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file's contents were rejected.
    #[error("invalid {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: fieldmap_core::Error,
    },

    /// Classification or grouping error.
    #[error(transparent)]
    Core(#[from] fieldmap_core::Error),
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(path: &Path) -> impl FnOnce(fieldmap_core::Error) -> CliError + '_ {
    move |source| CliError::Invalid {
        path: path.to_path_buf(),
        source,
    }
}

/// Load a field definition map.
pub fn load_fields(path: &Path) -> Result<FieldSet, CliError> {
    let fields = FieldSet::from_json(&read(path)?).map_err(invalid(path))?;
    debug!(path = %path.display(), count = fields.len(), "loaded fields");
    Ok(fields)
}

/// Load a rule list, or the built-in rules when no path is given.
pub fn load_rules(path: Option<&Path>) -> Result<RuleStore, CliError> {
    let Some(path) = path else {
        return Ok(RuleStore::new());
    };
    let rules = ClassificationRule::list_from_json(&read(path)?).map_err(invalid(path))?;
    let store = RuleStore::from_rules(rules).map_err(invalid(path))?;
    debug!(path = %path.display(), count = store.len(), "loaded rules");
    Ok(store)
}

/// Load a key-to-display-name map, or an empty map when no path is given.
pub fn load_aliases(path: Option<&Path>) -> Result<HashMap<String, String>, CliError> {
    let Some(path) = path else {
        return Ok(HashMap::new());
    };
    serde_json::from_str(&read(path)?)
        .map_err(fieldmap_core::Error::from)
        .map_err(invalid(path))
}

/// Write a field definition map as pretty JSON.
///
/// The contents go to a temporary file next to `path` that is then renamed over
/// it, so a failed write never leaves a truncated schema behind.
pub fn write_fields(path: &Path, fields: &FieldSet) -> Result<(), CliError> {
    let json = fields.to_json_pretty()?;
    let write_error = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(json.as_bytes()).map_err(write_error)?;
    file.write_all(b"\n").map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

/// Show what the rules would change.
pub fn preview(
    fields_path: &Path,
    rules_path: Option<&Path>,
    config: FieldmapConfig,
    formatter: &dyn Formatter,
) -> Result<String, CliError> {
    let fields = load_fields(fields_path)?;
    let mut session = RuleSession::with_store(load_rules(rules_path)?, config);
    Ok(formatter.format_diff(session.preview(&fields)))
}

/// Apply the rules and write the updated fields to `output` (or back to the input).
pub fn apply(
    fields_path: &Path,
    rules_path: Option<&Path>,
    output: Option<&Path>,
    config: FieldmapConfig,
    formatter: &dyn Formatter,
) -> Result<String, CliError> {
    let mut fields = load_fields(fields_path)?;
    let mut session = RuleSession::with_store(load_rules(rules_path)?, config);
    let outcome = session.apply_in_place(&mut fields)?;

    // An unchanged input is left alone; an explicit output is always written.
    let target = match (outcome, output) {
        (_, Some(output)) => Some(output),
        (ApplyOutcome::Applied { .. }, None) => Some(fields_path),
        (ApplyOutcome::NothingToApply, None) => None,
    };
    if let Some(target) = target {
        write_fields(target, &fields)?;
        info!(path = %target.display(), "wrote field definitions");
    }

    Ok(formatter.format_apply(&outcome))
}

/// Show the current section grouping.
pub fn sections(
    fields_path: &Path,
    aliases_path: Option<&Path>,
    config: &FieldmapConfig,
    formatter: &dyn Formatter,
) -> Result<String, CliError> {
    let fields = load_fields(fields_path)?;
    let aliases = load_aliases(aliases_path)?;
    let grouping = group(&fields, &aliases, config);
    Ok(formatter.format_sections(&grouping, config.section_preview_limit))
}

/// Print the built-in rules as a starting rules file.
pub fn rules(formatter: &dyn Formatter) -> String {
    formatter.format_rules(&RuleStore::new().to_vec())
}
