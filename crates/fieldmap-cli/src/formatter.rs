//! Output formatters for classification and grouping results.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use fieldmap_core::{ApplyOutcome, ClassificationDiff, ClassificationRule, SectionGrouping};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format the changes a rule set would make.
    fn format_diff(&self, diff: &ClassificationDiff) -> String;

    /// Format the result of applying rules.
    fn format_apply(&self, outcome: &ApplyOutcome) -> String;

    /// Format the non-empty sections of a grouping.
    fn format_sections(&self, grouping: &SectionGrouping, preview_limit: usize) -> String;

    /// Format a rule list.
    fn format_rules(&self, rules: &[ClassificationRule]) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_diff(&self, diff: &ClassificationDiff) -> String {
        if diff.is_empty() {
            return format!("{}", diff.status());
        }

        let mut table = Table::new();
        table.set_header(vec!["Field", "Current", "New", "Rule"]);
        for change in diff {
            table.add_row(vec![
                Cell::new(&change.key),
                Cell::new(&change.previous),
                Cell::new(change.entity),
                Cell::new(&change.rule),
            ]);
        }

        format!("{}\n{}", table, diff.status())
    }

    fn format_apply(&self, outcome: &ApplyOutcome) -> String {
        match outcome {
            ApplyOutcome::Applied { updated: 1 } => "1 field updated".to_string(),
            ApplyOutcome::Applied { updated } => format!("{} fields updated", updated),
            ApplyOutcome::NothingToApply => {
                "No fields need regrouping (already correctly grouped)".to_string()
            }
        }
    }

    fn format_sections(&self, grouping: &SectionGrouping, preview_limit: usize) -> String {
        if grouping.active_count() == 0 {
            return "No fields to display".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec!["Section", "Fields", "Preview"]);
        for section in grouping.active_sections() {
            let preview = section.preview(preview_limit);
            let mut listed = preview.labels.join(", ");
            if preview.remaining > 0 {
                listed.push_str(&format!(" +{} more", preview.remaining));
            }
            table.add_row(vec![
                Cell::new(section.entity.label()),
                Cell::new(section.count()),
                Cell::new(listed),
            ]);
        }

        format!(
            "{}\n{} field(s) in {} section(s)",
            table,
            grouping.total_fields(),
            grouping.active_count()
        )
    }

    fn format_rules(&self, rules: &[ClassificationRule]) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Id", "Match", "Pattern", "Entity", "Active"]);
        for rule in rules {
            table.add_row(vec![
                Cell::new(&rule.id),
                Cell::new(rule.match_type.label()),
                Cell::new(&rule.pattern),
                Cell::new(rule.target_entity.label()),
                Cell::new(if rule.is_active { "yes" } else { "no" }),
            ]);
        }
        table.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_diff(&self, diff: &ClassificationDiff) -> String {
        serde_json::json!({
            "status": diff.status().to_string(),
            "changes": diff,
        })
        .to_string()
    }

    fn format_apply(&self, outcome: &ApplyOutcome) -> String {
        let updated = match outcome {
            ApplyOutcome::Applied { updated } => *updated,
            ApplyOutcome::NothingToApply => 0,
        };
        serde_json::json!({ "updated": updated }).to_string()
    }

    fn format_sections(&self, grouping: &SectionGrouping, preview_limit: usize) -> String {
        let sections: Vec<serde_json::Value> = grouping
            .active_sections()
            .map(|section| {
                let preview = section.preview(preview_limit);
                serde_json::json!({
                    "entity": section.entity,
                    "count": section.count(),
                    "preview": preview.labels,
                    "remaining": preview.remaining,
                })
            })
            .collect();

        serde_json::to_string_pretty(&serde_json::json!({
            "sections": sections,
            "totalFields": grouping.total_fields(),
        }))
        .unwrap_or_else(|_| "{}".to_string())
    }

    fn format_rules(&self, rules: &[ClassificationRule]) -> String {
        serde_json::to_string_pretty(rules).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::{classify, default_rules, group, Entity, FieldDefinition, FieldSet};
    use std::collections::HashMap;

    fn fields() -> FieldSet {
        FieldSet::new()
            .with_field("m_name", FieldDefinition::new(Entity::General))
            .with_field("f_name", FieldDefinition::unassigned())
            .with_field("x_name", FieldDefinition::new(Entity::General))
    }

    #[test]
    fn test_table_diff_lists_changes() {
        let diff = classify(&fields(), &default_rules());
        let output = TableFormatter.format_diff(&diff);

        assert!(output.contains("m_name"));
        assert!(output.contains("mother"));
        assert!(output.contains("rule-2"));
        assert!(!output.contains("x_name"));
        assert!(output.ends_with("2 fields will be regrouped"));
    }

    #[test]
    fn test_table_diff_when_nothing_changes() {
        let diff = classify(&FieldSet::new(), &default_rules());
        assert_eq!(
            TableFormatter.format_diff(&diff),
            "no fields need regrouping (already correctly grouped)"
        );
    }

    #[test]
    fn test_json_diff() {
        let diff = classify(&fields(), &default_rules());
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_diff(&diff)).unwrap();

        assert_eq!(value["status"], "2 fields will be regrouped");
        assert_eq!(value["changes"][0]["key"], "m_name");
        assert_eq!(value["changes"][0]["previous"], "general");
        assert_eq!(value["changes"][0]["entity"], "mother");
        assert_eq!(value["changes"][1]["previous"], serde_json::Value::Null);
    }

    #[test]
    fn test_apply_messages() {
        assert_eq!(
            TableFormatter.format_apply(&ApplyOutcome::Applied { updated: 1 }),
            "1 field updated"
        );
        assert_eq!(
            TableFormatter.format_apply(&ApplyOutcome::Applied { updated: 3 }),
            "3 fields updated"
        );
        assert_eq!(
            JsonFormatter.format_apply(&ApplyOutcome::NothingToApply),
            r#"{"updated":0}"#
        );
    }

    #[test]
    fn test_sections_preview_truncates() {
        let fields: FieldSet = (0..7)
            .map(|i| (format!("c_{i}"), FieldDefinition::new(Entity::Child)))
            .collect();
        let grouping = group(&fields, &HashMap::new(), &Default::default());

        let table = TableFormatter.format_sections(&grouping, 5);
        assert!(table.contains("c_0, c_1, c_2, c_3, c_4 +2 more"));
        assert!(table.ends_with("7 field(s) in 1 section(s)"));

        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_sections(&grouping, 5)).unwrap();
        assert_eq!(value["sections"][0]["entity"], "child");
        assert_eq!(value["sections"][0]["remaining"], 2);
        assert_eq!(value["totalFields"], 7);
    }

    #[test]
    fn test_json_rules_reload() {
        let output = JsonFormatter.format_rules(&default_rules());
        let reloaded = ClassificationRule::list_from_json(&output).unwrap();
        assert_eq!(reloaded, default_rules());
    }
}
