//! Output formatting for CLI commands.
//!
//! This module turns classification results into the text or JSON printed
//! for the user.

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::error::{RenderError, Result};
use crate::plan::{Action, PlanMode, Schema};
use crate::render::RenderInputs;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
    /// Whether to emit colors.
    color: bool,
}

/// Change row for table display.
#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Moved from")]
    moved_from: String,
    #[tabled(rename = "Import ID")]
    import_id: String,
}

/// JSON form of a displayed change.
#[derive(Serialize)]
struct ChangeJson<'a> {
    address: &'a str,
    action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    importing_id: Option<&'a str>,
}

/// JSON form of a whole summary.
#[derive(Serialize)]
struct SummaryJson<'a> {
    #[serde(flatten)]
    inputs: &'a RenderInputs,
    changes: Vec<ChangeJson<'a>>,
    to_add: usize,
    to_change: usize,
    to_destroy: usize,
    to_forget: usize,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    /// Formats a classification result.
    ///
    /// `drift` is the drift section produced while classifying; it is only
    /// used for text output.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary cannot be serialized.
    pub fn format_summary(&self, inputs: &RenderInputs, drift: Option<&str>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = SummaryJson {
                    inputs,
                    changes: inputs
                        .changes
                        .iter()
                        .map(|d| ChangeJson {
                            address: &d.change.address,
                            action: d.action(),
                            previous_address: d
                                .moved()
                                .then_some(d.change.previous_address.as_deref())
                                .flatten(),
                            importing_id: d.change.change.importing.as_ref().map(|i| i.id.as_str()),
                        })
                        .collect(),
                    to_add: inputs.to_add(),
                    to_change: inputs.to_change(),
                    to_destroy: inputs.to_destroy(),
                    to_forget: inputs.to_forget(),
                };
                serde_json::to_string_pretty(&json)
                    .map_err(|e| RenderError::serialization("summary", e.to_string()).into())
            }
            OutputFormat::Text => Ok(self.format_summary_text(inputs, drift)),
        }
    }

    /// Formats a classification result as text.
    fn format_summary_text(&self, inputs: &RenderInputs, drift: Option<&str>) -> String {
        let mut output = String::new();

        if let Some(drift) = drift.filter(|d| !d.is_empty()) {
            output.push_str(drift);
            output.push('\n');
        }

        if inputs.no_changes {
            if !inputs.errored {
                let _ = writeln!(output, "{}", self.paint_notice(no_changes_message(inputs.mode)));
            }
            return output;
        }

        if !inputs.changes.is_empty() {
            let rows: Vec<ChangeRow> = inputs
                .changes
                .iter()
                .map(|d| ChangeRow {
                    action: self.format_action(d.action(), d.moved(), d.importing()),
                    resource: d.change.address.clone(),
                    moved_from: if d.moved() {
                        d.change.previous_address.clone().unwrap_or_default()
                    } else {
                        String::new()
                    },
                    import_id: d
                        .change
                        .change
                        .importing
                        .as_ref()
                        .map(|i| i.id.clone())
                        .unwrap_or_default(),
                })
                .collect();

            output.push_str(&Table::new(rows).to_string());
            output.push('\n');
        }

        if inputs.will_print_resource_changes || inputs.importing_count > 0 {
            let _ = writeln!(output, "\n{}", self.summary_line(inputs));
        }

        if !inputs.outputs.is_empty() {
            output.push_str("\nChanges to Outputs:\n");
            for rendered in &inputs.outputs {
                let _ = writeln!(output, "  {}", rendered.text);
            }
        }

        output
    }

    /// Builds the `Plan: ...` summary line.
    fn summary_line(&self, inputs: &RenderInputs) -> String {
        let mut parts = Vec::new();
        if inputs.importing_count > 0 {
            parts.push(format!("{} to import", inputs.importing_count));
        }
        parts.push(format!("{} to add", self.paint(inputs.to_add(), Action::Create)));
        parts.push(format!("{} to change", self.paint(inputs.to_change(), Action::Update)));
        parts.push(format!("{} to destroy", self.paint(inputs.to_destroy(), Action::Delete)));
        if inputs.to_forget() > 0 {
            parts.push(format!("{} to forget", inputs.to_forget()));
        }

        let label = if self.color {
            "Plan:".bold().to_string()
        } else {
            String::from("Plan:")
        };
        format!("{label} {}.", parts.join(", "))
    }

    /// Formats the resolved schema of a resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be serialized.
    pub fn format_schema(&self, address: &str, schema: &Schema) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(schema)
                .map_err(|e| RenderError::serialization("schema", e.to_string()).into()),
            OutputFormat::Text => {
                let mut output = format!("Schema for {address} (version {})\n", schema.version);
                for (name, attr) in &schema.block.attributes {
                    let mut flags = Vec::new();
                    if attr.required {
                        flags.push("required");
                    }
                    if attr.optional {
                        flags.push("optional");
                    }
                    if attr.computed {
                        flags.push("computed");
                    }
                    if attr.sensitive {
                        flags.push("sensitive");
                    }
                    let _ = writeln!(output, "  {name} [{}]", flags.join(", "));
                }
                for name in schema.block.block_types.keys() {
                    let _ = writeln!(output, "  {name} {{ ... }}");
                }
                Ok(output)
            }
        }
    }

    /// Formats a plan document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format_document(&self, document: &Value) -> Result<String> {
        serde_json::to_string_pretty(document)
            .map_err(|e| RenderError::serialization("plan", e.to_string()).into())
    }

    /// Formats an action label with color.
    fn format_action(&self, action: Action, moved: bool, importing: bool) -> String {
        let label = match action {
            Action::NoOp if importing => String::from("import"),
            Action::NoOp if moved => String::from("move"),
            other => format!("{}{other}", other.symbol().trim()),
        };
        if !self.color {
            return label;
        }
        match action {
            Action::Create => label.green().to_string(),
            Action::Update | Action::Read => label.yellow().to_string(),
            Action::Delete => label.red().to_string(),
            Action::DeleteThenCreate | Action::CreateThenDelete => label.magenta().to_string(),
            Action::NoOp => label.cyan().to_string(),
            Action::Forget => label.dimmed().to_string(),
        }
    }

    /// Paints a count in the color of its action.
    fn paint(&self, count: usize, action: Action) -> String {
        let text = count.to_string();
        if !self.color {
            return text;
        }
        match action {
            Action::Create => text.green().to_string(),
            Action::Delete => text.red().to_string(),
            _ => text.yellow().to_string(),
        }
    }

    fn paint_notice(&self, message: &str) -> String {
        if self.color {
            message.green().bold().to_string()
        } else {
            message.to_string()
        }
    }
}

/// Returns the notice shown when a plan has nothing to do.
const fn no_changes_message(mode: PlanMode) -> &'static str {
    match mode {
        PlanMode::Normal => "No changes. Your infrastructure matches the configuration.",
        PlanMode::Destroy => "No changes. No objects need to be destroyed.",
        PlanMode::RefreshOnly => "No changes. Your infrastructure still matches the configuration.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Change, Importing, ResourceChange, ResourceMode};
    use crate::render::{Diff, RenderedOutput, ResourceDiff};
    use std::collections::BTreeMap;

    fn create_diff(address: &str, action: Action) -> Diff {
        Diff {
            change: ResourceChange {
                address: address.to_string(),
                previous_address: None,
                module_address: None,
                mode: ResourceMode::Managed,
                resource_type: String::from("cloud_vm"),
                name: String::from("vm"),
                index: None,
                provider_name: String::from("cloud"),
                deposed: None,
                change: Change::default(),
                action_reason: None,
            },
            diff: ResourceDiff {
                action,
                attributes: vec![],
            },
        }
    }

    fn create_inputs(changes: Vec<Diff>, counts: &[(Action, usize)]) -> RenderInputs {
        let counts: BTreeMap<Action, usize> = counts.iter().copied().collect();
        let will_print = counts.values().sum::<usize>() > 0;
        let importing_count = changes.iter().filter(|d| d.importing()).count();
        RenderInputs {
            mode: PlanMode::Normal,
            no_changes: changes.is_empty(),
            changes,
            counts,
            importing_count,
            will_print_resource_changes: will_print,
            have_refresh_changes: false,
            outputs: vec![],
            errored: false,
        }
    }

    #[test]
    fn test_summary_line_counts() {
        let inputs = create_inputs(
            vec![
                create_diff("cloud_vm.a", Action::Create),
                create_diff("cloud_vm.b", Action::DeleteThenCreate),
                create_diff("cloud_vm.c", Action::Update),
            ],
            &[
                (Action::Create, 1),
                (Action::DeleteThenCreate, 1),
                (Action::Update, 1),
            ],
        );
        let formatter = OutputFormatter::new(OutputFormat::Text, false);

        let text = formatter.format_summary(&inputs, None).expect("format");

        assert!(text.contains("Plan: 2 to add, 1 to change, 1 to destroy."));
        assert!(text.contains("cloud_vm.b"));
    }

    #[test]
    fn test_summary_line_with_import_and_forget() {
        let mut imported = create_diff("cloud_vm.a", Action::NoOp);
        imported.change.change.importing = Some(Importing {
            id: String::from("vm-1"),
        });
        let inputs = create_inputs(
            vec![imported, create_diff("cloud_vm.b", Action::Forget)],
            &[(Action::Forget, 1)],
        );
        let formatter = OutputFormatter::new(OutputFormat::Text, false);

        let text = formatter.format_summary(&inputs, None).expect("format");

        assert!(text.contains("Plan: 1 to import, 0 to add, 0 to change, 0 to destroy, 1 to forget."));
        assert!(text.contains("vm-1"));
    }

    #[test]
    fn test_no_changes_notice_per_mode() {
        let mut inputs = create_inputs(vec![], &[]);
        let formatter = OutputFormatter::new(OutputFormat::Text, false);

        let text = formatter.format_summary(&inputs, None).expect("format");
        assert!(text.contains("Your infrastructure matches the configuration"));

        inputs.mode = PlanMode::Destroy;
        let text = formatter.format_summary(&inputs, None).expect("format");
        assert!(text.contains("No objects need to be destroyed"));
    }

    #[test]
    fn test_no_changes_notice_suppressed_when_errored() {
        let mut inputs = create_inputs(vec![], &[]);
        inputs.errored = true;
        let formatter = OutputFormatter::new(OutputFormat::Text, false);

        let text = formatter.format_summary(&inputs, None).expect("format");
        assert!(!text.contains("No changes"));
    }

    #[test]
    fn test_drift_section_included() {
        let inputs = create_inputs(vec![], &[]);
        let formatter = OutputFormatter::new(OutputFormat::Text, false);

        let text = formatter
            .format_summary(&inputs, Some("Note: drift\n"))
            .expect("format");
        assert!(text.starts_with("Note: drift"));
    }

    #[test]
    fn test_outputs_listed() {
        let mut inputs = create_inputs(vec![], &[]);
        inputs.outputs.push(RenderedOutput {
            name: String::from("ip"),
            action: Action::Create,
            text: String::from("+ ip = \"10.0.0.1\""),
        });
        inputs.no_changes = false;
        let formatter = OutputFormatter::new(OutputFormat::Text, false);

        let text = formatter.format_summary(&inputs, None).expect("format");
        assert!(text.contains("Changes to Outputs:"));
        assert!(text.contains("+ ip = \"10.0.0.1\""));
        assert!(!text.contains("Plan:"));
    }

    #[test]
    fn test_json_summary() {
        let inputs = create_inputs(
            vec![create_diff("cloud_vm.a", Action::Delete)],
            &[(Action::Delete, 1)],
        );
        let formatter = OutputFormatter::new(OutputFormat::Json, false);

        let text = formatter.format_summary(&inputs, None).expect("format");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");

        assert_eq!(value["to_destroy"], 1);
        assert_eq!(value["counts"]["delete"], 1);
        assert_eq!(value["changes"][0]["address"], "cloud_vm.a");
        assert_eq!(value["no_changes"], false);
    }
}
