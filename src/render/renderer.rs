//! Rendering of drift entries and output changes.

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;
use tracing::debug;

use crate::error::{RenderError, Result};
use crate::plan::{Action, PlanMode};

use super::diff::{AttributeChange, Diff, DiffSet, OutputDiff};

/// An output change rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOutput {
    /// Output name.
    pub name: String,
    /// Action applied to the output.
    pub action: Action,
    /// Rendered text, one line per output.
    pub text: String,
}

/// Renderer for the parts of a plan shown before the change summary.
pub trait Renderer {
    /// Renders the drift section.
    ///
    /// Returns true if any drift was shown.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render_drift(&mut self, diffs: &DiffSet, mode: PlanMode) -> Result<bool>;

    /// Renders the output changes worth showing.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render_outputs(&mut self, outputs: &[OutputDiff]) -> Result<Vec<RenderedOutput>>;
}

/// Plain-text renderer with optional colors.
#[derive(Debug, Default)]
pub struct TextRenderer {
    /// Whether to emit ANSI colors.
    color: bool,
    /// Drift section produced by the last render pass.
    drift: String,
}

impl TextRenderer {
    /// Creates a new text renderer.
    #[must_use]
    pub const fn new(color: bool) -> Self {
        Self {
            color,
            drift: String::new(),
        }
    }

    /// Returns the rendered drift section, empty if nothing was shown.
    #[must_use]
    pub fn drift_section(&self) -> &str {
        &self.drift
    }

    /// Applies a color when colors are enabled.
    fn paint(&self, text: &str, action: Action) -> String {
        if !self.color {
            return text.to_string();
        }
        match action {
            Action::Create => text.green().to_string(),
            Action::Update | Action::Read => text.yellow().to_string(),
            Action::Delete => text.red().to_string(),
            Action::DeleteThenCreate | Action::CreateThenDelete => text.magenta().to_string(),
            Action::NoOp | Action::Forget => text.dimmed().to_string(),
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Renders one resource diff.
    fn render_resource(&self, out: &mut String, diff: &Diff) -> std::result::Result<(), RenderError> {
        let action = diff.action();
        writeln!(
            out,
            "  {} {} {}",
            self.paint(action.symbol(), action),
            self.bold(&diff.change.address),
            describe_drift(action)
        )?;
        if diff.moved()
            && let Some(prev) = &diff.change.previous_address
        {
            writeln!(out, "      (moved from {prev})")?;
        }
        for attr in &diff.diff.attributes {
            writeln!(out, "      {}", self.render_attribute(attr))?;
        }
        Ok(())
    }

    fn render_attribute(&self, attr: &AttributeChange) -> String {
        let (symbol, action) = match (&attr.before, &attr.after) {
            (None | Some(Value::Null), Some(_)) => ("+", Action::Create),
            (Some(_), None | Some(Value::Null)) => ("-", Action::Delete),
            _ => ("~", Action::Update),
        };
        let before = format_value(attr.before.as_ref(), attr.sensitive, false);
        let after = format_value(attr.after.as_ref(), attr.sensitive, attr.unknown);

        match action {
            Action::Create => format!("{} {} = {after}", self.paint(symbol, action), attr.name),
            Action::Delete => format!("{} {} = {before}", self.paint(symbol, action), attr.name),
            _ => format!("{} {} = {before} -> {after}", self.paint(symbol, action), attr.name),
        }
    }
}

impl Renderer for TextRenderer {
    fn render_drift(&mut self, diffs: &DiffSet, mode: PlanMode) -> Result<bool> {
        self.drift.clear();

        // Outside refresh-only mode, move-only drift is shown with the planned changes.
        let mut shown: Vec<&Diff> = if mode == PlanMode::RefreshOnly {
            diffs.drift.iter().collect()
        } else {
            diffs
                .drift
                .iter()
                .filter(|d| d.action() != Action::NoOp)
                .collect()
        };

        if shown.is_empty() {
            return Ok(false);
        }

        if diffs.is_empty() && mode != PlanMode::RefreshOnly {
            debug!("Hiding {} drift entries: plan has no changes", shown.len());
            return Ok(false);
        }

        shown.sort_by(|a, b| a.change.address.cmp(&b.change.address));

        let mut out = String::new();
        writeln!(
            out,
            "{}",
            self.bold("Note: Objects have changed outside of the recorded state")
        )
        .map_err(RenderError::from)?;
        writeln!(
            out,
            "\nThe following objects changed since the last state was recorded:\n"
        )
        .map_err(RenderError::from)?;
        for diff in shown {
            self.render_resource(&mut out, diff)?;
        }
        if mode == PlanMode::RefreshOnly {
            writeln!(
                out,
                "\nThis is a refresh-only plan: applying it will only update the recorded state."
            )
            .map_err(RenderError::from)?;
        }

        self.drift = out;
        Ok(true)
    }

    fn render_outputs(&mut self, outputs: &[OutputDiff]) -> Result<Vec<RenderedOutput>> {
        let mut rendered: Vec<RenderedOutput> = outputs
            .iter()
            .filter(|o| o.action != Action::NoOp)
            .map(|o| {
                let before = format_value(o.before.as_ref(), o.sensitive, false);
                let after = format_value(o.after.as_ref(), o.sensitive, o.unknown);
                let text = match o.action {
                    Action::Create => format!("{} {} = {after}", self.paint("+", o.action), o.name),
                    Action::Delete => format!("{} {} = {before}", self.paint("-", o.action), o.name),
                    _ => format!(
                        "{} {} = {before} -> {after}",
                        self.paint("~", Action::Update),
                        o.name
                    ),
                };
                RenderedOutput {
                    name: o.name.clone(),
                    action: o.action,
                    text,
                }
            })
            .collect();

        rendered.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rendered)
    }
}

/// Describes a drift entry's action in words.
const fn describe_drift(action: Action) -> &'static str {
    match action {
        Action::Create => "has been created",
        Action::Delete => "has been deleted",
        Action::NoOp => "has moved",
        _ => "has changed",
    }
}

/// Formats a value for inline display.
fn format_value(value: Option<&Value>, sensitive: bool, unknown: bool) -> String {
    if unknown {
        return String::from("(known after apply)");
    }
    if sensitive {
        return String::from("(sensitive value)");
    }
    match value {
        None | Some(Value::Null) => String::from("null"),
        Some(v) => v.to_string(),
    }
}
