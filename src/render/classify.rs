//! Classification of planned changes for the human-readable summary.
//!
//! The classifier decides which proposed changes are worth showing, counts
//! them per action, and works out whether a "no changes" notice is owed.
//! Rendering of the result is left to the caller.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::Result;
use crate::plan::{decode_actions, Action, Plan, PlanMode, Quality, QualitySet, ResourceMode};

use super::diff::{Diff, DiffEngine, DiffSource};
use super::renderer::{RenderedOutput, Renderer};

/// Classifier for the changes of a plan.
#[derive(Debug, Default)]
pub struct ChangeClassifier<S: DiffSource = DiffEngine> {
    /// Source of the diffs to classify.
    source: S,
}

/// Everything the summary renderer needs from one classification pass.
#[derive(Debug, Clone, Serialize)]
pub struct RenderInputs {
    /// Mode the plan was produced in.
    pub mode: PlanMode,
    /// Changes to display, in plan order.
    #[serde(skip)]
    pub changes: Vec<Diff>,
    /// Number of displayed changes per action, move-only and import-only
    /// entries excluded.
    pub counts: BTreeMap<Action, usize>,
    /// Number of displayed changes that import a resource.
    pub importing_count: usize,
    /// Whether any displayed change has an action other than no-op.
    pub will_print_resource_changes: bool,
    /// Whether the drift section showed anything.
    pub have_refresh_changes: bool,
    /// Output changes worth showing.
    pub outputs: Vec<RenderedOutput>,
    /// Whether neither resource nor output changes are shown.
    pub no_changes: bool,
    /// Whether planning reported errors.
    pub errored: bool,
}

impl ChangeClassifier {
    /// Creates a classifier backed by the default diff engine.
    #[must_use]
    pub const fn new() -> Self {
        Self { source: DiffEngine }
    }
}

impl<S: DiffSource> ChangeClassifier<S> {
    /// Creates a classifier backed by a custom diff source.
    #[must_use]
    pub const fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Classifies the changes of `plan`.
    ///
    /// The drift section and the outputs are rendered through `renderer` as
    /// part of the pass.
    ///
    /// # Errors
    ///
    /// Returns an error if diff computation or rendering fails, or if a
    /// change carries an action list that cannot be decoded.
    pub fn classify<R: Renderer + ?Sized>(
        &self,
        plan: &Plan,
        mode: PlanMode,
        qualities: &QualitySet,
        renderer: &mut R,
    ) -> Result<RenderInputs> {
        let diffs = self.source.compute_diffs(plan, mode)?;
        let have_refresh_changes = renderer.render_drift(&diffs, mode)?;

        let mut will_print_resource_changes = false;
        let mut counts: BTreeMap<Action, usize> = BTreeMap::new();
        let mut importing_count = 0;
        let mut changes = Vec::new();

        for diff in diffs.changes {
            let action = decode_actions(&diff.change.change.actions)?;

            if action == Action::NoOp && !diff.moved() && !diff.importing() {
                continue;
            }
            if action == Action::Delete && diff.change.mode != ResourceMode::Managed {
                debug!("Hiding deleted data source {}", diff.change.address);
                continue;
            }

            if diff.importing() {
                importing_count += 1;
            }

            // Move-only and import-only entries are shown but not counted.
            if action != Action::NoOp {
                will_print_resource_changes = true;
                *counts.entry(action).or_insert(0) += 1;
            }

            changes.push(diff);
        }

        let outputs = renderer.render_outputs(&diffs.outputs)?;
        let no_changes = changes.is_empty() && outputs.is_empty();

        debug!(
            "Classified {} displayed changes ({} importing), {} outputs, no_changes={no_changes}",
            changes.len(),
            importing_count,
            outputs.len()
        );

        Ok(RenderInputs {
            mode,
            changes,
            counts,
            importing_count,
            will_print_resource_changes,
            have_refresh_changes,
            outputs,
            no_changes,
            errored: qualities.contains(Quality::Errored),
        })
    }
}

impl RenderInputs {
    /// Returns the count for a single action.
    #[must_use]
    pub fn count(&self, action: Action) -> usize {
        self.counts.get(&action).copied().unwrap_or(0)
    }

    /// Number of objects to be created, replacements included.
    #[must_use]
    pub fn to_add(&self) -> usize {
        self.count(Action::Create)
            + self.count(Action::DeleteThenCreate)
            + self.count(Action::CreateThenDelete)
    }

    /// Number of objects to be updated in place.
    #[must_use]
    pub fn to_change(&self) -> usize {
        self.count(Action::Update)
    }

    /// Number of objects to be destroyed, replacements included.
    #[must_use]
    pub fn to_destroy(&self) -> usize {
        self.count(Action::Delete)
            + self.count(Action::DeleteThenCreate)
            + self.count(Action::CreateThenDelete)
    }

    /// Number of objects to be dropped from state.
    #[must_use]
    pub fn to_forget(&self) -> usize {
        self.count(Action::Forget)
    }

    /// Total of all per-action counts.
    #[must_use]
    pub fn total_counted(&self) -> usize {
        self.counts.values().sum()
    }
}
