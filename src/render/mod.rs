//! Rendering module for plan summaries.
//!
//! This module pairs plan entries with computed diffs, renders drift and
//! outputs, and classifies proposed changes for the summary.

mod classify;
mod diff;
mod renderer;

pub use classify::{ChangeClassifier, RenderInputs};
pub use diff::{AttributeChange, Diff, DiffEngine, DiffSet, DiffSource, OutputDiff, ResourceDiff};
pub use renderer::{RenderedOutput, Renderer, TextRenderer};
