//! Configuration types for the plan viewer.
//!
//! These structs map onto the optional `planview.yaml` file.

use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::plan::PlanMode;

/// Viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    /// Plan mode used when the command line does not name one.
    #[serde(default)]
    pub mode: PlanMode,
    /// Whether to emit colors.
    #[serde(default = "default_true")]
    pub color: bool,
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
    /// Resource names removed from every plan before rendering.
    #[serde(default)]
    pub forget: Vec<String>,
    /// Whether to print the drift section.
    #[serde(default = "default_true")]
    pub show_drift: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            mode: PlanMode::default(),
            color: true,
            format: OutputFormat::default(),
            forget: Vec::new(),
            show_drift: true,
        }
    }
}

const fn default_true() -> bool {
    true
}
