// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # planview
//!
//! Human-readable summaries of infrastructure change plans.
//!
//! ## Overview
//!
//! Given the machine-readable form of a plan, planview decides which entries
//! are worth showing and how to count them:
//!
//! - No-op changes are hidden unless the resource moved or is being imported
//! - Deleted data sources are never shown
//! - Move-only and import-only changes are shown but not counted
//! - Drift is shown only when it contributed to the plan
//!
//! ## Architecture
//!
//! A render pass flows one way:
//!
//! 1. **Plan**: loaded from JSON, optionally trimmed with
//!    [`Plan::forget_resource`]
//! 2. **Diffs**: computed per entry, resolving each resource's schema with
//!    [`Plan::schema_for`]
//! 3. **Classification**: [`ChangeClassifier`] filters and counts the changes
//! 4. **Output**: [`OutputFormatter`] prints the summary
//!
//! ## Modules
//!
//! - [`config`]: Viewer configuration
//! - [`plan`]: Plan data model, schema resolution and removal
//! - [`render`]: Diff computation, drift/output rendering and classification
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```no_run
//! use planview::{ChangeClassifier, PlanLoader, PlanMode, QualitySet, TextRenderer};
//!
//! # fn main() -> planview::Result<()> {
//! let mut plan = PlanLoader::parse_json(r#"{"resource_changes": []}"#, None)?;
//! let _ = plan.forget_resource("web");
//!
//! let mut renderer = TextRenderer::new(false);
//! let inputs = ChangeClassifier::new().classify(
//!     &plan,
//!     PlanMode::Normal,
//!     &QualitySet::new(),
//!     &mut renderer,
//! )?;
//! assert!(inputs.no_changes);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod plan;
pub mod render;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormat, OutputFormatter};
pub use config::{ConfigParser, ViewConfig};
pub use error::{PlanViewError, Result};
pub use plan::{Action, Plan, PlanLoader, PlanMode, Quality, QualitySet, ResourceChange};
pub use render::{ChangeClassifier, DiffEngine, RenderInputs, TextRenderer};
