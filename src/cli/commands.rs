//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::plan::PlanMode;

/// planview - human-readable summaries of infrastructure change plans.
#[derive(Parser, Debug)]
#[command(name = "planview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "PLANVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize the changes in a plan.
    Show {
        /// Path to the plan JSON document.
        plan: PathBuf,

        /// Mode the plan was produced in.
        #[arg(short, long)]
        mode: Option<PlanMode>,

        /// Resource names to drop from the plan before summarizing.
        #[arg(long = "forget", value_name = "NAME")]
        forget: Vec<String>,

        /// Mark the plan as having stopped on errors.
        #[arg(long)]
        errored: bool,
    },

    /// Print the schema used to interpret a resource change.
    Schema {
        /// Path to the plan JSON document.
        plan: PathBuf,

        /// Address of the resource change.
        address: String,
    },

    /// Remove resource changes from a plan.
    Forget {
        /// Path to the plan JSON document.
        plan: PathBuf,

        /// Resource names to remove, first match each.
        #[arg(required = true)]
        names: Vec<String>,

        /// Write the result back to the plan file instead of printing it.
        #[arg(short, long)]
        write: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_show() {
        let cli = Cli::try_parse_from([
            "planview",
            "show",
            "plan.json",
            "--mode",
            "refresh-only",
            "--forget",
            "web",
            "--forget",
            "db",
        ])
        .expect("arguments should parse");

        match cli.command {
            Commands::Show {
                plan,
                mode,
                forget,
                errored,
            } => {
                assert_eq!(plan, PathBuf::from("plan.json"));
                assert_eq!(mode, Some(PlanMode::RefreshOnly));
                assert_eq!(forget, vec!["web", "db"]);
                assert!(!errored);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_forget_requires_names() {
        assert!(Cli::try_parse_from(["planview", "forget", "plan.json"]).is_err());
    }

    #[test]
    fn test_global_output_flag() {
        let cli = Cli::try_parse_from(["planview", "schema", "plan.json", "cloud_vm.a", "--output", "json"])
            .expect("arguments should parse");
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
