//! planview CLI entrypoint.
//!
//! This is the main entrypoint for the planview command-line tool.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use planview::cli::{Cli, Commands, OutputFormat, OutputFormatter};
use planview::config::{find_config_file, ConfigParser, ViewConfig};
use planview::error::{PlanError, PlanViewError, Result};
use planview::plan::{forget_in_document, PlanLoader, PlanMode, Quality, QualitySet};
use planview::render::{ChangeClassifier, TextRenderer};

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.output == Some(OutputFormat::Json));

    // Plan rendering is single-threaded; a current-thread runtime is enough
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_fatal() {
                eprintln!("Error: malformed plan data: {e}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_env("PLANVIEW_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Log level used when `PLANVIEW_LOG` is not set.
const fn default_log_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.no_color {
        config.color = false;
    }
    if let Some(format) = cli.output {
        config.format = format;
    }

    colored::control::set_override(config.color);
    let formatter = OutputFormatter::new(config.format, config.color);

    match cli.command {
        Commands::Show {
            plan,
            mode,
            forget,
            errored,
        } => {
            let mode = mode.unwrap_or(config.mode);
            cmd_show(&plan, mode, &config, &forget, errored, &formatter).await
        }
        Commands::Schema { plan, address } => cmd_schema(&plan, &address, &formatter).await,
        Commands::Forget { plan, names, write } => {
            cmd_forget(&plan, &names, write, &formatter).await
        }
    }
}

/// Summarize a plan.
async fn cmd_show(
    plan_path: &Path,
    mode: PlanMode,
    config: &ViewConfig,
    forget: &[String],
    errored: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut plan = PlanLoader::new().load_file(plan_path).await?;

    // Names from the config are best effort; names on the command line must exist
    for name in &config.forget {
        if let Err(e) = plan.forget_resource(name) {
            warn!("Skipping configured forget: {e}");
        }
    }
    for name in forget {
        plan.forget_resource(name)?;
    }

    let qualities = if errored {
        QualitySet::new().with(Quality::Errored)
    } else {
        QualitySet::new()
    };

    let mut renderer = TextRenderer::new(config.color);
    let inputs = ChangeClassifier::new().classify(&plan, mode, &qualities, &mut renderer)?;
    debug!(
        "Summary: {} changes shown, no_changes={}",
        inputs.changes.len(),
        inputs.no_changes
    );

    let drift = config.show_drift.then(|| renderer.drift_section());
    let output = formatter.format_summary(&inputs, drift)?;
    println!("{output}");

    Ok(())
}

/// Print the schema for a resource change.
async fn cmd_schema(plan_path: &Path, address: &str, formatter: &OutputFormatter) -> Result<()> {
    let plan = PlanLoader::new().load_file(plan_path).await?;

    let change = plan.find_change(address).ok_or_else(|| {
        PlanViewError::Plan(PlanError::AddressNotFound {
            address: address.to_string(),
        })
    })?;
    let schema = plan.schema_for(change)?;

    let output = formatter.format_schema(address, schema)?;
    println!("{output}");

    Ok(())
}

/// Remove resource changes from a plan.
async fn cmd_forget(
    plan_path: &Path,
    names: &[String],
    write: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let loader = PlanLoader::new();
    let mut document = loader.load_document(plan_path).await?;

    for name in names {
        forget_in_document(&mut document, name)?;
    }

    if write {
        loader.save_file(&document, plan_path).await?;
        info!("Removed {} resource changes", names.len());
    } else {
        let output = formatter.format_document(&document)?;
        println!("{output}");
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Loads the viewer configuration.
///
/// An explicit path must exist; otherwise the nearest `planview.yaml` is
/// used if there is one.
fn load_config(config_path: Option<&Path>) -> Result<ViewConfig> {
    let config_file: Option<PathBuf> = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::current_dir().ok().and_then(|dir| find_config_file(dir)),
    };

    let base = config_file
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    let parser = ConfigParser::new().with_base_path(base);
    parser.load_dotenv()?;

    parser.load_with_env(config_file.as_deref())
}
