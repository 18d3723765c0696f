//! Configuration parser for loading viewer settings.
//!
//! Settings come from an optional YAML file, then from environment
//! variables, with command line flags applied last by the caller.

use crate::error::{ConfigError, PlanViewError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::ViewConfig;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "planview.yaml";

/// Configuration parser for loading viewer configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving relative paths.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ViewConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(PlanViewError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PlanViewError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<ViewConfig> {
        debug!("Parsing YAML configuration");

        if content.trim().is_empty() {
            return Ok(ViewConfig::default());
        }

        let config: ViewConfig = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            PlanViewError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        Ok(config)
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// Without a file, defaults are used before the overrides apply.
    /// Environment variables use the form `PLANVIEW_<KEY>`
    /// (e.g., `PLANVIEW_MODE`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an
    /// override holds an invalid value.
    pub fn load_with_env(&self, path: Option<&Path>) -> Result<ViewConfig> {
        let mut config = match path {
            Some(path) => self.load_file(path)?,
            None => ViewConfig::default(),
        };

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(
        config: &mut ViewConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(mode) = lookup("PLANVIEW_MODE") {
            debug!("Overriding mode from environment");
            config.mode = mode.parse().map_err(|_| ConfigError::InvalidValue {
                field: String::from("PLANVIEW_MODE"),
                value: mode.clone(),
            })?;
        }

        if let Some(color) = lookup("PLANVIEW_COLOR") {
            debug!("Overriding color from environment");
            config.color = parse_bool(&color).ok_or_else(|| ConfigError::InvalidValue {
                field: String::from("PLANVIEW_COLOR"),
                value: color.clone(),
            })?;
        }

        if let Some(format) = lookup("PLANVIEW_FORMAT") {
            debug!("Overriding format from environment");
            config.format = format.parse().map_err(|_| ConfigError::InvalidValue {
                field: String::from("PLANVIEW_FORMAT"),
                value: format.clone(),
            })?;
        }

        Ok(())
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                PlanViewError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Finds the configuration file by walking up from `start`.
///
/// Returns `None` if no directory on the way up holds one.
#[must_use]
pub fn find_config_file(start: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = Some(start.as_ref());

    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!("Found configuration file: {}", candidate.display());
            return Some(candidate);
        }
        current = dir.parent();
    }

    None
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
