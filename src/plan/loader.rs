//! Loading plan documents from disk.

use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{PlanError, PlanViewError, RenderError, Result};

use super::types::Plan;

/// Loader for machine-readable plan documents.
#[derive(Debug, Default)]
pub struct PlanLoader {
    /// Base path for resolving relative paths.
    base_path: Option<PathBuf>,
}

impl PlanLoader {
    /// Creates a new plan loader.
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

    /// Resolves `path` against the base path if it is relative.
    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Reads the file at `path`, resolved against the base path.
    async fn read(&self, path: &Path) -> Result<(PathBuf, String)> {
        let path = self.resolve(path);
        info!("Loading plan from: {}", path.display());

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(PlanViewError::Plan(PlanError::FileNotFound { path }));
        }

        let content = fs::read_to_string(&path).await.map_err(|e| {
            PlanViewError::Plan(PlanError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            ))
        })?;

        Ok((path, content))
    }

    /// Loads a plan from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or is
    /// not a valid plan document.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<Plan> {
        let (path, content) = self.read(path.as_ref()).await?;
        Self::parse_json(&content, Some(&path))
    }

    /// Loads a plan file as an untyped JSON document.
    ///
    /// The document is checked against the plan model but returned as read,
    /// so that every key survives when it is written back.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or is
    /// not a valid plan document.
    pub async fn load_document(&self, path: impl AsRef<Path>) -> Result<Value> {
        let (path, content) = self.read(path.as_ref()).await?;
        let location = || Some(path.display().to_string());

        let document: Value = serde_json::from_str(&content).map_err(|e| {
            PlanViewError::Plan(PlanError::parse(format!("JSON parse error: {e}"), location()))
        })?;
        Plan::deserialize(&document).map_err(|e| {
            PlanViewError::Plan(PlanError::parse(format!("Invalid plan document: {e}"), location()))
        })?;

        Ok(document)
    }

    /// Parses a plan from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a valid plan document.
    pub fn parse_json(content: &str, source: Option<&Path>) -> Result<Plan> {
        debug!("Parsing plan JSON");

        let plan: Plan = serde_json::from_str(content).map_err(|e| {
            PlanViewError::Plan(PlanError::parse(
                format!("JSON parse error: {e}"),
                source.map(|p| p.display().to_string()),
            ))
        })?;

        debug!(
            "Parsed plan with {} changes, {} drift entries, {} outputs",
            plan.resource_changes.len(),
            plan.resource_drift.len(),
            plan.output_changes.len()
        );
        Ok(plan)
    }

    /// Writes a plan document back to disk as pretty-printed JSON.
    ///
    /// The document is written to a temporary sibling first and then renamed
    /// over the target.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub async fn save_file(&self, document: &Value, path: impl AsRef<Path>) -> Result<()> {
        let path = self.resolve(path.as_ref());
        let content = serde_json::to_string_pretty(document)
            .map_err(|e| RenderError::serialization("plan", e.to_string()))?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &path).await?;

        info!("Plan written to: {}", path.display());
        Ok(())
    }
}
