//! Removal of resource changes from a plan before rendering.

use serde_json::Value;
use tracing::info;

use crate::error::PlanError;

use super::types::{Plan, ResourceChange};

impl Plan {
    /// Removes the first resource change whose name is `name`.
    ///
    /// The remaining changes keep their relative order. Later entries with
    /// the same name are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::ResourceNotFound`] if no change has that name;
    /// the plan is not modified in that case.
    pub fn forget_resource(&mut self, name: &str) -> Result<(), PlanError> {
        let position = self
            .resource_changes
            .iter()
            .position(|change| change.name == name)
            .ok_or_else(|| PlanError::ResourceNotFound {
                name: name.to_string(),
            })?;

        let removed = self.resource_changes.remove(position);
        info!("Forgot resource change {} ({})", removed.name, removed.address);
        Ok(())
    }

    /// Returns the resource change at `address`, if any.
    #[must_use]
    pub fn find_change(&self, address: &str) -> Option<&ResourceChange> {
        self.resource_changes.iter().find(|c| c.address == address)
    }
}

/// Removes the first resource change named `name` from a raw plan document.
///
/// Applies the same rule as [`Plan::forget_resource`] without going through
/// the typed model, so keys the model does not know survive a rewrite.
///
/// # Errors
///
/// Returns [`PlanError::ResourceNotFound`] if no change has that name;
/// the document is not modified in that case.
pub fn forget_in_document(document: &mut Value, name: &str) -> Result<(), PlanError> {
    let not_found = || PlanError::ResourceNotFound {
        name: name.to_string(),
    };

    let changes = document
        .get_mut("resource_changes")
        .and_then(Value::as_array_mut)
        .ok_or_else(not_found)?;
    let position = changes
        .iter()
        .position(|change| change.get("name").and_then(Value::as_str) == Some(name))
        .ok_or_else(not_found)?;

    let removed = changes.remove(position);
    info!(
        "Forgot resource change {name} ({})",
        removed.get("address").and_then(serde_json::Value::as_str).unwrap_or_default()
    );
    Ok(())
}
