//! Schema resolution for resource changes.

use tracing::debug;

use crate::error::SchemaError;

use super::types::{Plan, ResourceChange, ResourceMode, Schema};

impl Plan {
    /// Looks up the schema that describes `change`.
    ///
    /// The provider table is selected by `change.provider_name`, then the
    /// managed or data source table by `change.mode`, then the schema by
    /// `change.resource_type`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnrecognizedResourceMode`] for a mode other than
    /// `managed` or `data`, and [`SchemaError::ProviderNotFound`] or
    /// [`SchemaError::SchemaNotFound`] when the plan does not carry the
    /// schema. All of these mean the plan document is malformed.
    pub fn schema_for(&self, change: &ResourceChange) -> Result<&Schema, SchemaError> {
        let schemas = match &change.mode {
            ResourceMode::Managed | ResourceMode::Data => self
                .provider_schemas
                .get(&change.provider_name)
                .ok_or_else(|| SchemaError::ProviderNotFound {
                    provider: change.provider_name.clone(),
                    address: change.address.clone(),
                })?,
            ResourceMode::Unrecognized(mode) => {
                return Err(SchemaError::UnrecognizedResourceMode { mode: mode.clone() });
            }
        };

        let table = if change.mode == ResourceMode::Managed {
            &schemas.resource_schemas
        } else {
            &schemas.data_source_schemas
        };

        debug!(
            "Resolving {} schema {} from {}",
            change.mode, change.resource_type, change.provider_name
        );

        table
            .get(&change.resource_type)
            .ok_or_else(|| SchemaError::SchemaNotFound {
                provider: change.provider_name.clone(),
                mode: change.mode.to_string(),
                resource_type: change.resource_type.clone(),
            })
    }
}
