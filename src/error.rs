//! Error types for the plan viewer.
//!
//! This module provides the error hierarchy for every stage of a render
//! pass: configuration, plan loading and mutation, schema resolution and
//! rendering.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the plan viewer.
#[derive(Debug, Error)]
pub enum PlanViewError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan loading and mutation errors.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Schema resolution errors.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Rendering collaborator errors.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// A value in the configuration or environment is invalid.
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Name of the field or variable.
        field: String,
        /// The rejected value.
        value: String,
    },
}

/// Plan loading and mutation errors.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan file was not found.
    #[error("Plan file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The plan document could not be parsed.
    #[error("Failed to parse plan: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// No resource change carries the requested name.
    #[error("resource '{name}' not found")]
    ResourceNotFound {
        /// The requested resource name.
        name: String,
    },

    /// No resource change carries the requested address.
    #[error("no resource change with address '{address}'")]
    AddressNotFound {
        /// The requested address.
        address: String,
    },

    /// A raw action list does not encode a known action.
    #[error("unrecognized change actions: [{}]", actions.join(", "))]
    UnrecognizedActions {
        /// The raw action list.
        actions: Vec<String>,
    },
}

/// Schema resolution errors.
///
/// All of these indicate plan data that violates the producer's contract.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The resource mode is neither `managed` nor `data`.
    #[error("found unrecognized resource mode: {mode}")]
    UnrecognizedResourceMode {
        /// The offending mode string.
        mode: String,
    },

    /// The provider has no entry in the plan's schema table.
    #[error("no schema for provider {provider} (needed by {address})")]
    ProviderNotFound {
        /// Provider identifier.
        provider: String,
        /// Address of the change that needed it.
        address: String,
    },

    /// The provider has no schema for the resource type.
    #[error("provider {provider} has no {mode} schema for {resource_type}")]
    SchemaNotFound {
        /// Provider identifier.
        provider: String,
        /// Resource mode that selected the table.
        mode: String,
        /// Resource type name.
        resource_type: String,
    },
}

/// Errors raised by rendering collaborators.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing rendered output failed.
    #[error("Failed to write rendered output: {message}")]
    WriteFailed {
        /// Description of the write failure.
        message: String,
    },

    /// A value could not be serialized for display.
    #[error("Failed to serialize {what}: {message}")]
    Serialization {
        /// What was being serialized.
        what: String,
        /// Description of the failure.
        message: String,
    },
}

/// Result type alias for plan viewer operations.
pub type Result<T> = std::result::Result<T, PlanViewError>;

impl PlanViewError {
    /// Returns true if this error means the plan data itself is malformed.
    ///
    /// Fatal errors must abort the render; the rest are user-facing
    /// conditions a CLI can report and carry on from.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Schema(_) | Self::Plan(PlanError::UnrecognizedActions { .. })
        )
    }
}

impl PlanError {
    /// Creates a parse error with an optional location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }
}

impl RenderError {
    /// Creates a serialization error for the named value.
    #[must_use]
    pub fn serialization(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            what: what.into(),
            message: message.into(),
        }
    }
}

impl From<std::fmt::Error> for RenderError {
    fn from(e: std::fmt::Error) -> Self {
        Self::WriteFailed {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_not_found_message() {
        let err = PlanError::ResourceNotFound {
            name: String::from("web"),
        };
        assert_eq!(err.to_string(), "resource 'web' not found");
    }

    #[test]
    fn test_unrecognized_mode_is_fatal() {
        let err: PlanViewError = SchemaError::UnrecognizedResourceMode {
            mode: String::from("ephemeral"),
        }
        .into();

        assert!(err.is_fatal());
        assert!(err.to_string().contains("found unrecognized resource mode: ephemeral"));
    }

    #[test]
    fn test_not_found_is_not_fatal() {
        let err: PlanViewError = PlanError::ResourceNotFound {
            name: String::from("web"),
        }
        .into();

        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_error_is_not_fatal() {
        let err: PlanViewError = std::io::Error::other("disk full").into();

        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "IO error: disk full");
    }

    #[test]
    fn test_unrecognized_actions_message() {
        let err = PlanError::UnrecognizedActions {
            actions: vec![String::from("delete"), String::from("read")],
        };
        assert_eq!(err.to_string(), "unrecognized change actions: [delete, read]");
    }
}
