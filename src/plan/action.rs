//! Change actions, plan modes and plan qualities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::PlanError;

/// A decoded change action.
///
/// Variant order is the order used when actions are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Nothing changes.
    NoOp,
    /// Create a new object.
    Create,
    /// Read a data source.
    Read,
    /// Update an object in place.
    Update,
    /// Replace: destroy the old object before creating the new one.
    DeleteThenCreate,
    /// Replace: create the new object before destroying the old one.
    CreateThenDelete,
    /// Destroy an object.
    Delete,
    /// Drop an object from state without destroying it.
    Forget,
}

/// The mode a plan was produced in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PlanMode {
    /// Converge infrastructure to the configuration.
    #[default]
    Normal,
    /// Destroy every managed object.
    Destroy,
    /// Only update state to match real infrastructure.
    RefreshOnly,
}

/// Qualities a plan can carry alongside its changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quality {
    /// Planning stopped early because of errors.
    Errored,
    /// The plan is known to contain no changes.
    NoChanges,
}

/// A set of plan qualities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualitySet(BTreeSet<Quality>);

/// Decodes a raw action list into a single action.
///
/// # Errors
///
/// Returns [`PlanError::UnrecognizedActions`] if the list is not one of the
/// encodings a plan document can contain.
pub fn decode_actions(raw: &[String]) -> Result<Action, PlanError> {
    let parts: Vec<&str> = raw.iter().map(String::as_str).collect();
    let action = match parts.as_slice() {
        ["no-op"] => Action::NoOp,
        ["create"] => Action::Create,
        ["read"] => Action::Read,
        ["update"] => Action::Update,
        ["delete"] => Action::Delete,
        ["forget"] => Action::Forget,
        ["delete", "create"] => Action::DeleteThenCreate,
        ["create", "delete"] => Action::CreateThenDelete,
        _ => {
            return Err(PlanError::UnrecognizedActions {
                actions: raw.to_vec(),
            });
        }
    };
    Ok(action)
}

impl Action {
    /// Returns true for both replacement orderings.
    #[must_use]
    pub const fn is_replace(self) -> bool {
        matches!(self, Self::DeleteThenCreate | Self::CreateThenDelete)
    }

    /// Returns the symbol shown next to a resource with this action.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::NoOp => " ",
            Self::Create => "+",
            Self::Read => "<=",
            Self::Update => "~",
            Self::DeleteThenCreate => "-/+",
            Self::CreateThenDelete => "+/-",
            Self::Delete => "-",
            Self::Forget => ".",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::DeleteThenCreate => "replace (delete then create)",
            Self::CreateThenDelete => "replace (create then delete)",
            Self::Delete => "delete",
            Self::Forget => "forget",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normal => "normal",
            Self::Destroy => "destroy",
            Self::RefreshOnly => "refresh-only",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PlanMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "destroy" => Ok(Self::Destroy),
            "refresh-only" | "refresh_only" => Ok(Self::RefreshOnly),
            other => Err(format!("unknown plan mode: {other}")),
        }
    }
}

impl QualitySet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Adds a quality to the set.
    #[must_use]
    pub fn with(mut self, quality: Quality) -> Self {
        self.0.insert(quality);
        self
    }

    /// Returns true if the set holds `quality`.
    #[must_use]
    pub fn contains(&self, quality: Quality) -> bool {
        self.0.contains(&quality)
    }
}

impl FromIterator<Quality> for QualitySet {
    fn from_iter<I: IntoIterator<Item = Quality>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
