//! Plan data model.
//!
//! This module holds the structured plan consumed by the renderer, along
//! with the operations applied to it directly: action decoding, schema
//! resolution, removal of resource changes, and loading from disk.

mod action;
mod forget;
mod loader;
mod schema;
mod types;

pub use action::{decode_actions, Action, PlanMode, Quality, QualitySet};
pub use forget::forget_in_document;
pub use loader::PlanLoader;
pub use types::{
    Attribute, Block, Change, Importing, NestedBlock, Plan, ProviderSchema, ResourceAttr,
    ResourceChange, ResourceMode, Schema,
};
