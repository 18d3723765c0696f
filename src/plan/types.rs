//! Plan document types.
//!
//! These structs map onto the machine-readable plan document produced by the
//! planning tool. They are deserialized once per render invocation and then
//! consumed read-only, apart from explicit removals.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A complete change plan, as handed to the renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Plan format version tag (opaque).
    #[serde(default)]
    pub plan_format_version: String,
    /// Output value changes keyed by output name.
    #[serde(default)]
    pub output_changes: BTreeMap<String, Change>,
    /// Proposed resource changes, in plan order.
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
    /// Differences observed between real infrastructure and recorded state.
    #[serde(default)]
    pub resource_drift: Vec<ResourceChange>,
    /// Attributes that contributed to the proposed changes.
    #[serde(default)]
    pub relevant_attributes: Vec<ResourceAttr>,
    /// Provider schema format version tag (opaque).
    #[serde(default)]
    pub provider_format_version: String,
    /// Provider schemas keyed by provider identifier.
    #[serde(default)]
    pub provider_schemas: BTreeMap<String, ProviderSchema>,
}

/// A single resource entry in either the change or the drift list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceChange {
    /// Absolute resource address.
    pub address: String,
    /// Address the resource had before a move, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_address: Option<String>,
    /// Address of the containing module, if not the root module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_address: Option<String>,
    /// Resource mode.
    pub mode: ResourceMode,
    /// Resource type name.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource name within its module.
    pub name: String,
    /// Instance key for counted or keyed resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    /// Provider identifier, a key into [`Plan::provider_schemas`].
    pub provider_name: String,
    /// Deposed object key, if this change targets a deposed object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposed: Option<String>,
    /// The change itself.
    pub change: Change,
    /// Reason reported by the planner for the chosen action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_reason: Option<String>,
}

/// Before/after description of a change to a resource or output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Change {
    /// Raw action list, e.g. `["delete", "create"]`.
    pub actions: Vec<String>,
    /// Value before the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    /// Value after the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
    /// Mirror of `after` marking values unknown until apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_unknown: Option<Value>,
    /// Mirror of `before` marking sensitive values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_sensitive: Option<Value>,
    /// Mirror of `after` marking sensitive values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_sensitive: Option<Value>,
    /// Attribute paths that forced a replacement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_paths: Option<Value>,
    /// Present when the resource is being imported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importing: Option<Importing>,
    /// Configuration generated for an imported resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_config: Option<String>,
}

/// Import details for a resource change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Importing {
    /// Identifier of the real object being imported.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

/// Reference to an attribute of a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceAttr {
    /// Resource address the attribute belongs to.
    #[serde(default)]
    pub resource: String,
    /// Attribute path, as a JSON array of steps.
    #[serde(default)]
    pub attribute: Value,
}

/// Resource addressing mode.
///
/// Deserialization never fails on the mode string; an unknown value is kept
/// so that schema resolution can report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceMode {
    /// A resource whose lifecycle the plan controls.
    Managed,
    /// A read-only data source.
    Data,
    /// Any other mode string.
    Unrecognized(String),
}

/// Schemas published by one provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderSchema {
    /// Schema of the provider configuration block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Schema>,
    /// Managed resource schemas keyed by resource type.
    #[serde(default)]
    pub resource_schemas: BTreeMap<String, Schema>,
    /// Data source schemas keyed by resource type.
    #[serde(default)]
    pub data_source_schemas: BTreeMap<String, Schema>,
}

/// Versioned schema for a single resource type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    /// Schema version.
    #[serde(default)]
    pub version: u64,
    /// Root block.
    #[serde(default)]
    pub block: Block,
}

/// A configuration block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Block {
    /// Attributes keyed by name.
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
    /// Nested block types keyed by name.
    #[serde(default)]
    pub block_types: BTreeMap<String, NestedBlock>,
    /// Block description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the block is deprecated.
    #[serde(default)]
    pub deprecated: bool,
}

/// A single attribute within a block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    /// Attribute type expression.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub attribute_type: Option<Value>,
    /// Nested attribute type, for structural attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_type: Option<Value>,
    /// Attribute description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the attribute is deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Whether the attribute must be set.
    #[serde(default)]
    pub required: bool,
    /// Whether the attribute may be set.
    #[serde(default)]
    pub optional: bool,
    /// Whether the provider may compute the attribute.
    #[serde(default)]
    pub computed: bool,
    /// Whether the attribute holds a sensitive value.
    #[serde(default)]
    pub sensitive: bool,
}

/// A nested block type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NestedBlock {
    /// The nested block's own schema.
    #[serde(default)]
    pub block: Block,
    /// Nesting mode (single, list, set, map, group).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nesting_mode: Option<String>,
    /// Minimum number of blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Maximum number of blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
}

impl ResourceMode {
    /// Returns the mode string as it appears in plan documents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Managed => "managed",
            Self::Data => "data",
            Self::Unrecognized(mode) => mode,
        }
    }
}

impl From<String> for ResourceMode {
    fn from(mode: String) -> Self {
        match mode.as_str() {
            "managed" => Self::Managed,
            "data" => Self::Data,
            _ => Self::Unrecognized(mode),
        }
    }
}

impl From<ResourceMode> for String {
    fn from(mode: ResourceMode) -> Self {
        match mode {
            ResourceMode::Unrecognized(mode) => mode,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ResourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResourceChange {
    /// Returns true if the resource was moved from another address.
    #[must_use]
    pub fn is_moved(&self) -> bool {
        self.previous_address
            .as_deref()
            .is_some_and(|prev| !prev.is_empty() && prev != self.address)
    }

    /// Returns true if the resource is being imported.
    #[must_use]
    pub const fn is_importing(&self) -> bool {
        self.change.importing.is_some()
    }
}

impl ResourceAttr {
    /// Returns true if this reference applies to the resource at `address`.
    #[must_use]
    pub fn applies_to(&self, address: &str) -> bool {
        self.resource == address
    }

    /// Returns the first step of the attribute path, if it names an attribute.
    ///
    /// `None` means the path is empty and refers to the whole resource.
    #[must_use]
    pub fn root_attribute(&self) -> Option<&str> {
        match &self.attribute {
            Value::Array(steps) => steps.first().and_then(Value::as_str),
            Value::String(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl Block {
    /// Returns true if the named attribute is marked sensitive.
    #[must_use]
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.attributes.get(name).is_some_and(|a| a.sensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip_strings() {
        let managed: ResourceMode = serde_json::from_str("\"managed\"").expect("parse managed");
        let data: ResourceMode = serde_json::from_str("\"data\"").expect("parse data");
        let other: ResourceMode = serde_json::from_str("\"ephemeral\"").expect("parse other");

        assert_eq!(managed, ResourceMode::Managed);
        assert_eq!(data, ResourceMode::Data);
        assert_eq!(other, ResourceMode::Unrecognized(String::from("ephemeral")));
        assert_eq!(
            serde_json::to_string(&other).expect("serialize"),
            "\"ephemeral\""
        );
    }

    #[test]
    fn test_parse_resource_change() {
        let json = r#"{
            "address": "aws_instance.web",
            "previous_address": "aws_instance.old",
            "mode": "managed",
            "type": "aws_instance",
            "name": "web",
            "provider_name": "registry.example.io/hashicorp/aws",
            "change": {
                "actions": ["no-op"],
                "before": {"ami": "a"},
                "after": {"ami": "a"},
                "importing": {"id": "i-123"}
            }
        }"#;

        let rc: ResourceChange = serde_json::from_str(json).expect("parse change");

        assert_eq!(rc.resource_type, "aws_instance");
        assert_eq!(rc.mode, ResourceMode::Managed);
        assert!(rc.is_moved());
        assert!(rc.is_importing());
        assert_eq!(rc.change.importing.map(|i| i.id), Some(String::from("i-123")));
    }

    #[test]
    fn test_previous_address_equal_is_not_moved() {
        let json = r#"{
            "address": "aws_instance.web",
            "previous_address": "aws_instance.web",
            "mode": "managed",
            "type": "aws_instance",
            "name": "web",
            "provider_name": "aws",
            "change": {"actions": ["update"]}
        }"#;

        let rc: ResourceChange = serde_json::from_str(json).expect("parse change");
        assert!(!rc.is_moved());
        assert!(!rc.is_importing());
    }

    #[test]
    fn test_resource_attr_without_resource_matches_nothing() {
        let attr = ResourceAttr {
            resource: String::new(),
            attribute: serde_json::json!(["tags"]),
        };
        assert!(!attr.applies_to("aws_instance.web"));
        assert!(!attr.applies_to("aws_instance.db"));
    }

    #[test]
    fn test_resource_attr_root() {
        let attr = ResourceAttr {
            resource: String::from("aws_instance.web"),
            attribute: serde_json::json!(["tags", "Name"]),
        };
        assert!(attr.applies_to("aws_instance.web"));
        assert_eq!(attr.root_attribute(), Some("tags"));

        let whole = ResourceAttr {
            resource: String::from("aws_instance.web"),
            attribute: serde_json::json!([]),
        };
        assert!(whole.applies_to("aws_instance.web"));
        assert!(!whole.applies_to("aws_instance.db"));
        assert_eq!(whole.root_attribute(), None);
    }

    #[test]
    fn test_empty_plan_defaults() {
        let plan: Plan = serde_json::from_str("{}").expect("parse empty plan");
        assert!(plan.resource_changes.is_empty());
        assert!(plan.output_changes.is_empty());
        assert!(plan.provider_schemas.is_empty());
    }
}
