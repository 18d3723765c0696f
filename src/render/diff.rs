//! Diff computation for resource changes, drift and outputs.
//!
//! Each entry of the plan is paired with a render-ready payload. The
//! [`DiffSource`] trait is the seam the classifier consumes; [`DiffEngine`]
//! is the default implementation and only looks at top-level attributes.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::Result;
use crate::plan::{decode_actions, Action, Block, Change, Plan, PlanMode, ResourceChange};

/// A resource change paired with its computed diff.
#[derive(Debug, Clone, PartialEq)]
pub struct Diff {
    /// The plan entry.
    pub change: ResourceChange,
    /// The computed payload.
    pub diff: ResourceDiff,
}

/// Render-ready payload for a single resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDiff {
    /// Decoded action of the entry.
    pub action: Action,
    /// Changed attributes, ordered by name.
    pub attributes: Vec<AttributeChange>,
}

/// A change to one top-level attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    /// Attribute name.
    pub name: String,
    /// Value before the change.
    pub before: Option<Value>,
    /// Value after the change.
    pub after: Option<Value>,
    /// Whether either value is sensitive.
    pub sensitive: bool,
    /// Whether the new value is unknown until apply.
    pub unknown: bool,
}

/// Render-ready payload for an output value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDiff {
    /// Output name.
    pub name: String,
    /// Decoded action.
    pub action: Action,
    /// Value before the change.
    pub before: Option<Value>,
    /// Value after the change.
    pub after: Option<Value>,
    /// Whether either value is sensitive.
    pub sensitive: bool,
    /// Whether the new value is unknown until apply.
    pub unknown: bool,
}

/// Every diff computed for one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffSet {
    /// Drift entries worth showing.
    pub drift: Vec<Diff>,
    /// Proposed changes, in plan order.
    pub changes: Vec<Diff>,
    /// Output changes, ordered by name.
    pub outputs: Vec<OutputDiff>,
}

/// Source of diffs for a plan.
pub trait DiffSource {
    /// Computes drift, change and output diffs for `plan` in `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is malformed.
    fn compute_diffs(&self, plan: &Plan, mode: PlanMode) -> Result<DiffSet>;
}

/// Which attributes of a resource are worth comparing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Relevance {
    All,
    Only(BTreeSet<String>),
}

/// Default diff computation over top-level attributes.
#[derive(Debug, Default)]
pub struct DiffEngine;

impl Diff {
    /// Returns true if the resource moved to a new address.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.change.is_moved()
    }

    /// Returns true if the resource is being imported.
    #[must_use]
    pub const fn importing(&self) -> bool {
        self.change.is_importing()
    }

    /// Returns the decoded action of the payload.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.diff.action
    }
}

impl DiffSet {
    /// Returns true if nothing in the plan would change.
    ///
    /// Move-only entries count as changes; drift does not.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes
            .iter()
            .all(|d| d.action() == Action::NoOp && !d.moved())
            && self.outputs.iter().all(|o| o.action == Action::NoOp)
    }
}

impl Relevance {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(name),
        }
    }
}

impl DiffEngine {
    /// Creates a new diff engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Works out which attributes of a drift entry are relevant.
    ///
    /// Returns `None` when nothing about the entry contributed to the plan.
    fn drift_relevance(plan: &Plan, drift: &ResourceChange, mode: PlanMode) -> Option<Relevance> {
        if mode == PlanMode::RefreshOnly {
            return Some(Relevance::All);
        }

        let mut names = BTreeSet::new();
        for attr in plan.relevant_attributes.iter().filter(|a| a.applies_to(&drift.address)) {
            match attr.root_attribute() {
                Some(name) => {
                    names.insert(name.to_string());
                }
                None => return Some(Relevance::All),
            }
        }

        if names.is_empty() {
            None
        } else {
            Some(Relevance::Only(names))
        }
    }

    /// Computes the payload for one resource entry.
    fn resource_diff(
        plan: &Plan,
        change: &ResourceChange,
        relevance: &Relevance,
    ) -> Result<ResourceDiff> {
        let schema = plan.schema_for(change)?;
        let action = decode_actions(&change.change.actions)?;
        let attributes = Self::attribute_changes(&change.change, &schema.block, relevance);

        Ok(ResourceDiff { action, attributes })
    }

    /// Compares the top-level attributes of a change.
    fn attribute_changes(
        change: &Change,
        block: &Block,
        relevance: &Relevance,
    ) -> Vec<AttributeChange> {
        let empty = Map::new();
        let before = change.before.as_ref().and_then(Value::as_object).unwrap_or(&empty);
        let after = change.after.as_ref().and_then(Value::as_object).unwrap_or(&empty);
        let unknown = change.after_unknown.as_ref().and_then(Value::as_object);

        let names: BTreeSet<&String> = before
            .keys()
            .chain(after.keys())
            .chain(unknown.into_iter().flat_map(Map::keys))
            .collect();
        let mut attributes = Vec::new();

        for name in names {
            if !relevance.matches(name) {
                continue;
            }

            let old = before.get(name.as_str());
            let new = after.get(name.as_str());
            let is_unknown = unknown
                .and_then(|u| u.get(name.as_str()))
                .is_some_and(|v| v.as_bool() == Some(true));

            if old == new && !is_unknown {
                continue;
            }

            let sensitive = block.is_sensitive(name)
                || marked_sensitive(change.before_sensitive.as_ref(), name)
                || marked_sensitive(change.after_sensitive.as_ref(), name);

            attributes.push(AttributeChange {
                name: name.clone(),
                before: old.cloned(),
                after: new.cloned(),
                sensitive,
                unknown: is_unknown,
            });
        }

        attributes
    }

    /// Computes the payload for one output change.
    fn output_diff(name: &str, change: &Change) -> Result<OutputDiff> {
        let action = decode_actions(&change.actions)?;
        let sensitive = is_true(change.before_sensitive.as_ref())
            || is_true(change.after_sensitive.as_ref());

        Ok(OutputDiff {
            name: name.to_string(),
            action,
            before: change.before.clone(),
            after: change.after.clone(),
            sensitive,
            unknown: is_true(change.after_unknown.as_ref()),
        })
    }
}

impl DiffSource for DiffEngine {
    fn compute_diffs(&self, plan: &Plan, mode: PlanMode) -> Result<DiffSet> {
        let mut drift = Vec::new();
        for entry in &plan.resource_drift {
            let Some(relevance) = Self::drift_relevance(plan, entry, mode) else {
                debug!("Skipping drift for {}: no relevant attributes", entry.address);
                continue;
            };

            drift.push(Diff {
                change: entry.clone(),
                diff: Self::resource_diff(plan, entry, &relevance)?,
            });
        }

        let changes = plan
            .resource_changes
            .iter()
            .map(|entry| {
                Ok(Diff {
                    change: entry.clone(),
                    diff: Self::resource_diff(plan, entry, &Relevance::All)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let outputs = plan
            .output_changes
            .iter()
            .map(|(name, change)| Self::output_diff(name, change))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Computed {} drift, {} change and {} output diffs",
            drift.len(),
            changes.len(),
            outputs.len()
        );

        Ok(DiffSet {
            drift,
            changes,
            outputs,
        })
    }
}

/// Returns true if a sensitivity mirror marks `name` as sensitive.
fn marked_sensitive(mirror: Option<&Value>, name: &str) -> bool {
    mirror
        .and_then(Value::as_object)
        .and_then(|m| m.get(name))
        .is_some_and(|v| v.as_bool() == Some(true))
}

fn is_true(value: Option<&Value>) -> bool {
    value.and_then(Value::as_bool) == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Attribute, Importing, ProviderSchema, ResourceAttr, ResourceMode, Schema};
    use serde_json::json;

    const PROVIDER: &str = "cloud";

    fn create_change(address: &str, actions: &[&str], before: Value, after: Value) -> ResourceChange {
        ResourceChange {
            address: address.to_string(),
            previous_address: None,
            module_address: None,
            mode: ResourceMode::Managed,
            resource_type: String::from("cloud_vm"),
            name: address.rsplit('.').next().unwrap_or(address).to_string(),
            index: None,
            provider_name: PROVIDER.to_string(),
            deposed: None,
            change: Change {
                actions: actions.iter().map(|a| (*a).to_string()).collect(),
                before: Some(before),
                after: Some(after),
                ..Change::default()
            },
            action_reason: None,
        }
    }

    fn create_test_plan() -> Plan {
        let mut block = Block::default();
        block.attributes.insert(
            String::from("password"),
            Attribute {
                sensitive: true,
                ..Attribute::default()
            },
        );
        let mut provider = ProviderSchema::default();
        provider
            .resource_schemas
            .insert(String::from("cloud_vm"), Schema { version: 0, block });

        let mut plan = Plan::default();
        plan.provider_schemas.insert(PROVIDER.to_string(), provider);
        plan
    }

    #[test]
    fn test_changes_keep_plan_order() {
        let mut plan = create_test_plan();
        plan.resource_changes.push(create_change("cloud_vm.b", &["create"], json!(null), json!({"size": "s"})));
        plan.resource_changes.push(create_change("cloud_vm.a", &["no-op"], json!({}), json!({})));

        let diffs = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect("diffs should compute");

        let addresses: Vec<_> = diffs.changes.iter().map(|d| d.change.address.as_str()).collect();
        assert_eq!(addresses, vec!["cloud_vm.b", "cloud_vm.a"]);
        assert_eq!(diffs.changes[0].action(), Action::Create);
        assert_eq!(diffs.changes[0].diff.attributes.len(), 1);
    }

    #[test]
    fn test_attribute_changes_mask_sensitive() {
        let mut plan = create_test_plan();
        plan.resource_changes.push(create_change(
            "cloud_vm.a",
            &["update"],
            json!({"password": "old", "size": "s", "name": "a"}),
            json!({"password": "new", "size": "m", "name": "a"}),
        ));

        let diffs = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect("diffs should compute");

        let attrs = &diffs.changes[0].diff.attributes;
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, "password");
        assert!(attrs[0].sensitive);
        assert_eq!(attrs[1].name, "size");
        assert!(!attrs[1].sensitive);
    }

    #[test]
    fn test_unknown_after_apply_is_reported() {
        let mut plan = create_test_plan();
        let mut change = create_change("cloud_vm.a", &["create"], json!(null), json!({}));
        change.change.after_unknown = Some(json!({"id": true}));
        plan.resource_changes.push(change);

        let diffs = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect("diffs should compute");

        let attrs = &diffs.changes[0].diff.attributes;
        assert_eq!(attrs.len(), 1);
        assert!(attrs[0].unknown);
    }

    #[test]
    fn test_drift_skipped_without_relevant_attributes() {
        let mut plan = create_test_plan();
        plan.resource_drift.push(create_change("cloud_vm.a", &["update"], json!({"size": "s"}), json!({"size": "m"})));

        let normal = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect("diffs should compute");
        let refresh = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::RefreshOnly)
            .expect("diffs should compute");

        assert!(normal.drift.is_empty());
        assert_eq!(refresh.drift.len(), 1);
    }

    #[test]
    fn test_drift_limited_to_relevant_attributes() {
        let mut plan = create_test_plan();
        plan.resource_drift.push(create_change(
            "cloud_vm.a",
            &["update"],
            json!({"size": "s", "tags": {"env": "dev"}}),
            json!({"size": "m", "tags": {"env": "prod"}}),
        ));
        plan.relevant_attributes.push(ResourceAttr {
            resource: String::from("cloud_vm.a"),
            attribute: json!(["tags", "env"]),
        });
        plan.relevant_attributes.push(ResourceAttr {
            resource: String::from("cloud_vm.other"),
            attribute: json!(["size"]),
        });

        let diffs = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect("diffs should compute");

        assert_eq!(diffs.drift.len(), 1);
        let attrs = &diffs.drift[0].diff.attributes;
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].name, "tags");
    }

    #[test]
    fn test_drift_ignores_attribute_without_resource() {
        let mut plan = create_test_plan();
        plan.resource_drift.push(create_change(
            "cloud_vm.a",
            &["update"],
            json!({"size": "s"}),
            json!({"size": "m"}),
        ));
        plan.relevant_attributes.push(ResourceAttr {
            resource: String::new(),
            attribute: json!(["size"]),
        });

        let diffs = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect("diffs should compute");

        assert!(diffs.drift.is_empty());
    }

    #[test]
    fn test_schema_errors_propagate() {
        let mut plan = create_test_plan();
        let mut change = create_change("cloud_vm.a", &["create"], json!(null), json!({}));
        change.mode = ResourceMode::Unrecognized(String::from("ephemeral"));
        plan.resource_changes.push(change);

        let err = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect_err("malformed mode should fail");

        assert!(err.is_fatal());
    }

    #[test]
    fn test_outputs_sorted_and_decoded() {
        let mut plan = create_test_plan();
        plan.output_changes.insert(
            String::from("zeta"),
            Change {
                actions: vec![String::from("no-op")],
                ..Change::default()
            },
        );
        plan.output_changes.insert(
            String::from("alpha"),
            Change {
                actions: vec![String::from("create")],
                after: Some(json!("secret")),
                after_sensitive: Some(json!(true)),
                ..Change::default()
            },
        );

        let diffs = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect("diffs should compute");

        assert_eq!(diffs.outputs[0].name, "alpha");
        assert!(diffs.outputs[0].sensitive);
        assert_eq!(diffs.outputs[1].action, Action::NoOp);
    }

    #[test]
    fn test_diff_set_empty() {
        let mut plan = create_test_plan();
        let mut moved = create_change("cloud_vm.a", &["no-op"], json!({}), json!({}));
        plan.resource_changes.push(moved.clone());

        let diffs = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect("diffs should compute");
        assert!(diffs.is_empty());

        moved.previous_address = Some(String::from("cloud_vm.old"));
        plan.resource_changes = vec![moved];
        let diffs = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect("diffs should compute");
        assert!(!diffs.is_empty());
    }

    #[test]
    fn test_import_predicate() {
        let mut plan = create_test_plan();
        let mut change = create_change("cloud_vm.a", &["no-op"], json!({}), json!({}));
        change.change.importing = Some(Importing {
            id: String::from("vm-1"),
        });
        plan.resource_changes.push(change);

        let diffs = DiffEngine::new()
            .compute_diffs(&plan, PlanMode::Normal)
            .expect("diffs should compute");

        assert!(diffs.changes[0].importing());
        assert!(!diffs.changes[0].moved());
    }
}
