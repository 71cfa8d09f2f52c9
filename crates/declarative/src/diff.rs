//! Diff computation between two catalogs

use crate::catalog::Catalog;
use crate::resource::{Resource, ResourceExt};
use crate::types::{AttrValue, ResourceRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a declaration changed between two catalogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    /// Only in the newer catalog
    Added,
    /// Only in the older catalog
    Removed,
    /// In both, with differing attributes or relationships
    Modified { attributes: Vec<AttributeChange> },
}

/// A single attribute that differs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub name: String,
    pub from: Option<AttrValue>,
    pub to: Option<AttrValue>,
}

/// A diff for one declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDiff {
    pub resource: ResourceRef,
    pub change: Change,
}

impl ResourceDiff {
    /// Check if this diff represents an addition
    pub fn is_addition(&self) -> bool {
        matches!(self.change, Change::Added)
    }

    /// Check if this diff represents a removal
    pub fn is_removal(&self) -> bool {
        matches!(self.change, Change::Removed)
    }

    /// Attribute changes, empty unless modified
    pub fn attribute_changes(&self) -> &[AttributeChange] {
        match &self.change {
            Change::Modified { attributes } => attributes,
            _ => &[],
        }
    }
}

/// Names of every attribute and relationship a resource declares, in order
fn attribute_names(resource: &dyn Resource) -> Vec<String> {
    let mut names: Vec<String> = resource
        .attributes()
        .into_iter()
        .map(|(k, _)| k.to_string())
        .collect();
    for (rel, _) in resource.relationships() {
        let name = rel.as_str().to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn diff_resource(old: &dyn Resource, new: &dyn Resource) -> Vec<AttributeChange> {
    let mut names = attribute_names(old);
    for name in attribute_names(new) {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    names
        .into_iter()
        .filter_map(|name| {
            let from = old.attribute(&name);
            let to = new.attribute(&name);
            (from != to).then_some(AttributeChange { name, from, to })
        })
        .collect()
}

/// Compute diffs between two catalogs
///
/// Removals come first in the older catalog's order, then additions and
/// modifications in the newer catalog's order.
pub fn compute_diffs(old: &Catalog, new: &Catalog) -> Vec<ResourceDiff> {
    let mut diffs: Vec<ResourceDiff> = old
        .resources()
        .filter(|r| !new.contains(&r.reference()))
        .map(|r| ResourceDiff {
            resource: r.reference(),
            change: Change::Removed,
        })
        .collect();

    for resource in new.resources() {
        let reference = resource.reference();
        match old.get(&reference) {
            None => diffs.push(ResourceDiff {
                resource: reference,
                change: Change::Added,
            }),
            Some(previous) => {
                let attributes = diff_resource(previous, resource);
                if !attributes.is_empty() {
                    diffs.push(ResourceDiff {
                        resource: reference,
                        change: Change::Modified { attributes },
                    });
                }
            }
        }
    }

    diffs
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of declarations added
    pub additions: usize,
    /// Number of declarations removed
    pub removals: usize,
    /// Number of declarations modified
    pub modifications: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            match diff.change {
                Change::Added => summary.additions += 1,
                Change::Removed => summary.removals += 1,
                Change::Modified { .. } => summary.modifications += 1,
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Group diffs by resource kind
pub fn group_by_type(diffs: &[ResourceDiff]) -> HashMap<String, Vec<&ResourceDiff>> {
    let mut groups: HashMap<String, Vec<&ResourceDiff>> = HashMap::new();
    for diff in diffs {
        groups
            .entry(diff.resource.kind.to_string())
            .or_default()
            .push(diff);
    }
    groups
}
