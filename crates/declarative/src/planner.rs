//! Apply planner - orders a catalog's declarations along its relationships

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::types::{Relationship, ResourceRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One step of an apply plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Declaration to apply
    pub resource: ResourceRef,
    /// What the declaration asserts, e.g. "Package nfs-utils is installed"
    pub description: String,
    /// Declarations whose change triggers a refresh of this one
    pub refreshed_by: Vec<ResourceRef>,
}

/// Declarations in an order that satisfies every relationship
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyPlan {
    pub steps: Vec<PlanStep>,
}

impl ApplyPlan {
    /// Build a plan for a catalog
    ///
    /// Ties are broken by insertion order. Fails if a relationship points at
    /// an undeclared resource or if relationships form a cycle.
    pub fn for_catalog(catalog: &Catalog) -> Result<Self> {
        catalog.validate()?;

        let count = catalog.len();
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut indegree = vec![0usize; count];
        let mut refreshed_by: Vec<Vec<ResourceRef>> = vec![Vec::new(); count];

        for edge in catalog.edges() {
            let (Some(source), Some(target)) = (
                catalog.position(&edge.source),
                catalog.position(&edge.target),
            ) else {
                continue;
            };

            let (first, second) = if edge.relationship.source_after_target() {
                (target, source)
            } else {
                (source, target)
            };

            if !successors[first].contains(&second) {
                successors[first].push(second);
                indegree[second] += 1;
            }

            if edge.relationship.refreshes() {
                let trigger = if first == target {
                    edge.target.clone()
                } else {
                    edge.source.clone()
                };
                if !refreshed_by[second].contains(&trigger) {
                    refreshed_by[second].push(trigger);
                }
            }
        }

        let references = catalog.references();
        let descriptions: Vec<String> = catalog.resources().map(|r| r.description()).collect();
        let mut ready: BTreeSet<usize> = (0..count).filter(|&i| indegree[i] == 0).collect();
        let mut steps = Vec::with_capacity(count);

        while let Some(next) = ready.pop_first() {
            steps.push(PlanStep {
                resource: references[next].clone(),
                description: descriptions[next].clone(),
                refreshed_by: std::mem::take(&mut refreshed_by[next]),
            });
            for &succ in &successors[next] {
                indegree[succ] -= 1;
                if indegree[succ] == 0 {
                    ready.insert(succ);
                }
            }
        }

        if steps.len() < count {
            let stuck = (0..count)
                .filter(|&i| indegree[i] > 0)
                .map(|i| references[i].clone())
                .collect();
            return Err(Error::DependencyCycle(stuck));
        }

        Ok(Self { steps })
    }

    /// References in apply order
    pub fn order(&self) -> Vec<&ResourceRef> {
        self.steps.iter().map(|s| &s.resource).collect()
    }

    /// Position of a declaration in the plan
    pub fn position(&self, reference: &ResourceRef) -> Option<usize> {
        self.steps.iter().position(|s| &s.resource == reference)
    }
}

/// Declarations refreshed when the given one changes
///
/// Follows `subscribe` edges pointing at it and `notify` edges leaving it.
pub fn refresh_targets(catalog: &Catalog, changed: &ResourceRef) -> Vec<ResourceRef> {
    let mut targets = Vec::new();
    for edge in catalog.edges() {
        let refreshed = match edge.relationship {
            Relationship::Subscribe if &edge.target == changed => edge.source,
            Relationship::Notify if &edge.source == changed => edge.target,
            _ => continue,
        };
        if !targets.contains(&refreshed) {
            targets.push(refreshed);
        }
    }
    targets
}
