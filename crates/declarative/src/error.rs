//! Error types for the declarative crate

use crate::types::{Relationship, ResourceRef};
use thiserror::Error;

/// Errors that can occur while assembling or planning a catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The same resource was declared twice
    #[error("duplicate declaration: {0} is already declared")]
    DuplicateResource(ResourceRef),

    /// A relationship points at a resource that is not in the catalog
    #[error("{from} has a '{relationship}' relationship to undeclared {target}")]
    DanglingRelationship {
        from: ResourceRef,
        relationship: Relationship,
        target: ResourceRef,
    },

    /// Relationships form a cycle, so no apply order exists
    #[error("dependency cycle between {}", join_refs(.0))]
    DependencyCycle(Vec<ResourceRef>),
}

fn join_refs(refs: &[ResourceRef]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for declarative operations
pub type Result<T> = std::result::Result<T, Error>;
