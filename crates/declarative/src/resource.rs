//! Resource trait for declarative state
//!
//! A Resource is a named, typed assertion of desired state. It never
//! touches the host: applying declarations is left to whatever engine
//! consumes the catalog.

use crate::types::{AttrValue, Attribute, Relationship, ResourceKind, ResourceRef};
use std::fmt;

/// Core trait for declared resources
///
/// Every resource in a catalog implements this trait, which provides:
/// - Identity (kind, title)
/// - Desired state (ordered attributes)
/// - Relationships to other declarations
///
/// # Example
///
/// ```ignore
/// use declarative::{AttrValue, Attribute, Resource, ResourceKind};
///
/// #[derive(Debug)]
/// struct Motd { text: String }
///
/// impl Resource for Motd {
///     fn kind(&self) -> ResourceKind { ResourceKind::File }
///     fn title(&self) -> String { "motd".into() }
///     fn description(&self) -> String { "Message of the day".into() }
///     fn attributes(&self) -> Vec<Attribute> {
///         vec![("content", AttrValue::from(self.text.as_str()))]
///     }
/// }
/// ```
pub trait Resource: Send + Sync + fmt::Debug {
    /// Resource kind
    fn kind(&self) -> ResourceKind;

    /// Title, unique within the kind
    ///
    /// Examples:
    /// - "nfs-utils" for a package
    /// - "idmapd_conf" for a file
    /// - "idmapd_service" for a service
    fn title(&self) -> String;

    /// Human-readable description of what this resource asserts
    fn description(&self) -> String;

    /// Desired-state attributes in declaration order
    ///
    /// Relationship metaparameters are not included here; see
    /// [`Resource::relationships`].
    fn attributes(&self) -> Vec<Attribute>;

    /// Relationships from this resource to others
    fn relationships(&self) -> Vec<(Relationship, ResourceRef)> {
        Vec::new()
    }

    /// Reference to this resource
    fn reference(&self) -> ResourceRef {
        ResourceRef::new(self.kind(), self.title())
    }
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn Resource>;

/// Extension trait for attribute lookups on resources
pub trait ResourceExt {
    /// Look up a desired-state attribute or relationship by name
    ///
    /// Relationship names (`require`, `subscribe`, ...) resolve to a single
    /// reference when there is one target and to a list otherwise.
    fn attribute(&self, name: &str) -> Option<AttrValue>;

    /// Targets of every relationship of the given kind, in declaration order
    fn targets(&self, relationship: Relationship) -> Vec<ResourceRef>;
}

impl<R: Resource + ?Sized> ResourceExt for R {
    fn attribute(&self, name: &str) -> Option<AttrValue> {
        if let Some((_, value)) = self.attributes().into_iter().find(|(k, _)| *k == name) {
            return Some(value);
        }

        let mut targets: Vec<ResourceRef> = self
            .relationships()
            .into_iter()
            .filter(|(rel, _)| rel.as_str() == name)
            .map(|(_, target)| target)
            .collect();

        match targets.len() {
            0 => None,
            1 => targets.pop().map(AttrValue::Ref),
            _ => Some(AttrValue::Refs(targets)),
        }
    }

    fn targets(&self, relationship: Relationship) -> Vec<ResourceRef> {
        self.relationships()
            .into_iter()
            .filter(|(rel, _)| *rel == relationship)
            .map(|(_, target)| target)
            .collect()
    }
}
