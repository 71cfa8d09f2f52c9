//! Catalog - the set of declarations produced by one evaluation

use crate::error::{Error, Result};
use crate::resource::{BoxedResource, Resource};
use crate::resources::File;
use crate::types::{AttrValue, Relationship, ResourceKind, ResourceRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A directed relationship between two declarations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: ResourceRef,
    pub relationship: Relationship,
    pub target: ResourceRef,
}

/// Ordered, de-duplicated set of resource declarations
///
/// Insertion order is preserved; it is the tie-breaker when planning the
/// apply order, so identical inputs always produce identical output.
pub struct Catalog {
    resources: Vec<BoxedResource>,
    index: HashMap<ResourceRef, usize>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a declaration, rejecting duplicates of the same kind and title
    pub fn add<R: Resource + 'static>(&mut self, resource: R) -> Result<()> {
        self.add_boxed(Box::new(resource))
    }

    /// Add an already boxed declaration
    pub fn add_boxed(&mut self, resource: BoxedResource) -> Result<()> {
        let reference = resource.reference();
        if self.index.contains_key(&reference) {
            return Err(Error::DuplicateResource(reference));
        }
        self.index.insert(reference, self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    /// Look up a declaration by reference
    pub fn get(&self, reference: &ResourceRef) -> Option<&dyn Resource> {
        self.index
            .get(reference)
            .map(|&i| self.resources[i].as_ref())
    }

    /// Check if a declaration exists
    pub fn contains(&self, reference: &ResourceRef) -> bool {
        self.index.contains_key(reference)
    }

    /// All declarations in insertion order
    pub fn resources(&self) -> impl Iterator<Item = &dyn Resource> {
        self.resources.iter().map(AsRef::as_ref)
    }

    /// References of all declarations in insertion order
    pub fn references(&self) -> Vec<ResourceRef> {
        self.resources.iter().map(|r| r.reference()).collect()
    }

    /// Declarations of one kind
    pub fn of_kind(&self, kind: ResourceKind) -> Vec<&dyn Resource> {
        self.resources().filter(|r| r.kind() == kind).collect()
    }

    /// Position of a declaration in insertion order
    pub fn position(&self, reference: &ResourceRef) -> Option<usize> {
        self.index.get(reference).copied()
    }

    /// Total number of declarations
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Every relationship declared by every resource
    pub fn edges(&self) -> Vec<Edge> {
        self.resources
            .iter()
            .flat_map(|r| {
                let source = r.reference();
                r.relationships()
                    .into_iter()
                    .map(move |(relationship, target)| Edge {
                        source: source.clone(),
                        relationship,
                        target,
                    })
            })
            .collect()
    }

    /// Check that every relationship points at a declared resource
    pub fn validate(&self) -> Result<()> {
        for edge in self.edges() {
            if !self.contains(&edge.target) {
                return Err(Error::DanglingRelationship {
                    from: edge.source,
                    relationship: edge.relationship,
                    target: edge.target,
                });
            }
        }
        Ok(())
    }

    /// Filter catalog to only include declarations matching a predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&dyn Resource) -> bool,
    {
        let mut filtered = Self::new();
        for resource in self.resources {
            if predicate(resource.as_ref()) {
                let reference = resource.reference();
                filtered.index.insert(reference, filtered.resources.len());
                filtered.resources.push(resource);
            }
        }
        filtered
    }

    /// Filter catalog to only include declarations matching a target pattern
    ///
    /// Target format: "type" or "type.title"
    pub fn filter_by_target(self, target: Option<&str>) -> Self {
        match target {
            None => self,
            Some(t) => {
                let (kind, title) = parse_target(t);
                self.filter(|r| matches_filter(r, kind, title.as_deref()))
            }
        }
    }

    /// Serializable view of the catalog
    pub fn document(&self) -> CatalogDocument {
        CatalogDocument {
            resources: self.resources().map(CatalogEntry::from_resource).collect(),
            edges: self.edges(),
        }
    }

    /// Render the catalog as a manifest-style listing
    ///
    /// File content is shown as a digest rather than inline.
    pub fn to_manifest(&self) -> String {
        let mut out = String::new();
        for resource in self.resources() {
            out.push_str(&format!(
                "{} {{ '{}':\n",
                resource.kind(),
                resource.title()
            ));

            let attrs = resource.attributes();
            let rels = resource.relationships();
            let mut grouped: Vec<(Relationship, Vec<ResourceRef>)> = Vec::new();
            for (rel, target) in rels {
                match grouped.iter_mut().find(|(r, _)| *r == rel) {
                    Some((_, targets)) => targets.push(target),
                    None => grouped.push((rel, vec![target])),
                }
            }

            let width = attrs
                .iter()
                .map(|(k, _)| k.len())
                .chain(grouped.iter().map(|(r, _)| r.as_str().len()))
                .max()
                .unwrap_or(0);

            for (name, value) in &attrs {
                let shown = match (name, value) {
                    (&"content", AttrValue::Str(content)) => {
                        format!("'blake3:{}'", File::digest(content))
                    }
                    _ => value.to_string(),
                };
                out.push_str(&format!("  {name:<width$} => {shown},\n"));
            }
            for (rel, targets) in &grouped {
                let shown = if targets.len() == 1 {
                    AttrValue::Ref(targets[0].clone())
                } else {
                    AttrValue::Refs(targets.clone())
                };
                out.push_str(&format!("  {:<width$} => {shown},\n", rel.as_str()));
            }
            out.push_str("}\n");
        }
        out
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.references()).finish()
    }
}

/// Serializable form of one declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub title: String,
    pub attributes: BTreeMap<String, AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl CatalogEntry {
    fn from_resource(resource: &dyn Resource) -> Self {
        let attributes: BTreeMap<String, AttrValue> = resource
            .attributes()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let checksum = match attributes.get("content") {
            Some(AttrValue::Str(content)) if resource.kind() == ResourceKind::File => {
                Some(File::digest(content))
            }
            _ => None,
        };
        Self {
            kind: resource.kind(),
            title: resource.title(),
            attributes,
            checksum,
        }
    }
}

/// Serializable form of a whole catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub resources: Vec<CatalogEntry>,
    pub edges: Vec<Edge>,
}

/// Parse a target string like "type.title" into (kind, title)
///
/// Titles may themselves contain dots, so only the first dot splits.
fn parse_target(target: &str) -> (Option<ResourceKind>, Option<String>) {
    match target.split_once('.') {
        Some((kind, title)) => match kind.parse() {
            Ok(kind) => (Some(kind), Some(title.to_string())),
            Err(_) => (None, Some(target.to_string())),
        },
        None => match target.parse() {
            Ok(kind) => (Some(kind), None),
            Err(_) => (None, Some(target.to_string())),
        },
    }
}

/// Check if a resource matches the filter criteria
fn matches_filter(
    resource: &dyn Resource,
    kind: Option<ResourceKind>,
    title: Option<&str>,
) -> bool {
    if let Some(k) = kind
        && resource.kind() != k
    {
        return false;
    }

    if let Some(t) = title
        && !resource.title().contains(t)
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Exec, Package, Service};
    use crate::types::ServiceEnsure;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add(Package::new("libnfsidmap")).unwrap();
        catalog
            .add(
                File::new("idmapd_conf", "/etc/idmapd.conf")
                    .content("[General]\n".to_string())
                    .require(ResourceRef::package("libnfsidmap")),
            )
            .unwrap();
        catalog
            .add(
                Service::new("idmapd_service", "nfs-idmapd", ServiceEnsure::Stopped)
                    .enable(true)
                    .subscribe(ResourceRef::file("idmapd_conf")),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("package"), (Some(ResourceKind::Package), None));
        assert_eq!(
            parse_target("service.idmapd_service"),
            (Some(ResourceKind::Service), Some("idmapd_service".to_string()))
        );
        assert_eq!(
            parse_target("class.nfs::idmap"),
            (Some(ResourceKind::Class), Some("nfs::idmap".to_string()))
        );
        assert_eq!(parse_target("nfs-utils"), (None, Some("nfs-utils".to_string())));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut catalog = sample();
        let err = catalog.add(Package::new("libnfsidmap")).unwrap_err();
        assert_eq!(err, Error::DuplicateResource(ResourceRef::package("libnfsidmap")));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_same_title_different_kind_allowed() {
        let mut catalog = Catalog::new();
        catalog.add(Package::new("nfs")).unwrap();
        catalog
            .add(Service::new("nfs", "nfs", ServiceEnsure::Running))
            .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_edges_and_validate() {
        let catalog = sample();
        let edges = catalog.edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].source, ResourceRef::file("idmapd_conf"));
        assert_eq!(edges[0].relationship, Relationship::Require);
        assert_eq!(edges[1].relationship, Relationship::Subscribe);
        assert!(catalog.validate().is_ok());

        let mut broken = Catalog::new();
        broken
            .add(File::new("f", "/f").notify(ResourceRef::exec("missing")))
            .unwrap();
        assert!(matches!(
            broken.validate(),
            Err(Error::DanglingRelationship { .. })
        ));
    }

    #[test]
    fn test_filter_by_target() {
        let only_services = sample().filter_by_target(Some("services"));
        assert_eq!(only_services.references(), vec![ResourceRef::service("idmapd_service")]);

        let by_title = sample().filter_by_target(Some("file.idmapd"));
        assert_eq!(by_title.references(), vec![ResourceRef::file("idmapd_conf")]);

        let bare = sample().filter_by_target(Some("libnfs"));
        assert_eq!(bare.references(), vec![ResourceRef::package("libnfsidmap")]);

        assert_eq!(sample().filter_by_target(None).len(), 3);
    }

    #[test]
    fn test_manifest_listing() {
        let mut catalog = sample();
        catalog
            .add(Exec::new("update_nfs_exports", "exportfs -ra", "/bin:/usr/bin").refreshonly(true))
            .unwrap();
        let manifest = catalog.to_manifest();

        assert!(manifest.contains("package { 'libnfsidmap':\n  ensure => 'present',\n}\n"));
        assert!(manifest.contains("  require => Package[libnfsidmap],\n"));
        assert!(manifest.contains("  subscribe  => File[idmapd_conf],\n"));
        assert!(manifest.contains("  refreshonly => true,\n"));
        assert!(manifest.contains("'blake3:"));
        assert!(!manifest.contains("[General]"));
    }

    #[test]
    fn test_document_serializes() {
        let doc = sample().document();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["resources"][0]["type"], "package");
        assert_eq!(json["resources"][2]["attributes"]["enable"], true);
        assert_eq!(json["edges"][1]["relationship"], "subscribe");
        assert_eq!(json["edges"][1]["target"]["title"], "idmapd_conf");
        assert!(json["resources"][1]["checksum"].is_string());
    }
}
