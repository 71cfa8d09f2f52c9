//! # Declarative
//!
//! Typed resource declarations and the relationship graph between them.
//!
//! This crate provides the core abstractions for declaring desired state as
//! data. It does not apply anything: a catalog is handed to whatever engine
//! enforces state on the host.
//!
//! ## Core Concepts
//!
//! - **Resource**: A named, typed assertion of desired state (package, file, service, ...)
//! - **Relationship**: A directed edge between declarations (`require`, `subscribe`, ...)
//! - **Catalog**: The de-duplicated set of declarations from one evaluation
//! - **ApplyPlan**: Declarations ordered so every relationship is honoured
//! - **ResourceDiff**: What changed between two catalogs
//!
//! ## Example
//!
//! ```
//! use declarative::{ApplyPlan, Catalog, File, Package, ResourceRef, Service, ServiceEnsure};
//!
//! let mut catalog = Catalog::new();
//! catalog.add(Package::new("libnfsidmap"))?;
//! catalog.add(
//!     File::new("idmapd_conf", "/etc/idmapd.conf")
//!         .content("[General]\n".to_string())
//!         .require(ResourceRef::package("libnfsidmap")),
//! )?;
//! catalog.add(
//!     Service::new("idmapd_service", "nfs-idmapd", ServiceEnsure::Stopped)
//!         .subscribe(ResourceRef::file("idmapd_conf")),
//! )?;
//!
//! let plan = ApplyPlan::for_catalog(&catalog)?;
//! assert_eq!(plan.order()[0], &ResourceRef::package("libnfsidmap"));
//! # Ok::<(), declarative::Error>(())
//! ```

pub mod catalog;
pub mod diff;
pub mod error;
pub mod planner;
pub mod resource;
pub mod resources;
pub mod types;

// Re-export main types at crate root
pub use catalog::{Catalog, CatalogDocument, CatalogEntry, Edge};
pub use diff::{AttributeChange, Change, DiffSummary, ResourceDiff, compute_diffs, group_by_type};
pub use error::{Error, Result};
pub use planner::{ApplyPlan, PlanStep, refresh_targets};
pub use resource::{BoxedResource, Resource, ResourceExt};
pub use resources::{Class, Exec, File, Package, Service};
pub use types::{AttrValue, Attribute, Relationship, ResourceKind, ResourceRef, ServiceEnsure};
