//! Platform resolution.
//!
//! Maps [`PlatformFacts`] to the per-platform defaults for package names,
//! service names and run states. Resolution is a pure function of the facts:
//! there is no global lookup and no hidden state.
//!
//! # Resolution table
//!
//! | Field                   | RedHat 6        | RedHat 7      | RedHat 8/9    | Suse                      |
//! |-------------------------|-----------------|---------------|---------------|---------------------------|
//! | `nfs_package`           | nfs-utils       | nfs-utils     | nfs-utils     | nfs-client                |
//! | `nfs_service_name`      | nfs             | -             | -             | nfs                       |
//! | `idmap_package`         | nfs-utils-lib   | libnfsidmap   | libnfsidmap   | nfsidmap                  |
//! | `idmapd_service_name`   | rpcidmapd       | nfs-idmap     | nfs-idmapd    | -                         |
//! | `idmapd_service_ensure` | running         | stopped       | stopped       | -                         |
//! | `pipefs_directory`      | -               | -             | -             | /var/lib/nfs/rpc_pipefs   |
//!
//! A `-` is [`Resolution::Undefined`]: the platform has no default and the
//! corresponding declaration is omitted unless a value is supplied.

use crate::facts::{OsFamily, PlatformFacts};
use declarative::ServiceEnsure;
use serde::{Serialize, Serializer};

/// Default rpc_pipefs mount point on Suse
pub const SUSE_PIPEFS_DIRECTORY: &str = "/var/lib/nfs/rpc_pipefs";

/// A platform default that may be undefined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<T> {
    /// The platform defines a value
    Resolved(T),
    /// The platform defines nothing for this field
    Undefined,
}

impl<T> Resolution<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Resolved(v) => Some(v),
            Self::Undefined => None,
        }
    }

    /// Merge with an explicit value, which always wins
    pub fn or_override(self, explicit: Option<T>) -> Option<T> {
        explicit.or(self.into_option())
    }
}

impl<T> From<Option<T>> for Resolution<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Resolved(v),
            None => Self::Undefined,
        }
    }
}

impl<T: Serialize> Serialize for Resolution<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Resolved(v) => serializer.serialize_some(v),
            Self::Undefined => serializer.serialize_none(),
        }
    }
}

/// Per-platform defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDefaults {
    pub nfs_package: Vec<String>,
    pub nfs_service_name: Resolution<String>,
    pub nfs_service_ensure: ServiceEnsure,
    pub nfs_service_enable: bool,
    pub idmap_package: Resolution<String>,
    pub idmapd_service_name: Resolution<String>,
    pub idmapd_service_ensure: Resolution<ServiceEnsure>,
    pub pipefs_directory: Resolution<String>,
    pub include_rpcbind: bool,
    pub include_idmap: bool,
}

/// Resolve platform defaults from facts
pub fn resolve(facts: &PlatformFacts) -> ResolvedDefaults {
    let redhat = facts.is_redhat();
    let suse = facts.is_suse();
    let major = facts.major_release;

    let nfs_package = if redhat { "nfs-utils" } else { "nfs-client" };

    let nfs_service_name = if (redhat && major == 6) || suse {
        Resolution::Resolved("nfs".to_string())
    } else {
        Resolution::Undefined
    };

    let (nfs_service_ensure, nfs_service_enable) = if suse {
        (ServiceEnsure::Running, true)
    } else {
        (ServiceEnsure::Stopped, false)
    };

    let defaults = ResolvedDefaults {
        nfs_package: vec![nfs_package.to_string()],
        nfs_service_name,
        nfs_service_ensure,
        nfs_service_enable,
        idmap_package: idmap_package(&facts.family, major).map(str::to_string).into(),
        idmapd_service_name: idmapd_service_name(&facts.family, major)
            .map(str::to_string)
            .into(),
        idmapd_service_ensure: idmapd_service_ensure(&facts.family, major).into(),
        pipefs_directory: if suse {
            Resolution::Resolved(SUSE_PIPEFS_DIRECTORY.to_string())
        } else {
            Resolution::Undefined
        },
        include_rpcbind: redhat,
        include_idmap: redhat || suse,
    };

    log::debug!("Resolved defaults for {facts}: {defaults:?}");
    defaults
}

fn idmap_package(family: &OsFamily, major: u32) -> Option<&'static str> {
    match (family, major) {
        (OsFamily::Suse, _) => Some("nfsidmap"),
        (OsFamily::RedHat, 6) => Some("nfs-utils-lib"),
        (OsFamily::RedHat, 7..=9) => Some("libnfsidmap"),
        _ => None,
    }
}

fn idmapd_service_name(family: &OsFamily, major: u32) -> Option<&'static str> {
    match (family, major) {
        (OsFamily::RedHat, 6) => Some("rpcidmapd"),
        (OsFamily::RedHat, 7) => Some("nfs-idmap"),
        (OsFamily::RedHat, 8..) => Some("nfs-idmapd"),
        _ => None,
    }
}

fn idmapd_service_ensure(family: &OsFamily, major: u32) -> Option<ServiceEnsure> {
    match (family, major) {
        (OsFamily::RedHat, 6) => Some(ServiceEnsure::Running),
        (OsFamily::RedHat, 7..) => Some(ServiceEnsure::Stopped),
        _ => None,
    }
}
