//! User-supplied parameters.
//!
//! Every field is optional: an unset field takes the platform default, a set
//! field always wins. Shape and primitive types (booleans, integers, string
//! or list) are enforced while deserializing; content constraints are checked
//! later by [`crate::validate::Validator`].

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parameter that accepts a single string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Values in the order they were given
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value.clone()],
            Self::Many(values) => values.clone(),
        }
    }

    pub fn join(&self, separator: &str) -> String {
        match self {
            Self::One(value) => value.clone(),
            Self::Many(values) => values.join(separator),
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

struct OneOrManyVisitor;

impl<'de> Visitor<'de> for OneOrManyVisitor {
    type Value = OneOrMany;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or an array of strings")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(OneOrMany::One(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(OneOrMany::One(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<String>()? {
            values.push(value);
        }
        Ok(OneOrMany::Many(values))
    }
}

impl<'de> Deserialize<'de> for OneOrMany {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OneOrManyVisitor)
    }
}

/// Parameters of the ID-mapping submodule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdmapParams {
    pub idmap_package: Option<String>,
    pub idmapd_conf_path: Option<String>,
    pub idmapd_conf_owner: Option<String>,
    pub idmapd_conf_group: Option<String>,
    pub idmapd_conf_mode: Option<String>,
    pub idmapd_service_name: Option<String>,
    pub idmapd_service_ensure: Option<String>,
    pub idmapd_service_enable: Option<bool>,
    pub idmapd_service_hasstatus: Option<bool>,
    pub idmapd_service_hasrestart: Option<bool>,
    pub idmap_domain: Option<String>,
    pub ldap_server: Option<String>,
    pub ldap_base: Option<OneOrMany>,
    pub local_realms: Option<OneOrMany>,
    pub translation_method: Option<OneOrMany>,
    pub nobody_user: Option<String>,
    pub nobody_group: Option<String>,
    pub verbosity: Option<i64>,
    pub pipefs_directory: Option<String>,
}

impl IdmapParams {
    /// Whether any parameter of the idmapd service was supplied
    pub fn configures_service(&self) -> bool {
        self.idmapd_service_name.is_some()
            || self.idmapd_service_ensure.is_some()
            || self.idmapd_service_enable.is_some()
            || self.idmapd_service_hasstatus.is_some()
            || self.idmapd_service_hasrestart.is_some()
    }
}

/// Parameters of the top-level NFS module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NfsParams {
    pub nfs_package: Option<OneOrMany>,
    pub nfs_service: Option<String>,
    pub nfs_service_ensure: Option<String>,
    pub nfs_service_enable: Option<bool>,
    pub include_idmap: Option<bool>,
    pub include_rpcbind: Option<bool>,
    pub server: Option<bool>,
    pub exports_path: Option<String>,
    pub exports_owner: Option<String>,
    pub exports_group: Option<String>,
    pub exports_mode: Option<String>,
}

/// Everything a caller may supply for one node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeParams {
    pub nfs: NfsParams,
    pub idmap: IdmapParams,
}
