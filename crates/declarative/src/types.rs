//! Core types for declarative resource catalogs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a declared resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Package,
    File,
    Service,
    Exec,
    Class,
}

impl ResourceKind {
    /// Capitalised name used in resource references (`Package[...]`)
    pub fn ref_name(&self) -> &'static str {
        match self {
            Self::Package => "Package",
            Self::File => "File",
            Self::Service => "Service",
            Self::Exec => "Exec",
            Self::Class => "Class",
        }
    }

    /// Lowercase name used in manifests and target filters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::File => "file",
            Self::Service => "service",
            Self::Exec => "exec",
            Self::Class => "class",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "package" | "packages" => Ok(Self::Package),
            "file" | "files" => Ok(Self::File),
            "service" | "services" => Ok(Self::Service),
            "exec" | "execs" => Ok(Self::Exec),
            "class" | "classes" => Ok(Self::Class),
            other => Err(format!("unknown resource type: {other}")),
        }
    }
}

/// Reference to a declared resource, e.g. `File[idmapd_conf]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub title: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
        }
    }

    pub fn package(title: impl Into<String>) -> Self {
        Self::new(ResourceKind::Package, title)
    }

    pub fn file(title: impl Into<String>) -> Self {
        Self::new(ResourceKind::File, title)
    }

    pub fn service(title: impl Into<String>) -> Self {
        Self::new(ResourceKind::Service, title)
    }

    pub fn exec(title: impl Into<String>) -> Self {
        Self::new(ResourceKind::Exec, title)
    }

    pub fn class(title: impl Into<String>) -> Self {
        Self::new(ResourceKind::Class, title)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind.ref_name(), self.title)
    }
}

/// Relationship from one declaration to another
///
/// `Require` and `Subscribe` point at resources that must be applied first;
/// `Before` and `Notify` point at resources that must be applied after.
/// `Subscribe` and `Notify` additionally refresh the later resource when the
/// earlier one changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Require,
    Before,
    Subscribe,
    Notify,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Require => "require",
            Self::Before => "before",
            Self::Subscribe => "subscribe",
            Self::Notify => "notify",
        }
    }

    /// Whether the source resource is applied after the target
    pub fn source_after_target(&self) -> bool {
        matches!(self, Self::Require | Self::Subscribe)
    }

    /// Whether a change triggers a refresh of the later resource
    pub fn refreshes(&self) -> bool {
        matches!(self, Self::Subscribe | Self::Notify)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired run state of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceEnsure {
    Running,
    Stopped,
}

impl ServiceEnsure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ServiceEnsure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceEnsure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "stopped" => Ok(Self::Stopped),
            other => Err(format!(
                "expects one of 'running', 'stopped', got '{other}'"
            )),
        }
    }
}

/// Value of a declared attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Str(String),
    Ref(ResourceRef),
    Refs(Vec<ResourceRef>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// References carried by this value, one or many
    pub fn refs(&self) -> Vec<&ResourceRef> {
        match self {
            Self::Ref(r) => vec![r],
            Self::Refs(rs) => rs.iter().collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Ref(r) => write!(f, "{r}"),
            Self::Refs(rs) => {
                let joined: Vec<String> = rs.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<ResourceRef> for AttrValue {
    fn from(r: ResourceRef) -> Self {
        Self::Ref(r)
    }
}

/// Named attribute of a declaration, in declaration order
pub type Attribute = (&'static str, AttrValue);
