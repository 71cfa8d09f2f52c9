//! Platform facts: the operating-system identity an evaluation is keyed on.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating-system family
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OsFamily {
    RedHat,
    Suse,
    Other(String),
}

impl OsFamily {
    pub fn as_str(&self) -> &str {
        match self {
            Self::RedHat => "RedHat",
            Self::Suse => "Suse",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Family names are compared exactly, as fact sources report them
impl From<String> for OsFamily {
    fn from(s: String) -> Self {
        match s.as_str() {
            "RedHat" => Self::RedHat,
            "Suse" => Self::Suse,
            _ => Self::Other(s),
        }
    }
}

impl From<OsFamily> for String {
    fn from(family: OsFamily) -> Self {
        family.as_str().to_string()
    }
}

/// Facts about the managed host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformFacts {
    pub family: OsFamily,
    pub major_release: u32,
}

impl PlatformFacts {
    pub fn new(family: OsFamily, major_release: u32) -> Self {
        Self {
            family,
            major_release,
        }
    }

    /// Build facts from their textual form
    ///
    /// The release may be a bare major number ("7") or a dotted version
    /// ("7.9"), of which only the major part is kept.
    pub fn parse(family: &str, release: &str) -> Result<Self> {
        Ok(Self::new(parse_family(family)?, parse_major(release)?))
    }

    pub fn is_redhat(&self) -> bool {
        self.family == OsFamily::RedHat
    }

    pub fn is_suse(&self) -> bool {
        self.family == OsFamily::Suse
    }
}

impl fmt::Display for PlatformFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.major_release)
    }
}

fn parse_family(family: &str) -> Result<OsFamily> {
    let family = family.trim();
    if family.is_empty() {
        return Err(Error::InvalidFact {
            name: "os_family",
            message: "must not be empty".to_string(),
        });
    }
    Ok(OsFamily::from(family.to_string()))
}

fn parse_major(release: &str) -> Result<u32> {
    let major = release.trim().split('.').next().unwrap_or_default();
    major.parse().map_err(|_| Error::InvalidFact {
        name: "os_major_release",
        message: format!("expected a numeric major release, got '{release}'"),
    })
}

/// Release as it appears in fact sources: a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReleaseValue {
    Number(u32),
    Text(String),
}

/// Facts in their external shape, as read from a node file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactsRecord {
    pub os_family: String,
    pub os_major_release: ReleaseValue,
}

impl TryFrom<FactsRecord> for PlatformFacts {
    type Error = Error;

    fn try_from(record: FactsRecord) -> Result<Self> {
        match record.os_major_release {
            ReleaseValue::Number(major) => Ok(Self::new(parse_family(&record.os_family)?, major)),
            ReleaseValue::Text(release) => Self::parse(&record.os_family, &release),
        }
    }
}
