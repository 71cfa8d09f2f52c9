//! Class marker - records that a named unit of declarations was included

use crate::resource::Resource;
use crate::types::{Attribute, ResourceKind};

/// An included class
///
/// Classes carry no attributes of their own. They exist so consumers can see
/// which units were pulled in, including ones whose contents are managed
/// elsewhere (e.g. an external `rpcbind` module).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub name: String,
}

impl Class {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Resource for Class {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Class
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        format!("Include class {}", self.name)
    }

    fn attributes(&self) -> Vec<Attribute> {
        Vec::new()
    }
}
