//! Package resource

use crate::resource::Resource;
use crate::types::{AttrValue, Attribute, ResourceKind};

/// A system package that should be installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
}

impl Package {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Resource for Package {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Package
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        format!("Package {} is installed", self.name)
    }

    fn attributes(&self) -> Vec<Attribute> {
        vec![("ensure", AttrValue::from("present"))]
    }
}
