//! Exec resource - commands run by the enforcement engine

use crate::resource::Resource;
use crate::types::{AttrValue, Attribute, ResourceKind};

/// A command to run
///
/// With `refreshonly` set the command only runs when another resource
/// notifies it (or it subscribes to one that changed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exec {
    pub title: String,
    pub command: String,
    pub path: String,
    pub refreshonly: bool,
}

impl Exec {
    pub fn new(title: &str, command: &str, path: &str) -> Self {
        Self {
            title: title.to_string(),
            command: command.to_string(),
            path: path.to_string(),
            refreshonly: false,
        }
    }

    pub fn refreshonly(mut self, refreshonly: bool) -> Self {
        self.refreshonly = refreshonly;
        self
    }
}

impl Resource for Exec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Exec
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn description(&self) -> String {
        if self.refreshonly {
            format!("Run `{}` on refresh", self.command)
        } else {
            format!("Run `{}`", self.command)
        }
    }

    fn attributes(&self) -> Vec<Attribute> {
        vec![
            ("command", AttrValue::from(self.command.as_str())),
            ("path", AttrValue::from(self.path.as_str())),
            ("refreshonly", AttrValue::from(self.refreshonly)),
        ]
    }
}
