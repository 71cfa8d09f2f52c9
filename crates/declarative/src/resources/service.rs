//! Service resource - supervised system services

use crate::resource::Resource;
use crate::types::{AttrValue, Attribute, Relationship, ResourceKind, ResourceRef, ServiceEnsure};

/// A system service and its desired run state
///
/// The title identifies the declaration in the catalog; `name` is the unit
/// the init system knows, which varies between platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub title: String,
    pub name: String,
    pub ensure: ServiceEnsure,
    pub enable: bool,
    pub hasstatus: bool,
    pub hasrestart: bool,
    pub subscribe: Vec<ResourceRef>,
}

impl Service {
    pub fn new(title: &str, name: &str, ensure: ServiceEnsure) -> Self {
        Self {
            title: title.to_string(),
            name: name.to_string(),
            ensure,
            enable: false,
            hasstatus: true,
            hasrestart: true,
            subscribe: Vec::new(),
        }
    }

    pub fn enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    pub fn status_and_restart(mut self, hasstatus: bool, hasrestart: bool) -> Self {
        self.hasstatus = hasstatus;
        self.hasrestart = hasrestart;
        self
    }

    pub fn subscribe(mut self, target: ResourceRef) -> Self {
        self.subscribe.push(target);
        self
    }
}

impl Resource for Service {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Service
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn description(&self) -> String {
        let enabled = if self.enable { "enabled" } else { "disabled" };
        format!("Service {} is {} and {}", self.name, self.ensure, enabled)
    }

    fn attributes(&self) -> Vec<Attribute> {
        vec![
            ("ensure", AttrValue::from(self.ensure.as_str())),
            ("name", AttrValue::from(self.name.as_str())),
            ("enable", AttrValue::from(self.enable)),
            ("hasstatus", AttrValue::from(self.hasstatus)),
            ("hasrestart", AttrValue::from(self.hasrestart)),
        ]
    }

    fn relationships(&self) -> Vec<(Relationship, ResourceRef)> {
        self.subscribe
            .iter()
            .map(|r| (Relationship::Subscribe, r.clone()))
            .collect()
    }
}
