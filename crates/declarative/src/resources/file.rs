//! File resource

use crate::resource::Resource;
use crate::types::{AttrValue, Attribute, Relationship, ResourceKind, ResourceRef};

/// A managed file
///
/// `content` is optional: a file may be declared only for its ownership and
/// mode, leaving the content to someone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub title: String,
    pub path: String,
    pub content: Option<String>,
    pub owner: String,
    pub group: String,
    pub mode: String,
    pub require: Vec<ResourceRef>,
    pub notify: Vec<ResourceRef>,
}

impl File {
    pub fn new(title: &str, path: &str) -> Self {
        Self {
            title: title.to_string(),
            path: path.to_string(),
            content: None,
            owner: "root".to_string(),
            group: "root".to_string(),
            mode: "0644".to_string(),
            require: Vec::new(),
            notify: Vec::new(),
        }
    }

    pub fn content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    pub fn ownership(mut self, owner: &str, group: &str, mode: &str) -> Self {
        self.owner = owner.to_string();
        self.group = group.to_string();
        self.mode = mode.to_string();
        self
    }

    pub fn require(mut self, target: ResourceRef) -> Self {
        self.require.push(target);
        self
    }

    pub fn notify(mut self, target: ResourceRef) -> Self {
        self.notify.push(target);
        self
    }

    /// BLAKE3 digest of arbitrary content, hex encoded
    pub fn digest(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }
}

impl Resource for File {
    fn kind(&self) -> ResourceKind {
        ResourceKind::File
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn description(&self) -> String {
        format!(
            "File {} ({}:{} {})",
            self.path, self.owner, self.group, self.mode
        )
    }

    fn attributes(&self) -> Vec<Attribute> {
        let mut attrs = vec![
            ("ensure", AttrValue::from("file")),
            ("path", AttrValue::from(self.path.as_str())),
        ];
        if let Some(content) = &self.content {
            attrs.push(("content", AttrValue::from(content.as_str())));
        }
        attrs.push(("owner", AttrValue::from(self.owner.as_str())));
        attrs.push(("group", AttrValue::from(self.group.as_str())));
        attrs.push(("mode", AttrValue::from(self.mode.as_str())));
        attrs
    }

    fn relationships(&self) -> Vec<(Relationship, ResourceRef)> {
        self.require
            .iter()
            .map(|r| (Relationship::Require, r.clone()))
            .chain(self.notify.iter().map(|r| (Relationship::Notify, r.clone())))
            .collect()
    }
}
