//! Cluster resource records
//!
//! One entry of `GET /cluster/resources`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource type discriminator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Qemu,
    Lxc,
    Node,
    Storage,
    Pool,
    Sdn,
    #[default]
    #[serde(other)]
    Other,
}

impl ResourceKind {
    /// Virtual machines and containers are the only inventory hosts
    pub fn is_guest(&self) -> bool {
        matches!(self, ResourceKind::Qemu | ResourceKind::Lxc)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Qemu => "qemu",
            ResourceKind::Lxc => "lxc",
            ResourceKind::Node => "node",
            ResourceKind::Storage => "storage",
            ResourceKind::Pool => "pool",
            ResourceKind::Sdn => "sdn",
            ResourceKind::Other => "other",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cluster resource record
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Cluster-wide id, e.g. `qemu/100`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub kind: ResourceKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Physical node running the resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,

    /// Semicolon-separated raw tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmid: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Resource {
    pub fn is_guest(&self) -> bool {
        self.kind.is_guest()
    }

    /// Label used in diagnostics when the name may be missing
    pub fn label(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| self.kind.to_string())
    }

    /// Raw tag tokens: split on `;`, trimmed, empties dropped.
    ///
    /// Duplicates are kept.
    pub fn raw_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .as_deref()
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
impl Resource {
    pub fn new(kind: ResourceKind, name: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            node: Some(node.into()),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}
