//! Inventory document
//!
//! Serializes to the dynamic inventory JSON shape:
//! `all`, then `_meta`, then one object per group in creation order.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// The root `all` group
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AllGroup {
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

/// Per-host variables
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HostVars {
    /// Node running the guest
    pub proxmox_host: String,

    /// Resolved address, when IP resolution is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ansible_host: Option<IpAddr>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub hostvars: BTreeMap<String, HostVars>,
}

/// A tag-derived group
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Group {
    #[serde(default)]
    pub hosts: Vec<String>,
}

/// Complete inventory document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    all: AllGroup,
    meta: Meta,
    groups: Vec<(String, Group)>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &AllGroup {
        &self.all
    }

    pub fn children(&self) -> &[String] {
        &self.all.children
    }

    pub fn hostvars(&self, host: &str) -> Option<&HostVars> {
        self.meta.hostvars.get(host)
    }

    pub fn hostvars_len(&self) -> usize {
        self.meta.hostvars.len()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|(n, _)| n == name).map(|(_, g)| g)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &Group)> {
        self.groups.iter().map(|(n, g)| (n.as_str(), g))
    }

    /// Store hostvars, replacing any previous entry for the host
    pub fn set_hostvars(&mut self, host: impl Into<String>, vars: HostVars) {
        self.meta.hostvars.insert(host.into(), vars);
    }

    /// Append a child group name if not present. Returns true when added.
    pub fn add_child(&mut self, name: &str) -> bool {
        if self.all.children.iter().any(|c| c == name) {
            return false;
        }
        self.all.children.push(name.to_string());
        true
    }

    /// Create an empty group if missing. Returns true when created.
    pub fn ensure_group(&mut self, name: &str) -> bool {
        if self.group(name).is_some() {
            return false;
        }
        self.groups.push((name.to_string(), Group::default()));
        true
    }

    /// Append a host to an existing group; duplicates are not collapsed
    pub fn push_host(&mut self, group: &str, host: &str) {
        if let Some((_, g)) = self.groups.iter_mut().find(|(n, _)| n == group) {
            g.hosts.push(host.to_string());
        }
    }
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.groups.len()))?;
        map.serialize_entry("all", self.all())?;
        map.serialize_entry("_meta", &self.meta)?;
        for (name, group) in self.groups() {
            map.serialize_entry(name, group)?;
        }
        map.end()
    }
}

#[derive(serde::Deserialize)]
struct RawInventory {
    all: AllGroup,
    #[serde(rename = "_meta", default)]
    meta: Meta,
    #[serde(flatten)]
    groups: BTreeMap<String, Group>,
}

impl<'de> Deserialize<'de> for Inventory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RawInventory {
            all,
            meta,
            mut groups,
        } = RawInventory::deserialize(deserializer)?;

        // Object key order is not guaranteed; rebuild group order from `all.children`.
        let mut ordered = Vec::with_capacity(groups.len());
        for child in &all.children {
            if let Some(group) = groups.remove(child) {
                ordered.push((child.clone(), group));
            }
        }
        ordered.extend(groups);

        Ok(Self {
            all,
            meta,
            groups: ordered,
        })
    }
}
