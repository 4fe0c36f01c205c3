//! Data models for the Proxmox inventory
//!
//! Cluster resource records in, inventory document out.

mod inventory;
mod resource;

pub use inventory::{HostVars, Inventory};
pub use resource::Resource;

#[cfg(test)]
pub use resource::ResourceKind;
