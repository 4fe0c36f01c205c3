//! Proxmox VE API module
//!
//! Ticket authentication and cluster resource listing.

mod client;

pub use client::{ProxmoxClient, DEFAULT_PORT};
