//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::utils::logger::DebugLevel;

/// Proxmox VE dynamic inventory for Ansible
#[derive(Parser, Debug, Default)]
#[command(name = "proxmox-inventory")]
#[command(version)]
#[command(about = "Build an Ansible dynamic inventory from Proxmox VE cluster resources")]
#[command(long_about = None)]
pub struct Args {
    /// Set debug level (enables debugging)
    #[arg(short = 'l', long = "debug_level", value_name = "LEVEL",
          value_parser = clap::value_parser!(u8).range(1..=3))]
    pub debug_level: Option<u8>,

    /// Output the inventory as JSON
    #[arg(long)]
    pub list: bool,

    /// Proxmox host to use as inventory source [default: proxmox0]
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Proxmox API port [default: 8006]
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Proxmox user (falls back to TOWER_USERNAME)
    #[arg(long, value_name = "USER")]
    pub user: Option<String>,

    /// Proxmox password (falls back to TOWER_PASSWORD)
    #[arg(long, value_name = "PASSWORD")]
    pub pass: Option<String>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Do not resolve guest names into ansible_host
    #[arg(long)]
    pub no_resolve: bool,

    /// Configuration file (YAML or JSON)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn debug_level(&self) -> Option<DebugLevel> {
        self.debug_level.and_then(DebugLevel::from_u8)
    }
}
