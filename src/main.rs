//! Proxmox Inventory - Ansible dynamic inventory for Proxmox VE
//!
//! Authenticates against the Proxmox VE API, lists cluster resources and
//! groups virtual machines and containers by their tags.
//!
//! ## Features
//!
//! - Tag-derived groups (`Web-Tier` becomes `web_tier_servers`)
//! - `proxmox_host` hostvar naming the node that runs each guest
//! - Optional `ansible_host` resolved from the guest name
//! - Credentials from flags or `TOWER_USERNAME` / `TOWER_PASSWORD`
//!
//! ## Usage
//!
//! ```bash
//! # Print the inventory
//! proxmox-inventory --list --host pve1 --user root@pam --pass secret
//!
//! # Trace the API exchange on stderr
//! proxmox-inventory --list -l 2
//!
//! # Skip DNS lookups
//! proxmox-inventory --list --no-resolve
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info};

mod cli;
mod config;
mod http;
mod inventory;
mod models;
mod output;
mod proxmox;
mod utils;

use cli::Args;
use config::{ConfigFile, EnvConfig, Settings};
use inventory::InventoryBuilder;
use output::render_inventory;
use proxmox::ProxmoxClient;
use utils::logger::init_logger;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    init_logger(args.debug_level());
    if let Some(level) = args.debug_level {
        info!("Set debug level to {}", level);
    }

    if let Err(err) = run(&args).await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<()> {
    let env = EnvConfig::load();
    debug!("Environment: {:?}", env);

    let config_path = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(PathBuf::from));
    let file = ConfigFile::load_or_default(config_path.as_deref())?;

    let settings = Settings::resolve(args, &env, &file)?;
    info!("Proxmox server: {}:{}", settings.host, settings.port);

    let client = ProxmoxClient::new(&settings.host, settings.port, settings.timeout_secs)?;
    debug!("API endpoint: {}", client.base_url());

    if let Some(rendered) = export(&client, &settings, args.list).await? {
        println!("{rendered}");
    }

    Ok(())
}

/// Authenticate, fetch cluster resources and build the inventory.
///
/// The rendered document is returned only when `list` is set.
async fn export(client: &ProxmoxClient, settings: &Settings, list: bool) -> Result<Option<String>> {
    let ticket = client
        .login(&settings.credentials)
        .await
        .context("Failed to authenticate with Proxmox")?;

    let resources = client
        .cluster_resources(&ticket)
        .await
        .context("Failed to fetch cluster resources")?;

    let builder = InventoryBuilder::new(settings.resolve_ip);
    debug!("Resolving ansible_host: {}", builder.resolves_ip());
    let inventory = builder
        .build(&resources)
        .await
        .context("Failed to build inventory")?;

    let rendered = render_inventory(&inventory).context("Failed to serialize inventory")?;
    info!("Inventory:\n{}", rendered);

    Ok(list.then_some(rendered))
}
