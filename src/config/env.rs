//! Environment variable configuration
//!
//! Reads the variables the inventory script has always honoured.

use std::env;

/// Proxmox host override; wins over `--host`
pub const HOST_VAR: &str = "proxmox_host";
/// Fallback username
pub const USERNAME_VAR: &str = "TOWER_USERNAME";
/// Fallback password
pub const PASSWORD_VAR: &str = "TOWER_PASSWORD";
/// Configuration file path
pub const CONFIG_VAR: &str = "PROXMOX_INVENTORY_CONFIG";

/// Environment configuration from environment variables
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Proxmox host from `proxmox_host`
    pub proxmox_host: Option<String>,
    /// Username from `TOWER_USERNAME`
    pub username: Option<String>,
    /// Password from `TOWER_PASSWORD`
    pub password: Option<String>,
    /// Config file from `PROXMOX_INVENTORY_CONFIG`
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            proxmox_host: env::var(HOST_VAR).ok(),
            username: env::var(USERNAME_VAR).ok(),
            password: env::var(PASSWORD_VAR).ok(),
            config_file: env::var(CONFIG_VAR).ok(),
        }
    }
}

impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfig")
            .field("proxmox_host", &self.proxmox_host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("config_file", &self.config_file)
            .finish()
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub(crate) struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl EnvGuard {
    /// Set variables (`None` removes) until the guard drops
    pub fn set(vars: &[(&str, Option<&str>)]) -> Self {
        let previous = vars
            .iter()
            .map(|(k, _)| (k.to_string(), env::var(k).ok()))
            .collect();

        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        Self { previous }
    }
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}
