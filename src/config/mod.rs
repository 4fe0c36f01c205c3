//! Configuration module
//!
//! Resolves connection settings and credentials from the command line,
//! the environment and an optional configuration file.

mod env;
mod file;

use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::cli::Args;
use crate::http::DEFAULT_TIMEOUT_SECS;
use crate::proxmox::DEFAULT_PORT;

use env::{PASSWORD_VAR, USERNAME_VAR};

pub use env::EnvConfig;
pub use file::ConfigFile;

/// Host used when nothing else names one
pub const DEFAULT_HOST: &str = "proxmox0";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to source required variable '{0}'")]
    MissingValue(&'static str),

    #[error("Unable to determine ProxMox server")]
    MissingHost,

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Config file {path}: {reason}")]
    File { path: String, reason: String },
}

/// Credential fields that must be resolved before authenticating
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialField {
    Password,
    Username,
}

impl CredentialField {
    pub const REQUIRED: [CredentialField; 2] = [CredentialField::Password, CredentialField::Username];

    /// Environment variable consulted after the flag
    pub fn env_var(self) -> &'static str {
        match self {
            CredentialField::Password => PASSWORD_VAR,
            CredentialField::Username => USERNAME_VAR,
        }
    }

    fn from_args(self, args: &Args) -> Option<&str> {
        match self {
            CredentialField::Password => args.pass.as_deref(),
            CredentialField::Username => args.user.as_deref(),
        }
    }

    fn from_env(self, env: &EnvConfig) -> Option<&str> {
        match self {
            CredentialField::Password => env.password.as_deref(),
            CredentialField::Username => env.username.as_deref(),
        }
    }
}

/// Proxmox login credentials
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    fn set(&mut self, field: CredentialField, value: String) {
        match field {
            CredentialField::Password => self.password = value,
            CredentialField::Username => self.username = value,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Fully resolved run settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
    pub resolve_ip: bool,
    pub credentials: Credentials,
}

impl Settings {
    /// Resolve every setting.
    ///
    /// Host: `proxmox_host` env, `--host`, config file, then `proxmox0`;
    /// the first source present wins and must be non-empty.
    /// Credentials: flag, then environment; empty values count as unset.
    pub fn resolve(args: &Args, env: &EnvConfig, file: &ConfigFile) -> Result<Self, ConfigError> {
        let credentials = resolve_credentials(args, env)?;

        let host = env
            .proxmox_host
            .as_deref()
            .or(args.host.as_deref())
            .or(file.host.as_deref())
            .unwrap_or(DEFAULT_HOST)
            .trim();
        if host.is_empty() {
            return Err(ConfigError::MissingHost);
        }

        let port = args.port.or(file.port).unwrap_or(DEFAULT_PORT);
        let timeout_secs = args
            .timeout
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout must be non-zero".to_string()));
        }

        let resolve_ip = !args.no_resolve && file.resolve_ip.unwrap_or(true);

        Ok(Self {
            host: host.to_string(),
            port,
            timeout_secs,
            resolve_ip,
            credentials,
        })
    }
}

fn resolve_credentials(args: &Args, env: &EnvConfig) -> Result<Credentials, ConfigError> {
    let mut credentials = Credentials::default();

    for field in CredentialField::REQUIRED {
        let value = match non_empty(field.from_args(args)) {
            Some(v) => {
                debug!("Setting {} from arguments", field.env_var());
                v
            }
            None => {
                debug!("Setting {} from environment", field.env_var());
                non_empty(field.from_env(env)).ok_or(ConfigError::MissingValue(field.env_var()))?
            }
        };
        credentials.set(field, value.to_string());
    }

    debug!("Username: {}", credentials.username);
    Ok(credentials)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
