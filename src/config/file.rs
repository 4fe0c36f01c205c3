//! Configuration file management
//!
//! Optional YAML or JSON file with connection defaults. Credentials are
//! never read from it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ConfigError;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./proxmox-inventory.yaml",
    "./proxmox-inventory.yml",
    "~/.config/proxmox-inventory/config.yaml",
];

/// Configuration file structure
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Proxmox host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// API port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Per-call timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Resolve guest names to `ansible_host`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_ip: Option<bool>,
}

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load an explicit file, or the first standard location, or defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::find() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading config file {}", path.display());

        let file_error = |reason: String| ConfigError::File {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content).map_err(|e| file_error(e.to_string()))?
        } else {
            serde_json::from_str(&content).map_err(|e| file_error(e.to_string()))?
        };

        config.validate().map_err(|e| file_error(e.to_string()))?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == Some(0) {
            return Err(ConfigError::Invalid("port must be non-zero".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "timeout_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "host: pve-lab\nport: 8443\nresolve_ip: false\n").unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.host.as_deref(), Some("pve-lab"));
        assert_eq!(config.port, Some(8443));
        assert_eq!(config.resolve_ip, Some(false));
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"timeout_secs": 30}"#).unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.timeout_secs, Some(30));
        assert!(config.host.is_none());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "password: hunter2\n").unwrap();

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::File { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let err = ConfigFile::load_or_default(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::File { .. }));
    }

    #[test]
    fn test_validate_config() {
        let config = ConfigFile {
            port: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConfigFile {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        assert!(ConfigFile::default().validate().is_ok());
    }

    #[test]
    fn test_expand_path() {
        let path = expand_path("./test.yaml");
        assert_eq!(path, PathBuf::from("./test.yaml"));
    }

    #[test]
    fn test_is_yaml_file() {
        assert!(is_yaml_file(Path::new("a.yaml")));
        assert!(is_yaml_file(Path::new("a.yml")));
        assert!(!is_yaml_file(Path::new("a.json")));
    }
}
