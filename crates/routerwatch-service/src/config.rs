//! Host service configuration.
//!
//! The canonical configuration lives in `routerwatch-config.yaml` next to
//! the binary's working directory. This module defines strongly-typed
//! structs mirroring the YAML structure; every section has defaults so a
//! missing file (or section) falls back cleanly.

use std::path::Path;

use routerwatch_monitor::MonitorConfig;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// Monitor tunables (poll interval).
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Identity session settings.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Seed content for the in-memory registry.
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl ServiceConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `ROUTERWATCH_USER_ID` environment variable overrides
    /// `identity.user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.identity.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.identity.apply_env_overrides();
        Ok(config)
    }
}

/// Identity session configuration.
///
/// The host binary has no interactive sign-in; the session user comes from
/// configuration (or the environment), standing in for a real
/// authentication collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdentityConfig {
    /// The signed-in user id. Absent means "no session": the monitor will
    /// refuse to start.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl IdentityConfig {
    /// Let `ROUTERWATCH_USER_ID` override the configured user.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(user_id) = std::env::var("ROUTERWATCH_USER_ID") {
            if !user_id.is_empty() {
                self.user_id = Some(user_id);
            }
        }
    }
}

/// Seed content for the in-memory registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    /// Routers created for the configured user before the monitor starts.
    #[serde(default)]
    pub routers: Vec<SeedRouter>,
}

/// One seed router record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SeedRouter {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Network address.
    #[serde(default)]
    pub address: Option<String>,

    /// Hardware model.
    #[serde(default)]
    pub model: Option<String>,

    /// Installed firmware version.
    #[serde(default)]
    pub firmware_version: Option<String>,

    /// Reachability flag.
    #[serde(default)]
    pub online: Option<bool>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_sections_are_missing() {
        let config = ServiceConfig::parse("{}").unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 900);
        assert!(config.registry.routers.is_empty());
    }

    #[test]
    fn full_config_parses() {
        let yaml = r"
monitor:
  poll_interval_secs: 60
identity:
  user_id: user-1
registry:
  routers:
    - name: Office
      address: 192.168.0.1
      model: AX-3000
      online: true
";
        let config = ServiceConfig::parse(yaml).unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 60);
        assert_eq!(config.registry.routers.len(), 1);
        let seed = config.registry.routers.first().unwrap();
        assert_eq!(seed.name.as_deref(), Some("Office"));
        assert_eq!(seed.online, Some(true));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result = ServiceConfig::parse(": definitely not yaml");
        assert!(result.is_err());
    }
}
