//! Configuration management for Gameshelf
//!
//! Handles server, database, catalog provider and client settings.
//! Everything lives in a single TOML file; credentials can be supplied
//! through the environment instead.

mod catalog_config;
mod client_config;
mod server_config;

pub use catalog_config::CatalogConfig;
pub use client_config::ClientConfig;
pub use server_config::{DatabaseConfig, LoggingConfig, ServerConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Environment variable pointing at an explicit configuration file
pub const CONFIG_ENV: &str = "GAMESHELF_CONFIG";

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "gameshelf.toml";

/// Main Gameshelf configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameshelfConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameshelfConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        // An explicit path must exist; the working-directory file is optional
        if let Ok(explicit) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&explicit));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }

        tracing::warn!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Override file values with the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override file values using an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("TWITCH_CLIENT_ID") {
            self.catalog.client_id = id;
        }
        if let Some(secret) = lookup("TWITCH_CLIENT_SECRET") {
            self.catalog.client_secret = secret;
        }
        if let Some(path) = lookup("GAMESHELF_DATABASE") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(port) = lookup("GAMESHELF_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid GAMESHELF_PORT value: {}", port),
            }
        }
    }

    /// Check the settings the server cannot start without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.client_id.trim().is_empty() {
            return Err(ConfigError::Invalid("catalog.client_id is empty".into()));
        }
        if self.catalog.client_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("catalog.client_secret is empty".into()));
        }
        if self.catalog.search_limit == 0 {
            return Err(ConfigError::Invalid("catalog.search_limit must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn credentials() -> HashMap<&'static str, String> {
        HashMap::from([
            ("TWITCH_CLIENT_ID", "client".to_string()),
            ("TWITCH_CLIENT_SECRET", "secret".to_string()),
        ])
    }

    #[test]
    fn test_default_config() {
        let config = GameshelfConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.catalog.search_limit, 20);
        assert_eq!(config.client.max_retries, 3);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
[server]
port = 8080

[catalog]
client_id = "abc"
client_secret = "xyz"
search_limit = 5
"#;
        write!(temp_file, "{}", config_content).unwrap();

        let config = GameshelfConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.catalog.client_id, "abc");
        assert_eq!(config.catalog.search_limit, 5);
        assert_eq!(config.catalog.refresh_margin_secs, 60);
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameshelfConfig::load(Path::new("/nonexistent/gameshelf.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_save_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gameshelf.toml");
        let mut config = GameshelfConfig::default();
        config.server.port = 4000;

        config.save(&path).unwrap();

        let loaded = GameshelfConfig::load(&path).unwrap();
        assert_eq!(loaded.server.port, 4000);
    }

    #[test]
    fn test_overrides() {
        let mut vars = credentials();
        vars.insert("GAMESHELF_PORT", "9090".to_string());
        vars.insert("GAMESHELF_DATABASE", "/tmp/games.db".to_string());

        let mut config = GameshelfConfig::default();
        config.apply_overrides(|key| vars.get(key).cloned());

        assert_eq!(config.catalog.client_id, "client");
        assert_eq!(config.catalog.client_secret, "secret");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.path, PathBuf::from("/tmp/games.db"));
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = GameshelfConfig::default();
        config.apply_overrides(|key| (key == "GAMESHELF_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_validate() {
        let mut config = GameshelfConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let vars = credentials();
        config.apply_overrides(|key| vars.get(key).cloned());
        assert!(config.validate().is_ok());

        config.catalog.search_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("gameshelf.toml"));
        assert!(format!("{}", err).contains("not found"));

        let err = ConfigError::Invalid("test error".to_string());
        assert!(format!("{}", err).contains("Invalid"));
    }
}
