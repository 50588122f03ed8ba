//! # Configuration
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`becas.toml` in the working directory, or `--config`)
//! 3. Environment variables (`BECAS_*`)
//! 4. CLI flags
//!
//! ## Environment Variables
//!
//! - `BECAS_DATABASE`: Path of the redb file
//! - `BECAS_BACKEND`: `redb` or `memory`
//! - `BECAS_DELETE_POLICY`: `reject` or `cascade`
//! - `BECAS_RATE_LIMIT`: Requests per second (0 disables)
//! - `BECAS_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all

use becas_core::{Catalog, CatalogError, DeletePolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// File read when no `--config` is given, if present.
pub const DEFAULT_CONFIG_FILE: &str = "becas.toml";

/// Default database path.
pub const DEFAULT_DATABASE: &str = "becas.redb";

/// Default rate limit in requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Cannot parse config file: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// =============================================================================
// BACKEND
// =============================================================================

/// Where the catalog keeps its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// redb file, survives restarts.
    #[default]
    Redb,
    /// Volatile tables, lost on exit.
    Memory,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(format!("Unknown backend: {}. Use: redb, memory", other)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redb => f.write_str("redb"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only; `"*"` allows all.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: Vec::new(),
        }
    }
}

/// Complete application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: PathBuf,
    pub backend: Backend,
    pub delete_policy: DeletePolicy,
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            backend: Backend::default(),
            delete_policy: DeletePolicy::default(),
            server: ServerConfig::default(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load defaults, then the TOML file.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Overlay `BECAS_*` environment variables.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BECAS_DATABASE") {
            self.database = PathBuf::from(v);
        }
        if let Some(v) = lookup("BECAS_BACKEND") {
            self.backend = v.parse().map_err(|reason| ConfigError::Invalid {
                key: "BECAS_BACKEND",
                reason,
            })?;
        }
        if let Some(v) = lookup("BECAS_DELETE_POLICY") {
            self.delete_policy = v.parse().map_err(|reason| ConfigError::Invalid {
                key: "BECAS_DELETE_POLICY",
                reason,
            })?;
        }
        if let Some(v) = lookup("BECAS_RATE_LIMIT") {
            self.server.rate_limit =
                v.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                        key: "BECAS_RATE_LIMIT",
                        reason: e.to_string(),
                    })?;
        }
        if let Some(v) = lookup("BECAS_CORS_ORIGINS") {
            self.server.cors_origins = parse_origins(&v);
        }
        Ok(())
    }

    /// Open the catalog described by these settings.
    pub fn open_catalog(&self) -> Result<Catalog, CatalogError> {
        let catalog = match self.backend {
            Backend::Redb => Catalog::with_redb(&self.database)?,
            Backend::Memory => Catalog::in_memory(),
        };
        Ok(catalog.with_delete_policy(self.delete_policy))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.backend, Backend::Redb);
        assert_eq!(config.delete_policy, DeletePolicy::Reject);
        assert_eq!(config.server.rate_limit, 100);
        assert!(config.server.cors_origins.is_empty());
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let config = AppConfig::from_toml_str(
            r#"
            delete_policy = "cascade"

            [server]
            port = 9090
            "#,
        )
        .expect("parse");
        assert_eq!(config.delete_policy, DeletePolicy::Cascade);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database, PathBuf::from(DEFAULT_DATABASE));
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(matches!(
            AppConfig::from_toml_str("backend = [1, 2"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_layer_wins_over_file() {
        let vars: BTreeMap<&str, &str> = [
            ("BECAS_BACKEND", "memory"),
            ("BECAS_RATE_LIMIT", "0"),
            ("BECAS_CORS_ORIGINS", "https://becas.example, ,http://localhost:5173"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::from_toml_str("backend = \"redb\"").expect("parse");
        config
            .apply_vars(|k| vars.get(k).map(|v| (*v).to_string()))
            .expect("env");

        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.server.rate_limit, 0);
        assert_eq!(
            config.server.cors_origins,
            vec![
                "https://becas.example".to_string(),
                "http://localhost:5173".to_string()
            ]
        );
    }

    #[test]
    fn bad_env_value_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_vars(|k| (k == "BECAS_DELETE_POLICY").then(|| "purge".to_string()))
            .expect_err("invalid policy");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "BECAS_DELETE_POLICY",
                ..
            }
        ));
    }

    #[test]
    fn memory_backend_opens_volatile_catalog() {
        let config = AppConfig {
            backend: Backend::Memory,
            delete_policy: DeletePolicy::Cascade,
            ..AppConfig::default()
        };
        let catalog = config.open_catalog().expect("open");
        assert!(!catalog.is_persistent());
        assert_eq!(catalog.delete_policy(), DeletePolicy::Cascade);
    }
}
