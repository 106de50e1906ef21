//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::query::PageLimits;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("table name pattern is valid")
});

/// Check that a table name is a plain identifier safe to splice into SQL
pub fn validate_table_name(name: &str) -> Result<(), ConfigError> {
    if TABLE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: "database.table".to_string(),
            value: name.to_string(),
            message: "must be a plain identifier ([A-Za-z_][A-Za-z0-9_]*)".to_string(),
        })
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind
    pub bind: String,

    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Data source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database produced by the bulk import
    pub path: PathBuf,

    /// Table holding the sales rows
    pub table: String,

    /// Upper bound on pooled read-only connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("database/sales.db"),
            table: "sales".to_string(),
            max_connections: 8,
        }
    }
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            default_page_size: limits.default_page_size,
            max_page_size: limits.max_page_size,
        }
    }
}

/// Complete service configuration
///
/// Every section and field has a default, so an empty document is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub query: QueryConfig,
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                file: Some(path.to_string()),
                message,
            },
            other => other,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_table_name(&self.database.table)?;

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let q = &self.query;
        if q.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "query.max_page_size".to_string(),
                value: q.max_page_size.to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if q.default_page_size == 0 || q.default_page_size > q.max_page_size {
            return Err(ConfigError::InvalidValue {
                field: "query.default_page_size".to_string(),
                value: q.default_page_size.to_string(),
                message: format!("must be between 1 and {}", q.max_page_size),
            });
        }

        Ok(())
    }

    /// Replace the port of `server.bind`, keeping the host
    pub fn with_port(mut self, port: u16) -> Self {
        let host = self
            .server
            .bind
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| self.server.bind.clone());
        self.server.bind = format!("{}:{}", host, port);
        self
    }

    /// Pagination limits for the query service
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.query.default_page_size,
            max_page_size: self.query.max_page_size,
        }
    }
}
