//! Configuration for the schema validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemas.toml)
//! - Environment variables (SCHEMAS_*)
//!
//! ## Example config file (schemas.toml):
//! ```toml
//! [schemas]
//! dir = "./message/testdata"
//! extension = "json"
//!
//! [traversal]
//! fail_fast = false
//!
//! [report]
//! only_failures = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validate::FailurePolicy;

/// Main configuration for the schema validator
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchemaConfig {
    /// Where the schema documents live
    #[serde(default)]
    pub schemas: SchemasConfig,

    /// Directory-walk settings
    #[serde(default)]
    pub traversal: TraversalConfig,

    /// Reporting settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Schema location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemasConfig {
    /// Directory to search for schema documents
    #[serde(default = "default_schema_dir")]
    pub dir: PathBuf,

    /// File extension identifying schema documents (no leading dot)
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// Directory-walk settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraversalConfig {
    /// Stop at the first failing document
    #[serde(default)]
    pub fail_fast: bool,
}

/// Reporting settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Print failing documents only
    #[serde(default)]
    pub only_failures: bool,
}

// Default value functions
fn default_schema_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    "json".to_string()
}

impl Default for SchemasConfig {
    fn default() -> Self {
        Self {
            dir: default_schema_dir(),
            extension: default_extension(),
        }
    }
}

impl SchemaConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["schemas.toml", ".schemas.toml", "config/schemas.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "protocol", "schemas") {
            let xdg_config = config_dir.config_dir().join("schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (SCHEMAS_*)
        builder = builder.add_source(
            Environment::with_prefix("SCHEMAS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Get the schema directory (resolves relative paths)
    pub fn schema_dir(&self) -> PathBuf {
        if self.schemas.dir.is_absolute() {
            self.schemas.dir.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.schemas.dir)
        }
    }

    /// The walk policy the traversal settings select
    pub fn policy(&self) -> FailurePolicy {
        if self.traversal.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::CollectAll
        }
    }
}
