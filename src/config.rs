//! Configuration System
//!
//! Handles loading configuration from TOML files with environment
//! variable overrides, in the `LOCSTASH_*` namespace.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Record store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Collection key the location records are stored under
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Seed the demo locations when the collection is empty
    #[serde(default = "default_seed_demo")]
    pub seed_demo: bool,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("locstash").to_string_lossy().to_string())
        .unwrap_or_else(|| "./locstash_data".to_string())
}

fn default_collection() -> String {
    "locs".to_string()
}

fn default_seed_demo() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            collection: default_collection(),
            seed_demo: default_seed_demo(),
        }
    }
}

/// Query engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Records per page when pagination is switched on
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Distance unit for annotation: "km" or "mi"
    #[serde(default = "default_distance_unit")]
    pub distance_unit: String,
}

fn default_page_size() -> usize {
    5
}

fn default_distance_unit() -> String {
    "km".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            distance_unit: default_distance_unit(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations, falling back to env-only defaults
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("locstash").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var("LOCSTASH_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Ok(collection) = std::env::var("LOCSTASH_COLLECTION") {
            self.storage.collection = collection;
        }
        if let Ok(page_size) = std::env::var("LOCSTASH_PAGE_SIZE") {
            if let Ok(n) = page_size.parse() {
                self.query.page_size = n;
            }
        }
        if let Ok(unit) = std::env::var("LOCSTASH_DISTANCE_UNIT") {
            self.query.distance_unit = unit;
        }
        if let Ok(level) = std::env::var("LOCSTASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOCSTASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Distance unit as the typed enum (anything but "mi" means kilometers)
    pub fn distance_unit(&self) -> crate::geo::DistanceUnit {
        match self.query.distance_unit.as_str() {
            "mi" | "miles" => crate::geo::DistanceUnit::Miles,
            _ => crate::geo::DistanceUnit::Kilometers,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Locstash Configuration
#
# Environment variables override these settings:
# - LOCSTASH_DATA_DIR
# - LOCSTASH_COLLECTION
# - LOCSTASH_PAGE_SIZE
# - LOCSTASH_DISTANCE_UNIT
# - LOCSTASH_LOG_LEVEL
# - LOCSTASH_LOG_FORMAT

[storage]
# Directory for storing collection files
data_dir = "~/.local/share/locstash"

# Collection key the location records are stored under
collection = "locs"

# Seed demo locations when the collection is empty
seed_demo = true

[query]
# Records per page when pagination is switched on
page_size = 5

# Distance unit: "km" or "mi"
distance_unit = "km"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
