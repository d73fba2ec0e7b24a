//! Configuration file schema and loading
//!
//! The TOML file is optional. A missing file yields defaults with a warning and
//! never stops startup; a file that exists but cannot be read or parsed is a
//! configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory name under the platform config dir
pub const APP_DIR: &str = "unhyped";

/// Default model used for both upstream calls
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Default upstream API base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Cached analyses live for 7 days
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24 * 7;

/// Maximum number of cached analyses
pub const DEFAULT_CACHE_CAPACITY: usize = 250;

/// Callers should give up on a request after two minutes
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Longest accepted cache TTL (ten years)
pub const MAX_CACHE_TTL_HOURS: u64 = 24 * 365 * 10;

/// Largest accepted upload (7 MiB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 7 * 1024 * 1024;

/// Root of the TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Upstream API key (environment variable takes priority)
    pub openai_api_key: Option<String>,
    /// Upstream API base URL override
    pub openai_base_url: Option<String>,
    pub models: ModelsConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Model name overrides
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Used by both calls unless a specific override is set
    pub default: Option<String>,
    /// Identification (vision) call
    pub vision: Option<String>,
    /// Analysis (web search) call
    pub analysis: Option<String>,
}

/// Result cache sizing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_hours: u64,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// HTTP server limits
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub request_timeout_secs: u64,
    pub max_image_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// Logging configuration (RUST_LOG overrides `level`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl TomlConfig {
    /// Reject values no service can run with
    pub fn validate(&self) -> Result<()> {
        if self.cache.capacity == 0 {
            return Err(Error::Config("cache.capacity must be at least 1".to_string()));
        }
        if self.cache.ttl_hours == 0 {
            return Err(Error::Config("cache.ttl_hours must be at least 1".to_string()));
        }
        if self.cache.ttl_hours > MAX_CACHE_TTL_HOURS {
            return Err(Error::Config(format!(
                "cache.ttl_hours must be at most {}",
                MAX_CACHE_TTL_HOURS
            )));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(Error::Config(
                "server.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.server.max_image_bytes == 0 {
            return Err(Error::Config("server.max_image_bytes must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Default configuration file path for the platform
///
/// `<config_dir>/unhyped/config.toml`, or `./unhyped.toml` when the platform
/// has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR).join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("unhyped.toml"))
}

/// Load the TOML config at `path`
///
/// Missing file → defaults (with a warning). Unreadable or invalid file → error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            path = %path.display(),
            "Config file not found, using defaults"
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    config.validate()?;

    info!(path = %path.display(), "Loaded config file");
    Ok(config)
}
