//! Configuration resolution for unhyped-api
//!
//! Every setting resolves with **ENV → TOML → compiled default** priority.
//! Blank values are treated as unset.

use std::time::Duration;
use tracing::{info, warn};
use unhyped_common::config::{
    TomlConfig, DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL, MAX_CACHE_TTL_HOURS,
};

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_VISION_MODEL: &str = "OPENAI_VISION_MODEL";
pub const ENV_ANALYSIS_MODEL: &str = "OPENAI_ANALYSIS_MODEL";

/// Log filter when neither `RUST_LOG` nor `[logging] level` is set
pub const DEFAULT_LOG_FILTER: &str = "unhyped_api=info,tower_http=info";

/// Model names for the two upstream calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub vision: String,
    pub analysis: String,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            vision: DEFAULT_MODEL.to_string(),
            analysis: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Fully resolved service settings
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Absent → the service runs but `/analyze` answers 400
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: ModelSelection,
    pub cache_ttl: chrono::Duration,
    pub cache_capacity: usize,
    pub request_timeout: Duration,
    pub max_image_bytes: usize,
    pub log_level: Option<String>,
}

impl ServiceConfig {
    /// Resolve against the process environment and a loaded TOML config
    pub fn resolve(toml: &TomlConfig) -> Self {
        Self {
            api_key: resolve_api_key(toml),
            base_url: env_value(ENV_BASE_URL)
                .or_else(|| non_blank(toml.openai_base_url.as_deref()))
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            models: resolve_models(toml),
            cache_ttl: chrono::Duration::hours(
                toml.cache.ttl_hours.min(MAX_CACHE_TTL_HOURS) as i64,
            ),
            cache_capacity: toml.cache.capacity,
            request_timeout: Duration::from_secs(toml.server.request_timeout_secs),
            max_image_bytes: toml.server.max_image_bytes,
            log_level: non_blank(toml.logging.level.as_deref()),
        }
    }

    /// Filter directive for the tracing subscriber (`RUST_LOG` is checked separately)
    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

/// Resolve the upstream API key
///
/// **Priority:** ENV (`OPENAI_API_KEY`) → TOML (`openai_api_key`)
pub fn resolve_api_key(toml: &TomlConfig) -> Option<String> {
    let env_key = env_value(ENV_API_KEY);
    let toml_key = non_blank(toml.openai_api_key.as_deref());

    if env_key.is_some() && toml_key.is_some() {
        warn!("API key found in both environment and TOML config. Using environment (highest priority).");
    }

    if let Some(key) = env_key {
        info!("API key loaded from environment variable");
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("API key loaded from TOML config");
        return Some(key);
    }

    warn!(
        "No API key configured; /analyze will reject requests. Set {} or openai_api_key in the config file.",
        ENV_API_KEY
    );
    None
}

/// Resolve model names for both calls
///
/// **Priority (vision):** `OPENAI_VISION_MODEL` → `OPENAI_MODEL` →
/// `models.vision` → `models.default` → compiled default. Analysis likewise.
pub fn resolve_models(toml: &TomlConfig) -> ModelSelection {
    let shared_env = env_value(ENV_MODEL);
    let shared_toml = non_blank(toml.models.default.as_deref());

    let pick = |specific_env: &str, specific_toml: Option<&str>| {
        env_value(specific_env)
            .or_else(|| shared_env.clone())
            .or_else(|| non_blank(specific_toml))
            .or_else(|| shared_toml.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    };

    ModelSelection {
        vision: pick(ENV_VISION_MODEL, toml.models.vision.as_deref()),
        analysis: pick(ENV_ANALYSIS_MODEL, toml.models.analysis.as_deref()),
    }
}

/// Validate key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| is_valid_key(v)).map(|v| v.trim().to_string())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| is_valid_key(v)).map(|v| v.trim().to_string())
}
