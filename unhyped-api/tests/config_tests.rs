//! Unit tests for service configuration resolution
//!
//! Uses serial_test: every test here reads or writes the OPENAI_* process
//! environment, so they must not run in parallel.

use serial_test::serial;
use std::time::Duration;
use unhyped_api::config::{resolve_api_key, resolve_models, ServiceConfig};
use unhyped_common::config::{
    CacheConfig, ModelsConfig, TomlConfig, DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL,
    MAX_CACHE_TTL_HOURS,
};

const ENV_VARS: &[&str] = &[
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "OPENAI_MODEL",
    "OPENAI_VISION_MODEL",
    "OPENAI_ANALYSIS_MODEL",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn toml_with_key(key: Option<&str>) -> TomlConfig {
    TomlConfig {
        openai_api_key: key.map(str::to_string),
        ..Default::default()
    }
}

// ============================================================================
// API key
// ============================================================================

#[test]
#[serial]
fn test_env_key_overrides_toml() {
    clear_env();
    std::env::set_var("OPENAI_API_KEY", "env-key");

    let key = resolve_api_key(&toml_with_key(Some("toml-key")));
    assert_eq!(key.as_deref(), Some("env-key"));

    clear_env();
}

#[test]
#[serial]
fn test_toml_key_used_when_env_missing() {
    clear_env();

    let key = resolve_api_key(&toml_with_key(Some("toml-key")));
    assert_eq!(key.as_deref(), Some("toml-key"));
}

#[test]
#[serial]
fn test_blank_env_key_is_ignored() {
    clear_env();
    std::env::set_var("OPENAI_API_KEY", "   ");

    let key = resolve_api_key(&toml_with_key(Some("toml-key")));
    assert_eq!(key.as_deref(), Some("toml-key"));

    clear_env();
}

#[test]
#[serial]
fn test_no_key_anywhere() {
    clear_env();
    assert_eq!(resolve_api_key(&toml_with_key(None)), None);
    assert_eq!(resolve_api_key(&toml_with_key(Some(""))), None);
}

// ============================================================================
// Models
// ============================================================================

#[test]
#[serial]
fn test_models_default_when_nothing_configured() {
    clear_env();

    let models = resolve_models(&TomlConfig::default());
    assert_eq!(models.vision, DEFAULT_MODEL);
    assert_eq!(models.analysis, DEFAULT_MODEL);
}

#[test]
#[serial]
fn test_model_priority_chain() {
    clear_env();
    let toml = TomlConfig {
        models: ModelsConfig {
            default: Some("toml-default".to_string()),
            vision: Some("toml-vision".to_string()),
            analysis: None,
        },
        ..Default::default()
    };

    let models = resolve_models(&toml);
    assert_eq!(models.vision, "toml-vision");
    assert_eq!(models.analysis, "toml-default");

    std::env::set_var("OPENAI_MODEL", "env-shared");
    let models = resolve_models(&toml);
    assert_eq!(models.vision, "env-shared");
    assert_eq!(models.analysis, "env-shared");

    std::env::set_var("OPENAI_VISION_MODEL", "env-vision");
    let models = resolve_models(&toml);
    assert_eq!(models.vision, "env-vision");
    assert_eq!(models.analysis, "env-shared");

    clear_env();
}

// ============================================================================
// Full resolution
// ============================================================================

#[test]
#[serial]
fn test_service_config_defaults() {
    clear_env();

    let config = ServiceConfig::resolve(&TomlConfig::default());
    assert_eq!(config.api_key, None);
    assert_eq!(config.base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(config.cache_ttl, chrono::Duration::days(7));
    assert_eq!(config.cache_capacity, 250);
    assert_eq!(config.request_timeout, Duration::from_secs(120));
    assert_eq!(config.max_image_bytes, 7 * 1024 * 1024);
    assert_eq!(config.log_level, None);
}

#[test]
#[serial]
fn test_base_url_env_overrides_toml() {
    clear_env();
    let toml = TomlConfig {
        openai_base_url: Some("http://toml.local/v1".to_string()),
        ..Default::default()
    };

    assert_eq!(ServiceConfig::resolve(&toml).base_url, "http://toml.local/v1");

    std::env::set_var("OPENAI_BASE_URL", "http://env.local/v1");
    assert_eq!(ServiceConfig::resolve(&toml).base_url, "http://env.local/v1");

    clear_env();
}

#[test]
#[serial]
fn test_oversized_ttl_is_clamped_not_fatal() {
    clear_env();
    let toml = TomlConfig {
        cache: CacheConfig {
            ttl_hours: 9_000_000_000_000_000,
            capacity: 250,
        },
        ..Default::default()
    };

    let config = ServiceConfig::resolve(&toml);
    assert_eq!(
        config.cache_ttl,
        chrono::Duration::hours(MAX_CACHE_TTL_HOURS as i64)
    );
}
