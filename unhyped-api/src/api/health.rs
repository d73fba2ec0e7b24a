//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always true while the process serves requests
    pub ok: bool,
    /// Module name ("unhyped-api")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Whether an API key is configured
    pub analyze_enabled: bool,
    /// Entries in the result cache
    pub cache_entries: usize,
    /// Last analyze failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let cache_entries = match &state.pipeline {
        Some(pipeline) => pipeline.cache_len().await,
        None => 0,
    };

    let last_error = state.last_error.read().await.clone();

    Json(HealthResponse {
        ok: true,
        module: "unhyped-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        analyze_enabled: state.pipeline.is_some(),
        cache_entries,
        last_error,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
