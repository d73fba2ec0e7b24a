//! unhyped-api library interface
//!
//! Image in, "hype vs. reality" verdict out: a vision call identifies the
//! film/TV title, a web-search-backed call analyzes it, scores are calibrated
//! and results cached per title.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use unhyped_common::Clock;

use crate::config::ServiceConfig;
use crate::services::{AnalysisPipeline, OpenAIClient, OpenAIError, ResultCache};

/// Room for multipart framing on top of the image itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Absent when no API key is configured
    pub pipeline: Option<Arc<AnalysisPipeline>>,
    /// Largest accepted image upload
    pub max_image_bytes: usize,
    /// Per-request timeout applied to every route
    pub request_timeout: Duration,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last analyze failure, exposed on /health
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(
        pipeline: Option<Arc<AnalysisPipeline>>,
        max_image_bytes: usize,
        request_timeout: Duration,
    ) -> Self {
        Self {
            pipeline,
            max_image_bytes,
            request_timeout,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// State for a resolved configuration, wiring the real upstream client
    pub fn from_config(config: &ServiceConfig, clock: Arc<dyn Clock>) -> Result<Self, OpenAIError> {
        let pipeline = match &config.api_key {
            Some(key) => {
                let client = OpenAIClient::new(key.clone(), &config.base_url, config.request_timeout)?;
                let cache = ResultCache::new(clock, config.cache_ttl, config.cache_capacity);
                Some(Arc::new(AnalysisPipeline::new(
                    Arc::new(client),
                    &config.models,
                    cache,
                )))
            }
            None => None,
        };

        Ok(Self::new(pipeline, config.max_image_bytes, config.request_timeout))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_image_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);
    let timeout = state.request_timeout;

    Router::new()
        .merge(api::health_routes())
        .merge(api::analyze_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
