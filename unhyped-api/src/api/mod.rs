//! HTTP API handlers for unhyped-api

pub mod analyze;
pub mod health;
pub mod mime;

pub use analyze::analyze_routes;
pub use health::health_routes;
