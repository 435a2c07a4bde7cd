//! LogSpace RCA HTTP service

pub mod config;
pub mod handlers;
pub mod models;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers::{analyze_logs, health};
use crate::state::AppState;

/// Build the router: one analysis endpoint plus a health probe
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze_logs))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
