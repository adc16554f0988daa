//! # Potluck Server
//!
//! HTTP surface for the Potluck recipe catalog. Wires the domain services
//! from `potluck-core` into an axum application with CORS, request tracing,
//! and the JSON error contract the frontend expects.

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use state::AppState;

use crate::config::CorsConfig;

/// Assemble the full application router.
///
/// Layer order matters: CORS wraps the routes first so preflights short
/// circuit, then tracing wraps everything.
pub fn create_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors);

    Router::new()
        .route("/health", get(handlers::health::health))
        .merge(routes::create_api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(Duration::from_secs(12 * 60 * 60));

    // Credentials cannot ride with a wildcard origin.
    if origins.is_empty() {
        layer.allow_origin(AllowOrigin::any())
    } else {
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}
