//! Copydesk server: a local HTTP API and browser UI that rewrites Shopify
//! product descriptions with `OpenAI` and writes them back.
//!
//! # Architecture
//!
//! - Axum web framework, Askama for the page shell
//! - Shopify Admin REST API for the product catalog
//! - `OpenAI` chat completions for description rewrites
//! - No persistence: every request goes straight to the upstream services
//!
//! The binary in `main.rs` only wires configuration, logging, and Sentry
//! around [`app`]. Tests drive [`app`] directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod extract;
pub mod openai;
pub mod routes;
pub mod shopify;
pub mod state;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

pub use config::ServerConfig;
pub use state::AppState;

/// Build the complete application router.
///
/// Sentry layers are not included; the binary adds them outermost.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE]);

    let static_dir = state.config().static_dir.clone();

    Router::new()
        .merge(routes::routes())
        .merge(routes::api::router().layer(cors))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
