//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Browser UI shell
//! GET  /health                    - Liveness probe
//!
//! # JSON API (CORS-enabled)
//! GET  /api/config                - Client runtime configuration
//! GET  /api/health                - Upstream configuration flags
//! GET  /api/products              - Catalog products, as received
//! PUT  /api/products/{id}         - Replace a product's description
//! POST /api/improve-description   - Rewrite one description
//! POST /api/improve-bulk          - Rewrite many, per-item results
//! ```

pub mod api;
pub mod pages;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the page router (everything outside `/api`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(health))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check upstream services.
async fn health() -> &'static str {
    "ok"
}
