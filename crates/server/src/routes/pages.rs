//! Server-rendered page shell.
//!
//! The page itself is static; the browser script fills it in through the
//! JSON API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::state::AppState;

/// Single-page workspace template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Crate version shown in the footer.
    pub version: &'static str,
    /// Whether Shopify credentials are present.
    pub shopify_configured: bool,
    /// Whether an `OpenAI` API key is present.
    pub openai_configured: bool,
}

impl IndexTemplate {
    /// Names of upstream services without credentials.
    #[must_use]
    pub fn missing_services(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.shopify_configured {
            missing.push("Shopify");
        }
        if !self.openai_configured {
            missing.push("OpenAI");
        }
        missing
    }
}

/// Display the workspace page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config();
    IndexTemplate {
        version: env!("CARGO_PKG_VERSION"),
        shopify_configured: config.shopify_configured(),
        openai_configured: config.openai_configured(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_services() {
        let template = IndexTemplate {
            version: "0.0.0",
            shopify_configured: false,
            openai_configured: true,
        };
        assert_eq!(template.missing_services(), vec!["Shopify"]);
    }

    #[test]
    fn test_render_shows_banner_only_when_unconfigured() {
        let unconfigured = IndexTemplate {
            version: "0.0.0",
            shopify_configured: false,
            openai_configured: false,
        }
        .render()
        .unwrap();
        assert!(unconfigured.contains("Not configured: Shopify, OpenAI"));
        assert!(unconfigured.contains("/static/app.js"));

        let configured = IndexTemplate {
            version: "0.0.0",
            shopify_configured: true,
            openai_configured: true,
        }
        .render()
        .unwrap();
        assert!(!configured.contains("Not configured"));
    }
}
