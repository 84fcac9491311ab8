//! Unified error handling with Sentry integration.
//!
//! Every API handler returns `Result<T, AppError>`. Errors are rendered as
//! `{"error": "<message>"}` so the browser can show the message as-is.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use copydesk_core::ErrorBody;
use thiserror::Error;

use crate::openai::GenerationError;
use crate::shopify::CatalogError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// `OpenAI` API operation failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The upstream service needed for this request has no credentials.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Malformed request from the client.
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(_) | Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() && !matches!(self, Self::NotConfigured(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_catalog_error_renders_status_text() {
        let err = AppError::from(CatalogError::from_status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        ));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({"error": "Shopify API Error: Internal Server Error"})
        );
    }

    #[tokio::test]
    async fn test_generation_error_renders_api_message() {
        let err = AppError::from(GenerationError::Api {
            status: 429,
            message: "Rate limit reached".to_string(),
        });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Rate limit reached");
    }

    #[tokio::test]
    async fn test_not_configured() {
        let (status, body) = render(AppError::NotConfigured("Shopify")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Shopify is not configured");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotConfigured("OpenAI").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
