//! JSON bodies of the local HTTP API.
//!
//! Field names are camelCase on the wire; the browser script and the CLI
//! both consume these shapes.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// `GET /api/config` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL prefixed to every API path. Empty means same origin.
    #[serde(default)]
    pub api_base_url: String,
}

impl ClientConfig {
    /// Build the full URL for an API endpoint path such as `/api/products`.
    #[must_use]
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.api_base_url.trim_end_matches('/'))
    }
}

/// `GET /api/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub shopify_configured: bool,
    pub openai_configured: bool,
}

impl HealthStatus {
    /// Whether the server is up and both upstream services have credentials.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == "ok" && self.shopify_configured && self.openai_configured
    }
}

/// `POST /api/improve-description` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveRequest {
    #[serde(default)]
    pub current_description: Option<String>,
    pub product_title: String,
}

/// `POST /api/improve-description` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResponse {
    pub improved_description: String,
}

/// One product submitted to `POST /api/improve-bulk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItem {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Product> for BulkItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            description: product.body_html.clone(),
        }
    }
}

/// `POST /api/improve-bulk` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRequest {
    pub products: Vec<BulkItem>,
}

/// Outcome of improving one product's description.
///
/// Exactly one of `improved_description` and `error` is set, matching
/// `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementResult {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improved_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

impl ImprovementResult {
    /// A successful result carrying the generated description.
    #[must_use]
    pub const fn success(id: ProductId, improved_description: String) -> Self {
        Self {
            id,
            improved_description: Some(improved_description),
            error: None,
            success: true,
        }
    }

    /// A failed result carrying the error message.
    #[must_use]
    pub const fn failure(id: ProductId, error: String) -> Self {
        Self {
            id,
            improved_description: None,
            error: Some(error),
            success: false,
        }
    }

    /// Build a result from the outcome of a single generation attempt.
    pub fn from_outcome<E: std::fmt::Display>(id: ProductId, outcome: Result<String, E>) -> Self {
        match outcome {
            Ok(text) => Self::success(id, text),
            Err(e) => Self::failure(id, e.to_string()),
        }
    }
}

/// `POST /api/improve-bulk` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResponse {
    pub results: Vec<ImprovementResult>,
}

/// `PUT /api/products/:id` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDescriptionRequest {
    pub description: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
