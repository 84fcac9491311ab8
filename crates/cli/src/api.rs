//! HTTP client for the Copydesk JSON API.

use copydesk_core::{
    BulkItem, BulkRequest, BulkResponse, ClientConfig, ErrorBody, HealthStatus, ImproveRequest,
    ImproveResponse, Product, ProductId, UpdateDescriptionRequest,
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors talking to the Copydesk server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or undecodable body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
}

/// Client for one Copydesk server.
///
/// API calls go to the `apiBaseUrl` the server reports, or to the server
/// itself when that is empty or unavailable.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Fetch `/api/config` from `server` and build a client from it.
    ///
    /// A failed config fetch is not fatal; the client falls back to `server`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub async fn connect(server: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        let server = server.trim_end_matches('/').to_string();

        let reported = match http.get(format!("{server}/api/config")).send().await {
            Ok(response) => decode::<ClientConfig>(response).await,
            Err(e) => Err(e.into()),
        };
        let api_base_url = match reported {
            Ok(config) if !config.api_base_url.is_empty() => config.api_base_url,
            Ok(_) => server,
            Err(e) => {
                tracing::warn!("Could not load server config, using {server}: {e}");
                server
            }
        };
        tracing::debug!(%api_base_url, "API base resolved");

        Ok(Self::with_config(http, ClientConfig { api_base_url }))
    }

    fn with_config(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    /// Base URL every API call is made against.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.config.api_base_url
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get("/api/health").await
    }

    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        self.get("/api/products").await
    }

    pub async fn improve(
        &self,
        product_title: &str,
        current_description: Option<&str>,
    ) -> Result<ImproveResponse, ClientError> {
        let body = ImproveRequest {
            current_description: current_description.map(str::to_string),
            product_title: product_title.to_string(),
        };
        self.send(reqwest::Method::POST, "/api/improve-description", &body)
            .await
    }

    pub async fn improve_bulk(&self, products: Vec<BulkItem>) -> Result<BulkResponse, ClientError> {
        self.send(
            reqwest::Method::POST,
            "/api/improve-bulk",
            &BulkRequest { products },
        )
        .await
    }

    /// Returns the raw Shopify response the server relays.
    pub async fn save_description(
        &self,
        id: ProductId,
        description: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let body = UpdateDescriptionRequest {
            description: description.to_string(),
        };
        self.send(reqwest::Method::PUT, &format!("/api/products/{id}"), &body)
            .await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let response = self.http.get(self.config.api_url(endpoint)).send().await?;
        decode(response).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .request(method, self.config.api_url(endpoint))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

/// Decode a success body, or turn an error status into `ClientError::Api`
/// using the server's `{"error": ...}` message when present.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &text),
    })
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| {
            status
                .canonical_reason()
                .map_or_else(|| status.as_str().to_string(), str::to_string)
        },
        |e| e.error,
    )
}
