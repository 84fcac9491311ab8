//! Shopify Admin API client with access-token authentication.

use std::sync::Arc;

use copydesk_core::ProductId;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::ShopifyConfig;

use super::CatalogError;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    api_base: String,
    store: String,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("api_base", &self.inner.api_base)
            .finish_non_exhaustive()
    }
}

/// `GET /products.json` response wrapper.
///
/// Products stay raw JSON; they are relayed to the browser as received.
#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<serde_json::Value>,
}

/// `PUT /products/{id}.json` request body.
#[derive(Debug, Serialize)]
struct ProductUpdateRequest<'a> {
    product: ProductUpdate<'a>,
}

#[derive(Debug, Serialize)]
struct ProductUpdate<'a> {
    id: ProductId,
    body_html: &'a str,
}

impl CatalogClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Config` if the access token is not a valid
    /// header value or the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut token = HeaderValue::from_str(config.access_token.expose_secret())
            .map_err(|_| CatalogError::Config("access token is not a valid header value".into()))?;
        token.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, token);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                api_base: config.admin_api_base(),
                store: config.store_host().to_string(),
            }),
        })
    }

    /// Get the store host.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    /// List the store's products as Shopify returns them.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Status` on a non-success response, `Http` on a
    /// transport failure, `Parse` if the body is not a product list.
    #[instrument(skip(self), fields(store = %self.inner.store))]
    pub async fn list_products(&self) -> Result<Vec<serde_json::Value>, CatalogError> {
        let url = format!("{}/products.json", self.inner.api_base);
        let response = self.inner.client.get(&url).send().await?;
        let response = check_status(response)?;

        let body = response.text().await?;
        let parsed: ProductsResponse =
            serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))?;

        tracing::debug!(count = parsed.products.len(), "Fetched products");
        Ok(parsed.products)
    }

    /// Replace a product's description HTML.
    ///
    /// Returns Shopify's response body untouched.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::list_products`].
    #[instrument(skip(self, body_html), fields(store = %self.inner.store, html_len = body_html.len()))]
    pub async fn update_description(
        &self,
        id: ProductId,
        body_html: &str,
    ) -> Result<serde_json::Value, CatalogError> {
        let url = format!("{}/products/{id}.json", self.inner.api_base);
        let request = ProductUpdateRequest {
            product: ProductUpdate { id, body_html },
        };

        let response = self.inner.client.put(&url).json(&request).send().await?;
        let response = check_status(response)?;

        let body = response.text().await?;
        let value = serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))?;

        tracing::info!("Product description updated");
        Ok(value)
    }
}

/// Turn a non-success response into `CatalogError::Status`.
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!(status = status.as_u16(), "Shopify request failed");
        Err(CatalogError::from_status(status))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    #[test]
    fn test_update_body_shape() {
        let request = ProductUpdateRequest {
            product: ProductUpdate {
                id: ProductId::new(42),
                body_html: "<p>new</p>",
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"product": {"id": 42, "body_html": "<p>new</p>"}})
        );
    }

    #[test]
    fn test_products_kept_as_received() {
        let body = r#"{"products":[
            {"id":5,"title":"Gift card","vendor":"X"},
            {"id":6,"title":null,"image":{"alt":"no src"}}
        ]}"#;
        let parsed: ProductsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            serde_json::Value::Array(parsed.products),
            serde_json::json!([
                {"id": 5, "title": "Gift card", "vendor": "X"},
                {"id": 6, "title": null, "image": {"alt": "no src"}}
            ])
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let config = ShopifyConfig {
            store_url: Url::parse("https://demo.myshopify.com").unwrap(),
            api_version: "2024-01".to_string(),
            access_token: SecretString::from("shpat_top_secret"),
        };
        let client = CatalogClient::new(&config).unwrap();
        assert_eq!(client.store(), "demo.myshopify.com");

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("https://demo.myshopify.com/admin/api/2024-01"));
        assert!(!debug_output.contains("shpat_top_secret"));
    }
}
