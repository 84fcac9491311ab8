//! JSON API handlers.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use copydesk_core::{
    BulkRequest, BulkResponse, ClientConfig, HealthStatus, ImproveRequest, ImproveResponse,
    ImprovementResult, ProductId, UpdateDescriptionRequest,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// Build the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/config", get(config))
        .route("/api/health", get(health))
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", put(update_product))
        .route("/api/improve-description", post(improve_description))
        .route("/api/improve-bulk", post(improve_bulk))
}

/// Runtime configuration for the browser.
#[instrument(skip(state))]
pub async fn config(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(ClientConfig {
        api_base_url: state.config().api_base_url.clone(),
    })
}

/// Report which upstream services have credentials.
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let config = state.config();
    Json(HealthStatus {
        status: "ok".to_string(),
        shopify_configured: config.shopify_configured(),
        openai_configured: config.openai_configured(),
    })
}

/// List catalog products exactly as Shopify returns them.
///
/// # Errors
///
/// Fails when Shopify is unconfigured or the catalog call fails.
#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<serde_json::Value>>> {
    let products = state.catalog()?.list_products().await?;
    Ok(Json(products))
}

/// Replace one product's description and relay Shopify's response.
///
/// # Errors
///
/// Fails on a non-numeric ID, a malformed body, missing Shopify
/// configuration, or a failed catalog call.
#[instrument(skip(state, body))]
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<UpdateDescriptionRequest>,
) -> Result<Json<serde_json::Value>> {
    let id: ProductId = id
        .parse()
        .map_err(|e: copydesk_core::ParseProductIdError| AppError::BadRequest(e.to_string()))?;

    let response = state
        .catalog()?
        .update_description(id, &body.description)
        .await?;
    Ok(Json(response))
}

/// Rewrite a single description.
///
/// # Errors
///
/// Fails on a malformed body, missing `OpenAI` configuration, or a failed
/// generation call.
#[instrument(skip(state, body), fields(title = %body.product_title))]
pub async fn improve_description(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ImproveRequest>,
) -> Result<Json<ImproveResponse>> {
    let improved_description = state
        .generator()?
        .improve_one(&body.product_title, body.current_description.as_deref())
        .await?;
    Ok(Json(ImproveResponse {
        improved_description,
    }))
}

/// Rewrite a batch of descriptions sequentially.
///
/// Per-item failures are reported in the results, never as a request
/// failure. Without `OpenAI` credentials every item fails the same way.
///
/// # Errors
///
/// Fails only on a malformed body.
#[instrument(skip(state, body), fields(count = body.products.len()))]
pub async fn improve_bulk(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BulkRequest>,
) -> Result<Json<BulkResponse>> {
    let results = match state.generator() {
        Ok(generator) => generator.improve_batch(&body.products).await,
        Err(e) => body
            .products
            .iter()
            .map(|item| ImprovementResult::failure(item.id, e.to_string()))
            .collect(),
    };
    Ok(Json(BulkResponse { results }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header::CONTENT_TYPE},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::ServerConfig;

    fn state(vars: &[(&str, &str)]) -> AppState {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let config = ServerConfig::from_lookup(|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap();
        AppState::new(config).unwrap()
    }

    async fn send(
        state: AppState,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        let request = request
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = router().with_state(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_unconfigured() {
        let (status, body) = send(state(&[]), Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"status": "ok", "shopifyConfigured": false, "openaiConfigured": false})
        );
    }

    #[tokio::test]
    async fn test_health_flags_follow_credentials() {
        let state = state(&[
            ("SHOPIFY_STORE_URL", "demo.myshopify.com"),
            ("OPENAI_API_KEY", "sk-4fJ9qLm2Xw7Rt0Zb"),
        ]);
        let (_, body) = send(state, Method::GET, "/api/health", None).await;
        assert_eq!(body["shopifyConfigured"], false);
        assert_eq!(body["openaiConfigured"], true);
    }

    #[tokio::test]
    async fn test_config_returns_api_base_url() {
        let state = state(&[("API_BASE_URL", "https://copy.example.com")]);
        let (status, body) = send(state, Method::GET, "/api/config", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"apiBaseUrl": "https://copy.example.com"}));
    }

    #[tokio::test]
    async fn test_products_without_shopify() {
        let (status, body) = send(state(&[]), Method::GET, "/api/products", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Shopify is not configured");
    }

    #[tokio::test]
    async fn test_improve_rejects_malformed_body() {
        let (status, body) = send(
            state(&[]),
            Method::POST,
            "/api/improve-description",
            Some("{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_update_rejects_non_numeric_id() {
        let state = state(&[
            ("SHOPIFY_STORE_URL", "demo.myshopify.com"),
            ("SHOPIFY_ACCESS_TOKEN", "shpat_9fK2mQ7xLp4Zr8Tv"),
        ]);
        let (status, body) = send(
            state,
            Method::PUT,
            "/api/products/abc",
            Some(r#"{"description":"<p>x</p>"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid product id: \"abc\"");
    }

    #[tokio::test]
    async fn test_bulk_without_openai_fails_every_item() {
        let (status, body) = send(
            state(&[]),
            Method::POST,
            "/api/improve-bulk",
            Some(r#"{"products":[{"id":1,"title":"A"},{"id":"2","title":"B","description":"<p>b</p>"}]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"results": [
                {"id": 1, "error": "OpenAI is not configured", "success": false},
                {"id": 2, "error": "OpenAI is not configured", "success": false}
            ]})
        );
    }

    #[tokio::test]
    async fn test_bulk_with_missing_products_field() {
        let (status, body) = send(state(&[]), Method::POST, "/api/improve-bulk", Some("{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("products"));
    }
}
