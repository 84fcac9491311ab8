//! End-to-end test harness for Copydesk.
//!
//! Every test gets its own Copydesk server on an ephemeral port, wired to
//! in-process stand-ins for the Shopify Admin REST API and the `OpenAI`
//! chat completions API. Nothing leaves the machine.
//!
//! ```rust,ignore
//! let app = TestApp::builder().with_shopify().with_openai().spawn().await;
//! let products: Vec<Product> = app.get("/api/products").await.json().await?;
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use copydesk_server::{AppState, ServerConfig};
use serde_json::{Value, json};

/// Access token the stand-in store accepts.
pub const SHOPIFY_TOKEN: &str = "shpat_4c9f2a7e1b3d8f60";

/// Admin API version the stand-in store serves.
pub const SHOPIFY_API_VERSION: &str = "2024-01";

/// Any user message containing this text makes the stand-in model fail.
pub const FAIL_MARKER: &str = "[fail]";

/// Message the stand-in model fails with.
pub const MODEL_FAILURE: &str = "Rate limit reached for requests";

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

// ============================================================================
// Stand-in Shopify store
// ============================================================================

/// Two catalog products, including fields Copydesk does not model.
#[must_use]
pub fn sample_products() -> Value {
    json!({
        "products": [
            {
                "id": 632_910_392,
                "title": "Linen Shirt",
                "body_html": "<p>A shirt.</p>",
                "vendor": "Copydesk Apparel",
                "handle": "linen-shirt",
                "tags": "summer, linen",
                "variants": [{"id": 808_950_810, "price": "49.00"}],
                "image": {"id": 850_703_190, "src": "https://cdn.example.com/shirt.jpg", "width": 800}
            },
            {
                "id": 921_728_736,
                "title": "Stoneware Mug",
                "vendor": "Copydesk Home",
                "handle": "stoneware-mug"
            }
        ]
    })
}

/// Recorded state of the stand-in store.
#[derive(Clone, Default)]
pub struct ShopifyStub {
    fail_updates: Arc<Mutex<bool>>,
    updates: Arc<Mutex<Vec<(u64, String)>>>,
}

impl ShopifyStub {
    /// Make every product update answer 500.
    pub fn fail_updates(&self) {
        *self.fail_updates.lock().unwrap() = true;
    }

    /// `(id, body_html)` of every accepted update, in arrival order.
    #[must_use]
    pub fn updates(&self) -> Vec<(u64, String)> {
        self.updates.lock().unwrap().clone()
    }

    fn router(&self) -> Router {
        let base = format!("/admin/api/{SHOPIFY_API_VERSION}");
        Router::new()
            .route(&format!("{base}/products.json"), get(shopify_products))
            .route(&format!("{base}/products/{{file}}"), put(shopify_update))
            .with_state(self.clone())
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("X-Shopify-Access-Token")
        .is_some_and(|v| v == SHOPIFY_TOKEN)
}

async fn shopify_products(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"errors": "[API] Invalid API key or access token"})),
        )
            .into_response();
    }
    Json(sample_products()).into_response()
}

async fn shopify_update(
    State(stub): State<ShopifyStub>,
    Path(file): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if *stub.fail_updates.lock().unwrap() {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"errors": "boom"})))
            .into_response();
    }
    let Some(id) = file
        .strip_suffix(".json")
        .and_then(|id| id.parse::<u64>().ok())
    else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let body_html = body["product"]["body_html"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    stub.updates.lock().unwrap().push((id, body_html.clone()));

    Json(json!({
        "product": {
            "id": id,
            "body_html": body_html,
            "updated_at": "2024-01-02T09:00:00-05:00"
        }
    }))
    .into_response()
}

// ============================================================================
// Stand-in OpenAI API
// ============================================================================

/// Recorded state of the stand-in model.
#[derive(Clone, Default)]
pub struct OpenAIStub {
    requests: Arc<Mutex<Vec<Value>>>,
}

impl OpenAIStub {
    /// Bodies of every chat completion request, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(self.clone())
    }
}

/// Answers `<p>Improved: {title}</p>`, or 429 when the prompt carries
/// [`FAIL_MARKER`].
async fn chat_completions(State(stub): State<OpenAIStub>, Json(body): Json<Value>) -> Response {
    stub.requests.lock().unwrap().push(body.clone());

    let prompt = body["messages"][1]["content"].as_str().unwrap_or_default();
    if prompt.contains(FAIL_MARKER) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"message": MODEL_FAILURE, "type": "requests"}})),
        )
            .into_response();
    }

    let title = prompt
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Ürün: "))
        .unwrap_or_default();

    Json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": format!("<p>Improved: {title}</p>")},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 40, "completion_tokens": 12, "total_tokens": 52}
    }))
    .into_response()
}

// ============================================================================
// Copydesk under test
// ============================================================================

/// Which upstream stand-ins the server under test is wired to.
#[derive(Default)]
pub struct TestAppBuilder {
    shopify: bool,
    openai: bool,
    api_base_url: Option<String>,
}

impl TestAppBuilder {
    #[must_use]
    pub const fn with_shopify(mut self) -> Self {
        self.shopify = true;
        self
    }

    #[must_use]
    pub const fn with_openai(mut self) -> Self {
        self.openai = true;
        self
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = Some(url.to_string());
        self
    }

    pub async fn spawn(self) -> TestApp {
        let shopify = ShopifyStub::default();
        let openai = OpenAIStub::default();
        let mut vars: Vec<(&str, String)> = Vec::new();

        if self.shopify {
            let addr = serve(shopify.router()).await;
            vars.push(("SHOPIFY_STORE_URL", format!("http://{addr}")));
            vars.push(("SHOPIFY_ACCESS_TOKEN", SHOPIFY_TOKEN.to_string()));
            vars.push(("SHOPIFY_API_VERSION", SHOPIFY_API_VERSION.to_string()));
        }
        if self.openai {
            let addr = serve(openai.router()).await;
            vars.push(("OPENAI_API_KEY", "sk-9Qx2LmT7vB4nR8wZ".to_string()));
            vars.push(("OPENAI_BASE_URL", format!("http://{addr}/v1")));
        }
        if let Some(url) = self.api_base_url {
            vars.push(("API_BASE_URL", url));
        }

        let config = ServerConfig::from_lookup(|key| {
            vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
        })
        .unwrap();
        let state = AppState::new(config).unwrap();
        let addr = serve(copydesk_server::app(state)).await;

        TestApp {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            shopify,
            openai,
        }
    }
}

/// A running Copydesk server plus its upstream stand-ins.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub shopify: ShopifyStub,
    pub openai: OpenAIStub,
}

impl TestApp {
    #[must_use]
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder::default()
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }
}
