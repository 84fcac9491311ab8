//! Description rewrites through the Copydesk API.

#![allow(clippy::unwrap_used)]

use copydesk_core::{BulkResponse, ImproveResponse, ProductId};
use copydesk_integration_tests::{FAIL_MARKER, MODEL_FAILURE, TestApp};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn improve_returns_generated_html() {
    let app = TestApp::builder().with_openai().spawn().await;

    let response = app
        .post_json(
            "/api/improve-description",
            &json!({"currentDescription": "<p>A shirt.</p>", "productTitle": "Linen Shirt"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: ImproveResponse = response.json().await.unwrap();
    assert_eq!(body.improved_description, "<p>Improved: Linen Shirt</p>");
}

#[tokio::test]
async fn improve_sends_fixed_prompt_and_sampling() {
    let app = TestApp::builder().with_openai().spawn().await;

    app.post_json(
        "/api/improve-description",
        &json!({"currentDescription": null, "productTitle": "Stoneware Mug"}),
    )
    .await;

    let requests = app.openai.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request["model"], "gpt-4");
    assert_eq!(request["max_tokens"], 800);
    assert!((request["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert_eq!(request["messages"][0]["role"], "system");
    assert!(
        request["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("Türkçe yaz.")
    );
    assert_eq!(request["messages"][1]["role"], "user");
    assert!(
        request["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("Mevcut Açıklama: Açıklama yok")
    );
}

#[tokio::test]
async fn improve_failure_surfaces_model_message() {
    let app = TestApp::builder().with_openai().spawn().await;

    let response = app
        .post_json(
            "/api/improve-description",
            &json!({"productTitle": format!("Mug {FAIL_MARKER}")}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": MODEL_FAILURE}));
}

#[tokio::test]
async fn improve_without_key_is_503() {
    let app = TestApp::builder().spawn().await;

    let response = app
        .post_json("/api/improve-description", &json!({"productTitle": "Mug"}))
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "OpenAI is not configured");
}

#[tokio::test]
async fn bulk_isolates_failures_and_keeps_order() {
    let app = TestApp::builder().with_openai().spawn().await;

    let response = app
        .post_json(
            "/api/improve-bulk",
            &json!({"products": [
                {"id": 1, "title": "Linen Shirt", "description": "<p>A shirt.</p>"},
                {"id": "2", "title": format!("Mug {FAIL_MARKER}"), "description": null},
                {"id": 3, "title": "Towel"}
            ]}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: BulkResponse = response.json().await.unwrap();

    let ids: Vec<ProductId> = body.results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2), ProductId::new(3)]);

    let first = &body.results[0];
    assert!(first.success);
    assert_eq!(
        first.improved_description.as_deref(),
        Some("<p>Improved: Linen Shirt</p>")
    );
    assert_eq!(first.error, None);

    let second = &body.results[1];
    assert!(!second.success);
    assert_eq!(second.improved_description, None);
    assert_eq!(second.error.as_deref(), Some(MODEL_FAILURE));

    assert!(body.results[2].success);

    // Every item is attempted, including the ones after a failure
    assert_eq!(app.openai.requests().len(), 3);
}

#[tokio::test]
async fn bulk_with_empty_list_returns_no_results() {
    let app = TestApp::builder().with_openai().spawn().await;

    let response = app
        .post_json("/api/improve-bulk", &json!({"products": []}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"results": []}));
    assert!(app.openai.requests().is_empty());
}
