//! `OpenAI` API client for description rewrites.

use std::sync::Arc;

use copydesk_core::{BulkItem, ImprovementResult};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::OpenAIConfig;

use super::error::{ApiErrorResponse, GenerationError};
use super::prompt;
use super::types::{ChatCompletionRequest, ChatCompletionResponse};

/// `OpenAI` chat completions client.
#[derive(Clone)]
pub struct GenerationClient {
    inner: Arc<GenerationClientInner>,
}

struct GenerationClientInner {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("url", &self.inner.url)
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl GenerationClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Config` if the API key is not a valid header
    /// value or the HTTP client cannot be built.
    pub fn new(config: &OpenAIConfig) -> Result<Self, GenerationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
            .map_err(|_| GenerationError::Config("API key is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GenerationError::Config(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(GenerationClientInner {
                client,
                url: config.chat_completions_url(),
                model: config.model.clone(),
            }),
        })
    }

    /// Model used for completions.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Rewrite one product description.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, or the completion has no text.
    #[instrument(skip(self, current_description), fields(model = %self.inner.model))]
    pub async fn improve_one(
        &self,
        title: &str,
        current_description: Option<&str>,
    ) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest {
            model: self.inner.model.clone(),
            messages: prompt::messages(title, current_description),
            temperature: prompt::TEMPERATURE,
            max_tokens: prompt::MAX_TOKENS,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }

        let body = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Parse(format!("Failed to parse response: {e}")))?;

        if let Some(usage) = completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion received"
            );
        }

        completion
            .first_text()
            .map(str::to_string)
            .ok_or(GenerationError::EmptyCompletion)
    }

    /// Rewrite a batch of descriptions, one after another.
    ///
    /// Each item is attempted regardless of earlier failures. The result list
    /// has the same length and order as `items`.
    #[instrument(skip(self, items), fields(count = items.len(), model = %self.inner.model))]
    pub async fn improve_batch(&self, items: &[BulkItem]) -> Vec<ImprovementResult> {
        let mut results = Vec::with_capacity(items.len());

        for item in items {
            let outcome = self
                .improve_one(&item.title, item.description.as_deref())
                .await;
            if let Err(e) = &outcome {
                tracing::warn!(product_id = %item.id, error = %e, "Description rewrite failed");
            }
            results.push(ImprovementResult::from_outcome(item.id, outcome));
        }

        let failed = results.iter().filter(|r| !r.success).count();
        tracing::info!(failed, "Batch finished");
        results
    }
}

/// Build an error from a non-success response, preferring the API's message.
async fn error_from_response(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> GenerationError {
    let fallback = status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), str::to_string);

    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(fallback),
        Err(_) => fallback,
    };

    GenerationError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    fn config() -> OpenAIConfig {
        OpenAIConfig {
            api_key: SecretString::from("sk-test-key-that-must-not-leak"),
            model: "gpt-4".to_string(),
            base_url: Url::parse("https://api.openai.com/v1").unwrap(),
        }
    }

    #[test]
    fn test_new_client() {
        let client = GenerationClient::new(&config()).unwrap();
        assert_eq!(client.model(), "gpt-4");

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("https://api.openai.com/v1/chat/completions"));
        assert!(!debug_output.contains("sk-test-key-that-must-not-leak"));
    }

    #[test]
    fn test_key_with_newline_is_rejected() {
        let mut config = config();
        config.api_key = SecretString::from("sk-bad\nkey");
        assert!(matches!(
            GenerationClient::new(&config),
            Err(GenerationError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_requests() {
        let client = GenerationClient::new(&config()).unwrap();
        assert!(client.improve_batch(&[]).await.is_empty());
    }
}
