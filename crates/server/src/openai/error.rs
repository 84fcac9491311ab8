//! Error types for the `OpenAI` API client.

use thiserror::Error;

/// Errors that can occur when generating a description.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `OpenAI` returned a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API, or the status reason phrase.
        message: String,
    },

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The completion carried no text.
    #[error("OpenAI returned an empty completion")]
    EmptyCompletion,

    /// Client could not be constructed from the configuration.
    #[error("OpenAI client configuration error: {0}")]
    Config(String),
}

/// Error body returned by the `OpenAI` API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_message_only() {
        let err = GenerationError::Api {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        };
        assert_eq!(err.to_string(), "Incorrect API key provided");
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "message": "Rate limit reached for gpt-4",
                "type": "requests",
                "param": null,
                "code": "rate_limit_exceeded"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.message, "Rate limit reached for gpt-4");
    }
}
