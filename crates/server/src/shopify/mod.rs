//! Shopify Admin REST API client.
//!
//! Only the two calls Copydesk needs: list products and replace one
//! product's description. Responses are relayed as received.
//!
//! # Example
//!
//! ```rust,ignore
//! use copydesk_core::ProductId;
//! use copydesk_server::shopify::CatalogClient;
//!
//! let client = CatalogClient::new(&config.shopify)?;
//!
//! let products = client.list_products().await?;
//! client.update_description(ProductId::new(632_910_392), "<p>New copy</p>").await?;
//! ```

mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Shopify answered with a non-success status.
    #[error("Shopify API Error: {status_text}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Reason phrase of the status.
        status_text: String,
    },

    /// HTTP request failed before a response arrived.
    #[error("Shopify API Error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("Shopify API Error: invalid response body: {0}")]
    Parse(String),

    /// Client could not be constructed from the configuration.
    #[error("Shopify client configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Build a status error from a non-success response status.
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .map_or_else(|| status.as_str().to_string(), str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_uses_reason_phrase() {
        let err = CatalogError::from_status(reqwest::StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Shopify API Error: Unauthorized");
    }

    #[test]
    fn test_status_error_without_reason_phrase() {
        let status = reqwest::StatusCode::from_u16(599).expect("valid status");
        let err = CatalogError::from_status(status);
        assert_eq!(err.to_string(), "Shopify API Error: 599");
    }
}
