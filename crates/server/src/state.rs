//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::openai::{GenerationClient, GenerationError};
use crate::shopify::{CatalogClient, CatalogError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Application state shared across all handlers.
///
/// Read-only after startup and cheaply cloneable via `Arc`. Requests share
/// nothing mutable.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    catalog: Option<CatalogClient>,
    generator: Option<GenerationClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Clients are only built for services that have credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured client cannot be constructed.
    pub fn new(config: ServerConfig) -> Result<Self, StateError> {
        let catalog = config.shopify.as_ref().map(CatalogClient::new).transpose()?;
        let generator = config
            .openai
            .as_ref()
            .map(GenerationClient::new)
            .transpose()?;

        if let Some(catalog) = &catalog {
            tracing::info!(store = catalog.store(), "Catalog enabled");
        }
        if let Some(generator) = &generator {
            tracing::info!(model = generator.model(), "Generation enabled");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                generator,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the Shopify client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotConfigured` when Shopify credentials are missing.
    pub fn catalog(&self) -> Result<&CatalogClient, AppError> {
        self.inner
            .catalog
            .as_ref()
            .ok_or(AppError::NotConfigured("Shopify"))
    }

    /// Get the `OpenAI` client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotConfigured` when the API key is missing.
    pub fn generator(&self) -> Result<&GenerationClient, AppError> {
        self.inner
            .generator
            .as_ref()
            .ok_or(AppError::NotConfigured("OpenAI"))
    }
}
