//! `copydesk health`

use super::{CommandError, emit};
use crate::api::ApiClient;

pub async fn run(client: &ApiClient) -> Result<(), CommandError> {
    let health = client.health().await?;

    emit(format!("server:  {} ({})", health.status, client.api_base_url()));
    emit(format!("shopify: {}", flag(health.shopify_configured)));
    emit(format!("openai:  {}", flag(health.openai_configured)));

    if !health.is_ready() {
        tracing::warn!("Configuration incomplete; check the server environment");
    }
    Ok(())
}

const fn flag(configured: bool) -> &'static str {
    if configured { "configured" } else { "not configured" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag() {
        assert_eq!(flag(true), "configured");
        assert_eq!(flag(false), "not configured");
    }
}
