//! `copydesk improve <id> [--save]`

use copydesk_core::{ProductId, Workspace};

use super::{CommandError, emit};
use crate::api::ApiClient;

pub async fn run(client: &ApiClient, id: ProductId, save: bool) -> Result<(), CommandError> {
    let mut workspace = Workspace::new();
    workspace.load_products(client.products().await?);

    let product = workspace
        .open(id)
        .ok_or(CommandError::UnknownProduct(id))?;
    tracing::info!(product_id = %id, title = %product.title, "Rewriting description");

    let improved = client
        .improve(&product.title, product.body_html.as_deref())
        .await?;
    workspace.set_draft(improved.improved_description);

    if let Some(draft) = workspace.draft() {
        emit(draft);
    }

    if !save {
        return Ok(());
    }

    let (id, description) = workspace.save_request()?;
    client.save_description(id, description).await?;
    workspace.commit_save();
    tracing::info!(product_id = %id, "Saved to Shopify");
    Ok(())
}
