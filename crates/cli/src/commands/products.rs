//! `copydesk products`

use copydesk_core::{Product, Workspace};

use super::{CommandError, emit};
use crate::api::ApiClient;

pub async fn run(client: &ApiClient, search: Option<&str>) -> Result<(), CommandError> {
    let mut workspace = Workspace::new();
    workspace.load_products(client.products().await?);
    workspace.set_query(search.unwrap_or_default());

    let visible = workspace.visible_products();
    for product in &visible {
        emit(row(product));
    }

    tracing::info!(
        query = workspace.query(),
        shown = visible.len(),
        loaded = workspace.products().len(),
        "Products listed"
    );
    Ok(())
}

/// `id<TAB>title<TAB>description state` listing row.
fn row(product: &Product) -> String {
    let state = if product.description().trim().is_empty() {
        "no description"
    } else {
        "has description"
    };
    format!("{}\t{}\t{state}", product.id, product.title)
}

#[cfg(test)]
mod tests {
    use copydesk_core::ProductId;

    use super::*;

    #[test]
    fn test_row() {
        let product = Product::new(ProductId::new(7), "Mug", None);
        assert_eq!(row(&product), "7\tMug\tno description");

        let product = Product::new(ProductId::new(8), "Shirt", Some("<p>Linen</p>".to_string()));
        assert_eq!(row(&product), "8\tShirt\thas description");
    }
}
