//! `copydesk batch (--all [--search <text>] | --ids <id,...>)`

use copydesk_core::{BatchProgress, ImprovementResult, ProductId, Workspace};

use super::{CommandError, emit};
use crate::api::ApiClient;

/// Which products to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every product matching `search` (all products when empty).
    All { search: String },
    /// Exactly these products.
    Ids(Vec<ProductId>),
}

pub async fn run(client: &ApiClient, target: &Target) -> Result<(), CommandError> {
    let mut workspace = Workspace::new();
    workspace.load_products(client.products().await?);
    select(&mut workspace, target);

    if !workspace.can_submit_batch() {
        return Err(CommandError::EmptySelection);
    }

    let items = workspace.batch_items();
    tracing::info!(count = items.len(), "Submitting batch");
    let response = client.improve_bulk(items).await?;

    let mut progress = BatchProgress::new(response.results.len());
    for result in &response.results {
        progress.advance();
        emit(format!(
            "[{}] {}",
            progress.label(),
            describe(workspace.result_title(result), result)
        ));
        if let Some(html) = &result.improved_description {
            emit(html);
        }
    }

    let failed = response.results.iter().filter(|r| !r.success).count();
    tracing::info!(total = progress.total(), failed, "Batch finished");
    Ok(())
}

/// Apply the target to the workspace selection.
fn select(workspace: &mut Workspace, target: &Target) {
    match target {
        Target::All { search } => {
            workspace.set_query(search.as_str());
            let visible: Vec<ProductId> = workspace.visible_products().iter().map(|p| p.id).collect();
            for id in visible {
                workspace.set_selected(id, true);
            }
        }
        Target::Ids(ids) => {
            for &id in ids {
                if workspace.product(id).is_none() {
                    tracing::warn!(product_id = %id, "Skipping unknown product");
                }
                workspace.set_selected(id, true);
            }
        }
    }
}

fn describe(title: Option<&str>, result: &ImprovementResult) -> String {
    let name = title.map_or_else(|| format!("#{}", result.id), str::to_string);
    match (&result.error, result.success) {
        (_, true) => format!("{name}: improved"),
        (Some(error), false) => format!("{name}: failed: {error}"),
        (None, false) => format!("{name}: failed"),
    }
}

#[cfg(test)]
mod tests {
    use copydesk_core::Product;

    use super::*;

    fn workspace() -> Workspace {
        let mut workspace = Workspace::new();
        workspace.load_products(vec![
            Product::new(ProductId::new(1), "Linen Shirt", None),
            Product::new(ProductId::new(2), "Coffee Mug", Some("<p>Stoneware</p>".to_string())),
            Product::new(ProductId::new(3), "Linen Towel", None),
        ]);
        workspace
    }

    fn selected_ids(workspace: &Workspace) -> Vec<u64> {
        workspace.batch_items().iter().map(|i| i.id.as_u64()).collect()
    }

    #[test]
    fn test_select_all_respects_search() {
        let mut ws = workspace();
        select(&mut ws, &Target::All { search: "linen".to_string() });
        assert_eq!(selected_ids(&ws), vec![1, 3]);

        let mut ws = workspace();
        select(&mut ws, &Target::All { search: String::new() });
        assert_eq!(selected_ids(&ws), vec![1, 2, 3]);
    }

    #[test]
    fn test_select_ids_skips_unknown_and_keeps_catalog_order() {
        let mut ws = workspace();
        select(
            &mut ws,
            &Target::Ids(vec![ProductId::new(3), ProductId::new(99), ProductId::new(1)]),
        );
        assert_eq!(selected_ids(&ws), vec![1, 3]);
    }

    #[test]
    fn test_select_with_no_match_leaves_batch_disabled() {
        let mut ws = workspace();
        select(&mut ws, &Target::All { search: "kettle".to_string() });
        assert!(!ws.can_submit_batch());
    }

    #[test]
    fn test_describe() {
        let ok = ImprovementResult::success(ProductId::new(1), "<p>x</p>".to_string());
        assert_eq!(describe(Some("Linen Shirt"), &ok), "Linen Shirt: improved");

        let failed = ImprovementResult::failure(ProductId::new(5), "Rate limit reached".to_string());
        assert_eq!(describe(None, &failed), "#5: failed: Rate limit reached");
    }
}
