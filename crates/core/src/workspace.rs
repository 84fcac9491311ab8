//! Client-side state container.
//!
//! A `Workspace` holds everything an operator session keeps in memory: the
//! loaded product list, the search query, the product open in the editor
//! with its generated draft, the batch selection, and nothing else. All
//! mutation goes through methods on `Workspace`; rendering code only reads.
//!
//! The browser script keeps the same state in a single object with the same
//! entry points. The CLI uses this type directly.

use std::collections::BTreeSet;

use crate::types::{BulkItem, ImprovementResult, Product, ProductId};

/// Why a save was refused before any request was sent.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveRejected {
    #[error("no product is open in the editor")]
    NoProductOpen,
    #[error("no generated description to save")]
    NoDraft,
    #[error("description cannot be empty")]
    EmptyDescription,
}

/// Whether `product` matches a search query.
///
/// Case-insensitive substring match against the title or the description.
/// An empty query matches everything.
#[must_use]
pub fn product_matches(product: &Product, query: &str) -> bool {
    let query = query.to_lowercase();
    product.title.to_lowercase().contains(&query)
        || product
            .body_html
            .as_deref()
            .is_some_and(|html| html.to_lowercase().contains(&query))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Editor {
    product_id: ProductId,
    draft: Option<String>,
}

/// In-memory state of one operator session.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    products: Vec<Product>,
    query: String,
    editor: Option<Editor>,
    selection: BTreeSet<ProductId>,
}

impl Workspace {
    /// Create an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Product list
    // =========================================================================

    /// Replace the loaded products.
    ///
    /// Selection entries and the open editor are dropped if their product is
    /// no longer in the list.
    pub fn load_products(&mut self, products: Vec<Product>) {
        self.products = products;
        let known: BTreeSet<ProductId> = self.products.iter().map(|p| p.id).collect();
        self.selection.retain(|id| known.contains(id));
        if self
            .editor
            .as_ref()
            .is_some_and(|editor| !known.contains(&editor.product_id))
        {
            self.editor = None;
        }
    }

    /// All loaded products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Find a loaded product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Set the search query. Filtering happens over the loaded list only.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Products matching the current query, in catalog order.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| product_matches(p, &self.query))
            .collect()
    }

    // =========================================================================
    // Editor
    // =========================================================================

    /// Open a product in the editor, discarding any previous draft.
    ///
    /// Returns `None` (and leaves the editor unchanged) if the product is not
    /// loaded.
    pub fn open(&mut self, id: ProductId) -> Option<&Product> {
        let index = self.products.iter().position(|p| p.id == id)?;
        self.editor = Some(Editor {
            product_id: id,
            draft: None,
        });
        self.products.get(index)
    }

    /// The product currently open in the editor.
    #[must_use]
    pub fn current(&self) -> Option<&Product> {
        let editor = self.editor.as_ref()?;
        self.product(editor.product_id)
    }

    /// Store a generated description as the editor's draft.
    ///
    /// Ignored when no product is open.
    pub fn set_draft(&mut self, html: impl Into<String>) {
        if let Some(editor) = self.editor.as_mut() {
            editor.draft = Some(html.into());
        }
    }

    #[must_use]
    pub fn draft(&self) -> Option<&str> {
        self.editor.as_ref()?.draft.as_deref()
    }

    /// Whether the save action should be offered.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.save_request().is_ok()
    }

    /// The update to send for the open product.
    ///
    /// # Errors
    ///
    /// Returns `SaveRejected` when nothing is open, no draft exists, or the
    /// draft is empty after trimming whitespace. No request must be sent in
    /// those cases.
    pub fn save_request(&self) -> Result<(ProductId, &str), SaveRejected> {
        let editor = self.editor.as_ref().ok_or(SaveRejected::NoProductOpen)?;
        let draft = editor.draft.as_deref().ok_or(SaveRejected::NoDraft)?;
        if draft.trim().is_empty() {
            return Err(SaveRejected::EmptyDescription);
        }
        Ok((editor.product_id, draft))
    }

    /// Record a successful save: the draft becomes the product's description.
    pub fn commit_save(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let Some(draft) = editor.draft.take() else {
            return;
        };
        let id = editor.product_id;
        if let Some(product) = self.products.iter_mut().find(|p| p.id == id) {
            product.body_html = Some(draft);
        }
    }

    // =========================================================================
    // Batch selection
    // =========================================================================

    /// Check or uncheck one product. Unknown IDs are ignored.
    pub fn set_selected(&mut self, id: ProductId, checked: bool) {
        if checked {
            if self.product(id).is_some() {
                self.selection.insert(id);
            }
        } else {
            self.selection.remove(&id);
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.products.iter().map(|p| p.id).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn is_selected(&self, id: ProductId) -> bool {
        self.selection.contains(&id)
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Batch submission is disabled while nothing is selected.
    #[must_use]
    pub fn can_submit_batch(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Items to submit for the selected products, in catalog order.
    #[must_use]
    pub fn batch_items(&self) -> Vec<BulkItem> {
        self.products
            .iter()
            .filter(|p| self.selection.contains(&p.id))
            .map(BulkItem::from)
            .collect()
    }

    /// Title of the product a batch result belongs to.
    #[must_use]
    pub fn result_title(&self, result: &ImprovementResult) -> Option<&str> {
        self.product(result.id).map(|p| p.title.as_str())
    }
}

/// Progress of a batch, rendered as results are walked.
///
/// The bulk endpoint answers once with every result; progress advances as
/// the client walks that array, not per network round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    processed: usize,
    total: usize,
}

impl BatchProgress {
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            processed: 0,
            total,
        }
    }

    /// Count one more result, saturating at the total.
    pub fn advance(&mut self) {
        self.processed = (self.processed + 1).min(self.total);
    }

    #[must_use]
    pub const fn processed(&self) -> usize {
        self.processed
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Completion in percent, 0 to 100.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        #[allow(clippy::cast_precision_loss)] // Batch sizes never approach f64 precision limits
        let ratio = self.processed as f64 / self.total as f64;
        ratio * 100.0
    }

    /// `processed / total` label.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} / {}", self.processed, self.total)
    }
}
