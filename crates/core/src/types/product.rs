//! Catalog product record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// A product as returned by the Shopify Admin REST API.
///
/// Only the fields Copydesk reads are typed. Everything else the catalog
/// sends is kept in `extra`. Missing or `null` typed fields fall back to
/// their defaults so one odd product does not spoil a whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Description HTML. Shopify sends `null` for products without one.
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub image: Option<ProductImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Featured image of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub src: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with only the typed fields set.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, body_html: Option<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body_html,
            image: None,
            extra: Map::new(),
        }
    }

    /// Description HTML, or an empty string when the product has none.
    #[must_use]
    pub fn description(&self) -> &str {
        self.body_html.as_deref().unwrap_or_default()
    }

    /// URL of the featured image, if any.
    #[must_use]
    pub fn image_src(&self) -> Option<&str> {
        self.image
            .as_ref()
            .map(|img| img.src.as_str())
            .filter(|src| !src.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SHOPIFY_PRODUCT: &str = r#"{
        "id": 632910392,
        "title": "IPod Nano - 8GB",
        "body_html": "<p>It's the small iPod with one very big idea.</p>",
        "vendor": "Apple",
        "product_type": "Cult Products",
        "handle": "ipod-nano",
        "tags": "Emotive, Flash Memory",
        "image": {"id": 850703190, "src": "https://cdn.shopify.com/ipod-nano.png"}
    }"#;

    #[test]
    fn test_untyped_fields_survive_round_trip() {
        let product: Product = serde_json::from_str(SHOPIFY_PRODUCT).unwrap();
        assert_eq!(product.id, ProductId::new(632_910_392));
        assert_eq!(product.image_src(), Some("https://cdn.shopify.com/ipod-nano.png"));

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["vendor"], "Apple");
        assert_eq!(value["handle"], "ipod-nano");
        assert_eq!(value["image"]["id"], 850_703_190);
    }

    #[test]
    fn test_null_description() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "title": "Plain", "body_html": null}"#).unwrap();
        assert_eq!(product.body_html, None);
        assert_eq!(product.description(), "");
        assert_eq!(product.image_src(), None);
    }

    #[test]
    fn test_null_title_and_image_without_src() {
        let product: Product =
            serde_json::from_str(r#"{"id": 6, "title": null, "image": {"alt": "Mug"}}"#).unwrap();
        assert_eq!(product.title, "");
        assert_eq!(product.image_src(), None);
        assert_eq!(product.image.unwrap().extra["alt"], "Mug");
    }
}
