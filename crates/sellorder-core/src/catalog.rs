//! Catalog entities as the reconciler sees them.
//!
//! These are transport-neutral: the Shopify crate converts its GraphQL wire
//! shapes into these before anything is ranked. Ids are kept as opaque
//! strings (Shopify GIDs such as `gid://shopify/ProductVariant/123`).

use serde::{Deserialize, Serialize};

/// A product with everything needed to reorder its three facets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Display title; this is the key used to join against the sales export.
    pub title: String,
    pub handle: String,
    /// Full image pool in the order the catalog returned it.
    pub images: Vec<Image>,
    pub options: Vec<ProductOption>,
    pub variants: Vec<Variant>,
}

/// A single product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub src: String,
}

/// A product option such as `Color` or `Size`, with its values in current
/// display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    /// 1-based position among the product's options.
    pub position: u32,
    pub values: Vec<String>,
}

/// A purchasable variant. The title is expected to follow the
/// `"<Color> / <Size>"` or bare-color convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub title: String,
    pub inventory_quantity: i64,
    /// The variant's image, if one is attached. At most one per variant.
    pub image_id: Option<String>,
}

impl Product {
    /// Returns `true` when the catalog returned enough to reorder anything.
    #[must_use]
    pub fn has_catalog_data(&self) -> bool {
        !self.options.is_empty() && !self.variants.is_empty()
    }
}
