//! Admin GraphQL wire types.
//!
//! Only the fields the reconciler reads are modelled. Ids stay as GID
//! strings (`gid://shopify/Product/123`).
//!
//! ### Media vs images
//! Product images are read through the `media` connection, and
//! `productReorderMedia` takes the same `MediaImage` ids. Variants expose
//! their image through `media(first: 1)`, so variant and pool ids line up.
//! Both connections are read per product, outside the products page.
//! Non-image media (video, 3D) come back without an `image` field.
//!
//! ### `inventoryQuantity`
//! `null` when inventory is not tracked; modelled as `Option<i64>`.

use serde::Deserialize;

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphQlResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQlErrorExtensions>,
}

impl GraphQlError {
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref().and_then(|e| e.code.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// A connection page: `{ pageInfo?, nodes }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Connection<ProductNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductNode {
    pub id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub options: Vec<OptionNode>,
}

/// `product` is `null` when the product was deleted after the products page
/// was read.
#[derive(Debug, Deserialize)]
pub struct ProductVariantsData {
    pub product: Option<ProductVariants>,
}

#[derive(Debug, Deserialize)]
pub struct ProductVariants {
    pub variants: Connection<VariantNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductMediaData {
    pub product: Option<ProductMedia>,
}

#[derive(Debug, Deserialize)]
pub struct ProductMedia {
    pub media: Connection<MediaNode>,
}

#[derive(Debug, Deserialize)]
pub struct MediaNode {
    pub id: String,
    /// Present only on `MediaImage` nodes.
    #[serde(default)]
    pub image: Option<ImageSource>,
}

#[derive(Debug, Deserialize)]
pub struct ImageSource {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct OptionNode {
    pub id: String,
    pub name: String,
    pub position: u32,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub media: Option<Connection<IdNode>>,
}

#[derive(Debug, Deserialize)]
pub struct IdNode {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Payload shared by `productOptionsReorder` and `productVariantsBulkReorder`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMutationPayload {
    #[serde(default)]
    pub product: Option<IdNode>,
    #[serde(default)]
    pub user_errors: Vec<UserErrorNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderOptionsData {
    pub product_options_reorder: Option<ProductMutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderVariantsData {
    pub product_variants_bulk_reorder: Option<ProductMutationPayload>,
}

/// `productReorderMedia` runs as a background job; a returned job stands in
/// for returned product data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderMediaPayload {
    #[serde(default)]
    pub job: Option<IdNode>,
    #[serde(default)]
    pub media_user_errors: Vec<UserErrorNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderMediaData {
    pub product_reorder_media: Option<ReorderMediaPayload>,
}
