//! GraphQL documents sent to the Admin API.

/// Admin API ceiling on the requested cost of a single query.
pub const MAX_QUERY_COST: u32 = 1000;

/// Largest `first` the Admin API accepts on a connection.
pub const MAX_CONNECTION_PAGE: u32 = 250;

/// Products carry at most three options.
const OPTIONS_PER_PRODUCT: u32 = 3;

/// Product object plus `options(first: 3)`.
const PRODUCT_NODE_COST: u32 = 1 + connection_cost(OPTIONS_PER_PRODUCT, 1);
/// Variant object plus `media(first: 1)`.
const VARIANT_NODE_COST: u32 = 1 + connection_cost(1, 1);
/// Media object plus its `image`.
const MEDIA_NODE_COST: u32 = 1 + 1;

/// Requested cost of a connection: 2, plus `first` times the cost of one
/// node. Objects cost 1 and scalars are free.
#[must_use]
pub const fn connection_cost(first: u32, node_cost: u32) -> u32 {
    2 + first * node_cost
}

/// Largest `first` that keeps `fixed + connection_cost(first, node_cost)`
/// within [`MAX_QUERY_COST`].
const fn largest_page(fixed: u32, node_cost: u32) -> u32 {
    let fits = (MAX_QUERY_COST - fixed - 2) / node_cost;
    if fits < MAX_CONNECTION_PAGE {
        fits
    } else {
        MAX_CONNECTION_PAGE
    }
}

#[must_use]
pub const fn tagged_products_cost(first: u32) -> u32 {
    connection_cost(first, PRODUCT_NODE_COST)
}

#[must_use]
pub const fn product_variants_cost(first: u32) -> u32 {
    1 + connection_cost(first, VARIANT_NODE_COST)
}

#[must_use]
pub const fn product_media_cost(first: u32) -> u32 {
    1 + connection_cost(first, MEDIA_NODE_COST)
}

/// Upper bound applied to the configured product page size.
pub const PRODUCTS_PAGE_LIMIT: u32 = largest_page(0, PRODUCT_NODE_COST);
pub const VARIANTS_PAGE_SIZE: u32 = largest_page(1, VARIANT_NODE_COST);
pub const MEDIA_PAGE_SIZE: u32 = largest_page(1, MEDIA_NODE_COST);

/// One page of products matching a search query. Variants and media are
/// read per product with [`PRODUCT_VARIANTS`] and [`PRODUCT_MEDIA`], since
/// nesting them here would exceed the query cost limit.
pub const TAGGED_PRODUCTS: &str = r"
query TaggedProducts($first: Int!, $after: String, $query: String!) {
  products(first: $first, after: $after, query: $query) {
    pageInfo { hasNextPage endCursor }
    nodes {
      id
      title
      handle
      options(first: 3) { id name position values }
    }
  }
}
";

pub const PRODUCT_VARIANTS: &str = r"
query ProductVariants($id: ID!, $first: Int!, $after: String) {
  product(id: $id) {
    variants(first: $first, after: $after) {
      pageInfo { hasNextPage endCursor }
      nodes {
        id
        title
        inventoryQuantity
        media(first: 1) { nodes { id } }
      }
    }
  }
}
";

pub const PRODUCT_MEDIA: &str = r"
query ProductMedia($id: ID!, $first: Int!, $after: String) {
  product(id: $id) {
    media(first: $first, after: $after) {
      pageInfo { hasNextPage endCursor }
      nodes {
        id
        ... on MediaImage { image { url } }
      }
    }
  }
}
";

pub const REORDER_OPTIONS: &str = r"
mutation ReorderOptions($productId: ID!, $options: [OptionReorderInput!]!) {
  productOptionsReorder(productId: $productId, options: $options) {
    product { id }
    userErrors { field message }
  }
}
";

pub const REORDER_VARIANTS: &str = r"
mutation ReorderVariants($productId: ID!, $positions: [ProductVariantPositionInput!]!) {
  productVariantsBulkReorder(productId: $productId, positions: $positions) {
    product { id }
    userErrors { field message }
  }
}
";

pub const REORDER_MEDIA: &str = r"
mutation ReorderMedia($id: ID!, $moves: [MoveInput!]!) {
  productReorderMedia(id: $id, moves: $moves) {
    job { id }
    mediaUserErrors { field message }
  }
}
";

/// Builds the product search string selecting products that carry `tag`.
///
/// Quotes and backslashes in the tag are escaped for the search syntax.
#[must_use]
pub fn tag_filter(tag: &str) -> String {
    let escaped = tag.trim().replace('\\', "\\\\").replace('\'', "\\'");
    format!("tag:'{escaped}'")
}
