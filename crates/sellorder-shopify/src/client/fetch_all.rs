//! Paginated catalog reads for `ShopifyClient`.
//!
//! A product's variants and media are read with their own queries after the
//! products page, so each request stays under the Admin API cost limit and
//! no connection is cut off at a nested page size.

use std::future::Future;

use sellorder_core::Product;
use serde::Serialize;

use crate::error::ShopifyError;
use crate::normalize::normalize_product;
use crate::pacer::Pacer;
use crate::pagination::next_cursor;
use crate::queries::{
    tag_filter, MEDIA_PAGE_SIZE, PRODUCTS_PAGE_LIMIT, PRODUCT_MEDIA, PRODUCT_VARIANTS,
    TAGGED_PRODUCTS, VARIANTS_PAGE_SIZE,
};
use crate::types::{
    Connection, MediaNode, ProductMediaData, ProductNode, ProductVariantsData, ProductsData,
    VariantNode,
};

use super::ShopifyClient;
use super::MAX_PAGES;

/// One page of a connection plus the cursor for the next page.
#[derive(Debug)]
pub struct Page<T> {
    pub nodes: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> From<Connection<T>> for Page<T> {
    fn from(connection: Connection<T>) -> Self {
        Self {
            next_cursor: connection.page_info.as_ref().and_then(next_cursor),
            nodes: connection.nodes,
        }
    }
}

#[derive(Serialize)]
struct ProductsVariables<'a> {
    first: u32,
    after: Option<&'a str>,
    query: String,
}

#[derive(Serialize)]
struct ProductConnectionVariables<'a> {
    id: &'a str,
    first: u32,
    after: Option<&'a str>,
}

impl ShopifyClient {
    /// Fetches one page of products carrying `tag`, without variants or
    /// media.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the request, and returns
    /// [`ShopifyError::GraphQl`] if the query itself is rejected.
    pub async fn fetch_products_page(
        &self,
        tag: &str,
        first: u32,
        after: Option<&str>,
    ) -> Result<Page<ProductNode>, ShopifyError> {
        let context = format!("products page (tag={tag}, after={})", after.unwrap_or("start"));
        let response = self
            .execute::<_, ProductsData>(
                TAGGED_PRODUCTS,
                ProductsVariables {
                    first,
                    after,
                    query: tag_filter(tag),
                },
                &context,
            )
            .await?;
        Ok(Self::into_data(response, &context)?.products.into())
    }

    async fn fetch_variants_page(
        &self,
        product_id: &str,
        after: Option<&str>,
    ) -> Result<Page<VariantNode>, ShopifyError> {
        let context = format!("variants of {product_id} (after={})", after.unwrap_or("start"));
        let response = self
            .execute::<_, ProductVariantsData>(
                PRODUCT_VARIANTS,
                ProductConnectionVariables {
                    id: product_id,
                    first: VARIANTS_PAGE_SIZE,
                    after,
                },
                &context,
            )
            .await?;
        let product = Self::into_data(response, &context)?
            .product
            .ok_or(ShopifyError::MissingData { context })?;
        Ok(product.variants.into())
    }

    async fn fetch_media_page(
        &self,
        product_id: &str,
        after: Option<&str>,
    ) -> Result<Page<MediaNode>, ShopifyError> {
        let context = format!("media of {product_id} (after={})", after.unwrap_or("start"));
        let response = self
            .execute::<_, ProductMediaData>(
                PRODUCT_MEDIA,
                ProductConnectionVariables {
                    id: product_id,
                    first: MEDIA_PAGE_SIZE,
                    after,
                },
                &context,
            )
            .await?;
        let product = Self::into_data(response, &context)?
            .product
            .ok_or(ShopifyError::MissingData { context })?;
        Ok(product.media.into())
    }

    /// Fetches every product carrying `tag`, with all of its variants and
    /// media.
    ///
    /// `pacer` runs after every page read, products and per-product
    /// connections alike, to stay under the API rate limit. `page_size` is
    /// capped at [`PRODUCTS_PAGE_LIMIT`] to keep the products query within
    /// the cost limit.
    ///
    /// **All-or-nothing semantics**: on any page failure, already-fetched
    /// products are discarded and the error is returned, so a run never
    /// reorders a silently partial catalog.
    ///
    /// # Errors
    ///
    /// Propagates any error from the page reads.
    /// Returns [`ShopifyError::MissingData`] if a product disappears between
    /// the products page and its variant or media read, and
    /// [`ShopifyError::PaginationLimit`] if any connection runs past
    /// [`MAX_PAGES`].
    pub async fn fetch_tagged_products(
        &self,
        tag: &str,
        page_size: u32,
        pacer: &Pacer,
    ) -> Result<Vec<Product>, ShopifyError> {
        let first = page_size.clamp(1, PRODUCTS_PAGE_LIMIT);
        if first != page_size {
            tracing::debug!(
                requested = page_size,
                first,
                "products page size capped to stay within the query cost limit"
            );
        }

        let headers = collect_pages("products", pacer, move |after| async move {
            self.fetch_products_page(tag, first, after.as_deref()).await
        })
        .await?;
        tracing::info!(tag, products = headers.len(), "fetched tagged products");

        let mut products = Vec::with_capacity(headers.len());
        for node in headers {
            let product_id = node.id.as_str();
            let variants = collect_pages("variants", pacer, move |after| async move {
                self.fetch_variants_page(product_id, after.as_deref()).await
            })
            .await?;
            let media = collect_pages("media", pacer, move |after| async move {
                self.fetch_media_page(product_id, after.as_deref()).await
            })
            .await?;
            tracing::debug!(
                product_id,
                variants = variants.len(),
                media = media.len(),
                "fetched product details"
            );
            products.push(normalize_product(node, variants, media));
        }

        Ok(products)
    }
}

/// Reads a cursor-paginated connection to the end, pacing after every page.
async fn collect_pages<T, F, Fut>(
    connection: &'static str,
    pacer: &Pacer,
    mut fetch_page: F,
) -> Result<Vec<T>, ShopifyError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ShopifyError>>,
{
    let mut nodes = Vec::new();
    let mut cursor: Option<String> = None;

    for page_number in 1..=MAX_PAGES {
        let page = fetch_page(cursor.take()).await?;
        tracing::debug!(
            connection,
            page = page_number,
            nodes = page.nodes.len(),
            has_next = page.next_cursor.is_some(),
            "fetched page"
        );
        nodes.extend(page.nodes);

        pacer.pace().await;

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => return Ok(nodes),
        }
    }

    Err(ShopifyError::PaginationLimit {
        max_pages: MAX_PAGES,
    })
}
