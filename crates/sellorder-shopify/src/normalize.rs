//! Conversion from Admin GraphQL nodes to catalog [`Product`]s.

use sellorder_core::{Image, Product, ProductOption, Variant};

use crate::types::{MediaNode, ProductNode, VariantNode};

/// Assembles a catalog product from its header node and its fully read
/// variant and media connections.
///
/// Non-image media are dropped from the image pool.
#[must_use]
pub fn normalize_product(
    node: ProductNode,
    variants: Vec<VariantNode>,
    media: Vec<MediaNode>,
) -> Product {
    let images = media
        .into_iter()
        .filter_map(|media| {
            media.image.map(|image| Image {
                id: media.id,
                src: image.url,
            })
        })
        .collect();

    let options = node
        .options
        .into_iter()
        .map(|option| ProductOption {
            id: option.id,
            name: option.name,
            position: option.position,
            values: option.values,
        })
        .collect();

    let variants = variants
        .into_iter()
        .map(|variant| Variant {
            id: variant.id,
            title: variant.title,
            inventory_quantity: variant.inventory_quantity.unwrap_or(0),
            image_id: variant
                .media
                .and_then(|media| media.nodes.into_iter().next())
                .map(|media| media.id),
        })
        .collect();

    Product {
        id: node.id,
        title: node.title,
        handle: node.handle,
        images,
        options,
        variants,
    }
}
