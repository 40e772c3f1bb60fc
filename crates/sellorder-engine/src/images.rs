//! Image order derived from the variant ranking.

use std::collections::HashSet;

use sellorder_core::Image;

use crate::variants::RankedVariant;

/// Derives the image order from the variant ranking.
///
/// Variant images come first, in variant rank order; an image shared by
/// several variants takes the slot of the highest-ranked one. The rest of the
/// pool follows in its original order. The result is a permutation of the
/// pool's ids: variant image ids that are not in the pool are ignored.
#[must_use]
pub fn sequence_images(ranked: &[RankedVariant<'_>], pool: &[Image]) -> Vec<String> {
    let in_pool: HashSet<&str> = pool.iter().map(|image| image.id.as_str()).collect();
    let mut emitted: HashSet<&str> = HashSet::with_capacity(pool.len());
    let mut order = Vec::with_capacity(pool.len());

    for entry in ranked {
        let Some(image_id) = entry.variant.image_id.as_deref() else {
            continue;
        };
        if !in_pool.contains(image_id) {
            tracing::debug!(
                variant_id = %entry.variant.id,
                image_id,
                "variant image not in product image pool; ignoring"
            );
            continue;
        }
        if emitted.insert(image_id) {
            order.push(image_id.to_owned());
        }
    }

    for image in pool {
        if emitted.insert(image.id.as_str()) {
            order.push(image.id.clone());
        }
    }

    order
}
