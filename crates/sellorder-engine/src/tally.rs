//! Two-level sales tallies keyed by product title.
//!
//! | Level | Key | Duplicate rows |
//! |-------|-----|----------------|
//! | exact | product title → variant title | last row wins |
//! | color | product title → color label | summed |
//!
//! Rows whose variant title yields no color are kept in the exact level and
//! left out of the color level.

use std::collections::HashMap;

use sellorder_core::SalesRecord;

use crate::color::extract_color;

type Tally = HashMap<String, HashMap<String, u64>>;

/// Read-only sales lookups built once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesTallyIndex {
    exact: Tally,
    color: Tally,
}

impl SalesTallyIndex {
    /// Builds both tallies from `records`, processed in input order.
    ///
    /// Titles are trimmed. Records with an empty product or variant title are
    /// skipped with a warning.
    #[must_use]
    pub fn build(records: &[SalesRecord]) -> Self {
        let mut index = Self::default();
        let mut skipped = 0usize;
        let mut colorless = 0usize;

        for (row, record) in records.iter().enumerate() {
            let product = record.product_title.trim();
            let variant = record.variant_title.trim();
            if product.is_empty() || variant.is_empty() {
                tracing::warn!(
                    row,
                    product = %record.product_title,
                    variant = %record.variant_title,
                    "skipping sales record with empty title"
                );
                skipped += 1;
                continue;
            }

            index
                .exact
                .entry(product.to_owned())
                .or_default()
                .insert(variant.to_owned(), record.units_sold);

            if let Some(color) = extract_color(variant) {
                let total = index
                    .color
                    .entry(product.to_owned())
                    .or_default()
                    .entry(color.to_owned())
                    .or_insert(0);
                *total = total.saturating_add(record.units_sold);
            } else {
                tracing::debug!(
                    product,
                    variant,
                    "no color in variant title; excluded from color totals"
                );
                colorless += 1;
            }
        }

        tracing::info!(
            records = records.len(),
            skipped,
            colorless,
            products = index.exact.len(),
            "built sales tally"
        );
        index
    }

    /// Units sold for one exact variant title, or `0` when unknown.
    #[must_use]
    pub fn exact_sales(&self, product_title: &str, variant_title: &str) -> u64 {
        self.exact
            .get(product_title.trim())
            .and_then(|variants| variants.get(variant_title.trim()))
            .copied()
            .unwrap_or(0)
    }

    /// Units sold across every variant of `color`, or `0` when unknown.
    #[must_use]
    pub fn color_sales(&self, product_title: &str, color: &str) -> u64 {
        self.color
            .get(product_title.trim())
            .and_then(|colors| colors.get(color.trim()))
            .copied()
            .unwrap_or(0)
    }

    /// Returns `true` when both tallies hold an entry for the product.
    #[must_use]
    pub fn has_sales_for(&self, product_title: &str) -> bool {
        let key = product_title.trim();
        self.exact.contains_key(key) && self.color.contains_key(key)
    }

    /// Exact per-variant sales for a product.
    #[must_use]
    pub fn exact_for(&self, product_title: &str) -> Option<&HashMap<String, u64>> {
        self.exact.get(product_title.trim())
    }

    /// Color totals for a product.
    #[must_use]
    pub fn colors_for(&self, product_title: &str) -> Option<&HashMap<String, u64>> {
        self.color.get(product_title.trim())
    }

    /// Number of products with at least one exact sales entry.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.exact.len()
    }
}
