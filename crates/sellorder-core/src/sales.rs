use serde::{Deserialize, Serialize};

/// One row of the sales export: units sold for a single variant title of a
/// product title. Titles are joined against the catalog verbatim (after
/// trimming), so they must match the storefront's display titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_title: String,
    pub variant_title: String,
    pub units_sold: u64,
}

impl SalesRecord {
    #[must_use]
    pub fn new(product_title: &str, variant_title: &str, units_sold: u64) -> Self {
        Self {
            product_title: product_title.to_owned(),
            variant_title: variant_title.to_owned(),
            units_sold,
        }
    }
}
