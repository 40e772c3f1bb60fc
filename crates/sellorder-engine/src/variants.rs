//! Sales-driven variant ordering.

use sellorder_core::Variant;

use crate::color::extract_color;
use crate::tally::SalesTallyIndex;

/// A variant annotated with the sales figures it was ranked by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedVariant<'a> {
    pub variant: &'a Variant,
    pub color: Option<&'a str>,
    pub individual_sales: u64,
    /// Total sales of the variant's color group; `0` when it has no color.
    pub color_sales: u64,
}

/// Orders `variants` by color-group sales, then by the variant's own sales,
/// both descending.
///
/// The sort is stable: variants that tie on both keys keep their input order,
/// so repeated runs never shuffle equal-selling variants. Missing sales data
/// counts as zero.
#[must_use]
pub fn rank_variants<'a>(
    product_title: &str,
    variants: &'a [Variant],
    tally: &SalesTallyIndex,
) -> Vec<RankedVariant<'a>> {
    let mut ranked: Vec<RankedVariant<'a>> = variants
        .iter()
        .map(|variant| {
            let title = variant.title.trim();
            let color = extract_color(title);
            if color.is_none() {
                tracing::warn!(
                    product = product_title,
                    variant_id = %variant.id,
                    variant = title,
                    "variant title has no color; ranking by its own sales only"
                );
            }
            RankedVariant {
                variant,
                color,
                individual_sales: tally.exact_sales(product_title, title),
                color_sales: color.map_or(0, |c| tally.color_sales(product_title, c)),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.color_sales
            .cmp(&a.color_sales)
            .then_with(|| b.individual_sales.cmp(&a.individual_sales))
    });
    ranked
}
