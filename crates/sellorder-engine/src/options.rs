//! Option value ordering.
//!
//! Only the color axis is reordered; every other option is submitted with its
//! values untouched so the write never disturbs, say, a size ladder.

use sellorder_core::ProductOption;
use thiserror::Error;

use crate::tally::SalesTallyIndex;

/// No option on the product matched the color-axis label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("product has no option named \"{label}\" (options: {available:?})")]
pub struct NoColorAxis {
    pub label: String,
    pub available: Vec<String>,
}

/// The new value order for one option, ready for the options write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionOrder {
    pub option_id: String,
    pub name: String,
    pub values: Vec<String>,
}

/// Case-insensitive name match. `color` and `colour` are the same axis.
#[must_use]
pub fn is_color_axis(option_name: &str, label: &str) -> bool {
    canonical_axis(option_name) == canonical_axis(label)
}

fn canonical_axis(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    if lowered == "colour" {
        "color".to_owned()
    } else {
        lowered
    }
}

/// New display order for one option's values.
///
/// Color-axis values are sorted by color-group sales, descending and stable on
/// ties; values are looked up trimmed. Other options come back unchanged.
#[must_use]
pub fn rank_option_values(
    product_title: &str,
    option: &ProductOption,
    color_label: &str,
    tally: &SalesTallyIndex,
) -> Vec<String> {
    if !is_color_axis(&option.name, color_label) {
        return option.values.clone();
    }

    let mut scored: Vec<(u64, &String)> = option
        .values
        .iter()
        .map(|value| (tally.color_sales(product_title, value), value))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, value)| value.clone()).collect()
}

/// Orders every option of a product, in option position order.
///
/// # Errors
///
/// Returns [`NoColorAxis`] when no option matches `color_label`; the product
/// must then be skipped as a whole.
pub fn rank_product_options(
    product_title: &str,
    options: &[ProductOption],
    color_label: &str,
    tally: &SalesTallyIndex,
) -> Result<Vec<OptionOrder>, NoColorAxis> {
    if !options.iter().any(|o| is_color_axis(&o.name, color_label)) {
        return Err(NoColorAxis {
            label: color_label.to_owned(),
            available: options.iter().map(|o| o.name.clone()).collect(),
        });
    }

    let mut by_position: Vec<&ProductOption> = options.iter().collect();
    by_position.sort_by_key(|o| o.position);

    Ok(by_position
        .into_iter()
        .map(|option| OptionOrder {
            option_id: option.id.clone(),
            name: option.name.clone(),
            values: rank_option_values(product_title, option, color_label, tally),
        })
        .collect())
}
