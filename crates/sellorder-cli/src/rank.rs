//! Offline inspection: the color order a product would get, from the sales
//! export alone.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use sellorder_engine::{load_sales_file, SalesTallyIndex};

pub(crate) fn run(sales_path: &Path, product_title: &str) -> anyhow::Result<Vec<String>> {
    let import = load_sales_file(sales_path)
        .with_context(|| format!("failed to load sales file {}", sales_path.display()))?;
    let tally = SalesTallyIndex::build(&import.records);

    let product_title = product_title.trim();
    let colors = tally.colors_for(product_title).with_context(|| {
        format!(
            "no color sales for '{product_title}' in {}",
            sales_path.display()
        )
    })?;

    Ok(ranked_colors(colors)
        .into_iter()
        .zip(1..)
        .map(|((color, units), rank)| format!("{rank:>3}. {color} ({units} sold)"))
        .collect())
}

/// Colors by descending units sold. Ties fall back to the color name so the
/// output is stable across runs.
fn ranked_colors(colors: &HashMap<String, u64>) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = colors
        .iter()
        .map(|(color, units)| (color.as_str(), *units))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
}
