//! Sales export reader.
//!
//! Columns are located by header name, case-insensitively, so exports with
//! extra or reordered columns still load. Bad rows are skipped with a
//! warning; only an unreadable file or a missing column is fatal.

use std::path::Path;

use sellorder_core::SalesRecord;

use crate::error::ImportError;

pub const PRODUCT_TITLE_COLUMN: &str = "Product title";
pub const VARIANT_TITLE_COLUMN: &str = "Product variant title";
pub const UNITS_SOLD_COLUMN: &str = "Net items sold";

/// Parsed sales rows plus the number of rows that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesImport {
    pub records: Vec<SalesRecord>,
    pub skipped: usize,
}

/// Reads and parses the sales export at `path`.
///
/// # Errors
///
/// Returns [`ImportError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_sales_csv`].
pub fn load_sales_file(path: &Path) -> Result<SalesImport, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_sales_csv(&text)
}

/// Parses sales export CSV text.
///
/// # Errors
///
/// Returns [`ImportError::Header`] if the header row cannot be read and
/// [`ImportError::MissingColumn`] if a required column is absent.
pub fn parse_sales_csv(csv_text: &str) -> Result<SalesImport, ImportError> {
    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| -> Result<usize, ImportError> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or(ImportError::MissingColumn(name))
    };
    let product_col = column(PRODUCT_TITLE_COLUMN)?;
    let variant_col = column(VARIANT_TITLE_COLUMN)?;
    let units_col = column(UNITS_SOLD_COLUMN)?;

    let mut import = SalesImport::default();

    for (index, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping malformed sales row");
                import.skipped += 1;
                continue;
            }
        };

        let field = |i: usize| record.get(i).map(str::trim).filter(|v| !v.is_empty());

        let (Some(product), Some(variant), Some(raw_units)) =
            (field(product_col), field(variant_col), field(units_col))
        else {
            tracing::warn!(line, "skipping sales row with a missing column value");
            import.skipped += 1;
            continue;
        };

        let Some(units_sold) = parse_units(raw_units) else {
            tracing::warn!(
                line,
                product,
                variant,
                value = raw_units,
                "skipping sales row with non-numeric sales value"
            );
            import.skipped += 1;
            continue;
        };

        import
            .records
            .push(SalesRecord::new(product, variant, units_sold));
    }

    tracing::info!(
        records = import.records.len(),
        skipped = import.skipped,
        "loaded sales export"
    );
    Ok(import)
}

/// Parses a non-negative whole number of units. `"12.0"` is accepted as 12;
/// negatives and real fractions are rejected.
fn parse_units(raw: &str) -> Option<u64> {
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    if !fraction.chars().all(|c| c == '0') || whole.starts_with(['-', '+']) {
        return None;
    }
    whole.parse::<u64>().ok()
}
