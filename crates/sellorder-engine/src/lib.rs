//! Sales-driven ordering for catalog products.
//!
//! A single sales tally feeds three rankings (variants, option values,
//! images) that must agree with each other, and a per-product reconciler
//! pushes them to the catalog through [`CatalogWriter`].

pub mod color;
pub mod error;
pub mod images;
pub mod import;
pub mod options;
pub mod reconcile;
pub mod tally;
pub mod variants;
pub mod writer;

pub use color::extract_color;
pub use error::ImportError;
pub use images::sequence_images;
pub use import::{load_sales_file, parse_sales_csv, SalesImport};
pub use options::{is_color_axis, rank_option_values, rank_product_options, NoColorAxis, OptionOrder};
pub use reconcile::{
    AbortReason, ProductOutcome, ProductReconciler, ReconcileState, ReorderPlan, Stage,
    StageResult,
};
pub use tally::SalesTallyIndex;
pub use variants::{rank_variants, RankedVariant};
pub use writer::{
    CatalogWriter, FailMode, RecordedCall, RecordedFailure, RecordingWriter, UserError,
    VariantPosition, WriteOutcome,
};
