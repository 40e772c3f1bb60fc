//! Per-product reconciliation.
//!
//! State transitions:
//! ```text
//! Loaded ──► OptionsReordered ──► VariantsReordered ──► ImagesReordered ──► Done
//!   │
//!   └──► Aborted(NoSalesData | NoCatalogData | NoColorAxis | OptionsWriteFailed)
//! ```
//!
//! Only a failed options write aborts. Variant and image writes are
//! best-effort: their failures are logged and the machine advances anyway.

use sellorder_core::Product;

use crate::images::sequence_images;
use crate::options::{rank_product_options, OptionOrder};
use crate::tally::SalesTallyIndex;
use crate::variants::rank_variants;
use crate::writer::{CatalogWriter, VariantPosition, WriteOutcome};

/// Why a product was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbortReason {
    NoSalesData,
    NoCatalogData,
    NoColorAxis,
    OptionsWriteFailed,
}

impl AbortReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AbortReason::NoSalesData => "NoSalesData",
            AbortReason::NoCatalogData => "NoCatalogData",
            AbortReason::NoColorAxis => "NoColorAxis",
            AbortReason::OptionsWriteFailed => "OptionsWriteFailed",
        }
    }
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcileState {
    Loaded,
    OptionsReordered,
    VariantsReordered,
    ImagesReordered,
    Done,
    Aborted(AbortReason),
}

impl ReconcileState {
    /// Returns true if this is a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ReconcileState::Done | ReconcileState::Aborted(_))
    }

    /// State after `stage` has been attempted from `self`.
    ///
    /// A failed stage either aborts or advances as if it had succeeded,
    /// according to [`FAILURE_POLICY`]. A stage attempted out of order leaves
    /// the state unchanged.
    #[must_use]
    pub fn after(self, stage: Stage, succeeded: bool) -> ReconcileState {
        let next = match (self, stage) {
            (ReconcileState::Loaded, Stage::Options) => ReconcileState::OptionsReordered,
            (ReconcileState::OptionsReordered, Stage::Variants) => {
                ReconcileState::VariantsReordered
            }
            (ReconcileState::VariantsReordered, Stage::Images) => ReconcileState::ImagesReordered,
            (state, _) => return state,
        };
        if succeeded {
            return next;
        }
        match stage.on_failure() {
            FailurePolicy::Abort(reason) => ReconcileState::Aborted(reason),
            FailurePolicy::Continue => next,
        }
    }
}

impl std::fmt::Display for ReconcileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileState::Loaded => write!(f, "Loaded"),
            ReconcileState::OptionsReordered => write!(f, "OptionsReordered"),
            ReconcileState::VariantsReordered => write!(f, "VariantsReordered"),
            ReconcileState::ImagesReordered => write!(f, "ImagesReordered"),
            ReconcileState::Done => write!(f, "Done"),
            ReconcileState::Aborted(reason) => write!(f, "Aborted({reason})"),
        }
    }
}

/// The three catalog writes, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Options,
    Variants,
    Images,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailurePolicy {
    Abort(AbortReason),
    Continue,
}

/// What a failed write does to the rest of the product.
const FAILURE_POLICY: [(Stage, FailurePolicy); 3] = [
    (
        Stage::Options,
        FailurePolicy::Abort(AbortReason::OptionsWriteFailed),
    ),
    (Stage::Variants, FailurePolicy::Continue),
    (Stage::Images, FailurePolicy::Continue),
];

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Options => "options",
            Stage::Variants => "variants",
            Stage::Images => "images",
        }
    }

    fn on_failure(self) -> FailurePolicy {
        FAILURE_POLICY
            .iter()
            .find(|(stage, _)| *stage == self)
            .map_or(FailurePolicy::Continue, |(_, policy)| *policy)
    }
}

/// How one write went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageResult {
    /// Accepted with no user errors.
    Applied,
    /// Accepted with user errors, product data returned.
    PartiallyApplied,
    /// Transport failure, or user errors with no product data returned.
    Failed,
    /// Nothing to write (e.g. a product without images).
    Skipped,
    /// Never attempted because an earlier stage aborted the product.
    NotAttempted,
}

impl StageResult {
    fn from_outcome(outcome: &WriteOutcome) -> Self {
        if outcome.is_clean() {
            StageResult::Applied
        } else if outcome.product_returned {
            StageResult::PartiallyApplied
        } else {
            StageResult::Failed
        }
    }

    /// Whether the stage counts as having gone through for state purposes.
    #[must_use]
    pub fn succeeded(self) -> bool {
        matches!(
            self,
            StageResult::Applied | StageResult::PartiallyApplied | StageResult::Skipped
        )
    }
}

/// Everything computed for a product before any write is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub options: Vec<OptionOrder>,
    pub variants: Vec<VariantPosition>,
    pub images: Vec<String>,
}

/// What happened to one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOutcome {
    pub product_id: String,
    pub product_title: String,
    pub state: ReconcileState,
    /// Every state visited, starting at `Loaded`.
    pub history: Vec<ReconcileState>,
    pub options_write: StageResult,
    pub variants_write: StageResult,
    pub images_write: StageResult,
}

impl ProductOutcome {
    fn new(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            state: ReconcileState::Loaded,
            history: vec![ReconcileState::Loaded],
            options_write: StageResult::NotAttempted,
            variants_write: StageResult::NotAttempted,
            images_write: StageResult::NotAttempted,
        }
    }

    fn enter(&mut self, state: ReconcileState) {
        if state != self.state {
            self.state = state;
            self.history.push(state);
        }
    }

    #[must_use]
    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self.state {
            ReconcileState::Aborted(reason) => Some(reason),
            _ => None,
        }
    }

    /// Done, but at least one best-effort write did not fully apply.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.state == ReconcileState::Done
            && [self.options_write, self.variants_write, self.images_write]
                .iter()
                .any(|r| matches!(r, StageResult::PartiallyApplied | StageResult::Failed))
    }
}

/// Drives one product through the three writes.
pub struct ProductReconciler<'a> {
    tally: &'a SalesTallyIndex,
    color_label: &'a str,
}

impl<'a> ProductReconciler<'a> {
    #[must_use]
    pub fn new(tally: &'a SalesTallyIndex, color_label: &'a str) -> Self {
        Self { tally, color_label }
    }

    /// Computes the option, variant and image orders for `product`.
    ///
    /// # Errors
    ///
    /// Returns the [`AbortReason`] when a precondition fails: no sales for
    /// the product title, no options or variants, or no color axis.
    pub fn plan(&self, product: &Product) -> Result<ReorderPlan, AbortReason> {
        if !self.tally.has_sales_for(&product.title) {
            return Err(AbortReason::NoSalesData);
        }
        if !product.has_catalog_data() {
            return Err(AbortReason::NoCatalogData);
        }

        let options =
            rank_product_options(&product.title, &product.options, self.color_label, self.tally)
                .map_err(|e| {
                    tracing::warn!(
                        product_id = %product.id,
                        product = %product.title,
                        error = %e,
                        "no color axis"
                    );
                    AbortReason::NoColorAxis
                })?;

        let ranked = rank_variants(&product.title, &product.variants, self.tally);
        let images = sequence_images(&ranked, &product.images);
        let variants = ranked
            .iter()
            .zip(1u32..)
            .map(|(entry, position)| VariantPosition {
                variant_id: entry.variant.id.clone(),
                position,
            })
            .collect();

        Ok(ReorderPlan {
            options,
            variants,
            images,
        })
    }

    /// Plans and applies the reordering for one product.
    ///
    /// Never fails: every abort and write failure is logged and reported in
    /// the returned [`ProductOutcome`].
    pub async fn reconcile<W: CatalogWriter>(
        &self,
        product: &Product,
        writer: &W,
    ) -> ProductOutcome {
        let mut outcome = ProductOutcome::new(product);

        let plan = match self.plan(product) {
            Ok(plan) => plan,
            Err(reason) => {
                tracing::warn!(
                    product_id = %product.id,
                    product = %product.title,
                    reason = %reason,
                    "skipping product"
                );
                outcome.enter(ReconcileState::Aborted(reason));
                return outcome;
            }
        };
        tracing::info!(
            product_id = %product.id,
            product = %product.title,
            variants = plan.variants.len(),
            images = plan.images.len(),
            "computed sales order"
        );

        outcome.options_write = log_write(
            product,
            Stage::Options,
            writer.reorder_options(&product.id, &plan.options).await,
        );
        outcome.enter(
            outcome
                .state
                .after(Stage::Options, outcome.options_write.succeeded()),
        );
        if outcome.state.is_terminal() {
            tracing::error!(
                product_id = %product.id,
                product = %product.title,
                "options write failed; variant and image writes not attempted"
            );
            return outcome;
        }

        outcome.variants_write = log_write(
            product,
            Stage::Variants,
            writer.reorder_variants(&product.id, &plan.variants).await,
        );
        outcome.enter(
            outcome
                .state
                .after(Stage::Variants, outcome.variants_write.succeeded()),
        );

        outcome.images_write = if plan.images.is_empty() {
            tracing::info!(
                product_id = %product.id,
                product = %product.title,
                "product has no images; skipping image write"
            );
            StageResult::Skipped
        } else {
            log_write(
                product,
                Stage::Images,
                writer.reorder_images(&product.id, &plan.images).await,
            )
        };
        outcome.enter(
            outcome
                .state
                .after(Stage::Images, outcome.images_write.succeeded()),
        );
        outcome.enter(ReconcileState::Done);

        outcome
    }
}

fn log_write<E: std::error::Error>(
    product: &Product,
    stage: Stage,
    result: Result<WriteOutcome, E>,
) -> StageResult {
    match result {
        Ok(write) => {
            let status = StageResult::from_outcome(&write);
            for user_error in &write.user_errors {
                tracing::warn!(
                    product_id = %product.id,
                    product = %product.title,
                    stage = stage.as_str(),
                    product_returned = write.product_returned,
                    user_error = %user_error,
                    "catalog reported user error"
                );
            }
            match status {
                StageResult::Applied => tracing::info!(
                    product_id = %product.id,
                    stage = stage.as_str(),
                    "write applied"
                ),
                _ => tracing::warn!(
                    product_id = %product.id,
                    stage = stage.as_str(),
                    status = ?status,
                    "write not fully applied"
                ),
            }
            status
        }
        Err(e) => {
            tracing::error!(
                product_id = %product.id,
                product = %product.title,
                stage = stage.as_str(),
                error = %e,
                "write failed"
            );
            StageResult::Failed
        }
    }
}
