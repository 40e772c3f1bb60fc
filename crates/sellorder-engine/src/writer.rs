//! The catalog write seam and an in-memory recording implementation.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

use crate::options::OptionOrder;

/// A field-level error reported by the catalog alongside an otherwise
/// successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    pub field: Vec<String>,
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field.join("."), self.message)
        }
    }
}

/// Result of a write that reached the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub user_errors: Vec<UserError>,
    /// Whether the response carried the updated product back.
    pub product_returned: bool,
}

impl WriteOutcome {
    #[must_use]
    pub fn applied() -> Self {
        Self {
            user_errors: Vec::new(),
            product_returned: true,
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.user_errors.is_empty()
    }
}

/// A variant's new 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPosition {
    pub variant_id: String,
    pub position: u32,
}

/// The three catalog mutations the reconciler issues per product.
///
/// `Err` means the call failed at the transport or protocol level. Remote
/// validation problems come back as `Ok` with [`WriteOutcome::user_errors`].
#[async_trait]
pub trait CatalogWriter: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn reorder_options(
        &self,
        product_id: &str,
        options: &[OptionOrder],
    ) -> Result<WriteOutcome, Self::Error>;

    async fn reorder_variants(
        &self,
        product_id: &str,
        positions: &[VariantPosition],
    ) -> Result<WriteOutcome, Self::Error>;

    async fn reorder_images(
        &self,
        product_id: &str,
        image_ids: &[String],
    ) -> Result<WriteOutcome, Self::Error>;
}

/// A write recorded by [`RecordingWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Options {
        product_id: String,
        options: Vec<OptionOrder>,
    },
    Variants {
        product_id: String,
        positions: Vec<VariantPosition>,
    },
    Images {
        product_id: String,
        image_ids: Vec<String>,
    },
}

/// How a [`RecordingWriter`] stage should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailMode {
    /// Fail before reaching the catalog.
    Transport,
    /// Reach the catalog but come back with user errors.
    UserErrors { product_returned: bool },
}

#[derive(Debug, Error)]
#[error("simulated transport failure for {stage} write")]
pub struct RecordedFailure {
    pub stage: &'static str,
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<RecordedCall>,
    fail_options: Option<FailMode>,
    fail_variants: Option<FailMode>,
    fail_images: Option<FailMode>,
}

/// Writer that records every call instead of touching a catalog. Used for
/// dry runs and tests; failures can be injected per stage.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    state: Mutex<RecordingState>,
}

impl RecordingWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing_options(self, mode: FailMode) -> Self {
        self.lock().fail_options = Some(mode);
        self
    }

    #[must_use]
    pub fn failing_variants(self, mode: FailMode) -> Self {
        self.lock().fail_variants = Some(mode);
        self
    }

    #[must_use]
    pub fn failing_images(self, mode: FailMode) -> Self {
        self.lock().fail_images = Some(mode);
        self
    }

    /// Every call recorded so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond(
        mode: Option<FailMode>,
        stage: &'static str,
    ) -> Result<WriteOutcome, RecordedFailure> {
        match mode {
            None => Ok(WriteOutcome::applied()),
            Some(FailMode::Transport) => Err(RecordedFailure { stage }),
            Some(FailMode::UserErrors { product_returned }) => Ok(WriteOutcome {
                user_errors: vec![UserError {
                    field: vec![stage.to_owned()],
                    message: format!("simulated {stage} rejection"),
                }],
                product_returned,
            }),
        }
    }
}

#[async_trait]
impl CatalogWriter for RecordingWriter {
    type Error = RecordedFailure;

    async fn reorder_options(
        &self,
        product_id: &str,
        options: &[OptionOrder],
    ) -> Result<WriteOutcome, Self::Error> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Options {
            product_id: product_id.to_owned(),
            options: options.to_vec(),
        });
        Self::respond(state.fail_options, "options")
    }

    async fn reorder_variants(
        &self,
        product_id: &str,
        positions: &[VariantPosition],
    ) -> Result<WriteOutcome, Self::Error> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Variants {
            product_id: product_id.to_owned(),
            positions: positions.to_vec(),
        });
        Self::respond(state.fail_variants, "variants")
    }

    async fn reorder_images(
        &self,
        product_id: &str,
        image_ids: &[String],
    ) -> Result<WriteOutcome, Self::Error> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Images {
            product_id: product_id.to_owned(),
            image_ids: image_ids.to_vec(),
        });
        Self::respond(state.fail_images, "images")
    }
}
