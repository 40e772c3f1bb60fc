//! The `reorder` command: one sequential pass over every tagged product.
//!
//! Setup problems (config, sales file, catalog read) are fatal. Once products
//! are loaded, nothing a single product does stops the run; its outcome is
//! logged and counted in the [`RunSummary`].

use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;

use anyhow::Context;
use sellorder_core::{AppConfig, Product};
use sellorder_engine::{
    load_sales_file, CatalogWriter, ProductOutcome, ProductReconciler, RecordedCall,
    RecordingWriter, SalesTallyIndex,
};
use sellorder_shopify::{PacedQueue, Pacer, ShopifyClient, ShopifyConfig};

/// Command-line overrides for a reorder run.
#[derive(Debug, Default)]
pub(crate) struct ReorderArgs {
    pub sales: Option<PathBuf>,
    pub tag: Option<String>,
    pub dry_run: bool,
    pub limit: Option<usize>,
}

/// Tallies for the end-of-run report.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub done: usize,
    /// Subset of `done` where a best-effort write did not fully apply.
    pub partial: usize,
    pub aborted: BTreeMap<&'static str, usize>,
    /// Products never started because the run was interrupted.
    pub not_started: usize,
    pub interrupted: bool,
}

impl RunSummary {
    fn record(&mut self, outcome: &ProductOutcome) {
        if let Some(reason) = outcome.abort_reason() {
            *self.aborted.entry(reason.as_str()).or_default() += 1;
            return;
        }
        self.done += 1;
        if outcome.is_partial() {
            self.partial += 1;
        }
    }

    pub(crate) fn aborted_total(&self) -> usize {
        self.aborted.values().sum()
    }

    pub(crate) fn render(&self) -> String {
        let mut lines = vec![
            format!("done:    {} ({} partial)", self.done, self.partial),
            format!("aborted: {}", self.aborted_total()),
        ];
        lines.extend(
            self.aborted
                .iter()
                .map(|(reason, count)| format!("  {reason}: {count}")),
        );
        if self.interrupted {
            lines.push(format!(
                "interrupted with {} product(s) not started",
                self.not_started
            ));
        }
        lines.join("\n")
    }
}

/// Runs a full reorder pass against the configured store.
///
/// # Errors
///
/// Returns an error if the sales file cannot be read, the client cannot be
/// built, or the tagged products cannot be fetched.
pub(crate) async fn run(config: &AppConfig, args: ReorderArgs) -> anyhow::Result<RunSummary> {
    let sales_path = args.sales.as_deref().unwrap_or(&config.sales_path);
    let import = load_sales_file(sales_path)
        .with_context(|| format!("failed to load sales file {}", sales_path.display()))?;
    tracing::info!(
        path = %sales_path.display(),
        records = import.records.len(),
        skipped_rows = import.skipped,
        "loaded sales file"
    );
    let tally = SalesTallyIndex::build(&import.records);

    let client = ShopifyClient::new(ShopifyConfig::from_app_config(config)?)?;
    let tag = args.tag.as_deref().unwrap_or(&config.product_tag);
    let mut products = client
        .fetch_tagged_products(
            tag,
            config.page_size,
            &Pacer::from_millis(config.page_delay_ms),
        )
        .await
        .with_context(|| format!("failed to fetch products tagged '{tag}'"))?;
    if let Some(limit) = args.limit {
        products.truncate(limit);
    }
    tracing::info!(tag, products = products.len(), dry_run = args.dry_run, "starting reorder run");

    let reconciler = ProductReconciler::new(&tally, &config.color_option_label);
    let queue = PacedQueue::new(products, Pacer::from_millis(config.product_delay_ms));

    let summary = if args.dry_run {
        let writer = RecordingWriter::new();
        let summary = reconcile_all(&reconciler, queue, &writer, shutdown_signal()).await;
        for line in describe_calls(&writer.calls()) {
            println!("{line}");
        }
        summary
    } else {
        reconcile_all(&reconciler, queue, &client, shutdown_signal()).await
    };

    tracing::info!(
        done = summary.done,
        partial = summary.partial,
        aborted = summary.aborted_total(),
        interrupted = summary.interrupted,
        "reorder run finished"
    );
    Ok(summary)
}

/// Reconciles queued products one at a time until the queue drains or
/// `shutdown` resolves. Shutdown is only observed between products.
pub(crate) async fn reconcile_all<W, S>(
    reconciler: &ProductReconciler<'_>,
    mut queue: PacedQueue<Product>,
    writer: &W,
    shutdown: S,
) -> RunSummary
where
    W: CatalogWriter,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut summary = RunSummary::default();

    loop {
        let product = tokio::select! {
            biased;
            () = &mut shutdown => {
                summary.interrupted = true;
                tracing::warn!(
                    remaining = queue.remaining(),
                    "interrupted; stopping before the next product"
                );
                break;
            }
            next = queue.next() => match next {
                Some(product) => product,
                None => break,
            },
        };

        let outcome = reconciler.reconcile(&product, writer).await;
        summary.record(&outcome);
    }

    summary.not_started = queue.remaining();
    summary
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c; run cannot be interrupted");
        std::future::pending::<()>().await;
    }
}

/// One line per write a dry run would have issued.
fn describe_calls(calls: &[RecordedCall]) -> Vec<String> {
    calls
        .iter()
        .map(|call| match call {
            RecordedCall::Options {
                product_id,
                options,
            } => {
                let axes: Vec<String> = options
                    .iter()
                    .map(|o| format!("{}=[{}]", o.name, o.values.join(", ")))
                    .collect();
                format!("[dry-run] {product_id} options: {}", axes.join(" "))
            }
            RecordedCall::Variants {
                product_id,
                positions,
            } => {
                let ids: Vec<&str> = positions.iter().map(|p| p.variant_id.as_str()).collect();
                format!("[dry-run] {product_id} variants: {}", ids.join(", "))
            }
            RecordedCall::Images {
                product_id,
                image_ids,
            } => format!("[dry-run] {product_id} images: {}", image_ids.join(", ")),
        })
        .collect()
}

#[cfg(test)]
#[path = "reorder_test.rs"]
mod tests;
