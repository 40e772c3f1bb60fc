mod logging;
mod rank;
mod reorder;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sellorder-cli")]
#[command(about = "Reorder storefront variants, option values and images by sales")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reorder every tagged product in the store by units sold
    Reorder {
        /// Sales export to rank by (defaults to `SELLORDER_SALES_PATH`)
        #[arg(long)]
        sales: Option<PathBuf>,

        /// Only touch products carrying this tag (defaults to `SELLORDER_PRODUCT_TAG`)
        #[arg(long)]
        tag: Option<String>,

        /// Compute and print the new order without writing to the store
        #[arg(long)]
        dry_run: bool,

        /// Stop after this many products
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the color order for one product from a sales export, offline
    Rank {
        #[arg(long)]
        sales: PathBuf,

        /// Product title exactly as it appears in the export
        #[arg(long)]
        product: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Reorder {
            sales,
            tag,
            dry_run,
            limit,
        } => {
            let config = sellorder_core::load_app_config()?;
            logging::init_tracing(&config.log_level, config.log_file.as_deref())?;
            let summary = reorder::run(
                &config,
                reorder::ReorderArgs {
                    sales,
                    tag,
                    dry_run,
                    limit,
                },
            )
            .await?;
            println!("{}", summary.render());
        }
        Commands::Rank { sales, product } => {
            logging::init_tracing("warn", None)?;
            let lines = rank::run(&sales, &product)?;
            for line in lines {
                println!("{line}");
            }
        }
    }

    Ok(())
}
