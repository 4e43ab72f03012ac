mod commands;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "hargadb-cli")]
#[command(about = "hargadb price & specification ingestion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a marketplace listing, extract its price, and reconcile it
    /// against a catalog product
    SyncPrice {
        /// Catalog product slug the listing belongs to
        #[arg(long)]
        product: String,

        /// Listing URL (also the idempotent upsert key)
        #[arg(long)]
        url: String,

        /// Marketplace slug; omitted means a manual/unknown source
        #[arg(long)]
        marketplace: Option<String>,

        /// Seller name to record on the price row
        #[arg(long)]
        seller: Option<String>,

        /// Use this title instead of the fetched page's <title>
        #[arg(long)]
        title: Option<String>,
    },
    /// Fetch a listing page and run the price extraction cascade only
    ExtractPrice {
        #[arg(long)]
        url: String,
    },
    /// Extract the specification field set from a device spec page
    ExtractSpecs {
        /// Page URL to fetch
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,

        /// Local HTML file to read instead of fetching
        #[arg(long)]
        file: Option<std::path::PathBuf>,
    },
    /// List or resolve quarantined unmapped listings
    Unmapped {
        #[command(subcommand)]
        command: commands::UnmappedCommands,
    },
    /// Run pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::SyncPrice {
            product,
            url,
            marketplace,
            seller,
            title,
        } => {
            commands::sync_price(&product, &url, marketplace.as_deref(), seller, title).await
        }
        Commands::ExtractPrice { url } => commands::extract_price(&url).await,
        Commands::ExtractSpecs { url, file } => {
            commands::extract_specs(url.as_deref(), file.as_deref()).await
        }
        Commands::Unmapped { command } => commands::unmapped(command).await,
        Commands::Migrate => commands::migrate().await,
    }
}
