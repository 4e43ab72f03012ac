//! Command handlers for the CLI.
//!
//! These are called from `main` after env loading and tracing setup.
//! Results print as JSON on stdout so the commands compose with scripts and
//! the admin panel's background jobs.

use clap::Subcommand;
use hargadb_core::{load_app_config, AppConfig, MarketplaceSource};
use hargadb_db::PoolConfig;
use hargadb_extract::{
    build_client, extract_price as run_price_cascade, extract_specs as run_spec_extractor,
    fetch_html, page_title,
};
use hargadb_ingest::{reconcile, IngestRequest, MarketplaceRef};
use serde_json::json;

/// Sub-commands available under `unmapped`.
#[derive(Debug, Subcommand)]
pub enum UnmappedCommands {
    /// List quarantined listings (default: status "unmapped")
    List {
        /// Filter by status; pass "all" to list every row
        #[arg(long, default_value = "unmapped")]
        status: String,
    },
    /// Mark a quarantined listing with a new status
    Resolve {
        id: i64,

        #[arg(long, default_value = "resolved")]
        status: String,
    },
}

/// Fetch a listing page, run the price cascade, and reconcile the result.
pub async fn sync_price(
    product: &str,
    url: &str,
    marketplace: Option<&str>,
    seller: Option<String>,
    title_override: Option<String>,
) -> anyhow::Result<()> {
    let config = load_app_config()?;
    let source = MarketplaceSource::from_url(url);
    let html = fetch_page(&config, url).await?;

    let found = match run_price_cascade(&html, source)? {
        Some(found) => found,
        None => anyhow::bail!("no price found on page; enter the price manually"),
    };
    tracing::info!(
        source = source.slug(),
        amount = found.amount,
        strategy = found.strategy.as_str(),
        "extracted listing price"
    );

    let listing_title = match title_override {
        Some(title) => title,
        None => page_title(&html)
            .ok_or_else(|| anyhow::anyhow!("page has no usable <title>; pass --title"))?,
    };

    let pool = hargadb_db::connect_pool(&config.database_url, PoolConfig::from_app_config(&config))
        .await?;
    let request = IngestRequest {
        product_slug: product.to_string(),
        listing_title,
        price: found.amount,
        affiliate_url: url.to_string(),
        seller_name: seller,
        marketplace: marketplace.map(|slug| MarketplaceRef::Slug(slug.to_string())),
    };
    let outcome = reconcile(&pool, config.color_fallback, &request).await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Fetch a page and report what the cascade finds, without touching the
/// database.
pub async fn extract_price(url: &str) -> anyhow::Result<()> {
    let config = load_app_config()?;
    let source = MarketplaceSource::from_url(url);
    let html = fetch_page(&config, url).await?;

    let output = match run_price_cascade(&html, source) {
        Ok(Some(found)) => json!({
            "success": true,
            "price": found.amount,
            "strategy": found.strategy.as_str(),
            "source": source.slug(),
        }),
        Ok(None) => json!({
            "success": false,
            "price": null,
            "source": source.slug(),
            "error": "no price found on page; enter the price manually",
        }),
        Err(err) => json!({
            "success": false,
            "price": null,
            "source": source.slug(),
            "error": err.to_string(),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Run the specification extractor over a fetched page or a local file.
pub async fn extract_specs(
    url: Option<&str>,
    file: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let html = match (url, file) {
        (Some(url), None) => {
            let config = load_app_config()?;
            fetch_page(&config, url).await?
        }
        (None, Some(path)) => std::fs::read_to_string(path)?,
        _ => anyhow::bail!("pass exactly one of --url or --file"),
    };

    let specs = run_spec_extractor(&html);
    println!("{}", serde_json::to_string_pretty(&specs)?);
    Ok(())
}

/// Operator workflow over the quarantine queue.
pub async fn unmapped(command: UnmappedCommands) -> anyhow::Result<()> {
    let config = load_app_config()?;
    let pool = hargadb_db::connect_pool(&config.database_url, PoolConfig::from_app_config(&config))
        .await?;

    match command {
        UnmappedCommands::List { status } => {
            let filter = if status == "all" { None } else { Some(status.as_str()) };
            let rows = hargadb_db::list_unmapped_listings(&pool, filter).await?;
            for row in &rows {
                println!(
                    "{}",
                    json!({
                        "id": row.id,
                        "product_id": row.product_id,
                        "title": row.external_title,
                        "url": row.external_url,
                        "ram_gb": row.ram_gb,
                        "storage_gb": row.storage_gb,
                        "status": row.status,
                    })
                );
            }
            tracing::info!(count = rows.len(), "unmapped listings listed");
        }
        UnmappedCommands::Resolve { id, status } => {
            hargadb_db::resolve_unmapped_listing(&pool, id, &status).await?;
            println!("{}", json!({ "id": id, "status": status }));
        }
    }
    Ok(())
}

/// Apply pending migrations to the configured database.
pub async fn migrate() -> anyhow::Result<()> {
    let config = load_app_config()?;
    let pool = hargadb_db::connect_pool(&config.database_url, PoolConfig::from_app_config(&config))
        .await?;
    let applied = hargadb_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

async fn fetch_page(config: &AppConfig, url: &str) -> anyhow::Result<String> {
    let client = build_client(config.fetch_timeout_secs)?;
    let html = fetch_html(&client, url, &config.fetch_user_agent).await?;
    Ok(html)
}
