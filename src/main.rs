use clap::Parser;
use immo_scout::cli::Cli;
use immo_scout::Scout;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Cli::parse().into_config();

    info!("🏠 Immo Scout - immoweb.be scraper");
    info!(
        pages = config.search.effective_pages(),
        data_dir = %config.data_dir.display(),
        reuse_ids = config.reuse_ids,
        "Starting scrape"
    );

    let scout = Scout::from_config(config)?;
    let report = scout.run().await?;

    info!(
        ids = report.ids,
        failed_pages = report.failed_pages,
        records = report.records,
        degenerate = report.degenerate,
        elapsed = ?(report.finished_at - report.started_at).to_std().unwrap_or_default(),
        "✅ Scrape finished"
    );

    Ok(())
}
