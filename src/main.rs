use anyhow::Result;
use colored::Colorize;
use options_ingest::config::{RunConfig, StoreKind};
use options_ingest::logging;
use options_ingest::polygon_client::PolygonClient;
use options_ingest::store::{BatchWriter, KeyValueSink, TimeSeriesSink, WriteSummary};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    println!("{}", "=".repeat(60).blue());
    println!("{}", "Options Contract Ingest".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    // Fatal if the API key is not set
    let cfg = RunConfig::from_env()?;
    println!(
        "{} Symbol: {}  Expiration: {}",
        "ℹ".blue(),
        cfg.symbol.yellow(),
        cfg.expiration_date.yellow()
    );
    println!(
        "{} Store: {}  Mode: {:?}",
        "ℹ".blue(),
        match cfg.store_kind {
            StoreKind::KeyValue => format!("key-value ({})", cfg.table),
            StoreKind::TimeSeries => format!("time-series ({}/{})", cfg.database, cfg.table),
        }
        .yellow(),
        cfg.failure_mode
    );
    println!();

    let start_time = std::time::Instant::now();

    // Step 1: Fetch all pages
    println!("{}", "Step 1: Fetching option contracts...".cyan());
    let client = PolygonClient::new()?;
    let dataset = client
        .fetch_all(&cfg.api_key, &cfg.symbol, &cfg.expiration_date, cfg.failure_mode)
        .await?;
    println!("{} Fetched {} contracts", "✓".green(), dataset.len());
    println!();

    // Step 2: Write batches to the store
    println!("{}", "Step 2: Writing batches to store...".cyan());
    let summary: WriteSummary = match cfg.store_kind {
        StoreKind::TimeSeries => {
            let sink = TimeSeriesSink::new(&cfg)?;
            BatchWriter::new(sink, cfg.failure_mode)
                .write_all(&dataset)
                .await?
        }
        StoreKind::KeyValue => {
            let sink = KeyValueSink::new(&cfg)?;
            BatchWriter::new(sink, cfg.failure_mode)
                .write_all(&dataset)
                .await?
        }
    };

    let elapsed = start_time.elapsed();

    // Summary
    println!();
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Summary".cyan().bold());
    println!("{}", "=".repeat(60).blue());
    println!("{} Contracts fetched: {}", "✓".green(), dataset.len());
    println!("{} Batch calls: {}", "✓".green(), summary.batches);
    println!("{} Records written: {}", "✓".green(), summary.written);
    if summary.failed > 0 {
        println!("{} Records discarded: {}", "✗".red(), summary.failed);
    }
    println!("{} Time taken: {:.2}s", "⏱".yellow(), elapsed.as_secs_f64());
    println!();
    println!("{}", "Done!".green().bold());

    Ok(())
}
