use std::path::Path;
use chrono::Utc;
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use alkoteka_etl::{ClientPool, JsonWriter, Pipeline, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::new()?;

    let started_at = Utc::now();
    info!(
        started_at = %started_at.format("%Y-%m-%d %H:%M:%S"),
        city_uuid = %settings.api.city_uuid,
        "Starting extraction"
    );

    let filename = format!("products_{}.jsonl", started_at.format("%Y-%m-%d_%H-%M-%S"));
    let path = Path::new(&settings.output.dir).join(filename);

    let client_pool = ClientPool::new(&settings)?;
    let pipeline = Pipeline::new(&settings)?;
    let mut json_writer = JsonWriter::new(&path).await?;

    let start_time = std::time::Instant::now();
    let summary = pipeline.run(&client_pool, &mut json_writer).await?;
    json_writer.finish().await?;

    let total_time = start_time.elapsed();

    info!(
        listed = summary.listed,
        emitted = summary.emitted,
        skipped = summary.skipped(),
        listing_decode_errors = summary.listing_decode_errors,
        detail_decode_errors = summary.detail_decode_errors,
        unsuccessful = summary.unsuccessful,
        empty = summary.empty,
        fetch_failures = summary.fetch_failures,
        write_failures = summary.write_failures,
        written = json_writer.get_count(),
        total_minutes = %format!("{:.2}", total_time.as_secs_f64() / 60.0),
        output = %json_writer.path().display(),
        "Extraction summary"
    );

    Ok(())
}
