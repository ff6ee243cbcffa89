use std::env;

use anyhow::{Context, Result};
use recipe_corpus::{ensure_corpus, PipelineConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("RECIPE_CORPUS_LOG_JSON").is_ok_and(|value| value == "1");

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging();

    info!("Starting recipe corpus build");

    let config = PipelineConfig::from_env().context("dataset initialization failed")?;

    match ensure_corpus(&config)? {
        Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
        None => info!(
            output = %config.output_path.display(),
            "Corpus already present, nothing to do"
        ),
    }

    Ok(())
}
