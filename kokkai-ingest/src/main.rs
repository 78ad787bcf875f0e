//! kokkai-ingest - Main entry point
//!
//! Batch job: resolve the target date and database, run the ingest pipeline
//! once, and exit. Progress and the final confirmation go to the log.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kokkai_ingest::services::speech_client::SpeechClient;
use kokkai_ingest::services::tokenizer::{LinderaTokenizer, Tokenize};
use kokkai_ingest::{IngestPipeline, IngestSettings};

/// Command-line arguments for kokkai-ingest
#[derive(Parser, Debug)]
#[command(name = "kokkai-ingest")]
#[command(about = "Aggregates per-word counts from National Diet speech transcripts")]
#[command(version)]
struct Args {
    /// Target date (YYYY-MM-DD); prompts interactively when omitted
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Database connection string (falls back to DATABASE_URL, then config)
    #[arg(long)]
    database_url: Option<String>,

    /// Records per API page
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=100))]
    page_size: u32,

    /// Extraction worker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    max_parallel_extractions: usize,

    /// Tokenize raw transcripts without stripping speaker names and indented lines
    #[arg(long)]
    raw_text: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kokkai_ingest=info,kokkai_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let date = match args.date {
        Some(date) => date,
        None => prompt_for_date()?,
    };

    info!(date = %date, "Processing speeches");

    let database_url = kokkai_common::config::resolve_database_url(args.database_url.as_deref())?;
    let db = kokkai_common::db::init_database(&database_url)
        .await
        .context("Failed to initialize database")?;

    let tokenizer: Arc<dyn Tokenize> =
        Arc::new(LinderaTokenizer::new().context("Failed to initialize tokenizer")?);

    let settings = IngestSettings {
        page_size: args.page_size,
        max_parallel_extractions: args.max_parallel_extractions,
        normalize_text: !args.raw_text,
    };

    let client = SpeechClient::new().context("Failed to create speech API client")?;
    let pipeline = IngestPipeline::new(db, tokenizer, settings);

    let summary = pipeline.run(&client, date).await?;

    info!(
        speeches = summary.speeches,
        distinct_words = summary.distinct_words,
        truncated = summary.truncated,
        "Ingest complete"
    );

    Ok(())
}

/// Re-prompt until the input parses as a YYYY-MM-DD date
fn prompt_for_date() -> Result<NaiveDate> {
    let stdin = std::io::stdin();

    loop {
        print!("Enter a date (YYYY-MM-DD): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            anyhow::bail!("stdin closed before a valid date was entered");
        }

        match NaiveDate::parse_from_str(line.trim(), "%Y-%m-%d") {
            Ok(date) => return Ok(date),
            Err(_) => eprintln!("Invalid date format. Please try again."),
        }
    }
}
