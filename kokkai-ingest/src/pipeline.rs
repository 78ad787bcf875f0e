//! Ingest pipeline orchestration
//!
//! fetch → parallel extract → merge → upsert. Fetching pages sequentially on
//! the async runtime; tokenization is CPU-bound and runs on a rayon pool
//! inside `spawn_blocking` so the runtime threads stay free.

use crate::db::word_counts::upsert_word_counts;
use crate::services::aggregator::merge_counts;
use crate::services::extractor::NounPhraseExtractor;
use crate::services::normalizer::normalize;
use crate::services::speech_client::{fetch_speeches, SpeechPageSource};
use crate::services::tokenizer::Tokenize;
use crate::types::{SpeechRecord, WordCount};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rayon::prelude::*;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Pipeline tuning knobs
#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Records per API page (the endpoint caps this at 100)
    pub page_size: u32,
    /// Extraction worker threads; 0 means one per available core
    pub max_parallel_extractions: usize,
    /// Strip speaker names and indented lines before tokenization
    pub normalize_text: bool,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_parallel_extractions: 0,
            normalize_text: true,
        }
    }
}

/// What one run accomplished
#[derive(Debug)]
pub struct IngestSummary {
    /// Speeches fetched for the date
    pub speeches: usize,
    /// Distinct words committed for the date
    pub distinct_words: usize,
    /// Fetch aborted mid-pagination; counts cover partial data
    pub truncated: bool,
}

/// One-date ingest run: fetch, extract, aggregate, persist
pub struct IngestPipeline {
    db: SqlitePool,
    tokenizer: Arc<dyn Tokenize>,
    settings: IngestSettings,
}

impl IngestPipeline {
    pub fn new(db: SqlitePool, tokenizer: Arc<dyn Tokenize>, settings: IngestSettings) -> Self {
        Self {
            db,
            tokenizer,
            settings,
        }
    }

    /// Run the pipeline for one date against the given speech source
    pub async fn run<S: SpeechPageSource>(
        &self,
        source: &S,
        date: NaiveDate,
    ) -> Result<IngestSummary> {
        let outcome = fetch_speeches(source, date, 1, self.settings.page_size).await;
        let speeches = outcome.records.len();

        if outcome.truncated {
            warn!(
                date = %date,
                fetched = speeches,
                "Proceeding with partial data after a fetch failure"
            );
        }

        info!(
            speeches,
            "Starting text parsing and word count aggregation"
        );

        let per_speech = self.extract_all(outcome.records).await?;
        let merged = merge_counts(per_speech);

        upsert_word_counts(&self.db, date, &merged)
            .await
            .with_context(|| format!("Failed to save word counts for {date}"))?;

        info!(
            date = %date,
            distinct_words = merged.len(),
            "Word counts for the date have been saved"
        );

        Ok(IngestSummary {
            speeches,
            distinct_words: merged.len(),
            truncated: outcome.truncated,
        })
    }

    /// Extract per-speech counts on a bounded worker pool
    ///
    /// A speech whose tokenization fails is logged and excluded from the
    /// aggregate without aborting sibling tasks.
    async fn extract_all(&self, records: Vec<SpeechRecord>) -> Result<Vec<WordCount>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let total = records.len();
        let extractor = NounPhraseExtractor::new(Arc::clone(&self.tokenizer));
        let normalize_text = self.settings.normalize_text;
        let num_threads = self.settings.max_parallel_extractions;
        let processed = AtomicUsize::new(0);

        let counts = tokio::task::spawn_blocking(move || -> Result<Vec<WordCount>> {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .context("Failed to build extraction thread pool")?;

            let counts = pool.install(|| {
                records
                    .par_iter()
                    .filter_map(|record| {
                        let result = if normalize_text {
                            extractor.extract(&normalize(&record.speech))
                        } else {
                            extractor.extract(&record.speech)
                        };

                        let word_count = match result {
                            Ok(counts) => Some(counts),
                            Err(e) => {
                                warn!(
                                    speech_id = %record.speech_id,
                                    error = %e,
                                    "Skipping speech, tokenization failed"
                                );
                                None
                            }
                        };

                        let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                        if done % 10 == 0 || done == total {
                            info!("Processed {}/{} speeches", done, total);
                        }

                        word_count
                    })
                    .collect()
            });

            Ok(counts)
        })
        .await
        .context("Extraction task panicked")??;

        Ok(counts)
    }
}
