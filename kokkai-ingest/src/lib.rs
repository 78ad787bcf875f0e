//! kokkai-ingest - Diet speech word-count ingest
//!
//! Fetches all speech transcripts for one date from the National Diet
//! speech-search API, extracts noun-compound occurrence counts in parallel,
//! and accumulates them into the `word_counts` table.

pub mod db;
pub mod pipeline;
pub mod services;
pub mod types;

pub use pipeline::{IngestPipeline, IngestSettings, IngestSummary};
