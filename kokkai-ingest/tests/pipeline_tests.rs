//! Integration tests for pagination and the full ingest pipeline
//!
//! The speech source and the tokenizer are scripted, and persistence runs
//! against an in-memory database, so the whole pipeline is exercised without
//! network access or the real dictionary.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde_json::json;
use sqlx::SqlitePool;

use kokkai_ingest::db::word_counts::load_counts_for_date;
use kokkai_ingest::services::speech_client::{fetch_speeches, FetchError, SpeechPageSource};
use kokkai_ingest::services::tokenizer::{Tokenize, TokenizeError};
use kokkai_ingest::types::{SpeechSearchResponse, Token};
use kokkai_ingest::{IngestPipeline, IngestSettings};

/// Serves a scripted sequence of page responses and counts requests.
/// Panics if the pagination loop requests more pages than were scripted.
struct ScriptedSource {
    pages: Mutex<VecDeque<Result<SpeechSearchResponse, FetchError>>>,
    requests: AtomicUsize,
}

impl ScriptedSource {
    fn new(pages: Vec<Result<SpeechSearchResponse, FetchError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into_iter().collect()),
            requests: AtomicUsize::new(0),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl SpeechPageSource for ScriptedSource {
    async fn fetch_page(
        &self,
        _date: NaiveDate,
        _start_record: u32,
        _maximum_records: u32,
    ) -> Result<SpeechSearchResponse, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .expect("pagination requested a page beyond the scripted responses")
    }
}

/// Page response built from the wire shape the API actually returns
fn page_with_speeches(total: u32, speeches: &[&str]) -> SpeechSearchResponse {
    let records: Vec<_> = speeches
        .iter()
        .enumerate()
        .map(|(i, speech)| {
            json!({
                "speechID": format!("speech-{i}"),
                "speaker": "田中太郎",
                "speech": speech,
            })
        })
        .collect();

    serde_json::from_value(json!({
        "numberOfRecords": total,
        "speechRecord": records,
    }))
    .unwrap()
}

fn page_without_record_array() -> SpeechSearchResponse {
    serde_json::from_value(json!({ "numberOfRecords": 0 })).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::parse_from_str("2024-10-01", "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn test_short_page_stops_pagination() {
    let source = ScriptedSource::new(vec![
        Ok(page_with_speeches(3, &["一", "二"])),
        Ok(page_with_speeches(3, &["三"])),
    ]);

    let outcome = fetch_speeches(&source, date(), 1, 2).await;

    assert_eq!(outcome.records.len(), 3);
    assert!(!outcome.truncated);
    // The short second page ends pagination; no third request is issued
    assert_eq!(source.request_count(), 2);
}

#[tokio::test]
async fn test_missing_record_array_ends_pagination() {
    let source = ScriptedSource::new(vec![
        Ok(page_with_speeches(2, &["一", "二"])),
        Ok(page_without_record_array()),
    ]);

    let outcome = fetch_speeches(&source, date(), 1, 2).await;

    assert_eq!(outcome.records.len(), 2);
    assert!(!outcome.truncated);
    assert_eq!(source.request_count(), 2);
}

#[tokio::test]
async fn test_failed_first_request_yields_empty_outcome() {
    let source = ScriptedSource::new(vec![Err(FetchError::Api(500))]);

    let outcome = fetch_speeches(&source, date(), 1, 100).await;

    assert!(outcome.records.is_empty());
    assert!(outcome.truncated);
    assert_eq!(source.request_count(), 1);
}

#[tokio::test]
async fn test_mid_pagination_failure_keeps_partial_records() {
    let source = ScriptedSource::new(vec![
        Ok(page_with_speeches(4, &["一", "二"])),
        Err(FetchError::Network("connection reset".to_string())),
    ]);

    let outcome = fetch_speeches(&source, date(), 1, 2).await;

    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.truncated);
}

#[tokio::test]
async fn test_zero_results_is_valid() {
    let source = ScriptedSource::new(vec![Ok(page_with_speeches(0, &[]))]);

    let outcome = fetch_speeches(&source, date(), 1, 100).await;

    assert!(outcome.records.is_empty());
    assert!(!outcome.truncated);
}

/// Parses "surface/pos" pairs separated by spaces, e.g. "外務/名詞 は/助詞"
struct SlashTokenizer;

impl Tokenize for SlashTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        Ok(text
            .split_whitespace()
            .filter_map(|pair| pair.split_once('/').map(|(s, p)| Token::new(s, p)))
            .collect())
    }
}

async fn test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    kokkai_common::db::create_word_counts_table(&pool)
        .await
        .expect("Failed to create schema");
    pool
}

fn pipeline(pool: &SqlitePool) -> IngestPipeline {
    IngestPipeline::new(
        pool.clone(),
        Arc::new(SlashTokenizer),
        IngestSettings {
            page_size: 2,
            max_parallel_extractions: 2,
            normalize_text: true,
        },
    )
}

#[tokio::test]
async fn test_pipeline_counts_noun_compounds_across_speeches() {
    let pool = test_pool().await;

    let source = ScriptedSource::new(vec![Ok(page_with_speeches(
        2,
        &[
            "外務/名詞 大臣/名詞 は/助詞 答弁/名詞 する/動詞",
            "外務/名詞 大臣/名詞",
        ],
    ))]);

    let summary = pipeline(&pool).run(&source, date()).await.unwrap();

    assert_eq!(summary.speeches, 2);
    assert_eq!(summary.distinct_words, 2);
    assert!(!summary.truncated);

    let stored = load_counts_for_date(&pool, date()).await.unwrap();
    assert_eq!(stored.get("外務大臣"), Some(&2));
    assert_eq!(stored.get("答弁"), Some(&1));
}

#[tokio::test]
async fn test_rerunning_a_date_accumulates_counts() {
    let pool = test_pool().await;
    let speeches = &["国会/名詞 は/助詞 国会/名詞"];

    for _ in 0..2 {
        let source = ScriptedSource::new(vec![Ok(page_with_speeches(1, speeches))]);
        pipeline(&pool).run(&source, date()).await.unwrap();
    }

    let stored = load_counts_for_date(&pool, date()).await.unwrap();
    assert_eq!(stored.get("国会"), Some(&4));
}

#[tokio::test]
async fn test_pipeline_with_no_speeches_commits_nothing() {
    let pool = test_pool().await;
    let source = ScriptedSource::new(vec![Ok(page_without_record_array())]);

    let summary = pipeline(&pool).run(&source, date()).await.unwrap();

    assert_eq!(summary.speeches, 0);
    assert_eq!(summary.distinct_words, 0);

    let stored = load_counts_for_date(&pool, date()).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_pipeline_commits_partial_data_after_fetch_failure() {
    let pool = test_pool().await;

    let source = ScriptedSource::new(vec![
        Ok(page_with_speeches(4, &["予算/名詞", "予算/名詞"])),
        Err(FetchError::Api(503)),
    ]);

    let summary = pipeline(&pool).run(&source, date()).await.unwrap();

    assert!(summary.truncated);
    assert_eq!(summary.speeches, 2);

    let stored = load_counts_for_date(&pool, date()).await.unwrap();
    assert_eq!(stored.get("予算"), Some(&2));
}
