//! National Diet speech-search API client
//!
//! Paginates the speech endpoint for a single-day window, accumulating all
//! returned records until a short page or an error terminates the loop.

use crate::types::{SpeechRecord, SpeechSearchResponse};
use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

const KOKKAI_API_BASE_URL: &str = "https://kokkai.ndl.go.jp/api/speech";
const USER_AGENT: &str = "kokkai-ingest/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Speech API client errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: status {0}")]
    Api(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One-page request seam, so the pagination loop is testable against a
/// scripted source without touching the network.
#[allow(async_fn_in_trait)]
pub trait SpeechPageSource {
    async fn fetch_page(
        &self,
        date: NaiveDate,
        start_record: u32,
        maximum_records: u32,
    ) -> Result<SpeechSearchResponse, FetchError>;
}

/// HTTP client for the speech-search endpoint
pub struct SpeechClient {
    http_client: reqwest::Client,
}

impl SpeechClient {
    pub fn new() -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }
}

impl SpeechPageSource for SpeechClient {
    async fn fetch_page(
        &self,
        date: NaiveDate,
        start_record: u32,
        maximum_records: u32,
    ) -> Result<SpeechSearchResponse, FetchError> {
        let day = date.format("%Y-%m-%d").to_string();
        let start = start_record.to_string();
        let max = maximum_records.to_string();

        tracing::debug!(date = %day, start_record = %start, "Querying speech API");

        let response = self
            .http_client
            .get(KOKKAI_API_BASE_URL)
            .query(&[
                ("from", day.as_str()),
                ("until", day.as_str()),
                ("startRecord", start.as_str()),
                ("maximumRecords", max.as_str()),
                ("recordPacking", "json"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

/// Result of a pagination run
///
/// `truncated` is set when a mid-pagination request failed and the records
/// list holds only what was accumulated before the failure.
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<SpeechRecord>,
    pub truncated: bool,
}

/// Fetch all speech records for one date
///
/// Pages sequentially from `start_record`, stopping on a short page, a page
/// with no record array, or a failed request. A failed request terminates
/// pagination with the partial accumulation rather than raising; callers can
/// check `FetchOutcome::truncated`. Zero records for a date is valid and
/// yields an empty outcome.
pub async fn fetch_speeches<S: SpeechPageSource>(
    source: &S,
    date: NaiveDate,
    start_record: u32,
    page_size: u32,
) -> FetchOutcome {
    let mut records: Vec<SpeechRecord> = Vec::new();
    let mut truncated = false;
    let mut offset = start_record;

    loop {
        tracing::info!(
            date = %date,
            from = offset,
            to = offset + page_size - 1,
            "Fetching speech records"
        );

        match source.fetch_page(date, offset, page_size).await {
            Ok(page) => match page.speech_record {
                Some(batch) => {
                    let returned = batch.len();
                    records.extend(batch);
                    tracing::info!(
                        retrieved = returned,
                        total = records.len(),
                        of = page.number_of_records,
                        "Retrieved speech records"
                    );

                    if (returned as u32) < page_size {
                        tracing::info!(date = %date, "All records for the date have been fetched");
                        break;
                    }
                    offset += page_size;
                }
                None => {
                    tracing::info!(date = %date, "No more speech records found");
                    break;
                }
            },
            Err(e) => {
                tracing::warn!(
                    date = %date,
                    start_record = offset,
                    error = %e,
                    "Speech fetch failed; continuing with partial results"
                );
                truncated = true;
                break;
            }
        }
    }

    FetchOutcome { records, truncated }
}
