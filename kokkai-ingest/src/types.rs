//! Wire models for the speech-search API and the in-memory count mapping

use serde::Deserialize;
use std::collections::HashMap;

/// Mapping from word (noun or noun-compound surface form) to occurrence count
pub type WordCount = HashMap<String, u64>;

/// One page of the speech-search endpoint
///
/// A missing `speechRecord` array means no more data for the window, which
/// the API uses instead of an empty array.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSearchResponse {
    /// Total matching records for the search window
    #[serde(rename = "numberOfRecords", default)]
    pub number_of_records: Option<u32>,
    /// Records in this page
    #[serde(rename = "speechRecord", default)]
    pub speech_record: Option<Vec<SpeechRecord>>,
}

/// One transcript unit as returned by the source API
///
/// Only `speech` feeds the pipeline; `speechID` is kept for log context.
/// Everything else the API sends is ignored by the deserializer.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechRecord {
    /// Source identifier for the speech
    #[serde(rename = "speechID", default)]
    pub speech_id: String,
    /// Raw transcript text
    #[serde(default)]
    pub speech: String,
}

/// Morphologically tagged token produced by the tokenizer adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface text as it appears in the input
    pub surface: String,
    /// Leading part-of-speech category (e.g. "名詞", "助詞")
    pub part_of_speech: String,
}

impl Token {
    pub fn new(surface: impl Into<String>, part_of_speech: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            part_of_speech: part_of_speech.into(),
        }
    }

    /// Whether the leading part-of-speech category marks a noun
    pub fn is_noun(&self) -> bool {
        self.part_of_speech == "名詞"
    }
}
