//! Noun-phrase extraction
//!
//! Consecutive noun tokens merge into one compound surface string, so
//! "外務" + "大臣" counts once as "外務大臣" rather than as two morphemes.
//! This compounding is the central design choice of the extractor.

use crate::services::tokenizer::{Tokenize, TokenizeError};
use crate::types::WordCount;
use std::sync::Arc;

/// Extracts noun-compound occurrence counts from one text
pub struct NounPhraseExtractor {
    tokenizer: Arc<dyn Tokenize>,
}

impl NounPhraseExtractor {
    pub fn new(tokenizer: Arc<dyn Tokenize>) -> Self {
        Self { tokenizer }
    }

    /// Count noun-compound occurrences within one text
    ///
    /// Walks the token stream in order, appending noun surfaces to a pending
    /// compound; any non-noun token flushes the compound as one observed
    /// word, and a trailing compound is flushed after the stream ends.
    pub fn extract(&self, text: &str) -> Result<WordCount, TokenizeError> {
        let tokens = self.tokenizer.tokenize(text)?;

        let mut counts = WordCount::new();
        let mut compound = String::new();

        for token in tokens {
            if token.is_noun() {
                compound.push_str(&token.surface);
            } else if !compound.is_empty() {
                *counts.entry(std::mem::take(&mut compound)).or_insert(0) += 1;
            }
        }

        if !compound.is_empty() {
            *counts.entry(compound).or_insert(0) += 1;
        }

        Ok(counts)
    }
}
