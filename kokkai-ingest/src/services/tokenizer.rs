//! Morphological tokenizer adapter
//!
//! The extractor only needs an ordered token stream with surface text and a
//! leading part-of-speech category, so the analyzer sits behind the narrow
//! `Tokenize` trait and tests script their own token sequences.

use crate::types::Token;
use lindera::{DictionaryConfig, DictionaryKind, Mode, Tokenizer, TokenizerConfig};
use thiserror::Error;

/// Tokenizer adapter errors
#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("Tokenizer initialization failed: {0}")]
    Init(String),

    #[error("Tokenization failed: {0}")]
    Analyze(String),
}

/// Narrow tokenization capability
///
/// `Send + Sync` so one instance can be shared across the extraction worker
/// pool; implementations must hold no per-call mutable state.
pub trait Tokenize: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError>;
}

/// Lindera-backed tokenizer using the bundled IPADIC dictionary
pub struct LinderaTokenizer {
    inner: Tokenizer,
}

impl LinderaTokenizer {
    pub fn new() -> Result<Self, TokenizeError> {
        let dictionary = DictionaryConfig {
            kind: Some(DictionaryKind::IPADIC),
            path: None,
        };

        let config = TokenizerConfig {
            dictionary,
            user_dictionary: None,
            mode: Mode::Normal,
        };

        let inner =
            Tokenizer::from_config(config).map_err(|e| TokenizeError::Init(e.to_string()))?;

        Ok(Self { inner })
    }
}

impl Tokenize for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        let tokens = self
            .inner
            .tokenize(text)
            .map_err(|e| TokenizeError::Analyze(e.to_string()))?;

        let mut out = Vec::with_capacity(tokens.len());
        for mut token in tokens {
            // details()[0] is the leading part-of-speech category; unknown
            // words carry "UNK" and never match the noun check.
            let part_of_speech = token
                .get_details()
                .and_then(|details| details.first().map(|s| s.to_string()))
                .unwrap_or_default();
            out.push(Token {
                surface: token.text.to_string(),
                part_of_speech,
            });
        }

        Ok(out)
    }
}
