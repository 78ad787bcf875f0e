//! Database operations for the ingest pipeline

pub mod word_counts;

pub use word_counts::*;
