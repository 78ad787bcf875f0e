//! Per-speech count aggregation
//!
//! The merge sums counts per key, so it is commutative and associative and
//! the final mapping is independent of worker completion order.

use crate::types::WordCount;

/// Merge per-speech word counts into one mapping by summing per key
pub fn merge_counts<I>(counts: I) -> WordCount
where
    I: IntoIterator<Item = WordCount>,
{
    let mut merged = WordCount::new();
    for map in counts {
        for (word, count) in map {
            *merged.entry(word).or_insert(0) += count;
        }
    }
    merged
}
