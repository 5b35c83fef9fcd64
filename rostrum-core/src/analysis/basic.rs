//! Basic stats — talk counts over the deduplicated set.

use indexmap::IndexMap;

use crate::models::{BasicStats, SessionRecord, DEFAULT_TALK_LENGTH};

use super::unique_talks;

/// Counts run over deduplicated talks; the length average deliberately runs
/// over the raw sequence, valid values only.
pub fn basic_stats(talks: &[SessionRecord]) -> BasicStats {
    let unique = unique_talks(talks);

    let mut talk_types: IndexMap<String, usize> = IndexMap::new();
    let mut languages: IndexMap<String, usize> = IndexMap::new();
    for talk in unique.values() {
        *talk_types.entry(talk.session_type()).or_insert(0) += 1;
        *languages.entry(talk.language()).or_insert(0) += 1;
    }

    let lengths: Vec<f64> = talks.iter().filter_map(SessionRecord::length_minutes).collect();
    let avg_talk_length = if lengths.is_empty() {
        DEFAULT_TALK_LENGTH
    } else {
        (lengths.iter().sum::<f64>() / lengths.len() as f64).round() as i64
    };

    BasicStats {
        total_talks: unique.len(),
        talk_types,
        languages,
        avg_talk_length,
    }
}
