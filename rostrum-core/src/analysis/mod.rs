//! Aggregation engine — derived views over the catalog snapshot.
//!
//! Five independent passes over the immutable record list:
//! - `basic`    — talk counts per type/language over the deduplicated set
//! - `schedule` — day/slot/room occurrence counts and parallelism
//! - `speakers` — per-speaker accumulation and company counts
//! - `topics`   — word/technology frequencies over title + abstract text
//! - `rooms`    — room usage and capacity aggregates
//!
//! Only basic stats deduplicates. Every other pass deliberately consumes the
//! raw sequence: schedule, room and speaker analyses are defined over session
//! *occurrences*, so a talk appearing twice in the feed counts once in
//! `totalTalks` but contributes two occurrences everywhere else.

pub mod basic;
pub mod rooms;
pub mod schedule;
pub mod speakers;
pub mod topics;

use std::path::Path;

use chrono::Utc;
use indexmap::IndexMap;

use crate::error::CoreError;
use crate::models::{FullAnalysis, SessionRecord};
use crate::snapshot;

/// Collapse the raw sequence to first-seen records per identity key.
pub fn unique_talks(talks: &[SessionRecord]) -> IndexMap<String, &SessionRecord> {
    let mut seen: IndexMap<String, &SessionRecord> = IndexMap::new();
    for talk in talks {
        seen.entry(talk.identity_key()).or_insert(talk);
    }
    seen
}

/// Holds the record list for one load cycle and derives read-only aggregates.
/// The list is immutable for the lifetime of the instance.
pub struct Analyzer {
    talks: Vec<SessionRecord>,
}

impl Analyzer {
    pub fn new(talks: Vec<SessionRecord>) -> Self {
        Self { talks }
    }

    /// Load from the persisted snapshot. The only fallible step in the
    /// engine; read/parse failures surface to the caller.
    pub fn from_snapshot(path: &Path) -> Result<Self, CoreError> {
        Ok(Self::new(snapshot::load_snapshot(path)?))
    }

    /// The raw, non-deduplicated record list, exposed for the serving layer.
    pub fn talks(&self) -> &[SessionRecord] {
        &self.talks
    }

    pub fn len(&self) -> usize {
        self.talks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.talks.is_empty()
    }

    /// Run all five passes and merge their outputs with a fresh timestamp.
    /// Safe to call repeatedly; only `lastUpdated` varies between calls.
    pub fn full_analysis(&self) -> FullAnalysis {
        FullAnalysis {
            basic_stats: basic::basic_stats(&self.talks),
            schedule: schedule::schedule_analysis(&self.talks),
            speakers: speakers::speaker_analysis(&self.talks),
            topics: topics::topic_analysis(&self.talks),
            rooms: rooms::room_analysis(&self.talks),
            last_updated: Utc::now(),
        }
    }
}

/// Round to one decimal place, the precision the dashboard renders.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
