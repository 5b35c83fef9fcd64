//! Schedule analysis — occurrence counts per day, slot and room.

use indexmap::IndexMap;

use crate::models::{ScheduleAnalysis, SessionRecord};

use super::round1;

/// Every time slot of every raw record counts as one occurrence; duplicate
/// records contribute duplicate occurrences on purpose. A `day_slot` key
/// shared by many sessions means parallel tracks, not an error.
pub fn schedule_analysis(talks: &[SessionRecord]) -> ScheduleAnalysis {
    let mut by_day: IndexMap<String, usize> = IndexMap::new();
    let mut by_time_slot: IndexMap<String, usize> = IndexMap::new();
    let mut by_room: IndexMap<String, usize> = IndexMap::new();
    let mut parallel_sessions: IndexMap<String, usize> = IndexMap::new();

    for talk in talks {
        for slot in &talk.times {
            let day = slot.day();
            let label = slot.slot_label();
            *by_day.entry(day.clone()).or_insert(0) += 1;
            *by_time_slot.entry(label.clone()).or_insert(0) += 1;
            *by_room.entry(slot.room_name()).or_insert(0) += 1;
            *parallel_sessions.entry(format!("{day}_{label}")).or_insert(0) += 1;
        }
    }

    let max_parallel_sessions = parallel_sessions.values().copied().max().unwrap_or(0);
    let avg_parallel_sessions = if parallel_sessions.is_empty() {
        0.0
    } else {
        let sum: usize = parallel_sessions.values().sum();
        round1(sum as f64 / parallel_sessions.len() as f64)
    };
    let total_time_slots = parallel_sessions.len();

    ScheduleAnalysis {
        by_day,
        by_time_slot,
        by_room,
        parallel_sessions,
        avg_parallel_sessions,
        max_parallel_sessions,
        total_time_slots,
    }
}
