//! Room analysis — usage and capacity aggregates per room.

use indexmap::IndexMap;

use crate::models::{RoomAnalysis, RoomUsage, SessionRecord};

/// Groups every raw time-slot occurrence by room. A room's capacity is fixed
/// at first sight; capacity averages consider only positive values (zero
/// means absent or unparsable upstream).
pub fn room_analysis(talks: &[SessionRecord]) -> RoomAnalysis {
    let mut rooms: IndexMap<String, RoomUsage> = IndexMap::new();
    let mut positive_capacities: Vec<i64> = Vec::new();

    for talk in talks {
        for slot in &talk.times {
            let name = slot.room_name();
            let capacity = slot.capacity_value();
            let entry = rooms.entry(name.clone()).or_insert_with(|| RoomUsage {
                name,
                capacity,
                session_count: 0,
            });
            entry.session_count += 1;
            if capacity > 0 {
                positive_capacities.push(capacity);
            }
        }
    }

    let total_capacity: i64 = positive_capacities.iter().sum();
    let avg_room_capacity = if positive_capacities.is_empty() {
        0
    } else {
        (total_capacity as f64 / positive_capacities.len() as f64).round() as i64
    };

    let mut room_list: Vec<RoomUsage> = rooms.into_values().collect();
    room_list.sort_by(|a, b| b.session_count.cmp(&a.session_count));

    RoomAnalysis {
        rooms: room_list,
        avg_room_capacity,
        total_capacity,
    }
}
