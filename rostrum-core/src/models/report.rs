use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    pub total_talks: usize,
    pub talk_types: IndexMap<String, usize>,
    pub languages: IndexMap<String, usize>,
    pub avg_talk_length: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAnalysis {
    pub by_day: IndexMap<String, usize>,
    pub by_time_slot: IndexMap<String, usize>,
    pub by_room: IndexMap<String, usize>,
    pub parallel_sessions: IndexMap<String, usize>,
    pub avg_parallel_sessions: f64,
    pub max_parallel_sessions: usize,
    pub total_time_slots: usize,
}

/// Reference to one talk a speaker appears on. Repeated talk/speaker pairs in
/// the raw feed produce repeated entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkRef {
    pub title: String,
    pub code: String,
    #[serde(rename = "type")]
    pub talk_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerProfile {
    pub name: String,
    pub company: String,
    pub job_title: String,
    pub talk_count: usize,
    pub talks: Vec<TalkRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerAnalysis {
    pub speakers: Vec<SpeakerProfile>,
    pub companies: Vec<CompanyCount>,
    pub avg_talks_per_speaker: f64,
    /// talk-count value → number of speakers currently holding that count.
    pub speaker_talk_distribution: BTreeMap<usize, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicAnalysis {
    pub top_words: Vec<WordCount>,
    pub top_technologies: Vec<WordCount>,
    pub total_unique_words: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUsage {
    pub name: String,
    /// First capacity value seen for the room; later slots do not update it.
    pub capacity: i64,
    pub session_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAnalysis {
    pub rooms: Vec<RoomUsage>,
    pub avg_room_capacity: i64,
    pub total_capacity: i64,
}

/// The combined analytics snapshot served to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullAnalysis {
    pub basic_stats: BasicStats,
    pub schedule: ScheduleAnalysis,
    pub speakers: SpeakerAnalysis,
    pub topics: TopicAnalysis,
    pub rooms: RoomAnalysis,
    pub last_updated: DateTime<Utc>,
}
