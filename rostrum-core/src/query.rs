//! Talk filtering and lookup for the serving layer.
//!
//! Filters run over the raw, non-deduplicated list; combining several filter
//! fields narrows the result (logical AND). All matching is done per request
//! against the in-memory list — the snapshot is small enough that no index is
//! warranted.

use serde::Deserialize;

use crate::models::SessionRecord;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TalkFilter {
    /// Case-insensitive substring over title + cleaned abstract.
    pub search: Option<String>,
    /// Exact match on the resolved session type.
    #[serde(rename = "type")]
    pub session_type: Option<String>,
    /// Matches talks with at least one time slot on this calendar date.
    pub date: Option<String>,
    /// Case-insensitive substring over participant display names.
    pub speaker: Option<String>,
}

impl TalkFilter {
    fn matches(&self, talk: &SessionRecord) -> bool {
        if let Some(query) = &self.search {
            let query = query.trim().to_lowercase();
            if !query.is_empty() && !talk.search_text().contains(&query) {
                return false;
            }
        }
        if let Some(session_type) = &self.session_type {
            if talk.session_type() != *session_type {
                return false;
            }
        }
        if let Some(date) = &self.date {
            if !talk
                .times
                .iter()
                .any(|slot| slot.date.as_deref() == Some(date.as_str()))
            {
                return false;
            }
        }
        if let Some(speaker) = &self.speaker {
            let speaker = speaker.to_lowercase();
            if !talk
                .participants
                .iter()
                .any(|p| p.display_name().to_lowercase().contains(&speaker))
            {
                return false;
            }
        }
        true
    }
}

pub fn filter_talks<'a>(talks: &'a [SessionRecord], filter: &TalkFilter) -> Vec<&'a SessionRecord> {
    talks.iter().filter(|talk| filter.matches(talk)).collect()
}

/// Find one talk by its dedicated session identifier or its code.
pub fn find_talk<'a>(talks: &'a [SessionRecord], id: &str) -> Option<&'a SessionRecord> {
    talks
        .iter()
        .find(|talk| talk.session_id.as_deref() == Some(id) || talk.code.as_deref() == Some(id))
}
