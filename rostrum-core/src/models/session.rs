use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::text::clean_markup;

/// Fallback bucket for sessions/speakers with no usable label.
pub const UNKNOWN: &str = "Unknown";

/// Room assigned to time slots that carry no room at all.
pub const DEFAULT_ROOM: &str = "Virtual/TBD";

/// Assumed talk length in minutes when no record carries a usable one.
pub const DEFAULT_TALK_LENGTH: i64 = 60;

/// A scalar the upstream API serializes inconsistently: sometimes a JSON
/// number, sometimes a numeric string, occasionally garbage. Deserialization
/// never fails; interpretation happens in `as_f64`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexScalar {
    Number(f64),
    Text(String),
    Other(Value),
}

impl FlexScalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlexScalar::Number(n) => Some(*n),
            FlexScalar::Text(s) => s.trim().parse::<f64>().ok(),
            FlexScalar::Other(_) => None,
        }
    }
}

/// Accepts a JSON string or number as a string; anything else becomes `None`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Picks the first candidate that is present and non-empty after trimming.
/// Empty strings count as absent everywhere a priority chain is resolved.
fn first_non_empty(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .map(|s| (*s).to_string())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub code: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(rename = "sessionID", deserialize_with = "string_or_number")]
    pub session_id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_html: Option<String>,
    #[serde(rename = "type")]
    pub session_type: Option<String>,
    pub language: Option<String>,
    pub length: Option<FlexScalar>,
    pub participants: Vec<Participant>,
    pub times: Vec<TimeSlot>,
}

impl SessionRecord {
    /// Identity key: `code`, else `id`, else `title`. Records with none of the
    /// three share the empty key and collapse together during deduplication.
    pub fn identity_key(&self) -> String {
        first_non_empty(&[
            self.code.as_deref(),
            self.id.as_deref(),
            self.title.as_deref(),
        ])
        .unwrap_or_default()
    }

    pub fn display_title(&self) -> String {
        first_non_empty(&[self.title.as_deref()]).unwrap_or_else(|| "Untitled".to_string())
    }

    pub fn session_type(&self) -> String {
        first_non_empty(&[self.session_type.as_deref()]).unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn language(&self) -> String {
        first_non_empty(&[self.language.as_deref()]).unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Length in minutes when the field is a number or parses as one.
    /// Non-numeric values are excluded from averages, never coerced to zero.
    pub fn length_minutes(&self) -> Option<f64> {
        self.length.as_ref().and_then(FlexScalar::as_f64)
    }

    /// Lowercased title + cleaned abstract, used for substring search.
    pub fn search_text(&self) -> String {
        format!(
            "{} {}",
            self.title.as_deref().unwrap_or_default(),
            clean_markup(self.abstract_html.as_deref())
        )
        .to_lowercase()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Participant {
    #[serde(deserialize_with = "string_or_number")]
    pub speaker_id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub global_speaker_id: Option<String>,
    pub full_name: Option<String>,
    pub global_full_name: Option<String>,
    pub company_name: Option<String>,
    pub global_company: Option<String>,
    pub job_title: Option<String>,
    #[serde(rename = "globalJobtitle")]
    pub global_job_title: Option<String>,
    pub bio: Option<String>,
    pub global_bio: Option<String>,
}

impl Participant {
    /// Identity key: speakerId, globalSpeakerId, fullName, globalFullName,
    /// else "Unknown". Stable across sessions so repeat speakers accumulate.
    pub fn identity_key(&self) -> String {
        first_non_empty(&[
            self.speaker_id.as_deref(),
            self.global_speaker_id.as_deref(),
            self.full_name.as_deref(),
            self.global_full_name.as_deref(),
        ])
        .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Display name: fullName, else globalFullName, else "Unknown".
    pub fn display_name(&self) -> String {
        first_non_empty(&[self.full_name.as_deref(), self.global_full_name.as_deref()])
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Company: companyName, else globalCompany, else "Unknown".
    pub fn company(&self) -> String {
        first_non_empty(&[self.company_name.as_deref(), self.global_company.as_deref()])
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Job title: jobTitle, else globalJobtitle, else empty.
    pub fn job_title(&self) -> String {
        first_non_empty(&[self.job_title.as_deref(), self.global_job_title.as_deref()])
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeSlot {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub start_time_formatted: Option<String>,
    pub end_time: Option<String>,
    pub end_time_formatted: Option<String>,
    pub room: Option<String>,
    pub capacity: Option<FlexScalar>,
}

impl TimeSlot {
    pub fn day(&self) -> String {
        first_non_empty(&[self.date.as_deref()]).unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Slot label: startTimeFormatted, else startTime, else "Unknown".
    pub fn slot_label(&self) -> String {
        first_non_empty(&[
            self.start_time_formatted.as_deref(),
            self.start_time.as_deref(),
        ])
        .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn room_name(&self) -> String {
        first_non_empty(&[self.room.as_deref()]).unwrap_or_else(|| DEFAULT_ROOM.to_string())
    }

    /// Capacity coerced to 0 when absent or unparsable. Positive-value
    /// averages exclude zeros downstream.
    pub fn capacity_value(&self) -> i64 {
        self.capacity
            .as_ref()
            .and_then(FlexScalar::as_f64)
            .map(|c| c as i64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_priority() {
        let mut talk = SessionRecord {
            code: Some("A1".into()),
            id: Some("999".into()),
            title: Some("Title".into()),
            ..Default::default()
        };
        assert_eq!(talk.identity_key(), "A1");

        talk.code = None;
        assert_eq!(talk.identity_key(), "999");

        talk.id = Some("  ".into());
        assert_eq!(talk.identity_key(), "Title", "blank id must be skipped");

        talk.title = None;
        assert_eq!(talk.identity_key(), "");
    }

    #[test]
    fn test_numeric_id_deserializes_as_string() {
        let talk: SessionRecord =
            serde_json::from_str(r#"{"id": 4217, "title": "Numeric id"}"#).unwrap();
        assert_eq!(talk.id.as_deref(), Some("4217"));
        assert_eq!(talk.identity_key(), "4217");
    }

    #[test]
    fn test_length_minutes_parsing() {
        let talk: SessionRecord = serde_json::from_str(r#"{"length": 45}"#).unwrap();
        assert_eq!(talk.length_minutes(), Some(45.0));

        let talk: SessionRecord = serde_json::from_str(r#"{"length": "30"}"#).unwrap();
        assert_eq!(talk.length_minutes(), Some(30.0));

        let talk: SessionRecord = serde_json::from_str(r#"{"length": "an hour"}"#).unwrap();
        assert_eq!(talk.length_minutes(), None, "non-numeric length is excluded, not zeroed");

        let talk: SessionRecord = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(talk.length_minutes(), None);
    }

    #[test]
    fn test_participant_fallback_chains() {
        let p: Participant = serde_json::from_str(
            r#"{"globalFullName": "Ada Lovelace", "globalCompany": "Analytical Engines"}"#,
        )
        .unwrap();
        assert_eq!(p.identity_key(), "Ada Lovelace");
        assert_eq!(p.display_name(), "Ada Lovelace");
        assert_eq!(p.company(), "Analytical Engines");
        assert_eq!(p.job_title(), "");

        let p = Participant::default();
        assert_eq!(p.identity_key(), UNKNOWN);
        assert_eq!(p.display_name(), UNKNOWN);
        assert_eq!(p.company(), UNKNOWN);
    }

    #[test]
    fn test_time_slot_defaults() {
        let slot = TimeSlot::default();
        assert_eq!(slot.room_name(), DEFAULT_ROOM);
        assert_eq!(slot.day(), UNKNOWN);
        assert_eq!(slot.slot_label(), UNKNOWN);
        assert_eq!(slot.capacity_value(), 0);
    }

    #[test]
    fn test_capacity_coercion() {
        let slot: TimeSlot = serde_json::from_str(r#"{"capacity": "250"}"#).unwrap();
        assert_eq!(slot.capacity_value(), 250);

        let slot: TimeSlot = serde_json::from_str(r#"{"capacity": "TBD"}"#).unwrap();
        assert_eq!(slot.capacity_value(), 0);

        let slot: TimeSlot = serde_json::from_str(r#"{"capacity": null}"#).unwrap();
        assert_eq!(slot.capacity_value(), 0);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let talk: SessionRecord = serde_json::from_str(
            r#"{"title": "T", "trackName": "Cloud", "sponsored": true}"#,
        )
        .unwrap();
        assert_eq!(talk.title.as_deref(), Some("T"));
    }
}
