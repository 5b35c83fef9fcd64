//! Snapshot loading and raw-document normalization.
//!
//! The upstream catalog API answers in one of two top-level shapes:
//! - `{ "sectionList": [ { "items": [...] }, ... ], "totalSearchItems": n }`
//! - `{ "items": [...] }` (also the shape the fetcher persists)
//!
//! `normalize` accepts either uniformly. A document matching neither shape
//! yields an empty record list — downstream passes tolerate zero records.
//! Only reading/parsing the snapshot file itself can fail, and that failure
//! is fatal to analyzer construction.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::SessionRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawCatalog {
    pub section_list: Option<Vec<RawSection>>,
    pub items: Option<Vec<SessionRecord>>,
    pub total_search_items: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSection {
    pub items: Vec<SessionRecord>,
}

/// Flatten a raw catalog document into the session record list.
///
/// Section wrappers win when they carry any items (every section is walked);
/// otherwise a top-level `items` array is used as-is.
pub fn normalize(doc: RawCatalog) -> Vec<SessionRecord> {
    if let Some(sections) = doc.section_list {
        let records: Vec<SessionRecord> =
            sections.into_iter().flat_map(|s| s.items).collect();
        if !records.is_empty() {
            return records;
        }
    }
    doc.items.unwrap_or_default()
}

/// Read and normalize the persisted snapshot.
pub fn load_snapshot(path: &Path) -> Result<Vec<SessionRecord>, CoreError> {
    let raw = std::fs::read_to_string(path)?;
    let doc: RawCatalog = serde_json::from_str(&raw)?;
    let records = normalize(doc);
    tracing::info!(
        "Loaded {} session records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Persist a merged record list in the flat `{ "items": [...] }` shape.
pub fn write_snapshot(path: &Path, records: &[SessionRecord]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let doc = RawCatalog {
        section_list: None,
        items: Some(records.to_vec()),
        total_search_items: Some(records.len() as u64),
    };
    std::fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_section_wrapper() {
        let doc: RawCatalog = serde_json::from_str(
            r#"{
                "sectionList": [
                    {"items": [{"code": "A1", "title": "First"}]},
                    {"items": [{"code": "B2", "title": "Second"}]}
                ],
                "totalSearchItems": 2
            }"#,
        )
        .unwrap();
        let records = normalize(doc);
        assert_eq!(records.len(), 2, "every section's items must be collected");
        assert_eq!(records[0].code.as_deref(), Some("A1"));
        assert_eq!(records[1].code.as_deref(), Some("B2"));
    }

    #[test]
    fn test_normalize_flat_items() {
        let doc: RawCatalog =
            serde_json::from_str(r#"{"items": [{"code": "A1"}]}"#).unwrap();
        assert_eq!(normalize(doc).len(), 1);
    }

    #[test]
    fn test_empty_sections_fall_back_to_items() {
        let doc: RawCatalog = serde_json::from_str(
            r#"{"sectionList": [{"items": []}], "items": [{"code": "A1"}]}"#,
        )
        .unwrap();
        assert_eq!(normalize(doc).len(), 1);
    }

    #[test]
    fn test_unrecognized_shape_yields_empty() {
        let doc: RawCatalog = serde_json::from_str(r#"{"unexpected": true}"#).unwrap();
        assert!(normalize(doc).is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let records = vec![
            SessionRecord {
                code: Some("A1".into()),
                title: Some("Round trip".into()),
                ..Default::default()
            },
            SessionRecord {
                code: Some("B2".into()),
                ..Default::default()
            },
        ];
        write_snapshot(&path, &records).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].code.as_deref(), Some("A1"));
    }

    #[test]
    fn test_missing_snapshot_is_fatal() {
        let err = load_snapshot(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
