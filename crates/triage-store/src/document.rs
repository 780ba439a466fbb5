//! Conversion between `ClaimRecord` and the flat persisted document
//!
//! The persisted shape is a flat map of string values: the schema's JSON
//! keys plus `_id`, `claim_id` and `Processed_On`, with identity fields and
//! `raw_output` only when present.

use crate::StoreError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use triage_domain::{ClaimRecord, Field};

/// Document key holding the primary key
pub const ID_KEY: &str = "_id";

/// Document key holding the claim id (mirrors `_id`)
pub const CLAIM_ID_KEY: &str = "claim_id";

/// Document key holding the processing timestamp
pub const PROCESSED_ON_KEY: &str = "Processed_On";

/// Document key holding the raw model reply of a degraded record
pub const RAW_OUTPUT_KEY: &str = "raw_output";

const TRIAGE_FIELDS: [Field; 7] = [
    Field::ClaimType,
    Field::Summary,
    Field::Severity,
    Field::Risk,
    Field::Priority,
    Field::RedFlags,
    Field::Recommendation,
];

const EXTRA_IDENTITY_FIELDS: [Field; 2] = [Field::InsuredName, Field::PolicyNumber];

/// Flatten a record into its persisted document
pub fn to_document(record: &ClaimRecord) -> Map<String, Value> {
    let mut doc = Map::new();
    doc.insert(ID_KEY.to_string(), Value::String(record.claim_id.clone()));
    doc.insert(CLAIM_ID_KEY.to_string(), Value::String(record.claim_id.clone()));

    if let Some(extra) = &record.extra_identity_fields {
        for (key, value) in extra {
            doc.insert(key.clone(), Value::String(value.clone()));
        }
    }

    for field in TRIAGE_FIELDS {
        let value = record.value(field).unwrap_or_default();
        doc.insert(field.key().to_string(), Value::String(value.to_string()));
    }

    if let Some(raw) = &record.raw_output {
        doc.insert(RAW_OUTPUT_KEY.to_string(), Value::String(raw.clone()));
    }

    doc.insert(PROCESSED_ON_KEY.to_string(), Value::String(record.processed_on()));
    doc
}

/// Rebuild a record from a persisted document
pub fn from_document(doc: &Map<String, Value>) -> Result<ClaimRecord, StoreError> {
    let claim_id = string_value(doc, ID_KEY)
        .ok_or_else(|| StoreError::InvalidData(format!("document has no '{}'", ID_KEY)))?;

    let processed_on = string_value(doc, PROCESSED_ON_KEY).ok_or_else(|| {
        StoreError::InvalidData(format!("document has no '{}'", PROCESSED_ON_KEY))
    })?;
    let processed_at = DateTime::parse_from_rfc3339(processed_on)
        .map_err(|e| StoreError::InvalidData(format!("bad timestamp '{}': {}", processed_on, e)))?
        .with_timezone(&Utc);

    let mut record = ClaimRecord::empty(claim_id, processed_at);
    for field in TRIAGE_FIELDS {
        if let (Some(slot), Some(value)) = (record.triage_value_mut(field), string_value(doc, field.key())) {
            *slot = value.to_string();
        }
    }

    let extra: BTreeMap<String, String> = EXTRA_IDENTITY_FIELDS
        .iter()
        .filter_map(|field| {
            string_value(doc, field.key()).map(|v| (field.key().to_string(), v.to_string()))
        })
        .collect();
    if !extra.is_empty() {
        record.extra_identity_fields = Some(extra);
    }

    record.raw_output = string_value(doc, RAW_OUTPUT_KEY).map(str::to_string);
    Ok(record)
}

fn string_value<'a>(doc: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> ClaimRecord {
        let mut record = ClaimRecord::empty(
            "CLAIM12345",
            Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        );
        record.claim_type = "Auto".to_string();
        record.priority = "Low".to_string();
        record
    }

    #[test]
    fn test_document_is_flat_strings() {
        let doc = to_document(&sample_record());
        assert!(doc.values().all(Value::is_string));
        assert_eq!(doc[ID_KEY], "CLAIM12345");
        assert_eq!(doc[CLAIM_ID_KEY], "CLAIM12345");
        assert_eq!(doc["claim_type"], "Auto");
        assert_eq!(doc["red_flags"], "");
        assert_eq!(doc[PROCESSED_ON_KEY], "2025-01-02T03:04:05Z");
        assert!(!doc.contains_key(RAW_OUTPUT_KEY));
    }

    #[test]
    fn test_document_round_trip_with_extras() {
        let mut record = sample_record();
        let mut extra = BTreeMap::new();
        extra.insert("policy_number".to_string(), "POL-7".to_string());
        record.extra_identity_fields = Some(extra);
        record.raw_output = Some("garbled".to_string());

        let doc = to_document(&record);
        assert_eq!(doc["policy_number"], "POL-7");
        assert_eq!(from_document(&doc).unwrap(), record);
    }

    #[test]
    fn test_document_missing_id() {
        let mut doc = to_document(&sample_record());
        doc.remove(ID_KEY);
        assert!(matches!(from_document(&doc), Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_document_bad_timestamp() {
        let mut doc = to_document(&sample_record());
        doc.insert(PROCESSED_ON_KEY.to_string(), Value::String("yesterday".into()));
        assert!(matches!(from_document(&doc), Err(StoreError::InvalidData(_))));
    }
}
