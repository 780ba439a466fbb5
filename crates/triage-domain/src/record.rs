//! Claim record module - the canonical output of triaging one document

use crate::schema::Field;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel claim id used when neither the operator nor the model supplied one
pub const UNKNOWN_CLAIM_ID: &str = "Unknown";

/// Field values parsed from a model reply
///
/// Keys are kept exactly as the model emitted them, including keys the
/// schema does not know about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFields(BTreeMap<String, String>);

impl ClaimFields {
    /// Create an empty field set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under a raw key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a value by its raw key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Get a schema field, trying the JSON key first and the display label second
    pub fn lookup(&self, field: Field) -> Option<&str> {
        self.get(field.key()).or_else(|| self.get(field.label()))
    }

    /// Number of parsed keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keys were parsed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all parsed key/value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for ClaimFields {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for ClaimFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The full text of a model reply that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOutput(String);

impl RawOutput {
    /// Wrap a raw reply
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the raw text
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Consume into the raw text
    pub fn into_text(self) -> String {
        self.0
    }
}

/// Result of parsing a model reply
///
/// `Raw` is not an error: it is the degraded path, and a record is still
/// assembled and persisted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The reply contained a JSON object of string values
    Fields(ClaimFields),

    /// The reply could not be parsed; the original text is preserved
    Raw(RawOutput),
}

impl ParseOutcome {
    /// Whether this is the degraded (unparsed) outcome
    pub fn is_degraded(&self) -> bool {
        matches!(self, ParseOutcome::Raw(_))
    }

    /// Parsed fields, if any
    pub fn fields(&self) -> Option<&ClaimFields> {
        match self {
            ParseOutcome::Fields(fields) => Some(fields),
            ParseOutcome::Raw(_) => None,
        }
    }
}

impl From<ParseOutcome> for Result<ClaimFields, RawOutput> {
    fn from(outcome: ParseOutcome) -> Self {
        match outcome {
            ParseOutcome::Fields(fields) => Ok(fields),
            ParseOutcome::Raw(raw) => Err(raw),
        }
    }
}

/// Precedence rule for resolving a record's claim id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimIdPolicy {
    /// Operator-supplied id wins over the model's claim number
    #[default]
    SuppliedFirst,

    /// The model's claim number wins over the operator-supplied id
    ExtractedFirst,
}

impl ClaimIdPolicy {
    /// Get the policy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimIdPolicy::SuppliedFirst => "supplied-first",
            ClaimIdPolicy::ExtractedFirst => "extracted-first",
        }
    }

    /// Resolve a claim id from the available candidates
    ///
    /// Candidates are trimmed; blank candidates are skipped. Falls back to
    /// [`UNKNOWN_CLAIM_ID`].
    pub fn resolve(&self, supplied: Option<&str>, extracted: Option<&str>) -> String {
        let (first, second) = match self {
            ClaimIdPolicy::SuppliedFirst => (supplied, extracted),
            ClaimIdPolicy::ExtractedFirst => (extracted, supplied),
        };

        [first, second]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(UNKNOWN_CLAIM_ID)
            .to_string()
    }
}

impl std::str::FromStr for ClaimIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supplied-first" => Ok(ClaimIdPolicy::SuppliedFirst),
            "extracted-first" => Ok(ClaimIdPolicy::ExtractedFirst),
            _ => Err(format!("Invalid claim id policy: {}", s)),
        }
    }
}

/// The canonical, immutable result of triaging one claim document
///
/// Re-processing the same `claim_id` supersedes the previous record
/// entirely; there is no field-level merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Primary key; never empty
    pub claim_id: String,

    /// Free-text category
    pub claim_type: String,

    /// Narrative summary
    pub summary: String,

    /// Expected Low/Medium/High/Critical, stored as given
    pub severity: String,

    /// Expected Low/Medium/High, stored as given
    pub risk: String,

    /// Expected Low/Medium/High/Critical; gates alerting
    pub priority: String,

    /// Free-text red flags, possibly empty or "None"
    pub red_flags: String,

    /// Free-text recommendation
    pub recommendation: String,

    /// Auxiliary identifiers (insured name, policy number) keyed by JSON key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_identity_fields: Option<BTreeMap<String, String>>,

    /// The full model reply, present only on degraded records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,

    /// When the record was assembled
    pub processed_at: DateTime<Utc>,
}

impl ClaimRecord {
    /// Create a record with every triage field empty
    pub fn empty(claim_id: impl Into<String>, processed_at: DateTime<Utc>) -> Self {
        Self {
            claim_id: claim_id.into(),
            claim_type: String::new(),
            summary: String::new(),
            severity: String::new(),
            risk: String::new(),
            priority: String::new(),
            red_flags: String::new(),
            recommendation: String::new(),
            extra_identity_fields: None,
            raw_output: None,
            processed_at,
        }
    }

    /// Whether this record was assembled from an unparsable reply
    pub fn is_degraded(&self) -> bool {
        self.raw_output.is_some()
    }

    /// Value of a schema field
    ///
    /// Identity fields are read from `extra_identity_fields`; the claim
    /// number resolves to `claim_id`.
    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::ClaimNumber => Some(&self.claim_id),
            Field::InsuredName | Field::PolicyNumber => self
                .extra_identity_fields
                .as_ref()
                .and_then(|extra| extra.get(field.key()))
                .map(String::as_str),
            Field::ClaimType => Some(&self.claim_type),
            Field::Summary => Some(&self.summary),
            Field::Severity => Some(&self.severity),
            Field::Risk => Some(&self.risk),
            Field::Priority => Some(&self.priority),
            Field::RedFlags => Some(&self.red_flags),
            Field::Recommendation => Some(&self.recommendation),
        }
    }

    /// Mutable access to a triage field (identity fields return `None`)
    pub fn triage_value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::ClaimType => Some(&mut self.claim_type),
            Field::Summary => Some(&mut self.summary),
            Field::Severity => Some(&mut self.severity),
            Field::Risk => Some(&mut self.risk),
            Field::Priority => Some(&mut self.priority),
            Field::RedFlags => Some(&mut self.red_flags),
            Field::Recommendation => Some(&mut self.recommendation),
            Field::ClaimNumber | Field::InsuredName | Field::PolicyNumber => None,
        }
    }

    /// `processed_at` as an ISO-8601 UTC string
    pub fn processed_on(&self) -> String {
        self.processed_at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Every field of the record as `(label, value)` pairs, in display order
    ///
    /// Used by reports and alert bodies so both enumerate the same fields.
    pub fn labeled_values(&self) -> Vec<(&'static str, String)> {
        let mut values = vec![("Claim ID", self.claim_id.clone())];

        if let Some(extra) = &self.extra_identity_fields {
            for field in [Field::InsuredName, Field::PolicyNumber] {
                if let Some(value) = extra.get(field.key()) {
                    values.push((field.label(), value.clone()));
                }
            }
        }

        for field in TRIAGE_FIELDS {
            let value = self.value(*field).unwrap_or_default().to_string();
            values.push((field.label(), value));
        }

        if let Some(raw) = &self.raw_output {
            values.push(("Raw Output", raw.clone()));
        }

        values.push(("Processed On", self.processed_on()));
        values
    }
}

const TRIAGE_FIELDS: &[Field] = &[
    Field::ClaimType,
    Field::Summary,
    Field::Severity,
    Field::Risk,
    Field::Priority,
    Field::RedFlags,
    Field::Recommendation,
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_policy_supplied_first() {
        let policy = ClaimIdPolicy::SuppliedFirst;
        assert_eq!(policy.resolve(Some("CLAIM1"), Some("CLM-9")), "CLAIM1");
        assert_eq!(policy.resolve(Some("  "), Some("CLM-9")), "CLM-9");
        assert_eq!(policy.resolve(None, None), UNKNOWN_CLAIM_ID);
    }

    #[test]
    fn test_policy_extracted_first() {
        let policy = ClaimIdPolicy::ExtractedFirst;
        assert_eq!(policy.resolve(Some("CLAIM1"), Some("CLM-9")), "CLM-9");
        assert_eq!(policy.resolve(Some("CLAIM1"), Some("")), "CLAIM1");
        assert_eq!(policy.resolve(Some(""), None), UNKNOWN_CLAIM_ID);
    }

    #[test]
    fn test_policy_trims_candidates() {
        let policy = ClaimIdPolicy::SuppliedFirst;
        assert_eq!(policy.resolve(Some("  CLAIM7 \n"), None), "CLAIM7");
    }

    #[test]
    fn test_fields_lookup_falls_back_to_label() {
        let mut fields = ClaimFields::new();
        fields.insert("Claim Type", "Auto");
        fields.insert("priority", "High");

        assert_eq!(fields.lookup(Field::ClaimType), Some("Auto"));
        assert_eq!(fields.lookup(Field::Priority), Some("High"));
        assert_eq!(fields.lookup(Field::Risk), None);
    }

    #[test]
    fn test_parse_outcome_into_result() {
        let outcome = ParseOutcome::Raw(RawOutput::new("oops"));
        assert!(outcome.is_degraded());
        let result: Result<ClaimFields, RawOutput> = outcome.into();
        assert_eq!(result.unwrap_err().text(), "oops");
    }

    #[test]
    fn test_labeled_values_order() {
        let mut record = ClaimRecord::empty("CLAIM1", fixed_time());
        record.priority = "Low".to_string();
        let labels: Vec<_> = record.labeled_values().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels.first(), Some(&"Claim ID"));
        assert_eq!(labels.last(), Some(&"Processed On"));
        assert!(labels.contains(&"Priority"));
        assert!(!labels.contains(&"Raw Output"));
    }

    #[test]
    fn test_labeled_values_include_identity_and_raw() {
        let mut record = ClaimRecord::empty("CLAIM1", fixed_time());
        let mut extra = BTreeMap::new();
        extra.insert("insured_name".to_string(), "Jane Roe".to_string());
        record.extra_identity_fields = Some(extra);
        record.raw_output = Some("not json".to_string());

        let values = record.labeled_values();
        assert_eq!(values[1], ("Insured Name", "Jane Roe".to_string()));
        assert!(values.contains(&("Raw Output", "not json".to_string())));
        assert!(record.is_degraded());
    }

    #[test]
    fn test_processed_on_is_utc_iso8601() {
        let record = ClaimRecord::empty("CLAIM1", fixed_time());
        assert_eq!(record.processed_on(), "2025-03-14T09:30:00Z");
    }

    #[test]
    fn test_record_serde_round_trip() {
        let mut record = ClaimRecord::empty("CLAIM1", fixed_time());
        record.severity = "Critical".to_string();
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("raw_output"));
        let parsed: ClaimRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
