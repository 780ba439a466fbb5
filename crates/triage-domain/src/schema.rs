//! Schema module - the extraction contract between the pipeline and the model

use serde::{Deserialize, Serialize};

/// A single field of the extraction contract
///
/// Every field has a JSON key (what the model is asked to emit) and a
/// display label (what reports and alerts print). All values are strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Claim number as printed on the document (extended variant only)
    ClaimNumber,

    /// Name of the insured party (extended variant only)
    InsuredName,

    /// Policy number (extended variant only)
    PolicyNumber,

    /// Category such as Health, Auto, Property or Travel
    ClaimType,

    /// Narrative summary of the incident
    Summary,

    /// Extent of damage, injury or loss
    Severity,

    /// Data completeness and fraud risk
    Risk,

    /// Processing priority; the only field that gates alerts
    Priority,

    /// Suspicious patterns or missing documents
    RedFlags,

    /// Final recommendation for the claim handler
    Recommendation,
}

impl Field {
    /// JSON key the model must use for this field
    pub fn key(&self) -> &'static str {
        match self {
            Field::ClaimNumber => "claim_number",
            Field::InsuredName => "insured_name",
            Field::PolicyNumber => "policy_number",
            Field::ClaimType => "claim_type",
            Field::Summary => "summary",
            Field::Severity => "severity",
            Field::Risk => "risk",
            Field::Priority => "priority",
            Field::RedFlags => "red_flags",
            Field::Recommendation => "recommendation",
        }
    }

    /// Human-readable label, also accepted as an alias key in model output
    pub fn label(&self) -> &'static str {
        match self {
            Field::ClaimNumber => "Claim Number",
            Field::InsuredName => "Insured Name",
            Field::PolicyNumber => "Policy Number",
            Field::ClaimType => "Claim Type",
            Field::Summary => "Claim Summary",
            Field::Severity => "Severity Level",
            Field::Risk => "Risk Level",
            Field::Priority => "Priority",
            Field::RedFlags => "Red Flags",
            Field::Recommendation => "Recommendation",
        }
    }

    /// Whether the field identifies the claim rather than triaging it
    pub fn is_identity(&self) -> bool {
        matches!(
            self,
            Field::ClaimNumber | Field::InsuredName | Field::PolicyNumber
        )
    }

    /// Look up a field by JSON key or display label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim();
        ALL_FIELDS.iter().copied().find(|field| {
            field.key().eq_ignore_ascii_case(needle) || field.label().eq_ignore_ascii_case(needle)
        })
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const ALL_FIELDS: &[Field] = &[
    Field::ClaimNumber,
    Field::InsuredName,
    Field::PolicyNumber,
    Field::ClaimType,
    Field::Summary,
    Field::Severity,
    Field::Risk,
    Field::Priority,
    Field::RedFlags,
    Field::Recommendation,
];

const STANDARD_FIELDS: &[Field] = &[
    Field::ClaimType,
    Field::Summary,
    Field::Severity,
    Field::Risk,
    Field::Priority,
    Field::RedFlags,
    Field::Recommendation,
];

/// Which set of fields the model is asked to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Triage fields only; the claim id must be supplied by the operator
    #[default]
    Standard,

    /// Identity fields (claim number, insured name, policy number) plus triage fields
    Extended,
}

impl SchemaVariant {
    /// Get the variant name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVariant::Standard => "standard",
            SchemaVariant::Extended => "extended",
        }
    }
}

impl std::str::FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(SchemaVariant::Standard),
            "extended" => Ok(SchemaVariant::Extended),
            _ => Err(format!("Invalid schema variant: {}", s)),
        }
    }
}

/// The extraction contract
///
/// Used by the prompt builder to render the expected output shape and by the
/// record assembler to guarantee every field is present.
///
/// # Examples
///
/// ```
/// use triage_domain::{Field, Schema, SchemaVariant};
///
/// let schema = Schema::new(SchemaVariant::Standard);
/// assert_eq!(schema.required_fields()[0], Field::ClaimType);
/// assert_eq!(schema.empty_value_for(Field::Priority), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schema {
    variant: SchemaVariant,
}

impl Schema {
    /// Create a schema for the given variant
    pub fn new(variant: SchemaVariant) -> Self {
        Self { variant }
    }

    /// The variant this schema describes
    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// Ordered list of fields the model must return
    pub fn required_fields(&self) -> &'static [Field] {
        match self.variant {
            SchemaVariant::Standard => STANDARD_FIELDS,
            SchemaVariant::Extended => ALL_FIELDS,
        }
    }

    /// Fields that identify the claim (empty for the standard variant)
    pub fn identity_fields(&self) -> impl Iterator<Item = Field> {
        self.required_fields().iter().copied().filter(Field::is_identity)
    }

    /// Whether the model is asked for its own claim number
    pub fn collects_claim_number(&self) -> bool {
        self.required_fields().contains(&Field::ClaimNumber)
    }

    /// Value used when the model omits a field
    pub fn empty_value_for(&self, _field: Field) -> &'static str {
        ""
    }
}
