//! Record assembly from parsed model output

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;
use triage_domain::{ClaimIdPolicy, ClaimRecord, Field, ParseOutcome, Schema};

/// Merges parsed fields with schema defaults into a `ClaimRecord`
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordAssembler {
    schema: Schema,
    policy: ClaimIdPolicy,
}

impl RecordAssembler {
    /// Create an assembler
    pub fn new(schema: Schema, policy: ClaimIdPolicy) -> Self {
        Self { schema, policy }
    }

    /// Assemble a record; total over every input
    ///
    /// Missing schema fields become empty strings. A degraded outcome yields
    /// a record with every field empty and `raw_output` set.
    pub fn assemble(
        &self,
        outcome: ParseOutcome,
        supplied_claim_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> ClaimRecord {
        let fields = match outcome {
            ParseOutcome::Fields(fields) => Ok(fields),
            ParseOutcome::Raw(raw) => Err(raw),
        };

        let extracted = match &fields {
            Ok(fields) if self.schema.collects_claim_number() => fields.lookup(Field::ClaimNumber),
            _ => None,
        };
        let claim_id = self.policy.resolve(supplied_claim_id, extracted);

        let mut record = ClaimRecord::empty(claim_id, now);
        let mut extra = BTreeMap::new();

        for &field in self.schema.required_fields() {
            let value = fields
                .as_ref()
                .ok()
                .and_then(|f| f.lookup(field))
                .unwrap_or(self.schema.empty_value_for(field));

            match field {
                Field::ClaimNumber => {}
                Field::InsuredName | Field::PolicyNumber => {
                    extra.insert(field.key().to_string(), value.to_string());
                }
                _ => {
                    if let Some(slot) = record.triage_value_mut(field) {
                        *slot = value.to_string();
                    }
                }
            }
        }

        if !extra.is_empty() {
            record.extra_identity_fields = Some(extra);
        }
        if let Err(raw) = fields {
            record.raw_output = Some(raw.into_text());
        }

        debug!(
            "Assembled record {} (degraded: {})",
            record.claim_id,
            record.is_degraded()
        );
        record
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use triage_domain::{ClaimFields, RawOutput, SchemaVariant};

    fn outcome_strategy() -> impl Strategy<Value = ParseOutcome> {
        prop_oneof![
            proptest::collection::btree_map(
                prop_oneof![
                    Just("claim_number".to_string()),
                    Just("priority".to_string()),
                    Just("Risk Level".to_string()),
                    "[a-z_]{1,10}",
                ],
                ".{0,20}",
                0..6,
            )
            .prop_map(|m| ParseOutcome::Fields(ClaimFields::from(m))),
            ".{0,40}".prop_map(|t| ParseOutcome::Raw(RawOutput::new(t))),
        ]
    }

    proptest! {
        /// Property: every schema field is present and the id is never empty
        #[test]
        fn test_assemble_is_total(
            outcome in outcome_strategy(),
            supplied in proptest::option::of(".{0,10}"),
            extended: bool,
            extracted_first: bool,
        ) {
            let variant = if extended { SchemaVariant::Extended } else { SchemaVariant::Standard };
            let policy = if extracted_first { ClaimIdPolicy::ExtractedFirst } else { ClaimIdPolicy::SuppliedFirst };
            let schema = Schema::new(variant);
            let degraded = outcome.is_degraded();

            let now = Utc::now();
            let record = RecordAssembler::new(schema, policy).assemble(outcome, supplied.as_deref(), now);

            prop_assert!(!record.claim_id.trim().is_empty());
            prop_assert_eq!(record.processed_at, now);
            prop_assert_eq!(record.is_degraded(), degraded);
            for &field in schema.required_fields() {
                prop_assert!(record.value(field).is_some());
            }
        }
    }
}
