//! Prompt construction for claim triage

use crate::error::PipelineError;
use triage_domain::{Field, Schema};

/// Builds the triage prompt for one document
///
/// The prompt is a pure function of the schema and the document text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder {
    schema: Schema,
}

impl PromptBuilder {
    /// Create a prompt builder for a schema
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Build the complete triage prompt
    ///
    /// The document text is embedded verbatim at the end. Fails only when
    /// the document is blank.
    pub fn build(&self, document_text: &str) -> Result<String, PipelineError> {
        if document_text.trim().is_empty() {
            return Err(PipelineError::EmptyDocument);
        }

        let mut prompt = String::new();

        // 1. Role and triage rules
        prompt.push_str(TRIAGE_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Identity fields, extended schema only
        let identity: Vec<Field> = self.schema.identity_fields().collect();
        if !identity.is_empty() {
            prompt.push_str("Also identify these details exactly as printed on the document:\n");
            for field in &identity {
                prompt.push_str(&format!("- {} (\"{}\")\n", field.label(), field.key()));
            }
            prompt.push('\n');
        }

        // 3. Output contract
        prompt.push_str(OUTPUT_RULES);
        prompt.push_str("\n");
        prompt.push_str(&self.output_template());
        prompt.push_str("\n\n");

        // 4. The document
        prompt.push_str("Claim Document:\n");
        prompt.push_str(document_text);

        Ok(prompt)
    }

    /// JSON object with every required key and an empty string value
    fn output_template(&self) -> String {
        let entries: Vec<String> = self
            .schema
            .required_fields()
            .iter()
            .map(|field| format!("  \"{}\": \"\"", field.key()))
            .collect();
        format!("{{\n{}\n}}", entries.join(",\n"))
    }
}

const TRIAGE_INSTRUCTIONS: &str = r#"You are a claims triage agent for an insurance company.
Review the claim document below, categorize the claim, assess its severity and risk, and recommend a processing priority.

Rules:
1. Read the whole document. It may contain claim forms, investigation reports, invoices or correspondence.
2. claim_type: the category of the claim (Health, Auto, Property, Travel, etc.).
3. summary: a short narrative of the incident, the claimant and the amount claimed.
4. severity: extent of damage, injury or loss. One of Low, Medium, High, Critical.
5. risk: data completeness, fraud indicators or inconsistencies. One of Low, Medium, High.
6. priority: processing priority. One of:
   - Critical: immediate human review (severe injuries, large payouts)
   - High: review within 24 hours
   - Medium: process within SLA
   - Low: routine automated handling
7. red_flags: missing reports, unverified documents or suspicious patterns. Use "None" if there are none.
8. recommendation: the final recommendation for the claim handler (e.g. "Approve immediately", "Send for investigation", "Reject due to mismatch")."#;

const OUTPUT_RULES: &str = r#"Return exactly one JSON object and nothing else.
- Use exactly the keys shown below.
- Every value must be a string.
- No explanations, no markdown, no code fences.
Output format:"#;

#[cfg(test)]
mod tests {
    use super::*;
    use triage_domain::SchemaVariant;

    #[test]
    fn test_prompt_ends_with_document_verbatim() {
        let builder = PromptBuilder::new(Schema::new(SchemaVariant::Standard));
        let doc = "Front bumper damage.\n  Minor collision at 5 mph.  ";
        let prompt = builder.build(doc).unwrap();
        assert!(prompt.ends_with(&format!("Claim Document:\n{}", doc)));
    }

    #[test]
    fn test_prompt_lists_every_required_key() {
        let schema = Schema::new(SchemaVariant::Standard);
        let prompt = PromptBuilder::new(schema).build("text").unwrap();
        for field in schema.required_fields() {
            assert!(prompt.contains(&format!("\"{}\": \"\"", field.key())));
        }
        assert!(!prompt.contains("\"claim_number\""));
    }

    #[test]
    fn test_extended_prompt_asks_for_identity() {
        let prompt = PromptBuilder::new(Schema::new(SchemaVariant::Extended))
            .build("text")
            .unwrap();
        assert!(prompt.contains("\"claim_number\": \"\""));
        assert!(prompt.contains("Insured Name (\"insured_name\")"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let builder = PromptBuilder::default();
        assert_eq!(builder.build("same").unwrap(), builder.build("same").unwrap());
    }

    #[test]
    fn test_blank_document_rejected() {
        let result = PromptBuilder::default().build(" \n\t ");
        assert!(matches!(result, Err(PipelineError::EmptyDocument)));
    }
}
