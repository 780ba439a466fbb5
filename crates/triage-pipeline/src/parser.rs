//! Parse model replies into claim fields

use serde_json::Value;
use tracing::{debug, warn};
use triage_domain::{ClaimFields, ParseOutcome, RawOutput};

/// Parse a model reply
///
/// Never fails: a reply that does not contain a flat JSON object degrades to
/// [`ParseOutcome::Raw`] holding the full original text.
pub fn parse_response(response: &str) -> ParseOutcome {
    let candidate = json_span(response);

    match parse_fields(candidate) {
        Ok(fields) => {
            debug!("Parsed {} fields from model reply", fields.len());
            ParseOutcome::Fields(fields)
        }
        Err(reason) => {
            warn!("Model reply could not be parsed ({}); keeping raw output", reason);
            ParseOutcome::Raw(RawOutput::new(response))
        }
    }
}

/// Span from the first `{` to the last `}`, or the whole text
///
/// Handles prose before and after the object as well as markdown fences.
fn json_span(response: &str) -> &str {
    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => response,
    }
}

fn parse_fields(candidate: &str) -> Result<ClaimFields, String> {
    let json: Value =
        serde_json::from_str(candidate).map_err(|e| format!("JSON parse error: {}", e))?;

    let obj = json
        .as_object()
        .ok_or_else(|| "Expected a JSON object".to_string())?;

    let mut fields = ClaimFields::new();
    for (key, value) in obj {
        match value {
            Value::String(s) => fields.insert(key.clone(), s.clone()),
            Value::Null => {}
            Value::Number(n) => fields.insert(key.clone(), n.to_string()),
            Value::Bool(b) => fields.insert(key.clone(), b.to_string()),
            Value::Array(_) | Value::Object(_) => {
                return Err(format!("Value of '{}' is not a scalar", key));
            }
        }
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_json() {
        let response = r#"{"claim_type": "Auto", "priority": "Low", "red_flags": ""}"#;
        let outcome = parse_response(response);
        let fields = outcome.fields().unwrap();
        assert_eq!(fields.get("claim_type"), Some("Auto"));
        assert_eq!(fields.get("red_flags"), Some(""));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_parse_json_in_prose() {
        let response = r#"Here is the result: {"priority":"Critical","summary":"Total loss"} Thanks!"#;
        let fields = parse_response(response).fields().cloned().unwrap();
        assert_eq!(fields.get("priority"), Some("Critical"));
        assert_eq!(fields.get("summary"), Some("Total loss"));
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\n  \"claim_type\": \"Health\"\n}\n```";
        let fields = parse_response(response).fields().cloned().unwrap();
        assert_eq!(fields.get("claim_type"), Some("Health"));
    }

    #[test]
    fn test_parse_keeps_unknown_keys() {
        let fields = parse_response(r#"{"amount_claimed": "4,200 USD"}"#)
            .fields()
            .cloned()
            .unwrap();
        assert_eq!(fields.get("amount_claimed"), Some("4,200 USD"));
    }

    #[test]
    fn test_parse_scalar_conversion() {
        let fields = parse_response(r#"{"amount": 4200, "urgent": true, "notes": null}"#)
            .fields()
            .cloned()
            .unwrap();
        assert_eq!(fields.get("amount"), Some("4200"));
        assert_eq!(fields.get("urgent"), Some("true"));
        assert_eq!(fields.get("notes"), None);
    }

    #[test]
    fn test_non_json_degrades() {
        let response = "I'm sorry, I cannot read this document.";
        assert_eq!(
            parse_response(response),
            ParseOutcome::Raw(RawOutput::new(response))
        );
    }

    #[test]
    fn test_nested_value_degrades_with_full_text() {
        let response = r#"Result: {"red_flags": ["missing FIR", "late report"]}"#;
        match parse_response(response) {
            ParseOutcome::Raw(raw) => assert_eq!(raw.text(), response),
            other => panic!("expected raw outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_object_inside_array_is_parsed() {
        match parse_response(r#"[{"priority": "High"}]"#) {
            ParseOutcome::Fields(fields) => assert_eq!(fields.get("priority"), Some("High")),
            other => panic!("expected fields, got {:?}", other),
        }
    }

    #[test]
    fn test_top_level_array_degrades() {
        assert!(parse_response("[1, 2]").is_degraded());
    }

    #[test]
    fn test_braces_out_of_order_degrade() {
        assert!(parse_response("} nothing here {").is_degraded());
        assert!(parse_response("").is_degraded());
    }

    #[test]
    fn test_greedy_span_across_two_objects_degrades() {
        // First '{' to last '}' spans both objects, which is not valid JSON
        assert!(parse_response(r#"{"a": "1"} and {"b": "2"}"#).is_degraded());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    proptest! {
        /// Property: a flat object of strings parses back to the same fields
        #[test]
        fn test_string_object_round_trips(
            map in proptest::collection::btree_map("[a-z_]{1,12}", ".{0,40}", 0..10),
            prefix in "[^{}]{0,20}",
            suffix in "[^{}]{0,20}",
        ) {
            let json = serde_json::to_string(&map).unwrap();
            let response = format!("{}{}{}", prefix, json, suffix);
            let expected: ClaimFields = map.into_iter().collect::<BTreeMap<_, _>>().into();
            prop_assert_eq!(parse_response(&response), ParseOutcome::Fields(expected));
        }

        /// Property: text without braces always degrades to itself
        #[test]
        fn test_brace_free_text_degrades(text in "[^{}]{0,80}") {
            prop_assert_eq!(parse_response(&text), ParseOutcome::Raw(RawOutput::new(text.clone())));
        }
    }
}
