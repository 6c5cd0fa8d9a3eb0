//! Extraction prompt and response schema.
//!
//! The prompt and schema together form the contract with the model: the
//! system instruction describes each field and the response schema forces
//! a machine-parseable JSON array instead of prose.

use serde_json::{json, Value};

/// System instruction sent with every extraction request.
pub const INGESTION_PROMPT: &str = r#"You are parsing a daily tech synthesis post from Alex Wissner-Gross (or similar tech synthesis feeds).

Extract each distinct development/claim as a separate JSON object.

For each claim, provide:
{
  "raw_text": "exact text from post",
  "summary": "one clear sentence",
  "category": "AI|Energy|Biotech|Robotics|Economics|Space|Policy|Culture",
  "subcategory": "more specific topic",
  "claim_type": "factual|prediction|analysis|speculation",
  "sentiment": "positive|negative|neutral|mixed",
  "significance": 1-10 (1 being minor update, 10 being paradigm shift),
  "entities": {
    "companies": ["Company A"],
    "people": ["Person B"],
    "products": ["Product C"],
    "institutions": ["Institution D"]
  },
  "is_prediction": true/false,
  "prediction_timeframe": "2027" or null,
  "search_queries": ["suggested search to find source"]
}

Return a JSON array of all claims found. Strict JSON format only."#;

/// Example input shown by `--example` for first-time users.
pub const EXAMPLE_INPUT: &str = r#"Example:
1. OpenAI releases GPT-5 preview, claiming 99% accuracy on MATH benchmark.
2. SpaceX Starship achieves orbit for the 3rd time, successfully testing fuel transfer.
3. New bipartisan bill proposed to regulate algorithmic bias in hiring processes.
"#;

/// Build the response schema describing the claim array.
///
/// Mirrors the `Claim` model: closed enums for `claim_type` and
/// `sentiment`, `significance` as a number, and only the fields the
/// client actually requires marked as required.
pub fn claim_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "raw_text": { "type": "STRING" },
                "summary": { "type": "STRING" },
                "category": { "type": "STRING" },
                "subcategory": { "type": "STRING" },
                "claim_type": {
                    "type": "STRING",
                    "enum": ["factual", "prediction", "analysis", "speculation"]
                },
                "sentiment": {
                    "type": "STRING",
                    "enum": ["positive", "negative", "neutral", "mixed"]
                },
                "significance": { "type": "NUMBER" },
                "entities": {
                    "type": "OBJECT",
                    "properties": {
                        "companies": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "people": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "products": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "institutions": { "type": "ARRAY", "items": { "type": "STRING" } }
                    }
                },
                "is_prediction": { "type": "BOOLEAN" },
                "prediction_timeframe": { "type": "STRING", "nullable": true },
                "search_queries": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": ["summary", "category", "claim_type", "significance", "entities"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_describes_contract() {
        assert!(INGESTION_PROMPT.contains("factual|prediction|analysis|speculation"));
        assert!(INGESTION_PROMPT.contains("positive|negative|neutral|mixed"));
        assert!(INGESTION_PROMPT.contains("Strict JSON format only."));
    }

    #[test]
    fn test_schema_shape() {
        let schema = claim_response_schema();
        assert_eq!(schema["type"], "ARRAY");

        let item = &schema["items"];
        assert_eq!(item["properties"]["significance"]["type"], "NUMBER");
        assert_eq!(
            item["properties"]["claim_type"]["enum"],
            json!(["factual", "prediction", "analysis", "speculation"])
        );
        assert_eq!(
            item["required"],
            json!(["summary", "category", "claim_type", "significance", "entities"])
        );
    }
}
