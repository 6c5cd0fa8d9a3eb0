//! Data models for the claim extractor.
//!
//! This module contains all the core data structures used throughout
//! the application for representing extracted claims, entities, and
//! the final digest report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of a claim as classified by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    /// Verifiable statement about something that happened
    Factual,
    /// Forward-looking statement with an expected outcome
    Prediction,
    /// Interpretation or reasoning about known facts
    Analysis,
    /// Unsubstantiated or hypothetical statement
    Speculation,
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimType::Factual => write!(f, "Factual"),
            ClaimType::Prediction => write!(f, "Prediction"),
            ClaimType::Analysis => write!(f, "Analysis"),
            ClaimType::Speculation => write!(f, "Speculation"),
        }
    }
}

/// Sentiment of a claim toward its subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
    Mixed,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Negative => write!(f, "Negative"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Mixed => write!(f, "Mixed"),
        }
    }
}

impl Sentiment {
    /// Returns an emoji representation of the sentiment.
    pub fn emoji(&self) -> &'static str {
        match self {
            Sentiment::Positive => "🟢",
            Sentiment::Negative => "🔴",
            Sentiment::Neutral => "⚪",
            Sentiment::Mixed => "🟡",
        }
    }
}

/// Topic category of a claim.
///
/// The model is asked for one of the known categories but the schema does
/// not hard-restrict the value, so unknown strings round-trip through
/// `Other` instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Ai,
    Energy,
    Biotech,
    Robotics,
    Economics,
    Space,
    Policy,
    Culture,
    Other(String),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Ai => write!(f, "AI"),
            Category::Energy => write!(f, "Energy"),
            Category::Biotech => write!(f, "Biotech"),
            Category::Robotics => write!(f, "Robotics"),
            Category::Economics => write!(f, "Economics"),
            Category::Space => write!(f, "Space"),
            Category::Policy => write!(f, "Policy"),
            Category::Culture => write!(f, "Culture"),
            Category::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ai" => Category::Ai,
            "energy" => Category::Energy,
            "biotech" => Category::Biotech,
            "robotics" => Category::Robotics,
            "economics" => Category::Economics,
            "space" => Category::Space,
            "policy" => Category::Policy,
            "culture" => Category::Culture,
            _ => Category::Other(s.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from(s.as_str())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.to_string()
    }
}

/// Named entities mentioned by a claim.
///
/// Any list may be omitted by the model; a missing list deserializes as
/// empty rather than as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub institutions: Vec<String>,
}

impl Entities {
    /// Returns true if no entity of any kind was extracted.
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
            && self.people.is_empty()
            && self.products.is_empty()
            && self.institutions.is_empty()
    }

    /// Iterate over all entity names regardless of kind.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.companies
            .iter()
            .chain(self.people.iter())
            .chain(self.products.iter())
            .chain(self.institutions.iter())
    }
}

/// A single claim extracted from the source text.
///
/// Only `summary`, `category`, `claim_type`, `significance` and `entities`
/// are required on the wire; the remaining fields default when the model
/// omits them. Claims are immutable once deserialized and duplicates are
/// legal; display order is always re-derived by sorting on significance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Verbatim excerpt from the source text.
    #[serde(default)]
    pub raw_text: String,
    /// One-sentence paraphrase of the claim.
    pub summary: String,
    /// Topic category.
    pub category: Category,
    /// Free-text refinement of the category.
    #[serde(default)]
    pub subcategory: String,
    /// Kind of claim (factual, prediction, analysis, speculation).
    pub claim_type: ClaimType,
    /// Sentiment toward the subject.
    #[serde(default)]
    pub sentiment: Sentiment,
    /// Importance score, nominal range 1-10 (not enforced).
    pub significance: f64,
    /// Named entities mentioned by the claim.
    pub entities: Entities,
    /// Whether the claim is a prediction.
    #[serde(default)]
    pub is_prediction: bool,
    /// Timeframe for the prediction (e.g. a year), when applicable.
    #[serde(default)]
    pub prediction_timeframe: Option<String>,
    /// Suggested searches to verify the claim.
    #[serde(default)]
    pub search_queries: Vec<String>,
}

impl Claim {
    /// Returns the significance bucket (integer floor of the score).
    pub fn significance_bucket(&self) -> i64 {
        self.significance.floor() as i64
    }
}

/// Metadata about one digest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestMetadata {
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Name of the model used.
    pub model_used: String,
    /// Length of the source text in characters.
    pub source_chars: usize,
    /// Number of claims extracted.
    pub total_claims: usize,
    /// Duration of the extraction call in seconds.
    pub duration_seconds: f64,
}

/// The complete digest: extracted claims plus derived statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Digest {
    /// Metadata about the run.
    pub metadata: DigestMetadata,
    /// Claims ordered by significance (descending).
    pub claims: Vec<Claim>,
    /// Derived statistics over the claims.
    pub stats: crate::analysis::ClaimStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_type_roundtrip() {
        let json = serde_json::to_string(&ClaimType::Speculation).unwrap();
        assert_eq!(json, "\"speculation\"");
        let back: ClaimType = serde_json::from_str("\"factual\"").unwrap();
        assert_eq!(back, ClaimType::Factual);
    }

    #[test]
    fn test_sentiment_default() {
        assert_eq!(Sentiment::default(), Sentiment::Neutral);
        assert_eq!(Sentiment::Positive.emoji(), "🟢");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from("AI"), Category::Ai);
        assert_eq!(Category::from("space"), Category::Space);
        assert_eq!(
            Category::from("Quantum"),
            Category::Other("Quantum".to_string())
        );
    }

    #[test]
    fn test_category_serde_roundtrip() {
        let cat: Category = serde_json::from_str("\"Biotech\"").unwrap();
        assert_eq!(cat, Category::Biotech);
        assert_eq!(serde_json::to_string(&cat).unwrap(), "\"Biotech\"");

        let other: Category = serde_json::from_str("\"Geopolitics\"").unwrap();
        assert_eq!(other, Category::Other("Geopolitics".to_string()));
    }

    #[test]
    fn test_claim_optional_fields_default() {
        let json = r#"{
            "summary": "OpenAI releases a new model.",
            "category": "AI",
            "claim_type": "factual",
            "significance": 7,
            "entities": { "companies": ["OpenAI"] }
        }"#;

        let claim: Claim = serde_json::from_str(json).unwrap();
        assert_eq!(claim.raw_text, "");
        assert_eq!(claim.subcategory, "");
        assert_eq!(claim.sentiment, Sentiment::Neutral);
        assert!(!claim.is_prediction);
        assert_eq!(claim.prediction_timeframe, None);
        assert!(claim.search_queries.is_empty());
        assert_eq!(claim.entities.people, Vec::<String>::new());
    }

    #[test]
    fn test_claim_missing_required_field_fails() {
        // No significance: must be a hard error, not a silent default.
        let json = r#"{
            "summary": "Missing score.",
            "category": "AI",
            "claim_type": "factual",
            "entities": {}
        }"#;

        assert!(serde_json::from_str::<Claim>(json).is_err());
    }

    #[test]
    fn test_significance_bucket() {
        let json = r#"{
            "summary": "s",
            "category": "AI",
            "claim_type": "analysis",
            "significance": 7.8,
            "entities": {}
        }"#;
        let claim: Claim = serde_json::from_str(json).unwrap();
        assert_eq!(claim.significance_bucket(), 7);
    }

    #[test]
    fn test_entities_is_empty_and_all() {
        let mut entities = Entities::default();
        assert!(entities.is_empty());

        entities.people.push("Alex".to_string());
        entities.companies.push("SpaceX".to_string());
        assert!(!entities.is_empty());

        let all: Vec<&String> = entities.all().collect();
        assert_eq!(all.len(), 2);
    }
}
