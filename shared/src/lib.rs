use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

/// Canonical agar media the metadata encoder was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
pub enum AgarMedium {
    Blood,
    Macconkey,
    Nutrient,
    Ashdown,
}

/// Canonical species tokens the metadata encoder was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
pub enum Species {
    Unknown,
    Bpseudomallei,
}

/// Three-tier classification of a raw model score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConfidenceTier {
    #[strum(serialize = "HIGH CONFIDENCE (Positive)")]
    HighPositive,
    #[strum(serialize = "MODERATE CONFIDENCE (Positive)")]
    ModeratePositive,
    #[strum(serialize = "HIGH CONFIDENCE (Negative)")]
    HighNegative,
}

impl ConfidenceTier {
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::HighPositive | Self::ModeratePositive)
    }
}

fn default_agar() -> String {
    "Blood Agar".to_string()
}

fn default_colony_age() -> String {
    "48 hours".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Base64-encoded image, optionally carrying a data-URI prefix.
    pub image: Option<String>,
    #[serde(default = "default_agar")]
    pub agar: String,
    #[serde(default = "default_colony_age")]
    pub colony_age: String,
    #[serde(default)]
    pub characteristics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePayload {
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingTestRequest {
    #[serde(default = "default_agar")]
    pub agar: String,
    #[serde(default = "default_colony_age")]
    pub colony_age: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoedMetadata {
    pub agar: String,
    pub colony_age: String,
    pub time_hours: u64,
    pub species: String,
    pub characteristics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub shape_correct: bool,
    pub dtype_correct: bool,
    pub range_correct: bool,
    pub value_range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingDetails {
    pub image_format: String,
    pub size: String,
    pub normalization: String,
    pub verification: VerificationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub result: String,
    /// Percentage shown to the user, already flipped for negative results.
    pub confidence: f64,
    pub confidence_level: String,
    pub is_bpseudo: bool,
    pub confidence_score: f64,
    pub model_raw_output: f64,
    pub metadata: EchoedMetadata,
    pub interpretation: String,
    pub recommendations: Vec<String>,
    pub preprocessing_details: PreprocessingDetails,
    pub model_version: String,
    pub api_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_apply_for_missing_fields() {
        let req: PredictionRequest = serde_json::from_str(r#"{"image": "abcd"}"#).unwrap();
        assert_eq!(req.agar, "Blood Agar");
        assert_eq!(req.colony_age, "48 hours");
        assert!(req.characteristics.is_empty());
    }

    #[test]
    fn missing_image_deserializes_to_none() {
        let req: PredictionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.image.is_none());
    }

    #[test]
    fn tier_display_strings() {
        assert_eq!(
            ConfidenceTier::HighPositive.to_string(),
            "HIGH CONFIDENCE (Positive)"
        );
        assert_eq!(
            ConfidenceTier::HighNegative.to_string(),
            "HIGH CONFIDENCE (Negative)"
        );
        assert!(ConfidenceTier::ModeratePositive.is_positive());
        assert!(!ConfidenceTier::HighNegative.is_positive());
    }

    #[test]
    fn canonical_tokens_render_as_fitted_vocabulary() {
        assert_eq!(AgarMedium::Macconkey.to_string(), "Macconkey");
        assert_eq!(Species::Bpseudomallei.to_string(), "Bpseudomallei");
        let token: &'static str = AgarMedium::Ashdown.into();
        assert_eq!(token, "Ashdown");
    }
}
