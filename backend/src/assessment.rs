use shared::{AgarMedium, ConfidenceTier};

pub const TARGET_ORGANISM: &str = "Burkholderia pseudomallei";
pub const POSITIVE_THRESHOLD: f32 = 0.5;
pub const HIGH_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Label, tier and display confidence derived from a raw model score.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub result: String,
    pub tier: ConfidenceTier,
    pub is_bpseudo: bool,
    /// Confidence in the reported label. Below the decision threshold this is
    /// the flipped score: never show the raw score for a negative result.
    pub display_confidence: f32,
}

impl Assessment {
    pub fn confidence_percent(&self) -> f64 {
        round_to(self.display_confidence as f64 * 100.0, 2)
    }

    pub fn confidence_score(&self) -> f64 {
        round_to(self.display_confidence as f64, 4)
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Three-tier decision table over the raw score.
pub fn assess(raw_score: f32) -> Assessment {
    if raw_score >= HIGH_CONFIDENCE_THRESHOLD {
        Assessment {
            result: format!("Probably {TARGET_ORGANISM}"),
            tier: ConfidenceTier::HighPositive,
            is_bpseudo: true,
            display_confidence: raw_score,
        }
    } else if raw_score >= POSITIVE_THRESHOLD {
        Assessment {
            result: format!("Possibly {TARGET_ORGANISM}"),
            tier: ConfidenceTier::ModeratePositive,
            is_bpseudo: true,
            display_confidence: raw_score,
        }
    } else {
        Assessment {
            result: format!("Not {TARGET_ORGANISM}"),
            tier: ConfidenceTier::HighNegative,
            is_bpseudo: false,
            display_confidence: 1.0 - raw_score,
        }
    }
}

/// Narrative interpretation, banded on the raw (unflipped) score.
pub fn interpretation(raw_score: f32, agar: &str) -> String {
    if raw_score >= 0.9 {
        format!(
            "VERY HIGH CONFIDENCE detection on {agar}. Strong morphological characteristics \
             highly consistent with B. pseudomallei. Recommend immediate confirmatory testing \
             and infection control measures."
        )
    } else if raw_score >= 0.7 {
        format!(
            "HIGH CONFIDENCE detection on {agar}. Colony characteristics suggest probable \
             B. pseudomallei. Confirmatory biochemical tests strongly recommended."
        )
    } else if raw_score >= 0.5 {
        format!(
            "MODERATE CONFIDENCE on {agar}. Some characteristics consistent with \
             B. pseudomallei. Additional diagnostic tests required for confirmation."
        )
    } else if raw_score >= 0.3 {
        format!(
            "LOW CONFIDENCE - Likely NOT B. pseudomallei. Colony characteristics on {agar} \
             suggest other organism. Continue differential diagnosis."
        )
    } else {
        format!(
            "VERY LOW CONFIDENCE - Highly unlikely B. pseudomallei. Colony characteristics \
             on {agar} inconsistent with B. pseudomallei. Investigate other gram-negative \
             organisms."
        )
    }
}

fn ashdown_advice(agar: AgarMedium, re_culture_note: &str) -> String {
    if agar == AgarMedium::Ashdown {
        "Ashdown agar is optimal for B. pseudomallei isolation".to_string()
    } else {
        re_culture_note.to_string()
    }
}

/// Fixed advisory lists keyed by the same three tiers as the label. Positive
/// tiers carry an Ashdown branch: a confirmation note when the culture is
/// already on the optimal medium, a re-culture suggestion otherwise.
pub fn recommendations(raw_score: f32, agar: AgarMedium) -> Vec<String> {
    if raw_score >= HIGH_CONFIDENCE_THRESHOLD {
        vec![
            "PRESUMPTIVE POSITIVE - Treat as potential B. pseudomallei".to_string(),
            "Perform confirmatory tests:".to_string(),
            "  - API 20NE or similar biochemical panel".to_string(),
            "  - PCR for B. pseudomallei 16S rRNA".to_string(),
            "  - MALDI-TOF mass spectrometry if available".to_string(),
            "Perform antibiotic sensitivity testing (particularly colistin, ceftazidime)"
                .to_string(),
            "Implement appropriate biosafety measures (BSL-3 recommended)".to_string(),
            "Document and notify relevant health authorities if confirmed".to_string(),
            ashdown_advice(
                agar,
                "Consider sub-culturing on Ashdown agar for enhanced confirmation",
            ),
        ]
    } else if raw_score >= POSITIVE_THRESHOLD {
        vec![
            "POSSIBLE POSITIVE - Treat as potential B. pseudomallei until ruled out".to_string(),
            "Perform confirmatory tests:".to_string(),
            "  - API 20NE biochemical panel".to_string(),
            "  - PCR testing (consider if available)".to_string(),
            ashdown_advice(
                agar,
                "Consider re-culturing on Ashdown agar for enhanced isolation",
            ),
            "Document findings carefully for review".to_string(),
            "If negative, continue differential diagnosis".to_string(),
        ]
    } else {
        vec![
            "LOW PROBABILITY - Unlikely to be B. pseudomallei".to_string(),
            "Continue differential diagnosis based on:".to_string(),
            "  - Colony morphology".to_string(),
            "  - Growth on selective media".to_string(),
            "  - Biochemical profile".to_string(),
            "Document organism characteristics".to_string(),
            "Consider other gram-negative organisms (Pseudomonas, Acinetobacter, etc.)"
                .to_string(),
        ]
    }
}
