use lazy_static::lazy_static;
use shared::{AgarMedium, Species};
use std::collections::HashMap;

pub const DEFAULT_COLONY_AGE_HOURS: u64 = 48;

lazy_static! {
    static ref AGAR_MAPPING: HashMap<&'static str, AgarMedium> = HashMap::from([
        ("Blood Agar", AgarMedium::Blood),
        ("Blood", AgarMedium::Blood),
        ("MacConkey Agar", AgarMedium::Macconkey),
        ("Macconkey", AgarMedium::Macconkey),
        ("Nutrient Agar", AgarMedium::Nutrient),
        ("Nutrient", AgarMedium::Nutrient),
        ("Ashdown Agar", AgarMedium::Ashdown),
        ("Ashdown", AgarMedium::Ashdown),
    ]);
    static ref SPECIES_MAPPING: HashMap<&'static str, Species> = HashMap::from([
        ("gram_negative_oxidase_positive", Species::Unknown),
        ("burkholderia", Species::Bpseudomallei),
        ("unknown", Species::Unknown),
        ("bpseudomallei", Species::Bpseudomallei),
    ]);
}

/// Case-sensitive lookup over the accepted display names; anything else falls
/// back to Blood rather than erroring, matching the fitted vocabulary.
pub fn normalize_agar(name: &str) -> AgarMedium {
    AGAR_MAPPING.get(name).copied().unwrap_or(AgarMedium::Blood)
}

/// Case-insensitive lookup; unrecognized hints collapse to Unknown.
pub fn normalize_species(hint: &str) -> Species {
    SPECIES_MAPPING
        .get(hint.to_lowercase().as_str())
        .copied()
        .unwrap_or(Species::Unknown)
}

/// Derives a species hint from the observed characteristics list.
pub fn species_from_characteristics(characteristics: &[String]) -> Species {
    let mentions_target = characteristics.iter().any(|c| c.contains("Burkholderia"))
        || characteristics
            .iter()
            .any(|c| c.to_lowercase().contains("pseudomallei"));
    if mentions_target {
        Species::Bpseudomallei
    } else {
        Species::Unknown
    }
}

/// Concatenates every decimal digit in order of appearance and parses the
/// result as the colony age in hours; no digits yields 48.
///
/// Known limitation: ranges collapse lossily, e.g. "24-48 hours" parses
/// as 2448. Kept as-is because the scaler was fitted against this parser.
pub fn extract_hours(colony_age: &str) -> u64 {
    let digits: String = colony_age.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(DEFAULT_COLONY_AGE_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agar_display_names_normalize() {
        assert_eq!(normalize_agar("Blood Agar"), AgarMedium::Blood);
        assert_eq!(normalize_agar("MacConkey Agar"), AgarMedium::Macconkey);
        assert_eq!(normalize_agar("Nutrient Agar"), AgarMedium::Nutrient);
        assert_eq!(normalize_agar("Ashdown Agar"), AgarMedium::Ashdown);
    }

    #[test]
    fn agar_normalization_is_idempotent_on_canonical_tokens() {
        for token in ["Blood", "Macconkey", "Nutrient", "Ashdown"] {
            let canonical = normalize_agar(token);
            let roundtrip: &'static str = canonical.into();
            assert_eq!(roundtrip, token);
            assert_eq!(normalize_agar(roundtrip), canonical);
        }
    }

    #[test]
    fn unrecognized_agar_falls_back_to_blood() {
        assert_eq!(normalize_agar("Chocolate Agar"), AgarMedium::Blood);
        // Lookup is case-sensitive on purpose.
        assert_eq!(normalize_agar("ashdown agar"), AgarMedium::Blood);
        assert_eq!(normalize_agar(""), AgarMedium::Blood);
    }

    #[test]
    fn species_lookup_is_case_insensitive() {
        assert_eq!(normalize_species("Burkholderia"), Species::Bpseudomallei);
        assert_eq!(normalize_species("BPSEUDOMALLEI"), Species::Bpseudomallei);
        assert_eq!(
            normalize_species("gram_negative_oxidase_positive"),
            Species::Unknown
        );
        assert_eq!(normalize_species("e. coli"), Species::Unknown);
    }

    #[test]
    fn characteristics_drive_species_hint() {
        let generic = vec!["Gram negative bacilli".to_string(), "Oxidase positive".to_string()];
        assert_eq!(species_from_characteristics(&generic), Species::Unknown);

        let named = vec!["Suspected Burkholderia".to_string()];
        assert_eq!(species_from_characteristics(&named), Species::Bpseudomallei);

        let lowercase = vec!["possible b. pseudomallei colony".to_string()];
        assert_eq!(species_from_characteristics(&lowercase), Species::Bpseudomallei);

        assert_eq!(species_from_characteristics(&[]), Species::Unknown);
    }

    #[test]
    fn digitless_age_defaults_to_48() {
        assert_eq!(extract_hours("overnight"), 48);
        assert_eq!(extract_hours(""), 48);
    }

    #[test]
    fn hours_are_concatenated_digits() {
        assert_eq!(extract_hours("48 hours"), 48);
        assert_eq!(extract_hours("72h"), 72);
        // Documented lossy behavior for ranged input.
        assert_eq!(extract_hours("24-48 hours"), 2448);
        assert_eq!(extract_hours("about 1 to 2 days"), 12);
    }
}
