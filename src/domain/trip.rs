// Trip request domain model

/// Charger preference as selected in the form.
///
/// The accepted words differ between backend versions (`any/level2/dc_fast`
/// vs `standard/fast`), so the value is checked against the configured
/// vocabulary instead of a fixed enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargerPreference(String);

impl ChargerPreference {
    /// Accepts `value` when it is one of `vocabulary` (case-insensitive).
    pub fn parse(value: &str, vocabulary: &[String]) -> Option<Self> {
        let value = value.trim();
        vocabulary
            .iter()
            .find(|known| known.eq_ignore_ascii_case(value))
            .map(|known| Self(known.clone()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub vehicle: String,
    pub range_km: f64,
    pub current_charge_percent: f64,
    pub start: String,
    pub destination: String,
    pub charger_preference: ChargerPreference,
    pub waypoints: Vec<String>,
}
