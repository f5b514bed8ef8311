// Trip form - Raw field values as posted by the planner page
use crate::domain::trip::{ChargerPreference, TripRequest};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be {expected}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
    },

    #[error("charger preference '{value}' is not one of: {allowed}")]
    UnknownChargerPreference { value: String, allowed: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TripForm {
    pub vehicle: String,
    pub range_km: String,
    pub current_charge: String,
    pub start: String,
    pub destination: String,
    pub charger_preference: String,
    /// Comma or newline separated.
    pub waypoints: String,
}

impl TripForm {
    /// Presence and range checks only; the backend owns everything else.
    pub fn submit(&self, charger_vocabulary: &[String]) -> Result<TripRequest, FormError> {
        let vehicle = required("Vehicle", &self.vehicle)?;
        let range_km = number("Range", &self.range_km)?;
        if range_km <= 0.0 {
            return Err(FormError::OutOfRange {
                field: "Range",
                expected: "greater than 0 km",
            });
        }
        let current_charge_percent = number("Current charge", &self.current_charge)?;
        if !(0.0..=100.0).contains(&current_charge_percent) {
            return Err(FormError::OutOfRange {
                field: "Current charge",
                expected: "between 0 and 100 percent",
            });
        }
        let start = required("Start location", &self.start)?;
        let destination = required("Destination", &self.destination)?;

        let preference = required("Charger preference", &self.charger_preference)?;
        let charger_preference = ChargerPreference::parse(&preference, charger_vocabulary)
            .ok_or_else(|| FormError::UnknownChargerPreference {
                value: preference.clone(),
                allowed: charger_vocabulary.join(", "),
            })?;

        let waypoints = self
            .waypoints
            .split([',', '\n'])
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        Ok(TripRequest {
            vehicle,
            range_km,
            current_charge_percent,
            start,
            destination,
            charger_preference,
            waypoints,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(value.to_string())
    }
}

fn number(field: &'static str, value: &str) -> Result<f64, FormError> {
    let raw = required(field, value)?;
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(FormError::NotANumber { field, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vec<String> {
        vec!["any".to_string(), "level2".to_string(), "dc_fast".to_string()]
    }

    fn filled() -> TripForm {
        TripForm {
            vehicle: "Tata Nexon EV Max".to_string(),
            range_km: "453".to_string(),
            current_charge: "80".to_string(),
            start: " Bengaluru ".to_string(),
            destination: "Chennai".to_string(),
            charger_preference: "any".to_string(),
            waypoints: String::new(),
        }
    }

    #[test]
    fn test_submit_builds_trimmed_request() {
        let request = filled().submit(&vocabulary()).unwrap();
        assert_eq!(request.vehicle, "Tata Nexon EV Max");
        assert_eq!(request.range_km, 453.0);
        assert_eq!(request.current_charge_percent, 80.0);
        assert_eq!(request.start, "Bengaluru");
        assert_eq!(request.charger_preference.as_str(), "any");
        assert!(request.waypoints.is_empty());
    }

    #[test]
    fn test_missing_field_is_reported() {
        let form = TripForm {
            destination: "  ".to_string(),
            ..filled()
        };
        assert_eq!(
            form.submit(&vocabulary()),
            Err(FormError::Missing("Destination"))
        );
    }

    #[test]
    fn test_charge_must_be_within_percent_range() {
        for bad in ["-1", "100.5"] {
            let form = TripForm {
                current_charge: bad.to_string(),
                ..filled()
            };
            assert!(matches!(
                form.submit(&vocabulary()),
                Err(FormError::OutOfRange { field: "Current charge", .. })
            ));
        }

        for ok in ["0", "100"] {
            let form = TripForm {
                current_charge: ok.to_string(),
                ..filled()
            };
            assert!(form.submit(&vocabulary()).is_ok());
        }
    }

    #[test]
    fn test_range_must_be_positive_number() {
        let zero = TripForm {
            range_km: "0".to_string(),
            ..filled()
        };
        assert!(matches!(
            zero.submit(&vocabulary()),
            Err(FormError::OutOfRange { field: "Range", .. })
        ));

        let text = TripForm {
            range_km: "far".to_string(),
            ..filled()
        };
        assert_eq!(
            text.submit(&vocabulary()),
            Err(FormError::NotANumber {
                field: "Range",
                value: "far".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_charger_preference_lists_vocabulary() {
        let form = TripForm {
            charger_preference: "fast".to_string(),
            ..filled()
        };
        let err = form.submit(&vocabulary()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "charger preference 'fast' is not one of: any, level2, dc_fast"
        );
    }

    #[test]
    fn test_waypoints_are_split_and_trimmed() {
        let form = TripForm {
            waypoints: "Hosur, Krishnagiri\nVellore,,".to_string(),
            ..filled()
        };
        let request = form.submit(&vocabulary()).unwrap();
        assert_eq!(request.waypoints, vec!["Hosur", "Krishnagiri", "Vellore"]);
    }
}
