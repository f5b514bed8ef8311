// Route summary view - Fixed set of labelled fields for any result shape
use crate::domain::route::{Cost, RouteResult};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRow {
    pub sequence: usize,
    pub name: String,
    pub address: String,
    pub connectors: String,
    pub power: String,
    pub charge_time: String,
    pub cost: String,
}

/// Every label is always present; missing values read `N/A`.
pub fn summary_fields(result: Option<&RouteResult>) -> Vec<SummaryField> {
    let field = |label, value| SummaryField { label, value };

    vec![
        field(
            "Total distance",
            fixed(result.and_then(|r| r.total_distance_km), 2, "km"),
        ),
        field(
            "Total duration",
            format_duration(result.and_then(|r| r.total_duration_minutes)),
        ),
        field(
            "Driving time",
            format_duration(result.and_then(|r| r.driving_minutes)),
        ),
        field(
            "Charging time",
            format_duration(result.and_then(|r| r.charging_minutes)),
        ),
        field(
            "Charging stops",
            format_stop_count(result.and_then(|r| r.charging_stop_count)),
        ),
        field(
            "Energy consumed",
            fixed(result.and_then(|r| r.energy_consumed_kwh), 2, "kWh"),
        ),
        field(
            "Final charge",
            result
                .and_then(|r| r.final_charge_percent)
                .map(|p| format!("{:.1}%", p))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
    ]
}

pub fn stop_rows(result: Option<&RouteResult>) -> Vec<StopRow> {
    let Some(result) = result else {
        return Vec::new();
    };

    result
        .charging_stops
        .iter()
        .enumerate()
        .map(|(idx, stop)| StopRow {
            sequence: idx + 1,
            name: stop
                .name
                .clone()
                .unwrap_or_else(|| format!("Charging stop {}", idx + 1)),
            address: stop.address.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            connectors: match &stop.connector_types {
                Some(types) => types.iter().cloned().collect::<Vec<_>>().join(", "),
                None => "unknown".to_string(),
            },
            power: fixed(stop.power_kw, 0, "kW"),
            charge_time: format_duration(stop.recommended_charge_minutes),
            cost: match &stop.cost {
                Cost::Free => "Free".to_string(),
                Cost::Amount { amount, currency } => match currency {
                    Some(c) => format!("{:.2} {}", amount, c),
                    None => format!("{:.2}", amount),
                },
                Cost::Unspecified => NOT_AVAILABLE.to_string(),
            },
        })
        .collect()
}

/// `{H}h {M}m` when at least an hour, else `{M}m`.
pub fn format_duration(minutes: Option<f64>) -> String {
    let Some(minutes) = minutes else {
        return NOT_AVAILABLE.to_string();
    };
    let total = minutes.max(0.0).round() as u64;
    let (hours, mins) = (total / 60, total % 60);
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Zero is a known answer and reads `0 stops`, unlike an absent count.
pub fn format_stop_count(count: Option<u32>) -> String {
    match count {
        None => NOT_AVAILABLE.to_string(),
        Some(1) => "1 stop".to_string(),
        Some(n) => format!("{} stops", n),
    }
}

fn fixed(value: Option<f64>, precision: usize, unit: &str) -> String {
    value
        .map(|v| format!("{:.*} {}", precision, v, unit))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
