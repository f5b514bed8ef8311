// Gateway trait for the external route-optimization backend
use crate::domain::trip::TripRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Response body exactly as the backend sent it. Shape varies by backend
/// version; see `normalizer`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBackendResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// One entry of a backend validation failure (`{loc, msg}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub location: Vec<String>,
    pub message: String,
}

impl FieldIssue {
    /// Dotted field path without the leading `body` segment.
    pub fn field(&self) -> String {
        let segments: Vec<&str> = self
            .location
            .iter()
            .map(String::as_str)
            .skip_while(|s| *s == "body")
            .collect();
        if segments.is_empty() {
            self.location.join(".")
        } else {
            segments.join(".")
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field(), issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error("route service unreachable: {0}")]
    Unreachable(String),

    #[error("backend rejected the request: {}", join_issues(.0))]
    Validation(Vec<FieldIssue>),

    #[error("backend returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },
}

impl GatewayError {
    /// Single line shown to the user under the form.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Unreachable(_) => {
                "Could not reach the route optimization service. Check that the server is running and try again."
                    .to_string()
            }
            GatewayError::Validation(issues) => format!("Invalid input: {}", join_issues(issues)),
            GatewayError::Upstream { status, message } => {
                format!("Route optimization failed (HTTP {}): {}", status, message)
            }
        }
    }
}

#[async_trait]
pub trait RouteGateway: Send + Sync {
    /// Send one trip to the backend. No retry.
    async fn submit_route(&self, request: &TripRequest) -> Result<RawBackendResponse, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field_and_reason() {
        let err = GatewayError::Validation(vec![FieldIssue {
            location: vec!["body".to_string(), "current_charge_percent".to_string()],
            message: "field required".to_string(),
        }]);

        assert_eq!(
            err.user_message(),
            "Invalid input: current_charge_percent: field required"
        );
    }

    #[test]
    fn test_validation_joins_multiple_issues() {
        let err = GatewayError::Validation(vec![
            FieldIssue {
                location: vec!["body".to_string(), "ev_type".to_string()],
                message: "field required".to_string(),
            },
            FieldIssue {
                location: vec!["body".to_string(), "waypoints".to_string(), "0".to_string()],
                message: "str type expected".to_string(),
            },
        ]);

        assert_eq!(
            err.user_message(),
            "Invalid input: ev_type: field required; waypoints.0: str type expected"
        );
    }

    #[test]
    fn test_unreachable_message_differs_from_validation() {
        let unreachable = GatewayError::Unreachable("connection refused".to_string());
        assert!(unreachable.user_message().contains("server is running"));
        assert!(!unreachable.user_message().starts_with("Invalid input"));
    }

    #[test]
    fn test_upstream_message_carries_raw_detail() {
        let err = GatewayError::Upstream {
            status: 400,
            message: "Input Error: EV not found".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "Route optimization failed (HTTP 400): Input Error: EV not found"
        );
    }
}
