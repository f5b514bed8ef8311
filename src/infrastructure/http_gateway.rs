// HTTP gateway to the route-optimization backend
use crate::application::route_gateway::{FieldIssue, GatewayError, RawBackendResponse, RouteGateway};
use crate::domain::trip::TripRequest;
use crate::infrastructure::config::FieldMapping;
use async_trait::async_trait;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct HttpRouteGateway {
    client: reqwest::Client,
    endpoint: String,
    mapping: FieldMapping,
}

impl HttpRouteGateway {
    pub fn new(base_url: &str, path: &str, mapping: FieldMapping) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            mapping,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, request: &TripRequest) -> Value {
        let m = &self.mapping;
        let fields = [
            (&m.vehicle, Value::from(request.vehicle.clone())),
            (&m.range_km, wire_number(request.range_km)),
            (&m.current_charge_percent, wire_number(request.current_charge_percent)),
            (&m.start, Value::from(request.start.clone())),
            (&m.destination, Value::from(request.destination.clone())),
            (&m.charger_preference, Value::from(request.charger_preference.as_str())),
            (&m.waypoints, Value::from(request.waypoints.clone())),
        ];

        let body: Map<String, Value> = fields
            .into_iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.clone(), value))
            .collect();
        Value::Object(body)
    }
}

/// Whole numbers go out as integers; older backends validate these as ints.
fn wire_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

#[async_trait]
impl RouteGateway for HttpRouteGateway {
    async fn submit_route(&self, request: &TripRequest) -> Result<RawBackendResponse, GatewayError> {
        let body = self.request_body(request);
        tracing::info!(
            endpoint = %self.endpoint,
            start = %request.start,
            destination = %request.destination,
            "Submitting route request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint = %self.endpoint, error = %e, "Route backend unreachable");
                GatewayError::Unreachable(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Route backend returned an error");
            return Err(classify_failure(status.as_u16(), &text));
        }

        let body = serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Route backend returned a non-JSON success body");
            Value::Null
        });

        Ok(RawBackendResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn classify_failure(status: u16, text: &str) -> GatewayError {
    let parsed: Option<Value> = serde_json::from_str(text).ok();
    let detail = parsed
        .as_ref()
        .and_then(|v| v.get("detail").or_else(|| v.is_array().then_some(v)));

    match detail {
        Some(Value::Array(items)) => {
            let issues: Vec<FieldIssue> = items.iter().filter_map(field_issue).collect();
            if !issues.is_empty() {
                return GatewayError::Validation(issues);
            }
        }
        Some(Value::String(message)) => {
            return GatewayError::Upstream {
                status,
                message: message.clone(),
            };
        }
        _ => {}
    }

    let message = text.trim();
    GatewayError::Upstream {
        status,
        message: if message.is_empty() {
            "no response body".to_string()
        } else {
            message.to_string()
        },
    }
}

fn field_issue(value: &Value) -> Option<FieldIssue> {
    let obj = value.as_object()?;
    let message = obj
        .get("msg")
        .or_else(|| obj.get("message"))
        .and_then(Value::as_str)?
        .to_string();
    let location = obj
        .get("loc")
        .or_else(|| obj.get("location"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| match p {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(FieldIssue { location, message })
}
