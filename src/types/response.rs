//! Prediction API response shapes

use crate::error::ResponseError;
use serde::Deserialize;
use serde_json::{Map, Value};

const DEFAULT_FAILURE_MESSAGE: &str = "API returned failure status";

/// A prediction API response, classified once by shape.
///
/// Classification is by priority: an object `summary` wins over a
/// `prediction` label, and anything else is taken as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum PredictionResponse {
    /// Response carries a `summary` record of incident details
    Summarized {
        summary: Map<String, Value>,
        body: Map<String, Value>,
    },
    /// Response carries a `prediction` label; `probability` stands in for
    /// `fraud_probability`
    Labelled { body: Map<String, Value> },
    /// Any other response, used unchanged
    Bare { body: Map<String, Value> },
}

impl PredictionResponse {
    /// Classify a JSON value. Non-object values become an empty `Bare` response.
    pub fn from_value(value: Value) -> Self {
        let body = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        if let Some(summary) = body.get("summary").and_then(Value::as_object).cloned() {
            return Self::Summarized { summary, body };
        }

        if body.get("prediction").is_some_and(is_truthy) {
            return Self::Labelled { body };
        }

        Self::Bare { body }
    }

    /// Unwrap the API envelope and classify the result.
    ///
    /// A truthy `data` member replaces the body; a `status` of `"failure"`
    /// is reported as [`ResponseError::ApiFailure`].
    pub fn from_api_body(value: Value) -> Result<Self, ResponseError> {
        let value = match value {
            Value::Object(mut map) if map.get("data").is_some_and(is_truthy) => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };

        if value.get("status").and_then(Value::as_str) == Some("failure") {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_FAILURE_MESSAGE);
            return Err(ResponseError::ApiFailure(message.to_string()));
        }

        Ok(Self::from_value(value))
    }

    /// Parse and classify a raw API body
    pub fn parse(bytes: &[u8]) -> Result<Self, ResponseError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_api_body(value)
    }

    /// Top-level response record
    pub fn body(&self) -> &Map<String, Value> {
        match self {
            Self::Summarized { body, .. } | Self::Labelled { body } | Self::Bare { body } => body,
        }
    }

    /// Summary record, for summarized responses
    pub fn summary(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Summarized { summary, .. } => Some(summary),
            _ => None,
        }
    }

    /// Short name of the detected shape, for logging
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Summarized { .. } => "summarized",
            Self::Labelled { .. } => "labelled",
            Self::Bare { .. } => "bare",
        }
    }
}

impl From<Value> for PredictionResponse {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_takes_priority() {
        let response = PredictionResponse::from_value(json!({
            "summary": {"incident_type": "Parked Car"},
            "prediction": "Fraudulent"
        }));

        assert_eq!(response.shape(), "summarized");
        assert_eq!(
            response.summary().and_then(|s| s.get("incident_type")),
            Some(&json!("Parked Car"))
        );
    }

    #[test]
    fn test_labelled_and_bare() {
        let labelled = PredictionResponse::from_value(json!({"prediction": "Not Fraudulent"}));
        assert_eq!(labelled.shape(), "labelled");

        let empty_label = PredictionResponse::from_value(json!({"prediction": ""}));
        assert_eq!(empty_label.shape(), "bare");

        let scalar_summary = PredictionResponse::from_value(json!({"summary": "n/a"}));
        assert_eq!(scalar_summary.shape(), "bare");

        let not_object = PredictionResponse::from_value(json!([1, 2, 3]));
        assert_eq!(not_object, PredictionResponse::Bare { body: Map::new() });
    }

    #[test]
    fn test_envelope_is_unwrapped() {
        let response = PredictionResponse::from_api_body(json!({
            "status": "success",
            "data": {"prediction": "Fraudulent", "probability": 90}
        }))
        .unwrap();

        assert_eq!(response.shape(), "labelled");
        assert_eq!(response.body().get("probability"), Some(&json!(90)));
    }

    #[test]
    fn test_falsy_envelope_keeps_body() {
        for data in [json!(false), json!(""), json!(0), json!(null)] {
            let response = PredictionResponse::from_api_body(json!({
                "data": data,
                "prediction": "Fraudulent"
            }))
            .unwrap();

            assert_eq!(response.shape(), "labelled");
            assert_eq!(response.body().get("prediction"), Some(&json!("Fraudulent")));
        }
    }

    #[test]
    fn test_failure_status() {
        let err = PredictionResponse::from_api_body(json!({
            "status": "failure",
            "message": "model unavailable"
        }))
        .unwrap_err();
        assert!(matches!(err, ResponseError::ApiFailure(ref m) if m == "model unavailable"));

        let err = PredictionResponse::from_api_body(json!({"data": {"status": "failure"}}))
            .unwrap_err();
        assert_eq!(err.to_string(), "API returned failure: API returned failure status");
    }

    #[test]
    fn test_parse_malformed() {
        let err = PredictionResponse::parse(b"{not json").unwrap_err();
        assert!(matches!(err, ResponseError::MalformedJson(_)));
    }

    #[test]
    fn test_deserialize_classifies() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"fraud_probability": 0.2}"#).unwrap();
        assert_eq!(response.shape(), "bare");
    }
}
