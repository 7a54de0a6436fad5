//! Claim data as submitted through the assessment form

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Form fields that are submitted as numbers; all others are strings.
pub const NUMERIC_FIELDS: [&str; 12] = [
    "months_as_customer",
    "policy_deductable",
    "umbrella_limit",
    "capital-gains",
    "capital-loss",
    "incident_hour",
    "vehicles_involved",
    "bodily_injuries",
    "witnesses",
    "injury_claim",
    "property_claim",
    "vehicle_claim",
];

/// A single claim submission, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmittedClaim {
    fields: Map<String, Value>,
}

impl SubmittedClaim {
    /// Build a submission from raw form `(name, value)` pairs.
    ///
    /// Numeric fields are coerced the way a form number input is: blank is
    /// zero, anything unparseable is kept as text and later read as absent.
    pub fn from_form_fields<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, value)| {
                let name = name.into();
                let value = if is_numeric_field(&name) {
                    coerce_number(value.as_ref())
                } else {
                    Value::String(value.as_ref().to_string())
                };
                (name, value)
            })
            .collect();

        Self { fields }
    }

    /// Borrow the underlying field record
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a single field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// No fields were submitted
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for SubmittedClaim {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Whether a form field is submitted as a number
pub fn is_numeric_field(name: &str) -> bool {
    NUMERIC_FIELDS.contains(&name)
}

fn coerce_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::from(0);
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => {
            if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                Value::from(n as i64)
            } else {
                Number::from_f64(n)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(raw.to_string()))
            }
        }
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_fields_are_coerced() {
        let claim = SubmittedClaim::from_form_fields([
            ("witnesses", "2"),
            ("injury_claim", "1500.5"),
            ("incident_type", "Parked Car"),
            ("police_report", "YES"),
        ]);

        assert_eq!(claim.get("witnesses"), Some(&json!(2)));
        assert_eq!(claim.get("injury_claim"), Some(&json!(1500.5)));
        assert_eq!(claim.get("incident_type"), Some(&json!("Parked Car")));
        assert_eq!(claim.get("police_report"), Some(&json!("YES")));
    }

    #[test]
    fn test_blank_and_invalid_numbers() {
        let claim = SubmittedClaim::from_form_fields([
            ("vehicle_claim", ""),
            ("property_claim", "lots"),
            ("capital-gains", "1e999"),
        ]);

        assert_eq!(claim.get("vehicle_claim"), Some(&json!(0)));
        assert_eq!(claim.get("property_claim"), Some(&json!("lots")));
        assert_eq!(claim.get("capital-gains"), Some(&json!("1e999")));
    }

    #[test]
    fn test_deserialize_from_object() {
        let claim: SubmittedClaim =
            serde_json::from_value(json!({"witnesses": 0, "police_report": "NO"})).unwrap();

        assert_eq!(claim.fields().len(), 2);
        assert_eq!(claim.get("police_report"), Some(&json!("NO")));
        assert!(SubmittedClaim::default().is_empty());
    }
}
