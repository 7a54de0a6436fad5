//! Fraud probability resolution.
//!
//! Prediction services disagree on units: `probability` is reported as a
//! percentage, `fraud_probability` as a fraction, and some services only send
//! a label.

use crate::config::LabelConfig;
use serde_json::{Map, Value};
use tracing::warn;

/// Where a fraud probability was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilitySource {
    /// Numeric `probability`, a percentage
    Percentage,
    /// Numeric `fraud_probability`, a fraction
    Fraction,
    /// Textual `probability`, a percentage
    PercentageText,
    /// Fixed probability for a known `prediction` label
    Label,
    Missing,
}

/// Probability as read from the response, before clamping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedProbability {
    pub value: f64,
    pub source: ProbabilitySource,
}

/// Read the fraud probability from a response body.
///
/// The result may be NaN or out of range; pass it through [`clamp`].
pub fn resolve(body: &Map<String, Value>, labels: &LabelConfig) -> ResolvedProbability {
    let probability = body.get("probability");

    let (value, source) = match (probability, body.get("fraud_probability")) {
        (Some(Value::Number(n)), _) => (number(n) / 100.0, ProbabilitySource::Percentage),
        (_, Some(Value::Number(n))) => (number(n), ProbabilitySource::Fraction),
        (Some(Value::String(s)), _) => (
            parse_leading_float(s).map_or(f64::NAN, |n| n / 100.0),
            ProbabilitySource::PercentageText,
        ),
        _ => match body.get("prediction").and_then(Value::as_str) {
            Some(label) if label == labels.positive => {
                (labels.positive_probability, ProbabilitySource::Label)
            }
            Some(label) if label == labels.negative => {
                (labels.negative_probability, ProbabilitySource::Label)
            }
            _ => (0.0, ProbabilitySource::Missing),
        },
    };

    ResolvedProbability { value, source }
}

fn number(n: &serde_json::Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

/// Bring a resolved probability into range.
///
/// NaN and negative values become 0. Values above 100 are read as
/// percentages. Values in (1, 100] are kept unchanged.
pub fn clamp(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else if value > 100.0 {
        value / 100.0
    } else {
        if value > 1.0 {
            warn!(
                probability = value,
                "Ambiguous fraud probability above 1 kept unscaled"
            );
        }
        value
    }
}

/// Parse the longest leading decimal number in `text`, ignoring leading
/// whitespace (`"85%"` is 85).
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let rest = &text[end..];
    if rest.starts_with("Infinity") {
        let sign = if text.starts_with('-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut cursor = fraction_start;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        mantissa_digits += cursor - fraction_start;
        end = cursor;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exponent_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exponent_start {
            end = cursor;
        }
    }

    text[..end].parse().ok()
}
