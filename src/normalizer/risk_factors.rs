//! Risk-factor derivation.
//!
//! Factors declared by the prediction service take precedence. Otherwise a
//! fixed, ordered list of rules is evaluated against the reconciled claim.

use crate::normalizer::fields::{ClaimFacts, NO};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

pub const NO_FACTORS_MESSAGE: &str = "No specific risk factors identified";
pub const ERROR_MESSAGE: &str = "Error analyzing risk factors";

const MINOR_DAMAGE: &str = "Minor Damage";
const MAJOR_DAMAGE: &str = "Major Damage";

/// Fault while evaluating the rule list
#[derive(Debug, Error)]
pub(crate) enum RiskFactorError {
    #[error("total claim amount is not finite: {0}")]
    NonFiniteTotal(f64),
}

/// Which classification a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applies {
    Fraudulent,
    Legitimate,
    Always,
}

impl Applies {
    fn includes(self, is_fraudulent: bool) -> bool {
        match self {
            Applies::Fraudulent => is_fraudulent,
            Applies::Legitimate => !is_fraudulent,
            Applies::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Message {
    Fixed(&'static str),
    /// "Unusually high total claim amount ($N)"
    HighTotal,
}

impl Message {
    fn render(self, facts: &ClaimFacts) -> String {
        match self {
            Message::Fixed(text) => text.to_string(),
            Message::HighTotal => format!(
                "Unusually high total claim amount (${})",
                format_amount(facts.total_claim())
            ),
        }
    }
}

struct Rule {
    applies: Applies,
    matches: fn(&ClaimFacts) -> bool,
    message: Message,
}

static RULES: [Rule; 15] = [
    Rule {
        applies: Applies::Fraudulent,
        matches: |f| f.police_report == NO,
        message: Message::Fixed("No police report filed for a major incident"),
    },
    Rule {
        applies: Applies::Fraudulent,
        matches: |f| f.witnesses == 0,
        message: Message::Fixed("No witnesses present during the incident"),
    },
    Rule {
        applies: Applies::Fraudulent,
        matches: |f| f.total_claim() > 30_000.0,
        message: Message::HighTotal,
    },
    Rule {
        applies: Applies::Fraudulent,
        matches: |f| (22.0..24.0).contains(&f.incident_hour) || (0.0..=4.0).contains(&f.incident_hour),
        message: Message::Fixed("Incident occurred during late night hours"),
    },
    Rule {
        applies: Applies::Fraudulent,
        matches: |f| f.bodily_injuries >= 2,
        message: Message::Fixed("Multiple bodily injuries reported"),
    },
    Rule {
        applies: Applies::Fraudulent,
        matches: |f| f.incident_severity == MINOR_DAMAGE && f.vehicle_claim > 10_000.0,
        message: Message::Fixed("Vehicle claim amount unusually high for minor damage"),
    },
    Rule {
        applies: Applies::Legitimate,
        matches: |f| f.police_report_filed(),
        message: Message::Fixed("Police report properly filed"),
    },
    Rule {
        applies: Applies::Legitimate,
        matches: |f| f.witnesses >= 2,
        message: Message::Fixed("Multiple witnesses present"),
    },
    Rule {
        applies: Applies::Legitimate,
        matches: |f| f.incident_type.contains("Collision") && f.vehicles_involved > 1,
        message: Message::Fixed("Consistent vehicle involvement with reported incident type"),
    },
    Rule {
        applies: Applies::Legitimate,
        matches: |f| f.months_as_customer > 60.0,
        message: Message::Fixed("Long-term customer with good history"),
    },
    Rule {
        applies: Applies::Legitimate,
        matches: |f| f.incident_severity == MAJOR_DAMAGE && f.vehicle_claim > 15_000.0,
        message: Message::Fixed("Vehicle claim amount consistent with major damage"),
    },
    Rule {
        applies: Applies::Always,
        matches: |f| f.property_damage_reported() && f.property_claim <= 1_000.0,
        message: Message::Fixed("Property damage claim amount is reasonable"),
    },
    Rule {
        applies: Applies::Always,
        matches: |f| f.injury_claim > 15_000.0,
        message: Message::Fixed("Injury claim amount is above average"),
    },
    Rule {
        applies: Applies::Always,
        matches: |f| f.incident_severity == MAJOR_DAMAGE && f.vehicle_claim < 10_000.0,
        message: Message::Fixed("Vehicle claim amount lower than expected for reported damage"),
    },
    Rule {
        applies: Applies::Always,
        matches: |f| f.incident_severity == MINOR_DAMAGE && f.vehicle_claim > 10_000.0,
        message: Message::Fixed("Vehicle claim amount higher than expected for reported damage"),
    },
];

/// Derive the risk factors for a claim. Never fails: a fault while
/// evaluating rules yields a single [`ERROR_MESSAGE`].
pub fn derive(
    facts: &ClaimFacts,
    declared: Option<&Map<String, Value>>,
    is_fraudulent: bool,
) -> Vec<String> {
    let declared = declared.map(declared_factors).unwrap_or_default();
    if !declared.is_empty() {
        return declared;
    }

    match apply_rules(facts, is_fraudulent) {
        Ok(factors) if factors.is_empty() => vec![NO_FACTORS_MESSAGE.to_string()],
        Ok(factors) => factors,
        Err(e) => {
            warn!(error = %e, "Risk factor derivation failed");
            vec![ERROR_MESSAGE.to_string()]
        }
    }
}

/// Readable names of the declared factors flagged `true`, in response order
fn declared_factors(declared: &Map<String, Value>) -> Vec<String> {
    declared
        .iter()
        .filter(|(_, flagged)| **flagged == Value::Bool(true))
        .map(|(key, _)| humanize_key(key))
        .collect()
}

fn apply_rules(facts: &ClaimFacts, is_fraudulent: bool) -> Result<Vec<String>, RiskFactorError> {
    let total = facts.total_claim();
    if !total.is_finite() {
        return Err(RiskFactorError::NonFiniteTotal(total));
    }

    Ok(RULES
        .iter()
        .filter(|rule| rule.applies.includes(is_fraudulent) && (rule.matches)(facts))
        .map(|rule| rule.message.render(facts))
        .collect())
}

/// `"no_police_report"` becomes `"No Police Report"`.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut previous_is_word = false;

    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric();
        if is_word && !previous_is_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        previous_is_word = is_word;
    }

    out
}

/// Format an amount with thousands separators and at most three
/// fraction digits (`35000.5` is `"35,000.5"`).
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.3}", amount.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if amount < 0.0 && (integer != "0" || !fraction.is_empty()) {
        out.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn facts() -> ClaimFacts {
        ClaimFacts {
            incident_type: "Not Specified".to_string(),
            incident_severity: "Not Specified".to_string(),
            injury_claim: 0.0,
            property_claim: 0.0,
            vehicle_claim: 0.0,
            witnesses: 1,
            vehicles_involved: 1,
            police_report: "YES".to_string(),
            property_damage: "NO".to_string(),
            bodily_injuries: 0,
            incident_hour: 12.0,
            months_as_customer: 10.0,
        }
    }

    #[test]
    fn test_fraudulent_rules_in_order() {
        let facts = ClaimFacts {
            police_report: "NO".to_string(),
            witnesses: 0,
            injury_claim: 20_000.0,
            property_claim: 5_000.0,
            vehicle_claim: 11_000.0,
            incident_hour: 23.0,
            bodily_injuries: 2,
            incident_severity: "Minor Damage".to_string(),
            ..facts()
        };

        assert_eq!(
            derive(&facts, None, true),
            vec![
                "No police report filed for a major incident",
                "No witnesses present during the incident",
                "Unusually high total claim amount ($36,000)",
                "Incident occurred during late night hours",
                "Multiple bodily injuries reported",
                "Vehicle claim amount unusually high for minor damage",
                "Injury claim amount is above average",
                "Vehicle claim amount higher than expected for reported damage",
            ]
        );
    }

    #[test]
    fn test_legitimate_rules_in_order() {
        let facts = ClaimFacts {
            witnesses: 2,
            incident_type: "Multi-vehicle Collision".to_string(),
            vehicles_involved: 3,
            months_as_customer: 61.0,
            incident_severity: "Major Damage".to_string(),
            vehicle_claim: 16_000.0,
            property_damage: "YES".to_string(),
            property_claim: 1_000.0,
            ..facts()
        };

        assert_eq!(
            derive(&facts, None, false),
            vec![
                "Police report properly filed",
                "Multiple witnesses present",
                "Consistent vehicle involvement with reported incident type",
                "Long-term customer with good history",
                "Vehicle claim amount consistent with major damage",
                "Property damage claim amount is reasonable",
            ]
        );
    }

    #[test]
    fn test_late_night_window() {
        for (hour, expected) in [(21.0, false), (22.0, true), (0.0, true), (4.0, true), (5.0, false)] {
            let facts = ClaimFacts {
                incident_hour: hour,
                ..facts()
            };
            let factors = derive(&facts, None, true);
            assert_eq!(
                factors.contains(&"Incident occurred during late night hours".to_string()),
                expected,
                "hour {hour}"
            );
        }
    }

    #[test]
    fn test_major_damage_low_vehicle_claim() {
        let facts = ClaimFacts {
            incident_severity: "Major Damage".to_string(),
            vehicle_claim: 9_999.0,
            ..facts()
        };
        assert_eq!(
            derive(&facts, None, false),
            vec![
                "Police report properly filed",
                "Vehicle claim amount lower than expected for reported damage",
            ]
        );
    }

    #[test]
    fn test_no_factors_placeholder() {
        let facts = ClaimFacts {
            police_report: "?".to_string(),
            ..facts()
        };
        assert_eq!(derive(&facts, None, false), vec![NO_FACTORS_MESSAGE]);
    }

    #[test]
    fn test_declared_factors_short_circuit() {
        let declared = json!({
            "no_police_report": true,
            "high_claim_amount": true,
            "late_night": false,
            "odd_value": "yes"
        });
        let facts = ClaimFacts {
            police_report: "NO".to_string(),
            witnesses: 0,
            ..facts()
        };

        assert_eq!(
            derive(&facts, declared.as_object(), true),
            vec!["No Police Report", "High Claim Amount"]
        );
    }

    #[test]
    fn test_declared_without_true_falls_through() {
        let declared = json!({"late_night": false});
        assert_eq!(
            derive(&facts(), declared.as_object(), false),
            vec!["Police report properly filed"]
        );
    }

    #[test]
    fn test_non_finite_total_is_contained() {
        let facts = ClaimFacts {
            injury_claim: f64::MAX,
            property_claim: f64::MAX,
            ..facts()
        };
        assert_eq!(derive(&facts, None, true), vec![ERROR_MESSAGE]);
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("no_police_report"), "No Police Report");
        assert_eq!(humanize_key("claim-amount"), "Claim-Amount");
        assert_eq!(humanize_key("already Done"), "Already Done");
        assert_eq!(humanize_key("3rd_party"), "3rd Party");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(35_000.0), "35,000");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.891");
        assert_eq!(format_amount(30_000.5), "30,000.5");
        assert_eq!(format_amount(12.3456), "12.346");
    }
}
