//! Field resolution across the response, its summary and the submitted claim.

use crate::types::claim::SubmittedClaim;
use crate::types::response::PredictionResponse;
use serde_json::{Map, Value};

/// Claim fields read by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimField {
    IncidentType,
    IncidentSeverity,
    InjuryClaim,
    PropertyClaim,
    VehicleClaim,
    Witnesses,
    VehiclesInvolved,
    PoliceReport,
    PropertyDamage,
    BodilyInjuries,
    IncidentHour,
    MonthsAsCustomer,
    RiskFactors,
}

impl ClaimField {
    /// Key of the field on the response and the submitted claim
    pub fn key(self) -> &'static str {
        match self {
            ClaimField::IncidentType => "incident_type",
            ClaimField::IncidentSeverity => "incident_severity",
            ClaimField::InjuryClaim => "injury_claim",
            ClaimField::PropertyClaim => "property_claim",
            ClaimField::VehicleClaim => "vehicle_claim",
            ClaimField::Witnesses => "witnesses",
            ClaimField::VehiclesInvolved => "vehicles_involved",
            ClaimField::PoliceReport => "police_report",
            ClaimField::PropertyDamage => "property_damage",
            ClaimField::BodilyInjuries => "bodily_injuries",
            ClaimField::IncidentHour => "incident_hour",
            ClaimField::MonthsAsCustomer => "months_as_customer",
            ClaimField::RiskFactors => "risk_factors",
        }
    }

    /// Key of the field inside a response `summary`, if it is carried there
    fn summary_key(self) -> Option<&'static str> {
        match self {
            ClaimField::IncidentType => Some("incident_type"),
            ClaimField::IncidentSeverity => Some("severity"),
            ClaimField::VehiclesInvolved => Some("vehicles_involved"),
            ClaimField::Witnesses => Some("witnesses"),
            _ => None,
        }
    }
}

/// One place a field value may come from
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    pub record: &'a Map<String, Value>,
    pub key: &'a str,
}

/// Return the first value across `sources` that `extract` accepts.
pub fn resolve_first<'a, T>(
    sources: &[Source<'a>],
    extract: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    sources
        .iter()
        .filter_map(|source| source.record.get(source.key))
        .find_map(extract)
}

/// Resolves claim fields in fallback order: summary, response, submitted claim.
pub struct FieldResolver<'a> {
    response: &'a PredictionResponse,
    submitted: &'a SubmittedClaim,
}

impl<'a> FieldResolver<'a> {
    /// Resolver over a response and the claim it answers
    pub fn new(response: &'a PredictionResponse, submitted: &'a SubmittedClaim) -> Self {
        Self {
            response,
            submitted,
        }
    }

    /// Ordered sources for a field
    pub fn sources(&self, field: ClaimField) -> Vec<Source<'a>> {
        let mut sources = Vec::with_capacity(3);

        if let (Some(summary), Some(key)) = (self.response.summary(), field.summary_key()) {
            sources.push(Source {
                record: summary,
                key,
            });
        }
        sources.push(Source {
            record: self.response.body(),
            key: field.key(),
        });
        sources.push(Source {
            record: self.submitted.fields(),
            key: field.key(),
        });

        sources
    }

    /// First source value accepted by `extract`
    pub fn resolve<T>(&self, field: ClaimField, extract: impl Fn(&'a Value) -> Option<T>) -> Option<T> {
        resolve_first(&self.sources(field), extract)
    }

    /// Non-empty text field, or `default`
    pub fn text(&self, field: ClaimField, default: &str) -> String {
        self.resolve(field, as_text)
            .unwrap_or(default)
            .to_string()
    }

    /// Non-negative amount, or 0
    pub fn amount(&self, field: ClaimField) -> f64 {
        self.resolve(field, as_amount).unwrap_or(0.0)
    }

    /// Whole non-negative count, or `default`
    pub fn count(&self, field: ClaimField, default: u32) -> u32 {
        self.resolve(field, as_count).unwrap_or(default)
    }
}

/// Non-empty string value
pub fn as_text(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Finite, non-negative number, given as a JSON number or numeric string
pub fn as_amount(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

/// Whole, non-negative number that fits a `u32`
pub fn as_count(value: &Value) -> Option<u32> {
    as_amount(value)
        .filter(|n| n.fract() == 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32)
}

/// Reconciled and defaulted claim record the risk rules run against
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimFacts {
    pub incident_type: String,
    pub incident_severity: String,
    pub injury_claim: f64,
    pub property_claim: f64,
    pub vehicle_claim: f64,
    pub witnesses: u32,
    pub vehicles_involved: u32,
    pub police_report: String,
    pub property_damage: String,
    pub bodily_injuries: u32,
    pub incident_hour: f64,
    pub months_as_customer: f64,
}

pub const NOT_SPECIFIED: &str = "Not Specified";
pub const YES: &str = "YES";
pub const NO: &str = "NO";

impl ClaimFacts {
    /// Resolve every claim field, falling back to its default
    pub fn resolve(fields: &FieldResolver<'_>) -> Self {
        Self {
            incident_type: fields.text(ClaimField::IncidentType, NOT_SPECIFIED),
            incident_severity: fields.text(ClaimField::IncidentSeverity, NOT_SPECIFIED),
            injury_claim: fields.amount(ClaimField::InjuryClaim),
            property_claim: fields.amount(ClaimField::PropertyClaim),
            vehicle_claim: fields.amount(ClaimField::VehicleClaim),
            witnesses: fields.count(ClaimField::Witnesses, 0),
            vehicles_involved: fields
                .resolve(ClaimField::VehiclesInvolved, |v| as_count(v).filter(|n| *n >= 1))
                .unwrap_or(1),
            police_report: fields.text(ClaimField::PoliceReport, NO),
            property_damage: fields.text(ClaimField::PropertyDamage, NO),
            bodily_injuries: fields.count(ClaimField::BodilyInjuries, 0),
            incident_hour: fields.amount(ClaimField::IncidentHour),
            months_as_customer: fields.amount(ClaimField::MonthsAsCustomer),
        }
    }

    /// Sum of the three claim amounts; overflows to infinity for huge amounts
    pub fn total_claim(&self) -> f64 {
        self.injury_claim + self.property_claim + self.vehicle_claim
    }

    /// Total claim bounded to a finite value for the assessment record
    pub fn reported_total_claim(&self) -> f64 {
        self.total_claim().min(f64::MAX)
    }

    /// Police report value is `YES`
    pub fn police_report_filed(&self) -> bool {
        self.police_report == YES
    }

    /// Property damage value is `YES`
    pub fn property_damage_reported(&self) -> bool {
        self.property_damage == YES
    }
}
