//! Canonical claim assessment produced by the normalizer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Determine risk level from a fraud probability and thresholds.
    ///
    /// A non-numeric probability is treated as `Low`.
    pub fn from_probability(probability: f64, thresholds: &RiskLevelThresholds) -> Self {
        if probability.is_nan() || probability < thresholds.medium {
            RiskLevel::Low
        } else if probability < thresholds.high {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// CSS class used by the rendering layer for the risk badge
    pub fn badge_class(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Configurable risk level thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLevelThresholds {
    /// Lowest probability classified `Medium`
    pub medium: f64,
    /// Lowest probability classified `High`
    pub high: f64,
}

impl Default for RiskLevelThresholds {
    fn default() -> Self {
        Self {
            medium: 0.3,
            high: 0.7,
        }
    }
}

/// Fully-defaulted, typed result of normalizing a prediction response
/// against the submitted claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAssessment {
    /// Fraud probability, normally in [0, 1]
    pub fraud_probability: f64,

    /// `fraud_probability` above the fraud threshold
    pub is_fraudulent: bool,

    pub risk_level: RiskLevel,

    /// Human-readable explanations in generation order
    pub risk_factors: Vec<String>,

    pub incident_type: String,
    pub incident_severity: String,

    pub injury_claim: f64,
    pub property_claim: f64,
    pub vehicle_claim: f64,

    pub witnesses: u32,
    pub vehicles_involved: u32,

    pub police_report_filed: bool,
    pub property_damage_reported: bool,

    pub bodily_injuries: u32,

    /// Sum of the three claim amounts
    pub total_claim: f64,
}

/// Assessment as emitted by the `claim-assess` binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier
    pub assessment_id: String,

    /// Report generation timestamp
    pub assessed_at: DateTime<Utc>,

    pub assessment: CanonicalAssessment,
}

impl AssessmentReport {
    /// Wrap an assessment with a fresh identifier and timestamp
    pub fn new(assessment: CanonicalAssessment) -> Self {
        Self {
            assessment_id: uuid::Uuid::new_v4().to_string(),
            assessed_at: Utc::now(),
            assessment,
        }
    }
}
