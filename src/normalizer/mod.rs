//! Normalization of prediction responses into canonical claim assessments

pub mod fields;
pub mod probability;
pub mod risk_factors;

use crate::config::AssessmentConfig;
use crate::types::assessment::{CanonicalAssessment, RiskLevel};
use crate::types::claim::SubmittedClaim;
use crate::types::response::PredictionResponse;
use fields::{ClaimFacts, ClaimField, FieldResolver};
use tracing::debug;

/// Turns a loosely-shaped prediction response plus the submitted claim into
/// a fully populated [`CanonicalAssessment`].
///
/// Normalization never fails. Missing or mistyped input falls back to the
/// submitted claim and then to defaults.
#[derive(Debug, Clone, Default)]
pub struct ClaimResultNormalizer {
    config: AssessmentConfig,
}

impl ClaimResultNormalizer {
    /// Create a normalizer with the given assessment settings
    pub fn new(config: AssessmentConfig) -> Self {
        Self { config }
    }

    /// Get the assessment settings
    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Normalize a response against the submitted claim
    pub fn normalize(
        &self,
        response: &PredictionResponse,
        submitted: &SubmittedClaim,
    ) -> CanonicalAssessment {
        let fields = FieldResolver::new(response, submitted);
        let facts = ClaimFacts::resolve(&fields);

        let resolved = probability::resolve(response.body(), &self.config.labels);
        let fraud_probability = probability::clamp(resolved.value);
        let is_fraudulent = fraud_probability > self.config.fraud_threshold;
        let risk_level = RiskLevel::from_probability(fraud_probability, &self.config.risk_levels);

        let declared = fields.resolve(ClaimField::RiskFactors, |v| v.as_object());
        let risk_factors = risk_factors::derive(&facts, declared, is_fraudulent);

        debug!(
            shape = response.shape(),
            probability_source = ?resolved.source,
            fraud_probability,
            risk_level = ?risk_level,
            factors = risk_factors.len(),
            "Claim result normalized"
        );

        CanonicalAssessment {
            fraud_probability,
            is_fraudulent,
            risk_level,
            risk_factors,
            total_claim: facts.reported_total_claim(),
            police_report_filed: facts.police_report_filed(),
            property_damage_reported: facts.property_damage_reported(),
            incident_type: facts.incident_type,
            incident_severity: facts.incident_severity,
            injury_claim: facts.injury_claim,
            property_claim: facts.property_claim,
            vehicle_claim: facts.vehicle_claim,
            witnesses: facts.witnesses,
            vehicles_involved: facts.vehicles_involved,
            bodily_injuries: facts.bodily_injuries,
        }
    }
}

/// Normalize with the default assessment configuration
pub fn normalize(response: &PredictionResponse, submitted: &SubmittedClaim) -> CanonicalAssessment {
    ClaimResultNormalizer::default().normalize(response, submitted)
}
