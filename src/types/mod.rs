//! Type definitions for claim assessment

pub mod assessment;
pub mod claim;
pub mod response;

pub use assessment::{AssessmentReport, CanonicalAssessment, RiskLevel};
pub use claim::SubmittedClaim;
pub use response::PredictionResponse;
