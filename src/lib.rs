//! Claim Assessment Library
//!
//! Normalizes loosely-shaped insurance-fraud prediction responses, together
//! with the claim that was submitted, into a canonical typed assessment with
//! human-readable risk factors.

pub mod cli;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod stats;
pub mod types;

pub use config::AppConfig;
pub use error::ResponseError;
pub use normalizer::{normalize, ClaimResultNormalizer};
pub use stats::AssessmentStats;
pub use types::{
    assessment::{AssessmentReport, CanonicalAssessment, RiskLevel},
    claim::SubmittedClaim,
    response::PredictionResponse,
};
