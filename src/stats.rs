//! Statistics for batch assessment runs.

use crate::types::assessment::{CanonicalAssessment, RiskLevel};
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

/// Counters collected while assessing a batch of claims
#[derive(Debug)]
pub struct AssessmentStats {
    /// Claims assessed successfully
    pub assessed: u64,
    /// Lines that could not be assessed
    pub failed: u64,
    /// Assessments classified fraudulent
    pub fraudulent: u64,
    by_level: HashMap<RiskLevel, u64>,
    /// Fraud probability distribution buckets
    probability_buckets: [u64; 10],
    start_time: Instant,
}

impl AssessmentStats {
    /// Create a new statistics collector
    pub fn new() -> Self {
        Self {
            assessed: 0,
            failed: 0,
            fraudulent: 0,
            by_level: HashMap::new(),
            probability_buckets: [0; 10],
            start_time: Instant::now(),
        }
    }

    /// Record a completed assessment
    pub fn record(&mut self, assessment: &CanonicalAssessment) {
        self.assessed += 1;
        if assessment.is_fraudulent {
            self.fraudulent += 1;
        }
        *self.by_level.entry(assessment.risk_level).or_insert(0) += 1;

        let bucket = (assessment.fraud_probability * 10.0).clamp(0.0, 9.0) as usize;
        self.probability_buckets[bucket] += 1;
    }

    /// Record a line that could not be assessed
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Assessments recorded at a risk level
    pub fn count_for(&self, level: RiskLevel) -> u64 {
        self.by_level.get(&level).copied().unwrap_or(0)
    }

    /// Get fraud probability distribution
    pub fn probability_distribution(&self) -> [u64; 10] {
        self.probability_buckets
    }

    /// Assessments per second since creation
    pub fn throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.assessed as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Log summary statistics
    pub fn log_summary(&self) {
        let fraud_rate = if self.assessed > 0 {
            (self.fraudulent as f64 / self.assessed as f64) * 100.0
        } else {
            0.0
        };

        info!(
            assessed = self.assessed,
            failed = self.failed,
            fraudulent = self.fraudulent,
            fraud_rate = format!("{:.1}%", fraud_rate),
            throughput = format!("{:.1} claims/s", self.throughput()),
            "Batch assessment complete"
        );
        info!(
            low = self.count_for(RiskLevel::Low),
            medium = self.count_for(RiskLevel::Medium),
            high = self.count_for(RiskLevel::High),
            "Assessments by risk level"
        );

        let total: u64 = self.probability_buckets.iter().sum();
        for (i, &count) in self.probability_buckets.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let pct = (count as f64 / total as f64) * 100.0;
            info!(
                "  {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                "█".repeat(((pct / 5.0) as usize).min(20))
            );
        }
    }
}

impl Default for AssessmentStats {
    fn default() -> Self {
        Self::new()
    }
}
