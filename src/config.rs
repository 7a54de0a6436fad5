//! Configuration management for claim assessment

use crate::types::assessment::RiskLevelThresholds;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Log output format
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub assessment: AssessmentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Classification settings used by the normalizer
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentConfig {
    /// Probabilities strictly above this are classified fraudulent
    #[serde(default = "default_fraud_threshold")]
    pub fraud_threshold: f64,
    /// Risk level classification thresholds
    #[serde(default)]
    pub risk_levels: RiskLevelThresholds,
    /// Prediction labels understood when no probability is given
    #[serde(default)]
    pub labels: LabelConfig,
}

fn default_fraud_threshold() -> f64 {
    0.5
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            fraud_threshold: default_fraud_threshold(),
            risk_levels: RiskLevelThresholds::default(),
            labels: LabelConfig::default(),
        }
    }
}

/// Prediction label strings and the fixed probabilities they map to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub positive: String,
    pub negative: String,
    pub positive_probability: f64,
    pub negative_probability: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            positive: "Fraudulent".to_string(),
            negative: "Not Fraudulent".to_string(),
            positive_probability: 0.85,
            negative_probability: 0.15,
        }
    }
}

/// Upstream prediction API the responses come from
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the prediction service
    pub base_url: String,
    /// Path suffix of the prediction endpoint
    #[serde(default = "default_predict_path")]
    pub predict_path: String,
}

fn default_predict_path() -> String {
    "/predict".to_string()
}

impl ApiConfig {
    /// Full URL of the prediction endpoint
    pub fn predict_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.predict_path
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://your-api-domain.com/api".to_string(),
            predict_path: default_predict_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json)
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.assessment.fraud_threshold, 0.5);
        assert_eq!(config.assessment.risk_levels.medium, 0.3);
        assert_eq!(config.assessment.risk_levels.high, 0.7);
        assert_eq!(config.assessment.labels.positive, "Fraudulent");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_predict_url() {
        let api = ApiConfig {
            base_url: "https://example.test/api/".to_string(),
            predict_path: "/predict".to_string(),
        };
        assert_eq!(api.predict_url(), "https://example.test/api/predict");
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_path() {
        let file = write_config(
            "[assessment]\nfraud_threshold = 0.6\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\n",
        );

        let config = AppConfig::load_from_path(file.path()).unwrap();

        assert_eq!(config.assessment.fraud_threshold, 0.6);
        assert_eq!(config.assessment.risk_levels.high, 0.7);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.api.predict_path, "/predict");
    }

    #[test]
    fn test_partial_tables_use_defaults() {
        let file = write_config(
            "[assessment.labels]\npositive = \"Fraud\"\n\n[assessment.risk_levels]\nhigh = 0.8\n",
        );

        let config = AppConfig::load_from_path(file.path()).unwrap();

        assert_eq!(config.assessment.labels.positive, "Fraud");
        assert_eq!(config.assessment.labels.negative, "Not Fraudulent");
        assert_eq!(config.assessment.labels.positive_probability, 0.85);
        assert_eq!(config.assessment.risk_levels.medium, 0.3);
        assert_eq!(config.assessment.risk_levels.high, 0.8);
    }
}
