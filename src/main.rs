//! Claim Assessment - Main Entry Point
//!
//! Reads prediction API responses and submitted claims, normalizes them and
//! prints assessment reports as JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use claim_assessment::{
    cli::{Cli, Commands},
    config::{AppConfig, LogFormat, LoggingConfig},
    AssessmentReport, AssessmentStats, ClaimResultNormalizer, PredictionResponse, SubmittedClaim,
};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// One line of batch input
#[derive(Debug, Deserialize)]
struct BatchEntry {
    response: Value,
    #[serde(default)]
    submission: SubmittedClaim,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging)?;

    info!(
        predict_url = %config.api.predict_url(),
        fraud_threshold = config.assessment.fraud_threshold,
        "Claim assessment starting"
    );

    let normalizer = ClaimResultNormalizer::new(config.assessment);

    match cli.command {
        Commands::Assess {
            response,
            submission,
            pretty,
        } => assess(&normalizer, &response, submission.as_deref(), pretty),
        Commands::Batch { input } => batch(&normalizer, &input),
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => AppConfig::load(),
        None => Ok(AppConfig::default()),
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("claim_assessment={}", logging.level).parse()?)
        .add_directive(format!("claim_assess={}", logging.level).parse()?);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }

    Ok(())
}

fn assess(
    normalizer: &ClaimResultNormalizer,
    response_path: &Path,
    submission_path: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let body = fs::read(response_path)
        .with_context(|| format!("Failed to read response {}", response_path.display()))?;
    let response = PredictionResponse::parse(&body)
        .with_context(|| format!("Failed to get prediction from {}", response_path.display()))?;

    let submission = match submission_path {
        Some(path) => read_submission(path)?,
        None => SubmittedClaim::default(),
    };

    let report = AssessmentReport::new(normalizer.normalize(&response, &submission));
    info!(
        assessment_id = %report.assessment_id,
        fraud_probability = report.assessment.fraud_probability,
        risk_level = ?report.assessment.risk_level,
        "Claim assessed"
    );

    let output = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);

    Ok(())
}

fn read_submission(path: &Path) -> Result<SubmittedClaim> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read submission {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Submission {} is not a JSON object", path.display()))
}

fn batch(normalizer: &ClaimResultNormalizer, input: &Path) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read batch input {}", input.display()))?;
    let mut stats = AssessmentStats::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let entry: BatchEntry = match serde_json::from_str(line) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(line = line_no, error = %e, "Failed to deserialize batch entry");
                stats.record_failure();
                continue;
            }
        };

        let response = match PredictionResponse::from_api_body(entry.response) {
            Ok(response) => response,
            Err(e) => {
                warn!(line = line_no, error = %e, "Prediction response rejected");
                stats.record_failure();
                continue;
            }
        };

        let report = AssessmentReport::new(normalizer.normalize(&response, &entry.submission));
        stats.record(&report.assessment);
        debug!(
            line = line_no,
            assessment_id = %report.assessment_id,
            risk_level = ?report.assessment.risk_level,
            "Claim assessed"
        );

        println!("{}", serde_json::to_string(&report)?);
    }

    stats.log_summary();
    Ok(())
}
