//! Error types for prediction response handling

use thiserror::Error;

/// Error type for reading a prediction API body
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResponseError {
    #[error("API returned failure: {0}")]
    ApiFailure(String),

    #[error("malformed prediction response: {0}")]
    MalformedJson(#[from] serde_json::Error),
}
