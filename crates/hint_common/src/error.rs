//! Error types for the hint service.

use thiserror::Error;

/// Failure of a single generation attempt.
///
/// Every variant is recovered by advancing the fallback chain; none of them
/// reaches the end user as a hard error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("Generation API error: {status} - {body}")]
    Http { status: u16, body: String },

    #[error("Generation request failed: {0}")]
    Network(String),

    #[error("Invalid generation response format: {0}")]
    InvalidFormat(String),

    #[error("Generation API key is not configured")]
    MissingApiKey,
}

/// Failure talking to the persistent hint store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store is not available")]
    Disabled,

    #[error("Failed to open store: {0}")]
    Open(String),

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Title is not a valid lookup pattern: {0}")]
    InvalidPattern(String),

    #[error("Store connection lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum HintError {
    #[error("Question title is required")]
    Validation,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationFailure),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HintError {
    /// HTTP status code used when this error crosses the routing layer.
    pub fn status_code(&self) -> u16 {
        match self {
            HintError::Validation => 400,
            HintError::StoreUnavailable(_) => 503,
            HintError::Generation(_) => 502,
            HintError::Config(_) => 500,
            HintError::Io(_) => 500,
            HintError::Json(_) => 400,
            HintError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failure_carries_status_and_body() {
        let err = GenerationFailure::Http {
            status: 500,
            body: "upstream exploded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Generation API error: 500 - upstream exploded"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(HintError::Validation.status_code(), 400);
        assert_eq!(
            HintError::from(StoreError::Poisoned).status_code(),
            503
        );
        assert_eq!(
            HintError::from(GenerationFailure::MissingApiKey).status_code(),
            502
        );
    }
}
