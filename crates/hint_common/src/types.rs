//! Wire types shared between the hint daemon and its callers.

use serde::{Deserialize, Serialize};

/// Which stage of the fallback chain produced a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintSource {
    /// Previously generated hint found in the store
    Database,
    /// Freshly generated by the remote language model
    Generative,
    /// Keyword-table match after a generation failure
    Fallback,
    /// Generic pool pick after an unexpected error
    Emergency,
}

impl HintSource {
    /// Degradation note attached to lower-trust answers.
    pub fn degradation_message(&self) -> Option<&'static str> {
        match self {
            Self::Database | Self::Generative => None,
            Self::Fallback => {
                Some("AI service temporarily unavailable, using pattern-based hint")
            }
            Self::Emergency => Some("Service temporarily unavailable, using generic hint"),
        }
    }

    /// True for answers produced by the store or the language model.
    pub fn is_authoritative(&self) -> bool {
        matches!(self, Self::Database | Self::Generative)
    }
}

impl std::fmt::Display for HintSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Database => "database",
            Self::Generative => "generative",
            Self::Fallback => "fallback",
            Self::Emergency => "emergency",
        };
        write!(f, "{}", s)
    }
}

/// Final answer of one resolution, serialized as `{ hint, source, message? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub hint: String,
    pub source: HintSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResolutionResult {
    /// Build a result; the message is derived from the source so that only
    /// degraded answers ever carry one.
    pub fn new(hint: impl Into<String>, source: HintSource) -> Self {
        Self {
            hint: hint.into(),
            source,
            message: source.degradation_message().map(str::to_string),
        }
    }

    pub fn database(hint: impl Into<String>) -> Self {
        Self::new(hint, HintSource::Database)
    }

    pub fn generative(hint: impl Into<String>) -> Self {
        Self::new(hint, HintSource::Generative)
    }

    pub fn fallback(hint: impl Into<String>) -> Self {
        Self::new(hint, HintSource::Fallback)
    }

    pub fn emergency(hint: impl Into<String>) -> Self {
        Self::new(hint, HintSource::Emergency)
    }
}

/// Stored (title, hint) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRecord {
    pub title: String,
    pub hint: String,
}

impl HintRecord {
    pub fn new(title: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            hint: hint.into(),
        }
    }
}

/// Inbound body of `POST /api/hint`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintRequest {
    #[serde(default)]
    pub question_title: Option<String>,
}

impl HintRequest {
    /// Returns the trimmed title, or None when absent or blank.
    pub fn validated_title(&self) -> Option<&str> {
        self.question_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Body of `GET /api/test-generation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationCheckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub error: String,
    pub available_routes: Vec<String>,
}
