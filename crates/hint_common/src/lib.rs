//! Shared types, hint tables and the fallback matcher for hintd.

pub mod config;
pub mod error;
pub mod matcher;
pub mod patterns;
pub mod types;

pub use config::{GenerationConfig, HintdConfig, ServerConfig, StoreConfig};
pub use error::{GenerationFailure, HintError, StoreError};
pub use matcher::{FallbackHint, FallbackMatcher, FixedRandom, RandomSource, ThreadRandom};
pub use patterns::{PatternEntry, GENERIC_HINTS, KEYWORD_TABLE, PATTERN_TABLE};
pub use types::{
    ErrorResponse, GenerationCheckResponse, HealthResponse, HintRecord, HintRequest,
    HintSource, NotFoundResponse, ResolutionResult,
};
