//! Generation self-check - runs well-known titles through the generator and
//! reports whether each hint mentions the expected technique.

use crate::generator::HintGenerator;
use hint_common::GenerationFailure;
use tracing::{info, warn};

/// Titles with a keyword a sensible hint is expected to mention.
pub const CHECK_CASES: &[(&str, &str)] = &[
    ("Two Sum", "hash map"),
    ("Reverse Linked List", "pointer"),
    ("Valid Parentheses", "stack"),
    ("Binary Tree Level Order Traversal", "BFS"),
    ("Longest Substring Without Repeating Characters", "sliding window"),
];

/// Title used by the HTTP test endpoint.
pub const PROBE_TITLE: &str = "Two Sum";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Generated and mentions the expected keyword
    Passed,
    /// Generated but the keyword is missing
    Weak,
    Failed(GenerationFailure),
}

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub title: String,
    pub expected: String,
    pub hint: Option<String>,
    pub status: CheckStatus,
}

impl CheckOutcome {
    pub fn generated(&self) -> bool {
        !matches!(self.status, CheckStatus::Failed(_))
    }
}

/// Run one case.
pub async fn check_title(
    generator: &dyn HintGenerator,
    title: &str,
    expected: &str,
) -> CheckOutcome {
    match generator.generate(title).await {
        Ok(hint) => {
            let status = if hint.to_lowercase().contains(&expected.to_lowercase()) {
                CheckStatus::Passed
            } else {
                CheckStatus::Weak
            };
            CheckOutcome {
                title: title.to_string(),
                expected: expected.to_string(),
                hint: Some(hint),
                status,
            }
        }
        Err(e) => {
            warn!("Generation check failed for '{}': {}", title, e);
            CheckOutcome {
                title: title.to_string(),
                expected: expected.to_string(),
                hint: None,
                status: CheckStatus::Failed(e),
            }
        }
    }
}

/// Run every case sequentially.
pub async fn run_checks(generator: &dyn HintGenerator, cases: &[(&str, &str)]) -> Vec<CheckOutcome> {
    let mut outcomes = Vec::with_capacity(cases.len());
    for (title, expected) in cases {
        outcomes.push(check_title(generator, title, expected).await);
    }

    let generated = outcomes.iter().filter(|o| o.generated()).count();
    info!("Generation check: {}/{} titles produced a hint", generated, outcomes.len());
    outcomes
}
