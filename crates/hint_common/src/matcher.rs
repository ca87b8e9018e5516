//! Fallback matcher - deterministic keyword hints with a random generic tail.
//!
//! Pure apart from the generic-pool draw, which goes through [`RandomSource`]
//! so tests can pin it.

use crate::patterns::{PatternEntry, GENERIC_HINTS, KEYWORD_TABLE, PATTERN_TABLE};
use rand::Rng;
use std::sync::Arc;

/// Source of the index used to pick from the generic pool.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// Uniform draw from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always returns the same index (modulo the pool size).
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn pick_index(&self, len: usize) -> usize {
        self.0 % len
    }
}

/// Outcome of a fallback lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackHint {
    pub hint: String,
    /// Keyword that selected the hint, None for a generic-pool pick
    pub matched_pattern: Option<&'static str>,
}

impl FallbackHint {
    pub fn matched_by_pattern(&self) -> bool {
        self.matched_pattern.is_some()
    }
}

pub struct FallbackMatcher {
    primary: &'static [PatternEntry],
    secondary: &'static [PatternEntry],
    generic: &'static [&'static str],
    random: Arc<dyn RandomSource>,
}

impl FallbackMatcher {
    /// Matcher over the built-in tables.
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self::with_tables(PATTERN_TABLE, KEYWORD_TABLE, GENERIC_HINTS, random)
    }

    /// Matcher over custom tables. An empty generic pool falls back to the
    /// built-in one so a hint is always available.
    pub fn with_tables(
        primary: &'static [PatternEntry],
        secondary: &'static [PatternEntry],
        generic: &'static [&'static str],
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let generic = if generic.is_empty() { GENERIC_HINTS } else { generic };
        Self {
            primary,
            secondary,
            generic,
            random,
        }
    }

    /// Pick the best hint for a raw problem title. Never fails.
    pub fn resolve(&self, title: &str) -> FallbackHint {
        let normalized = title.trim().to_lowercase();

        if let Some(entry) = first_match(self.primary, &normalized)
            .or_else(|| first_match(self.secondary, &normalized))
        {
            return FallbackHint {
                hint: entry.hint.to_string(),
                matched_pattern: Some(entry.pattern),
            };
        }

        FallbackHint {
            hint: self.generic_hint().to_string(),
            matched_pattern: None,
        }
    }

    /// Uniform pick from the generic pool.
    pub fn generic_hint(&self) -> &'static str {
        let idx = self.random.pick_index(self.generic.len());
        self.generic[idx.min(self.generic.len() - 1)]
    }

    pub fn generic_pool(&self) -> &'static [&'static str] {
        self.generic
    }
}

impl Default for FallbackMatcher {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRandom))
    }
}

fn first_match<'a>(table: &'a [PatternEntry], normalized: &str) -> Option<&'a PatternEntry> {
    table.iter().find(|e| normalized.contains(e.pattern))
}
