//! Hint resolver - store → generation → keyword tables → generic pool.
//!
//! Each stage hands off only to the next one and every exit path yields a
//! usable hint. The chain runs in its own task so that a panic anywhere in it
//! becomes an `emergency` answer instead of a dropped request.

use crate::generator::HintGenerator;
use crate::store::{HintStore, HintStoreAdapter, LookupOutcome};
use hint_common::{FallbackMatcher, ResolutionResult};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct HintResolver {
    store: HintStoreAdapter,
    generator: Arc<dyn HintGenerator>,
    matcher: Arc<FallbackMatcher>,
}

impl HintResolver {
    pub fn new(
        store: Arc<dyn HintStore>,
        generator: Arc<dyn HintGenerator>,
        matcher: FallbackMatcher,
    ) -> Self {
        Self {
            store: HintStoreAdapter::new(store),
            generator,
            matcher: Arc::new(matcher),
        }
    }

    pub fn generator(&self) -> Arc<dyn HintGenerator> {
        Arc::clone(&self.generator)
    }

    /// Resolve a hint for a non-empty title. Never fails.
    pub async fn resolve(&self, title: &str) -> ResolutionResult {
        info!("Hint requested for: {}", title);

        let this = self.clone();
        let owned = title.to_string();
        match tokio::spawn(async move { this.run_chain(&owned).await }).await {
            Ok(result) => result,
            Err(e) => {
                error!("Unexpected error resolving '{}': {}", title, e);
                ResolutionResult::emergency(self.matcher.generic_hint())
            }
        }
    }

    async fn run_chain(&self, title: &str) -> ResolutionResult {
        // Stage 1: store
        match self.store.lookup(title).await {
            LookupOutcome::Found(hint) => {
                info!("Found hint in store");
                return ResolutionResult::database(hint);
            }
            LookupOutcome::NotFound => {}
            LookupOutcome::StoreError(e) => {
                warn!("Treating store failure as a miss: {}", e);
            }
        }

        // Stage 2: generation, single attempt
        match self.generator.generate(title).await {
            Ok(hint) => {
                self.store.insert(title, &hint).await;
                ResolutionResult::generative(hint)
            }
            Err(e) => {
                error!("Generation failed: {}", e);
                // Stage 3: keyword tables, generic pool on a full miss
                let fallback = self.matcher.resolve(title);
                match fallback.matched_pattern {
                    Some(pattern) => info!("Using fallback hint for pattern '{}'", pattern),
                    None => info!("No pattern matched, using generic hint"),
                }
                ResolutionResult::fallback(fallback.hint)
            }
        }
    }
}
