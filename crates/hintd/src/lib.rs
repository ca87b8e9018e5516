//! Hint daemon library - exposes modules for testing.

pub mod check;
pub mod generator;
pub mod resolver;
pub mod routes;
pub mod server;
pub mod store;

pub use generator::{FakeGenerator, GeminiClient, HintGenerator};
pub use resolver::HintResolver;
pub use store::{FakeHintStore, HintStore, HintStoreAdapter, LookupOutcome, SqliteHintStore};
