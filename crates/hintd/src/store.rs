//! Hint store - persistent title → hint records.
//!
//! Lookups treat the *query* title as a case-insensitive regex and match it
//! against stored titles, so a short query finds a longer stored title that
//! contains it. Every store failure is soft: the adapter logs it and reports
//! "not found" or "write skipped".

use async_trait::async_trait;
use chrono::Utc;
use hint_common::{HintRecord, StoreError};
use regex::{Regex, RegexBuilder};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Backend interface: find-one-by-title-pattern and insert-one.
#[async_trait]
pub trait HintStore: Send + Sync {
    /// First stored record (insertion order) whose title matches `title`
    /// used as a case-insensitive pattern.
    async fn find_by_title(&self, title: &str) -> Result<Option<HintRecord>, StoreError>;

    async fn insert(&self, record: &HintRecord) -> Result<(), StoreError>;
}

/// Compile a query title into the pattern used against stored titles.
pub fn title_pattern(title: &str) -> Result<Regex, StoreError> {
    RegexBuilder::new(title)
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| StoreError::InvalidPattern(e.to_string()))
}

/// Result of an adapter lookup before it is collapsed at the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(String),
    NotFound,
    StoreError(StoreError),
}

impl LookupOutcome {
    /// Store errors count as a miss.
    pub fn into_hint(self) -> Option<String> {
        match self {
            LookupOutcome::Found(hint) => Some(hint),
            LookupOutcome::NotFound | LookupOutcome::StoreError(_) => None,
        }
    }
}

/// Soft-failing front for any [`HintStore`].
#[derive(Clone)]
pub struct HintStoreAdapter {
    store: Arc<dyn HintStore>,
}

impl HintStoreAdapter {
    pub fn new(store: Arc<dyn HintStore>) -> Self {
        Self { store }
    }

    pub async fn lookup(&self, title: &str) -> LookupOutcome {
        match self.store.find_by_title(title).await {
            Ok(Some(record)) => {
                debug!("Store hit for '{}' (stored title '{}')", title, record.title);
                LookupOutcome::Found(record.hint)
            }
            Ok(None) => LookupOutcome::NotFound,
            Err(e) => {
                error!("Store lookup failed for '{}': {}", title, e);
                LookupOutcome::StoreError(e)
            }
        }
    }

    /// Best-effort write. Returns whether the record was persisted.
    pub async fn insert(&self, title: &str, hint: &str) -> bool {
        match self.store.insert(&HintRecord::new(title, hint)).await {
            Ok(()) => {
                info!("Hint saved to store for: {}", title);
                true
            }
            Err(e) => {
                error!("Error saving hint for '{}': {}", title, e);
                false
            }
        }
    }
}

// ============================================================================
// SQLite Store
// ============================================================================

/// Hint store backed by SQLite
pub struct SqliteHintStore {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl SqliteHintStore {
    /// Open or create the store at a specific path
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Open(format!("failed to create {:?}: {}", parent, e))
                })?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| StoreError::Open(format!("{:?}: {}", path, e)))?;
        Self::from_connection(conn, path.to_path_buf())
    }

    /// In-memory store, mostly for tests and one-shot CLI runs
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open(e.to_string()))?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, db_path: PathBuf) -> Result<Self, StoreError> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM hints", [], |row| row.get(0))
            .map_err(query_err)?;
        Ok(n as usize)
    }

    fn find_blocking(conn: &Connection, pattern: &Regex) -> Result<Option<HintRecord>, StoreError> {
        let mut stmt = conn
            .prepare("SELECT title, hint FROM hints ORDER BY id ASC")
            .map_err(query_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(HintRecord {
                    title: row.get(0)?,
                    hint: row.get(1)?,
                })
            })
            .map_err(query_err)?;

        for row in rows {
            let record = row.map_err(query_err)?;
            if pattern.is_match(&record.title) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS hints (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            hint TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
        [],
    )
    .map_err(query_err)?;

    conn.execute("CREATE INDEX IF NOT EXISTS idx_hints_title ON hints(title)", [])
        .map_err(query_err)?;

    Ok(())
}

fn query_err(e: rusqlite::Error) -> StoreError {
    StoreError::Query(e.to_string())
}

fn join_err(e: tokio::task::JoinError) -> StoreError {
    StoreError::Query(format!("store task failed: {}", e))
}

#[async_trait]
impl HintStore for SqliteHintStore {
    async fn find_by_title(&self, title: &str) -> Result<Option<HintRecord>, StoreError> {
        let pattern = title_pattern(title)?;
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            Self::find_blocking(&conn, &pattern)
        })
        .await
        .map_err(join_err)?
    }

    async fn insert(&self, record: &HintRecord) -> Result<(), StoreError> {
        let conn = Arc::clone(&self.conn);
        let record = record.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            conn.execute(
                "INSERT INTO hints (title, hint, created_at) VALUES (?, ?, ?)",
                params![&record.title, &record.hint, Utc::now().to_rfc3339()],
            )
            .map_err(query_err)?;
            Ok(())
        })
        .await
        .map_err(join_err)?
    }
}

// ============================================================================
// Disabled Store
// ============================================================================

/// Stand-in used when the database could not be opened at start-up
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

#[async_trait]
impl HintStore for DisabledStore {
    async fn find_by_title(&self, _title: &str) -> Result<Option<HintRecord>, StoreError> {
        Err(StoreError::Disabled)
    }

    async fn insert(&self, _record: &HintRecord) -> Result<(), StoreError> {
        Err(StoreError::Disabled)
    }
}

// ============================================================================
// Fake Store (Testing)
// ============================================================================

/// In-memory store with call counters and injectable failures
#[derive(Default)]
pub struct FakeHintStore {
    records: Mutex<Vec<HintRecord>>,
    fail_lookup: bool,
    fail_insert: bool,
    panic_on_lookup: bool,
    lookup_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

impl FakeHintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<HintRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn failing_lookup(mut self) -> Self {
        self.fail_lookup = true;
        self
    }

    pub fn failing_insert(mut self) -> Self {
        self.fail_insert = true;
        self
    }

    /// Simulates a lookup that blows up outside the soft-fail contract
    pub fn panicking_lookup(mut self) -> Self {
        self.panic_on_lookup = true;
        self
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<HintRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HintStore for FakeHintStore {
    async fn find_by_title(&self, title: &str) -> Result<Option<HintRecord>, StoreError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_lookup {
            panic!("fake store lookup panicked");
        }
        if self.fail_lookup {
            return Err(StoreError::Query("simulated lookup failure".to_string()));
        }
        let pattern = title_pattern(title)?;
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.iter().find(|r| pattern.is_match(&r.title)).cloned())
    }

    async fn insert(&self, record: &HintRecord) -> Result<(), StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert {
            return Err(StoreError::Query("simulated insert failure".to_string()));
        }
        self.records
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_insert_then_lookup_case_insensitive() {
        let store = SqliteHintStore::open_in_memory().unwrap();
        store
            .insert(&HintRecord::new("Two Sum", "Use a hash map."))
            .await
            .unwrap();

        let found = store.find_by_title("two sum").await.unwrap();
        assert_eq!(found.map(|r| r.hint).as_deref(), Some("Use a hash map."));
    }

    #[tokio::test]
    async fn test_short_query_matches_longer_stored_title() {
        let store = SqliteHintStore::open_in_memory().unwrap();
        store
            .insert(&HintRecord::new("Two Sum II - Input Array Is Sorted", "Two pointers."))
            .await
            .unwrap();

        let found = store.find_by_title("Two Sum").await.unwrap();
        assert_eq!(found.map(|r| r.hint).as_deref(), Some("Two pointers."));
    }

    #[tokio::test]
    async fn test_longer_query_does_not_match_shorter_stored_title() {
        let store = SqliteHintStore::open_in_memory().unwrap();
        store
            .insert(&HintRecord::new("Two Sum", "Use a hash map."))
            .await
            .unwrap();

        let found = store.find_by_title("Two Sum II").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_first_inserted_match_wins_and_duplicates_allowed() {
        let store = SqliteHintStore::open_in_memory().unwrap();
        store.insert(&HintRecord::new("Two Sum", "first")).await.unwrap();
        store.insert(&HintRecord::new("Two Sum", "second")).await.unwrap();

        assert_eq!(store.count().unwrap(), 2);
        let found = store.find_by_title("two sum").await.unwrap();
        assert_eq!(found.map(|r| r.hint).as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_store_error() {
        let store = SqliteHintStore::open_in_memory().unwrap();
        let err = store.find_by_title("Pow(x, n").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidPattern(_)));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("hints.db");

        {
            let store = SqliteHintStore::open(&path).unwrap();
            store
                .insert(&HintRecord::new("Valid Parentheses", "Use a stack."))
                .await
                .unwrap();
        }

        let store = SqliteHintStore::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        let found = store.find_by_title("valid parentheses").await.unwrap();
        assert_eq!(found.map(|r| r.hint).as_deref(), Some("Use a stack."));
    }

    #[tokio::test]
    async fn test_adapter_collapses_errors() {
        let adapter = HintStoreAdapter::new(Arc::new(DisabledStore));
        let outcome = adapter.lookup("Two Sum").await;
        assert_eq!(outcome, LookupOutcome::StoreError(StoreError::Disabled));
        assert_eq!(outcome.into_hint(), None);
        assert!(!adapter.insert("Two Sum", "hint").await);
    }

    #[tokio::test]
    async fn test_adapter_found_and_not_found() {
        let fake = Arc::new(FakeHintStore::with_records(vec![HintRecord::new(
            "Climbing Stairs",
            "Fibonacci.",
        )]));
        let adapter = HintStoreAdapter::new(fake.clone());

        assert_eq!(
            adapter.lookup("climbing").await,
            LookupOutcome::Found("Fibonacci.".to_string())
        );
        assert_eq!(adapter.lookup("Two Sum").await, LookupOutcome::NotFound);
        assert!(adapter.insert("Two Sum", "Hash map.").await);
        assert_eq!(fake.records().len(), 2);
        assert_eq!(fake.lookup_calls(), 2);
        assert_eq!(fake.insert_calls(), 1);
    }
}
