//! Write-only quote storage.
//!
//! The handler only needs `insert`, so storage is the narrow [`QuoteStore`] trait.
//! [`SqliteStore`] opens the database file for every insert and re-runs the idempotent
//! schema setup after each open. The caller's [`Deadline`] is enforced inside SQLite:
//! lock waits are capped at the remaining budget and a progress handler interrupts the
//! running statement once the deadline passes.
//!
//! Persistence happens after the HTTP response is committed, so nothing here can reach
//! the caller. [`spawn_persist`] runs the insert in the background and only logs, and
//! [`PendingWrite`] holds such a write until its owner decides to start it.
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, error, warn};
use quote_common::{Deadline, Quote};
use rusqlite::{Connection, ErrorCode, params};
use thiserror::Error;

/// SQLite VM instructions between deadline checks.
const PROGRESS_OPS: i32 = 100;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS quotes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        bid REAL NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_quotes_deleted_at ON quotes (deleted_at);
"#;

/// Failure to persist a quote.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The write did not finish before its deadline.
    #[error("storage timeout: write abandoned after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// SQLite reported an error.
    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The blocking worker running the write panicked or was cancelled.
    #[error("storage worker failed: {0}")]
    Worker(String),
}

impl StorageError {
    /// Returns `true` when the write ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, StorageError::Timeout(_))
    }
}

/// Narrow write interface the handler persists through.
pub trait QuoteStore: Send + Sync + 'static {
    /// Persist one quote, giving up once `deadline` passes.
    fn insert(&self, quote: &Quote, deadline: &Deadline) -> Result<(), StorageError>;
}

/// SQLite-backed store at a fixed path.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Store writing to the database file at `path`. The file is created on first insert.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self, deadline: &Deadline) -> Result<Connection, StorageError> {
        if deadline.is_expired() {
            return Err(StorageError::Timeout(deadline.budget()));
        }

        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(deadline.remaining())?;
        let expires_at = deadline.instant();
        conn.progress_handler(PROGRESS_OPS, Some(move || Instant::now() >= expires_at));

        conn.execute_batch(SCHEMA)
            .map_err(|e| classify(e, deadline))?;
        Ok(conn)
    }
}

impl QuoteStore for SqliteStore {
    fn insert(&self, quote: &Quote, deadline: &Deadline) -> Result<(), StorageError> {
        let conn = self.open(deadline)?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO quotes (bid, created_at, updated_at) VALUES (?1, ?2, ?2)",
            params![quote.bid, now],
        )
        .map_err(|e| classify(e, deadline))?;
        debug!(
            "Stored bid {} as row {} in {}",
            quote.bid,
            conn.last_insert_rowid(),
            self.path.display()
        );
        Ok(())
    }
}

/// Interrupted statements and failures after expiry count as timeouts.
fn classify(err: rusqlite::Error, deadline: &Deadline) -> StorageError {
    let interrupted = err.sqlite_error_code() == Some(ErrorCode::OperationInterrupted);
    if interrupted || deadline.is_expired() {
        StorageError::Timeout(deadline.budget())
    } else {
        StorageError::Sqlite(err)
    }
}

/// Run a blocking insert on the blocking pool, bounded by `budget`.
pub async fn persist(
    store: Arc<dyn QuoteStore>,
    quote: Quote,
    budget: Duration,
) -> Result<(), StorageError> {
    let deadline = Deadline::after(budget);
    let worker = tokio::task::spawn_blocking(move || store.insert(&quote, &deadline));

    match deadline.run(worker).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(StorageError::Worker(join_err.to_string())),
        Err(_) => Err(StorageError::Timeout(budget)),
    }
}

/// Persist in a detached task. The outcome is only logged.
pub fn spawn_persist(store: Arc<dyn QuoteStore>, quote: Quote, budget: Duration) {
    tokio::spawn(async move {
        match persist(store, quote, budget).await {
            Ok(()) => debug!("Quote {} persisted", quote.bid),
            Err(e) if e.is_timeout() => {
                warn!("Deadline exceeded while saving quote {}: {}", quote.bid, e)
            }
            Err(e) => error!("Failed to save quote {}: {}", quote.bid, e),
        }
    });
}

/// A background write prepared now and started later, at most once.
///
/// Dropping an unstarted write starts it.
pub struct PendingWrite {
    job: Option<(Arc<dyn QuoteStore>, Quote, Duration)>,
}

impl PendingWrite {
    /// Prepare a write of `quote` to `store` bounded by `budget`.
    pub fn new(store: Arc<dyn QuoteStore>, quote: Quote, budget: Duration) -> Self {
        Self {
            job: Some((store, quote, budget)),
        }
    }

    /// Hand the write to [`spawn_persist`] unless that already happened.
    pub fn start(&mut self) {
        if let Some((store, quote, budget)) = self.job.take() {
            spawn_persist(store, quote, budget);
        }
    }
}

impl Drop for PendingWrite {
    fn drop(&mut self) {
        self.start();
    }
}
