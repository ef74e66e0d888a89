//! # Database and Session Handles
//!
//! A result buffer is created by an executor on behalf of a session. The
//! buffer needs very little from its surroundings:
//!
//! - from the **database**: persistence/read-only flags (they decide the
//!   default spill threshold), whether the engine's temp storage supports
//!   composite-key indexes, the configured `max_memory_rows`, and the spill
//!   directory.
//! - from the **session**: the temporary-LOB registry that pins materialized
//!   LOB payloads until the session ends.
//!
//! Buffers themselves are single-threaded, but sessions are shared handles
//! (a shallow copy targets a different session while the original lives), so
//! the temp-LOB registry sits behind a mutex.

use crate::config::DEFAULT_MAX_MEMORY_ROWS;
use crate::types::LobHandle;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Engine-level configuration a result buffer consults.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// False for in-memory databases.
    pub persistent: bool,
    pub read_only: bool,
    /// Whether temp storage supports composite-key indexes.
    pub keyed_temp: bool,
    /// Spill threshold in rows for persistent, writable databases.
    pub max_memory_rows: usize,
    /// Spill directory; `None` uses the system temp directory.
    pub spill_dir: Option<PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            persistent: true,
            read_only: false,
            keyed_temp: true,
            max_memory_rows: DEFAULT_MAX_MEMORY_ROWS,
            spill_dir: None,
        }
    }
}

/// Handle to the owning database.
#[derive(Debug)]
pub struct Database {
    config: DatabaseConfig,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Arc<Self> {
        Arc::new(Self { config })
    }

    /// A transient in-memory database: never spills by default.
    pub fn in_memory() -> Arc<Self> {
        Self::new(DatabaseConfig {
            persistent: false,
            ..DatabaseConfig::default()
        })
    }

    pub fn is_persistent(&self) -> bool {
        self.config.persistent
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    /// Whether temp storage supports composite-key indexes (see the spill
    /// backend selection policy in `result::external`).
    pub fn uses_keyed_temp(&self) -> bool {
        self.config.keyed_temp
    }

    pub fn max_memory_rows(&self) -> usize {
        self.config.max_memory_rows
    }

    pub fn spill_dir(&self) -> PathBuf {
        self.config
            .spill_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Per-connection handle: owns the temporary-LOB registry.
#[derive(Debug)]
pub struct Session {
    database: Arc<Database>,
    temp_lobs: Mutex<Vec<LobHandle>>,
}

impl Session {
    pub fn new(database: Arc<Database>) -> Arc<Self> {
        Arc::new(Self {
            database,
            temp_lobs: Mutex::new(Vec::new()),
        })
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    /// Registers a materialized LOB payload; it stays alive until the
    /// session is dropped.
    pub fn add_temporary_lob(&self, handle: LobHandle) {
        self.temp_lobs.lock().push(handle);
    }

    pub fn temporary_lob_count(&self) -> usize {
        self.temp_lobs.lock().len()
    }

    /// Default spill threshold for buffers of this session. Transient
    /// databases (in-memory or read-only) never spill by default.
    pub fn max_memory_rows(&self) -> usize {
        if self.database.is_persistent() && !self.database.is_read_only() {
            self.database.max_memory_rows()
        } else {
            usize::MAX
        }
    }
}
