//! # Configuration Constants
//!
//! This module centralizes the crate's tuning constants. Interdependent
//! values are co-located and their relationships documented so they cannot
//! drift apart silently.
//!
//! ## Dependency Notes
//!
//! ```text
//! DEFAULT_MAX_MEMORY_ROWS (40,000)
//!       │
//!       └─> Spill threshold for persistent, writable databases. Transient
//!           sessions (read-only or in-memory) never spill by default and
//!           use usize::MAX instead (see session::Session::max_memory_rows).
//!
//! ROW_INLINE_COLUMNS (8)
//!       │
//!       └─> Inline capacity of the Row SmallVec. Rows at or under this
//!           width avoid a heap allocation per row.
//!
//! KEY_INLINE_VALUES (4)
//!       │
//!       └─> Inline capacity of ValueArray distinct keys. Most DISTINCT
//!           projections are narrower than full rows.
//!
//! SERIALIZE_BUF_CAPACITY (4096)
//!       │
//!       └─> Initial capacity of the reusable spill serialization buffer.
//!           Rows larger than this grow the buffer once and keep it.
//! ```

/// Default spill threshold in rows for persistent, writable databases.
pub const DEFAULT_MAX_MEMORY_ROWS: usize = 40_000;

/// Inline column capacity of a [`Row`](crate::result::Row).
pub const ROW_INLINE_COLUMNS: usize = 8;

/// Inline value capacity of a distinct key.
pub const KEY_INLINE_VALUES: usize = 4;

/// Initial capacity of the reusable spill serialization buffer.
pub const SERIALIZE_BUF_CAPACITY: usize = 4096;

/// File name prefix for spill files in the database spill directory.
pub const SPILL_FILE_PREFIX: &str = "rowspool";
