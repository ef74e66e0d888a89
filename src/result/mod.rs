//! # Result Buffering
//!
//! Everything between a query operator's last row and the client cursor:
//!
//! - [`buffer::ResultBuffer`]: the materialized buffer (distinctness,
//!   sorting, OFFSET/FETCH windowing, spill, forward cursor, shallow copy)
//! - [`distinct::DistinctIndex`]: insertion-ordered row-key to row map
//! - [`row_key::ValueArray`]: hashable key over a row projection
//! - [`external::SpillBackend`]: the abstract on-disk row set
//! - [`spill::FileSpill`]: the file-backed backend implementation
//! - [`row_serde::RowSerde`]: the spill-file row codec

pub mod buffer;
pub mod distinct;
pub mod external;
pub mod row_key;
pub mod row_serde;
pub mod spill;

use crate::config::ROW_INLINE_COLUMNS;
use crate::types::Value;
use smallvec::SmallVec;

/// One result row: exactly `column_count` values, heap-free up to
/// [`ROW_INLINE_COLUMNS`] columns.
pub type Row = SmallVec<[Value; ROW_INLINE_COLUMNS]>;

pub use buffer::ResultBuffer;
pub use external::{BackendSpec, SpillBackend};
pub use row_key::ValueArray;
pub use spill::{FileSpill, KeySpec};
