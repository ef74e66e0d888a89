//! # rowspool - Materialized Query-Result Buffer
//!
//! rowspool is the result-spool subsystem of a relational engine: it
//! collects, deduplicates, sorts, and windows the tuples a query plan
//! produces before they reach a client cursor, transparently promoting
//! itself from memory to an on-disk spill when the row population exceeds a
//! configured threshold. This implementation prioritizes:
//!
//! - **Strict SQL semantics**: DISTINCT / DISTINCT ON, multi-column ORDER BY
//!   with NULL placement, OFFSET/FETCH, FETCH PERCENT, WITH TIES
//! - **Bounded memory**: the in-memory row list never exceeds the spill
//!   threshold by more than one transient row
//! - **Owned rows**: rows belong to the buffer once added; large objects
//!   are rewritten to session-owned handles before storage
//!
//! ## Quick Start
//!
//! ```ignore
//! use rowspool::result::ResultBuffer;
//! use rowspool::session::{Database, Session};
//! use rowspool::sort::SortOrder;
//! use rowspool::types::{ColumnMeta, DataType, Value};
//!
//! let session = Session::new(Database::in_memory());
//! let columns = vec![ColumnMeta::new("id", DataType::Int8)];
//! let mut result = ResultBuffer::new(session, columns, 1);
//!
//! result.set_sort(SortOrder::ascending(&[0]));
//! result.set_limit(10);
//! for id in produced_ids {
//!     result.add_row(smallvec::smallvec![Value::Int(id)])?;
//! }
//! result.done()?;
//!
//! while result.next()? {
//!     send(result.current_row());
//! }
//! result.close();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      ResultBuffer (lifecycle,       │
//! │   windowing, cursor, shallow copy)  │
//! ├──────────────────┬──────────────────┤
//! │  DistinctIndex   │    SortOrder     │
//! │ (insertion-order │  (multi-column   │
//! │   key → row map) │   comparator)    │
//! ├──────────────────┴──────────────────┤
//! │     SpillBackend (abstract row set) │
//! ├─────────────────────────────────────┤
//! │  FileSpill: RowSerde + key index +  │
//! │     BufWriter writes / mmap reads   │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`result`]: the buffer, distinct index, spill backend, row codec
//! - [`sort`]: multi-column comparator with windowed partial sort
//! - [`types`]: values, LOB handles, column metadata
//! - [`encoding`]: byte-comparable distinct-key encoding
//! - [`session`]: database/session handles and the temp-LOB registry
//! - [`config`]: centralized constants

pub mod config;
pub mod encoding;
pub mod result;
pub mod session;
pub mod sort;
pub mod types;

pub use result::{ResultBuffer, Row, SpillBackend};
pub use session::{Database, DatabaseConfig, Session};
pub use sort::{NullOrdering, SortColumn, SortOrder};
pub use types::{ColumnMeta, DataType, LobHandle, Nullability, Value};
