//! # Spill Backend Interface and Selection Policy
//!
//! The result buffer talks to on-disk storage only through the
//! [`SpillBackend`] trait, so engines with their own temp-table machinery
//! can substitute it (and tests can inject failing backends).
//!
//! ## Selection Policy
//!
//! The buffer historically chose between two storage shapes:
//!
//! - a **composite-key temp index** when the engine's page store supports
//!   it, when distinct buffers carry extra sort-only columns the plain
//!   temp table cannot represent, or when DISTINCT ON projections are in
//!   play;
//! - a **plain temp table** otherwise.
//!
//! Both shapes collapse onto [`FileSpill`](super::spill::FileSpill)
//! configurations here: every distinct buffer gets the key index (the
//! composite-key shape), and non-distinct buffers get the sequential
//! configuration. The decision tree is preserved so an engine-provided
//! backend can split the branches again.

use super::spill::{FileSpill, KeySpec};
use super::Row;
use crate::session::Session;
use crate::sort::SortOrder;
use crate::types::Value;
use eyre::Result;

/// Abstract on-disk row set the result buffer spills into.
///
/// `add_row`/`add_rows`/`remove_row` return the updated live row count.
/// The backend owns its distinctness when constructed distinct-aware.
pub trait SpillBackend {
    fn add_row(&mut self, row: &[Value]) -> Result<usize>;
    fn add_rows(&mut self, rows: Vec<Row>) -> Result<usize>;
    fn remove_row(&mut self, row: &[Value]) -> Result<usize>;
    fn contains(&mut self, row: &[Value]) -> Result<bool>;
    /// Starts (or restarts) a scan. Must be called before `next`.
    fn reset(&mut self) -> Result<()>;
    fn next(&mut self) -> Result<Option<Row>>;
    fn row_count(&self) -> usize;
    fn close(&mut self);
    /// A scan-only clone over the same data, or `None` when cloning is not
    /// possible (e.g. the backend is still accepting writes).
    fn clone_read_only(&self) -> Option<Box<dyn SpillBackend>>;
}

/// What the buffer needs from its backend.
#[derive(Debug, Clone)]
pub struct BackendSpec {
    pub total_columns: usize,
    pub visible_columns: usize,
    pub distinct: bool,
    pub distinct_indexes: Option<Vec<usize>>,
    pub sort: Option<SortOrder>,
}

impl BackendSpec {
    /// Whether the plain temp-table shape cannot represent this buffer and
    /// the composite-key shape is required.
    pub fn needs_keyed_temp(&self, session: &Session) -> bool {
        session.database().uses_keyed_temp()
            || (self.distinct && self.total_columns != self.visible_columns)
            || self.distinct_indexes.is_some()
    }
}

/// Creates the spill backend for a buffer, per the selection policy.
pub fn create_backend(session: &Session, spec: &BackendSpec) -> Result<Box<dyn SpillBackend>> {
    let key_spec = if let Some(indexes) = &spec.distinct_indexes {
        Some(KeySpec::Projection(indexes.clone()))
    } else if spec.distinct {
        Some(KeySpec::Prefix(spec.visible_columns))
    } else {
        None
    };
    let spill = FileSpill::create(
        &session.database().spill_dir(),
        key_spec,
        spec.sort.clone(),
    )?;
    Ok(Box::new(spill))
}
