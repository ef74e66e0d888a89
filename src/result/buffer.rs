//! # Materialized Result Buffer
//!
//! `ResultBuffer` collects the rows a query plan produces, applies
//! distinctness inline, spills to disk past a memory threshold, and on
//! finalization sorts and applies the OFFSET/FETCH window before handing a
//! forward cursor to the consumer.
//!
//! ## Lifecycle
//!
//! ```text
//! Building ──done()──> Finalized ──> { Scanning <─> Rewound } ──close()──> Closed
//!   add_row               reset / next / current_row
//!   set_distinct*
//!   set_sort / set_*
//! ```
//!
//! Exactly one `done()` call finalizes the buffer; afterwards it is
//! append-frozen. A closed buffer answers only `is_closed`, `close` (which
//! is idempotent), and column metadata.
//!
//! ## Insertion Protocol
//!
//! Each `add_row` runs, in order: LOB materialization (engine-owned handles
//! are replaced by session-owned copies and registered with the session),
//! the distinct filter (first insertion wins; crossing the threshold
//! promotes the whole distinct map into the spill backend), then the
//! non-distinct append path with its own overflow flush. The order is
//! load-bearing: materialization must precede any storage of the row, and
//! distinct filtering must precede the memory-accounting check.
//!
//! ## Windowing
//!
//! OFFSET/FETCH, FETCH PERCENT (Oracle-style round-up), and WITH TIES are
//! applied during `done()`. In memory the row list is sliced and re-wrapped;
//! spilled results are trimmed by replaying the backend, with the staging
//! list allowed to re-promote into a fresh backend if the window itself
//! overflows memory.
//!
//! ## Sharing
//!
//! The in-memory row list lives behind an `Arc` with copy-on-write
//! mutation: while the producer owns the buffer exclusively the `Arc` is
//! unique and mutation is free, and a shallow copy just bumps the count.
//! Buffers containing LOBs refuse shallow copies; a LOB handle's lifetime
//! is pinned to one session.
//!
//! ## Concurrency
//!
//! Single-threaded per buffer; exclusive ownership by the producer during
//! build, then by the consumer cursor. The session above is responsible for
//! serialization.

use super::distinct::DistinctIndex;
use super::external::{self, BackendSpec, SpillBackend};
use super::row_key::ValueArray;
use super::Row;
use crate::session::Session;
use crate::sort::SortOrder;
use crate::types::{ColumnMeta, DataType, Nullability, Value};
use eyre::{bail, ensure, Result};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Materialized query-result buffer with a forward cursor.
pub struct ResultBuffer {
    session: Arc<Session>,
    columns: Arc<[ColumnMeta]>,
    visible_columns: usize,
    max_memory_rows: usize,
    row_id: i64,
    row_count: usize,
    rows: Arc<Vec<Row>>,
    sort: Option<SortOrder>,
    distinct_rows: Option<DistinctIndex>,
    current_row: Option<Row>,
    offset: i64,
    limit: i64,
    fetch_percent: bool,
    with_ties: bool,
    limits_applied: bool,
    external: Option<Box<dyn SpillBackend>>,
    distinct: bool,
    distinct_indexes: Option<Vec<usize>>,
    finalized: bool,
    closed: bool,
    contains_lobs: bool,
}

impl ResultBuffer {
    /// Creates a buffer for `columns`, of which the first `visible_columns`
    /// are surfaced to the consumer; the rest are sort/distinct helpers.
    ///
    /// The spill threshold defaults from the session: unbounded for
    /// transient databases, the database configuration otherwise.
    pub fn new(session: Arc<Session>, columns: Vec<ColumnMeta>, visible_columns: usize) -> Self {
        assert!(visible_columns <= columns.len());
        let max_memory_rows = session.max_memory_rows();
        Self {
            session,
            columns: columns.into(),
            visible_columns,
            max_memory_rows,
            row_id: -1,
            row_count: 0,
            rows: Arc::new(Vec::new()),
            sort: None,
            distinct_rows: None,
            current_row: None,
            offset: 0,
            limit: -1,
            fetch_percent: false,
            with_ties: false,
            limits_applied: false,
            external: None,
            distinct: false,
            distinct_indexes: None,
            finalized: false,
            closed: false,
            contains_lobs: false,
        }
    }

    /// Enables all-column duplicate elimination. Valid only before the
    /// first `add_row` and mutually exclusive with `set_distinct_on`.
    pub fn set_distinct(&mut self) -> Result<()> {
        ensure!(
            self.distinct_indexes.is_none(),
            "distinct on indexes is already configured"
        );
        self.ensure_no_rows_added()?;
        self.distinct = true;
        self.distinct_rows = Some(DistinctIndex::new());
        Ok(())
    }

    /// Enables duplicate elimination keyed on `indexes`. Valid only before
    /// the first `add_row` and mutually exclusive with `set_distinct`.
    pub fn set_distinct_on(&mut self, indexes: Vec<usize>) -> Result<()> {
        ensure!(!self.distinct, "all-column distinct is already configured");
        self.ensure_no_rows_added()?;
        ensure!(
            indexes.iter().all(|&i| i < self.columns.len()),
            "distinct index out of range"
        );
        self.distinct_indexes = Some(indexes);
        self.distinct_rows = Some(DistinctIndex::new());
        Ok(())
    }

    fn ensure_no_rows_added(&self) -> Result<()> {
        ensure!(!self.closed, "result buffer is closed");
        ensure!(!self.finalized, "result buffer is finalized");
        ensure!(
            self.row_count == 0 && self.rows.is_empty() && self.external.is_none(),
            "rows were already added"
        );
        Ok(())
    }

    /// Installs the sort comparator; the last writer wins.
    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = Some(sort);
    }

    /// Offset of the first row to return.
    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    /// Row limit: -1 means unbounded, 0 means an empty result.
    pub fn set_limit(&mut self, limit: i64) {
        self.limit = limit;
    }

    /// Whether the limit is a percentage of the row count.
    pub fn set_fetch_percent(&mut self, fetch_percent: bool) {
        self.fetch_percent = fetch_percent;
    }

    /// Whether rows tied with the last in-window row are included too.
    pub fn set_with_ties(&mut self, with_ties: bool) {
        self.with_ties = with_ties;
    }

    /// Overrides the spill threshold in rows.
    pub fn set_max_memory_rows(&mut self, max_memory_rows: usize) {
        self.max_memory_rows = max_memory_rows;
    }

    /// Asserts that OFFSET/FETCH were already applied by the caller;
    /// `done()` will skip window application.
    pub fn limits_were_applied(&mut self) {
        self.limits_applied = true;
    }

    fn is_any_distinct(&self) -> bool {
        self.distinct || self.distinct_indexes.is_some()
    }

    fn distinct_key(&self, values: &[Value]) -> ValueArray {
        match &self.distinct_indexes {
            Some(indexes) => ValueArray::from_projection(values, indexes),
            None => ValueArray::from_prefix(values, self.visible_columns.min(values.len())),
        }
    }

    /// Appends a row. Fails once `done()` has been called.
    pub fn add_row(&mut self, mut values: Row) -> Result<()> {
        ensure!(!self.closed, "result buffer is closed");
        ensure!(
            !self.finalized,
            "result buffer is finalized; rows can no longer be added"
        );
        self.materialize_lobs(&mut values);
        if self.is_any_distinct() {
            if self.external.is_none() {
                let key = self.distinct_key(&values);
                let Some(distinct) = self.distinct_rows.as_mut() else {
                    bail!("distinct buffer lost its distinct map before spilling");
                };
                distinct.insert_if_absent(key, values);
                self.row_count = distinct.len();
                if self.row_count > self.max_memory_rows {
                    self.promote_distinct()?;
                }
            } else if let Some(external) = self.external.as_mut() {
                self.row_count = external.add_row(&values)?;
            }
        } else {
            Arc::make_mut(&mut self.rows).push(values);
            self.row_count += 1;
            if self.rows.len() > self.max_memory_rows {
                self.flush_rows_to_backend()?;
            }
        }
        Ok(())
    }

    fn materialize_lobs(&mut self, values: &mut Row) {
        for value in values.iter_mut() {
            if let Some(replacement) = value.materialize() {
                if let Value::Lob(handle) = &replacement {
                    self.session.add_temporary_lob(handle.clone());
                }
                self.contains_lobs = true;
                *value = replacement;
            }
        }
    }

    fn promote_distinct(&mut self) -> Result<()> {
        let Some(distinct) = self.distinct_rows.take() else {
            bail!("promote_distinct called without a distinct map");
        };
        debug!(rows = distinct.len(), "promoting distinct rows to spill backend");
        let mut backend = match self.create_backend() {
            Ok(backend) => backend,
            Err(e) => {
                // the triggering row is already in the map, nothing is lost
                self.distinct_rows = Some(distinct);
                return Err(e);
            }
        };
        self.row_count = backend.add_rows(distinct.into_rows())?;
        self.external = Some(backend);
        Ok(())
    }

    fn flush_rows_to_backend(&mut self) -> Result<()> {
        if self.external.is_none() {
            debug!(rows = self.rows.len(), "promoting result rows to spill backend");
            self.external = Some(self.create_backend()?);
        }
        let rows = std::mem::take(Arc::make_mut(&mut self.rows));
        let Some(external) = self.external.as_mut() else {
            bail!("spill backend disappeared during flush");
        };
        self.row_count = external.add_rows(rows)?;
        Ok(())
    }

    fn create_backend(&self) -> Result<Box<dyn SpillBackend>> {
        external::create_backend(
            &self.session,
            &BackendSpec {
                total_columns: self.columns.len(),
                visible_columns: self.visible_columns,
                distinct: self.distinct,
                distinct_indexes: self.distinct_indexes.clone(),
                sort: self.sort.clone(),
            },
        )
    }

    /// Removes one row matching `values` from an all-distinct buffer.
    pub fn remove_distinct(&mut self, values: &[Value]) -> Result<()> {
        ensure!(!self.closed, "result buffer is closed");
        ensure!(
            self.distinct,
            "remove_distinct requires an all-column distinct buffer"
        );
        ensure!(
            values.len() == self.visible_columns,
            "row width {} does not match visible column count {}",
            values.len(),
            self.visible_columns
        );
        if let Some(distinct) = self.distinct_rows.as_mut() {
            distinct.remove(&ValueArray::from_prefix(values, values.len()));
            self.row_count = distinct.len();
        } else if let Some(external) = self.external.as_mut() {
            self.row_count = external.remove_row(values)?;
        }
        Ok(())
    }

    /// Membership test on a distinct buffer.
    pub fn contains_distinct(&mut self, values: &[Value]) -> Result<bool> {
        ensure!(!self.closed, "result buffer is closed");
        ensure!(
            self.is_any_distinct(),
            "contains_distinct requires a distinct buffer"
        );
        ensure!(
            values.len() == self.visible_columns,
            "row width {} does not match visible column count {}",
            values.len(),
            self.visible_columns
        );
        if let Some(external) = self.external.as_mut() {
            return external.contains(values);
        }
        let key = self.distinct_key(values);
        if let Some(distinct) = &self.distinct_rows {
            return Ok(distinct.contains(&key));
        }
        // the map was consumed by done(); rebuild it from the row list
        let mut rebuilt = DistinctIndex::new();
        for row in self.rows.iter() {
            rebuilt.insert_if_absent(self.distinct_key(row), row.clone());
        }
        let found = rebuilt.contains(&key);
        self.distinct_rows = Some(rebuilt);
        Ok(found)
    }

    /// Finalizes the buffer: flushes residual rows if spilled, sorts,
    /// applies the OFFSET/FETCH window, and rewinds the cursor. Must be
    /// called exactly once.
    pub fn done(&mut self) -> Result<()> {
        ensure!(!self.closed, "result buffer is closed");
        ensure!(!self.finalized, "done() was already called");
        if self.external.is_some() {
            self.flush_rows_to_backend()?;
        } else {
            if self.is_any_distinct() {
                if let Some(distinct) = self.distinct_rows.take() {
                    *Arc::make_mut(&mut self.rows) = distinct.into_rows();
                }
            }
            if let Some(sort) = &self.sort {
                if self.limit != 0 {
                    // a percent limit is not a row count, it cannot bound the sort
                    let with_limit = self.limit > 0 && !self.with_ties && !self.fetch_percent;
                    let offset = self.offset.max(0) as usize;
                    let rows = Arc::make_mut(&mut self.rows);
                    if offset > 0 || with_limit {
                        let limit = if with_limit {
                            self.limit as usize
                        } else {
                            rows.len()
                        };
                        sort.sort_window(rows, offset, limit);
                    } else {
                        sort.sort(rows);
                    }
                }
            }
        }
        self.apply_offset_and_limit()?;
        self.finalized = true;
        self.reset()
    }

    fn apply_offset_and_limit(&mut self) -> Result<()> {
        if self.limits_applied {
            return Ok(());
        }
        let offset = self.offset.max(0) as usize;
        let mut limit = self.limit;
        if offset == 0 && limit < 0 && !self.fetch_percent || self.row_count == 0 {
            return Ok(());
        }
        if self.fetch_percent {
            ensure!(
                (0..=100).contains(&limit),
                "invalid value \"{}\" for FETCH PERCENT",
                limit
            );
            // Oracle rounds the percentage up, match it
            limit = (limit * self.row_count as i64 + 99) / 100;
        }
        let clear_all = offset >= self.row_count || limit == 0;
        let limit_rows = if clear_all {
            0
        } else {
            let remaining = self.row_count - offset;
            let limit_rows = if limit < 0 {
                remaining
            } else {
                remaining.min(limit as usize)
            };
            if offset == 0 && remaining <= limit_rows {
                return Ok(());
            }
            limit_rows
        };
        self.distinct_rows = None;
        self.row_count = limit_rows;
        if self.external.is_none() {
            if clear_all {
                Arc::make_mut(&mut self.rows).clear();
                return Ok(());
            }
            let mut to = offset + limit_rows;
            if self.with_ties {
                if let Some(sort) = &self.sort {
                    let expected = self.rows[to - 1].clone();
                    while to < self.rows.len()
                        && sort.compare(&expected, &self.rows[to]) == Ordering::Equal
                    {
                        to += 1;
                        self.row_count += 1;
                    }
                }
            }
            let rows = Arc::make_mut(&mut self.rows);
            if offset != 0 || to != rows.len() {
                // re-wrap the slice to free the original backing storage
                let window = rows[offset..to].to_vec();
                *rows = window;
            }
        } else if clear_all {
            if let Some(mut external) = self.external.take() {
                external.close();
            }
        } else {
            self.trim_external(offset, limit_rows)?;
        }
        Ok(())
    }

    fn trim_external(&mut self, offset: usize, limit: usize) -> Result<()> {
        let Some(mut temp) = self.external.take() else {
            bail!("trim_external called without a spill backend");
        };
        debug!(offset, limit, "trimming spilled result to window");
        temp.reset()?;
        for _ in 0..offset {
            temp.next()?;
        }
        let mut last = None;
        for _ in 0..limit {
            let Some(row) = temp.next()? else { break };
            Arc::make_mut(&mut self.rows).push(row.clone());
            last = Some(row);
            if self.rows.len() > self.max_memory_rows {
                self.flush_rows_to_backend()?;
            }
        }
        if self.with_ties {
            if let (Some(sort), Some(expected)) = (self.sort.clone(), last) {
                while let Some(row) = temp.next()? {
                    if sort.compare(&expected, &row) != Ordering::Equal {
                        break;
                    }
                    Arc::make_mut(&mut self.rows).push(row);
                    self.row_count += 1;
                    if self.rows.len() > self.max_memory_rows {
                        self.flush_rows_to_backend()?;
                    }
                }
            }
        }
        if self.external.is_some() {
            self.flush_rows_to_backend()?;
        }
        temp.close();
        Ok(())
    }

    /// Rewinds the cursor to before the first row.
    pub fn reset(&mut self) -> Result<()> {
        self.row_id = -1;
        self.current_row = None;
        if let Some(external) = self.external.as_mut() {
            external.reset()?;
        }
        Ok(())
    }

    /// Advances the cursor. Returns true while a row is available.
    pub fn next(&mut self) -> Result<bool> {
        if !self.closed && self.row_id < self.row_count as i64 {
            self.row_id += 1;
            if (self.row_id as usize) < self.row_count {
                self.current_row = match self.external.as_mut() {
                    Some(external) => external.next()?,
                    None => self.rows.get(self.row_id as usize).cloned(),
                };
                return Ok(true);
            }
            self.current_row = None;
        }
        Ok(false)
    }

    pub fn current_row(&self) -> Option<&Row> {
        self.current_row.as_ref()
    }

    pub fn has_next(&self) -> bool {
        !self.closed && self.row_id + 1 < self.row_count as i64
    }

    pub fn is_after_last(&self) -> bool {
        self.row_id >= self.row_count as i64
    }

    /// Cursor position: -1 before the first row, `row_count` after the last.
    pub fn row_id(&self) -> i64 {
        self.row_id
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Produces an independent cursor over the same finalized data for
    /// `target_session`, or `None` when sharing is not safe: the buffer is
    /// not finalized, rows were dropped from memory without spilling, the
    /// buffer holds LOBs, or the backend refuses to clone.
    pub fn shallow_copy(&self, target_session: &Arc<Session>) -> Option<ResultBuffer> {
        if !self.finalized {
            return None;
        }
        if self.external.is_none() && self.rows.len() < self.row_count {
            return None;
        }
        if self.contains_lobs {
            return None;
        }
        let external = match &self.external {
            Some(external) => Some(external.clone_read_only()?),
            None => None,
        };
        Some(ResultBuffer {
            session: target_session.clone(),
            columns: self.columns.clone(),
            visible_columns: self.visible_columns,
            max_memory_rows: self.max_memory_rows,
            row_id: -1,
            row_count: self.row_count,
            rows: self.rows.clone(),
            sort: self.sort.clone(),
            distinct_rows: None,
            current_row: None,
            offset: 0,
            limit: -1,
            fetch_percent: false,
            with_ties: false,
            limits_applied: false,
            external,
            distinct: self.distinct,
            distinct_indexes: self.distinct_indexes.clone(),
            finalized: true,
            closed: false,
            contains_lobs: false,
        })
    }

    /// Whether close() has resources to release.
    pub fn needs_close(&self) -> bool {
        self.external.is_some()
    }

    /// Releases the spill backend, if any. Idempotent; the in-memory row
    /// list is kept for metadata access.
    pub fn close(&mut self) {
        if let Some(mut external) = self.external.take() {
            external.close();
        }
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn visible_column_count(&self) -> usize {
        self.visible_columns
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn alias(&self, i: usize) -> &str {
        self.columns[i].alias()
    }

    pub fn column_name(&self, i: usize) -> &str {
        self.columns[i].column_name()
    }

    pub fn table_name(&self, i: usize) -> Option<&str> {
        self.columns[i].table_name()
    }

    pub fn schema_name(&self, i: usize) -> Option<&str> {
        self.columns[i].schema_name()
    }

    pub fn column_type(&self, i: usize) -> DataType {
        self.columns[i].data_type()
    }

    pub fn column_precision(&self, i: usize) -> u64 {
        self.columns[i].precision()
    }

    pub fn column_scale(&self, i: usize) -> i32 {
        self.columns[i].scale()
    }

    pub fn display_size(&self, i: usize) -> u32 {
        self.columns[i].display_size()
    }

    pub fn nullability(&self, i: usize) -> Nullability {
        self.columns[i].nullability()
    }

    pub fn is_auto_increment(&self, i: usize) -> bool {
        self.columns[i].is_auto_increment()
    }
}

impl std::fmt::Debug for ResultBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultBuffer")
            .field("columns", &self.visible_columns)
            .field("rows", &self.row_count)
            .field("pos", &self.row_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Database;
    use smallvec::smallvec;

    fn buffer(columns: usize, visible: usize) -> ResultBuffer {
        let session = Session::new(Database::in_memory());
        let columns = (0..columns)
            .map(|i| ColumnMeta::new(format!("c{}", i), DataType::Int8))
            .collect();
        ResultBuffer::new(session, columns, visible)
    }

    #[test]
    fn add_row_after_done_fails() {
        let mut buf = buffer(1, 1);
        buf.add_row(smallvec![Value::Int(1)]).unwrap();
        buf.done().unwrap();
        assert!(buf.add_row(smallvec![Value::Int(2)]).is_err());
    }

    #[test]
    fn done_twice_fails() {
        let mut buf = buffer(1, 1);
        buf.done().unwrap();
        assert!(buf.done().is_err());
    }

    #[test]
    fn distinct_modes_are_mutually_exclusive() {
        let mut buf = buffer(2, 2);
        buf.set_distinct_on(vec![0]).unwrap();
        assert!(buf.set_distinct().is_err());

        let mut buf = buffer(2, 2);
        buf.set_distinct().unwrap();
        assert!(buf.set_distinct_on(vec![0]).is_err());
    }

    #[test]
    fn distinct_after_rows_fails() {
        let mut buf = buffer(1, 1);
        buf.add_row(smallvec![Value::Int(1)]).unwrap();
        assert!(buf.set_distinct().is_err());
        assert!(buf.set_distinct_on(vec![0]).is_err());
    }

    #[test]
    fn remove_distinct_on_non_distinct_fails() {
        let mut buf = buffer(1, 1);
        assert!(buf.remove_distinct(&[Value::Int(1)]).is_err());

        let mut buf = buffer(2, 2);
        buf.set_distinct_on(vec![0]).unwrap();
        assert!(buf
            .remove_distinct(&[Value::Int(1), Value::Int(2)])
            .is_err());
    }

    #[test]
    fn contains_distinct_requires_distinct() {
        let mut buf = buffer(1, 1);
        assert!(buf.contains_distinct(&[Value::Int(1)]).is_err());
    }

    #[test]
    fn fetch_percent_out_of_range_fails_in_done() {
        let mut buf = buffer(1, 1);
        buf.add_row(smallvec![Value::Int(1)]).unwrap();
        buf.set_limit(101);
        buf.set_fetch_percent(true);
        let err = buf.done().unwrap_err();
        assert!(err.to_string().contains("FETCH PERCENT"));
    }

    #[test]
    fn close_is_idempotent_and_blocks_operations() {
        let mut buf = buffer(1, 1);
        buf.add_row(smallvec![Value::Int(1)]).unwrap();
        buf.close();
        buf.close();
        assert!(buf.is_closed());
        assert!(buf.add_row(smallvec![Value::Int(2)]).is_err());
        assert!(buf.done().is_err());
        // metadata stays accessible
        assert_eq!(buf.alias(0), "c0");
    }

    #[test]
    fn cursor_walks_and_ends() {
        let mut buf = buffer(1, 1);
        for v in 1..=3 {
            buf.add_row(smallvec![Value::Int(v)]).unwrap();
        }
        buf.done().unwrap();

        assert_eq!(buf.row_id(), -1);
        assert!(buf.has_next());
        let mut seen = Vec::new();
        while buf.next().unwrap() {
            seen.push(buf.current_row().unwrap()[0].clone());
        }
        assert_eq!(seen, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(buf.is_after_last());
        assert!(buf.current_row().is_none());
        assert!(!buf.next().unwrap());

        buf.reset().unwrap();
        assert_eq!(buf.row_id(), -1);
        assert!(buf.next().unwrap());
    }

    #[test]
    fn limit_zero_empties_the_result() {
        let mut buf = buffer(1, 1);
        for v in 1..=3 {
            buf.add_row(smallvec![Value::Int(v)]).unwrap();
        }
        buf.set_limit(0);
        buf.done().unwrap();
        assert_eq!(buf.row_count(), 0);
        assert!(!buf.next().unwrap());
    }

    #[test]
    fn limits_were_applied_skips_windowing() {
        let mut buf = buffer(1, 1);
        for v in 1..=5 {
            buf.add_row(smallvec![Value::Int(v)]).unwrap();
        }
        buf.set_offset(2);
        buf.set_limit(1);
        buf.limits_were_applied();
        buf.done().unwrap();
        assert_eq!(buf.row_count(), 5);
    }

    #[test]
    fn contains_distinct_after_done_rebuilds_lazily() {
        let mut buf = buffer(1, 1);
        buf.set_distinct().unwrap();
        for v in [1i64, 2, 1] {
            buf.add_row(smallvec![Value::Int(v)]).unwrap();
        }
        buf.done().unwrap();
        assert!(buf.contains_distinct(&[Value::Int(2)]).unwrap());
        assert!(!buf.contains_distinct(&[Value::Int(3)]).unwrap());
    }

    #[test]
    fn debug_shows_shape() {
        let buf = buffer(2, 2);
        let s = format!("{:?}", buf);
        assert!(s.contains("columns: 2"));
        assert!(s.contains("pos: -1"));
    }
}
