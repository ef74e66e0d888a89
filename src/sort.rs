//! # Multi-Column Sort Comparator
//!
//! This module provides `SortOrder`, the comparator a result buffer applies
//! during finalization. Each sort column carries a direction and a NULL
//! placement rule; comparison short-circuits on the first non-equal column.
//!
//! ## NULL Placement
//!
//! - `NullOrdering::Low` (default): NULL sorts as the lowest value, so it
//!   comes first ascending and last descending.
//! - `NullOrdering::First` / `NullOrdering::Last`: absolute placement that
//!   ignores the column direction (SQL `NULLS FIRST` / `NULLS LAST`).
//!
//! ## Windowed Partial Sort
//!
//! When only the rows in `[offset, offset + limit)` will survive window
//! application, `sort_window` partitions the slice around the window end
//! with `select_nth_unstable_by` and then sorts just the prefix. Rows past
//! the window end are in unspecified order.
//!
//! ## Key Extraction
//!
//! Spilled results sort slot ids rather than rows. `extract_key` projects a
//! row onto its sort columns in comparator order and `compare_keys` compares
//! two such projections positionally, so the spill backend can order its
//! scan without retaining whole rows.

use crate::result::Row;
use crate::types::Value;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// NULL placement rule for one sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullOrdering {
    /// NULL sorts as the lowest value; direction applies.
    #[default]
    Low,
    /// NULL always sorts first, regardless of direction.
    First,
    /// NULL always sorts last, regardless of direction.
    Last,
}

/// One column of a sort specification.
#[derive(Debug, Clone)]
pub struct SortColumn {
    pub column: usize,
    pub descending: bool,
    pub nulls: NullOrdering,
}

impl SortColumn {
    /// Ascending sort on the given column index.
    pub fn asc(column: usize) -> Self {
        Self {
            column,
            descending: false,
            nulls: NullOrdering::Low,
        }
    }

    /// Descending sort on the given column index.
    pub fn desc(column: usize) -> Self {
        Self {
            column,
            descending: true,
            nulls: NullOrdering::Low,
        }
    }

    pub fn with_nulls(mut self, nulls: NullOrdering) -> Self {
        self.nulls = nulls;
        self
    }

    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => self.null_side(),
            (false, true) => self.null_side().reverse(),
            (false, false) => {
                let ord = a.compare_for_sort(b);
                if self.descending {
                    ord.reverse()
                } else {
                    ord
                }
            }
        }
    }

    fn null_side(&self) -> Ordering {
        match self.nulls {
            NullOrdering::First => Ordering::Less,
            NullOrdering::Last => Ordering::Greater,
            NullOrdering::Low => {
                if self.descending {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
        }
    }
}

/// Multi-column comparator over result rows.
#[derive(Debug, Clone)]
pub struct SortOrder {
    columns: Vec<SortColumn>,
}

impl SortOrder {
    pub fn new(columns: Vec<SortColumn>) -> Self {
        Self { columns }
    }

    /// Ascending sort over the given column indexes, default NULL placement.
    pub fn ascending(indexes: &[usize]) -> Self {
        Self::new(indexes.iter().map(|&i| SortColumn::asc(i)).collect())
    }

    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    /// Compares two full rows under this order.
    pub fn compare(&self, a: &[Value], b: &[Value]) -> Ordering {
        for col in &self.columns {
            let ord = col.compare(&a[col.column], &b[col.column]);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Projects a row onto its sort columns, in comparator order.
    pub fn extract_key(&self, row: &[Value]) -> SmallVec<[Value; 4]> {
        self.columns
            .iter()
            .map(|col| row[col.column].clone())
            .collect()
    }

    /// Compares two `extract_key` projections positionally.
    pub fn compare_keys(&self, a: &[Value], b: &[Value]) -> Ordering {
        for (i, col) in self.columns.iter().enumerate() {
            let ord = col.compare(&a[i], &b[i]);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Stable full sort.
    pub fn sort(&self, rows: &mut [Row]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }

    /// Sorts only enough that rows `[offset, offset + limit)` are in their
    /// final positions and order; rows past the window end are unspecified.
    pub fn sort_window(&self, rows: &mut [Row], offset: usize, limit: usize) {
        let len = rows.len();
        let end = offset.saturating_add(limit).min(len);
        if end == 0 || len <= 1 {
            return;
        }
        if end < len {
            rows.select_nth_unstable_by(end - 1, |a, b| self.compare(a, b));
        }
        rows[..end].sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn row(values: &[i64]) -> Row {
        values.iter().map(|&v| Value::Int(v)).collect()
    }

    #[test]
    fn single_column_ascending() {
        let order = SortOrder::ascending(&[0]);
        let mut rows = vec![row(&[3]), row(&[1]), row(&[2])];
        order.sort(&mut rows);
        assert_eq!(rows, vec![row(&[1]), row(&[2]), row(&[3])]);
    }

    #[test]
    fn descending_reverses() {
        let order = SortOrder::new(vec![SortColumn::desc(0)]);
        let mut rows = vec![row(&[1]), row(&[3]), row(&[2])];
        order.sort(&mut rows);
        assert_eq!(rows, vec![row(&[3]), row(&[2]), row(&[1])]);
    }

    #[test]
    fn multi_column_tiebreak() {
        let order = SortOrder::new(vec![SortColumn::asc(0), SortColumn::desc(1)]);
        let mut rows = vec![row(&[1, 1]), row(&[0, 5]), row(&[1, 9])];
        order.sort(&mut rows);
        assert_eq!(rows, vec![row(&[0, 5]), row(&[1, 9]), row(&[1, 1])]);
    }

    #[test]
    fn nulls_default_sort_low() {
        let order = SortOrder::ascending(&[0]);
        let mut rows: Vec<Row> = vec![
            smallvec![Value::Int(1)],
            smallvec![Value::Null],
            smallvec![Value::Int(0)],
        ];
        order.sort(&mut rows);
        assert!(rows[0][0].is_null());

        let order = SortOrder::new(vec![SortColumn::desc(0)]);
        order.sort(&mut rows);
        assert!(rows[2][0].is_null());
    }

    #[test]
    fn nulls_last_overrides_direction() {
        let order = SortOrder::new(vec![SortColumn::asc(0).with_nulls(NullOrdering::Last)]);
        let mut rows: Vec<Row> = vec![
            smallvec![Value::Null],
            smallvec![Value::Int(2)],
            smallvec![Value::Int(1)],
        ];
        order.sort(&mut rows);
        assert_eq!(rows[0][0], Value::Int(1));
        assert!(rows[2][0].is_null());
    }

    #[test]
    fn sort_window_orders_the_window() {
        let order = SortOrder::ascending(&[0]);
        let mut rows: Vec<Row> = (0..100).rev().map(|v| row(&[v])).collect();
        order.sort_window(&mut rows, 10, 5);
        for (i, r) in rows[..15].iter().enumerate() {
            assert_eq!(r[0], Value::Int(i as i64));
        }
    }

    #[test]
    fn sort_window_past_end_is_full_sort() {
        let order = SortOrder::ascending(&[0]);
        let mut rows = vec![row(&[2]), row(&[0]), row(&[1])];
        order.sort_window(&mut rows, 0, 10);
        assert_eq!(rows, vec![row(&[0]), row(&[1]), row(&[2])]);
    }

    #[test]
    fn key_extraction_roundtrip() {
        let order = SortOrder::new(vec![SortColumn::desc(2), SortColumn::asc(0)]);
        let a = row(&[1, 0, 9]);
        let b = row(&[5, 0, 9]);
        let ka = order.extract_key(&a);
        let kb = order.extract_key(&b);
        assert_eq!(order.compare_keys(&ka, &kb), order.compare(&a, &b));
        assert_eq!(order.compare_keys(&ka, &kb), Ordering::Less);
    }
}
