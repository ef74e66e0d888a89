//! # Insertion-Ordered Distinct Index
//!
//! `DistinctIndex` maps a row key to its canonical row: the first row
//! inserted under that key. Later duplicates are discarded silently.
//! Iteration order is insertion order of the surviving keys, which is
//! observable whenever a distinct buffer has no sort configured.
//!
//! Removal keeps insertion order intact by tombstoning the row slot instead
//! of shifting; the live count is tracked separately.

use super::row_key::ValueArray;
use super::Row;
use hashbrown::HashMap;

/// Insertion-ordered map from row key to canonical row.
#[derive(Debug, Default)]
pub struct DistinctIndex {
    map: HashMap<ValueArray, usize>,
    rows: Vec<Option<Row>>,
    live: usize,
}

impl DistinctIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `row` under `key` unless the key is already present.
    /// Returns true if the row was inserted.
    pub fn insert_if_absent(&mut self, key: ValueArray, row: Row) -> bool {
        if self.map.contains_key(&key) {
            return false;
        }
        self.map.insert(key, self.rows.len());
        self.rows.push(Some(row));
        self.live += 1;
        true
    }

    /// Removes the row stored under `key`, if any.
    pub fn remove(&mut self, key: &ValueArray) -> bool {
        match self.map.remove(key) {
            Some(slot) => {
                self.rows[slot] = None;
                self.live -= 1;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &ValueArray) -> bool {
        self.map.contains_key(key)
    }

    /// Number of live rows.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Consumes the index, yielding live rows in insertion order.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use smallvec::smallvec;

    fn key(v: i64) -> ValueArray {
        ValueArray::of([Value::Int(v)])
    }

    fn row(v: i64, tag: &str) -> Row {
        smallvec![Value::Int(v), Value::Text(tag.into())]
    }

    #[test]
    fn first_insertion_wins() {
        let mut index = DistinctIndex::new();
        assert!(index.insert_if_absent(key(1), row(1, "first")));
        assert!(!index.insert_if_absent(key(1), row(1, "second")));
        assert_eq!(index.len(), 1);

        let rows = index.into_rows();
        assert_eq!(rows[0][1], Value::Text("first".into()));
    }

    #[test]
    fn iteration_is_insertion_order() {
        let mut index = DistinctIndex::new();
        for v in [3, 1, 2] {
            index.insert_if_absent(key(v), row(v, "x"));
        }
        let order: Vec<_> = index.into_rows().iter().map(|r| r[0].clone()).collect();
        assert_eq!(order, vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn remove_preserves_order_of_survivors() {
        let mut index = DistinctIndex::new();
        for v in [1, 2, 3] {
            index.insert_if_absent(key(v), row(v, "x"));
        }
        assert!(index.remove(&key(2)));
        assert!(!index.remove(&key(2)));
        assert_eq!(index.len(), 2);

        let order: Vec<_> = index.into_rows().iter().map(|r| r[0].clone()).collect();
        assert_eq!(order, vec![Value::Int(1), Value::Int(3)]);
    }

    #[test]
    fn reinsert_after_remove() {
        let mut index = DistinctIndex::new();
        index.insert_if_absent(key(1), row(1, "a"));
        index.remove(&key(1));
        assert!(index.insert_if_absent(key(1), row(1, "b")));
        assert_eq!(index.len(), 1);
    }
}
