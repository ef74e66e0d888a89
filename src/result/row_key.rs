//! # Distinct Row Keys
//!
//! `ValueArray` is the hashable composite key a result buffer derives from a
//! row: either the visible-column prefix or the projection onto explicit
//! distinct indexes. It exists so the distinct map can key on a slice of the
//! row without hauling trailing sort-helper columns into the key.
//!
//! Equality and hashing are element-wise with `Value::key_eq` semantics:
//! NULL equals NULL (SQL DISTINCT treats NULLs as duplicates of each other)
//! and floats compare bitwise so `Eq` agrees with `Hash`.

use crate::config::KEY_INLINE_VALUES;
use crate::types::Value;
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};

/// Hashable composite key over a projected slice of a row.
#[derive(Debug, Clone)]
pub struct ValueArray {
    values: SmallVec<[Value; KEY_INLINE_VALUES]>,
}

impl ValueArray {
    pub fn of(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Key over the first `len` columns of `row`.
    pub fn from_prefix(row: &[Value], len: usize) -> Self {
        Self::of(row[..len.min(row.len())].iter().cloned())
    }

    /// Key over the projection of `row` onto `indexes`.
    pub fn from_projection(row: &[Value], indexes: &[usize]) -> Self {
        Self::of(indexes.iter().map(|&i| row[i].clone()))
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl PartialEq for ValueArray {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a.key_eq(b))
    }
}

impl Eq for ValueArray {}

impl Hash for ValueArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.values.len().hash(state);
        for value in &self.values {
            value.hash_to(state);
        }
    }
}
