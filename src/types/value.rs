//! # Runtime Value Representation
//!
//! This module provides `Value`, the owned runtime representation for SQL
//! values held by a result buffer. Buffers own their rows outright for the
//! whole buffer lifetime, so `Value` carries no borrowed data; large-object
//! payloads are ref-counted handles whose lifetime is managed by the session
//! (see [`LobHandle`]).
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | Description |
//! |---------|-----------|-------------|
//! | Null | - | SQL NULL |
//! | Bool | bool | SQL BOOLEAN |
//! | Int | i64 | 64-bit signed integer |
//! | Float | f64 | 64-bit floating point |
//! | Text | String | UTF-8 string |
//! | Blob | Vec<u8> | Inline binary data |
//! | Uuid | [u8; 16] | UUID bytes |
//! | TimestampTz | {micros, offset} | Timestamp with timezone |
//! | Decimal | {digits, scale} | Fixed-point decimal |
//! | Lob | LobHandle | Out-of-line BLOB/CLOB payload |
//!
//! ## Comparison Semantics
//!
//! - `compare` implements SQL semantics: NULL against anything is UNKNOWN
//!   (`None`). Floats compare with `total_cmp`, so NaN orders after all
//!   finite values instead of poisoning the comparison.
//! - `compare_for_sort` collapses UNKNOWN to `Equal`; sort comparators
//!   resolve NULL placement themselves before calling it.
//! - Cross-variant ordering ranks: booleans < numbers < text < blobs <
//!   UUIDs < timestamps < LOBs. Int, Float, and Decimal compare within one
//!   numeric class.
//!
//! ## Key Semantics
//!
//! Distinct keys need `Hash`/`Eq` that agree with each other, which plain
//! `f64` equality cannot provide. `key_eq` compares floats bitwise and
//! treats NULL as equal to NULL (SQL DISTINCT semantics); `hash_to` hashes
//! floats by bit pattern to match.

use super::{DataType, LobHandle};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Owned runtime value stored in result-buffer rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    Uuid([u8; 16]),
    TimestampTz { micros: i64, offset_secs: i32 },
    Decimal { digits: i128, scale: i16 },
    Lob(LobHandle),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the runtime type of this value. NULL reports as Int8.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Int8,
            Value::Bool(_) => DataType::Bool,
            Value::Int(_) => DataType::Int8,
            Value::Float(_) => DataType::Float8,
            Value::Text(_) => DataType::Text,
            Value::Blob(_) => DataType::Blob,
            Value::Uuid(_) => DataType::Uuid,
            Value::TimestampTz { .. } => DataType::TimestampTz,
            Value::Decimal { .. } => DataType::Decimal,
            Value::Lob(_) => DataType::Blob,
        }
    }

    /// Returns a session-owned replacement for this value, or `None` when
    /// the value can be stored as-is.
    ///
    /// Only LOB handles whose payload is still engine-owned need replacing;
    /// the caller must register the replacement with the owning session so
    /// the payload outlives the producing statement.
    pub fn materialize(&self) -> Option<Value> {
        match self {
            Value::Lob(handle) if !handle.is_session_owned() => {
                Some(Value::Lob(handle.to_session_owned()))
            }
            _ => None,
        }
    }

    /// Compares two values with SQL NULL semantics.
    /// Returns None if either value is NULL (SQL UNKNOWN).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,

            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
            (Value::Int(a), Value::Float(b)) => Some((*a as f64).total_cmp(b)),
            (Value::Float(a), Value::Int(b)) => Some(a.total_cmp(&(*b as f64))),

            (Value::Decimal { digits, scale }, Value::Decimal { digits: bd, scale: bs }) => {
                Some(compare_decimals(*digits, *scale, *bd, *bs))
            }
            (Value::Int(a), Value::Decimal { digits, scale }) => {
                Some(compare_decimals(*a as i128, 0, *digits, *scale))
            }
            (Value::Decimal { digits, scale }, Value::Int(b)) => {
                Some(compare_decimals(*digits, *scale, *b as i128, 0))
            }
            (Value::Float(a), Value::Decimal { digits, scale }) => {
                Some(a.total_cmp(&decimal_to_f64(*digits, *scale)))
            }
            (Value::Decimal { digits, scale }, Value::Float(b)) => {
                Some(decimal_to_f64(*digits, *scale).total_cmp(b))
            }

            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Blob(a), Value::Blob(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            (Value::TimestampTz { micros: a, .. }, Value::TimestampTz { micros: b, .. }) => {
                Some(a.cmp(b))
            }
            (Value::Lob(a), Value::Lob(b)) => Some(a.bytes().cmp(b.bytes())),

            _ => Some(self.type_rank().cmp(&other.type_rank())),
        }
    }

    /// Compares two values for sorting. NULL placement is the comparator's
    /// concern; an UNKNOWN result collapses to Equal.
    pub fn compare_for_sort(&self, other: &Value) -> Ordering {
        self.compare(other).unwrap_or(Ordering::Equal)
    }

    /// Key equality for distinct maps: NULL equals NULL, floats compare
    /// bitwise so equality agrees with `hash_to`.
    pub fn key_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    /// Hashes this value for use as (part of) a distinct key.
    pub fn hash_to<H: Hasher>(&self, hasher: &mut H) {
        match self {
            Value::Null => 0u8.hash(hasher),
            Value::Bool(b) => b.hash(hasher),
            Value::Int(i) => i.hash(hasher),
            Value::Float(f) => f.to_bits().hash(hasher),
            Value::Text(s) => s.hash(hasher),
            Value::Blob(b) => b.hash(hasher),
            Value::Uuid(u) => u.hash(hasher),
            Value::TimestampTz {
                micros,
                offset_secs,
            } => {
                micros.hash(hasher);
                offset_secs.hash(hasher);
            }
            Value::Decimal { digits, scale } => {
                digits.hash(hasher);
                scale.hash(hasher);
            }
            Value::Lob(handle) => handle.hash(hasher),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) | Value::Decimal { .. } => 2,
            Value::Text(_) => 3,
            Value::Blob(_) => 4,
            Value::Uuid(_) => 5,
            Value::TimestampTz { .. } => 6,
            Value::Lob(_) => 7,
        }
    }
}

fn compare_decimals(a: i128, a_scale: i16, b: i128, b_scale: i16) -> Ordering {
    if a_scale == b_scale {
        return a.cmp(&b);
    }
    let max_scale = a_scale.max(b_scale);
    let scale_up = |digits: i128, scale: i16| -> Option<i128> {
        digits.checked_mul(10i128.checked_pow((max_scale - scale) as u32)?)
    };
    match (scale_up(a, a_scale), scale_up(b, b_scale)) {
        (Some(sa), Some(sb)) => sa.cmp(&sb),
        // magnitudes past i128 range after rescale, compare as floats
        _ => decimal_to_f64(a, a_scale).total_cmp(&decimal_to_f64(b, b_scale)),
    }
}

fn decimal_to_f64(digits: i128, scale: i16) -> f64 {
    digits as f64 / 10f64.powi(scale as i32)
}
