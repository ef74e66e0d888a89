//! # Key Encoding
//!
//! Byte-comparable encoding of distinct keys for the spill backend's key
//! index. See [`key`] for the encoding scheme.

pub mod key;
