//! # Byte-Comparable Distinct-Key Encoding
//!
//! This module encodes value sequences into byte strings for the spill
//! backend's distinct-key index. Encoded keys can be compared and hashed as
//! plain byte slices, so the on-disk backend never needs to deserialize rows
//! to answer `contains` or to deduplicate.
//!
//! ## Design Goals
//!
//! 1. **Deterministic**: the same value always produces the same bytes
//! 2. **Injective**: distinct keys (under `Value::key_eq`) produce distinct
//!    bytes; floats encode their exact bit pattern, NULL is a single tag
//! 3. **Byte-comparable**: lexicographic byte order matches value order
//!    within a type class
//! 4. **Self-delimiting**: composite keys are plain concatenations
//!
//! ## Type Prefix Scheme
//!
//! Each encoded value starts with a prefix byte that separates type classes:
//!
//! ```text
//! 0x01       NULL
//! 0x02-0x03  Booleans (FALSE < TRUE)
//! 0x12-0x19  Numbers (negatives < zero < positives < NaN)
//! 0x20-0x21  Strings (TEXT < BLOB)
//! 0x33       TIMESTAMPTZ
//! 0x35       DECIMAL
//! 0x40       UUID
//! 0x48       LOB
//! ```
//!
//! ## Number Encoding
//!
//! Integers use a sign-split encoding: negatives as two's-complement
//! big-endian under `NEG_INT`, zero as the bare `ZERO` tag, positives as
//! big-endian under `POS_INT`. Floats keep their IEEE 754 bit pattern,
//! inverted (negatives) or sign-flipped (positives) so byte order follows
//! numeric order. Integer zero and float zero deliberately encode
//! differently: key equality is per-variant.
//!
//! ## Text Encoding
//!
//! Variable-length payloads escape embedded `0x00`/`0xFF` bytes and end
//! with a `0x00 0x00` terminator, so concatenated keys stay unambiguous:
//!
//! ```text
//! 0x00 -> 0x00 0xFF
//! 0xFF -> 0xFF 0x00
//! Terminator: 0x00 0x00
//! ```

use crate::types::Value;

pub mod type_prefix {
    pub const NULL: u8 = 0x01;
    pub const FALSE: u8 = 0x02;
    pub const TRUE: u8 = 0x03;

    pub const NEG_FLOAT: u8 = 0x12;
    pub const NEG_INT: u8 = 0x13;
    pub const ZERO: u8 = 0x14;
    pub const POS_INT: u8 = 0x15;
    pub const POS_FLOAT: u8 = 0x16;
    pub const NAN: u8 = 0x19;

    pub const TEXT: u8 = 0x20;
    pub const BLOB: u8 = 0x21;

    pub const TIMESTAMPTZ: u8 = 0x33;
    pub const DECIMAL: u8 = 0x35;

    pub const UUID: u8 = 0x40;
    pub const LOB: u8 = 0x48;
}

/// Encodes one value onto `buf`.
pub fn encode_value(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Null => buf.push(type_prefix::NULL),
        Value::Bool(false) => buf.push(type_prefix::FALSE),
        Value::Bool(true) => buf.push(type_prefix::TRUE),
        Value::Int(i) => encode_int(*i, buf),
        Value::Float(f) => encode_float(*f, buf),
        Value::Text(s) => {
            buf.push(type_prefix::TEXT);
            encode_escaped(s.as_bytes(), buf);
        }
        Value::Blob(b) => {
            buf.push(type_prefix::BLOB);
            encode_escaped(b, buf);
        }
        Value::Uuid(u) => {
            buf.push(type_prefix::UUID);
            buf.extend(u);
        }
        Value::TimestampTz {
            micros,
            offset_secs,
        } => {
            buf.push(type_prefix::TIMESTAMPTZ);
            buf.extend((*micros as u64 ^ (1u64 << 63)).to_be_bytes());
            buf.extend((*offset_secs as u32 ^ (1u32 << 31)).to_be_bytes());
        }
        Value::Decimal { digits, scale } => {
            buf.push(type_prefix::DECIMAL);
            buf.extend((*digits as u128 ^ (1u128 << 127)).to_be_bytes());
            buf.extend((*scale as u16 ^ (1u16 << 15)).to_be_bytes());
        }
        Value::Lob(handle) => {
            buf.push(type_prefix::LOB);
            encode_escaped(handle.bytes(), buf);
        }
    }
}

/// Encodes a composite key by concatenating its values.
pub fn encode_key(values: &[Value], buf: &mut Vec<u8>) {
    for value in values {
        encode_value(value, buf);
    }
}

pub fn encode_int(v: i64, buf: &mut Vec<u8>) {
    match v.cmp(&0) {
        std::cmp::Ordering::Less => {
            buf.push(type_prefix::NEG_INT);
            buf.extend((v as u64).to_be_bytes());
        }
        std::cmp::Ordering::Equal => buf.push(type_prefix::ZERO),
        std::cmp::Ordering::Greater => {
            buf.push(type_prefix::POS_INT);
            buf.extend((v as u64).to_be_bytes());
        }
    }
}

pub fn encode_float(v: f64, buf: &mut Vec<u8>) {
    let bits = v.to_bits();
    if v.is_nan() {
        buf.push(type_prefix::NAN);
        buf.extend(bits.to_be_bytes());
    } else if bits & (1u64 << 63) != 0 {
        buf.push(type_prefix::NEG_FLOAT);
        buf.extend((!bits).to_be_bytes());
    } else {
        buf.push(type_prefix::POS_FLOAT);
        buf.extend((bits ^ (1u64 << 63)).to_be_bytes());
    }
}

fn encode_escaped(data: &[u8], buf: &mut Vec<u8>) {
    for &b in data {
        match b {
            0x00 => buf.extend([0x00, 0xFF]),
            0xFF => buf.extend([0xFF, 0x00]),
            other => buf.push(other),
        }
    }
    buf.extend([0x00, 0x00]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_value(value, &mut buf);
        buf
    }

    #[test]
    fn int_order_is_byte_order() {
        let values = [-1_000_000i64, -2, -1, 0, 1, 2, 1_000_000];
        let keys: Vec<_> = values.iter().map(|v| encoded(&Value::Int(*v))).collect();
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn float_order_is_byte_order() {
        let values = [-1e30f64, -1.5, -0.0, 0.0, 1.5, 1e30];
        let keys: Vec<_> = values.iter().map(|v| encoded(&Value::Float(*v))).collect();
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn int_zero_and_float_zero_differ() {
        assert_ne!(encoded(&Value::Int(0)), encoded(&Value::Float(0.0)));
    }

    #[test]
    fn embedded_nulls_do_not_collide() {
        let a = encoded(&Value::Text("a\0b".into()));
        let b = encoded(&Value::Text("a".into()));
        let c = encoded(&Value::Text("a\0".into()));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn composite_keys_are_unambiguous() {
        let mut ab = Vec::new();
        encode_key(
            &[Value::Text("a".into()), Value::Text("b".into())],
            &mut ab,
        );
        let mut a_b = Vec::new();
        encode_key(&[Value::Text("ab".into())], &mut a_b);
        assert_ne!(ab, a_b);
    }

    #[test]
    fn text_order_is_byte_order() {
        let a = encoded(&Value::Text("apple".into()));
        let b = encoded(&Value::Text("apples".into()));
        let c = encoded(&Value::Text("banana".into()));
        assert!(a < b);
        assert!(b < c);
    }
}
