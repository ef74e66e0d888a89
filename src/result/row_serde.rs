//! # Row Serialization for Spill Files
//!
//! Serialization and deserialization for rows written to the spill backend
//! when a result buffer exceeds its memory threshold.
//!
//! ## Design Goals
//!
//! 1. **Reused buffers**: serialization targets a caller-owned `Vec<u8>`
//! 2. **Compact encoding**: one discriminant byte per column
//! 3. **Full coverage**: every `Value` variant round-trips
//!
//! ## Encoding Format
//!
//! ```text
//! Row := [col_count: u16] [Column]*
//! Column := [discriminant: u8] [Data]
//!
//! Discriminants:
//!   0x01 = NULL (no data)
//!   0x02 = FALSE (no data)
//!   0x03 = TRUE (no data)
//!   0x10 = INT (8 bytes i64)
//!   0x11 = FLOAT (8 bytes f64 bits)
//!   0x20 = TEXT ([len: u32] [utf8 bytes])
//!   0x21 = BLOB ([len: u32] [bytes])
//!   0x33 = TIMESTAMPTZ (8 + 4 bytes: micros + offset_secs)
//!   0x35 = DECIMAL (16 + 2 bytes: digits as i128 + scale)
//!   0x40 = UUID (16 bytes)
//!   0x48 = LOB ([id: u64] [len: u32] [bytes])
//! ```
//!
//! All integers are little-endian. Unlike `encoding::key`, this format has
//! no ordering guarantees; it is optimized for space and used exclusively
//! for temporary spill files. LOB payloads are written inline: by the time a
//! row reaches the spill backend its handles are session-owned copies, and a
//! deserialized handle simply shares the same lifetime rules.

use super::Row;
use crate::types::{LobHandle, Value};
use eyre::{bail, ensure, Result};

mod discriminant {
    pub const NULL: u8 = 0x01;
    pub const FALSE: u8 = 0x02;
    pub const TRUE: u8 = 0x03;
    pub const INT: u8 = 0x10;
    pub const FLOAT: u8 = 0x11;
    pub const TEXT: u8 = 0x20;
    pub const BLOB: u8 = 0x21;
    pub const TIMESTAMPTZ: u8 = 0x33;
    pub const DECIMAL: u8 = 0x35;
    pub const UUID: u8 = 0x40;
    pub const LOB: u8 = 0x48;
}

pub struct RowSerde;

impl RowSerde {
    /// Serializes `row` onto the end of `buf`.
    pub fn serialize_row_into(row: &[Value], buf: &mut Vec<u8>) {
        buf.extend((row.len() as u16).to_le_bytes());
        for value in row {
            Self::serialize_value(value, buf);
        }
    }

    fn serialize_value(value: &Value, buf: &mut Vec<u8>) {
        match value {
            Value::Null => buf.push(discriminant::NULL),
            Value::Bool(false) => buf.push(discriminant::FALSE),
            Value::Bool(true) => buf.push(discriminant::TRUE),
            Value::Int(i) => {
                buf.push(discriminant::INT);
                buf.extend(i.to_le_bytes());
            }
            Value::Float(f) => {
                buf.push(discriminant::FLOAT);
                buf.extend(f.to_bits().to_le_bytes());
            }
            Value::Text(s) => {
                buf.push(discriminant::TEXT);
                buf.extend((s.len() as u32).to_le_bytes());
                buf.extend(s.as_bytes());
            }
            Value::Blob(b) => {
                buf.push(discriminant::BLOB);
                buf.extend((b.len() as u32).to_le_bytes());
                buf.extend(b.iter());
            }
            Value::TimestampTz {
                micros,
                offset_secs,
            } => {
                buf.push(discriminant::TIMESTAMPTZ);
                buf.extend(micros.to_le_bytes());
                buf.extend(offset_secs.to_le_bytes());
            }
            Value::Decimal { digits, scale } => {
                buf.push(discriminant::DECIMAL);
                buf.extend(digits.to_le_bytes());
                buf.extend(scale.to_le_bytes());
            }
            Value::Uuid(u) => {
                buf.push(discriminant::UUID);
                buf.extend(u);
            }
            Value::Lob(handle) => {
                buf.push(discriminant::LOB);
                buf.extend(handle.id().to_le_bytes());
                buf.extend((handle.len() as u32).to_le_bytes());
                buf.extend(handle.bytes());
            }
        }
    }

    /// Deserializes one row from `data` starting at `*offset`, advancing
    /// the offset past the consumed bytes.
    pub fn deserialize_row(data: &[u8], offset: &mut usize) -> Result<Row> {
        let col_count = u16::from_le_bytes(take::<2>(data, offset)?) as usize;
        let mut row = Row::with_capacity(col_count);
        for _ in 0..col_count {
            row.push(Self::deserialize_value(data, offset)?);
        }
        Ok(row)
    }

    fn deserialize_value(data: &[u8], offset: &mut usize) -> Result<Value> {
        let tag = take::<1>(data, offset)?[0];
        match tag {
            discriminant::NULL => Ok(Value::Null),
            discriminant::FALSE => Ok(Value::Bool(false)),
            discriminant::TRUE => Ok(Value::Bool(true)),
            discriminant::INT => Ok(Value::Int(i64::from_le_bytes(take::<8>(data, offset)?))),
            discriminant::FLOAT => Ok(Value::Float(f64::from_bits(u64::from_le_bytes(take::<8>(
                data, offset,
            )?)))),
            discriminant::TEXT => {
                let bytes = take_slice(data, offset)?;
                Ok(Value::Text(
                    std::str::from_utf8(bytes)
                        .map_err(|e| eyre::eyre!("invalid UTF-8 in spilled text: {e}"))?
                        .to_owned(),
                ))
            }
            discriminant::BLOB => Ok(Value::Blob(take_slice(data, offset)?.to_vec())),
            discriminant::TIMESTAMPTZ => {
                let micros = i64::from_le_bytes(take::<8>(data, offset)?);
                let offset_secs = i32::from_le_bytes(take::<4>(data, offset)?);
                Ok(Value::TimestampTz {
                    micros,
                    offset_secs,
                })
            }
            discriminant::DECIMAL => {
                let digits = i128::from_le_bytes(take::<16>(data, offset)?);
                let scale = i16::from_le_bytes(take::<2>(data, offset)?);
                Ok(Value::Decimal { digits, scale })
            }
            discriminant::UUID => Ok(Value::Uuid(take::<16>(data, offset)?)),
            discriminant::LOB => {
                let id = u64::from_le_bytes(take::<8>(data, offset)?);
                let bytes = take_slice(data, offset)?;
                Ok(Value::Lob(LobHandle::session_owned(id, bytes.to_vec())))
            }
            t => bail!("unknown value discriminant in spill file: {:#04x}", t),
        }
    }
}

fn take<const N: usize>(data: &[u8], offset: &mut usize) -> Result<[u8; N]> {
    ensure!(
        *offset + N <= data.len(),
        "truncated spill row at offset {}",
        offset
    );
    let mut out = [0u8; N];
    out.copy_from_slice(&data[*offset..*offset + N]);
    *offset += N;
    Ok(out)
}

fn take_slice<'a>(data: &'a [u8], offset: &mut usize) -> Result<&'a [u8]> {
    let len = u32::from_le_bytes(take::<4>(data, offset)?) as usize;
    ensure!(
        *offset + len <= data.len(),
        "truncated spill payload at offset {}",
        offset
    );
    let slice = &data[*offset..*offset + len];
    *offset += len;
    Ok(slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn mixed_row_roundtrip() {
        let row: Row = smallvec![
            Value::Null,
            Value::Bool(true),
            Value::Int(-42),
            Value::Float(2.5),
            Value::Text("hello".into()),
            Value::Blob(vec![1, 2, 3]),
            Value::Uuid([7; 16]),
            Value::TimestampTz {
                micros: 1_234_567_890,
                offset_secs: -28_800,
            },
            Value::Decimal {
                digits: 314_159,
                scale: 5,
            },
            Value::Lob(LobHandle::session_owned(9, vec![0xAA, 0xBB])),
        ];

        let mut buf = Vec::new();
        RowSerde::serialize_row_into(&row, &mut buf);

        let mut offset = 0;
        let back = RowSerde::deserialize_row(&buf, &mut offset).unwrap();
        assert_eq!(offset, buf.len());
        assert_eq!(back.as_slice(), row.as_slice());
    }

    #[test]
    fn consecutive_rows_share_a_buffer() {
        let mut buf = Vec::new();
        RowSerde::serialize_row_into(&[Value::Int(1)], &mut buf);
        RowSerde::serialize_row_into(&[Value::Int(2)], &mut buf);

        let mut offset = 0;
        let first = RowSerde::deserialize_row(&buf, &mut offset).unwrap();
        let second = RowSerde::deserialize_row(&buf, &mut offset).unwrap();
        assert_eq!(first[0], Value::Int(1));
        assert_eq!(second[0], Value::Int(2));
        assert_eq!(offset, buf.len());
    }

    #[test]
    fn truncated_input_is_an_error() {
        let mut buf = Vec::new();
        RowSerde::serialize_row_into(&[Value::Text("abcdef".into())], &mut buf);
        buf.truncate(buf.len() - 2);

        let mut offset = 0;
        assert!(RowSerde::deserialize_row(&buf, &mut offset).is_err());
    }
}
