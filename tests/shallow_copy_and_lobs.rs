//! # Shallow Copy and LOB Ownership Tests
//!
//! A shallow copy is a second cursor over the same finalized data, owned by
//! a different session. It shares the in-memory row list (or a read-only
//! backend clone) and must yield the identical row sequence. Buffers that
//! materialized LOB handles refuse to copy: a LOB's lifetime is pinned to
//! one session's temp-LOB registry.

use rowspool::result::ResultBuffer;
use rowspool::session::{Database, DatabaseConfig, Session};
use rowspool::sort::SortOrder;
use rowspool::types::{ColumnMeta, DataType, LobHandle, Value};
use smallvec::smallvec;
use tempfile::tempdir;

fn collect_ints(buf: &mut ResultBuffer) -> Vec<i64> {
    buf.reset().unwrap();
    let mut out = Vec::new();
    while buf.next().unwrap() {
        match buf.current_row().unwrap()[0] {
            Value::Int(v) => out.push(v),
            ref other => panic!("expected Int, got {:?}", other),
        }
    }
    out
}

#[test]
fn copy_of_in_memory_result_yields_identical_rows() {
    let session = Session::new(Database::in_memory());
    let columns = vec![ColumnMeta::new("v", DataType::Int8)];
    let mut buf = ResultBuffer::new(session, columns, 1);
    buf.set_sort(SortOrder::ascending(&[0]));
    for v in [3i64, 1, 2] {
        buf.add_row(smallvec![Value::Int(v)]).unwrap();
    }
    buf.done().unwrap();

    let target = Session::new(Database::in_memory());
    let mut copy = buf.shallow_copy(&target).unwrap();

    assert_eq!(collect_ints(&mut copy), vec![1, 2, 3]);
    // both cursors are independent
    assert_eq!(collect_ints(&mut buf), vec![1, 2, 3]);
    assert_eq!(collect_ints(&mut copy), vec![1, 2, 3]);
}

#[test]
fn copy_before_done_is_refused() {
    let session = Session::new(Database::in_memory());
    let columns = vec![ColumnMeta::new("v", DataType::Int8)];
    let mut buf = ResultBuffer::new(session.clone(), columns, 1);
    buf.add_row(smallvec![Value::Int(1)]).unwrap();
    assert!(buf.shallow_copy(&session).is_none());
}

#[test]
fn copy_of_empty_result_is_allowed() {
    let session = Session::new(Database::in_memory());
    let columns = vec![ColumnMeta::new("v", DataType::Int8)];
    let mut buf = ResultBuffer::new(session.clone(), columns, 1);
    buf.done().unwrap();

    let mut copy = buf.shallow_copy(&session).unwrap();
    assert_eq!(copy.row_count(), 0);
    assert!(!copy.next().unwrap());
}

#[test]
fn copy_of_spilled_result_shares_the_backend() {
    let dir = tempdir().unwrap();
    let session = Session::new(Database::new(DatabaseConfig {
        spill_dir: Some(dir.path().to_path_buf()),
        ..DatabaseConfig::default()
    }));
    let columns = vec![ColumnMeta::new("v", DataType::Int8)];
    let mut buf = ResultBuffer::new(session, columns, 1);
    buf.set_max_memory_rows(3);
    for v in 1i64..=10 {
        buf.add_row(smallvec![Value::Int(v)]).unwrap();
    }
    buf.done().unwrap();
    assert!(buf.needs_close());

    let target = Session::new(Database::in_memory());
    let mut copy = buf.shallow_copy(&target).unwrap();

    assert_eq!(collect_ints(&mut copy), (1..=10).collect::<Vec<_>>());
    assert_eq!(collect_ints(&mut buf), (1..=10).collect::<Vec<_>>());

    // one spill file, shared; it survives until both owners release it
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    buf.close();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    copy.close();
    drop(copy);
    drop(buf);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn materialized_lobs_register_with_the_session() {
    let session = Session::new(Database::in_memory());
    let columns = vec![
        ColumnMeta::new("id", DataType::Int8),
        ColumnMeta::new("payload", DataType::Blob),
    ];
    let mut buf = ResultBuffer::new(session.clone(), columns, 2);

    let engine_lob = LobHandle::engine_owned(42, vec![0xAB; 64]);
    buf.add_row(smallvec![Value::Int(1), Value::Lob(engine_lob)])
        .unwrap();
    assert_eq!(session.temporary_lob_count(), 1);

    // already session-owned handles are stored as-is
    let owned_lob = LobHandle::session_owned(43, vec![0xCD; 8]);
    buf.add_row(smallvec![Value::Int(2), Value::Lob(owned_lob)])
        .unwrap();
    assert_eq!(session.temporary_lob_count(), 1);

    buf.done().unwrap();
    buf.next().unwrap();
    match &buf.current_row().unwrap()[1] {
        Value::Lob(handle) => {
            assert!(handle.is_session_owned());
            assert_eq!(handle.bytes(), &[0xAB; 64][..]);
        }
        other => panic!("expected Lob, got {:?}", other),
    }
}

#[test]
fn lob_results_refuse_shallow_copy() {
    let session = Session::new(Database::in_memory());
    let columns = vec![ColumnMeta::new("payload", DataType::Blob)];
    let mut buf = ResultBuffer::new(session.clone(), columns, 1);
    buf.add_row(smallvec![Value::Lob(LobHandle::engine_owned(7, vec![1u8]))])
        .unwrap();
    buf.done().unwrap();

    assert!(buf.shallow_copy(&session).is_none());
}

#[test]
fn lobs_survive_the_spill_roundtrip() {
    let dir = tempdir().unwrap();
    let session = Session::new(Database::new(DatabaseConfig {
        spill_dir: Some(dir.path().to_path_buf()),
        ..DatabaseConfig::default()
    }));
    let columns = vec![ColumnMeta::new("payload", DataType::Blob)];
    let mut buf = ResultBuffer::new(session, columns, 1);
    buf.set_max_memory_rows(2);

    for i in 0u8..6 {
        buf.add_row(smallvec![Value::Lob(LobHandle::engine_owned(
            i as u64,
            vec![i; 16],
        ))])
        .unwrap();
    }
    buf.done().unwrap();

    let mut seen = 0u8;
    while buf.next().unwrap() {
        match &buf.current_row().unwrap()[0] {
            Value::Lob(handle) => {
                assert_eq!(handle.bytes(), &[seen; 16][..]);
                assert!(handle.is_session_owned());
            }
            other => panic!("expected Lob, got {:?}", other),
        }
        seen += 1;
    }
    assert_eq!(seen, 6);
    buf.close();
}
