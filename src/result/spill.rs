//! # File-Backed Spill Storage
//!
//! `FileSpill` is the concrete spill backend: an append-only file of
//! serialized rows with an in-memory slot table, buffered sequential writes,
//! and mmap-based reads.
//!
//! ## Design Goals
//!
//! 1. **Memory bounded**: row payloads live on disk; memory holds one slot
//!    entry per row plus, for distinct buffers, one encoded key per row
//! 2. **Reused buffers**: one serialization buffer for the backend lifetime
//! 3. **Automatic cleanup**: the spill file is removed when the last owner
//!    drops, clones included
//! 4. **Efficient I/O**: sequential `BufWriter` writes, mmap reads
//!
//! ## Distinctness
//!
//! When constructed with a [`KeySpec`], the backend is distinct-aware: it
//! keys rows on the encoded projection (`encoding::key`), discards duplicate
//! inserts, and answers `contains`/`remove_row` from the key index without
//! touching the file. Without a key spec it is a plain append-only row set.
//!
//! ## Lifecycle
//!
//! ```text
//! Building ──reset()──> Sealed ──close()──> Closed
//!   add_row / add_rows     next / clone_read_only
//!   remove_row / contains
//! ```
//!
//! Sealing flushes the writer and maps the file; from then on the backend is
//! scan-only. Scans replay live slots in insertion order, or in comparator
//! order when a sort is installed: slot ids are ordered by their extracted
//! sort keys, so whole rows are never retained in memory. Dead slots (rows
//! removed pre-seal) stay in the file and are skipped.
//!
//! ## Read-Only Clones
//!
//! A sealed backend can produce read-only clones that share the mmap and
//! slot table behind `Arc`s and carry independent scan state. The spill file
//! itself is shared through a guard that deletes it when the last referent
//! drops.

use super::external::SpillBackend;
use super::row_serde::RowSerde;
use super::Row;
use crate::config::{SERIALIZE_BUF_CAPACITY, SPILL_FILE_PREFIX};
use crate::encoding::key::encode_value;
use crate::sort::SortOrder;
use crate::types::Value;
use eyre::{bail, ensure, Result, WrapErr};
use hashbrown::HashMap;
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Which row slice forms the distinct key.
#[derive(Debug, Clone)]
pub enum KeySpec {
    /// The first `n` columns (all-column distinct over the visible prefix).
    Prefix(usize),
    /// An explicit column projection (DISTINCT ON).
    Projection(Vec<usize>),
}

impl KeySpec {
    fn encode(&self, row: &[Value], buf: &mut Vec<u8>) -> Box<[u8]> {
        buf.clear();
        match self {
            KeySpec::Prefix(n) => {
                for value in &row[..(*n).min(row.len())] {
                    encode_value(value, buf);
                }
            }
            KeySpec::Projection(indexes) => {
                for &i in indexes {
                    encode_value(&row[i], buf);
                }
            }
        }
        buf.as_slice().into()
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    offset: u64,
    len: u32,
    live: bool,
}

struct KeyIndex {
    spec: KeySpec,
    map: HashMap<Box<[u8]>, usize>,
    buf: Vec<u8>,
}

enum SpillState {
    Building {
        writer: BufWriter<File>,
        slots: Vec<Slot>,
        len: u64,
    },
    Sealed {
        mmap: Option<Arc<Mmap>>,
        slots: Arc<[Slot]>,
    },
    Closed,
}

struct ScanState {
    order: Vec<usize>,
    pos: usize,
}

/// Deletes the spill file when the last owner (backend or clone) drops.
struct SpillGuard {
    path: PathBuf,
}

impl Drop for SpillGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

pub struct FileSpill {
    guard: Arc<SpillGuard>,
    state: SpillState,
    key_index: Option<KeyIndex>,
    sort: Option<SortOrder>,
    row_count: usize,
    serialize_buf: Vec<u8>,
    scan: Option<ScanState>,
    read_only: bool,
}

impl FileSpill {
    /// Creates a spill backend with a fresh file under `spill_dir`.
    pub fn create(
        spill_dir: &Path,
        key_spec: Option<KeySpec>,
        sort: Option<SortOrder>,
    ) -> Result<Self> {
        fs::create_dir_all(spill_dir)
            .wrap_err_with(|| format!("failed to create spill directory: {:?}", spill_dir))?;
        let path = spill_dir.join(format!("{}_{}.spill", SPILL_FILE_PREFIX, spill_token()));
        let file = File::options()
            .write(true)
            .create_new(true)
            .open(&path)
            .wrap_err_with(|| format!("failed to create spill file: {:?}", path))?;
        debug!(path = %path.display(), keyed = key_spec.is_some(), "created spill backend");

        Ok(Self {
            guard: Arc::new(SpillGuard { path }),
            state: SpillState::Building {
                writer: BufWriter::new(file),
                slots: Vec::new(),
                len: 0,
            },
            key_index: key_spec.map(|spec| KeyIndex {
                spec,
                map: HashMap::new(),
                buf: Vec::new(),
            }),
            sort,
            row_count: 0,
            serialize_buf: Vec::with_capacity(SERIALIZE_BUF_CAPACITY),
            scan: None,
            read_only: false,
        })
    }

    fn append(&mut self, row: &[Value]) -> Result<usize> {
        let SpillState::Building { writer, slots, len } = &mut self.state else {
            bail!("spill backend is sealed for scanning; rows can no longer be added");
        };
        self.serialize_buf.clear();
        RowSerde::serialize_row_into(row, &mut self.serialize_buf);
        writer
            .write_all(&self.serialize_buf)
            .wrap_err("failed to write row to spill file")?;
        slots.push(Slot {
            offset: *len,
            len: self.serialize_buf.len() as u32,
            live: true,
        });
        *len += self.serialize_buf.len() as u64;
        Ok(slots.len() - 1)
    }

    fn seal(&mut self) -> Result<()> {
        if !matches!(self.state, SpillState::Building { .. }) {
            return match self.state {
                SpillState::Sealed { .. } => Ok(()),
                _ => bail!("spill backend is closed"),
            };
        }
        let state = std::mem::replace(&mut self.state, SpillState::Closed);
        let SpillState::Building {
            mut writer,
            slots,
            len,
        } = state
        else {
            bail!("spill backend state changed during seal");
        };
        writer.flush().wrap_err("failed to flush spill file")?;
        drop(writer);
        let mmap = if len == 0 {
            None
        } else {
            let file = File::open(&self.guard.path)
                .wrap_err_with(|| format!("failed to reopen spill file: {:?}", self.guard.path))?;
            Some(Arc::new(
                // Safety: the file is private to this process and no longer written.
                unsafe { Mmap::map(&file) }.wrap_err("failed to mmap spill file")?,
            ))
        };
        self.state = SpillState::Sealed {
            mmap,
            slots: slots.into(),
        };
        Ok(())
    }

    fn read_slot(mmap: &Option<Arc<Mmap>>, slot: Slot) -> Result<Row> {
        let Some(mmap) = mmap else {
            bail!("spill file missing for non-empty backend");
        };
        let start = slot.offset as usize;
        let end = start + slot.len as usize;
        ensure!(end <= mmap.len(), "spill slot out of bounds");
        let mut offset = start;
        RowSerde::deserialize_row(&mmap[..end], &mut offset)
    }
}

impl SpillBackend for FileSpill {
    fn add_row(&mut self, row: &[Value]) -> Result<usize> {
        ensure!(!self.read_only, "read-only spill clone rejects writes");
        let key = match &mut self.key_index {
            Some(index) => {
                let key = index.spec.encode(row, &mut index.buf);
                if index.map.contains_key(&key) {
                    return Ok(self.row_count);
                }
                Some(key)
            }
            None => None,
        };
        let slot_id = self.append(row)?;
        if let (Some(index), Some(key)) = (&mut self.key_index, key) {
            index.map.insert(key, slot_id);
        }
        self.row_count += 1;
        Ok(self.row_count)
    }

    fn add_rows(&mut self, rows: Vec<Row>) -> Result<usize> {
        for row in &rows {
            self.add_row(row)?;
        }
        Ok(self.row_count)
    }

    fn remove_row(&mut self, row: &[Value]) -> Result<usize> {
        ensure!(!self.read_only, "read-only spill clone rejects writes");
        ensure!(
            matches!(self.state, SpillState::Building { .. }),
            "spill backend is sealed; rows can no longer be removed"
        );
        let Some(index) = &mut self.key_index else {
            bail!("spill backend has no distinct index; remove_row is unsupported");
        };
        let key = index.spec.encode(row, &mut index.buf);
        if let Some(slot_id) = index.map.remove(&key) {
            if let SpillState::Building { slots, .. } = &mut self.state {
                slots[slot_id].live = false;
            }
            self.row_count -= 1;
        }
        Ok(self.row_count)
    }

    fn contains(&mut self, row: &[Value]) -> Result<bool> {
        let Some(index) = &mut self.key_index else {
            bail!("spill backend has no distinct index; contains is unsupported");
        };
        let key = index.spec.encode(row, &mut index.buf);
        Ok(index.map.contains_key(&key))
    }

    fn reset(&mut self) -> Result<()> {
        self.seal()?;
        let (mmap, slots) = match &self.state {
            SpillState::Sealed { mmap, slots } => (mmap.clone(), slots.clone()),
            _ => bail!("spill backend is closed"),
        };
        let mut order: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.live)
            .map(|(i, _)| i)
            .collect();
        if let Some(sort) = &self.sort {
            let mut keyed = Vec::with_capacity(order.len());
            for slot_id in order {
                let row = Self::read_slot(&mmap, slots[slot_id])?;
                keyed.push((slot_id, sort.extract_key(&row)));
            }
            // stable: ties keep insertion order
            keyed.sort_by(|a, b| sort.compare_keys(&a.1, &b.1));
            order = keyed.into_iter().map(|(slot_id, _)| slot_id).collect();
        }
        self.scan = Some(ScanState { order, pos: 0 });
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Row>> {
        let slot_id = match self.scan.as_mut() {
            Some(scan) if scan.pos < scan.order.len() => {
                let id = scan.order[scan.pos];
                scan.pos += 1;
                id
            }
            Some(_) => return Ok(None),
            None => bail!("no scan in progress on spill backend; call reset first"),
        };
        let SpillState::Sealed { mmap, slots } = &self.state else {
            bail!("spill backend is not sealed");
        };
        Ok(Some(Self::read_slot(mmap, slots[slot_id])?))
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn close(&mut self) {
        debug!(path = %self.guard.path.display(), "closing spill backend");
        self.scan = None;
        self.key_index = None;
        self.state = SpillState::Closed;
    }

    fn clone_read_only(&self) -> Option<Box<dyn SpillBackend>> {
        let SpillState::Sealed { mmap, slots } = &self.state else {
            return None;
        };
        Some(Box::new(FileSpill {
            guard: self.guard.clone(),
            state: SpillState::Sealed {
                mmap: mmap.clone(),
                slots: slots.clone(),
            },
            key_index: None,
            sort: self.sort.clone(),
            row_count: self.row_count,
            serialize_buf: Vec::new(),
            scan: None,
            read_only: true,
        }))
    }
}

fn spill_token() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{:x}_{:x}_{:x}", std::process::id(), now.as_secs(), seq)
}
