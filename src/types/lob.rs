//! # Large-Object Handles
//!
//! A result buffer never owns LOB payload bytes directly; rows carry
//! [`LobHandle`]s whose payloads are kept alive by whoever registered them.
//! Handles produced by the storage engine are only valid while the producing
//! statement runs. Before a row is stored in a result buffer, every such
//! handle must be replaced by a session-owned copy
//! ([`Value::materialize`](crate::types::Value::materialize)); the session's
//! temporary-LOB registry then pins the copy for the rest of the session.
//!
//! Cloning a handle shares the payload (`Arc`); equality and hashing are by
//! content, matching SQL comparison semantics for LOB values in result rows.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Ref-counted handle to an out-of-line BLOB/CLOB payload.
#[derive(Clone)]
pub struct LobHandle {
    id: u64,
    data: Arc<[u8]>,
    session_owned: bool,
}

impl LobHandle {
    /// Creates a handle whose payload is owned by the storage engine.
    ///
    /// Engine-owned payloads are only valid while the producing statement
    /// runs; result buffers must materialize them before storing the row.
    pub fn engine_owned(id: u64, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id,
            data: data.into(),
            session_owned: false,
        }
    }

    /// Creates a handle whose payload is already pinned by a session.
    pub fn session_owned(id: u64, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id,
            data: data.into(),
            session_owned: true,
        }
    }

    /// Returns a session-owned copy of this handle's payload.
    pub fn to_session_owned(&self) -> LobHandle {
        LobHandle {
            id: self.id,
            data: Arc::from(&*self.data),
            session_owned: true,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_session_owned(&self) -> bool {
        self.session_owned
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl PartialEq for LobHandle {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for LobHandle {}

impl Hash for LobHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}

impl std::fmt::Debug for LobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LobHandle")
            .field("id", &self.id)
            .field("len", &self.data.len())
            .field("session_owned", &self.session_owned)
            .finish()
    }
}
