//! Record Identity Allocation
//!
//! Hands out identifiers that are unique across the whole federation with no
//! coordination at all: each node starts its sequence at its own ordinal and
//! advances by the federation size, so two nodes can never mint the same
//! number.

use std::sync::atomic::{AtomicU32, Ordering};

use super::types::{RecordId, RecordKind};

/// Lock-free allocator of federation-unique record identifiers.
///
/// Both record kinds draw from the same underlying sequence; the kind only
/// decides the identifier prefix. Sequence numbers are therefore unique
/// across kinds as well, and gaps between consecutive identifiers of one
/// kind are normal.
pub struct RecordIdAllocator {
    next_sequence: AtomicU32,
    stride: u32,
}

impl RecordIdAllocator {
    /// `offset` is this node's ordinal in the federation, `stride` the
    /// federation size.
    pub fn new(offset: u32, stride: u32) -> Self {
        Self {
            next_sequence: AtomicU32::new(offset),
            stride: stride.max(1),
        }
    }

    /// Returns the next identifier for `kind`. Never blocks and never fails;
    /// concurrent callers each get a distinct sequence number.
    pub fn allocate(&self, kind: RecordKind) -> RecordId {
        let sequence = self.next_sequence.fetch_add(self.stride, Ordering::Relaxed);
        RecordId::new(kind, sequence)
    }
}
