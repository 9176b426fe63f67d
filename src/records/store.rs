//! Sharded Record Store
//!
//! In-memory store for one node's records, bucketed by the first letter of
//! the last name. Each bucket is an independently locked list, so writes
//! touching different letters never contend, while the total record count
//! lives in one atomic that is always updated under the owning bucket's
//! lock.
//!
//! ## Access Patterns
//! - **Insert**: locks exactly one bucket.
//! - **Lookup / edit**: walks buckets in key order, locking one at a time.
//! - **Transfer**: [`RecordStore::lock_record`] hands the caller the bucket
//!   lock itself, so the record stays frozen across a network round trip
//!   until [`RecordStore::remove_locked`] or a drop releases it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::fields::{STUDENT_FIELDS, TEACHER_FIELDS};
use super::types::{Record, RecordId};

type Shard = Arc<Mutex<Vec<Record>>>;

/// Outcome of an edit attempt. Callers that only need success collapse this
/// to a bool; the distinction is kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    FieldNotEditable,
    NotFound,
}

/// A record pinned for removal: the shard lock travels with it, so nothing
/// can edit or re-find the record while the holder decides its fate.
/// Dropping it without [`RecordStore::remove_locked`] leaves the record
/// untouched.
pub struct LockedRecord {
    guard: OwnedMutexGuard<Vec<Record>>,
    index: usize,
}

impl LockedRecord {
    pub fn record(&self) -> &Record {
        &self.guard[self.index]
    }
}

/// Letter-sharded in-memory record store.
pub struct RecordStore {
    shards: DashMap<char, Shard>,
    count: AtomicUsize,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
            count: AtomicUsize::new(0),
        }
    }

    fn shard(&self, key: char) -> Shard {
        self.shards
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .value()
            .clone()
    }

    /// Snapshot of shard handles in key order. Multi-shard operations clone
    /// the handles out first so the shard map itself is never held across an
    /// await.
    fn shard_handles(&self) -> Vec<(char, Shard)> {
        let mut handles: Vec<(char, Shard)> = self
            .shards
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        handles.sort_by_key(|(key, _)| *key);
        handles
    }

    /// Appends a record to its shard unconditionally.
    pub async fn insert(&self, record: Record) {
        let shard = self.shard(record.shard_key());
        let mut list = shard.lock().await;
        list.push(record);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Appends a record unless one with the same identifier is already in
    /// its shard. Check and insert happen under the same bucket lock, so a
    /// duplicate delivery and a first delivery cannot both land.
    pub async fn insert_if_absent(&self, record: Record) -> bool {
        let shard = self.shard(record.shard_key());
        let mut list = shard.lock().await;
        if list.iter().any(|existing| existing.id() == record.id()) {
            return false;
        }
        list.push(record);
        self.count.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Returns a copy of the record with the given identifier, if present.
    pub async fn find_by_id(&self, id: RecordId) -> Option<Record> {
        for (_, shard) in self.shard_handles() {
            let list = shard.lock().await;
            if let Some(record) = list.iter().find(|record| record.id() == id) {
                return Some(record.clone());
            }
        }
        None
    }

    /// Applies one field edit through the kind's setter registry. A field
    /// missing from the registry leaves the record exactly as it was.
    pub async fn edit(&self, id: RecordId, field: &str, value: &str) -> EditOutcome {
        for (_, shard) in self.shard_handles() {
            let mut list = shard.lock().await;
            let Some(record) = list.iter_mut().find(|record| record.id() == id) else {
                continue;
            };
            return match record {
                Record::Teacher(teacher) => match TEACHER_FIELDS.get(field) {
                    Some(set) => {
                        set(teacher, value);
                        EditOutcome::Applied
                    }
                    None => EditOutcome::FieldNotEditable,
                },
                Record::Student(student) => match STUDENT_FIELDS.get(field) {
                    Some(set) => {
                        set(student, value);
                        EditOutcome::Applied
                    }
                    None => EditOutcome::FieldNotEditable,
                },
            };
        }
        EditOutcome::NotFound
    }

    /// Locates a record and returns it together with its held shard lock.
    /// The shard stays closed to every other writer until the returned
    /// handle is dropped or consumed by [`RecordStore::remove_locked`].
    pub async fn lock_record(&self, id: RecordId) -> Option<LockedRecord> {
        for (_, shard) in self.shard_handles() {
            let guard = shard.lock_owned().await;
            if let Some(index) = guard.iter().position(|record| record.id() == id) {
                return Some(LockedRecord { guard, index });
            }
        }
        None
    }

    /// Removes the pinned record from its shard and returns it. This is the
    /// only removal path in the store.
    pub fn remove_locked(&self, locked: LockedRecord) -> Record {
        let LockedRecord { mut guard, index } = locked;
        let record = guard.remove(index);
        self.count.fetch_sub(1, Ordering::Relaxed);
        record
    }

    /// Running record count. Reads are lock-free; the counter is maintained
    /// under shard locks by the insert and remove paths.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Number of non-empty letter buckets currently allocated.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Renders every record, grouped by shard in letter order.
    pub async fn render_all(&self) -> String {
        let mut lines = Vec::new();
        for (_, shard) in self.shard_handles() {
            let list = shard.lock().await;
            for record in list.iter() {
                lines.push(record.render());
            }
        }
        lines.join("\n")
    }

    /// Renders the single record with the given identifier, if present.
    pub async fn render_one(&self, id: RecordId) -> Option<String> {
        let record = self.find_by_id(id).await?;
        Some(record.render())
    }
}
