//! Person Records Module
//!
//! Implements the data plane of a federation node: the record model, the
//! collision-free identifier allocator and the sharded in-memory store.
//!
//! ## Core Concepts
//! - **Kinds**: Every record is either a teacher or a student record; the kind
//!   is encoded in the identifier prefix (`TR` / `SR`).
//! - **Allocation**: `RecordIdAllocator` hands out identifiers from a strided
//!   sequence seeded with the node's ordinal, so nodes never collide without
//!   talking to each other.
//! - **Sharding**: `RecordStore` buckets records by the first letter of the
//!   last name; each bucket has its own lock so unrelated writes proceed in
//!   parallel.
//! - **Editing**: Mutable fields are declared in per-kind setter registries;
//!   anything not registered is rejected before any mutation happens.

pub mod allocator;
pub mod fields;
pub mod store;
pub mod types;
