//! Record Transfer Module
//!
//! Moves a single record from this node to a peer through the control
//! plane, as a push followed by a local delete.
//!
//! ## Core Concepts
//! - **Push first**: The record is copied to the destination and only
//!   deleted locally once the destination has echoed its identifier back.
//!   A failed push therefore leaves the record where it was; a failed
//!   delete can at worst leave two copies, never zero.
//! - **Pinned shard**: The record's shard lock is held for the whole
//!   round trip, so no local edit can slip in between the copy and the
//!   delete.

pub mod coordinator;

#[cfg(test)]
mod tests;
