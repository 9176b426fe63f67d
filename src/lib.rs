//! Federated Record Nodes Library
//!
//! This library crate defines the core modules of a federation of
//! record-keeping nodes. It serves as the foundation for the binary
//! executable (`main.rs`), which runs exactly one federation member.
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`directory`**: The static federation map. Knows every member's name
//!   and endpoints, and derives the ordinal that seeds identifier
//!   allocation.
//! - **`records`**: The data plane. Record model, the strided identifier
//!   allocator and the letter-sharded in-memory store.
//! - **`control`**: The inter-node coordination layer. A pipe-delimited
//!   UDP request/response protocol carrying count queries and record
//!   pushes between nodes.
//! - **`transfer`**: The record relocation logic. Runs the push-then-delete
//!   sequence that moves a record to a peer without ever losing it.
//! - **`node`**: The manager-facing surface. The service façade combining
//!   the other subsystems and the HTTP API that exposes it.

pub mod control;
pub mod directory;
pub mod node;
pub mod records;
pub mod transfer;
