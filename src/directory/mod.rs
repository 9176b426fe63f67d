//! Federation Directory Module
//!
//! Static map of the federation: which nodes exist, where their client and
//! control endpoints live, and which member this process is.
//!
//! ## Core Concepts
//! - **Fixed membership**: The member list is configuration, identical on
//!   every node. There is no discovery and no failure detection.
//! - **Ordinals**: Members are ordered by name; a node's position in that
//!   order seeds its identifier allocator, so every node derives the same
//!   offsets from the same configuration.

pub mod types;
