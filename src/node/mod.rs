//! Node Service Module
//!
//! The client-facing side of a federation node: the service façade that
//! managers talk to and the HTTP surface that exposes it.
//!
//! ## Core Concepts
//! - **Manager attribution**: Every mutating call names the manager who
//!   asked for it; the service logs the attribution, it never authenticates.
//! - **Local writes, federated reads**: Creates and edits touch only this
//!   node's store; the count operation fans out over the control plane and
//!   reports the whole federation.
//! - **Boolean boundary**: Edit and transfer reduce their failure detail to
//!   a success flag for clients; the detail itself goes to the log.

pub mod handlers;
pub mod protocol;
pub mod service;

#[cfg(test)]
mod tests;
