//! Control-Plane Module
//!
//! Implements the UDP request/response channel the federation's nodes use
//! among themselves: count queries during aggregation and record pushes
//! during transfers.
//!
//! ## Core Concepts
//! - **Framing**: One pipe-delimited UTF-8 text frame per datagram, verb
//!   first. Replies are a bare value, with `-1` reserved for failure.
//! - **Listener**: Every node binds one control socket and answers each
//!   inbound frame in its own task.
//! - **Requester**: Outbound exchanges use a fresh ephemeral socket per
//!   attempt, with bounded waits and jittered retries. Retrying is safe
//!   because count queries are reads and pushes apply idempotently.

pub mod client;
pub mod listener;
pub mod protocol;
