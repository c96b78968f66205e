//! # Shared Comm - In-Memory Message Fabric
//!
//! The message-passing runtime the sorting protocol is built on. Workers are
//! tokio tasks; each owns an [`Endpoint`] wired to every peer by in-order,
//! lossless channels. There is no shared mutable state between workers;
//! all coordination goes through the fabric.
//!
//! ## Contract
//!
//! - **Membership**: every endpoint knows its own `rank` and the group size.
//! - **Point-to-point**: [`Endpoint::isend`] issues a non-blocking send and
//!   returns a [`PendingSend`] handle; [`Endpoint::recv`] awaits a message
//!   matched by `(source, tag)`, with wildcard-source matching available.
//! - **Collectives**: gather, broadcast, and elementwise-sum reduction are
//!   built over point-to-point on a reserved tag space.
//! - **Completion discipline**: every issued operation must be confirmed
//!   complete before [`Endpoint::finalize`]; leaked handles are an error,
//!   not a style issue.
//!
//! ## Delivery Guarantees
//!
//! Per directed `(source, destination)` pair, messages arrive reliably and
//! in issue order. Across different sources, arrival order at a destination
//! is unspecified: receivers must match by source and tag, never assume
//! rank-ordered arrival.

pub mod collective;
pub mod endpoint;
pub mod error;
pub mod group;
pub mod message;
pub mod pending;

// Re-export main types
pub use endpoint::Endpoint;
pub use error::CommError;
pub use group::ProcessGroup;
pub use message::{Envelope, Frame, SourceSel};
pub use pending::PendingSend;

/// Tags at or above this value are reserved for collective operations.
/// Application protocols must allocate their tags below it.
pub const COLLECTIVE_TAG_BASE: shared_types::Tag = 0xFF00;
