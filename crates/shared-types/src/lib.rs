//! # Shared Types Crate
//!
//! Type aliases and group-role conventions shared by the message fabric
//! (`shared-comm`) and the sorting protocol (`sample-sort`).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary is
//!   defined here, so the fabric and the protocol never drift apart on what
//!   a rank or an element is.
//! - **Coordinator by convention**: rank 0 coordinates pivot aggregation and
//!   result collection. It is a role, not a distinct process type; any
//!   worker could be nominated.

pub mod entities;

pub use entities::*;
