//! # Sample-Sort Test Suite
//!
//! Unified test crate for properties that span crate boundaries:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── pipeline.rs   # End-to-end runs: sortedness, permutation, modes
//!     └── protocol.rs   # Exchange and collection driven with fixed pivots
//! ```
//!
//! Single-crate behavior is tested where it lives; this crate exercises the
//! whole protocol over the real fabric.

pub mod integration;
