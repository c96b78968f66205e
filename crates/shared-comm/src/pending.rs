//! # Pending Operations
//!
//! Handles for issued, not-yet-confirmed sends.
//!
//! Each in-flight operation needs a uniquely owned handle until confirmed
//! complete. Handles are never reused across transfers: the issuing side
//! keeps them in a per-phase collection and consumes each exactly once at
//! its wait point.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use shared_types::{Rank, Tag};
use tracing::{trace, warn};
use uuid::Uuid;

use crate::error::CommError;

/// Handle to an outstanding non-blocking send.
///
/// The buffer's ownership moved into the fabric when the send was issued,
/// so the sender cannot race its own payload; the handle exists so delivery
/// failures surface before shutdown. [`PendingSend::wait`] consumes the
/// handle and marks the operation complete on its endpoint.
///
/// Dropping a handle without waiting leaves the operation counted as
/// outstanding, which makes `Endpoint::finalize` fail.
#[must_use = "pending sends must be confirmed complete via wait()"]
#[derive(Debug)]
pub struct PendingSend {
    /// Correlation id for tracing.
    id: Uuid,
    /// Destination rank.
    dest: Rank,
    /// Channel tag.
    tag: Tag,
    /// Delivery outcome, recorded at issue time.
    outcome: Result<(), CommError>,
    /// Outstanding-operation counter of the issuing endpoint.
    outstanding: Arc<AtomicUsize>,
    /// Set once the handle has been consumed by `wait`.
    completed: bool,
}

impl PendingSend {
    pub(crate) fn new(
        dest: Rank,
        tag: Tag,
        outcome: Result<(), CommError>,
        outstanding: Arc<AtomicUsize>,
    ) -> Self {
        outstanding.fetch_add(1, Ordering::Relaxed);
        let id = Uuid::new_v4();
        trace!(%id, dest, tag, "send issued");
        Self {
            id,
            dest,
            tag,
            outcome,
            outstanding,
            completed: false,
        }
    }

    /// Confirm the operation complete and surface its delivery outcome.
    pub fn wait(mut self) -> Result<(), CommError> {
        self.completed = true;
        self.outstanding.fetch_sub(1, Ordering::Relaxed);
        trace!(id = %self.id, dest = self.dest, tag = self.tag, "send confirmed");
        self.outcome.clone()
    }

    /// Destination rank of this send.
    #[must_use]
    pub fn dest(&self) -> Rank {
        self.dest
    }

    /// Channel tag of this send.
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag
    }
}

impl Drop for PendingSend {
    fn drop(&mut self) {
        if !self.completed {
            // The counter is intentionally left elevated: finalize() will
            // report the leak instead of silently absorbing it.
            warn!(
                id = %self.id,
                dest = self.dest,
                tag = self.tag,
                "pending send dropped without completion"
            );
        }
    }
}
