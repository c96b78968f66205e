//! # Endpoint
//!
//! A worker's connection to the fabric. Each endpoint is exclusively owned
//! by one worker task for its lifetime. Receiving requires `&mut self`, so
//! the type system rules out two tasks draining the same inbox.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use shared_types::{Rank, Tag};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::error::CommError;
use crate::message::{Envelope, Frame, SourceSel};
use crate::pending::PendingSend;

/// One worker's membership in the process group.
///
/// ## Receive Matching
///
/// Completion order of peers' sends is not rank order, so the endpoint
/// matches inbound frames by `(source, tag)`: frames that do not match the
/// current receive are stashed, in arrival order, and offered to later
/// receives first. Per-pair order is preserved because the stash is scanned
/// front to back.
pub struct Endpoint<T> {
    /// This worker's rank.
    rank: Rank,
    /// Senders toward every rank in the group, indexed by rank.
    routes: Vec<mpsc::UnboundedSender<Envelope<T>>>,
    /// Inbound frames from all peers.
    inbox: mpsc::UnboundedReceiver<Envelope<T>>,
    /// Arrived frames not yet claimed by a receive.
    stash: VecDeque<Envelope<T>>,
    /// Operations issued and not yet confirmed complete.
    outstanding: Arc<AtomicUsize>,
}

impl<T> Endpoint<T> {
    pub(crate) fn new(
        rank: Rank,
        routes: Vec<mpsc::UnboundedSender<Envelope<T>>>,
        inbox: mpsc::UnboundedReceiver<Envelope<T>>,
    ) -> Self {
        Self {
            rank,
            routes,
            inbox,
            stash: VecDeque::new(),
            outstanding: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// This worker's rank within the group.
    #[must_use]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Number of workers in the group.
    #[must_use]
    pub fn size(&self) -> usize {
        self.routes.len()
    }

    /// Issue a non-blocking send of `frame` to `dest` on `tag`.
    ///
    /// Never suspends. The frame's buffer moves into the fabric, so the
    /// caller cannot observe a partially delivered payload. The returned
    /// handle must be consumed by [`PendingSend::wait`] before this endpoint
    /// is finalized.
    ///
    /// # Errors
    ///
    /// `UnknownRank` if `dest` is outside the group. Delivery failure is
    /// reported by the handle's `wait`, not here.
    pub fn isend(&self, dest: Rank, tag: Tag, frame: Frame<T>) -> Result<PendingSend, CommError> {
        let Some(route) = self.routes.get(dest) else {
            return Err(CommError::UnknownRank {
                rank: dest,
                size: self.size(),
            });
        };

        let envelope = Envelope {
            source: self.rank,
            tag,
            frame,
        };
        let outcome = route
            .send(envelope)
            .map_err(|_| CommError::ChannelClosed(dest));

        Ok(PendingSend::new(
            dest,
            tag,
            outcome,
            Arc::clone(&self.outstanding),
        ))
    }

    /// Await the next frame matching `source` and `tag`.
    ///
    /// The `.await` here is the wait point of the corresponding non-blocking
    /// receive: a frame must never be read before this returns.
    ///
    /// # Errors
    ///
    /// `UnknownRank` for a selector outside the group; `Disconnected` if
    /// every peer endpoint has been dropped while the receive was pending.
    pub async fn recv(&mut self, source: SourceSel, tag: Tag) -> Result<Envelope<T>, CommError> {
        if let SourceSel::From(rank) = source {
            if rank >= self.size() {
                return Err(CommError::UnknownRank {
                    rank,
                    size: self.size(),
                });
            }
        }

        // Earlier arrivals first.
        if let Some(pos) = self
            .stash
            .iter()
            .position(|envelope| envelope.tag == tag && source.admits(envelope.source))
        {
            if let Some(envelope) = self.stash.remove(pos) {
                return Ok(envelope);
            }
        }

        loop {
            let Some(envelope) = self.inbox.recv().await else {
                return Err(CommError::Disconnected { tag });
            };

            if envelope.tag == tag && source.admits(envelope.source) {
                return Ok(envelope);
            }

            trace!(
                rank = self.rank,
                source = envelope.source,
                tag = envelope.tag,
                "frame stashed for a later receive"
            );
            self.stash.push_back(envelope);
        }
    }

    /// Signal readiness to terminate.
    ///
    /// # Errors
    ///
    /// `PendingOperations` if any issued operation was never confirmed
    /// complete. Leaking an unconfirmed operation is a correctness defect,
    /// and this is where it surfaces.
    pub fn finalize(self) -> Result<(), CommError> {
        let outstanding = self.outstanding.load(Ordering::Relaxed);
        if outstanding != 0 {
            return Err(CommError::PendingOperations { outstanding });
        }

        if !self.stash.is_empty() {
            warn!(
                rank = self.rank,
                unclaimed = self.stash.len(),
                "endpoint finalized with unclaimed frames"
            );
        }

        debug!(rank = self.rank, "endpoint finalized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::ProcessGroup;
    use std::time::Duration;
    use tokio::time::timeout;

    fn pair() -> (Endpoint<i32>, Endpoint<i32>) {
        let mut endpoints = ProcessGroup::new(2).into_endpoints();
        let b = endpoints.pop().expect("endpoint 1");
        let a = endpoints.pop().expect("endpoint 0");
        (a, b)
    }

    #[tokio::test]
    async fn test_send_and_recv() {
        let (a, mut b) = pair();

        a.isend(1, 0, Frame::Data(vec![1, 2, 3]))
            .expect("issue")
            .wait()
            .expect("deliver");

        let envelope = timeout(Duration::from_millis(100), b.recv(SourceSel::From(0), 0))
            .await
            .expect("timeout")
            .expect("recv");
        assert_eq!(envelope.source, 0);
        assert_eq!(envelope.frame, Frame::Data(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_loopback_send() {
        let mut endpoints = ProcessGroup::<i32>::new(1).into_endpoints();
        let mut only = endpoints.pop().expect("endpoint");

        only.isend(0, 5, Frame::Count(9))
            .expect("issue")
            .wait()
            .expect("deliver");

        let envelope = only.recv(SourceSel::Any, 5).await.expect("recv");
        assert_eq!(envelope.frame, Frame::Count(9));
        only.finalize().expect("finalize");
    }

    #[tokio::test]
    async fn test_recv_stashes_other_tags() {
        let (a, mut b) = pair();

        // Arrivals on tag 1 must not satisfy a receive on tag 2.
        a.isend(1, 1, Frame::Count(1)).expect("issue").wait().expect("deliver");
        a.isend(1, 2, Frame::Count(2)).expect("issue").wait().expect("deliver");

        let second = b.recv(SourceSel::Any, 2).await.expect("recv tag 2");
        assert_eq!(second.frame, Frame::Count(2));

        // The stashed tag-1 frame is still claimable.
        let first = b.recv(SourceSel::Any, 1).await.expect("recv tag 1");
        assert_eq!(first.frame, Frame::Count(1));
    }

    #[tokio::test]
    async fn test_recv_by_source_across_interleaving() {
        let mut endpoints = ProcessGroup::<i32>::new(3).into_endpoints();
        let mut c = endpoints.pop().expect("endpoint 2");
        let b = endpoints.pop().expect("endpoint 1");
        let a = endpoints.pop().expect("endpoint 0");

        a.isend(2, 0, Frame::Count(10)).expect("issue").wait().expect("deliver");
        b.isend(2, 0, Frame::Count(20)).expect("issue").wait().expect("deliver");

        // Claim rank 1's frame first even though rank 0's arrived earlier.
        let from_b = c.recv(SourceSel::From(1), 0).await.expect("recv");
        assert_eq!(from_b.frame, Frame::Count(20));
        let from_a = c.recv(SourceSel::From(0), 0).await.expect("recv");
        assert_eq!(from_a.frame, Frame::Count(10));
    }

    #[tokio::test]
    async fn test_isend_unknown_rank() {
        let (a, _b) = pair();
        let err = a.isend(9, 0, Frame::Count(0)).expect_err("out of range");
        assert_eq!(err, CommError::UnknownRank { rank: 9, size: 2 });
    }

    #[tokio::test]
    async fn test_recv_unknown_rank() {
        let (mut a, _b) = pair();
        let err = a
            .recv(SourceSel::From(5), 0)
            .await
            .expect_err("out of range");
        assert_eq!(err, CommError::UnknownRank { rank: 5, size: 2 });
    }

    #[tokio::test]
    async fn test_send_to_dropped_peer_fails_at_wait() {
        let (a, b) = pair();
        drop(b);

        let op = a.isend(1, 0, Frame::Count(1)).expect("issue");
        assert_eq!(op.wait(), Err(CommError::ChannelClosed(1)));
    }

    #[tokio::test]
    async fn test_finalize_clean() {
        let (a, b) = pair();
        a.finalize().expect("finalize a");
        b.finalize().expect("finalize b");
    }

    #[tokio::test]
    async fn test_finalize_reports_leaked_operation() {
        let (a, _b) = pair();

        let op = a.isend(1, 0, Frame::Count(1)).expect("issue");
        drop(op);

        let err = a.finalize().expect_err("leak must surface");
        assert_eq!(err, CommError::PendingOperations { outstanding: 1 });
    }
}
