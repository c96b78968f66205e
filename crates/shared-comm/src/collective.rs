//! # Collective Operations
//!
//! Gather, broadcast, and elementwise-sum reduction, built over the same
//! point-to-point primitives the application uses, on a reserved tag space.
//!
//! Every member of the group must call the same collective; the root is a
//! parameter, not a property of the endpoint, so the group stays symmetric.
//! A member's own contribution never touches the fabric.

use shared_types::{Rank, Tag};
use tracing::trace;

use crate::endpoint::Endpoint;
use crate::error::CommError;
use crate::message::{Frame, SourceSel};
use crate::COLLECTIVE_TAG_BASE;

/// Reserved tag for gather contributions.
pub const TAG_GATHER: Tag = COLLECTIVE_TAG_BASE;
/// Reserved tag for broadcast replicas.
pub const TAG_BROADCAST: Tag = COLLECTIVE_TAG_BASE + 1;
/// Reserved tag for reduction contributions.
pub const TAG_REDUCE: Tag = COLLECTIVE_TAG_BASE + 2;

impl<T: Clone> Endpoint<T> {
    /// Gather one value per member at `root`.
    ///
    /// Returns `Some` with all contributions in rank order at the root,
    /// `None` elsewhere. Non-root members have confirmed their send complete
    /// when this returns.
    ///
    /// # Errors
    ///
    /// Any transport failure, or a malformed contribution at the root.
    pub async fn gather(&mut self, root: Rank, value: T) -> Result<Option<Vec<T>>, CommError> {
        if self.rank() != root {
            self.isend(root, TAG_GATHER, Frame::Data(vec![value]))?
                .wait()?;
            return Ok(None);
        }

        let mut gathered = Vec::with_capacity(self.size());
        for source in 0..self.size() {
            if source == root {
                gathered.push(value.clone());
                continue;
            }

            let envelope = self.recv(SourceSel::From(source), TAG_GATHER).await?;
            match envelope.frame {
                Frame::Data(mut contribution) if contribution.len() == 1 => {
                    if let Some(single) = contribution.pop() {
                        gathered.push(single);
                    }
                }
                other => {
                    return Err(CommError::UnexpectedFrame {
                        tag: TAG_GATHER,
                        expected: "single-element data",
                        got: other.kind(),
                    });
                }
            }
        }

        trace!(root, members = self.size(), "gather complete");
        Ok(Some(gathered))
    }

    /// Replicate `root`'s buffer to every member.
    ///
    /// The root passes `Some(buffer)`, everyone else `None`; all members
    /// return the replicated buffer. A member has the agreed data only once
    /// this returns; using it earlier would be reading an unconfirmed
    /// receive.
    ///
    /// # Errors
    ///
    /// `MissingRootBuffer` if the root supplied no buffer; otherwise any
    /// transport failure.
    pub async fn broadcast(
        &mut self,
        root: Rank,
        buffer: Option<Vec<T>>,
    ) -> Result<Vec<T>, CommError> {
        if self.rank() == root {
            let buffer = buffer.ok_or(CommError::MissingRootBuffer(root))?;

            let mut pending = Vec::with_capacity(self.size().saturating_sub(1));
            for dest in 0..self.size() {
                if dest == root {
                    continue;
                }
                pending.push(self.isend(dest, TAG_BROADCAST, Frame::Data(buffer.clone()))?);
            }
            for operation in pending {
                operation.wait()?;
            }

            trace!(root, members = self.size(), "broadcast complete");
            return Ok(buffer);
        }

        let envelope = self.recv(SourceSel::From(root), TAG_BROADCAST).await?;
        match envelope.frame {
            Frame::Data(replica) => Ok(replica),
            other => Err(CommError::UnexpectedFrame {
                tag: TAG_BROADCAST,
                expected: "data",
                got: other.kind(),
            }),
        }
    }

    /// Elementwise-sum reduction of per-member counters at `root`.
    ///
    /// Every member contributes a counter vector of the same length; the
    /// root returns `Some` with the elementwise totals, everyone else
    /// `None`.
    ///
    /// # Errors
    ///
    /// `ReduceShape` if a contribution's length disagrees with the root's,
    /// otherwise any transport failure.
    pub async fn reduce_sum(
        &mut self,
        root: Rank,
        contribution: Vec<u64>,
    ) -> Result<Option<Vec<u64>>, CommError> {
        if self.rank() != root {
            self.isend(root, TAG_REDUCE, Frame::Counts(contribution))?
                .wait()?;
            return Ok(None);
        }

        let mut totals = contribution;
        for source in 0..self.size() {
            if source == root {
                continue;
            }

            let envelope = self.recv(SourceSel::From(source), TAG_REDUCE).await?;
            let counts = match envelope.frame {
                Frame::Counts(counts) => counts,
                other => {
                    return Err(CommError::UnexpectedFrame {
                        tag: TAG_REDUCE,
                        expected: "counts",
                        got: other.kind(),
                    });
                }
            };

            if counts.len() != totals.len() {
                return Err(CommError::ReduceShape {
                    origin: source,
                    expected: totals.len(),
                    got: counts.len(),
                });
            }
            for (total, count) in totals.iter_mut().zip(counts) {
                *total += count;
            }
        }

        trace!(root, members = self.size(), "reduction complete");
        Ok(Some(totals))
    }
}
