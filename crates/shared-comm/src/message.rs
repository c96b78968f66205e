//! # Wire Messages
//!
//! The frames that travel between endpoints and the selectors receives are
//! matched with.

use serde::{Deserialize, Serialize};
use shared_types::{Rank, Tag};

/// One unit of payload on a tagged channel.
///
/// The size-announcement discipline is expressed at the frame level: a
/// `Count` header always precedes its `Data` payload on a second tag, so a
/// receiver never has to size a buffer blind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frame<T> {
    /// Size announcement for a payload that may follow.
    Count(usize),
    /// Element payload.
    Data(Vec<T>),
    /// Per-pivot counters for elementwise reductions.
    Counts(Vec<u64>),
}

impl<T> Frame<T> {
    /// Short name of the frame kind, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Count(_) => "count",
            Self::Data(_) => "data",
            Self::Counts(_) => "counts",
        }
    }
}

/// A frame in flight, stamped with its origin and channel tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Rank that issued the send.
    pub source: Rank,
    /// Channel tag the frame was sent on.
    pub tag: Tag,
    /// The frame itself.
    pub frame: Frame<T>,
}

/// Source selector for receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceSel {
    /// Match a frame from any rank (wildcard receive).
    Any,
    /// Match only frames from the given rank.
    From(Rank),
}

impl SourceSel {
    /// Whether a frame from `source` satisfies this selector.
    #[must_use]
    pub fn admits(&self, source: Rank) -> bool {
        match self {
            Self::Any => true,
            Self::From(rank) => *rank == source,
        }
    }
}
