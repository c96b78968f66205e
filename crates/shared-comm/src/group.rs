//! # Process Group
//!
//! Wires a fully-connected group of endpoints. Construction is the only
//! place the fabric's channels exist together; after `into_endpoints` each
//! endpoint is moved into its worker task and never shared.

use tokio::sync::mpsc;
use tracing::debug;

use crate::endpoint::Endpoint;

/// A fully-connected in-memory process group.
pub struct ProcessGroup<T> {
    endpoints: Vec<Endpoint<T>>,
}

impl<T> ProcessGroup<T> {
    /// Wire a group of `size` endpoints with ranks `0..size`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let mut routes = Vec::with_capacity(size);
        let mut inboxes = Vec::with_capacity(size);
        for _ in 0..size {
            let (sender, inbox) = mpsc::unbounded_channel();
            routes.push(sender);
            inboxes.push(inbox);
        }

        let endpoints = inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| Endpoint::new(rank, routes.clone(), inbox))
            .collect();

        debug!(size, "process group wired");
        Self { endpoints }
    }

    /// Number of members in the group.
    #[must_use]
    pub fn size(&self) -> usize {
        self.endpoints.len()
    }

    /// Hand out the endpoints, in rank order, for workers to own.
    #[must_use]
    pub fn into_endpoints(self) -> Vec<Endpoint<T>> {
        self.endpoints
    }
}
