//! Refetch signalling.
//!
//! Every successful mutation bumps a store-wide revision. Views hold the
//! revision they rendered and refetch the tree once it moves.

use std::time::Duration;

use tokio::sync::watch;

#[derive(Debug)]
pub struct Invalidator {
    tx: watch::Sender<u64>,
}

impl Default for Invalidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Invalidator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    pub fn revision(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Marks everything rendered before this point as stale.
    pub fn invalidate(&self, reason: &str) -> u64 {
        self.tx.send_modify(|revision| *revision += 1);
        let revision = self.revision();
        tracing::debug!("Store revision bumped to {} after {}", revision, reason);
        revision
    }

    /// Waits until the revision moves past `since`, or `timeout` elapses.
    /// Returns the current revision either way.
    pub async fn wait_past(&self, since: u64, timeout: Duration) -> u64 {
        let mut rx = self.tx.subscribe();
        let changed = rx.wait_for(|revision| *revision > since);

        let woken = match tokio::time::timeout(timeout, changed).await {
            Ok(Ok(revision)) => Some(*revision),
            _ => None,
        };
        woken.unwrap_or_else(|| self.revision())
    }
}
