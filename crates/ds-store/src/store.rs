//! Shared resource store
//!
//! Holds the current [`StoreState`] snapshot. Only [`ResourceStore::dispatch`]
//! produces new state; readers take `Arc` snapshots or subscribe to the
//! snapshot channel. Events are reduced one at a time, in dispatch order.

use crate::event::StoreEvent;
use crate::reducer::reduce;
use crate::state::StoreState;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Process-wide resource cache
#[derive(Debug)]
pub struct ResourceStore {
    current: Mutex<Arc<StoreState>>,
    publisher: watch::Sender<Arc<StoreState>>,
    dispatched: AtomicU64,
}

impl ResourceStore {
    /// Store with empty state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(StoreState::default())
    }

    /// Store seeded with a snapshot
    #[must_use]
    pub fn with_state(state: StoreState) -> Self {
        let state = Arc::new(state);
        let (publisher, _) = watch::channel(Arc::clone(&state));
        Self {
            current: Mutex::new(state),
            publisher,
            dispatched: AtomicU64::new(0),
        }
    }

    /// Apply an event and publish the next snapshot
    pub fn dispatch(&self, event: impl Into<StoreEvent>) -> Arc<StoreState> {
        let event = event.into();
        let mut current = self.current.lock();

        let next = Arc::new(reduce(&current, &event));
        *current = Arc::clone(&next);
        self.publisher.send_replace(Arc::clone(&next));

        let seq = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(seq, event = event.name(), "store event applied");
        next
    }

    /// Current snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<StoreState> {
        Arc::clone(&self.current.lock())
    }

    /// Receive every published snapshot
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreState>> {
        self.publisher.subscribe()
    }

    /// Number of events applied so far
    #[inline]
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::SeqCst)
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DatasetEvent;
    use crate::resource::Dataset;
    use ds_metadata::Paged;

    #[test]
    fn dispatch_keeps_old_snapshots_intact() {
        let store = ResourceStore::new();
        store.dispatch(DatasetEvent::ReceivedDatasets(Paged::complete(vec![
            Dataset::new("1", "one"),
            Dataset::new("2", "two"),
        ])));
        let before = store.snapshot();

        store.dispatch(DatasetEvent::DeletedDataset(Dataset::new("1", "one")));

        assert_eq!(before.dataset.datasets.len(), 2);
        assert_eq!(store.snapshot().dataset.datasets.len(), 1);
        assert_eq!(store.dispatched(), 2);
    }

    #[tokio::test]
    async fn subscribers_see_latest_snapshot() {
        let store = ResourceStore::new();
        let mut rx = store.subscribe();

        store.dispatch(DatasetEvent::CreatedDataset(Dataset::new("9", "new")));
        rx.changed().await.unwrap();

        let seen = rx.borrow_and_update().clone();
        assert!(seen.dataset.new_dataset.is_some());
    }
}
