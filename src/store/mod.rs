/// In-memory snapshot store
use crate::domain::DashboardSnapshot;
use std::sync::{Arc, PoisonError, RwLock};

/// Holds the latest dashboard snapshot.
///
/// Readers clone the inner `Arc`, so a view stays internally consistent even
/// while a refresh swaps the snapshot underneath it. Starts empty and stays
/// empty until the first successful load.
#[derive(Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<Option<Arc<DashboardSnapshot>>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly built snapshot.
    pub fn replace(&self, snapshot: DashboardSnapshot) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(snapshot));
    }

    /// Current snapshot, `None` while no load has succeeded yet.
    pub fn current(&self) -> Option<Arc<DashboardSnapshot>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
