//! Resource database shared between the feeders and the TUI.
//!
//! The store is the only place that knows about the lock. Readers receive a
//! [`SnapshotSource`] capability and get whole-resource value copies; they
//! never see a guard.

pub mod feed;
pub mod model;
pub mod scenario;

pub use feed::{DemoFeeder, FeedError, FeederHandle, StateFileFeeder};
pub use model::*;

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

/// Read-only access to resource state.
///
/// Implementations must return snapshots taken under a single lock
/// acquisition so that one resource's sub-tree is internally consistent.
pub trait SnapshotSource {
    /// Names of all known resources, in display order.
    fn resource_names(&self) -> Vec<String>;

    /// By-value copy of one resource, or `None` if it is unknown.
    fn snapshot(&self, name: &str) -> Option<ResourceSnapshot>;
}

#[derive(Debug, Default)]
struct Inner {
    resources: BTreeMap<String, ResourceSnapshot>,
}

/// Process-wide resource database guarded by one reader/writer lock.
///
/// Cloning is cheap and yields another handle to the same data.
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    inner: Arc<RwLock<Inner>>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Poison is ignored: entries are plain values without cross-field invariants.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or replaces a resource.
    pub fn upsert(&self, resource: ResourceSnapshot) {
        let mut inner = self.write();
        debug!(resource = %resource.name, "store upsert");
        inner.resources.insert(resource.name.clone(), resource);
    }

    /// Replaces the whole content of the store in one write.
    pub fn replace_all(&self, resources: Vec<ResourceSnapshot>) {
        let fresh: BTreeMap<_, _> = resources
            .into_iter()
            .map(|r| (r.name.clone(), r))
            .collect();
        let mut inner = self.write();
        inner.resources = fresh;
    }

    /// Applies `f` to the named resource under the write lock.
    ///
    /// Returns `false` if the resource does not exist.
    pub fn update<F>(&self, name: &str, f: F) -> bool
    where
        F: FnOnce(&mut ResourceSnapshot),
    {
        let mut inner = self.write();
        match inner.resources.get_mut(name) {
            Some(res) => {
                f(res);
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, name: &str) -> Option<ResourceSnapshot> {
        self.write().resources.remove(name)
    }

    pub fn len(&self) -> usize {
        self.read().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotSource for ResourceStore {
    fn resource_names(&self) -> Vec<String> {
        self.read().resources.keys().cloned().collect()
    }

    fn snapshot(&self, name: &str) -> Option<ResourceSnapshot> {
        // Guard lives only for this expression.
        self.read().resources.get(name).cloned()
    }
}
