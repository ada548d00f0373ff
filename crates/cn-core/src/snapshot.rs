//! Atomically replaceable read-only data.
//!
//! Datasets are never mutated in place.  A refresh builds a complete new
//! value and swaps the `Arc`; readers that already called
//! [`Snapshot::current`] keep their old `Arc` until they drop it.

use std::sync::{Arc, PoisonError, RwLock};

/// Shared handle to the current version of an immutable value.
pub struct Snapshot<T> {
    current: RwLock<Arc<T>>,
}

impl<T> Snapshot<T> {
    pub fn new(value: T) -> Self {
        Self { current: RwLock::new(Arc::new(value)) }
    }

    /// Clone the `Arc` of the current version.  The lock is held only for
    /// the clone.
    pub fn current(&self) -> Arc<T> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Install a new version and return the previous one.
    pub fn replace(&self, value: T) -> Arc<T> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(value))
    }
}

impl<T: Default> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
