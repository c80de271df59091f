//! Handle-based observer lists.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Identifies one registered observer. Removing by handle is the only way
/// to unregister, so callers keep the handle they were given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

impl ObserverHandle {
    /// Allocate a process-unique handle.
    pub fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }
}

type Callback<T> = Box<dyn FnMut(&T)>;

/// A list of callbacks notified with a value of type `T`.
pub struct Observable<T> {
    observers: Vec<(ObserverHandle, Callback<T>)>,
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
        }
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<T> Observable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, callback: impl FnMut(&T) + 'static) -> ObserverHandle {
        let handle = ObserverHandle::next();
        self.observers.push((handle, Box::new(callback)));
        handle
    }

    /// Remove the observer registered under `handle`. Returns `false` if it
    /// was already gone.
    pub fn remove(&mut self, handle: ObserverHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(h, _)| *h != handle);
        self.observers.len() != before
    }

    pub fn contains(&self, handle: ObserverHandle) -> bool {
        self.observers.iter().any(|(h, _)| *h == handle)
    }

    pub fn notify(&mut self, value: &T) {
        for (_, callback) in &mut self.observers {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }
}
