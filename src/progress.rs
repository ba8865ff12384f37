//! Progress snapshots shared between a background batch and the render loop.

use parking_lot::Mutex;
use std::sync::Arc;

/// A single snapshot guarded by one lock.
///
/// The background callback writes through [`update`](Self::update), the
/// foreground reads a copy through [`snapshot`](Self::snapshot). The lock is
/// held only for the closure or the clone, never across I/O.
#[derive(Debug, Default)]
pub struct ProgressStore<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for ProgressStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Default> ProgressStore<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(T::default())),
        }
    }

    /// Mutate the snapshot in place.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> T {
        self.inner.lock().clone()
    }

    pub fn reset(&self) {
        *self.inner.lock() = T::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripforge_common::{RipProgress, RipUpdate};

    #[test]
    fn clones_share_state() {
        let store: ProgressStore<RipProgress> = ProgressStore::new();
        let writer = store.clone();
        writer.update(|p| p.start_item(1, 3, "Ripping title 4"));
        writer.update(|p| {
            p.apply(&RipUpdate::Progress {
                percent: 40.0,
                status: "Progress: 40%".into(),
            })
        });

        let snap = store.snapshot();
        assert_eq!(snap.current_item, 1);
        assert_eq!(snap.total_items, 3);
        assert_eq!(snap.percent, 40.0);
    }

    #[test]
    fn reset_restores_default() {
        let store: ProgressStore<RipProgress> = ProgressStore::new();
        store.update(|p| p.start_item(2, 2, "x"));
        store.reset();
        assert_eq!(store.snapshot(), RipProgress::default());
    }
}
