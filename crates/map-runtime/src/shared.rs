//! A map shared between async tasks, with reconciles serialized per id.
//!
//! Two tasks reconciling the same layer id would otherwise race on
//! add-versus-patch. [`SharedMap::lock_id`] hands out one lock per id, so
//! work for one id runs in acquisition order while other ids proceed
//! independently. The map itself sits behind a second mutex that is only
//! held for the synchronous map calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};
use tracing::trace;

use crate::handle::MapHandle;

/// Held while work for one id is in progress.
pub type IdGuard = OwnedMutexGuard<()>;

#[derive(Default)]
struct KeyedLocks {
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    fn entry(&self, id: &str) -> Arc<Mutex<()>> {
        // A poisoned table is still consistent.
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Drop ids nobody holds or waits on.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Cloneable handle to one map.
pub struct SharedMap<M> {
    map: Arc<Mutex<M>>,
    locks: Arc<KeyedLocks>,
}

impl<M> Clone for SharedMap<M> {
    fn clone(&self) -> Self {
        Self {
            map: Arc::clone(&self.map),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<M: MapHandle> SharedMap<M> {
    pub fn new(map: M) -> Self {
        Self {
            map: Arc::new(Mutex::new(map)),
            locks: Arc::new(KeyedLocks::default()),
        }
    }

    /// Wait for exclusive use of `id`. Hold the guard across every await
    /// that belongs to the same logical reconcile.
    pub async fn lock_id(&self, id: &str) -> IdGuard {
        let lock = self.locks.entry(id);
        let guard = lock.lock_owned().await;
        trace!(id = %id, "Acquired id lock");
        guard
    }

    /// Borrow the map for synchronous calls.
    pub async fn map(&self) -> MutexGuard<'_, M> {
        self.map.lock().await
    }

    /// Run `f` against the map while holding the lock for `id`.
    pub async fn reconcile<R>(&self, id: &str, f: impl FnOnce(&mut M) -> R) -> R {
        let _id_guard = self.lock_id(id).await;
        let mut map = self.map.lock().await;
        f(&mut map)
    }

    /// Number of ids with a live lock entry.
    pub fn tracked_ids(&self) -> usize {
        self.locks.len()
    }
}
