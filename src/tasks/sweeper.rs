//! Expiration Sweep Task
//!
//! Background task that periodically drains elapsed expiration epochs.

use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// A cache store shared between its handle and the sweeper.
///
/// Every public operation and every sweep tick holds this lock for its whole
/// duration.
pub type SharedStore<K, V> = Arc<Mutex<CacheStore<K, V>>>;

/// Locks the store, recovering the guard if a previous holder panicked.
pub fn lock_store<K, V>(store: &Mutex<CacheStore<K, V>>) -> MutexGuard<'_, CacheStore<K, V>> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Spawns a background task that sweeps the store once per `interval`.
///
/// The task only holds a weak reference, so it ends on its own once the
/// store is dropped. It must be called from within a tokio runtime.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it.
pub fn spawn_sweeper<K, V>(
    store: Weak<Mutex<CacheStore<K, V>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Clone + Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting expiration sweeper with interval of {} ms",
            interval.as_millis()
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(store) = store.upgrade() else {
                info!("Cache dropped, stopping expiration sweeper");
                break;
            };
            let removed = lock_store(&store).sweep();

            if removed > 0 {
                info!("Expiration sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiration sweep: no expired entries found");
            }
        }
    })
}

// == Sweeper Handle ==
/// Owns a running sweeper task and aborts it when stopped or dropped.
#[derive(Debug)]
pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Aborts the sweeper task.
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
