//! Progress subscription
//!
//! A poll-driven, read-only view of the loading store for the loading screen.
//! Each tick re-reads the store snapshot; once `complete` has been seen the
//! subscription stops polling. With Tokio the same loop can publish into a
//! `watch` channel so consumers await changes instead of polling.

use crate::store::{LoadingSnapshot, LoadingStateStore};

/// Poll-refreshed view of loading progress
#[derive(Debug, Clone)]
pub struct ProgressSubscription {
    store: LoadingStateStore,
    current: LoadingSnapshot,
    finished: bool,
}

impl ProgressSubscription {
    pub fn new(store: LoadingStateStore) -> Self {
        let current = store.snapshot();
        Self {
            store,
            finished: current.complete,
            current,
        }
    }

    /// Last observed snapshot
    pub fn current(&self) -> LoadingSnapshot {
        self.current
    }

    pub fn progress(&self) -> u8 {
        self.current.progress
    }

    pub fn low_res_ready(&self) -> bool {
        self.current.low_res_ready
    }

    pub fn high_res_ready(&self) -> bool {
        self.current.high_res_ready
    }

    pub fn complete(&self) -> bool {
        self.current.complete
    }

    /// True once `complete` has been observed; later ticks do nothing
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Re-read the store. Returns whether the view changed.
    pub fn tick(&mut self) -> bool {
        if self.finished {
            return false;
        }

        let next = self.store.snapshot();
        let changed = next != self.current;
        self.current = next;

        if next.complete {
            log::debug!("Loading complete, progress polling stops");
            self.finished = true;
        }
        changed
    }
}

#[cfg(feature = "runtime-tokio")]
impl ProgressSubscription {
    /// Poll every `interval` on the spawner and publish changes.
    ///
    /// The polling task ends once loading completes or every receiver is
    /// dropped, even while progress is stalled. The receiver keeps the last
    /// published snapshot.
    pub fn spawn_polling<S>(
        mut self,
        spawner: &S,
        interval: std::time::Duration,
    ) -> tokio::sync::watch::Receiver<LoadingSnapshot>
    where
        S: crate::runtime::AsyncSpawner,
    {
        let (tx, rx) = tokio::sync::watch::channel(self.current);

        spawner.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            while !self.is_finished() {
                tokio::select! {
                    _ = tx.closed() => {
                        log::debug!("Progress receivers dropped, polling stops");
                        break;
                    }
                    _ = ticker.tick() => {}
                }
                if self.tick() && tx.send(self.current).is_err() {
                    break;
                }
            }
        });

        rx
    }
}
