//! Mock async spawner for testing
//!
//! Runs tasks synchronously, drops them, or queues them so a test decides
//! when (and in which order) fetches complete.

use super::{AsyncSpawner, BoxFuture};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Spawn behavior for MockSpawner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockSpawnBehavior {
    /// Drop tasks immediately (don't execute)
    Drop,
    /// Block on tasks synchronously as they are spawned
    BlockSync,
    /// Queue tasks until `run_pending` is called
    Deferred,
}

/// Mock async spawner for testing
///
/// Clones share the same deferred queue.
#[derive(Clone)]
pub struct MockSpawner {
    behavior: MockSpawnBehavior,
    queue: Arc<Mutex<VecDeque<BoxFuture<'static, ()>>>>,
}

impl Default for MockSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSpawner {
    /// Create a new mock spawner that drops tasks
    pub fn new() -> Self {
        Self::with_behavior(MockSpawnBehavior::Drop)
    }

    /// Create a mock spawner with specific behavior
    pub fn with_behavior(behavior: MockSpawnBehavior) -> Self {
        Self {
            behavior,
            queue: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Create a mock spawner that runs tasks synchronously
    pub fn blocking() -> Self {
        Self::with_behavior(MockSpawnBehavior::BlockSync)
    }

    /// Create a mock spawner that queues tasks
    pub fn deferred() -> Self {
        Self::with_behavior(MockSpawnBehavior::Deferred)
    }

    pub fn behavior(&self) -> MockSpawnBehavior {
        self.behavior
    }

    /// Number of queued tasks
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run queued tasks in spawn order, returning how many ran
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        // Pop one at a time so the lock is not held while a task runs.
        loop {
            let next = self.queue.lock().pop_front();
            match next {
                Some(task) => {
                    futures::executor::block_on(task);
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Run queued tasks newest first
    pub fn run_pending_reversed(&self) -> usize {
        let tasks: Vec<_> = self.queue.lock().drain(..).rev().collect();
        let ran = tasks.len();
        for task in tasks {
            futures::executor::block_on(task);
        }
        ran
    }

    /// Run only the oldest queued task
    pub fn run_next(&self) -> bool {
        let next = self.queue.lock().pop_front();
        match next {
            Some(task) => {
                futures::executor::block_on(task);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for MockSpawner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSpawner")
            .field("behavior", &self.behavior)
            .field("pending", &self.pending())
            .finish()
    }
}

impl AsyncSpawner for MockSpawner {
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.behavior {
            MockSpawnBehavior::Drop => drop(task),
            MockSpawnBehavior::BlockSync => futures::executor::block_on(task),
            MockSpawnBehavior::Deferred => self.queue.lock().push_back(Box::pin(task)),
        }
    }

    fn runtime_name(&self) -> &'static str {
        "Mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_mock_spawner_drop() {
        let spawner = MockSpawner::new();
        spawner.spawn(async {
            panic!("Should not run");
        });
        assert_eq!(spawner.pending(), 0);
    }

    #[test]
    fn test_mock_spawner_blocking() {
        let spawner = MockSpawner::blocking();
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();

        spawner.spawn(async move {
            ran_clone.store(true, Ordering::SeqCst);
        });

        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_mock_spawner_deferred_order() {
        let spawner = MockSpawner::deferred();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let order = order.clone();
            spawner.spawn(async move {
                order.lock().push(i);
            });
        }
        assert_eq!(spawner.pending(), 3);
        assert!(order.lock().is_empty());

        assert!(spawner.run_next());
        assert_eq!(spawner.run_pending_reversed(), 2);
        assert_eq!(*order.lock(), vec![0, 2, 1]);
        assert_eq!(spawner.run_pending(), 0);
    }

    #[test]
    fn test_mock_spawner_clones_share_queue() {
        let spawner = MockSpawner::deferred();
        let clone = spawner.clone();
        clone.spawn(async {});
        assert_eq!(spawner.pending(), 1);
        assert_eq!(spawner.run_pending(), 1);
    }
}
