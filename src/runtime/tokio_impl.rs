//! Tokio async runtime implementation

use super::AsyncSpawner;
use std::future::Future;

/// Tokio-based async spawner
///
/// Spawns onto the ambient runtime, or onto a runtime handle captured with
/// [`TokioSpawner::with_handle`] when fetches are issued from outside it.
#[derive(Clone, Debug, Default)]
pub struct TokioSpawner {
    handle: Option<tokio::runtime::Handle>,
}

impl TokioSpawner {
    /// Create a spawner using the current runtime at spawn time
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Create a spawner bound to a specific runtime
    pub fn with_handle(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

impl AsyncSpawner for TokioSpawner {
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Detached: dropping the JoinHandle does not cancel the task.
        match &self.handle {
            Some(handle) => drop(handle.spawn(task)),
            None => drop(tokio::spawn(task)),
        }
    }

    fn runtime_name(&self) -> &'static str {
        "Tokio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_tokio_spawner() {
        let spawner = TokioSpawner::new();
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();

        spawner.spawn(async move {
            ran_clone.store(true, Ordering::SeqCst);
        });

        // Give the task time to run
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_tokio_spawner_with_handle_outside_runtime() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let spawner = TokioSpawner::with_handle(runtime.handle().clone());
        let (tx, rx) = std::sync::mpsc::channel();

        spawner.spawn(async move {
            tx.send(7u8).unwrap();
        });

        assert_eq!(rx.recv_timeout(std::time::Duration::from_secs(1)), Ok(7));
    }

    #[test]
    fn test_tokio_runtime_name() {
        assert_eq!(TokioSpawner::new().runtime_name(), "Tokio");
    }
}
