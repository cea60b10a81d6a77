use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Tracks what happened to every fetch issued during preloading
#[derive(Debug, Default)]
pub struct LoadMetrics {
    load_times: RwLock<HashMap<String, Duration>>,
    failures: RwLock<HashMap<String, String>>,
    duplicate_completions: AtomicU64,
    unknown_completions: AtomicU64,
}

impl LoadMetrics {
    /// Create a new instance of LoadMetrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record how long a successful fetch took
    pub fn record_load_time(&self, path: String, duration: Duration) {
        self.load_times.write().insert(path, duration);
    }

    /// Record a fetch that errored
    pub fn record_failure(&self, path: String, reason: String) {
        self.failures.write().insert(path, reason);
    }

    pub fn record_duplicate(&self) {
        self.duplicate_completions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unknown(&self) {
        self.unknown_completions.fetch_add(1, Ordering::Relaxed);
    }

    /// Load time for a path, if its fetch succeeded
    pub fn load_time(&self, path: &str) -> Option<Duration> {
        self.load_times.read().get(path).copied()
    }

    pub fn loaded_paths(&self) -> usize {
        self.load_times.read().len()
    }

    /// Failure reason for a path, if its fetch failed
    pub fn failure(&self, path: &str) -> Option<String> {
        self.failures.read().get(path).cloned()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.read().len()
    }

    pub fn duplicate_count(&self) -> u64 {
        self.duplicate_completions.load(Ordering::Relaxed)
    }

    pub fn unknown_count(&self) -> u64 {
        self.unknown_completions.load(Ordering::Relaxed)
    }

    /// Sum of all recorded load times
    pub fn total_load_time(&self) -> Duration {
        self.load_times.read().values().sum()
    }
}

/// A thread-safe wrapper around LoadMetrics
#[derive(Debug, Clone, Default)]
pub struct LoadMetricsHandle(Arc<LoadMetrics>);

impl LoadMetricsHandle {
    /// Create a new metrics handle
    pub fn new() -> Self {
        Self(Arc::new(LoadMetrics::new()))
    }
}

impl std::ops::Deref for LoadMetricsHandle {
    type Target = LoadMetrics;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_shared_between_clones() {
        let metrics = LoadMetricsHandle::new();
        let clone = metrics.clone();

        clone.record_load_time("models/me.glb".into(), Duration::from_millis(40));
        clone.record_failure("textures/RoomBaked.jpg".into(), "404".into());
        clone.record_duplicate();

        assert_eq!(metrics.load_time("models/me.glb"), Some(Duration::from_millis(40)));
        assert_eq!(metrics.failure_count(), 1);
        assert_eq!(metrics.failure("textures/RoomBaked.jpg").as_deref(), Some("404"));
        assert_eq!(metrics.duplicate_count(), 1);
        assert_eq!(metrics.unknown_count(), 0);
    }

    #[test]
    fn test_total_load_time() {
        let metrics = LoadMetrics::new();
        metrics.record_load_time("a".into(), Duration::from_millis(10));
        metrics.record_load_time("b".into(), Duration::from_millis(15));
        assert_eq!(metrics.total_load_time(), Duration::from_millis(25));
        assert_eq!(metrics.loaded_paths(), 2);
    }
}
