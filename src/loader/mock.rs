//! Mock loader for testing
//!
//! Succeeds for every path unless told to fail, and records every request so
//! tests can assert which variants were (and were not) fetched.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use super::AssetLoader;
use crate::error::{PreloadError, Result};
use crate::handle::AssetHandle;

/// In-memory loader whose payload is the requested path as a `String`
#[derive(Debug, Clone, Default)]
pub struct MockLoader {
    failing: Arc<Mutex<HashSet<String>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every load of `path` fail
    pub fn fail_on(self, path: impl Into<String>) -> Self {
        self.failing.lock().insert(path.into());
        self
    }

    /// Paths requested so far, in request order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }

    pub fn was_requested(&self, path: &str) -> bool {
        self.requested.lock().iter().any(|p| p == path)
    }

    pub fn request_count(&self) -> usize {
        self.requested.lock().len()
    }
}

#[async_trait::async_trait]
impl AssetLoader for MockLoader {
    async fn load(&self, path: &str) -> Result<AssetHandle> {
        self.requested.lock().push(path.to_string());

        if self.failing.lock().contains(path) {
            return Err(PreloadError::load_failed(path, "mock failure"));
        }
        Ok(AssetHandle::new(path, path.to_string()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_loader_records_requests() {
        let loader = MockLoader::new().fail_on("textures/RoomBaked.jpg");

        let ok = futures::executor::block_on(loader.load("models/me.glb"));
        let failed = futures::executor::block_on(loader.load("textures/RoomBaked.jpg"));

        assert_eq!(ok.unwrap().downcast_ref::<String>().map(String::as_str), Some("models/me.glb"));
        assert!(failed.is_err());
        assert_eq!(loader.request_count(), 2);
        assert!(loader.was_requested("textures/RoomBaked.jpg"));
        assert!(!loader.was_requested("models/Room.glb"));
    }
}
