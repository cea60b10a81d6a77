//! Raw byte loader, used for assets the core does not decode (FBX clips)

use std::path::PathBuf;

use super::{read_bytes, resolve_path, AssetLoader};
use crate::error::{PreloadError, Result};
use crate::handle::AssetHandle;

/// Loads files below a root directory as `Vec<u8>` payloads
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl AssetLoader for FileLoader {
    async fn load(&self, path: &str) -> Result<AssetHandle> {
        let full_path = resolve_path(&self.root, path);
        let bytes = read_bytes(&full_path)
            .await
            .map_err(|err| PreloadError::load_failed(path, err))?;
        Ok(AssetHandle::new(path, bytes))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
