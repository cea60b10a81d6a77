//! Asset loaders
//!
//! An [`AssetLoader`] is the `load(path) -> future of handle` primitive the
//! preload orchestrator fires once per path. Format-specific loaders for GLB
//! models and PNG/JPEG textures live next to a plain byte loader and a mock.

pub mod file;
pub mod gltf;
pub mod mock;
pub mod texture;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::handle::AssetHandle;

pub use self::file::FileLoader;
pub use self::gltf::{GlbLoader, GlbModel};
pub use self::mock::MockLoader;
pub use self::texture::{ImageLoader, Texture, TextureFormat};

/// Trait for fetching one asset
///
/// Uses async-trait for dyn compatibility
#[async_trait::async_trait]
pub trait AssetLoader: Send + Sync {
    /// Fetch and decode the asset at `path`
    async fn load(&self, path: &str) -> Result<AssetHandle>;

    /// Short name used in log lines
    fn name(&self) -> &'static str;
}

/// Resolve a registry path (`./models/me.glb`, `/models/me.glb`, `models/me.glb`)
/// against an asset root
pub fn resolve_path(root: &Path, path: &str) -> PathBuf {
    let trimmed = path.trim_start_matches("./").trim_start_matches('/');
    root.join(trimmed)
}

/// Read a whole file, asynchronously when Tokio is available
pub(crate) async fn read_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    #[cfg(feature = "runtime-tokio")]
    {
        tokio::fs::read(path).await
    }
    #[cfg(not(feature = "runtime-tokio"))]
    {
        std::fs::read(path)
    }
}
