//! GLB/glTF model loading
//!
//! Parses the document to make sure the variant is usable and keeps the raw
//! bytes for the renderer, which owns the real scene representation.

use std::path::PathBuf;

use super::{read_bytes, resolve_path, AssetLoader};
use crate::error::{PreloadError, Result};
use crate::handle::AssetHandle;

/// Parsed model payload stored behind an [`AssetHandle`]
#[derive(Debug, Clone)]
pub struct GlbModel {
    pub bytes: Vec<u8>,
    pub mesh_count: usize,
    pub node_count: usize,
    pub material_count: usize,
    pub animation_count: usize,
}

/// Parse GLB (or embedded glTF JSON) bytes
pub fn parse_glb_bytes(bytes: Vec<u8>) -> Result<GlbModel> {
    let gltf = gltf::Gltf::from_slice(&bytes)?;
    let document = &gltf.document;

    log::debug!(
        "Parsed model: {} meshes, {} nodes, {} materials, {} animations",
        document.meshes().len(),
        document.nodes().len(),
        document.materials().len(),
        document.animations().len()
    );

    Ok(GlbModel {
        mesh_count: document.meshes().len(),
        node_count: document.nodes().len(),
        material_count: document.materials().len(),
        animation_count: document.animations().len(),
        bytes,
    })
}

/// Loads `.glb` model variants from below a root directory
#[derive(Debug, Clone)]
pub struct GlbLoader {
    root: PathBuf,
}

impl GlbLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl AssetLoader for GlbLoader {
    async fn load(&self, path: &str) -> Result<AssetHandle> {
        let full_path = resolve_path(&self.root, path);
        let bytes = read_bytes(&full_path)
            .await
            .map_err(|err| PreloadError::load_failed(path, err))?;
        let model = parse_glb_bytes(bytes).map_err(|err| PreloadError::load_failed(path, err))?;
        Ok(AssetHandle::new(path, model))
    }

    fn name(&self) -> &'static str {
        "glb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "nodes": [ { "name": "avatar" } ],
        "scenes": [ { "nodes": [0] } ]
    }"#;

    #[test]
    fn test_parse_glb_bytes_empty() {
        let result = parse_glb_bytes(Vec::new());
        assert!(matches!(result, Err(PreloadError::Gltf(_))));
    }

    #[test]
    fn test_parse_minimal_document() {
        let model = parse_glb_bytes(MINIMAL_GLTF.as_bytes().to_vec()).unwrap();
        assert_eq!(model.node_count, 1);
        assert_eq!(model.mesh_count, 0);
        assert_eq!(model.bytes.len(), MINIMAL_GLTF.len());
    }

    #[tokio::test]
    async fn test_glb_loader_wraps_parse_errors() {
        let root = std::env::temp_dir().join(format!("folio-glb-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("models")).unwrap();
        std::fs::write(root.join("models/me.glb"), b"not a model").unwrap();
        std::fs::write(root.join("models/Room.glb"), MINIMAL_GLTF).unwrap();

        let loader = GlbLoader::new(&root);
        let broken = loader.load("models/me.glb").await;
        assert!(matches!(broken, Err(PreloadError::LoadFailed { ref path, .. }) if path == "models/me.glb"));

        let room = loader.load("./models/Room.glb").await.unwrap();
        assert_eq!(room.downcast_ref::<GlbModel>().map(|m| m.node_count), Some(1));

        std::fs::remove_dir_all(root).ok();
    }
}
