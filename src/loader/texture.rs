//! Texture loading and decoding

use image::io::Reader as ImageReader;
use image::ImageFormat;
use std::path::PathBuf;

use super::{read_bytes, resolve_path, AssetLoader};
use crate::error::{PreloadError, Result};
use crate::handle::AssetHandle;

/// Represents a decoded texture
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: TextureFormat,
}

/// Supported texture formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

/// Decode JPEG or PNG bytes into RGBA8
pub fn decode_texture(data: &[u8]) -> Result<Texture> {
    let format = image::guess_format(data)?;

    match format {
        ImageFormat::Jpeg | ImageFormat::Png => {}
        _ => {
            return Err(PreloadError::UnsupportedFormat(format!(
                "Only JPG/JPEG and PNG formats are supported, got {:?}",
                format.extensions_str()
            )))
        }
    }

    let img = ImageReader::with_format(std::io::Cursor::new(data), format).decode()?;

    let rgba_img = img.into_rgba8();
    let (width, height) = rgba_img.dimensions();

    Ok(Texture {
        width,
        height,
        data: rgba_img.into_raw(),
        format: TextureFormat::Rgba8,
    })
}

/// Loads and decodes texture files below a root directory
#[derive(Debug, Clone)]
pub struct ImageLoader {
    root: PathBuf,
}

impl ImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl AssetLoader for ImageLoader {
    async fn load(&self, path: &str) -> Result<AssetHandle> {
        let full_path = resolve_path(&self.root, path);
        let data = read_bytes(&full_path)
            .await
            .map_err(|err| PreloadError::load_failed(path, err))?;
        let texture = decode_texture(&data).map_err(|err| PreloadError::load_failed(path, err))?;
        Ok(AssetHandle::new(path, texture))
    }

    fn name(&self) -> &'static str {
        "image"
    }
}
