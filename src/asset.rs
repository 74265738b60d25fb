// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

//! asset provides the AssetSource trait the host implements to hand the
//! renderer shader text and texture pixels by name, plus two ready-made
//! sources: one over the filesystem, one fully in memory.

use crate::error::RenderError;
use std::collections::HashMap;
#[cfg(feature = "image")]
use std::path::{Path, PathBuf};

/// decoded RGBA8 pixels of known size
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// pixels length must be width * height * 4
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RenderError> {
        let expect = width as usize * height as usize * 4;
        if pixels.len() != expect {
            return Err(RenderError::TextureDecode {
                reason: format!(
                    "pixel buffer is {} bytes, {}x{} RGBA8 needs {}",
                    pixels.len(),
                    width,
                    height,
                    expect
                ),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

pub trait AssetSource {
    fn load_text(&self, name: &str) -> Result<String, RenderError>;
    fn load_image_rgba8(&self, name: &str) -> Result<ImageData, RenderError>;
}

/// reads assets under a root directory, decoding images with the image crate
#[cfg(feature = "image")]
pub struct FileAssetSource {
    root: PathBuf,
}

#[cfg(feature = "image")]
impl FileAssetSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

// only a missing file counts as a missing asset, anything else keeps
// the io error text
#[cfg(feature = "image")]
fn read_error(name: &str, e: std::io::Error) -> RenderError {
    if e.kind() == std::io::ErrorKind::NotFound {
        RenderError::AssetNotFound(name.to_string())
    } else {
        RenderError::AssetRead {
            name: name.to_string(),
            reason: e.to_string(),
        }
    }
}

#[cfg(feature = "image")]
impl AssetSource for FileAssetSource {
    fn load_text(&self, name: &str) -> Result<String, RenderError> {
        std::fs::read_to_string(self.root.join(name)).map_err(|e| read_error(name, e))
    }

    fn load_image_rgba8(&self, name: &str) -> Result<ImageData, RenderError> {
        let bytes =
            std::fs::read(self.root.join(name)).map_err(|e| read_error(name, e))?;
        let img = image::load_from_memory(&bytes)
            .map_err(|e| RenderError::TextureDecode {
                reason: e.to_string(),
            })?
            .to_rgba8();
        ImageData::new(img.width(), img.height(), img.into_raw())
    }
}

/// in-memory asset source, for tests and embedded assets
#[derive(Default)]
pub struct MemAssetSource {
    texts: HashMap<String, String>,
    images: HashMap<String, ImageData>,
}

impl MemAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(&mut self, name: &str, text: &str) -> &mut Self {
        self.texts.insert(name.to_string(), text.to_string());
        self
    }

    pub fn add_image(&mut self, name: &str, image: ImageData) -> &mut Self {
        self.images.insert(name.to_string(), image);
        self
    }
}

impl AssetSource for MemAssetSource {
    fn load_text(&self, name: &str) -> Result<String, RenderError> {
        self.texts
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::AssetNotFound(name.to_string()))
    }

    fn load_image_rgba8(&self, name: &str) -> Result<ImageData, RenderError> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::AssetNotFound(name.to_string()))
    }
}
