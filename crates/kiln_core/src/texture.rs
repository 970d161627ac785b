//! Decoded image data and caching for image-backed samplers.
//!
//! The tracer never decodes files itself; it receives `ImageData`, a dense
//! row-major byte array with a known channel count. `ImageData::load` and
//! `ImageCache` sit at the boundary and use the `image` crate to decode.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while loading or wrapping image data.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Unsupported channel count: {0} (expected 1 to 4)")]
    UnsupportedChannels(u8),

    #[error("Image is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Pixel data has {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A decoded image.
///
/// Pixels are stored row-major, top row first, `channels` bytes each.
#[derive(Clone, Debug)]
pub struct ImageData {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
    /// Source file path (for debugging)
    path: String,
}

impl ImageData {
    /// Wrap already-decoded pixel data.
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> ImageResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(ImageError::UnsupportedChannels(channels));
        }
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height });
        }
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
            path: "<memory>".to_string(),
        })
    }

    /// Decode an image file into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut data = Self::new(width, height, 4, rgba.into_raw())?;
        data.path = path.to_string_lossy().to_string();
        Ok(data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Pixel at integer coordinates as RGBA, clamped to the image bounds.
    ///
    /// Grey images expand to `(g, g, g)`; a missing alpha channel reads as 255.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let c = self.channels as usize;
        let idx = (y * self.width as usize + x) * c;
        let p = &self.pixels[idx..idx + c];

        match c {
            1 => [p[0], p[0], p[0], 255],
            2 => [p[0], p[0], p[0], p[1]],
            3 => [p[0], p[1], p[2], 255],
            _ => [p[0], p[1], p[2], p[3]],
        }
    }

    /// Reverse the row order in place.
    pub fn flip_vertical(&mut self) {
        let row = self.width as usize * self.channels as usize;
        let height = self.height as usize;
        for y in 0..height / 2 {
            let (top, bottom) = self.pixels.split_at_mut((height - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.pixels.len()
    }
}

/// Cache for decoded images.
///
/// Images are decoded on first request and shared afterwards, so several
/// samplers can point at the same pixels.
pub struct ImageCache {
    /// Cached images by requested path
    images: HashMap<String, Arc<ImageData>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl ImageCache {
    /// Create a new empty image cache.
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create an image cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image from file, using the cache if available.
    pub fn load(&mut self, path: &str) -> ImageResult<Arc<ImageData>> {
        if let Some(image) = self.images.get(path) {
            return Ok(image.clone());
        }

        let full_path = self.resolve_path(path);
        let image = Arc::new(ImageData::load(&full_path)?);
        self.images.insert(path.to_string(), image.clone());

        log::debug!(
            "Loaded image: {} ({}x{}, {:.1} KB)",
            image.path(),
            image.width(),
            image.height(),
            image.size_bytes() as f32 / 1024.0
        );

        Ok(image)
    }

    /// Register already-decoded data under `path`.
    pub fn insert(&mut self, path: impl Into<String>, image: ImageData) -> Arc<ImageData> {
        let image = Arc::new(image);
        self.images.insert(path.into(), image.clone());
        image
    }

    /// Get a cached image without loading.
    pub fn get(&self, path: &str) -> Option<Arc<ImageData>> {
        self.images.get(path).cloned()
    }

    /// Get the number of cached images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}
