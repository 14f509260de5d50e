//! Loader for standard image formats (PNG, JPEG, BMP, TIFF, WebP).

use std::path::Path;

use image::RgbImage;

use crate::error::Result;

/// Loader for standard image formats.
///
/// Decodes to RGB8; any alpha channel is discarded.
pub struct ImageLoader;

impl ImageLoader {
    /// File extensions accepted (lowercase, without dots).
    pub fn extensions() -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"]
    }

    /// Check common image magic bytes.
    pub fn can_load(data: &[u8]) -> bool {
        if data.len() < 8 {
            return false;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return true;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return true;
        }

        // BMP: 42 4D (BM)
        if data.starts_with(&[0x42, 0x4D]) {
            return true;
        }

        // TIFF: 49 49 2A 00 (little endian) or 4D 4D 00 2A (big endian)
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return true;
        }

        // WebP: RIFF....WEBP
        data.len() >= 12 && data.starts_with(&[0x52, 0x49, 0x46, 0x46]) && &data[8..12] == b"WEBP"
    }

    /// Decode raw file bytes in any format `image` recognizes.
    ///
    /// [`ImageLoader::can_load`] is only a quick sniff for the common
    /// formats; decoding is not limited to it.
    pub fn load(data: &[u8]) -> Result<RgbImage> {
        let img = image::load_from_memory(data)?.to_rgb8();

        log::trace!(
            "ImageLoader: decoded {}x{} image ({} bytes)",
            img.width(),
            img.height(),
            data.len()
        );

        Ok(img)
    }
}

/// Whether `path` has an extension the loader accepts.
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| ImageLoader::extensions().contains(&e.as_str()))
}

/// Decode an image held in memory.
pub fn load_image_from_bytes(data: &[u8]) -> Result<RgbImage> {
    ImageLoader::load(data)
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let data = std::fs::read(path)?;
    let img = ImageLoader::load(&data)?;
    log::debug!("Loaded {:?} ({}x{})", path, img.width(), img.height());
    Ok(img)
}

/// Encode an image; the format follows the file extension.
pub fn save_image(path: &Path, img: &RgbImage) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    img.save(path)?;
    log::debug!("Saved {:?}", path);
    Ok(())
}
