use std::path::{Path, PathBuf};

use image::DynamicImage;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{AtlasError, Result};
use crate::types::{PixelFormat, SourceTexture};

/// File extensions picked up when scanning an image directory.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Whether `path` looks like an image we can decode.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// List decodable images directly inside `dir`, sorted by file name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_path(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Decode an image file into a `SourceTexture` named `name`.
///
/// 8-bit RGB and RGBA images keep their layout; anything else (grey,
/// 16-bit, float) is expanded to RGBA8.
pub fn decode_image(path: &Path, name: &str) -> Result<SourceTexture> {
    let img = image::open(path).map_err(|e| {
        AtlasError::Input(format!("Failed to decode texture {}: {e}", path.display()))
    })?;

    let (width, height) = (img.width(), img.height());
    let (format, data) = match img {
        DynamicImage::ImageRgb8(buf) => (PixelFormat::Rgb8, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (PixelFormat::Rgba8, buf.into_raw()),
        other => (PixelFormat::Rgba8, other.to_rgba8().into_raw()),
    };

    debug!(
        path = %path.display(),
        width,
        height,
        format = %format,
        "Loaded texture"
    );

    Ok(SourceTexture::new(name, width, height, format, data))
}

/// Decode `(name, path)` pairs on the rayon pool, preserving order.
pub fn decode_all(requests: &[(String, PathBuf)]) -> Result<Vec<SourceTexture>> {
    requests
        .par_iter()
        .map(|(name, path)| decode_image(path, name))
        .collect()
}
