use crate::error::{AtlasError, Result};
use crate::types::{PixelFormat, SourceTexture};

/// Bytes per pixel of the atlas layout (A, B, G, R).
pub const ATLAS_BYTES_PER_PIXEL: usize = 4;

/// Alpha written for source layouts that carry none.
///
/// Deliberately 1, not 255: existing atlases were produced this way and
/// consumers depend on the exact bytes.
pub const SYNTHESIZED_ALPHA: u8 = 1;

/// Convert one source pixel into atlas byte order `[a, b, g, r]`.
///
/// Bytes past `format.bytes_per_pixel()` are ignored.
#[inline]
pub fn convert_pixel(format: PixelFormat, src: &[u8]) -> Result<[u8; 4]> {
    if !format.is_convertible() {
        return Err(AtlasError::UnsupportedFormat(format));
    }
    if src.len() < format.bytes_per_pixel() {
        return Err(AtlasError::InvalidInput(format!(
            "{format} pixel needs {} bytes, got {}",
            format.bytes_per_pixel(),
            src.len()
        )));
    }

    match format {
        PixelFormat::Abgr8 => Ok([src[0], src[1], src[2], src[3]]),
        PixelFormat::Bgr8 => Ok([SYNTHESIZED_ALPHA, src[0], src[1], src[2]]),
        PixelFormat::Rgb8 => Ok([SYNTHESIZED_ALPHA, src[2], src[1], src[0]]),
        PixelFormat::Rgba8 => Ok([src[3], src[2], src[1], src[0]]),
        other => Err(AtlasError::UnsupportedFormat(other)),
    }
}

/// Convert a whole texture into tightly packed atlas-layout bytes.
pub fn convert(source: &[u8], width: u32, height: u32, format: PixelFormat) -> Result<Vec<u8>> {
    if !format.is_convertible() {
        return Err(AtlasError::UnsupportedFormat(format));
    }

    let bpp = format.bytes_per_pixel();
    let pixel_count = width as usize * height as usize;
    let needed = pixel_count * bpp;
    if source.len() < needed {
        return Err(AtlasError::InvalidInput(format!(
            "{width}x{height} {format} image needs {needed} bytes, got {}",
            source.len()
        )));
    }

    let mut out = Vec::with_capacity(pixel_count * ATLAS_BYTES_PER_PIXEL);
    for px in source[..needed].chunks_exact(bpp) {
        out.extend_from_slice(&convert_pixel(format, px)?);
    }
    Ok(out)
}

/// Convert a `SourceTexture` into atlas-layout bytes.
pub fn convert_texture(texture: &SourceTexture) -> Result<Vec<u8>> {
    convert(&texture.data, texture.width, texture.height, texture.format)
}
