use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::atlas::texture_atlas::AtlasImage;
use crate::config::OutputFormat;
use crate::error::{AtlasError, Result};

/// An encoded channel image ready to be written out.
#[derive(Debug, Clone)]
pub struct EncodedTexture {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

/// Turn an atlas channel (A, B, G, R bytes) back into an RGBA image.
pub fn to_rgba_image(image: &AtlasImage) -> Result<RgbaImage> {
    let rgba: Vec<u8> = image
        .data
        .chunks_exact(4)
        .flat_map(|abgr| [abgr[3], abgr[2], abgr[1], abgr[0]])
        .collect();

    RgbaImage::from_raw(image.width, image.height, rgba).ok_or_else(|| {
        AtlasError::Output(format!(
            "channel buffer of {} bytes does not match {}x{}",
            image.data.len(),
            image.width,
            image.height
        ))
    })
}

/// Encode an atlas channel in the requested output format.
pub fn encode(image: &AtlasImage, format: OutputFormat) -> Result<EncodedTexture> {
    let rgba = to_rgba_image(image)?;

    let (image_format, mime_type) = match format {
        OutputFormat::Png => (ImageFormat::Png, "image/png"),
        OutputFormat::WebP => (ImageFormat::WebP, "image/webp"),
    };

    let mut buf = Cursor::new(Vec::new());
    rgba.write_to(&mut buf, image_format)
        .map_err(|e| AtlasError::Output(format!("{format} encoding failed: {e}")))?;

    Ok(EncodedTexture {
        data: buf.into_inner(),
        mime_type: mime_type.into(),
        width: image.width,
        height: image.height,
    })
}
