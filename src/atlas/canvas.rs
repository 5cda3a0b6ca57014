use std::collections::BTreeMap;

use crate::atlas::pixel::{self, ATLAS_BYTES_PER_PIXEL};
use crate::error::{AtlasError, Result};
use crate::types::SourceTexture;

/// Per-channel pixel buffers of an atlas, all in A, B, G, R byte order.
#[derive(Debug, Clone)]
pub struct AtlasCanvas {
    width: u32,
    height: u32,
    channels: BTreeMap<String, Vec<u8>>,
}

impl AtlasCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            channels: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Copy `texture` into `channel` with its top-left pixel at `(tile_x, tile_y)`.
    ///
    /// The channel buffer is allocated (zeroed) on first use. Overlap with
    /// other tiles is not checked; placement is the packer's job. Pixels are
    /// converted before the buffer is touched, so a failed conversion leaves
    /// the canvas unchanged.
    pub fn blit(
        &mut self,
        channel: &str,
        texture: &SourceTexture,
        tile_x: u32,
        tile_y: u32,
    ) -> Result<()> {
        if texture.is_empty() {
            return Err(AtlasError::InvalidInput(format!(
                "texture {} has no pixels",
                texture.name
            )));
        }
        if tile_x as u64 + texture.width as u64 > self.width as u64
            || tile_y as u64 + texture.height as u64 > self.height as u64
        {
            return Err(AtlasError::InvalidInput(format!(
                "{}x{} texture {} at ({tile_x}, {tile_y}) exceeds the {}x{} canvas",
                texture.width, texture.height, texture.name, self.width, self.height
            )));
        }

        let converted = pixel::convert_texture(texture)?;

        let atlas_width = self.width as usize;
        let buffer_len = atlas_width * self.height as usize * ATLAS_BYTES_PER_PIXEL;
        let buffer = self
            .channels
            .entry(channel.to_string())
            .or_insert_with(|| vec![0; buffer_len]);

        let row_bytes = texture.width as usize * ATLAS_BYTES_PER_PIXEL;
        for (y_pos, row) in converted.chunks_exact(row_bytes).enumerate() {
            let start =
                (tile_x as usize + (y_pos + tile_y as usize) * atlas_width) * ATLAS_BYTES_PER_PIXEL;
            buffer[start..start + row_bytes].copy_from_slice(row);
        }

        Ok(())
    }

    /// Raw bytes of a channel, if anything was ever drawn into it.
    pub fn channel(&self, name: &str) -> Option<&[u8]> {
        self.channels.get(name).map(Vec::as_slice)
    }

    /// Names of all allocated channels, sorted.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
