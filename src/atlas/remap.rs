use glam::Vec2;

use crate::error::{AtlasError, Result};
use crate::types::Tile;

/// Affine map from a texture's own [0,1] UV space into its atlas tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    /// Tile origin in normalized atlas coordinates.
    pub origin: Vec2,
    /// Tile size in normalized atlas coordinates.
    pub scale: Vec2,
}

impl UvTransform {
    pub fn for_tile(tile: &Tile, atlas_width: u32, atlas_height: u32) -> Self {
        let atlas = Vec2::new(atlas_width as f32, atlas_height as f32);
        Self {
            origin: Vec2::new(tile.x as f32, tile.y as f32) / atlas,
            scale: Vec2::new(tile.width as f32, tile.height as f32) / atlas,
        }
    }

    #[inline]
    pub fn apply(&self, uv: Vec2) -> Vec2 {
        self.origin + uv * self.scale
    }

    /// Remap every UV pair of `input` into `output`, starting at vertex
    /// `offset` of the output buffer.
    ///
    /// `offset` counts UV pairs, not floats, so merged meshes can pass their
    /// running vertex count directly.
    pub fn apply_buffer(&self, input: &[f32], offset: usize, output: &mut [f32]) -> Result<()> {
        let input: &[Vec2] = bytemuck::try_cast_slice(input).map_err(|e| {
            AtlasError::InvalidInput(format!("input UV buffer is not a list of pairs: {e}"))
        })?;
        let output: &mut [Vec2] = bytemuck::try_cast_slice_mut(output).map_err(|e| {
            AtlasError::InvalidInput(format!("output UV buffer is not a list of pairs: {e}"))
        })?;

        let end = offset.checked_add(input.len()).ok_or_else(|| {
            AtlasError::InvalidInput(format!("UV offset {offset} is out of range"))
        })?;
        if end > output.len() {
            return Err(AtlasError::InvalidInput(format!(
                "output UV buffer holds {} pairs, need {end}",
                output.len()
            )));
        }

        for (dst, src) in output[offset..end].iter_mut().zip(input) {
            *dst = self.apply(*src);
        }

        Ok(())
    }
}

/// Map a single UV from texture space into `tile`.
pub fn remap_uv(tile: &Tile, atlas_width: u32, atlas_height: u32, uv: Vec2) -> Vec2 {
    UvTransform::for_tile(tile, atlas_width, atlas_height).apply(uv)
}

/// Remap a flat UV buffer into `tile`, writing at vertex `offset`.
pub fn transform_coords(
    tile: &Tile,
    atlas_width: u32,
    atlas_height: u32,
    input: &[f32],
    offset: usize,
    output: &mut [f32],
) -> Result<()> {
    UvTransform::for_tile(tile, atlas_width, atlas_height).apply_buffer(input, offset, output)
}
