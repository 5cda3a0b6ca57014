use serde::Serialize;
use tracing::debug;

use crate::atlas::canvas::AtlasCanvas;
use crate::atlas::packer::RectanglePacker;
use crate::atlas::registry::TileRegistry;
use crate::atlas::remap::UvTransform;
use crate::error::{AtlasError, Result};
use crate::types::{PixelFormat, SourceTexture, Tile};

/// Magnification filter recommended for sampling an atlas channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MagFilter {
    Nearest,
    Bilinear,
}

/// Minification filter recommended for sampling an atlas channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MinFilter {
    NearestNoMipMaps,
    BilinearNoMipMaps,
    NearestNearestMipMap,
    BilinearNearestMipMap,
    Trilinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WrapMode {
    Repeat,
    Clamp,
    EdgeClamp,
}

/// Sampler state that goes with every packed channel image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SamplerSettings {
    pub mag_filter: MagFilter,
    pub min_filter: MinFilter,
    pub wrap: WrapMode,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            mag_filter: MagFilter::Bilinear,
            min_filter: MinFilter::BilinearNearestMipMap,
            wrap: WrapMode::Clamp,
        }
    }
}

/// A finished channel plane of the atlas.
#[derive(Debug, Clone)]
pub struct AtlasImage {
    pub width: u32,
    pub height: u32,
    /// Always `PixelFormat::Abgr8`.
    pub format: PixelFormat,
    pub data: Vec<u8>,
    pub sampler: SamplerSettings,
}

/// Packs source textures into one image per channel.
///
/// The first channel ever added is the master channel: only it may pack new
/// tiles. Other channels place their textures on the tile of a master
/// texture (see [`TextureAtlas::add_texture_at`]).
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    width: u32,
    height: u32,
    packer: RectanglePacker,
    canvas: AtlasCanvas,
    registry: TileRegistry,
    master_channel: Option<String>,
}

impl TextureAtlas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            packer: RectanglePacker::new(width, height),
            canvas: AtlasCanvas::new(width, height),
            registry: TileRegistry::new(),
            master_channel: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The channel that decides the packing layout, once one has been added.
    pub fn master_channel(&self) -> Option<&str> {
        self.master_channel.as_deref()
    }

    /// Add `texture` to `channel`, packing a new tile if it has none yet.
    ///
    /// Returns `Ok(false)` when the texture does not fit in the remaining
    /// space. A texture that is already placed is drawn again into its
    /// existing tile, overwriting whatever `channel` held there.
    pub fn add_texture(&mut self, texture: &SourceTexture, channel: &str) -> Result<bool> {
        self.add(texture, channel, None)
    }

    /// Add `texture` to `channel` on the tile already assigned to `source_name`.
    ///
    /// Used for secondary maps (normal, specular) that must line up with the
    /// master texture; their dimensions must match the tile exactly.
    pub fn add_texture_at(
        &mut self,
        texture: &SourceTexture,
        channel: &str,
        source_name: &str,
    ) -> Result<bool> {
        self.add(texture, channel, Some(source_name))
    }

    fn add(
        &mut self,
        texture: &SourceTexture,
        channel: &str,
        source_name: Option<&str>,
    ) -> Result<bool> {
        validate(texture, channel)?;

        let master = self
            .master_channel
            .get_or_insert_with(|| channel.to_string());
        let is_master = master.as_str() == channel;

        let tile = if let Some(tile) = self.registry.get(&texture.name) {
            check_dimensions(texture, &tile)?;
            debug!(texture = %texture.name, channel, ?tile, "Reusing existing tile");
            tile
        } else if let Some(source_name) = source_name {
            let tile = self
                .registry
                .get(source_name)
                .ok_or_else(|| AtlasError::MissingSourceTile {
                    name: texture.name.clone(),
                    source_name: source_name.to_string(),
                })?;
            check_dimensions(texture, &tile)?;
            tile
        } else if !is_master {
            return Err(AtlasError::NoSourceTexture {
                name: texture.name.clone(),
                channel: channel.to_string(),
            });
        } else {
            match self.packer.pack(texture.width, texture.height) {
                Some(tile) => tile,
                None => {
                    debug!(
                        texture = %texture.name,
                        width = texture.width,
                        height = texture.height,
                        "Texture does not fit into atlas"
                    );
                    return Ok(false);
                }
            }
        };

        self.canvas.blit(channel, texture, tile.x, tile.y)?;
        self.registry.assign(&texture.name, tile)?;

        debug!(
            texture = %texture.name,
            channel,
            x = tile.x,
            y = tile.y,
            width = tile.width,
            height = tile.height,
            "Placed texture"
        );

        Ok(true)
    }

    /// Tile assigned to a texture identity.
    pub fn tile(&self, name: &str) -> Option<Tile> {
        self.registry.get(name)
    }

    /// All placements, ordered by texture identity.
    pub fn tiles(&self) -> impl Iterator<Item = (&str, Tile)> {
        self.registry.iter()
    }

    pub fn tile_count(&self) -> usize {
        self.registry.len()
    }

    /// UV transform for a placed texture.
    pub fn uv_transform(&self, name: &str) -> Option<UvTransform> {
        self.tile(name)
            .map(|tile| UvTransform::for_tile(&tile, self.width, self.height))
    }

    /// The packed image of a channel, or `None` if nothing was drawn into it.
    pub fn channel_image(&self, channel: &str) -> Option<AtlasImage> {
        self.canvas.channel(channel).map(|data| AtlasImage {
            width: self.width,
            height: self.height,
            format: PixelFormat::Abgr8,
            data: data.to_vec(),
            sampler: SamplerSettings::default(),
        })
    }

    /// Names of all channels drawn so far, sorted.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.canvas.channel_names()
    }

    /// Remap a UV buffer into the tile of `texture_name`.
    ///
    /// Writes starting at vertex `offset` of `output` and returns `Ok(false)`
    /// (leaving `output` untouched) if the texture has no tile.
    pub fn apply_coordinates(
        &self,
        input: &[f32],
        texture_name: &str,
        offset: usize,
        output: &mut [f32],
    ) -> Result<bool> {
        let Some(transform) = self.uv_transform(texture_name) else {
            return Ok(false);
        };
        transform.apply_buffer(input, offset, output)?;
        Ok(true)
    }
}

fn validate(texture: &SourceTexture, channel: &str) -> Result<()> {
    if texture.name.is_empty() {
        return Err(AtlasError::InvalidInput("texture has no asset name".into()));
    }
    if channel.is_empty() {
        return Err(AtlasError::InvalidInput(format!(
            "texture {} was added without a channel name",
            texture.name
        )));
    }
    if texture.is_empty() {
        return Err(AtlasError::InvalidInput(format!(
            "texture {} has no pixels",
            texture.name
        )));
    }
    if !texture.format.is_convertible() {
        return Err(AtlasError::UnsupportedFormat(texture.format));
    }
    if texture.data.len() < texture.expected_len() {
        return Err(AtlasError::InvalidInput(format!(
            "texture {} needs {} bytes, got {}",
            texture.name,
            texture.expected_len(),
            texture.data.len()
        )));
    }
    Ok(())
}

fn check_dimensions(texture: &SourceTexture, tile: &Tile) -> Result<()> {
    if (texture.width, texture.height) != tile.dimensions() {
        return Err(AtlasError::DimensionMismatch {
            name: texture.name.clone(),
            expected: tile.dimensions(),
            actual: (texture.width, texture.height),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DIFFUSE: &str = "DiffuseMap";
    const NORMAL: &str = "NormalMap";

    fn rgba(name: &str, w: u32, h: u32, px: [u8; 4]) -> SourceTexture {
        let data = px.iter().copied().cycle().take((w * h * 4) as usize).collect();
        SourceTexture::new(name, w, h, PixelFormat::Rgba8, data)
    }

    fn pixel_at(atlas: &TextureAtlas, channel: &str, x: u32, y: u32) -> [u8; 4] {
        let img = atlas.channel_image(channel).unwrap();
        let i = ((x + y * img.width) * 4) as usize;
        [img.data[i], img.data[i + 1], img.data[i + 2], img.data[i + 3]]
    }

    #[test]
    fn two_quadrants_then_full_size_fails() {
        let mut atlas = TextureAtlas::new(64, 64);
        assert!(atlas.add_texture(&rgba("a", 32, 32, [1; 4]), DIFFUSE).unwrap());
        assert!(atlas.add_texture(&rgba("b", 32, 32, [2; 4]), DIFFUSE).unwrap());

        let a = atlas.tile("a").unwrap();
        let b = atlas.tile("b").unwrap();
        assert_eq!(a.dimensions(), (32, 32));
        assert_eq!(b.dimensions(), (32, 32));
        assert!(!a.intersects(&b));

        assert!(!atlas.add_texture(&rgba("c", 64, 64, [3; 4]), DIFFUSE).unwrap());
        assert_eq!(atlas.tile("c"), None);
        assert_eq!(atlas.tile_count(), 2);
    }

    #[test]
    fn first_channel_becomes_master() {
        let mut atlas = TextureAtlas::new(64, 64);
        assert_eq!(atlas.master_channel(), None);
        atlas.add_texture(&rgba("a", 8, 8, [0; 4]), DIFFUSE).unwrap();
        assert_eq!(atlas.master_channel(), Some(DIFFUSE));
    }

    #[test]
    fn new_texture_on_secondary_channel_needs_source() {
        let mut atlas = TextureAtlas::new(64, 64);
        atlas.add_texture(&rgba("a", 8, 8, [0; 4]), DIFFUSE).unwrap();

        let err = atlas
            .add_texture(&rgba("a_n", 8, 8, [0; 4]), NORMAL)
            .unwrap_err();
        assert!(matches!(err, AtlasError::NoSourceTexture { .. }));
        assert!(atlas.channel_image(NORMAL).is_none());
        assert_eq!(atlas.tile("a_n"), None);
    }

    #[test]
    fn secondary_texture_shares_master_tile() {
        let mut atlas = TextureAtlas::new(64, 64);
        atlas.add_texture(&rgba("x", 16, 16, [9; 4]), DIFFUSE).unwrap();
        atlas.add_texture(&rgba("a", 32, 32, [1; 4]), DIFFUSE).unwrap();
        assert!(atlas
            .add_texture_at(&rgba("a_n", 32, 32, [10, 20, 30, 40]), NORMAL, "a")
            .unwrap());

        let tile = atlas.tile("a").unwrap();
        assert_eq!(atlas.tile("a_n"), Some(tile));
        assert_eq!(pixel_at(&atlas, NORMAL, tile.x, tile.y), [40, 30, 20, 10]);
        // Diffuse plane untouched by the normal map.
        assert_eq!(pixel_at(&atlas, DIFFUSE, tile.x, tile.y), [1, 1, 1, 1]);
    }

    #[test]
    fn secondary_dimension_mismatch_leaves_registry_unchanged() {
        let mut atlas = TextureAtlas::new(64, 64);
        atlas.add_texture(&rgba("a", 32, 32, [1; 4]), DIFFUSE).unwrap();

        let err = atlas
            .add_texture_at(&rgba("a_n", 16, 16, [0; 4]), NORMAL, "a")
            .unwrap_err();
        match err {
            AtlasError::DimensionMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, (32, 32));
                assert_eq!(actual, (16, 16));
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(atlas.tile("a_n"), None);
        assert_eq!(atlas.tile_count(), 1);
        assert!(atlas.channel_image(NORMAL).is_none());
    }

    #[test]
    fn missing_source_tile() {
        let mut atlas = TextureAtlas::new(64, 64);
        atlas.add_texture(&rgba("a", 8, 8, [0; 4]), DIFFUSE).unwrap();
        let err = atlas
            .add_texture_at(&rgba("b_n", 8, 8, [0; 4]), NORMAL, "b")
            .unwrap_err();
        assert!(matches!(err, AtlasError::MissingSourceTile { .. }));
    }

    #[test]
    fn readding_keeps_tile_and_overwrites_pixels() {
        let mut atlas = TextureAtlas::new(64, 64);
        assert!(atlas.add_texture(&rgba("a", 16, 16, [1, 1, 1, 1]), DIFFUSE).unwrap());
        let first = atlas.tile("a").unwrap();
        let nodes_before = atlas.packer.node_count();

        assert!(atlas.add_texture(&rgba("a", 16, 16, [5, 6, 7, 8]), DIFFUSE).unwrap());

        assert_eq!(atlas.tile("a"), Some(first));
        assert_eq!(atlas.packer.node_count(), nodes_before);
        assert_eq!(pixel_at(&atlas, DIFFUSE, first.x, first.y), [8, 7, 6, 5]);
    }

    #[test]
    fn placed_texture_may_be_redrawn_on_other_channel() {
        let mut atlas = TextureAtlas::new(64, 64);
        atlas.add_texture(&rgba("a", 16, 16, [1; 4]), DIFFUSE).unwrap();
        // Same identity, secondary channel: tile already exists, so no
        // source is needed.
        assert!(atlas.add_texture(&rgba("a", 16, 16, [2; 4]), NORMAL).unwrap());
        assert_eq!(pixel_at(&atlas, NORMAL, 0, 0), [2; 4]);
    }

    #[test]
    fn readding_with_other_size_rejected() {
        let mut atlas = TextureAtlas::new(64, 64);
        atlas.add_texture(&rgba("a", 16, 16, [1; 4]), DIFFUSE).unwrap();
        let err = atlas.add_texture(&rgba("a", 32, 32, [1; 4]), DIFFUSE).unwrap_err();
        assert!(matches!(err, AtlasError::DimensionMismatch { .. }));
    }

    #[test]
    fn unsupported_format_leaves_registry_unchanged() {
        let mut atlas = TextureAtlas::new(64, 64);
        let tex = SourceTexture::new("l", 4, 4, PixelFormat::Luminance8, vec![0; 16]);
        let err = atlas.add_texture(&tex, DIFFUSE).unwrap_err();
        assert!(matches!(err, AtlasError::UnsupportedFormat(PixelFormat::Luminance8)));
        assert_eq!(atlas.tile("l"), None);
        assert!(atlas.channel_image(DIFFUSE).is_none());
    }

    #[test]
    fn invalid_input_rejected() {
        let mut atlas = TextureAtlas::new(64, 64);
        let unnamed = rgba("", 4, 4, [0; 4]);
        assert!(matches!(
            atlas.add_texture(&unnamed, DIFFUSE).unwrap_err(),
            AtlasError::InvalidInput(_)
        ));

        let empty = SourceTexture::new("e", 0, 0, PixelFormat::Rgba8, vec![]);
        assert!(matches!(
            atlas.add_texture(&empty, DIFFUSE).unwrap_err(),
            AtlasError::InvalidInput(_)
        ));

        let truncated = SourceTexture::new("t", 4, 4, PixelFormat::Rgb8, vec![0; 10]);
        assert!(matches!(
            atlas.add_texture(&truncated, DIFFUSE).unwrap_err(),
            AtlasError::InvalidInput(_)
        ));

        assert!(matches!(
            atlas.add_texture(&rgba("n", 4, 4, [0; 4]), "").unwrap_err(),
            AtlasError::InvalidInput(_)
        ));
    }

    #[test]
    fn channel_image_metadata() {
        let mut atlas = TextureAtlas::new(32, 16);
        assert!(atlas.channel_image(DIFFUSE).is_none());
        atlas.add_texture(&rgba("a", 8, 8, [0; 4]), DIFFUSE).unwrap();

        let img = atlas.channel_image(DIFFUSE).unwrap();
        assert_eq!((img.width, img.height), (32, 16));
        assert_eq!(img.format, PixelFormat::Abgr8);
        assert_eq!(img.data.len(), 32 * 16 * 4);
        assert_eq!(img.sampler.mag_filter, MagFilter::Bilinear);
        assert_eq!(img.sampler.min_filter, MinFilter::BilinearNearestMipMap);
        assert_eq!(img.sampler.wrap, WrapMode::Clamp);
    }

    #[test]
    fn rgb_source_gets_alpha_one() {
        let mut atlas = TextureAtlas::new(4, 4);
        let tex = SourceTexture::new("rgb", 1, 1, PixelFormat::Rgb8, vec![200, 100, 50]);
        atlas.add_texture(&tex, DIFFUSE).unwrap();
        assert_eq!(pixel_at(&atlas, DIFFUSE, 0, 0), [1, 50, 100, 200]);
    }

    #[test]
    fn apply_coordinates_into_tile() {
        let mut atlas = TextureAtlas::new(256, 256);
        atlas.add_texture(&rgba("left", 64, 64, [0; 4]), DIFFUSE).unwrap();
        atlas.add_texture(&rgba("right", 64, 64, [0; 4]), DIFFUSE).unwrap();
        assert_eq!(atlas.tile("right"), Some(Tile::new(64, 0, 64, 64)));

        let mut out = vec![0.0; 2];
        assert!(atlas.apply_coordinates(&[0.5, 0.5], "right", 0, &mut out).unwrap());
        assert_relative_eq!(out[0], 0.375);
        assert_relative_eq!(out[1], 0.125);
    }

    #[test]
    fn apply_coordinates_unknown_texture() {
        let atlas = TextureAtlas::new(64, 64);
        let mut out = vec![7.0; 2];
        assert!(!atlas.apply_coordinates(&[0.5, 0.5], "nope", 0, &mut out).unwrap());
        assert_eq!(out, vec![7.0, 7.0]);
    }

    #[test]
    fn tiles_listed_in_name_order() {
        let mut atlas = TextureAtlas::new(64, 64);
        atlas.add_texture(&rgba("b", 8, 8, [0; 4]), DIFFUSE).unwrap();
        atlas.add_texture(&rgba("a", 8, 8, [0; 4]), DIFFUSE).unwrap();
        let names: Vec<_> = atlas.tiles().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
        let channels: Vec<_> = atlas.channel_names().collect();
        assert_eq!(channels, vec![DIFFUSE]);
    }
}
