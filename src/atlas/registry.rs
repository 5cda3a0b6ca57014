use std::collections::BTreeMap;

use crate::error::{AtlasError, Result};
use crate::types::Tile;

/// Texture identity -> tile, shared by every channel of an atlas.
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    tiles: BTreeMap<String, Tile>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Tile> {
        self.tiles.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tiles.contains_key(name)
    }

    /// Record `name` at `tile`.
    ///
    /// Re-recording the same tile is a no-op; an identity can never move to
    /// a different tile.
    pub fn assign(&mut self, name: &str, tile: Tile) -> Result<()> {
        match self.tiles.get(name) {
            Some(existing) if *existing == tile => Ok(()),
            Some(existing) => Err(AtlasError::InvalidInput(format!(
                "texture {name} is already placed at {existing:?}"
            ))),
            None => {
                self.tiles.insert(name.to_string(), tile);
                Ok(())
            }
        }
    }

    /// All placements in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Tile)> {
        self.tiles.iter().map(|(name, tile)| (name.as_str(), *tile))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
