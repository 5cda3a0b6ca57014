pub mod batch;
pub mod canvas;
pub mod export;
pub mod packer;
pub mod pixel;
pub mod registry;
pub mod remap;
pub mod texture_atlas;
pub mod writer;

pub use batch::{AtlasBatch, BatchMaterial, create_atlas, make_atlas_batch};
pub use packer::RectanglePacker;
pub use remap::{UvTransform, remap_uv, transform_coords};
pub use texture_atlas::{AtlasImage, SamplerSettings, TextureAtlas};
