pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;
pub mod tile;

pub use material::{MapKind, Material, MaterialLibrary};
pub use mesh::IndexedMesh;
pub use scene::{Geometry, Scene};
pub use texture::{PixelFormat, SourceTexture};
pub use tile::Tile;
