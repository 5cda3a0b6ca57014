use crate::types::{IndexedMesh, MapKind, MaterialLibrary, SourceTexture};

/// A named mesh bound to a material.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub name: String,
    pub mesh: IndexedMesh,
    /// Index into `Scene::materials.materials`.
    pub material: Option<usize>,
}

/// Flat list of geometries plus the materials and textures they use.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub geometries: Vec<Geometry>,
    pub materials: MaterialLibrary,
}

impl Scene {
    /// Texture bound to a geometry's material slot.
    pub fn texture(&self, geometry: &Geometry, kind: MapKind) -> Option<&SourceTexture> {
        self.materials.texture(geometry.material?, kind)
    }

    /// The texture deciding a geometry's atlas placement (diffuse, else color).
    pub fn base_texture(&self, geometry: &Geometry) -> Option<&SourceTexture> {
        self.texture(geometry, MapKind::Diffuse)
            .or_else(|| self.texture(geometry, MapKind::Color))
    }

    pub fn total_vertices(&self) -> usize {
        self.geometries.iter().map(|g| g.mesh.vertex_count()).sum()
    }
}
