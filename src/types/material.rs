use crate::types::SourceTexture;

/// Texture slots a material may carry, named after the atlas channel each
/// one is packed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    Diffuse,
    Color,
    Normal,
    Specular,
}

impl MapKind {
    /// Atlas channel name for this slot.
    pub fn channel_name(&self) -> &'static str {
        match self {
            MapKind::Diffuse => "DiffuseMap",
            MapKind::Color => "ColorMap",
            MapKind::Normal => "NormalMap",
            MapKind::Specular => "SpecularMap",
        }
    }
}

impl std::fmt::Display for MapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.channel_name())
    }
}

/// Surface material; texture slots index into `MaterialLibrary::textures`.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub diffuse_map: Option<usize>,
    pub color_map: Option<usize>,
    pub normal_map: Option<usize>,
    pub specular_map: Option<usize>,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse_map: None,
            color_map: None,
            normal_map: None,
            specular_map: None,
            shininess: 1.0,
        }
    }
}

impl Material {
    /// Texture index bound to the given slot.
    pub fn map(&self, kind: MapKind) -> Option<usize> {
        match kind {
            MapKind::Diffuse => self.diffuse_map,
            MapKind::Color => self.color_map,
            MapKind::Normal => self.normal_map,
            MapKind::Specular => self.specular_map,
        }
    }

    /// The texture that decides placement: diffuse map, else color map.
    pub fn base_map(&self) -> Option<usize> {
        self.diffuse_map.or(self.color_map)
    }
}

/// Collection of materials and their associated textures.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    pub materials: Vec<Material>,
    pub textures: Vec<SourceTexture>,
}

impl MaterialLibrary {
    /// Resolve a material slot to its texture.
    pub fn texture(&self, material: usize, kind: MapKind) -> Option<&SourceTexture> {
        let idx = self.materials.get(material)?.map(kind)?;
        self.textures.get(idx)
    }
}
