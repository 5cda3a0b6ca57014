use tracing::{debug, info, warn};

use crate::atlas::texture_atlas::{AtlasImage, TextureAtlas};
use crate::error::{AtlasError, Result};
use crate::types::{Geometry, IndexedMesh, MapKind, Scene};

/// Shininess given to the material of a batched geometry.
pub const BATCH_SHININESS: f32 = 16.0;

/// Material referencing the packed atlas channels.
#[derive(Debug, Clone)]
pub struct BatchMaterial {
    pub diffuse_map: Option<AtlasImage>,
    pub normal_map: Option<AtlasImage>,
    pub specular_map: Option<AtlasImage>,
    pub shininess: f32,
    pub alpha_test: bool,
}

/// Result of batching a whole scene into one geometry.
#[derive(Debug)]
pub struct AtlasBatch {
    /// All scene geometries merged, UVs pointing into the atlas.
    pub mesh: IndexedMesh,
    pub material: BatchMaterial,
    pub atlas: TextureAtlas,
}

/// Build an atlas holding the diffuse, normal and specular maps of every
/// geometry in `scene`.
///
/// Geometries are visited in order; each one's diffuse map (or color map)
/// is packed on `DiffuseMap`, and its normal and specular maps are drawn at
/// the same tile. A diffuse map whose name already has a tile is not drawn
/// again. The build is all-or-nothing: the first diffuse map that
/// does not fit fails the whole call with [`AtlasError::PackingFailure`].
pub fn create_atlas(scene: &Scene, width: u32, height: u32) -> Result<TextureAtlas> {
    let mut atlas = TextureAtlas::new(width, height);
    let diffuse_channel = MapKind::Diffuse.channel_name();

    for geometry in &scene.geometries {
        let Some(diffuse) = scene.base_texture(geometry) else {
            debug!(geometry = %geometry.name, "Geometry has no diffuse texture, skipping");
            continue;
        };

        // A placed name keeps its pixels: it may be another surface's
        // secondary map sitting on that surface's diffuse tile.
        if atlas.tile(&diffuse.name).is_some() {
            debug!(
                geometry = %geometry.name,
                texture = %diffuse.name,
                "Diffuse already placed"
            );
        } else if !atlas.add_texture(diffuse, diffuse_channel)? {
            return Err(AtlasError::PackingFailure {
                name: diffuse.name.clone(),
                width,
                height,
            });
        }

        for kind in [MapKind::Normal, MapKind::Specular] {
            if let Some(texture) = scene.texture(geometry, kind) {
                atlas.add_texture_at(texture, kind.channel_name(), &diffuse.name)?;
            }
        }
    }

    info!(width, height, tiles = atlas.tile_count(), "Atlas created");

    Ok(atlas)
}

/// Remap the UVs of `geometry` into `out_uvs`, starting at vertex `offset`.
///
/// Returns `Ok(false)` if the geometry's diffuse texture is not in the atlas.
pub fn apply_coords(
    atlas: &TextureAtlas,
    scene: &Scene,
    geometry: &Geometry,
    offset: usize,
    out_uvs: &mut [f32],
) -> Result<bool> {
    if !geometry.mesh.has_uvs() {
        return Err(AtlasError::InvalidInput(format!(
            "geometry {} has no texture coordinates",
            geometry.name
        )));
    }

    let texture = scene.base_texture(geometry).ok_or_else(|| {
        AtlasError::InvalidInput(format!(
            "geometry {} has no diffuse or color texture",
            geometry.name
        ))
    })?;

    atlas.apply_coordinates(&geometry.mesh.uvs, &texture.name, offset, out_uvs)
}

/// Merge every geometry of `scene` into one mesh textured by a
/// `size x size` atlas.
pub fn make_atlas_batch(scene: &Scene, size: u32) -> Result<AtlasBatch> {
    let atlas = create_atlas(scene, size, size)?;
    let mut mesh = merge_geometries(&scene.geometries);

    let mut vertex_offset = 0;
    for geometry in &scene.geometries {
        let vertices = geometry.mesh.vertex_count();
        if geometry.mesh.has_uvs()
            && scene.base_texture(geometry).is_some()
            && !apply_coords(&atlas, scene, geometry, vertex_offset, &mut mesh.uvs)?
        {
            warn!(geometry = %geometry.name, "Texture missing from atlas, UVs left as-is");
        }
        vertex_offset += vertices;
    }

    let material = BatchMaterial {
        diffuse_map: atlas.channel_image(MapKind::Diffuse.channel_name()),
        normal_map: atlas.channel_image(MapKind::Normal.channel_name()),
        specular_map: atlas.channel_image(MapKind::Specular.channel_name()),
        shininess: BATCH_SHININESS,
        alpha_test: true,
    };

    info!(
        geometries = scene.geometries.len(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Scene batched"
    );

    Ok(AtlasBatch {
        mesh,
        material,
        atlas,
    })
}

/// Concatenate meshes, offsetting indices by the running vertex count.
///
/// Normals and UVs are kept only when every mesh has them; a geometry
/// without UVs still reserves zeroed slots so offsets stay aligned.
pub fn merge_geometries(geometries: &[Geometry]) -> IndexedMesh {
    let all_normals = !geometries.is_empty() && geometries.iter().all(|g| g.mesh.has_normals());
    let any_uvs = geometries.iter().any(|g| g.mesh.has_uvs());

    let mut merged = IndexedMesh::default();
    let mut base = 0u32;

    for geometry in geometries {
        let mesh = &geometry.mesh;
        let vertices = mesh.vertex_count();

        merged.positions.extend_from_slice(&mesh.positions);
        if all_normals {
            merged.normals.extend_from_slice(&mesh.normals);
        }
        if any_uvs {
            if mesh.has_uvs() {
                merged.uvs.extend_from_slice(&mesh.uvs);
            } else {
                merged.uvs.resize(merged.uvs.len() + vertices * 2, 0.0);
            }
        }
        merged.indices.extend(mesh.indices.iter().map(|i| i + base));

        base += vertices as u32;
    }

    merged
}
