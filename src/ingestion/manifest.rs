use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AtlasError, Result};
use crate::ingestion::image_loader;
use crate::types::{Geometry, IndexedMesh, Material, Scene};

/// Atlas manifest: which image files go into which channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtlasManifest {
    pub textures: Vec<ManifestEntry>,
}

/// One surface: a base map plus optional secondary maps and UVs.
///
/// Paths are relative to the manifest file and double as texture identities,
/// so two entries naming the same file share one tile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    pub name: Option<String>,
    pub diffuse: Option<String>,
    pub color: Option<String>,
    pub normal: Option<String>,
    pub specular: Option<String>,
    /// Flat [u, v, u, v, ...] pairs in the base map's own UV space.
    #[serde(default)]
    pub uvs: Vec<f32>,
}

impl ManifestEntry {
    fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .or_else(|| self.diffuse.clone())
            .or_else(|| self.color.clone())
            .unwrap_or_else(|| format!("entry_{index}"))
    }
}

/// Parse manifest JSON.
pub fn parse_manifest(json: &str) -> Result<AtlasManifest> {
    serde_json::from_str(json)
        .map_err(|e| AtlasError::Input(format!("Invalid atlas manifest: {e}")))
}

/// Load a manifest and every image it references into a `Scene`.
pub fn load_manifest(path: &Path) -> Result<Scene> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        AtlasError::Input(format!("Failed to read manifest {}: {e}", path.display()))
    })?;
    let manifest = parse_manifest(&json)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    build_scene(&manifest, base_dir)
}

/// Resolve manifest entries into geometries and materials, decoding each
/// distinct image file once.
pub fn build_scene(manifest: &AtlasManifest, base_dir: &Path) -> Result<Scene> {
    let mut scene = Scene::default();
    let mut texture_ids: HashMap<String, usize> = HashMap::new();
    let mut requests: Vec<(String, PathBuf)> = Vec::new();

    let mut intern = |file: &Option<String>| -> Option<usize> {
        let file = file.as_ref()?;
        let next = requests.len();
        let id = *texture_ids.entry(file.clone()).or_insert_with(|| {
            requests.push((file.clone(), base_dir.join(file)));
            next
        });
        Some(id)
    };

    for (i, entry) in manifest.textures.iter().enumerate() {
        let name = entry.display_name(i);

        if entry.uvs.len() % 2 != 0 {
            return Err(AtlasError::Input(format!(
                "Manifest entry {name} has an odd number of UV components"
            )));
        }
        if entry.diffuse.is_none() && entry.color.is_none() {
            warn!(entry = %name, "Manifest entry has no diffuse or color map, skipping");
            continue;
        }

        let material = Material {
            name: name.clone(),
            diffuse_map: intern(&entry.diffuse),
            color_map: intern(&entry.color),
            normal_map: intern(&entry.normal),
            specular_map: intern(&entry.specular),
            ..Default::default()
        };

        scene.geometries.push(Geometry {
            name,
            mesh: IndexedMesh {
                uvs: entry.uvs.clone(),
                ..Default::default()
            },
            material: Some(scene.materials.materials.len()),
        });
        scene.materials.materials.push(material);
    }

    debug!(
        entries = manifest.textures.len(),
        images = requests.len(),
        "Resolved atlas manifest"
    );

    scene.materials.textures = image_loader::decode_all(&requests)?;
    Ok(scene)
}
