pub mod image_loader;
pub mod manifest;

use std::path::Path;

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{AtlasError, Result};
use crate::types::{Geometry, Material, Scene};

/// Result of the ingestion stage.
#[derive(Debug)]
pub struct IngestionResult {
    pub scene: Scene,
    pub stats: IngestionStats,
}

/// Statistics about the ingested data.
#[derive(Debug)]
pub struct IngestionStats {
    pub geometry_count: usize,
    /// UV vertices across all geometries.
    pub vertex_count: usize,
    pub texture_count: usize,
    pub total_pixels: u64,
    /// Smallest square side that could hold every texture's area.
    pub min_square_side: u32,
    pub input_kind: String,
}

/// Supported input kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Manifest,
    ImageDirectory,
}

impl InputKind {
    /// Detect the input kind: a directory, or a `.json` manifest
    /// (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(InputKind::ImageDirectory);
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(InputKind::Manifest),
            _ => Err(AtlasError::Input(format!(
                "Unsupported input: .{ext} (expected a .json manifest or an image directory)"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Manifest => "manifest",
            InputKind::ImageDirectory => "image directory",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run the full ingestion stage.
pub fn ingest(config: &PipelineConfig) -> Result<IngestionResult> {
    // 1. Validate input exists
    if !config.input.exists() {
        return Err(AtlasError::Input(format!(
            "Input not found: {}",
            config.input.display()
        )));
    }

    // 2. Detect kind
    let kind = InputKind::from_path(&config.input)?;
    info!(kind = %kind, path = %config.input.display(), "Detected input");

    // 3. Dispatch to loader
    let scene = match kind {
        InputKind::Manifest => manifest::load_manifest(&config.input)?,
        InputKind::ImageDirectory => load_image_directory(&config.input)?,
    };

    // 4. Compute stats
    let stats = compute_stats(&scene, kind);
    debug!(
        geometries = stats.geometry_count,
        vertices = stats.vertex_count,
        textures = stats.texture_count,
        pixels = stats.total_pixels,
        "Ingestion stats"
    );

    Ok(IngestionResult { scene, stats })
}

/// Every image in `dir` becomes one geometry with that image as its
/// diffuse map, named by file name.
pub fn load_image_directory(dir: &Path) -> Result<Scene> {
    let paths = image_loader::list_images(dir)?;
    if paths.is_empty() {
        return Err(AtlasError::Input(format!(
            "No images found in {}",
            dir.display()
        )));
    }

    let requests: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            (name, path)
        })
        .collect();

    let mut scene = Scene::default();
    for (i, (name, _)) in requests.iter().enumerate() {
        scene.materials.materials.push(Material {
            name: name.clone(),
            diffuse_map: Some(i),
            ..Default::default()
        });
        scene.geometries.push(Geometry {
            name: name.clone(),
            material: Some(i),
            ..Default::default()
        });
    }
    scene.materials.textures = image_loader::decode_all(&requests)?;

    Ok(scene)
}

/// Compute summary statistics for an ingested scene.
pub fn compute_stats(scene: &Scene, kind: InputKind) -> IngestionStats {
    let total_pixels: u64 = scene
        .materials
        .textures
        .iter()
        .map(|t| t.width as u64 * t.height as u64)
        .sum();

    IngestionStats {
        geometry_count: scene.geometries.len(),
        vertex_count: scene.total_vertices(),
        texture_count: scene.materials.textures.len(),
        total_pixels,
        min_square_side: (total_pixels as f64).sqrt().ceil() as u32,
        input_kind: kind.to_string(),
    }
}
