use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::atlas::writer::{self, RemappedGeometry};
use crate::atlas::{TextureAtlas, batch};
use crate::config::{AtlasConfig, PipelineConfig};
use crate::error::{AtlasError, Result};
use crate::ingestion::{self, IngestionResult};
use crate::types::Scene;

/// Summary of a completed pipeline run.
#[derive(Debug)]
pub struct ProcessingResult {
    pub tile_count: usize,
    pub channel_count: usize,
    pub atlas_width: u32,
    pub atlas_height: u32,
    pub duration: Duration,
}

/// Pipeline orchestrator -- drives ingestion, packing, remapping and output.
pub struct Pipeline;

impl Pipeline {
    /// Run the full atlas pipeline.
    pub fn run(config: &PipelineConfig) -> Result<ProcessingResult> {
        let start = Instant::now();

        info!(input = %config.input.display(), "Starting pipeline");

        if config.atlas.width == 0 || config.atlas.height == 0 {
            return Err(AtlasError::Input(format!(
                "Atlas size must be positive, got {}x{}",
                config.atlas.width, config.atlas.height
            )));
        }

        info!("Stage 1/4: Ingestion");
        let ingestion_result = ingestion::ingest(config)?;
        if ingestion_result.scene.materials.textures.is_empty() {
            return Err(AtlasError::Input("Input holds no textures to pack".into()));
        }

        info!("Stage 2/4: Packing");
        let atlas = Self::pack(&ingestion_result.scene, &config.atlas)?;

        info!("Stage 3/4: Remapping");
        let geometries = Self::remap(&atlas, &ingestion_result.scene)?;

        if config.dry_run {
            print_dry_run_summary(&ingestion_result, &atlas, &geometries);
            return Ok(ProcessingResult {
                tile_count: atlas.tile_count(),
                channel_count: 0,
                atlas_width: atlas.width(),
                atlas_height: atlas.height(),
                duration: start.elapsed(),
            });
        }

        info!("Stage 4/4: Output");
        let channel_count = writer::write_atlas(
            &atlas,
            &geometries,
            config.output_options.format,
            &config.output,
        )?;

        let duration = start.elapsed();
        info!(
            tiles = atlas.tile_count(),
            channels = channel_count,
            elapsed = ?duration,
            "Pipeline complete"
        );

        Ok(ProcessingResult {
            tile_count: atlas.tile_count(),
            channel_count,
            atlas_width: atlas.width(),
            atlas_height: atlas.height(),
            duration,
        })
    }

    /// Build the atlas, growing it on packing failure when allowed.
    fn pack(scene: &Scene, config: &AtlasConfig) -> Result<TextureAtlas> {
        let (mut width, mut height) = (config.width, config.height);

        loop {
            match batch::create_atlas(scene, width, height) {
                Ok(atlas) => return Ok(atlas),
                Err(e) if e.is_packing_failure() && config.grow => {
                    let Some((w, h)) = grown_size(width, height, config.max_size) else {
                        return Err(e);
                    };
                    warn!(
                        from = %format!("{width}x{height}"),
                        to = %format!("{w}x{h}"),
                        "Textures do not fit, growing atlas"
                    );
                    (width, height) = (w, h);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Remap the UVs of every textured geometry into its atlas tile.
    fn remap(atlas: &TextureAtlas, scene: &Scene) -> Result<Vec<RemappedGeometry>> {
        let mut remapped = Vec::new();

        for geometry in &scene.geometries {
            let Some(texture) = scene.base_texture(geometry) else {
                continue;
            };
            if !geometry.mesh.has_uvs() {
                continue;
            }

            let mut uvs = vec![0.0; geometry.mesh.uvs.len()];
            if !batch::apply_coords(atlas, scene, geometry, 0, &mut uvs)? {
                warn!(geometry = %geometry.name, "Texture missing from atlas, UVs not remapped");
                continue;
            }

            remapped.push(RemappedGeometry {
                name: geometry.name.clone(),
                texture: texture.name.clone(),
                uvs,
            });
        }

        info!(geometries = remapped.len(), "UVs remapped");
        Ok(remapped)
    }
}

/// Next atlas size to try: the smaller side doubled, capped at `max_size`.
///
/// Returns `None` once the smaller side cannot grow any further.
pub fn grown_size(width: u32, height: u32, max_size: u32) -> Option<(u32, u32)> {
    let grow = |side: u32| side.saturating_mul(2).min(max_size);

    if width <= height {
        let w = grow(width);
        (w > width).then_some((w, height))
    } else {
        let h = grow(height);
        (h > height).then_some((width, h))
    }
}

/// Print dry-run summary: input stats and the packed layout.
fn print_dry_run_summary(
    ingestion: &IngestionResult,
    atlas: &TextureAtlas,
    geometries: &[RemappedGeometry],
) {
    let stats = &ingestion.stats;
    let atlas_pixels = atlas.width() as u64 * atlas.height() as u64;
    let used: u64 = atlas.tiles().map(|(_, t)| t.area()).sum();

    println!("=== Dry Run Summary ===");
    println!("  Input:      {}", stats.input_kind);
    println!("  Geometries: {}", stats.geometry_count);
    println!("  Vertices:   {}", stats.vertex_count);
    println!("  Textures:   {}", stats.texture_count);
    println!("  Pixels:     {}", stats.total_pixels);
    println!("  Min square: {0}x{0}", stats.min_square_side);
    println!();
    println!("=== Atlas ===");
    println!("  Size:       {}x{}", atlas.width(), atlas.height());
    println!("  Master:     {}", atlas.master_channel().unwrap_or("(none)"));
    println!("  Tiles:      {}", atlas.tile_count());
    if atlas_pixels > 0 {
        println!(
            "  Occupancy:  {:.1}%",
            used as f64 / atlas_pixels as f64 * 100.0
        );
    }
    println!(
        "  Channels:   {}",
        atlas.channel_names().collect::<Vec<_>>().join(", ")
    );
    println!("  Remapped:   {} geometries", geometries.len());
}
