use std::fs;
use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::atlas::export;
use crate::atlas::texture_atlas::{SamplerSettings, TextureAtlas};
use crate::config::OutputFormat;
use crate::error::{AtlasError, Result};

/// Name of the layout description written next to the channel images.
pub const REPORT_FILE: &str = "atlas.json";

/// A geometry's UVs after remapping into the atlas.
#[derive(Debug, Clone)]
pub struct RemappedGeometry {
    pub name: String,
    /// Identity of the texture whose tile the UVs point into.
    pub texture: String,
    pub uvs: Vec<f32>,
}

/// Write every channel image plus `atlas.json` into `out_dir`.
///
/// Returns the number of channel images written.
pub fn write_atlas(
    atlas: &TextureAtlas,
    geometries: &[RemappedGeometry],
    format: OutputFormat,
    out_dir: &Path,
) -> Result<usize> {
    fs::create_dir_all(out_dir).map_err(|e| {
        AtlasError::Output(format!("Failed to create {}: {e}", out_dir.display()))
    })?;

    let mut channel_files = Vec::new();
    for channel in atlas.channel_names() {
        let Some(image) = atlas.channel_image(channel) else {
            continue;
        };
        let encoded = export::encode(&image, format)?;
        let file_name = format!("{channel}.{}", format.extension());
        let path = out_dir.join(&file_name);

        fs::write(&path, &encoded.data).map_err(|e| {
            AtlasError::Output(format!("Failed to write {}: {e}", path.display()))
        })?;
        info!(
            channel,
            bytes = encoded.data.len(),
            path = %path.display(),
            "Wrote channel image"
        );

        channel_files.push((channel.to_string(), file_name, encoded.mime_type));
    }

    let report = build_report(atlas, &channel_files, geometries);
    let report_path = out_dir.join(REPORT_FILE);
    let json_string = serde_json::to_string_pretty(&report)
        .map_err(|e| AtlasError::Output(format!("Failed to serialize {REPORT_FILE}: {e}")))?;

    fs::write(&report_path, &json_string)
        .map_err(|e| AtlasError::Output(format!("Failed to write {REPORT_FILE}: {e}")))?;

    info!(
        tiles = atlas.tile_count(),
        path = %report_path.display(),
        "Wrote atlas layout"
    );

    Ok(channel_files.len())
}

/// Build the atlas.json document as a serde_json::Value.
fn build_report(
    atlas: &TextureAtlas,
    channel_files: &[(String, String, String)],
    geometries: &[RemappedGeometry],
) -> serde_json::Value {
    let channels: Vec<serde_json::Value> = channel_files
        .iter()
        .map(|(name, file, mime)| {
            json!({
                "name": name,
                "uri": file,
                "mimeType": mime
            })
        })
        .collect();

    let tiles: serde_json::Map<String, serde_json::Value> = atlas
        .tiles()
        .map(|(name, tile)| (name.to_string(), json!(tile)))
        .collect();

    let geometries: Vec<serde_json::Value> = geometries
        .iter()
        .map(|g| {
            json!({
                "name": g.name,
                "texture": g.texture,
                "uvs": g.uvs
            })
        })
        .collect();

    json!({
        "asset": {
            "generator": "atlas-baker"
        },
        "width": atlas.width(),
        "height": atlas.height(),
        "format": "ABGR8",
        "masterChannel": atlas.master_channel(),
        "sampler": SamplerSettings::default(),
        "channels": channels,
        "tiles": tiles,
        "geometries": geometries
    })
}
