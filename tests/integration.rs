//! End-to-end integration tests.
//!
//! These tests create synthetic input images, run the full pipeline,
//! and validate the written channel images and atlas.json.

use std::fs;
use std::path::{Path, PathBuf};

use atlas_baker::config::{AtlasConfig, OutputConfig, OutputFormat, PipelineConfig};
use atlas_baker::{AtlasError, Pipeline};

const BRICK: image::Rgba<u8> = image::Rgba([200, 60, 60, 255]);
const STONE: image::Rgb<u8> = image::Rgb([90, 90, 120]);

/// Write a manifest with three entries to `dir`:
///
/// - `wall`: 32x32 brick diffuse + brick normal map, UVs for a quad
/// - `floor`: 16x16 stone color map (RGB, no alpha), UVs for a quad
/// - `pillar`: reuses the brick diffuse, no UVs
fn write_manifest_input(dir: &Path) -> PathBuf {
    image::RgbaImage::from_pixel(32, 32, BRICK)
        .save(dir.join("brick.png"))
        .unwrap();
    image::RgbaImage::from_pixel(32, 32, image::Rgba([128, 128, 255, 255]))
        .save(dir.join("brick_n.png"))
        .unwrap();
    image::RgbImage::from_pixel(16, 16, STONE)
        .save(dir.join("stone.png"))
        .unwrap();

    let manifest = r#"{
        "textures": [
            {
                "name": "wall",
                "diffuse": "brick.png",
                "normal": "brick_n.png",
                "uvs": [0, 0, 1, 0, 1, 1, 0, 1]
            },
            {
                "name": "floor",
                "color": "stone.png",
                "uvs": [0, 0, 1, 1]
            },
            {
                "name": "pillar",
                "diffuse": "brick.png"
            }
        ]
    }"#;
    let path = dir.join("atlas.json");
    fs::write(&path, manifest).unwrap();
    path
}

fn config_for(input: PathBuf, output: PathBuf, size: u32) -> PipelineConfig {
    PipelineConfig {
        input,
        output,
        atlas: AtlasConfig {
            width: size,
            height: size,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn read_report(output_dir: &Path) -> serde_json::Value {
    let json_str = fs::read_to_string(output_dir.join("atlas.json")).unwrap();
    serde_json::from_str(&json_str).unwrap()
}

#[test]
fn full_pipeline_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("input");
    let output_dir = tmp.path().join("output");
    fs::create_dir_all(&input_dir).unwrap();

    let manifest = write_manifest_input(&input_dir);
    let config = config_for(manifest, output_dir.clone(), 64);

    let result = Pipeline::run(&config).expect("pipeline should succeed");
    assert_eq!(result.tile_count, 3, "brick, brick_n and stone");
    assert_eq!(result.channel_count, 2);
    assert_eq!((result.atlas_width, result.atlas_height), (64, 64));

    assert!(output_dir.join("DiffuseMap.png").exists());
    assert!(output_dir.join("NormalMap.png").exists());
    assert!(!output_dir.join("SpecularMap.png").exists());

    let report = read_report(&output_dir);
    assert_eq!(report["width"], 64);
    assert_eq!(report["height"], 64);
    assert_eq!(report["masterChannel"], "DiffuseMap");
    assert_eq!(report["sampler"]["mag_filter"], "Bilinear");
    assert_eq!(report["channels"].as_array().unwrap().len(), 2);

    // The normal map shares the brick tile.
    assert_eq!(report["tiles"]["brick.png"], report["tiles"]["brick_n.png"]);
    assert_eq!(report["tiles"]["brick.png"]["x"], 0);
    assert_eq!(report["tiles"]["stone.png"]["x"], 32);
    assert_eq!(report["tiles"]["stone.png"]["y"], 0);

    // Pillar has no UVs, so only wall and floor are remapped.
    let geometries = report["geometries"].as_array().unwrap();
    assert_eq!(geometries.len(), 2);
    assert_eq!(geometries[0]["name"], "wall");
    assert_eq!(geometries[0]["uvs"][4], 0.5);
    assert_eq!(geometries[1]["texture"], "stone.png");
    let floor_uvs: Vec<f64> = geometries[1]["uvs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(floor_uvs, vec![0.5, 0.0, 0.75, 0.25]);
}

#[test]
fn channel_pixels_survive_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("input");
    let output_dir = tmp.path().join("output");
    fs::create_dir_all(&input_dir).unwrap();

    let manifest = write_manifest_input(&input_dir);
    Pipeline::run(&config_for(manifest, output_dir.clone(), 64)).unwrap();

    let diffuse = image::open(output_dir.join("DiffuseMap.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(diffuse.dimensions(), (64, 64));
    assert_eq!(diffuse.get_pixel(5, 5), &BRICK);

    // RGB source gets the synthesized alpha of 1.
    let [r, g, b] = STONE.0;
    assert_eq!(diffuse.get_pixel(40, 8), &image::Rgba([r, g, b, 1]));

    // Untouched atlas area stays zeroed.
    assert_eq!(diffuse.get_pixel(63, 63), &image::Rgba([0, 0, 0, 0]));
}

#[test]
fn image_directory_input() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("textures");
    let output_dir = tmp.path().join("output");
    fs::create_dir_all(&input_dir).unwrap();

    image::RgbaImage::new(16, 16).save(input_dir.join("a.png")).unwrap();
    image::RgbImage::new(8, 8).save(input_dir.join("b.png")).unwrap();
    fs::write(input_dir.join("notes.txt"), "not an image").unwrap();

    let result = Pipeline::run(&config_for(input_dir, output_dir.clone(), 32)).unwrap();

    assert_eq!(result.tile_count, 2);
    assert_eq!(result.channel_count, 1);

    let report = read_report(&output_dir);
    assert!(report["tiles"]["a.png"].is_object());
    assert!(report["tiles"]["b.png"].is_object());
    assert!(report["geometries"].as_array().unwrap().is_empty());
}

#[test]
fn webp_output() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("input");
    let output_dir = tmp.path().join("output");
    fs::create_dir_all(&input_dir).unwrap();

    let manifest = write_manifest_input(&input_dir);
    let config = PipelineConfig {
        output_options: OutputConfig {
            format: OutputFormat::WebP,
        },
        ..config_for(manifest, output_dir.clone(), 64)
    };

    Pipeline::run(&config).unwrap();

    assert!(output_dir.join("DiffuseMap.webp").exists());
    let report = read_report(&output_dir);
    assert_eq!(report["channels"][0]["uri"], "DiffuseMap.webp");
    assert_eq!(report["channels"][0]["mimeType"], "image/webp");
}

#[test]
fn atlas_too_small_fails_without_grow() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("input");
    fs::create_dir_all(&input_dir).unwrap();

    let manifest = write_manifest_input(&input_dir);
    let config = config_for(manifest, tmp.path().join("output"), 32);

    let err = Pipeline::run(&config).unwrap_err();
    match err {
        AtlasError::PackingFailure { name, .. } => assert_eq!(name, "stone.png"),
        other => panic!("unexpected error {other}"),
    }
    assert!(!tmp.path().join("output").exists(), "nothing written on failure");
}

#[test]
fn atlas_grows_when_allowed() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("input");
    let output_dir = tmp.path().join("output");
    fs::create_dir_all(&input_dir).unwrap();

    let manifest = write_manifest_input(&input_dir);
    let mut config = config_for(manifest, output_dir.clone(), 32);
    config.atlas.grow = true;

    let result = Pipeline::run(&config).expect("grown atlas should fit");
    assert_eq!((result.atlas_width, result.atlas_height), (64, 32));

    let report = read_report(&output_dir);
    assert_eq!(report["width"], 64);
    assert_eq!(report["height"], 32);
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("input");
    let output_dir = tmp.path().join("output");
    fs::create_dir_all(&input_dir).unwrap();

    let manifest = write_manifest_input(&input_dir);
    let mut config = config_for(manifest, output_dir.clone(), 64);
    config.dry_run = true;

    let result = Pipeline::run(&config).unwrap();
    assert_eq!(result.tile_count, 3);
    assert!(!output_dir.exists());
}

#[test]
fn zero_atlas_size_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("input");
    fs::create_dir_all(&input_dir).unwrap();

    let manifest = write_manifest_input(&input_dir);
    let config = config_for(manifest, tmp.path().join("output"), 0);

    assert!(matches!(Pipeline::run(&config), Err(AtlasError::Input(_))));
}

#[test]
fn pipeline_missing_input_returns_error() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_for(
        tmp.path().join("nonexistent.json"),
        tmp.path().join("output"),
        64,
    );

    let err = Pipeline::run(&config);
    assert!(err.is_err(), "missing input should return error");
}
