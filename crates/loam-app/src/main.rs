//! Command-line terrain map generator.
//!
//! Loads `config.ron`, applies CLI overrides, generates one map, and writes
//! its color and height textures plus a `mesh.json` summary to the output
//! directory.
//!
//! Run with: `cargo run -p loam-app -- --seed 42 --dims 128,128`

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use loam_config::{CliArgs, Config, OutputConfig, default_config_dir};
use loam_terrain::{GeneratedMap, MapGenerator, MapTexture, TerrainError};
use serde::Serialize;
use tracing::{debug, error, info};

/// Mesh statistics written next to the textures.
#[derive(Debug, Serialize)]
struct MeshSummary {
    extents: Vec<usize>,
    seed: i64,
    level_of_detail: u8,
    vertices: usize,
    triangles: usize,
    bounds: Option<([f32; 3], [f32; 3])>,
    unclassified_cells: usize,
}

impl MeshSummary {
    fn new(map: &GeneratedMap, config: &Config) -> Self {
        let (w, h, d) = map.field.shape().extents();
        let extents = match map.field.shape().rank() {
            2 => vec![w, h],
            _ => vec![w, h, d],
        };
        Self {
            extents,
            seed: config.noise.seed,
            level_of_detail: config.mesh.level_of_detail,
            vertices: map.mesh.vertex_count(),
            triangles: map.mesh.triangle_count(),
            bounds: map.mesh.bounds(),
            unclassified_cells: map.colors.unclassified_count(),
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    let log_file = loam_log::init_logging(Some(&config_dir), cfg!(debug_assertions), Some(&config));

    info!("Loam terrain generator");
    if let Some(path) = log_file {
        debug!("JSON log at {}", path.display());
    }
    info!(
        "Map: {:?} | Noise: scale={}, octaves={}, seed={} | LOD {}",
        config.map.extents(),
        config.noise.scale,
        config.noise.octaves,
        config.noise.seed,
        config.mesh.level_of_detail,
    );

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Generation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), TerrainError> {
    let generator = MapGenerator::from_config(config)?;

    let map = if config.output.progressive {
        let mut progressive = generator.generate_progressive()?;
        for slice in progressive.by_ref() {
            debug!("Row {}/{} classified", slice.index + 1, slice.total);
        }
        progressive.finish()?
    } else {
        generator.generate()?
    };

    let summary = MeshSummary::new(&map, config);
    info!(
        "Mesh: {} vertices, {} triangles, bounds {:?}",
        summary.vertices, summary.triangles, summary.bounds
    );

    write_textures(&map, &config.output)?;
    write_summary(&summary, &config.output.directory)
}

fn write_summary(summary: &MeshSummary, dir: &Path) -> Result<(), TerrainError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join("mesh.json");
    let json = serde_json::to_string_pretty(summary).map_err(std::io::Error::from)?;
    std::fs::write(&path, json)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Write the enabled textures; volumes are previewed by their middle layer.
fn write_textures(map: &GeneratedMap, output: &OutputConfig) -> Result<(), TerrainError> {
    if !output.color_texture && !output.height_texture {
        return Ok(());
    }
    std::fs::create_dir_all(&output.directory)?;

    if output.color_texture {
        save(MapTexture::from_color_map(&map.colors)?, &output.directory, "color.png")?;
    }
    if output.height_texture {
        save(MapTexture::from_field(&map.field)?, &output.directory, "height.png")?;
    }
    Ok(())
}

fn save(texture: MapTexture, dir: &Path, name: &str) -> Result<(), TerrainError> {
    let path = dir.join(name);
    texture.preview()?.save_png(&path)?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.map.dims = Some(vec![9, 7]);
        config.output.directory = dir.join("out");
        config
    }

    #[test]
    fn test_run_writes_both_textures() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        run(&config).unwrap();
        assert!(config.output.directory.join("color.png").exists());
        assert!(config.output.directory.join("height.png").exists());

        let json = std::fs::read_to_string(config.output.directory.join("mesh.json")).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(summary["vertices"], 63);
        assert_eq!(summary["triangles"], 2 * 8 * 6);
        assert_eq!(summary["extents"], serde_json::json!([9, 7]));
    }

    #[test]
    fn test_progressive_run_writes_textures() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.output.progressive = true;
        config.output.height_texture = false;
        run(&config).unwrap();
        assert!(config.output.directory.join("color.png").exists());
        assert!(
            !config.output.directory.join("height.png").exists(),
            "disabled textures are skipped"
        );
    }

    #[test]
    fn test_run_reports_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.mesh.level_of_detail = 7;
        assert!(matches!(run(&config), Err(TerrainError::Config(_))));
    }
}
