//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, MapDimension};

/// Terrain generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "loam", about = "Procedural terrain map generator")]
pub struct CliArgs {
    /// Generation seed.
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Noise scale.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Number of noise octaves.
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Amplitude falloff per octave.
    #[arg(long)]
    pub persistence: Option<f64>,

    /// Frequency growth per octave.
    #[arg(long)]
    pub lacunarity: Option<f64>,

    /// Mesh level of detail (0 - 6).
    #[arg(long)]
    pub lod: Option<u8>,

    /// Heightmap or volume.
    #[arg(long, value_enum)]
    pub dimension: Option<MapDimension>,

    /// Explicit extents, e.g. `--dims 128,96` or `--dims 32,32,32`.
    #[arg(long, value_delimiter = ',')]
    pub dims: Option<Vec<usize>>,

    /// Generate row by row, reporting progress.
    #[arg(long)]
    pub progressive: Option<bool>,

    /// Directory for generated textures.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.noise.seed = seed;
        }
        if let Some(scale) = args.scale {
            self.noise.scale = scale;
        }
        if let Some(octaves) = args.octaves {
            self.noise.octaves = octaves;
        }
        if let Some(p) = args.persistence {
            self.noise.persistence = p;
        }
        if let Some(l) = args.lacunarity {
            self.noise.lacunarity = l;
        }
        if let Some(lod) = args.lod {
            self.mesh.level_of_detail = lod;
        }
        if let Some(dimension) = args.dimension {
            self.map.dimension = dimension;
        }
        if let Some(ref dims) = args.dims {
            self.map.dims = Some(dims.clone());
        }
        if let Some(progressive) = args.progressive {
            self.output.progressive = progressive;
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(42),
            lod: Some(3),
            dims: Some(vec![64, 64, 8]),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.noise.seed, 42);
        assert_eq!(config.mesh.level_of_detail, 3);
        assert_eq!(config.map.extents(), vec![64, 64, 8]);
        // Non-overridden fields retain defaults
        assert_eq!(config.noise.octaves, 4);
        assert_eq!(config.map.chunk_size, 241);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_dims_and_negative_seed() {
        let args = CliArgs::parse_from([
            "loam",
            "--seed",
            "-5",
            "--dims",
            "32,16",
            "--dimension",
            "three-dimensional",
        ]);
        assert_eq!(args.seed, Some(-5));
        assert_eq!(args.dims, Some(vec![32, 16]));
        assert_eq!(args.dimension, Some(MapDimension::ThreeDimensional));
    }
}
