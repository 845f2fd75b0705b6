//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Map extents and dimensionality.
    pub map: MapConfig,
    /// Fractal noise parameters.
    pub noise: NoiseConfig,
    /// Mesh generation settings.
    pub mesh: MeshConfig,
    /// Height bands used to color the map, evaluated in order.
    pub regions: Vec<RegionConfig>,
    /// Output files.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Whether to generate a heightmap or a volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum MapDimension {
    #[default]
    TwoDimensional,
    ThreeDimensional,
}

/// Map extents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// Heightmap or volume.
    pub dimension: MapDimension,
    /// Cells along every axis when `dims` is not set. 241 divides evenly by
    /// every LOD increment.
    pub chunk_size: usize,
    /// Explicit extents (2 or 3 values), overriding `chunk_size` and `dimension`.
    pub dims: Option<Vec<usize>>,
}

/// Fractal noise parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Zoom factor; non-positive values are clamped by the generator.
    pub scale: f64,
    /// Number of octaves.
    pub octaves: u32,
    /// Amplitude falloff per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
    /// Generation seed.
    pub seed: i64,
}

/// Mesh generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Vertical scale applied after the height curve.
    pub height_multiplier: f32,
    /// Decimation level (0 - 6).
    pub level_of_detail: u8,
    /// Height curve keys as `(time, value)` pairs.
    pub height_curve: Vec<(f32, f32)>,
}

/// A named height band with its display color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionConfig {
    pub name: String,
    pub min_height: f32,
    pub max_height: f32,
    /// RGBA in `[0, 1]`.
    pub color: [f32; 4],
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives generated textures.
    pub directory: PathBuf,
    /// Write the region color texture.
    pub color_texture: bool,
    /// Write the grayscale height texture.
    pub height_texture: bool,
    /// Generate row by row, logging progress after each row.
    pub progressive: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            noise: NoiseConfig::default(),
            mesh: MeshConfig::default(),
            regions: default_regions(),
            output: OutputConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            dimension: MapDimension::TwoDimensional,
            chunk_size: 241,
            dims: None,
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: 27.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 0,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            height_multiplier: 26.0,
            level_of_detail: 0,
            height_curve: vec![(0.0, 0.0), (0.4, 0.0), (1.0, 1.0)],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            color_texture: true,
            height_texture: true,
            progressive: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

fn region(name: &str, min_height: f32, max_height: f32, color: [f32; 4]) -> RegionConfig {
    RegionConfig {
        name: name.to_string(),
        min_height,
        max_height,
        color,
    }
}

/// Water, sand, grass, rock, and snow bands covering `[0, 1]`.
fn default_regions() -> Vec<RegionConfig> {
    vec![
        region("deep_water", 0.0, 0.3, [0.12, 0.25, 0.62, 1.0]),
        region("shallow_water", 0.3, 0.4, [0.21, 0.38, 0.78, 1.0]),
        region("sand", 0.4, 0.45, [0.84, 0.81, 0.49, 1.0]),
        region("grass", 0.45, 0.55, [0.34, 0.6, 0.11, 1.0]),
        region("forest", 0.55, 0.6, [0.24, 0.42, 0.09, 1.0]),
        region("rock", 0.6, 0.7, [0.37, 0.27, 0.24, 1.0]),
        region("high_rock", 0.7, 0.9, [0.29, 0.23, 0.22, 1.0]),
        region("snow", 0.9, 1.0, [1.0, 1.0, 1.0, 1.0]),
    ]
}

/// Platform config directory for the generator, e.g. `~/.config/loam`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loam")
}

impl MapConfig {
    /// Extents to generate: `dims` if set, otherwise `chunk_size` on each axis.
    pub fn extents(&self) -> Vec<usize> {
        match (&self.dims, self.dimension) {
            (Some(dims), _) => dims.clone(),
            (None, MapDimension::TwoDimensional) => vec![self.chunk_size; 2],
            (None, MapDimension::ThreeDimensional) => vec![self.chunk_size; 3],
        }
    }
}

// --- Validation ---

impl Config {
    /// Check settings that would otherwise fail deep inside generation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mesh.level_of_detail > 6 {
            return Err(ConfigError::InvalidValue {
                field: "mesh.level_of_detail",
                reason: format!("{} is above the maximum of 6", self.mesh.level_of_detail),
            });
        }
        if self.map.extents().contains(&0) {
            return Err(ConfigError::InvalidValue {
                field: "map",
                reason: "extents must be positive".to_string(),
            });
        }
        if let Some(&(time, value)) = self
            .mesh
            .height_curve
            .iter()
            .find(|(time, value)| !time.is_finite() || !value.is_finite())
        {
            return Err(ConfigError::InvalidValue {
                field: "mesh.height_curve",
                reason: format!("key ({time}, {value}) is not finite"),
            });
        }
        if let Some(bad) = self.regions.iter().find(|r| r.min_height > r.max_height) {
            return Err(ConfigError::InvalidValue {
                field: "regions",
                reason: format!(
                    "region `{}` has min_height {} above max_height {}",
                    bad.name, bad.min_height, bad.max_height
                ),
            });
        }
        Ok(())
    }
}

// --- Load / Save ---

/// File name of the settings file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default settings to {}", path.display());
            return Ok(config);
        }
        let config = read_config(&path)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Write `config.ron` into `config_dir`, creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, text).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("chunk_size: 241"));
        assert!(ron_str.contains("deep_water"));
    }

    #[test]
    fn test_default_regions_cover_unit_range() {
        let regions = default_regions();
        assert_eq!(regions.first().unwrap().min_height, 0.0);
        assert_eq!(regions.last().unwrap().max_height, 1.0);
        for pair in regions.windows(2) {
            assert_eq!(
                pair[0].max_height, pair[1].min_height,
                "Gap between {} and {}",
                pair[0].name, pair[1].name
            );
        }
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(noise: (seed: 9))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.noise.seed, 9);
        assert_eq!(config.noise.octaves, 4);
        assert_eq!(config.mesh, MeshConfig::default());
        assert_eq!(config.regions.len(), 8);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_extents_from_dimension() {
        let mut map = MapConfig::default();
        assert_eq!(map.extents(), vec![241, 241]);
        map.dimension = MapDimension::ThreeDimensional;
        map.chunk_size = 17;
        assert_eq!(map.extents(), vec![17, 17, 17]);
        map.dims = Some(vec![8, 4]);
        assert_eq!(map.extents(), vec![8, 4]);
    }

    #[test]
    fn test_validate_rejects_bad_lod() {
        let mut config = Config::default();
        config.mesh.level_of_detail = 7;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "mesh.level_of_detail",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_curve_key() {
        let mut config = Config::default();
        config.mesh.height_curve.push((f32::NAN, 1.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "mesh.height_curve",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_curve_from_file_fails_validation() {
        let config: Config =
            ron::from_str("(mesh: (height_curve: [(NaN, 0.0), (1.0, 1.0)]))").unwrap();
        assert!(config.validate().is_err(), "a NaN key must be caught before generation");
    }

    #[test]
    fn test_validate_rejects_inverted_region() {
        let mut config = Config::default();
        config.regions[0].min_height = 0.9;
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.noise.seed = -12;
        config.map.dims = Some(vec![64, 32]);
        config.output.directory = PathBuf::from("maps");

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        match Config::load_or_create(dir.path()) {
            Err(ConfigError::Parse { path, .. }) => {
                assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }
}
