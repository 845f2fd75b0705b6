//! Map generation pipeline: noise field, region colors, and terrain mesh.

use loam_config::Config;
use loam_mesh::{HeightCurve, Keyframe, KeyframeCurve, LevelOfDetail, Linear, MeshBuffers, MeshRows};
use loam_noise::{FieldShape, NoiseParams, ScalarField};
use tracing::info;

use crate::error::TerrainError;
use crate::progressive::ProgressiveMap;
use crate::region::{ColorMap, TerrainRegion, classify_field};

/// Height curve shared by a generator.
pub type DynCurve = dyn HeightCurve + Send + Sync;

/// Everything needed to generate one map, apart from the height curve.
#[derive(Clone, Debug, PartialEq)]
pub struct MapSettings {
    pub shape: FieldShape,
    pub noise: NoiseParams,
    /// Vertical scale applied after the height curve.
    pub height_multiplier: f32,
    pub level_of_detail: LevelOfDetail,
    /// Height bands, evaluated in order.
    pub regions: Vec<TerrainRegion>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            shape: FieldShape::Flat {
                width: 241,
                height: 241,
            },
            noise: NoiseParams::default(),
            height_multiplier: 26.0,
            level_of_detail: LevelOfDetail::FULL,
            regions: Vec::new(),
        }
    }
}

/// The products of one generation run. Owned by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedMap {
    pub field: ScalarField,
    pub colors: ColorMap,
    pub mesh: MeshBuffers,
}

/// Generates maps from fixed settings.
///
/// Each call to [`generate`](Self::generate) or
/// [`generate_progressive`](Self::generate_progressive) produces fresh
/// results; nothing from a previous run is kept.
pub struct MapGenerator {
    settings: MapSettings,
    curve: Box<DynCurve>,
}

impl std::fmt::Debug for MapGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapGenerator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl MapGenerator {
    /// Create a generator with a linear height curve.
    pub fn new(settings: MapSettings) -> Self {
        Self {
            settings,
            curve: Box::new(Linear),
        }
    }

    /// Replace the height curve.
    pub fn with_curve(mut self, curve: impl HeightCurve + Send + Sync + 'static) -> Self {
        self.curve = Box::new(curve);
        self
    }

    /// Build a generator from loaded configuration.
    ///
    /// An empty `mesh.height_curve` means a linear curve.
    pub fn from_config(config: &Config) -> Result<Self, TerrainError> {
        config.validate()?;

        let shape = FieldShape::from_dims(&config.map.extents())?;
        let noise = NoiseParams {
            scale: config.noise.scale,
            octaves: config.noise.octaves,
            persistence: config.noise.persistence,
            lacunarity: config.noise.lacunarity,
            seed: config.noise.seed,
        };
        let settings = MapSettings {
            shape,
            noise,
            height_multiplier: config.mesh.height_multiplier,
            level_of_detail: LevelOfDetail::new(config.mesh.level_of_detail)?,
            regions: config.regions.iter().map(TerrainRegion::from).collect(),
        };

        let generator = Self::new(settings);
        if config.mesh.height_curve.is_empty() {
            return Ok(generator);
        }
        let keys = config
            .mesh
            .height_curve
            .iter()
            .map(|&(time, value)| Keyframe::new(time, value))
            .collect();
        Ok(generator.with_curve(KeyframeCurve::new(keys)))
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    pub fn curve(&self) -> &DynCurve {
        self.curve.as_ref()
    }

    /// Generate the normalized noise field.
    pub fn generate_field(&self) -> Result<ScalarField, TerrainError> {
        Ok(loam_noise::generate(self.settings.shape, &self.settings.noise)?)
    }

    /// Generate the field, classify it, and build the mesh in one call.
    pub fn generate(&self) -> Result<GeneratedMap, TerrainError> {
        let field = self.generate_field()?;
        let colors = classify_field(&field, &self.settings.regions);
        let mesh = self.build_mesh(Some(&field))?;
        log_summary(&field, &colors, &mesh);
        Ok(GeneratedMap {
            field,
            colors,
            mesh,
        })
    }

    /// Generate the field, then classify it one row at a time.
    ///
    /// The noise field is produced up front because normalization needs the
    /// observed range of every cell. Dropping the returned iterator cancels
    /// the rest of the run.
    pub fn generate_progressive(&self) -> Result<ProgressiveMap<'_>, TerrainError> {
        let field = self.generate_field()?;
        Ok(ProgressiveMap::new(self, field))
    }

    /// Build the mesh for `field`.
    ///
    /// # Errors
    ///
    /// [`TerrainError::PreconditionViolation`] when no field is given, and
    /// [`TerrainError::Mesh`] when the mesh builder rejects the field.
    pub fn build_mesh(&self, field: Option<&ScalarField>) -> Result<MeshBuffers, TerrainError> {
        let field = field.ok_or_else(|| {
            TerrainError::PreconditionViolation(
                "mesh build requested without a generated field".to_string(),
            )
        })?;
        Ok(loam_mesh::build(
            field,
            self.settings.height_multiplier,
            self.curve.as_ref(),
            self.settings.level_of_detail,
        )?)
    }

    /// Incremental mesh build over `field` with this generator's settings.
    pub fn mesh_rows<'a>(
        &'a self,
        field: &'a ScalarField,
    ) -> Result<MeshRows<'a, DynCurve>, TerrainError> {
        Ok(MeshRows::new(
            field,
            self.settings.height_multiplier,
            self.curve.as_ref(),
            self.settings.level_of_detail,
        )?)
    }
}

pub(crate) fn log_summary(field: &ScalarField, colors: &ColorMap, mesh: &MeshBuffers) {
    let (w, h, d) = field.shape().extents();
    info!(
        "Generated {}x{}x{} map: {} vertices, {} triangles, {} unclassified cells",
        w,
        h,
        d,
        mesh.vertex_count(),
        mesh.triangle_count(),
        colors.unclassified_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn small_settings() -> MapSettings {
        MapSettings {
            shape: FieldShape::flat(9, 9).unwrap(),
            noise: NoiseParams {
                scale: 4.0,
                seed: 7,
                ..NoiseParams::default()
            },
            height_multiplier: 10.0,
            level_of_detail: LevelOfDetail::FULL,
            regions: vec![
                TerrainRegion::new("low", 0.0, 0.5, Color::BLACK),
                TerrainRegion::new("high", 0.5, 1.0, Color::WHITE),
            ],
        }
    }

    #[test]
    fn test_generate_produces_consistent_products() {
        let map = MapGenerator::new(small_settings()).generate().unwrap();
        assert_eq!(map.field.values().len(), 81);
        assert_eq!(map.colors.colors().len(), 81);
        assert_eq!(map.mesh.vertex_count(), 81);
        assert_eq!(map.mesh.triangle_count(), 2 * 8 * 8);
        assert_eq!(map.colors.unclassified_count(), 0, "bands cover [0, 1]");
    }

    #[test]
    fn test_build_mesh_without_field_is_precondition_violation() {
        let generator = MapGenerator::new(small_settings());
        let result = generator.build_mesh(None);
        assert!(
            matches!(result, Err(TerrainError::PreconditionViolation(_))),
            "absent field must be rejected, got {result:?}"
        );
    }

    #[test]
    fn test_curve_shapes_mesh_heights() {
        let flat = MapGenerator::new(small_settings()).with_curve(|_t: f32| -> f32 { 0.0 });
        let map = flat.generate().unwrap();
        assert!(
            map.mesh.vertices.iter().all(|v| v[1] == 0.0),
            "a zero curve flattens every vertex"
        );
    }

    #[test]
    fn test_lod_reduces_mesh() {
        let settings = MapSettings {
            level_of_detail: LevelOfDetail::new(2).unwrap(),
            ..small_settings()
        };
        let map = MapGenerator::new(settings).generate().unwrap();
        // 9 cells at increment 4 -> 3 samples per axis
        assert_eq!(map.mesh.vertex_count(), 9);
        assert_eq!(map.field.values().len(), 81, "the field keeps full resolution");
    }

    #[test]
    fn test_from_default_config() {
        let config = Config::default();
        let generator = MapGenerator::from_config(&config).unwrap();
        let settings = generator.settings();
        assert_eq!(settings.shape, FieldShape::flat(241, 241).unwrap());
        assert_eq!(settings.regions.len(), config.regions.len());
        assert_eq!(settings.noise.seed, 0);
        // Default curve holds low ground flat
        assert_eq!(generator.curve().evaluate(0.2), 0.0);
        assert_eq!(generator.curve().evaluate(1.0), 1.0);
    }

    #[test]
    fn test_from_config_empty_curve_is_linear() {
        let mut config = Config::default();
        config.mesh.height_curve.clear();
        let generator = MapGenerator::from_config(&config).unwrap();
        assert_eq!(generator.curve().evaluate(0.3), 0.3);
    }

    #[test]
    fn test_from_config_rejects_bad_lod() {
        let mut config = Config::default();
        config.mesh.level_of_detail = 9;
        assert!(matches!(
            MapGenerator::from_config(&config),
            Err(TerrainError::Config(_))
        ));
    }

    #[test]
    fn test_from_config_rejects_nan_curve() {
        let mut config = Config::default();
        config.map.dims = Some(vec![5, 5]);
        config.mesh.height_curve = vec![(f32::NAN, 0.0), (f32::NAN, 1.0)];
        assert!(matches!(
            MapGenerator::from_config(&config),
            Err(TerrainError::Config(_))
        ));
    }

    #[test]
    fn test_mesh_rows_match_eager_mesh() {
        let generator = MapGenerator::new(small_settings());
        let field = generator.generate_field().unwrap();
        let rows = generator.mesh_rows(&field).unwrap();
        assert_eq!(rows.total_rows(), 9);
        let incremental = rows.finish();
        assert_eq!(incremental, generator.build_mesh(Some(&field)).unwrap());
    }
}
