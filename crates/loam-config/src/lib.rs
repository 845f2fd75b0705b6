//! Configuration for terrain map generation.
//!
//! Settings persist to disk as RON files and can be overridden from the
//! command line. Unknown or missing fields fall back to defaults so older
//! config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, MapConfig, MapDimension, MeshConfig, NoiseConfig,
    OutputConfig, RegionConfig, default_config_dir,
};
pub use error::ConfigError;
