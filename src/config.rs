//! # Configuration Module
//!
//! Serde-backed settings for the world generator.
//!
//! Two layers exist:
//!
//! * [`GeneratorSettings`]: the pure algorithm parameters (mode, color scheme, noise and
//!   scale constants). Together with a seed and a chunk size they fully determine the
//!   generated bytes.
//! * [`WorldgenConfig`]: what a host loads from disk. It adds the seed, chunk size and
//!   worker-pool sizing on top of the generator settings.
//!
//! ## Example
//!
//! ```json
//! {
//!   "seed": 1337,
//!   "chunk_size": 32,
//!   "radius": 2,
//!   "generator": {
//!     "mode": "terrain",
//!     "color_scheme": "banded-gradient",
//!     "terrain": { "amplitude": 96.0 }
//!   }
//! }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WorldgenError},
    worldgen::{
        color::{BandedGradientSettings, ColorScheme},
        density::{DefaultDensitySettings, GeneratorMode, TerrainDensitySettings},
        noise_sampler::FractalSettings,
        seed::Seed,
    },
};

/// Default chunk edge length used by hosts that do not configure one.
pub const DEFAULT_CHUNK_SIZE: u8 = 32;

/// Algorithm parameters of the chunk generator.
///
/// The scale constants differ between the observed generations of the world format,
/// so they are exposed here instead of being hard-coded. See the presets
/// [`GeneratorSettings::legacy`] and [`GeneratorSettings::terrain`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Density function selector.
    pub mode: GeneratorMode,
    /// Color mapper selector.
    pub color_scheme: ColorScheme,
    /// Fractal noise parameters.
    pub fractal: FractalSettings,
    /// Constants of the default density function.
    pub density: DefaultDensitySettings,
    /// Constants of the terrain density function.
    pub terrain: TerrainDensitySettings,
    /// Constants of the banded-gradient color scheme.
    pub banded: BandedGradientSettings,
}

impl GeneratorSettings {
    /// The earliest generation: inverted `255 - |s| * 255` density with banded colors.
    pub fn legacy() -> Self {
        GeneratorSettings {
            color_scheme: ColorScheme::BandedGradient,
            density: DefaultDensitySettings {
                scale: 255.0,
                invert: true,
            },
            ..GeneratorSettings::default()
        }
    }

    /// Height-biased terrain with hsv-wheel colors.
    pub fn terrain() -> Self {
        GeneratorSettings {
            mode: GeneratorMode::Terrain,
            ..GeneratorSettings::default()
        }
    }

    /// Returns a copy using `mode`.
    pub fn with_mode(mut self, mode: GeneratorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns a copy using `color_scheme`.
    pub fn with_color_scheme(mut self, color_scheme: ColorScheme) -> Self {
        self.color_scheme = color_scheme;
        self
    }

    /// Rejects settings that cannot produce a well-defined chunk.
    pub fn validate(&self) -> Result<()> {
        self.fractal.validate()?;
        if !self.density.scale.is_finite() {
            return Err(WorldgenError::invalid("density scale must be finite"));
        }
        if !(self.terrain.amplitude.is_finite() && self.terrain.base_height.is_finite()) {
            return Err(WorldgenError::invalid(
                "terrain amplitude and base height must be finite",
            ));
        }
        if !self.banded.frequency.is_finite() {
            return Err(WorldgenError::invalid(
                "banded gradient frequency must be finite",
            ));
        }
        Ok(())
    }
}

/// Host-level configuration loaded from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldgenConfig {
    /// World seed. A random seed is drawn when absent.
    pub seed: Option<i32>,
    /// Chunk edge length in voxels.
    pub chunk_size: u8,
    /// Worker threads. Defaults to the available parallelism.
    pub workers: Option<usize>,
    /// Chunks generated around the origin by the demo driver, per axis.
    pub radius: u8,
    /// Algorithm parameters.
    pub generator: GeneratorSettings,
}

impl Default for WorldgenConfig {
    fn default() -> Self {
        WorldgenConfig {
            seed: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers: None,
            radius: 1,
            generator: GeneratorSettings::default(),
        }
    }
}

impl WorldgenConfig {
    /// Parses and validates a JSON config.
    ///
    /// # Returns
    /// `Err(InvalidConfiguration)` for malformed JSON, unknown fields, unknown mode or
    /// scheme names, and any value rejected by [`WorldgenConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WorldgenConfig =
            serde_json::from_str(json).map_err(|e| WorldgenError::invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| WorldgenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Rejects values no generator or worker pool can run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(WorldgenError::invalid("chunk size must be greater than zero"));
        }
        if self.workers == Some(0) {
            return Err(WorldgenError::invalid("worker count must be greater than zero"));
        }
        self.generator.validate()
    }

    /// The configured seed, or a freshly drawn random one.
    pub fn resolve_seed(&self) -> Seed {
        self.seed.map(Seed).unwrap_or_else(Seed::random)
    }
}
