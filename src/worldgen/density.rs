//! # Density Module
//!
//! Maps noise samples to the 8-bit density ("value") byte of a voxel.
//!
//! Two density functions exist, selected once per generation call by [`GeneratorMode`]:
//!
//! * **default**: `clamp(|s| * scale, 0, 255)`, optionally inverted to
//!   `clamp(255 - |s| * scale, 0, 255)`
//! * **terrain**: `clamp(base_height + |s| * amplitude - y, 0, 255)`, which keeps
//!   voxels below the noise-driven surface dense and everything above it empty
//!
//! Both clamp with min/max before truncating, so no value ever wraps around.

use std::{fmt, str::FromStr};

use cgmath::Point3;
use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldgenError};

use super::noise_sampler::NoiseSampler;

/// Sample frequency multiplier of the default density function.
pub const DEFAULT_DENSITY_FREQUENCY: f32 = 1.5;
/// Sample frequency multiplier of the terrain density function.
pub const TERRAIN_DENSITY_FREQUENCY: f32 = 0.75;

/// Selects which density function fills the `value` byte.
///
/// The numeric representation is the selector used by hosts that pass the mode
/// as a plain byte.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum GeneratorMode {
    /// Cave-like density from the magnitude of the noise field.
    #[default]
    #[serde(alias = "cave")]
    Default = 0,
    /// Height-biased density producing a terrain surface.
    Terrain = 1,
}

impl GeneratorMode {
    /// Every mode, in selector order.
    pub const ALL: [GeneratorMode; 2] = [GeneratorMode::Default, GeneratorMode::Terrain];

    /// The lowercase name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            GeneratorMode::Default => "default",
            GeneratorMode::Terrain => "terrain",
        }
    }
}

impl TryFrom<u8> for GeneratorMode {
    type Error = WorldgenError;

    fn try_from(selector: u8) -> Result<Self> {
        num::FromPrimitive::from_u8(selector).ok_or_else(|| {
            WorldgenError::invalid(format!("unknown generator mode selector {selector}"))
        })
    }
}

impl FromStr for GeneratorMode {
    type Err = WorldgenError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "default" | "cave" => Ok(GeneratorMode::Default),
            "terrain" => Ok(GeneratorMode::Terrain),
            _ => Err(WorldgenError::invalid(format!(
                "unknown generator mode '{name}'"
            ))),
        }
    }
}

impl fmt::Display for GeneratorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tuning of the default density function.
///
/// The richer variant scales by 384 without inversion; the earliest variant used
/// `255 - |s| * 255`, i.e. a scale of 255 with `invert` set.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultDensitySettings {
    /// Multiplier applied to the absolute noise sample.
    pub scale: f32,
    /// Subtract the scaled sample from 255 instead of using it directly.
    pub invert: bool,
}

impl Default for DefaultDensitySettings {
    fn default() -> Self {
        DefaultDensitySettings {
            scale: 384.0,
            invert: false,
        }
    }
}

/// Tuning of the terrain density function.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerrainDensitySettings {
    /// Density offset at world height zero.
    pub base_height: f32,
    /// Multiplier applied to the absolute noise sample (96 and 128 are both in use).
    pub amplitude: f32,
}

impl Default for TerrainDensitySettings {
    fn default() -> Self {
        TerrainDensitySettings {
            base_height: 64.0,
            amplitude: 128.0,
        }
    }
}

/// Clamps a real density to the byte range and truncates it.
#[inline]
fn to_density_byte(value: f32) -> u8 {
    value.max(0.0).min(255.0) as u8
}

/// Density of the default mode for a raw noise sample.
pub fn default_density(sample: f32, settings: &DefaultDensitySettings) -> u8 {
    let magnitude = sample.abs() * settings.scale;
    if settings.invert {
        to_density_byte(255.0 - magnitude)
    } else {
        to_density_byte(magnitude)
    }
}

/// Density of the terrain mode for a raw noise sample at world height `y`.
///
/// For a fixed sample the result never increases with `y`.
pub fn terrain_density(sample: f32, y: i32, settings: &TerrainDensitySettings) -> u8 {
    to_density_byte(settings.base_height + sample.abs() * settings.amplitude - y as f32)
}

/// A density function bound to its settings for one generation call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DensityFunction {
    /// See [`default_density`].
    Default(DefaultDensitySettings),
    /// See [`terrain_density`].
    Terrain(TerrainDensitySettings),
}

impl DensityFunction {
    /// Picks the density function for `mode`.
    pub fn new(
        mode: GeneratorMode,
        default: DefaultDensitySettings,
        terrain: TerrainDensitySettings,
    ) -> Self {
        match mode {
            GeneratorMode::Default => DensityFunction::Default(default),
            GeneratorMode::Terrain => DensityFunction::Terrain(terrain),
        }
    }

    /// Samples the noise field and computes the density byte at a world position.
    ///
    /// # Arguments
    /// * `sampler` - The sampler owned by the current generation call
    /// * `pos` - World-space voxel coordinates
    pub fn evaluate(&self, sampler: &NoiseSampler, pos: Point3<i32>) -> u8 {
        match self {
            DensityFunction::Default(settings) => {
                let f = DEFAULT_DENSITY_FREQUENCY;
                let sample = sampler.sample3d(pos.x as f32 * f, pos.y as f32 * f, pos.z as f32 * f);
                default_density(sample, settings)
            }
            DensityFunction::Terrain(settings) => {
                let f = TERRAIN_DENSITY_FREQUENCY;
                let sample = sampler.sample3d(pos.x as f32 * f, pos.y as f32 * f, pos.z as f32 * f);
                terrain_density(sample, pos.y, settings)
            }
        }
    }
}
