//! # Noise Sampler Module
//!
//! Wraps a coherent fractal noise source from the `noise` crate behind a small,
//! single-precision sampling interface.
//!
//! ## Ownership
//!
//! A sampler is configuration state private to one generation call. It is built from
//! a seed and a set of fractal settings when the call starts and dropped when it ends,
//! so concurrent calls with different seeds never observe each other's configuration.
//!
//! ## Output Range
//!
//! The `noise` crate normalises 3-D OpenSimplex by `1/14`, which leaves single octaves
//! within roughly `±0.45` and three-octave FBM within roughly `±0.42`. The fractals are
//! therefore built over [`FullRangeSimplex`], which rescales each octave by
//! [`SIMPLEX_OUTPUT_GAIN`] so the layered output spans `[-1, 1]`.

use noise::{Billow, Fbm, MultiFractal, NoiseFn, OpenSimplex, RidgedMulti, Seedable};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldgenError};

use super::seed::Seed;

/// Largest octave count the fractal sources accept.
pub const MAX_OCTAVES: usize = 32;

/// Gain applied to every OpenSimplex octave.
///
/// Measured three-octave FBM peaks sit near `0.42`; `2.5` lifts them just past `1.0`, so
/// the final clamp only trims the outermost tails.
pub const SIMPLEX_OUTPUT_GAIN: f64 = 2.5;

/// OpenSimplex noise rescaled by [`SIMPLEX_OUTPUT_GAIN`] and clamped to `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullRangeSimplex {
    source: OpenSimplex,
}

impl Seedable for FullRangeSimplex {
    fn set_seed(self, seed: u32) -> Self {
        FullRangeSimplex {
            source: self.source.set_seed(seed),
        }
    }

    fn seed(&self) -> u32 {
        self.source.seed()
    }
}

impl NoiseFn<f64, 3> for FullRangeSimplex {
    fn get(&self, point: [f64; 3]) -> f64 {
        (self.source.get(point) * SIMPLEX_OUTPUT_GAIN).clamp(-1.0, 1.0)
    }
}

/// The fractal layering applied on top of the base OpenSimplex noise.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FractalType {
    /// Fractal Brownian motion: octaves of noise summed with decreasing amplitude.
    #[default]
    Fbm,
    /// Ridged multifractal noise.
    Ridged,
    /// Billowing (absolute value) fractal noise.
    Billow,
}

/// Parameters of the fractal noise source.
///
/// The defaults match the coherent-noise library the world format was designed
/// against: FBM, three octaves, frequency 0.01, lacunarity 2 and gain 0.5.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FractalSettings {
    /// Fractal layering to use.
    pub fractal_type: FractalType,
    /// Number of octaves summed per sample.
    pub octaves: usize,
    /// Frequency of the first octave.
    pub frequency: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub gain: f64,
}

impl Default for FractalSettings {
    fn default() -> Self {
        FractalSettings {
            fractal_type: FractalType::Fbm,
            octaves: 3,
            frequency: 0.01,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

impl FractalSettings {
    /// Checks that the settings describe a usable noise source.
    ///
    /// # Returns
    /// `Err(InvalidConfiguration)` for zero octaves, more octaves than the noise
    /// sources support, or non-finite / non-positive frequency and lacunarity.
    pub fn validate(&self) -> Result<()> {
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(WorldgenError::invalid(format!(
                "fractal octaves must be in 1..={}, got {}",
                MAX_OCTAVES,
                self.octaves
            )));
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(WorldgenError::invalid(format!(
                "fractal frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !(self.lacunarity.is_finite() && self.lacunarity > 0.0) {
            return Err(WorldgenError::invalid(format!(
                "fractal lacunarity must be positive, got {}",
                self.lacunarity
            )));
        }
        if !self.gain.is_finite() {
            return Err(WorldgenError::invalid("fractal gain must be finite"));
        }
        Ok(())
    }
}

enum FractalSource {
    Fbm(Fbm<FullRangeSimplex>),
    Ridged(RidgedMulti<FullRangeSimplex>),
    Billow(Billow<FullRangeSimplex>),
}

/// A seeded fractal noise source sampled in three dimensions.
pub struct NoiseSampler {
    source: FractalSource,
}

impl NoiseSampler {
    /// Builds a sampler for one generation call.
    ///
    /// # Arguments
    /// * `seed` - The world seed
    /// * `settings` - Fractal parameters, assumed to be validated
    pub fn new(seed: Seed, settings: &FractalSettings) -> Self {
        let seed = seed.noise_seed();
        let source = match settings.fractal_type {
            FractalType::Fbm => FractalSource::Fbm(
                Fbm::<FullRangeSimplex>::new(seed)
                    .set_octaves(settings.octaves)
                    .set_frequency(settings.frequency)
                    .set_lacunarity(settings.lacunarity)
                    .set_persistence(settings.gain),
            ),
            FractalType::Ridged => FractalSource::Ridged(
                RidgedMulti::<FullRangeSimplex>::new(seed)
                    .set_octaves(settings.octaves)
                    .set_frequency(settings.frequency)
                    .set_lacunarity(settings.lacunarity)
                    .set_persistence(settings.gain),
            ),
            FractalType::Billow => FractalSource::Billow(
                Billow::<FullRangeSimplex>::new(seed)
                    .set_octaves(settings.octaves)
                    .set_frequency(settings.frequency)
                    .set_lacunarity(settings.lacunarity)
                    .set_persistence(settings.gain),
            ),
        };
        NoiseSampler { source }
    }

    /// Samples the noise field at a real-valued point.
    ///
    /// # Returns
    /// A value in `[-1, 1]`. The same seed, settings and point always give the same value.
    pub fn sample3d(&self, x: f32, y: f32, z: f32) -> f32 {
        let point = [x as f64, y as f64, z as f64];
        let raw = match &self.source {
            FractalSource::Fbm(noise) => noise.get(point),
            FractalSource::Ridged(noise) => noise.get(point),
            FractalSource::Billow(noise) => noise.get(point),
        };
        (raw as f32).clamp(-1.0, 1.0)
    }
}
