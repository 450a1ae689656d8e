//! # Color Module
//!
//! Maps noise samples to the RGB bytes of a voxel.
//!
//! ## Schemes
//!
//! * **hsv-wheel**: the sample is remapped to a hue in `[0, 1)` and converted from HSV
//!   with fixed saturation and value using the six-sector algorithm.
//! * **banded-gradient**: the sample magnitude is inverted and mapped onto three
//!   contiguous 85-wide bands forming a cyclic rainbow.
//!
//! The color sample is always a second noise query, independent of the density sample,
//! taken with the axes permuted to `(z, x, y)` so color and density stay decorrelated.

use std::{fmt, str::FromStr};

use cgmath::Point3;
use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldgenError};

use super::noise_sampler::NoiseSampler;

/// Sample frequency multiplier of the hsv-wheel scheme.
pub const HSV_FREQUENCY: f32 = 0.25;
/// Saturation of every hsv-wheel color.
pub const HSV_SATURATION: f32 = 0.8;
/// Value (brightness) of every hsv-wheel color.
pub const HSV_VALUE: f32 = 1.0;

/// Width of each band of the banded gradient.
pub const BAND_WIDTH: u8 = 85;

/// Selects how voxel colors are derived.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum ColorScheme {
    /// Hue wheel at fixed saturation and value.
    #[default]
    HsvWheel = 0,
    /// Cyclic rainbow keyed by the inverted sample magnitude.
    BandedGradient = 1,
}

impl ColorScheme {
    /// Every scheme, in selector order.
    pub const ALL: [ColorScheme; 2] = [ColorScheme::HsvWheel, ColorScheme::BandedGradient];

    /// The kebab-case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::HsvWheel => "hsv-wheel",
            ColorScheme::BandedGradient => "banded-gradient",
        }
    }
}

impl TryFrom<u8> for ColorScheme {
    type Error = WorldgenError;

    fn try_from(selector: u8) -> Result<Self> {
        num::FromPrimitive::from_u8(selector).ok_or_else(|| {
            WorldgenError::invalid(format!("unknown color scheme selector {selector}"))
        })
    }
}

impl FromStr for ColorScheme {
    type Err = WorldgenError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "hsv-wheel" => Ok(ColorScheme::HsvWheel),
            "banded-gradient" => Ok(ColorScheme::BandedGradient),
            _ => Err(WorldgenError::invalid(format!(
                "unknown color scheme '{name}'"
            ))),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tuning of the banded-gradient scheme.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BandedGradientSettings {
    /// Multiplier applied to the world coordinates before sampling. `1.0` samples
    /// at the raw integer coordinates.
    pub frequency: f32,
}

impl Default for BandedGradientSettings {
    fn default() -> Self {
        BandedGradientSettings { frequency: 1.0 }
    }
}

/// Remaps a noise sample in `[-1, 1]` to a hue in `[0, 1)`.
///
/// Only the fractional part of `sample + 1` is kept, so a sample of exactly `0.0`
/// or `1.0` wraps to hue `0.0`.
pub fn hue_from_sample(sample: f32) -> f32 {
    (sample + 1.0) % 1.0
}

/// Converts a hue to RGB at [`HSV_SATURATION`] and [`HSV_VALUE`].
///
/// Channels are scaled to `0..=255` by multiplying by 255 and truncating.
pub fn hsv_to_rgb(hue: f32) -> [u8; 3] {
    let s = HSV_SATURATION;
    let v = HSV_VALUE;

    let i = (hue * 6.0).floor();
    let f = hue * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    // rem_euclid keeps the sector in 0..6 for any hue, so the table has no gaps.
    let sectors = [
        [v, t, p],
        [q, v, p],
        [p, v, t],
        [p, q, v],
        [t, p, v],
        [v, p, q],
    ];
    let [r, g, b] = sectors[(i as i32).rem_euclid(6) as usize];

    [to_channel(r), to_channel(g), to_channel(b)]
}

#[inline]
fn to_channel(component: f32) -> u8 {
    (component * 255.0) as u8
}

/// Maps an 8-bit sample magnitude onto the cyclic banded gradient.
///
/// The magnitude is inverted first (`n = 255 - magnitude`), then:
///
/// | band | `n` | color |
/// |---|---|---|
/// | 0 | `0..85` | `(255 - 3n, 0, 3n)` |
/// | 1 | `85..170` | `(0, 3n', 255 - 3n')` with `n' = n - 85` |
/// | 2 | `170..=255` | `(3n', 255 - 3n', 0)` with `n' = n - 170` |
pub fn banded_gradient(magnitude: u8) -> [u8; 3] {
    let n = 255 - magnitude;
    if n < BAND_WIDTH {
        return [255 - n * 3, 0, n * 3];
    }
    if n < 2 * BAND_WIDTH {
        let n = n - BAND_WIDTH;
        return [0, n * 3, 255 - n * 3];
    }
    let n = n - 2 * BAND_WIDTH;
    [n * 3, 255 - n * 3, 0]
}

/// A color mapper bound to its settings for one generation call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorMapper {
    /// See [`hsv_to_rgb`].
    HsvWheel,
    /// See [`banded_gradient`].
    BandedGradient(BandedGradientSettings),
}

impl ColorMapper {
    /// Picks the mapper for `scheme`.
    pub fn new(scheme: ColorScheme, banded: BandedGradientSettings) -> Self {
        match scheme {
            ColorScheme::HsvWheel => ColorMapper::HsvWheel,
            ColorScheme::BandedGradient => ColorMapper::BandedGradient(banded),
        }
    }

    /// Samples the noise field and computes the color at a world position.
    ///
    /// # Arguments
    /// * `sampler` - The sampler owned by the current generation call
    /// * `pos` - World-space voxel coordinates
    ///
    /// # Returns
    /// The `[r, g, b]` bytes of the voxel.
    pub fn evaluate(&self, sampler: &NoiseSampler, pos: Point3<i32>) -> [u8; 3] {
        match self {
            ColorMapper::HsvWheel => {
                let f = HSV_FREQUENCY;
                let sample = sampler.sample3d(pos.z as f32 * f, pos.x as f32 * f, pos.y as f32 * f);
                hsv_to_rgb(hue_from_sample(sample))
            }
            ColorMapper::BandedGradient(settings) => {
                let f = settings.frequency;
                let sample = sampler.sample3d(pos.z as f32 * f, pos.x as f32 * f, pos.y as f32 * f);
                banded_gradient((sample.abs() * 255.0) as u8)
            }
        }
    }
}
