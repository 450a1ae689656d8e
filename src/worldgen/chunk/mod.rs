//! # Chunk Module
//!
//! This module provides the `ChunkGenerator`, which fills a cubic chunk of voxels in a
//! single deterministic pass, and `ChunkBuffer`, the flat byte buffer it produces.
//!
//! ## Buffer Layout
//!
//! A chunk of edge length `size` is stored as `size³` four-byte records
//! `[value, r, g, b]`, X fastest, then Y, then Z, starting at the chunk's minimum corner.
//! The same bytes can be viewed as `&[Voxel]` without copying.
//!
//! ## Generation
//!
//! For every voxel the generator takes two independent noise samples: one at the
//! density frequency for the `value` byte and one at the color frequency, with permuted
//! axes, for the RGB bytes. Each call to [`ChunkGenerator::generate`] builds its own
//! [`NoiseSampler`], so a single generator can be shared by any number of threads.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::{
    config::GeneratorSettings,
    error::{Result, WorldgenError},
};

use super::{
    color::{ColorMapper, ColorScheme},
    density::{DensityFunction, GeneratorMode},
    noise_sampler::NoiseSampler,
    seed::Seed,
    voxel::{Voxel, VOXEL_BYTES},
};

use chunk_iteration::ChunkPositionIterator;

pub mod chunk_iteration;

/// Number of bytes needed for a chunk of edge length `chunk_size`.
pub fn chunk_byte_len(chunk_size: u8) -> usize {
    let size = chunk_size as usize;
    size * size * size * VOXEL_BYTES
}

/// The generated voxels of one chunk.
///
/// Owns the canonical flat `[value, r, g, b]` byte layout. Use [`ChunkBuffer::voxels`]
/// for a typed view and [`ChunkBuffer::into_bytes`] to hand the bytes to a consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkBuffer {
    /// Chunk-space coordinates of the chunk.
    position: Point3<i32>,
    /// Edge length in voxels.
    chunk_size: u8,
    /// `chunk_size³` voxel records.
    bytes: Vec<u8>,
}

impl ChunkBuffer {
    /// Chunk-space coordinates of this chunk.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// Edge length in voxels.
    pub fn chunk_size(&self) -> u8 {
        self.chunk_size
    }

    /// The raw voxel bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the buffer and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Zero-copy typed view of the voxel records.
    pub fn voxels(&self) -> &[Voxel] {
        bytemuck::cast_slice(&self.bytes)
    }

    /// Number of voxels in the chunk.
    pub fn len(&self) -> usize {
        self.bytes.len() / VOXEL_BYTES
    }

    /// Whether the chunk holds no voxels. Never true for a generated chunk.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Linear voxel index of chunk-local coordinates, or `None` when out of bounds.
    pub fn index_of(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        let size = self.chunk_size as usize;
        if x >= size || y >= size || z >= size {
            return None;
        }
        Some(x + size * y + size * size * z)
    }

    /// The voxel at chunk-local coordinates.
    pub fn voxel(&self, x: usize, y: usize, z: usize) -> Option<Voxel> {
        self.index_of(x, y, z).map(|index| self.voxels()[index])
    }

    /// World position of the chunk's minimum corner.
    pub fn origin(&self) -> Point3<i32> {
        let size = self.chunk_size as i32;
        Point3::new(
            self.position.x * size,
            self.position.y * size,
            self.position.z * size,
        )
    }

    /// Iterates `(world position, voxel)` pairs in buffer order.
    pub fn iter(&self) -> impl Iterator<Item = (Point3<i32>, Voxel)> + '_ {
        ChunkPositionIterator::new(self.origin(), self.chunk_size).zip(self.voxels().iter().copied())
    }
}

/// Generates chunks for one world.
///
/// A generator is immutable once built: it holds the seed, the chunk size and the
/// density and color functions chosen by its settings. Noise state is created per call.
#[derive(Clone, Debug)]
pub struct ChunkGenerator {
    seed: Seed,
    chunk_size: u8,
    settings: GeneratorSettings,
    density: DensityFunction,
    color: ColorMapper,
}

impl ChunkGenerator {
    /// Creates a generator after validating its inputs.
    ///
    /// # Arguments
    /// * `seed` - The world seed
    /// * `chunk_size` - Edge length of every generated chunk, must be non-zero
    /// * `settings` - Algorithm parameters
    ///
    /// # Returns
    /// `Err(InvalidConfiguration)` when the chunk size is zero or the settings are invalid.
    pub fn new(seed: Seed, chunk_size: u8, settings: GeneratorSettings) -> Result<Self> {
        if chunk_size == 0 {
            return Err(WorldgenError::invalid("chunk size must be greater than zero"));
        }
        settings.validate()?;

        Ok(ChunkGenerator {
            seed,
            chunk_size,
            settings,
            density: DensityFunction::new(settings.mode, settings.density, settings.terrain),
            color: ColorMapper::new(settings.color_scheme, settings.banded),
        })
    }

    /// The world seed.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Edge length of generated chunks.
    pub fn chunk_size(&self) -> u8 {
        self.chunk_size
    }

    /// The settings this generator was built from.
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Bytes in one generated chunk.
    pub fn chunk_byte_len(&self) -> usize {
        chunk_byte_len(self.chunk_size)
    }

    /// World position of the minimum corner of the chunk at `position`.
    ///
    /// # Returns
    /// `Err(CoordinateOutOfRange)` when any voxel of the chunk would fall outside `i32`.
    pub fn chunk_origin(&self, position: Point3<i32>) -> Result<Point3<i32>> {
        let size = self.chunk_size as i32;
        let axis = |c: i32| {
            c.checked_mul(size)
                .filter(|origin| origin.checked_add(size - 1).is_some())
        };
        match (axis(position.x), axis(position.y), axis(position.z)) {
            (Some(x), Some(y), Some(z)) => Ok(Point3::new(x, y, z)),
            _ => Err(WorldgenError::CoordinateOutOfRange {
                x: position.x,
                y: position.y,
                z: position.z,
            }),
        }
    }

    /// Generates the chunk at chunk-space `position` into a new buffer.
    pub fn generate(&self, position: Point3<i32>) -> Result<ChunkBuffer> {
        let mut bytes = vec![0; self.chunk_byte_len()];
        self.generate_into(position, &mut bytes)?;
        Ok(ChunkBuffer {
            position,
            chunk_size: self.chunk_size,
            bytes,
        })
    }

    /// Generates the chunk at chunk-space `position` into a caller-owned buffer.
    ///
    /// All validation happens before the first write: on error `out` is untouched.
    ///
    /// # Arguments
    /// * `position` - Chunk-space coordinates
    /// * `out` - Exactly [`ChunkGenerator::chunk_byte_len`] bytes
    pub fn generate_into(&self, position: Point3<i32>, out: &mut [u8]) -> Result<()> {
        let expected = self.chunk_byte_len();
        if out.len() != expected {
            return Err(WorldgenError::BufferSizeMismatch {
                expected,
                actual: out.len(),
            });
        }
        let origin = self.chunk_origin(position)?;

        let start = Instant::now();
        let sampler = NoiseSampler::new(self.seed, &self.settings.fractal);
        let voxels: &mut [Voxel] = bytemuck::cast_slice_mut(out);

        for (voxel, world) in voxels
            .iter_mut()
            .zip(ChunkPositionIterator::new(origin, self.chunk_size))
        {
            *voxel = self.sample_voxel(&sampler, world);
        }

        debug!(
            "Generated chunk ({}, {}, {}) [{} / {}] in {:?}",
            position.x,
            position.y,
            position.z,
            self.settings.mode,
            self.settings.color_scheme,
            start.elapsed()
        );
        Ok(())
    }

    /// Computes the voxel at a single world position with a fresh sampler.
    ///
    /// Equal to the record a chunk covering `world` holds for that position.
    pub fn voxel_at(&self, world: Point3<i32>) -> Voxel {
        let sampler = NoiseSampler::new(self.seed, &self.settings.fractal);
        self.sample_voxel(&sampler, world)
    }

    fn sample_voxel(&self, sampler: &NoiseSampler, world: Point3<i32>) -> Voxel {
        let value = self.density.evaluate(sampler, world);
        let rgb = self.color.evaluate(sampler, world);
        Voxel::new(value, rgb)
    }
}

/// Generates one chunk with the default constants for `mode` and `scheme`.
///
/// # Arguments
/// * `seed` - The world seed
/// * `mode` - Density function
/// * `scheme` - Color mapper
/// * `position` - Chunk-space coordinates
/// * `chunk_size` - Edge length in voxels, must be non-zero
pub fn generate_chunk(
    seed: Seed,
    mode: GeneratorMode,
    scheme: ColorScheme,
    position: Point3<i32>,
    chunk_size: u8,
) -> Result<ChunkBuffer> {
    let settings = GeneratorSettings::default()
        .with_mode(mode)
        .with_color_scheme(scheme);
    ChunkGenerator::new(seed, chunk_size, settings)?.generate(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(settings: GeneratorSettings, chunk_size: u8) -> ChunkGenerator {
        ChunkGenerator::new(Seed(42), chunk_size, settings).unwrap()
    }

    #[test]
    fn buffer_has_one_record_per_voxel() {
        for size in [1, 2, 5, 16] {
            let chunk = generator(GeneratorSettings::default(), size)
                .generate(Point3::new(0, 0, 0))
                .unwrap();
            let voxels = size as usize * size as usize * size as usize;
            assert_eq!(chunk.as_bytes().len(), 4 * voxels);
            assert_eq!(chunk.len(), voxels);
            assert_eq!(chunk.voxels().len(), voxels);
        }
    }

    #[test]
    fn records_follow_world_positions() {
        let generator = generator(GeneratorSettings::terrain(), 4);
        let chunk = generator.generate(Point3::new(-1, 2, 3)).unwrap();
        assert_eq!(chunk.origin(), Point3::new(-4, 8, 12));
        for (world, voxel) in chunk.iter() {
            assert_eq!(generator.voxel_at(world), voxel, "mismatch at {world:?}");
        }
        assert_eq!(
            chunk.voxel(1, 2, 3),
            Some(generator.voxel_at(Point3::new(-3, 10, 15)))
        );
        assert_eq!(chunk.voxel(4, 0, 0), None);
    }

    #[test]
    fn generate_into_matches_generate() {
        let generator = generator(GeneratorSettings::legacy(), 3);
        let mut out = vec![0xAA; generator.chunk_byte_len()];
        generator.generate_into(Point3::new(5, -5, 0), &mut out).unwrap();
        assert_eq!(out, generator.generate(Point3::new(5, -5, 0)).unwrap().into_bytes());
    }

    #[test]
    fn wrong_buffer_size_is_rejected_untouched() {
        let generator = generator(GeneratorSettings::default(), 2);
        let mut out = vec![7u8; 31];
        match generator.generate_into(Point3::new(0, 0, 0), &mut out) {
            Err(WorldgenError::BufferSizeMismatch { expected, actual }) => {
                assert_eq!(expected, 32);
                assert_eq!(actual, 31);
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(out.iter().all(|&b| b == 7));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(matches!(
            ChunkGenerator::new(Seed(0), 0, GeneratorSettings::default()),
            Err(WorldgenError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn far_chunks_are_rejected() {
        let generator = generator(GeneratorSettings::default(), 32);
        let far = Point3::new(i32::MAX / 16, 0, 0);
        assert!(matches!(
            generator.generate(far),
            Err(WorldgenError::CoordinateOutOfRange { .. })
        ));
        let edge = Point3::new(0, i32::MIN / 32, 0);
        assert_eq!(generator.chunk_origin(edge).unwrap(), Point3::new(0, i32::MIN, 0));
    }

    #[test]
    fn terrain_is_empty_high_and_full_deep() {
        let generator = generator(GeneratorSettings::terrain(), 16);
        // y in 208..224, above base height + amplitude
        let sky = generator.generate(Point3::new(0, 13, 0)).unwrap();
        assert!(sky.voxels().iter().all(|v| v.value == 0));
        // y in -320..-304, far below any surface
        let bedrock = generator.generate(Point3::new(0, -20, 0)).unwrap();
        assert!(bedrock.voxels().iter().all(|v| v.value == 255));
    }

    #[test]
    fn generate_chunk_uses_requested_variants() {
        let seed = Seed(1337);
        let position = Point3::new(2, 0, -1);
        let chunk =
            generate_chunk(seed, GeneratorMode::Terrain, ColorScheme::BandedGradient, position, 4)
                .unwrap();
        let settings = GeneratorSettings {
            mode: GeneratorMode::Terrain,
            color_scheme: ColorScheme::BandedGradient,
            ..GeneratorSettings::default()
        };
        let expected = ChunkGenerator::new(seed, 4, settings).unwrap().generate(position).unwrap();
        assert_eq!(chunk, expected);
    }
}
