//! # World Generation
//!
//! This module contains the chunk generation algorithm and the pieces it is composed of.
//!
//! ## Architecture
//!
//! The generator is organised leaves first:
//!
//! * **NoiseSampler**: seeded fractal noise, sampled at real coordinates
//! * **Density**: maps a noise sample to the 8-bit `value` byte (`default` or `terrain`)
//! * **Color**: maps a second noise sample to RGB (`hsv-wheel` or `banded-gradient`)
//! * **Chunk**: runs both over every voxel of a chunk and writes the output buffer
//! * **World / Tasks**: keep generated chunks and move generation onto worker threads
//!
//! ## Determinism
//!
//! A chunk is a pure function of the seed, chunk coordinates, chunk size and generator
//! settings. No voxel depends on another, so chunks, and voxels within them, can be
//! generated in any order and on any thread.

pub mod chunk;
pub mod color;
pub mod density;
pub mod noise_sampler;
pub mod seed;
pub mod tasks;
pub mod voxel;
pub mod world;
