//! # World Module
//!
//! This module provides the `World` struct, which owns the generated chunk buffers of a
//! world and tracks which chunks are still being generated.
//!
//! ## Architecture
//!
//! The world uses sparse storage: only chunks that have been requested are kept. Chunks
//! are generated either synchronously with [`World::add_chunk_at`] or on a worker pool
//! with [`World::request_chunk`]. Requests for a chunk that is already stored or already
//! in flight are ignored, so a chunk is never generated twice.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use cgmath::Point3;

use crate::error::Result;
use crate::task_management::TaskManager;

use super::chunk::{ChunkBuffer, ChunkGenerator};
use super::tasks::chunk_generation_task::ChunkGenerationTask;

/// A voxel world composed of generated chunks.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cgmath::Point3;
/// use voxel_worldgen::{
///     config::GeneratorSettings,
///     worldgen::{chunk::ChunkGenerator, seed::Seed, world::World},
/// };
///
/// let generator = ChunkGenerator::new(Seed(42), 4, GeneratorSettings::default()).unwrap();
/// let mut world = World::new(Arc::new(generator));
///
/// world.add_chunk_at(Point3::new(0, 0, 0)).unwrap();
/// assert!(world.get_chunk_at(Point3::new(0, 0, 0)).is_some());
/// ```
pub struct World {
    /// Generator shared with every chunk generation task.
    generator: Arc<ChunkGenerator>,
    /// Generated chunks keyed by chunk coordinates.
    chunks: HashMap<Point3<i32>, ChunkBuffer>,
    /// Chunks published to a worker pool and not yet returned.
    loading: HashSet<Point3<i32>>,
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Arguments
    /// * `generator` - Generator used for every chunk of this world
    pub fn new(generator: Arc<ChunkGenerator>) -> Self {
        World {
            generator,
            chunks: HashMap::new(),
            loading: HashSet::new(),
        }
    }

    /// The generator of this world.
    pub fn generator(&self) -> &Arc<ChunkGenerator> {
        &self.generator
    }

    /// Generates the chunk at `position` on the calling thread, unless it already exists.
    pub fn add_chunk_at(&mut self, position: Point3<i32>) -> Result<()> {
        if self.chunks.contains_key(&position) {
            return Ok(());
        }
        let chunk = self.generator.generate(position)?;
        self.insert_chunk(chunk);
        Ok(())
    }

    /// Publishes a generation task for the chunk at `position`.
    ///
    /// # Returns
    /// `false` if the chunk is already stored or already being generated.
    pub fn request_chunk(&mut self, position: Point3<i32>, task_manager: &mut TaskManager) -> bool {
        if self.chunks.contains_key(&position) || !self.loading.insert(position) {
            return false;
        }
        task_manager.publish_task(Box::new(ChunkGenerationTask::new(
            self.generator.clone(),
            position,
        )));
        true
    }

    /// Stores a generated chunk and clears its loading flag.
    pub fn insert_chunk(&mut self, chunk: ChunkBuffer) {
        self.loading.remove(&chunk.position());
        self.chunks.insert(chunk.position(), chunk);
    }

    /// Clears the loading flag of a chunk whose generation failed, so it can be requested again.
    pub fn cancel_loading(&mut self, position: Point3<i32>) {
        self.loading.remove(&position);
    }

    /// Whether the chunk at `position` has been published and not yet returned.
    pub fn is_loading(&self, position: Point3<i32>) -> bool {
        self.loading.contains(&position)
    }

    /// The chunk at `position`, if it has been generated.
    pub fn get_chunk_at(&self, position: Point3<i32>) -> Option<&ChunkBuffer> {
        self.chunks.get(&position)
    }

    /// Removes and returns the chunk at `position`, handing ownership to the caller.
    pub fn take_chunk_at(&mut self, position: Point3<i32>) -> Option<ChunkBuffer> {
        self.chunks.remove(&position)
    }

    /// Iterates all generated chunks in arbitrary order.
    pub fn chunks(&self) -> impl Iterator<Item = &ChunkBuffer> {
        self.chunks.values()
    }

    /// Number of generated chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk has been generated yet.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
