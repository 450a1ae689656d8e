//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which generates one chunk on a
//! worker thread, and its result, which stores the chunk in the `World`.

use std::sync::Arc;

use cgmath::Point3;
use log::warn;

use crate::{
    error::{Result, WorldgenError},
    task_management::task::{Task, TaskResult},
    worldgen::{
        chunk::{ChunkBuffer, ChunkGenerator},
        world::World,
    },
};

/// A task that generates the chunk at one position.
pub struct ChunkGenerationTask {
    /// The generator shared by all tasks of a world
    generator: Arc<ChunkGenerator>,
    /// The position of the chunk to generate (in chunk coordinates)
    position: Point3<i32>,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `generator` - The world's generator
    /// * `position` - The chunk coordinates of the chunk to generate
    pub fn new(generator: Arc<ChunkGenerator>, position: Point3<i32>) -> Self {
        ChunkGenerationTask {
            generator,
            position,
        }
    }
}

impl Task for ChunkGenerationTask {
    /// Generates the chunk. The generator builds a fresh noise sampler for this call.
    fn process(&self) -> Box<dyn TaskResult + Send> {
        Box::new(ChunkGenerationTaskResult {
            position: self.position,
            chunk: self.generator.generate(self.position),
        })
    }

    fn abandoned(&self) -> Box<dyn TaskResult + Send> {
        let Point3 { x, y, z } = self.position;
        Box::new(ChunkGenerationTaskResult {
            position: self.position,
            chunk: Err(WorldgenError::WorkerLost { x, y, z }),
        })
    }
}

/// The outcome of a chunk generation task.
pub struct ChunkGenerationTaskResult {
    /// The chunk coordinates that were requested
    position: Point3<i32>,
    /// The generated chunk, or why it could not be generated
    chunk: Result<ChunkBuffer>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Stores the chunk in the world, or clears its loading flag on failure.
    fn handle_result(self: Box<Self>, world: &mut World) {
        match self.chunk {
            Ok(chunk) => world.insert_chunk(chunk),
            Err(error) => {
                warn!(
                    "Failed to generate chunk ({}, {}, {}): {}",
                    self.position.x, self.position.y, self.position.z, error
                );
                world.cancel_loading(self.position);
            }
        }
    }
}
