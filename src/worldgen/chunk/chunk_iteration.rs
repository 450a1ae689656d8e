//! # Chunk Iteration Module
//!
//! This module provides an iterator over the world-space positions of every voxel in
//! a chunk, in the order their records appear in a chunk buffer.
//!
//! ## Order
//!
//! X is the innermost axis, then Y, then Z. Iteration starts at the chunk's minimum
//! corner and ends at `origin + (size - 1)` on every axis, so the n-th position yielded
//! belongs to the n-th voxel record.

use cgmath::Point3;

/// An iterator over the world positions of a chunk's voxels.
pub struct ChunkPositionIterator {
    /// World position of the chunk's minimum corner
    origin: Point3<i32>,
    /// Edge length of the chunk
    size: u32,
    /// Current X offset within the chunk (0..size)
    local_x: u32,
    /// Current Y offset within the chunk (0..size)
    local_y: u32,
    /// Current Z offset within the chunk (0..size), equal to `size` once exhausted
    local_z: u32,
}

impl ChunkPositionIterator {
    /// Creates an iterator over a chunk of edge length `size` starting at `origin`.
    ///
    /// # Arguments
    /// * `origin` - World position of the chunk's minimum corner
    /// * `size` - Edge length in voxels
    pub fn new(origin: Point3<i32>, size: u8) -> Self {
        ChunkPositionIterator {
            origin,
            size: size as u32,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    fn remaining(&self) -> usize {
        let size = self.size as usize;
        if self.local_z as usize >= size {
            return 0;
        }
        let plane = size * size;
        let consumed = self.local_z as usize * plane + self.local_y as usize * size + self.local_x as usize;
        size * plane - consumed
    }
}

impl Iterator for ChunkPositionIterator {
    type Item = Point3<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.local_z >= self.size {
            return None;
        }

        let position = Point3::new(
            self.origin.x + self.local_x as i32,
            self.origin.y + self.local_y as i32,
            self.origin.z + self.local_z as i32,
        );

        // Advance x, carrying into y and then z at the end of each row and plane
        self.local_x += 1;
        if self.local_x == self.size {
            self.local_x = 0;
            self.local_y += 1;
            if self.local_y == self.size {
                self.local_y = 0;
                self.local_z += 1;
            }
        }

        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkPositionIterator {}
