//! # Error Module
//!
//! Errors surfaced by chunk generation and configuration loading.
//!
//! Generation itself has no failure modes once its inputs are valid, so apart from
//! [`WorldgenError::WorkerLost`] every variant is an input validation error raised before
//! the first voxel is written.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the world generator.
#[derive(Debug, Error)]
pub enum WorldgenError {
    /// A selector, setting or config file was rejected.
    ///
    /// This covers unknown generator modes and color schemes (by name or by number),
    /// a chunk size of zero and out-of-range fractal settings.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A caller-supplied output buffer does not hold exactly one chunk.
    #[error("output buffer holds {actual} bytes but the chunk needs {expected}")]
    BufferSizeMismatch {
        /// Bytes required for the chunk (`4 * size³`).
        expected: usize,
        /// Bytes actually provided.
        actual: usize,
    },

    /// The voxel range of a chunk does not fit in 32-bit world coordinates.
    #[error("chunk ({x}, {y}, {z}) lies outside the addressable voxel space")]
    CoordinateOutOfRange {
        /// Chunk-space X.
        x: i32,
        /// Chunk-space Y.
        y: i32,
        /// Chunk-space Z.
        z: i32,
    },

    /// The worker running a generation task exited before returning its result.
    #[error("worker exited before finishing chunk ({x}, {y}, {z})")]
    WorkerLost {
        /// Chunk-space X.
        x: i32,
        /// Chunk-space Y.
        y: i32,
        /// Chunk-space Z.
        z: i32,
    },

    /// A config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl WorldgenError {
    /// Shorthand for building an [`WorldgenError::InvalidConfiguration`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        WorldgenError::InvalidConfiguration(message.into())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, WorldgenError>;
