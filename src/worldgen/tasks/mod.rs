//! # World Generation Tasks
//!
//! Tasks that run chunk generation on the worker pool, one chunk per task.

pub mod chunk_generation_task;
