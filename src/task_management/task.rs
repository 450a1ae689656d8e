//! # Task System Core Traits
//!
//! This module defines the building blocks of the task system, which moves chunk
//! generation off the calling thread.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. Before it is sent, the manager keeps the task's `abandoned()` result aside
//! 3. The task's `process()` method is called on a worker thread
//! 4. The task returns a boxed `TaskResult`
//! 5. The result's `handle_result()` is called on the owning thread with the `World`.
//!    If the worker exits first, the abandoned result is handled instead.
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - `TaskResult` must be `Send` to be transferred back
//! - Tasks own their inputs; nothing mutable is shared between workers

use crate::worldgen::world::World;

/// A unit of work executed on a worker thread.
///
/// Tasks should be self-contained and own all the data they need. Chunk generation
/// tasks, for example, hold a shared immutable generator and the chunk coordinates.
pub trait Task: Send {
    /// Processes the task on a worker thread.
    ///
    /// # Returns
    /// A boxed `TaskResult` that will be handled on the thread owning the `World`.
    fn process(&self) -> Box<dyn TaskResult + Send>;

    /// The result to apply if the worker exits without finishing this task.
    fn abandoned(&self) -> Box<dyn TaskResult + Send>;
}

/// The outcome of a processed `Task`.
pub trait TaskResult: Send {
    /// Applies the result to the world.
    ///
    /// # Arguments
    /// * `world` - The world owning generated chunk data
    fn handle_result(self: Box<Self>, world: &mut World);
}
