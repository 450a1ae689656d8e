//! # Task Management System
//!
//! This module provides a worker pool that runs tasks, chiefly chunk generation, on
//! background threads (native) or web workers (WASM).
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, applied to the `World`
//! - `TaskChannel`: Communication channel between the owning thread and one worker
//!
//! ## Scheduling
//!
//! Each worker has at most `MAX_TASKS_IN_FLIGHT` tasks at a time. Tasks are handed out
//! round-robin to idle workers; when every worker is busy they wait in a FIFO queue
//! until `process_queued_tasks()` finds a free worker.
//!
//! ## Lost Workers
//!
//! A worker whose thread exits (a task panicked) disconnects its channel. The channel
//! is skipped from then on, the `abandoned()` results of its in-flight tasks are handled
//! in place of the real ones, and the channel is dropped from the pool.
//!
//! ## Example Usage
//! ```rust
//! use std::sync::Arc;
//! use cgmath::Point3;
//! use voxel_worldgen::{
//!     config::GeneratorSettings,
//!     task_management::TaskManager,
//!     worldgen::{chunk::ChunkGenerator, seed::Seed, world::World},
//! };
//!
//! let generator = ChunkGenerator::new(Seed(1337), 8, GeneratorSettings::default()).unwrap();
//! let mut world = World::new(Arc::new(generator));
//! let mut task_manager = TaskManager::new(2);
//!
//! world.request_chunk(Point3::new(0, 0, 0), &mut task_manager);
//! task_manager.wait_for_all(&mut world);
//! assert!(world.get_chunk_at(Point3::new(0, 0, 0)).is_some());
//! ```

pub mod task;

use log::{info, warn};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use task::{Task, TaskResult};

use crate::worldgen::world::World;

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        use wasm_thread as thread;
        use wasm_thread::JoinHandle;
    } else {
        use std::thread::{self, JoinHandle};
    }
}

/// A communication channel between the owning thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `in_flight`: Abandoned results of the tasks the worker is processing, oldest first
/// - `connected`: Cleared once the worker is found to have exited
/// - `_worker`: Handle to the worker thread
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    in_flight: VecDeque<Box<dyn TaskResult + Send>>,
    connected: bool,
    _worker: JoinHandle<()>,
}

impl TaskChannel {
    /// Marks the worker as gone and handles the abandoned results of its tasks.
    fn disconnect(&mut self, idx: usize, world: &mut World) {
        warn!(
            "Worker {} disconnected with {} tasks in flight",
            idx,
            self.in_flight.len()
        );
        self.connected = false;
        for abandoned in self.in_flight.drain(..) {
            abandoned.handle_result(world);
        }
    }
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// Workers exit once the manager is dropped and their task channel disconnects.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to spawn
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::spawn(task_closure);

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                in_flight: VecDeque::with_capacity(MAX_TASKS_IN_FLIGHT),
                connected: true,
                _worker: worker,
            });
        }

        info!("Task manager started with {} workers", num_workers);

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Creates a `TaskManager` with one worker per available hardware thread,
    /// falling back to a single worker when that cannot be determined.
    pub fn with_available_parallelism() -> Self {
        let parallelism = thread::available_parallelism();
        info!("Available parallelism: {:?}", parallelism);
        Self::new(parallelism.map(|n| n.get()).unwrap_or(1))
    }

    /// Number of workers still accepting tasks.
    pub fn num_workers(&self) -> usize {
        self.channels.iter().filter(|channel| channel.connected).count()
    }

    /// Number of tasks waiting for a free worker.
    pub fn num_queued_tasks(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Number of tasks currently being processed by workers.
    pub fn num_tasks_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.in_flight.len())
            .sum()
    }

    /// Whether no task is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.num_tasks_in_flight() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// A failed send marks the channel as disconnected so it is not picked again.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the send failed (e.g., worker disconnected)
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        let channel = &mut self.channels[channel_idx];
        let abandoned = task.abandoned();
        match channel.task_sender.send(task) {
            Ok(_) => {
                channel.in_flight.push_back(abandoned);
                self.current_channel = (channel_idx + 1) % self.channels.len();
                Ok(())
            }
            Err(task) => {
                warn!("Worker {} disconnected, task not sent", channel_idx);
                channel.connected = false;
                Err(task.0)
            }
        }
    }

    /// Finds an available worker channel using round-robin from the last used channel.
    ///
    /// # Returns
    /// - `Some(usize)` index of a connected channel below `MAX_TASKS_IN_FLIGHT`
    /// - `None` if all channels are busy or disconnected, or there are no channels
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let count = self.channels.len();
        (0..count)
            .map(|offset| (self.current_channel + offset) % count)
            .find(|&idx| {
                let channel = &self.channels[idx];
                channel.connected && channel.in_flight.len() < MAX_TASKS_IN_FLIGHT
            })
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, mut task: Box<dyn Task + Send>) -> bool {
        while let Some(channel_idx) = self.find_available_channel() {
            match self.try_send_task(task, channel_idx) {
                Ok(_) => return true,
                Err(returned) => task = returned,
            }
        }
        self.queued_tasks.push_back(task);
        false
    }

    /// Moves queued tasks onto workers, oldest first, until the queue is empty or
    /// every worker is busy.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            if let Err(task) = self.try_send_task(task, channel_idx) {
                // The channel is now marked disconnected; retry the task elsewhere
                self.queued_tasks.push_front(task);
            }
        }
    }

    /// Applies every result that workers have finished so far, without blocking.
    pub fn process_completed_tasks(&mut self, world: &mut World) {
        for (idx, channel) in self.channels.iter_mut().enumerate() {
            loop {
                match channel.result_receiver.try_recv() {
                    Ok(result) => {
                        channel.in_flight.pop_front();
                        result.handle_result(world);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        channel.disconnect(idx, world);
                        break;
                    }
                }
            }
        }
        self.prune_disconnected();
    }

    /// Blocks until every queued and in-flight task has been processed and applied.
    ///
    /// Tasks that cannot be sent to any worker (the pool is empty or every worker has
    /// exited) stay queued.
    pub fn wait_for_all(&mut self, world: &mut World) {
        loop {
            self.process_queued_tasks();
            if self.num_tasks_in_flight() == 0 {
                break;
            }

            for (idx, channel) in self.channels.iter_mut().enumerate() {
                if channel.in_flight.is_empty() {
                    continue;
                }
                match channel.result_receiver.recv() {
                    Ok(result) => {
                        channel.in_flight.pop_front();
                        result.handle_result(world);
                    }
                    Err(_) => channel.disconnect(idx, world),
                }
            }
            self.prune_disconnected();
        }
    }

    /// Drops channels whose worker has exited and whose in-flight tasks were handled.
    fn prune_disconnected(&mut self) {
        self.channels
            .retain(|channel| channel.connected || !channel.in_flight.is_empty());
        if self.current_channel >= self.channels.len() {
            self.current_channel = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::{
        config::GeneratorSettings,
        worldgen::{chunk::ChunkGenerator, seed::Seed},
    };

    /// Counts completed runs, or panics on its worker when `fail` is set.
    struct CountingTask {
        completed: Arc<AtomicUsize>,
        abandoned: Arc<AtomicUsize>,
        fail: bool,
    }

    struct CountingResult {
        counter: Arc<AtomicUsize>,
    }

    impl CountingTask {
        fn boxed(
            completed: &Arc<AtomicUsize>,
            abandoned: &Arc<AtomicUsize>,
            fail: bool,
        ) -> Box<dyn Task + Send> {
            Box::new(CountingTask {
                completed: completed.clone(),
                abandoned: abandoned.clone(),
                fail,
            })
        }
    }

    impl Task for CountingTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            if self.fail {
                panic!("task failed on purpose");
            }
            Box::new(CountingResult {
                counter: self.completed.clone(),
            })
        }

        fn abandoned(&self) -> Box<dyn TaskResult + Send> {
            Box::new(CountingResult {
                counter: self.abandoned.clone(),
            })
        }
    }

    impl TaskResult for CountingResult {
        fn handle_result(self: Box<Self>, _world: &mut World) {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn world() -> World {
        let generator = ChunkGenerator::new(Seed(3), 2, GeneratorSettings::default()).unwrap();
        World::new(Arc::new(generator))
    }

    fn counters() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)))
    }

    #[test]
    fn busy_workers_queue_tasks() {
        let (completed, abandoned) = counters();
        let mut task_manager = TaskManager::new(2);
        let mut world = world();

        let scheduled: Vec<bool> = (0..5)
            .map(|_| task_manager.publish_task(CountingTask::boxed(&completed, &abandoned, false)))
            .collect();
        assert_eq!(scheduled, vec![true, true, false, false, false]);
        assert_eq!(task_manager.num_queued_tasks(), 3);

        task_manager.wait_for_all(&mut world);
        assert_eq!(completed.load(Ordering::SeqCst), 5);
        assert_eq!(abandoned.load(Ordering::SeqCst), 0);
        assert!(task_manager.is_idle());
    }

    #[test]
    fn lost_worker_is_dropped_and_queue_drains_elsewhere() {
        let (completed, abandoned) = counters();
        let mut task_manager = TaskManager::new(2);
        let mut world = world();

        task_manager.publish_task(CountingTask::boxed(&completed, &abandoned, true));
        for _ in 0..6 {
            task_manager.publish_task(CountingTask::boxed(&completed, &abandoned, false));
        }
        task_manager.wait_for_all(&mut world);

        assert_eq!(completed.load(Ordering::SeqCst), 6);
        assert_eq!(abandoned.load(Ordering::SeqCst), 1);
        assert_eq!(task_manager.num_workers(), 1);
        assert!(task_manager.is_idle());

        // The surviving worker keeps taking new tasks.
        assert!(task_manager.publish_task(CountingTask::boxed(&completed, &abandoned, false)));
        task_manager.wait_for_all(&mut world);
        assert_eq!(completed.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn losing_every_worker_keeps_tasks_queued() {
        let (completed, abandoned) = counters();
        let mut task_manager = TaskManager::new(1);
        let mut world = world();

        task_manager.publish_task(CountingTask::boxed(&completed, &abandoned, true));
        task_manager.publish_task(CountingTask::boxed(&completed, &abandoned, false));
        task_manager.wait_for_all(&mut world);

        assert_eq!(abandoned.load(Ordering::SeqCst), 1);
        assert_eq!(task_manager.num_workers(), 0);
        assert_eq!(task_manager.num_queued_tasks(), 1);
        assert_eq!(completed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn no_workers_keeps_tasks_queued() {
        let (completed, abandoned) = counters();
        let mut task_manager = TaskManager::new(0);
        let mut world = world();

        assert!(!task_manager.publish_task(CountingTask::boxed(&completed, &abandoned, false)));
        task_manager.wait_for_all(&mut world);
        assert_eq!(task_manager.num_queued_tasks(), 1);
        assert_eq!(completed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn completed_tasks_are_applied_without_blocking() {
        let (completed, abandoned) = counters();
        let mut task_manager = TaskManager::new(1);
        let mut world = world();

        task_manager.publish_task(CountingTask::boxed(&completed, &abandoned, false));
        while !task_manager.is_idle() {
            task_manager.process_completed_tasks(&mut world);
            thread::yield_now();
        }
        assert_eq!(completed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn available_parallelism_spawns_workers() {
        assert!(TaskManager::with_available_parallelism().num_workers() >= 1);
    }
}
