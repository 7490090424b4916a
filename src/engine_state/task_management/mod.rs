//! # Task Management System
//!
//! Background execution for work that must not stall the main loop.
//!
//! ## Architecture Overview
//! - [`Task`]: A unit of work that runs on a worker thread
//! - [`TaskChannel`]: A dedicated worker thread plus the channels that feed it
//!   tasks and carry results back
//! - [`UpdatePipeline`]: Runs at most one chunk update at a time and coalesces
//!   requests that arrive while one is running
//!
//! ## Task Lifecycle
//! 1. The main thread sends a task with [`TaskChannel::try_send`]
//! 2. The worker receives it, calls `process()`, and sends the output back
//! 3. The main thread polls with [`TaskChannel::try_recv`], never blocking
//!
//! A worker that panics takes its channel down with it. The main thread notices
//! on the next poll as [`StreamingError::WorkerDisconnected`].

pub mod task;
pub mod update_pipeline;

use std::{
    sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError},
    thread::{self, JoinHandle},
    time::Duration,
};

pub use task::Task;
pub use update_pipeline::{CompletedUpdate, PipelineState, SubmitOutcome, UpdatePipeline};

use crate::error::{Result, StreamingError};

/// A communication channel between the main thread and one worker thread.
///
/// # Implementation Notes
/// - Backed by one OS thread
/// - Uses MPSC (multi-producer, single-consumer) channels in both directions
/// - Dropping the channel hangs up on the worker and joins it
#[derive(Debug)]
pub struct TaskChannel<T: Task> {
    task_sender: Option<Sender<T>>,
    result_receiver: Receiver<T::Output>,
    num_tasks_in_flight: usize,
    worker: Option<JoinHandle<()>>,
}

impl<T: Task> TaskChannel<T> {
    /// Starts a named worker thread.
    ///
    /// # Errors
    /// [`StreamingError::WorkerSpawn`] if the thread could not be created.
    pub fn spawn(name: &str) -> Result<Self> {
        let (task_tx, task_rx) = channel::<T>();
        let (result_tx, result_rx) = channel::<T::Output>();

        let task_closure = move || {
            while let Ok(task) = task_rx.recv() {
                let result = task.process();
                if result_tx.send(result).is_err() {
                    break;
                }
            }
        };

        let worker = thread::Builder::new()
            .name(name.to_owned())
            .spawn(task_closure)
            .map_err(StreamingError::WorkerSpawn)?;

        log::info!("Spawned worker thread {:?}", name);

        Ok(TaskChannel {
            task_sender: Some(task_tx),
            result_receiver: result_rx,
            num_tasks_in_flight: 0,
            worker: Some(worker),
        })
    }

    /// Number of tasks sent whose results have not been received yet.
    pub fn in_flight(&self) -> usize {
        self.num_tasks_in_flight
    }

    /// Sends a task to the worker.
    ///
    /// # Errors
    /// [`StreamingError::WorkerDisconnected`] if the worker has exited.
    pub fn try_send(&mut self, task: T) -> Result<()> {
        let sender = self
            .task_sender
            .as_ref()
            .ok_or(StreamingError::WorkerDisconnected)?;
        sender
            .send(task)
            .map_err(|_| StreamingError::WorkerDisconnected)?;
        self.num_tasks_in_flight += 1;
        Ok(())
    }

    /// Returns a finished result if one is waiting, without blocking.
    ///
    /// # Errors
    /// [`StreamingError::WorkerDisconnected`] if the worker exited with work
    /// still in flight.
    pub fn try_recv(&mut self) -> Result<Option<T::Output>> {
        match self.result_receiver.try_recv() {
            Ok(result) => {
                self.num_tasks_in_flight -= 1;
                Ok(Some(result))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(StreamingError::WorkerDisconnected),
        }
    }

    /// Waits up to `timeout` for a finished result.
    ///
    /// # Errors
    /// [`StreamingError::WorkerDisconnected`] if the worker exited with work
    /// still in flight.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<T::Output>> {
        match self.result_receiver.recv_timeout(timeout) {
            Ok(result) => {
                self.num_tasks_in_flight -= 1;
                Ok(Some(result))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(StreamingError::WorkerDisconnected),
        }
    }
}

impl<T: Task> Drop for TaskChannel<T> {
    fn drop(&mut self) {
        // Hanging up ends the worker's receive loop once its current task is done.
        self.task_sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Worker thread panicked");
            }
        }
    }
}
