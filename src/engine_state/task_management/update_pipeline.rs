//! # Update Pipeline
//!
//! Runs chunk updates on a background worker one at a time.
//!
//! ```text
//!        submit            result received
//! Idle ─────────► Running ─────────────────► Idle
//!                   │  ▲
//!            submit │  │ (coalesced: rerun_requested = true)
//!                   └──┘
//! ```
//!
//! A request that arrives while a run is in flight is not queued. It only sets
//! `rerun_requested`, which is handed back with the finished run so the caller
//! can submit one fresh snapshot built from its latest state. Only whole results
//! are ever handed back.

use std::time::Duration;

use crate::{
    engine_state::{task_management::Task, voxels::tasks::ChunkUpdateTask},
    error::Result,
};

use super::TaskChannel;

/// Name of the worker thread behind an [`UpdatePipeline`].
pub const UPDATE_WORKER_NAME: &str = "chunk-update";

/// Whether a run is in flight.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// No run in flight.
    Idle,
    /// A run was sent to the worker and has not come back yet.
    Running,
}

/// What [`UpdatePipeline::submit`] did with a request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new run was started.
    Started,
    /// A run was already in flight; the request was folded into a rerun.
    Coalesced,
}

/// A finished run.
#[derive(Debug)]
pub struct CompletedUpdate<R> {
    /// The worker's output.
    pub result: R,
    /// At least one request arrived while this run was in flight.
    pub rerun_requested: bool,
}

/// Single-slot, coalescing front end to a background worker.
pub struct UpdatePipeline<T: Task = ChunkUpdateTask> {
    channel: TaskChannel<T>,
    state: PipelineState,
    rerun_requested: bool,
    runs_started: u64,
    runs_completed: u64,
}

impl<T: Task> UpdatePipeline<T> {
    /// Starts the worker thread.
    ///
    /// # Errors
    /// [`crate::StreamingError::WorkerSpawn`] if the thread could not be created.
    pub fn new() -> Result<Self> {
        Ok(UpdatePipeline {
            channel: TaskChannel::spawn(UPDATE_WORKER_NAME)?,
            state: PipelineState::Idle,
            rerun_requested: false,
            runs_started: 0,
            runs_completed: 0,
        })
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Returns `true` if no run is in flight.
    pub fn is_idle(&self) -> bool {
        self.state == PipelineState::Idle
    }

    /// Whether a request has been coalesced into the current run.
    pub fn rerun_requested(&self) -> bool {
        self.rerun_requested
    }

    /// Number of runs sent to the worker.
    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Number of runs whose results came back.
    pub fn runs_completed(&self) -> u64 {
        self.runs_completed
    }

    /// Requests a run.
    ///
    /// `snapshot` is only called when a run actually starts, so coalesced
    /// requests never pay for building one.
    ///
    /// # Errors
    /// [`crate::StreamingError::WorkerDisconnected`] if the worker is gone.
    pub fn submit(&mut self, snapshot: impl FnOnce() -> T) -> Result<SubmitOutcome> {
        match self.state {
            PipelineState::Running => {
                if !self.rerun_requested {
                    log::debug!("Update in flight, coalescing request");
                }
                self.rerun_requested = true;
                Ok(SubmitOutcome::Coalesced)
            }
            PipelineState::Idle => {
                self.channel.try_send(snapshot())?;
                self.state = PipelineState::Running;
                self.runs_started += 1;
                Ok(SubmitOutcome::Started)
            }
        }
    }

    /// Returns the finished run, if any, without blocking.
    ///
    /// # Errors
    /// [`crate::StreamingError::WorkerDisconnected`] if the worker died mid-run.
    pub fn poll(&mut self) -> Result<Option<CompletedUpdate<T::Output>>> {
        if self.is_idle() {
            return Ok(None);
        }
        let result = self.channel.try_recv();
        self.finish(result)
    }

    /// Waits up to `timeout` for the running run to finish.
    ///
    /// # Errors
    /// [`crate::StreamingError::WorkerDisconnected`] if the worker died mid-run.
    pub fn wait(&mut self, timeout: Duration) -> Result<Option<CompletedUpdate<T::Output>>> {
        if self.is_idle() {
            return Ok(None);
        }
        let result = self.channel.recv_timeout(timeout);
        self.finish(result)
    }

    fn finish(
        &mut self,
        result: Result<Option<T::Output>>,
    ) -> Result<Option<CompletedUpdate<T::Output>>> {
        let output = match result {
            Ok(Some(output)) => output,
            Ok(None) => return Ok(None),
            Err(error) => {
                self.state = PipelineState::Idle;
                self.rerun_requested = false;
                return Err(error);
            }
        };

        self.state = PipelineState::Idle;
        self.runs_completed += 1;
        Ok(Some(CompletedUpdate {
            result: output,
            rerun_requested: std::mem::take(&mut self.rerun_requested),
        }))
    }
}
