//! # Engine State Module
//!
//! The foreground half of chunk streaming.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the published active set and drives everything else
//! * `config` - Streaming settings
//! * `rendering` - Vertex format, meshing and the render surface seam
//! * `task_management` - The background worker and the coalescing update pipeline
//! * `viewer` - Chunk boundary detection for the viewer position
//! * `voxels` - Blocks, chunks, the active set, neighbour lookup, terrain and the window policy
//!
//! ## Frame Loop
//!
//! 1. [`EngineState::update_viewer_position`] samples the viewer. Crossing into a
//!    new chunk requests an update.
//! 2. [`EngineState::process_tasks`] polls the pipeline. A finished update is
//!    applied to the render surface and swapped in as the new active set in one
//!    step; if requests arrived meanwhile, one fresh update is started right away.
//!
//! Neither step blocks on the background worker.

use std::time::Duration;

use cgmath::Point3;
use web_time::Instant;

use crate::error::Result;

pub mod config;
pub mod rendering;
pub mod task_management;
pub mod viewer;
pub mod voxels;

use config::StreamingConfig;
use rendering::{MeshRegistry, RenderSurface, SyncStats};
use task_management::{CompletedUpdate, SubmitOutcome, UpdatePipeline};
use viewer::ViewerState;
use voxels::{
    tasks::{ChunkUpdateResult, ChunkUpdateTask},
    world::ActiveSet,
};

/// The main state container for chunk streaming.
///
/// # Examples
///
/// ```no_run
/// use voxel_streaming::{EngineState, HeadlessSurface, StreamingConfig};
///
/// let mut engine = EngineState::new(StreamingConfig::default(), HeadlessSurface::new())?;
///
/// // Main loop
/// loop {
///     engine.update_viewer_position(cgmath::Point3::new(40.0, 100.0, -12.0))?;
///     engine.process_tasks()?;
/// }
/// # Ok::<(), voxel_streaming::StreamingError>(())
/// ```
pub struct EngineState<S: RenderSurface> {
    config: StreamingConfig,
    seed: u32,
    viewer: ViewerState,
    active_chunks: ActiveSet,
    pipeline: UpdatePipeline,
    registry: MeshRegistry<S::Handle>,
    surface: S,
    updates_published: u64,
}

impl<S: RenderSurface> EngineState<S> {
    /// Creates an engine with the viewer at the world origin and starts the
    /// first update.
    ///
    /// # Errors
    /// - [`crate::StreamingError::InvalidConfig`] if the configuration is unusable
    /// - [`crate::StreamingError::WorkerSpawn`] if the worker could not start
    pub fn new(config: StreamingConfig, surface: S) -> Result<Self> {
        Self::with_viewer(config, surface, Point3::new(0.0, 0.0, 0.0))
    }

    /// Creates an engine with the viewer at `position` and starts the first update.
    ///
    /// # Errors
    /// See [`EngineState::new`].
    pub fn with_viewer(config: StreamingConfig, surface: S, position: Point3<f32>) -> Result<Self> {
        config.validate()?;
        let seed = config.resolve_seed();
        log::info!(
            "Starting chunk streaming: render distance {}, seed {}, block size {}",
            config.render_distance,
            seed,
            config.block_size
        );

        let mut engine = EngineState {
            viewer: ViewerState::new(position, config.block_size),
            seed,
            config,
            active_chunks: ActiveSet::new(),
            pipeline: UpdatePipeline::new()?,
            registry: MeshRegistry::new(),
            surface,
            updates_published: 0,
        };
        engine.request_update()?;
        Ok(engine)
    }

    /// The configuration the engine was started with.
    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// The world seed in use, drawn at random if the configuration had none.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The viewer's last sampled state.
    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    /// The most recently published active set.
    pub fn active_chunks(&self) -> &ActiveSet {
        &self.active_chunks
    }

    /// The render surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The registry of attached meshes.
    pub fn registry(&self) -> &MeshRegistry<S::Handle> {
        &self.registry
    }

    /// Returns `true` if no update is in flight.
    pub fn is_idle(&self) -> bool {
        self.pipeline.is_idle()
    }

    /// Number of updates published so far.
    pub fn updates_published(&self) -> u64 {
        self.updates_published
    }

    /// Samples the viewer position; call once per frame.
    ///
    /// # Returns
    /// `true` if the viewer crossed into another chunk and an update was requested.
    ///
    /// # Errors
    /// [`crate::StreamingError::WorkerDisconnected`] if the worker is gone.
    pub fn update_viewer_position(&mut self, position: Point3<f32>) -> Result<bool> {
        if !self.viewer.update(position) {
            return Ok(false);
        }
        self.request_update()?;
        Ok(true)
    }

    /// Applies a finished update, if there is one. Never blocks.
    ///
    /// # Returns
    /// `true` if an update was published.
    ///
    /// # Errors
    /// [`crate::StreamingError::WorkerDisconnected`] if the worker died.
    pub fn process_tasks(&mut self) -> Result<bool> {
        match self.pipeline.poll()? {
            Some(completed) => {
                self.complete(completed)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Blocks until no update is in flight or `timeout` elapses, publishing
    /// every update that finishes meanwhile.
    ///
    /// # Returns
    /// `true` if the pipeline is idle.
    ///
    /// # Errors
    /// [`crate::StreamingError::WorkerDisconnected`] if the worker died.
    pub fn wait_for_idle(&mut self, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        while !self.pipeline.is_idle() {
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            if let Some(completed) = self.pipeline.wait(deadline - now)? {
                self.complete(completed)?;
            }
        }
        Ok(true)
    }

    /// Detaches every mesh from the surface and hands the surface back.
    pub fn shutdown(mut self) -> S {
        let detached = self.registry.clear(&mut self.surface);
        log::info!("Shut down chunk streaming, detached {} meshes", detached);
        self.surface
    }

    fn request_update(&mut self) -> Result<SubmitOutcome> {
        let active_chunks = &self.active_chunks;
        let viewer_chunk = self.viewer.chunk();
        let config = &self.config;
        let seed = self.seed;

        self.pipeline.submit(|| ChunkUpdateTask {
            active_chunks: active_chunks.clone(),
            viewer_chunk,
            render_distance: config.render_distance,
            seed,
            block_size: config.block_size,
        })
    }

    fn complete(&mut self, completed: CompletedUpdate<ChunkUpdateResult>) -> Result<()> {
        let CompletedUpdate {
            result,
            rerun_requested,
        } = completed;
        let stats = self.publish(result);
        log::debug!(
            "Published update {}: {} meshes attached, {} detached",
            self.updates_published,
            stats.attached,
            stats.detached
        );

        if rerun_requested {
            self.request_update()?;
        }
        Ok(())
    }

    fn publish(&mut self, result: ChunkUpdateResult) -> SyncStats {
        let ChunkUpdateResult {
            updated_chunks,
            removed_chunks,
            ..
        } = result;

        let stats = self
            .registry
            .sync(&mut self.surface, &updated_chunks, &removed_chunks);
        self.active_chunks = updated_chunks;
        self.updates_published += 1;
        stats
    }
}
