#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Streaming
//!
//! Infinite voxel terrain that streams around a moving viewer.
//!
//! The world is a grid of 16x256x16 chunk columns. Around the viewer's chunk an
//! extended window of chunks is kept resident; chunks far enough inside that
//! window get deterministic noise terrain and a face-culled mesh per 16³ sub
//! chunk. All of the heavy lifting happens on one background worker, and the
//! foreground only ever swaps in finished results.
//!
//! ## Key Modules
//!
//! * `engine_state` - The foreground engine, configuration and viewer tracking
//! * `engine_state::voxels` - Blocks, chunks, the active set, terrain and the window policy
//! * `engine_state::rendering` - Vertex format, meshing and the render surface seam
//! * `engine_state::task_management` - The background worker and coalescing update pipeline
//! * `error` - The crate's error type
//!
//! ## Usage
//!
//! ```no_run
//! // Native application initialization
//! fn main() {
//!     voxel_streaming::run();
//! }
//! ```
//!
//! Embedding in a renderer means implementing [`RenderSurface`] and driving an
//! [`EngineState`] once per frame with [`EngineState::update_viewer_position`] and
//! [`EngineState::process_tasks`].

use std::time::Duration;

use cgmath::Point3;
use log::info;

pub mod engine_state;
pub mod error;

pub use engine_state::{
    config::StreamingConfig,
    rendering::{
        meshing::{build_mesh, Mesh, MeshBuilder, MeshId},
        HeadlessSurface, MeshRegistry, RenderSurface, Vertex,
    },
    task_management::{CompletedUpdate, PipelineState, SubmitOutcome, Task, UpdatePipeline},
    viewer::ViewerState,
    voxels::{
        block::{block_side::BlockSide, Block},
        chunk::{
            Chunk, ChunkCoord, SubChunk, CHUNK_DIMENSION, SUB_CHUNKS_PER_CHUNK, WORLD_HEIGHT,
        },
        chunk_grid::{ChunkGrid, GridUpdate},
        neighbor_resolver::{block_at, Neighborhood},
        tasks::{ChunkUpdateResult, ChunkUpdateTask},
        terrain::{NoiseSource, PerlinNoise, TerrainGenerator},
        world::ActiveSet,
    },
    EngineState,
};
pub use error::{Result, StreamingError};

/// Number of chunk boundaries the demo viewer walks across.
const DEMO_STEPS: i32 = 8;

/// How long the demo waits for one update before giving up.
const DEMO_UPDATE_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs a headless streaming session and logs what happens.
///
/// The configuration comes from the file named by `VOXEL_STREAMING_CONFIG`, if
/// set. The viewer then walks diagonally across several chunk boundaries while
/// the engine streams terrain around it.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    if let Err(error) = run_demo() {
        log::error!("Streaming demo failed: {}", error);
        std::process::exit(1);
    }
}

fn run_demo() -> Result<()> {
    let config = StreamingConfig::from_env()?;
    let chunk_extent = config.block_size * CHUNK_DIMENSION as f32;
    let mut engine = EngineState::new(config, HeadlessSurface::new())?;

    for step in 0..=DEMO_STEPS {
        let offset = (step as f32 + 0.5) * chunk_extent;
        engine.update_viewer_position(Point3::new(offset, 120.0, offset * 0.5))?;
        // A real frame loop would call `process_tasks` every frame instead.
        engine.wait_for_idle(DEMO_UPDATE_TIMEOUT)?;

        let surface = engine.surface();
        info!(
            "Viewer in chunk {:?}: {} chunks active, {} meshes ({} quads) attached",
            engine.viewer().chunk(),
            engine.active_chunks().len(),
            surface.live_meshes(),
            surface.live_quads()
        );
    }

    let surface = engine.shutdown();
    info!(
        "Demo finished: {} meshes attached and {} detached in total",
        surface.total_attached(),
        surface.total_detached()
    );
    Ok(())
}
