//! # Chunk Grid
//!
//! Streaming and eviction policy for the active set.
//!
//! For a viewer standing in chunk `(vx, vz)` with render distance `r`, the
//! *extended window* is the inclusive square `[vx - r - 1, vx + r + 1] x
//! [vz - r - 1, vz + r + 1]`. The extra ring of width one exists so that every
//! chunk within the render distance proper has all eight neighbours resident
//! before it is meshed.
//!
//! An update
//! 1. destroys every chunk outside the window,
//! 2. inserts a fresh chunk at every window coordinate that has none,
//! 3. passes every other chunk through untouched, and
//! 4. reports the chunks that are ready to build, nearest first.

use std::ops::RangeInclusive;

use crate::engine_state::voxels::{
    chunk::ChunkCoord,
    world::ActiveSet,
};

/// Outcome of one [`ChunkGrid::update`].
#[derive(Debug, Default)]
pub struct GridUpdate {
    /// The new active set: exactly the extended window around the viewer.
    pub active: ActiveSet,
    /// Chunks that left the window and were destroyed.
    pub removed: Vec<ChunkCoord>,
    /// Coordinates that received a fresh, ungenerated chunk.
    pub added: Vec<ChunkCoord>,
    /// Chunks ready to generate and mesh, nearest to the viewer first.
    pub eligible: Vec<ChunkCoord>,
}

/// Computes active set diffs as the viewer moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkGrid {
    render_distance: i32,
}

impl ChunkGrid {
    /// Creates a grid for the given render distance, in chunks.
    ///
    /// Negative distances are treated as zero.
    pub fn new(render_distance: i32) -> Self {
        ChunkGrid {
            render_distance: render_distance.max(0),
        }
    }

    /// The render distance this grid was built with.
    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    /// Half the side length of the extended window, `render_distance + 1`.
    pub fn window_radius(&self) -> i32 {
        self.render_distance + 1
    }

    /// The X and Z ranges of the extended window around `viewer`.
    pub fn window(&self, viewer: ChunkCoord) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let radius = self.window_radius();
        (
            (viewer.x - radius)..=(viewer.x + radius),
            (viewer.z - radius)..=(viewer.z + radius),
        )
    }

    /// Returns `true` if `position` lies inside the extended window around `viewer`.
    pub fn in_window(&self, viewer: ChunkCoord, position: ChunkCoord) -> bool {
        let (x_range, z_range) = self.window(viewer);
        x_range.contains(&position.x) && z_range.contains(&position.z)
    }

    /// Moves the window to `viewer`.
    ///
    /// Chunks that stay inside the window keep their terrain and meshes.
    pub fn update(&self, mut active: ActiveSet, viewer: ChunkCoord) -> GridUpdate {
        let mut removed: Vec<ChunkCoord> = active
            .coords()
            .filter(|position| !self.in_window(viewer, *position))
            .collect();
        removed.sort_unstable();

        for position in &removed {
            if let Some(mut chunk) = active.remove(*position) {
                chunk.destroy();
            }
        }

        let (x_range, z_range) = self.window(viewer);
        let mut added = Vec::new();
        for x in x_range {
            for z in z_range.clone() {
                let position = ChunkCoord::new(x, z);
                if active.add_chunk_at(position) {
                    added.push(position);
                }
            }
        }

        let eligible = self.eligible_chunks(&active, viewer);

        log::debug!(
            "Grid update around {:?}: {} removed, {} added, {} eligible",
            viewer,
            removed.len(),
            added.len(),
            eligible.len()
        );

        GridUpdate {
            active,
            removed,
            added,
            eligible,
        }
    }

    /// Chunks that still need building and whose eight neighbour offsets are all
    /// resident, sorted by ascending distance from `viewer`.
    ///
    /// A chunk needs building until its meshes have been built once. That covers
    /// every ungenerated chunk as well as chunks whose terrain was generated
    /// earlier only because they neighboured another chunk.
    pub fn eligible_chunks(&self, active: &ActiveSet, viewer: ChunkCoord) -> Vec<ChunkCoord> {
        let mut eligible: Vec<ChunkCoord> = active
            .iter()
            .filter(|chunk| !chunk.is_mesh_built())
            .map(|chunk| chunk.position)
            .filter(|position| active.has_complete_ring(*position))
            .collect();

        eligible.sort_by(|a, b| {
            a.distance_squared(viewer)
                .cmp(&b.distance_squared(viewer))
                .then_with(|| a.cmp(b))
        });

        eligible
    }
}

/// Moves the extended window of radius `render_distance + 1` to the viewer
/// chunk `(viewer_chunk_x, viewer_chunk_z)` and returns the resulting set.
pub fn update(
    active: ActiveSet,
    viewer_chunk_x: i32,
    viewer_chunk_z: i32,
    render_distance: i32,
) -> ActiveSet {
    ChunkGrid::new(render_distance)
        .update(active, ChunkCoord::new(viewer_chunk_x, viewer_chunk_z))
        .active
}
