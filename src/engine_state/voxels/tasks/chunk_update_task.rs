//! # Chunk Update Task
//!
//! One complete background pass over the active set: move the window to the
//! viewer, generate terrain where it is needed, and mesh every chunk that became
//! ready. The task owns a snapshot of the active set, so nothing it does is
//! visible to the main thread until the finished result is published.

use web_time::{Duration, Instant};

use crate::engine_state::{
    rendering::meshing::MeshBuilder,
    task_management::Task,
    voxels::{
        chunk::ChunkCoord,
        chunk_grid::{ChunkGrid, GridUpdate},
        terrain::TerrainGenerator,
        world::ActiveSet,
    },
};

/// A snapshot of everything a chunk update needs.
#[derive(Clone, Debug)]
pub struct ChunkUpdateTask {
    /// The currently published active set. Voxel storage and meshes are shared
    /// with the main thread and copied on write.
    pub active_chunks: ActiveSet,
    /// The chunk the viewer stands in.
    pub viewer_chunk: ChunkCoord,
    /// Render distance in chunks.
    pub render_distance: i32,
    /// World seed for terrain generation.
    pub seed: u32,
    /// World space edge length of one block.
    pub block_size: f32,
}

/// The outcome of a [`ChunkUpdateTask`], ready to be published.
#[derive(Debug)]
pub struct ChunkUpdateResult {
    /// The new active set.
    pub updated_chunks: ActiveSet,
    /// Chunks that left the window. Their meshes must be detached.
    pub removed_chunks: Vec<ChunkCoord>,
    /// The viewer chunk the update was computed for.
    pub viewer_chunk: ChunkCoord,
    /// Number of chunks whose terrain was generated.
    pub generated: usize,
    /// Number of chunks that were meshed.
    pub meshed: usize,
    /// Wall time spent on the worker.
    pub elapsed: Duration,
}

impl ChunkUpdateTask {
    /// Runs the update on the current thread.
    ///
    /// For every eligible chunk, nearest to the viewer first, the chunk and its
    /// eight neighbours get terrain if they have none yet, then the chunk is
    /// meshed against those neighbours.
    pub fn run(self) -> ChunkUpdateResult {
        let start = Instant::now();
        let grid = ChunkGrid::new(self.render_distance);
        let generator = TerrainGenerator::new(self.seed);
        let builder = MeshBuilder::new(self.block_size);

        let GridUpdate {
            mut active,
            removed,
            eligible,
            ..
        } = grid.update(self.active_chunks, self.viewer_chunk);

        let mut generated = 0;
        let mut meshed = 0;

        for position in eligible {
            for target in std::iter::once(position).chain(position.neighbors()) {
                if let Some(chunk) = active.get_chunk_at_mut(target) {
                    if !chunk.is_terrain_generated() {
                        generator.populate(chunk);
                        generated += 1;
                    }
                }
            }

            let Some(mut chunk) = active.remove(position) else {
                continue;
            };
            let meshes = builder.build_mesh(&active, &chunk);
            let replaced = chunk.install_meshes(meshes);
            debug_assert!(
                replaced.is_empty(),
                "chunk {:?} was meshed twice",
                position
            );
            active.insert(chunk);
            meshed += 1;
        }

        let elapsed = start.elapsed();
        log::info!(
            "Chunk update around {:?}: {} active, {} removed, {} generated, {} meshed in {:?}",
            self.viewer_chunk,
            active.len(),
            removed.len(),
            generated,
            meshed,
            elapsed
        );

        ChunkUpdateResult {
            updated_chunks: active,
            removed_chunks: removed,
            viewer_chunk: self.viewer_chunk,
            generated,
            meshed,
            elapsed,
        }
    }
}

impl Task for ChunkUpdateTask {
    type Output = ChunkUpdateResult;

    fn process(self) -> ChunkUpdateResult {
        self.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(active: ActiveSet, viewer: ChunkCoord, render_distance: i32) -> ChunkUpdateTask {
        ChunkUpdateTask {
            active_chunks: active,
            viewer_chunk: viewer,
            render_distance,
            seed: 0,
            block_size: 1.0,
        }
    }

    #[test]
    fn first_update_with_render_distance_one() {
        let result = task(ActiveSet::new(), ChunkCoord::new(0, 0), 1).run();
        let active = &result.updated_chunks;

        assert_eq!(active.len(), 25);
        assert_eq!(result.meshed, 9);
        // The inner 3x3 and its neighbours cover the whole 5x5 window.
        assert_eq!(result.generated, 25);

        for chunk in active.iter() {
            let inner = chunk.position.x.abs() <= 1 && chunk.position.z.abs() <= 1;
            assert_eq!(chunk.is_mesh_built(), inner, "{:?}", chunk.position);
            assert!(chunk.is_terrain_generated());
        }
    }

    #[test]
    fn second_update_in_place_does_nothing() {
        let first = task(ActiveSet::new(), ChunkCoord::new(0, 0), 1).run();
        let second = task(first.updated_chunks, ChunkCoord::new(0, 0), 1).run();
        assert_eq!(second.generated, 0);
        assert_eq!(second.meshed, 0);
        assert!(second.removed_chunks.is_empty());
    }

    #[test]
    fn moving_meshes_the_new_column_only() {
        let first = task(ActiveSet::new(), ChunkCoord::new(0, 0), 1).run();
        let second = task(first.updated_chunks, ChunkCoord::new(1, 0), 1).run();

        assert_eq!(second.removed_chunks.len(), 5);
        // Column x = 3 is fresh, column x = 2 was generated as neighbours.
        assert_eq!(second.generated, 5);
        // Column x = 2, rows -1..=1, just completed its ring.
        assert_eq!(second.meshed, 3);
        for z in -1..=1 {
            assert!(second
                .updated_chunks
                .get_chunk_at(ChunkCoord::new(2, z))
                .expect("in window")
                .is_mesh_built());
        }
    }

    #[test]
    fn input_snapshot_is_not_modified() {
        let first = task(ActiveSet::new(), ChunkCoord::new(0, 0), 0).run();
        let snapshot = first.updated_chunks.clone();
        let _ = task(first.updated_chunks, ChunkCoord::new(5, 5), 0).run();

        assert_eq!(snapshot.len(), 9);
        let center = snapshot
            .get_chunk_at(ChunkCoord::new(0, 0))
            .expect("still in snapshot");
        assert!(center.is_mesh_built());
        assert!(center.sub_chunks().iter().any(|sub| sub.mesh().is_some()));
    }
}
