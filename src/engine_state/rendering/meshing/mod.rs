//! Mesh generation for voxel rendering.
//!
//! This module turns a chunk of generated terrain into one immutable [`Mesh`]
//! per non-empty sub chunk.
//!
//! # Architecture
//! - [`MeshBuilder`]: Main interface, builds every sub chunk mesh of a chunk
//! - `mesh/`: Contains the mesh data structures and the face culling algorithm
//!
//! # Preconditions
//! A chunk is only meshed once the chunk and its eight planar neighbours have
//! terrain, so every border face is culled against final neighbour data and
//! never needs rebuilding.

use std::sync::Arc;

use web_time::Instant;

mod mesh;

// Re-export the mesh module's public interface for external use
pub use mesh::*;

use crate::engine_state::voxels::{
    chunk::{Chunk, SUB_CHUNKS_PER_CHUNK},
    neighbor_resolver::Neighborhood,
    world::ActiveSet,
};

/// Builds sub chunk meshes at a fixed block size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshBuilder {
    block_size: f32,
}

impl MeshBuilder {
    /// Creates a mesh builder emitting geometry at `block_size` world units per block.
    pub fn new(block_size: f32) -> Self {
        MeshBuilder { block_size }
    }

    /// World space edge length of one block.
    pub fn block_size(&self) -> f32 {
        self.block_size
    }

    /// Generates the meshes of every sub chunk of `chunk`.
    ///
    /// # Arguments
    ///
    /// * `active` - The active set holding the chunk's eight neighbours
    /// * `chunk` - The chunk to mesh; it may or may not be stored in `active`
    ///
    /// # Returns
    ///
    /// One entry per sub chunk, bottom first. Sub chunks without visible faces
    /// have no mesh.
    pub fn build_mesh(
        &self,
        active: &ActiveSet,
        chunk: &Chunk,
    ) -> [Option<Arc<Mesh>>; SUB_CHUNKS_PER_CHUNK] {
        let start = Instant::now();
        let neighborhood = Neighborhood::around(active, chunk);

        let meshes: [Option<Arc<Mesh>>; SUB_CHUNKS_PER_CHUNK] =
            std::array::from_fn(|sub_chunk_index| {
                culled_sub_chunk(&neighborhood, chunk, sub_chunk_index, self.block_size)
                    .map(Arc::new)
            });

        log::trace!(
            "Meshed chunk {:?}: {} quads in {:?}",
            chunk.position,
            meshes
                .iter()
                .flatten()
                .map(|mesh| mesh.quad_count())
                .sum::<usize>(),
            start.elapsed()
        );

        meshes
    }
}

/// Builds the sub chunk meshes of `chunk` against the neighbours held in `active`.
pub fn build_mesh(
    active: &ActiveSet,
    chunk: &Chunk,
    block_size: f32,
) -> [Option<Arc<Mesh>>; SUB_CHUNKS_PER_CHUNK] {
    MeshBuilder::new(block_size).build_mesh(active, chunk)
}
