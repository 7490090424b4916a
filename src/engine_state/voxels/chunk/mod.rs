//! # Chunk Module
//!
//! This module provides the `Chunk` column and its `ChunkCoord` key.
//!
//! A chunk is a 16x256x16 column of blocks split into sixteen 16³ [`SubChunk`]s.
//! Chunks never reference one another; anything that needs a neighbour goes
//! through the active set by coordinate (see
//! [`crate::engine_state::voxels::neighbor_resolver`]).
//!
//! ## Lifecycle
//!
//! 1. Created empty when it enters the viewer's extended window
//! 2. Terrain populated exactly once
//! 3. Meshed once its whole 3x3 neighbourhood has terrain
//! 4. Destroyed when the viewer moves far enough away

use std::sync::Arc;

use crate::engine_state::rendering::meshing::Mesh;

use super::block::Block;

pub mod sub_chunk;

pub use sub_chunk::SubChunk;

/// The width, depth and sub chunk height of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of sub chunks stacked in a chunk column.
pub const SUB_CHUNKS_PER_CHUNK: usize = 16;
/// The height of the world in blocks.
pub const WORLD_HEIGHT: i32 = CHUNK_DIMENSION * SUB_CHUNKS_PER_CHUNK as i32;
/// The number of blocks in one sub chunk (CHUNK_DIMENSION³).
pub const SUB_CHUNK_VOLUME: usize = (CHUNK_DIMENSION * CHUNK_DIMENSION * CHUNK_DIMENSION) as usize;

/// The eight planar neighbour offsets of a chunk: its 3x3 block minus itself.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Planar chunk coordinate. One unit is one chunk (16 blocks).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk index along the world X axis.
    pub x: i32,
    /// Chunk index along the world Z axis.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// Returns the coordinate displaced by `(dx, dz)` chunks.
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        ChunkCoord::new(self.x + dx, self.z + dz)
    }

    /// Returns the eight planar neighbours of this coordinate.
    pub fn neighbors(self) -> [ChunkCoord; 8] {
        NEIGHBOR_OFFSETS.map(|(dx, dz)| self.offset(dx, dz))
    }

    /// Squared Euclidean distance in chunks. Orders identically to the distance.
    pub fn distance_squared(self, other: ChunkCoord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dz * dz
    }
}

/// A 16x256x16 column of blocks identified by its [`ChunkCoord`].
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: ChunkCoord,
    sub_chunks: [SubChunk; SUB_CHUNKS_PER_CHUNK],
    terrain_generated: bool,
    mesh_built: bool,
}

impl Chunk {
    /// Creates a new, ungenerated chunk made entirely of air.
    pub fn new(position: ChunkCoord) -> Self {
        Chunk {
            position,
            sub_chunks: std::array::from_fn(|_| SubChunk::empty()),
            terrain_generated: false,
            mesh_built: false,
        }
    }

    /// Whether terrain has been written into this chunk.
    pub fn is_terrain_generated(&self) -> bool {
        self.terrain_generated
    }

    /// Whether meshes have been built for this chunk since it was created.
    pub fn is_mesh_built(&self) -> bool {
        self.mesh_built
    }

    /// Returns the sub chunk at vertical index `index`.
    ///
    /// # Panics
    /// Panics if `index >= SUB_CHUNKS_PER_CHUNK`.
    pub fn sub_chunk(&self, index: usize) -> &SubChunk {
        &self.sub_chunks[index]
    }

    /// Returns all sub chunks, bottom first.
    pub fn sub_chunks(&self) -> &[SubChunk; SUB_CHUNKS_PER_CHUNK] {
        &self.sub_chunks
    }

    /// Gets the block at chunk-relative coordinates, `y` in `[0, 256)`.
    ///
    /// Anything outside the column reads as air.
    #[inline]
    pub fn get_block_at(&self, x: i32, y: i32, z: i32) -> Block {
        if !(0..WORLD_HEIGHT).contains(&y) {
            return Block::Air;
        }
        let sub_chunk_index = (y / CHUNK_DIMENSION) as usize;
        self.sub_chunks[sub_chunk_index].get_block_at(x, y % CHUNK_DIMENSION, z)
    }

    /// Sets the block at chunk-relative coordinates. Writes outside the column are ignored.
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, block: Block) {
        if !(0..WORLD_HEIGHT).contains(&y) {
            return;
        }
        let sub_chunk_index = (y / CHUNK_DIMENSION) as usize;
        self.sub_chunks[sub_chunk_index].set_block_at(x, y % CHUNK_DIMENSION, z, block);
    }

    /// Installs generated terrain and marks the chunk as generated.
    ///
    /// # Panics
    /// Panics if terrain was already installed; generation happens at most once.
    pub fn install_terrain(&mut self, sub_chunks: [SubChunk; SUB_CHUNKS_PER_CHUNK]) {
        assert!(
            !self.terrain_generated,
            "terrain for chunk {:?} generated twice",
            self.position
        );
        self.sub_chunks = sub_chunks;
        self.terrain_generated = true;
    }

    /// Marks hand-written block data as this chunk's terrain.
    ///
    /// Used when blocks were placed with [`Chunk::set_block_at`] instead of a
    /// [`crate::engine_state::voxels::terrain::TerrainGenerator`].
    ///
    /// # Panics
    /// Panics if terrain was already installed.
    pub fn mark_terrain_generated(&mut self) {
        assert!(
            !self.terrain_generated,
            "terrain for chunk {:?} generated twice",
            self.position
        );
        self.terrain_generated = true;
    }

    /// Installs one mesh per sub chunk and returns the meshes they replace.
    pub fn install_meshes(
        &mut self,
        meshes: [Option<Arc<Mesh>>; SUB_CHUNKS_PER_CHUNK],
    ) -> Vec<Arc<Mesh>> {
        let replaced = self
            .sub_chunks
            .iter_mut()
            .zip(meshes)
            .filter_map(|(sub_chunk, mesh)| sub_chunk.replace_mesh(mesh))
            .collect();
        self.mesh_built = true;
        replaced
    }

    /// Frees every sub chunk's voxel storage and returns the meshes that were
    /// still installed so they can be detached from the render surface.
    pub fn destroy(&mut self) -> Vec<Arc<Mesh>> {
        self.mesh_built = false;
        self.sub_chunks
            .iter_mut()
            .filter_map(SubChunk::destroy)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_are_the_ring_around_the_chunk() {
        let center = ChunkCoord::new(3, -2);
        let neighbors = center.neighbors();
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&center));
        for n in neighbors {
            assert!((n.x - center.x).abs() <= 1 && (n.z - center.z).abs() <= 1);
        }
    }

    #[test]
    fn block_access_spans_sub_chunks() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set_block_at(4, 200, 7, Block::Grass);
        assert_eq!(chunk.get_block_at(4, 200, 7), Block::Grass);
        assert_eq!(chunk.sub_chunk(12).get_block_at(4, 8, 7), Block::Grass);
        assert!(chunk.sub_chunk(0).is_empty());
    }

    #[test]
    fn column_bounds_read_as_air() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set_block_at(0, 256, 0, Block::Grass);
        chunk.set_block_at(0, -1, 0, Block::Grass);
        assert_eq!(chunk.get_block_at(0, 256, 0), Block::Air);
        assert_eq!(chunk.get_block_at(0, -1, 0), Block::Air);
        assert!(chunk.sub_chunks().iter().all(SubChunk::is_empty));
    }

    #[test]
    #[should_panic(expected = "generated twice")]
    fn installing_terrain_twice_panics() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.install_terrain(std::array::from_fn(|_| SubChunk::empty()));
        chunk.install_terrain(std::array::from_fn(|_| SubChunk::empty()));
    }

    #[test]
    #[should_panic(expected = "generated twice")]
    fn marking_generated_terrain_again_panics() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.install_terrain(std::array::from_fn(|_| SubChunk::empty()));
        chunk.mark_terrain_generated();
    }

    #[test]
    fn destroy_frees_storage() {
        let mut chunk = Chunk::new(ChunkCoord::new(1, 1));
        chunk.set_block_at(0, 0, 0, Block::Grass);
        chunk.mark_terrain_generated();
        let meshes = chunk.destroy();
        assert!(meshes.is_empty());
        assert!(chunk.sub_chunks().iter().all(SubChunk::is_empty));
    }
}
