//! # Sub Chunk Module
//!
//! A `SubChunk` is one 16³ vertical slab of a chunk column. It owns its voxel
//! array and, once meshed, the mesh built from it.
//!
//! ## Memory Optimization
//!
//! Voxel arrays are reference counted so that a snapshot of the active set can be
//! handed to the background worker without copying block data. Writes go through
//! `Arc::make_mut`, so a snapshot never observes a later edit.
//!
//! A slab that holds nothing but air stores no array at all. Terrain generation
//! leaves every slab above the surface in that state, which keeps a freshly
//! streamed column well under its nominal 64 KiB.

use std::sync::Arc;

use crate::engine_state::rendering::meshing::Mesh;
use crate::engine_state::voxels::block::{Block, BlockTypeSize};

use super::{CHUNK_DIMENSION, SUB_CHUNK_VOLUME};

/// Dense voxel storage of a single sub chunk, indexed `x * 256 + y * 16 + z`.
///
/// Cells hold encoded blocks; see [`Block::to_int`] and [`Block::from_int`].
pub type SubChunkBlocks = [BlockTypeSize; SUB_CHUNK_VOLUME];

/// One 16x16x16 vertical slice of a [`super::Chunk`].
#[derive(Clone, Debug, Default)]
pub struct SubChunk {
    /// `None` while every cell is air.
    blocks: Option<Arc<SubChunkBlocks>>,
    /// The most recently built mesh. `None` for slabs without visible faces.
    mesh: Option<Arc<Mesh>>,
}

impl SubChunk {
    /// Creates a sub chunk made entirely of air.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a sub chunk from a dense block array.
    ///
    /// Arrays that contain only air are dropped immediately.
    pub fn from_blocks(blocks: SubChunkBlocks) -> Self {
        if blocks.iter().all(|block| *block == Block::Air.to_int()) {
            return Self::empty();
        }

        SubChunk {
            blocks: Some(Arc::new(blocks)),
            mesh: None,
        }
    }

    #[inline]
    fn index(x: i32, y: i32, z: i32) -> Option<usize> {
        let range = 0..CHUNK_DIMENSION;
        if range.contains(&x) && range.contains(&y) && range.contains(&z) {
            Some((x * CHUNK_DIMENSION * CHUNK_DIMENSION + y * CHUNK_DIMENSION + z) as usize)
        } else {
            None
        }
    }

    /// Gets the block at the given sub chunk relative coordinates.
    ///
    /// Coordinates outside `[0, 16)` are not an error and read as air.
    #[inline]
    pub fn get_block_at(&self, x: i32, y: i32, z: i32) -> Block {
        match (&self.blocks, Self::index(x, y, z)) {
            (Some(blocks), Some(index)) => Block::from_int(blocks[index]),
            _ => Block::Air,
        }
    }

    /// Sets the block at the given sub chunk relative coordinates.
    ///
    /// Writes outside `[0, 16)` are ignored. The voxel array is allocated on the
    /// first non-air write.
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, block: Block) {
        let Some(index) = Self::index(x, y, z) else {
            return;
        };

        match &mut self.blocks {
            Some(blocks) => Arc::make_mut(blocks)[index] = block.to_int(),
            None if block == Block::Air => {}
            None => {
                let mut blocks = [Block::Air.to_int(); SUB_CHUNK_VOLUME];
                blocks[index] = block.to_int();
                self.blocks = Some(Arc::new(blocks));
            }
        }
    }

    /// Returns the dense voxel array, or `None` if the slab is all air.
    pub fn blocks(&self) -> Option<&SubChunkBlocks> {
        self.blocks.as_deref()
    }

    /// Returns `true` if the slab has no voxel storage.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_none()
    }

    /// Returns the currently installed mesh, if any.
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }

    /// Installs a freshly built mesh and returns the one it replaces.
    ///
    /// The caller owns the previous mesh and is responsible for detaching it from
    /// the render surface.
    pub fn replace_mesh(&mut self, mesh: Option<Arc<Mesh>>) -> Option<Arc<Mesh>> {
        std::mem::replace(&mut self.mesh, mesh)
    }

    /// Frees the voxel storage and hands back the installed mesh, if any.
    pub fn destroy(&mut self) -> Option<Arc<Mesh>> {
        self.blocks = None;
        self.mesh.take()
    }
}
