//! # Viewer State
//!
//! Tracks which chunk the viewer stands in. Streaming only reacts when that
//! chunk changes, not on every movement.

use cgmath::Point3;

use crate::engine_state::voxels::chunk::{ChunkCoord, CHUNK_DIMENSION};

/// Converts a world space position into the chunk containing it.
///
/// # Arguments
/// * `position` - World space position; the Y component is ignored
/// * `block_size` - World space edge length of one block
pub fn chunk_containing(position: Point3<f32>, block_size: f32) -> ChunkCoord {
    let chunk_extent = block_size * CHUNK_DIMENSION as f32;
    ChunkCoord::new(
        (position.x / chunk_extent).floor() as i32,
        (position.z / chunk_extent).floor() as i32,
    )
}

/// The viewer's last sampled position and the chunk it falls in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewerState {
    position: Point3<f32>,
    chunk: ChunkCoord,
    block_size: f32,
}

impl ViewerState {
    /// Creates a viewer state at `position`.
    pub fn new(position: Point3<f32>, block_size: f32) -> Self {
        ViewerState {
            position,
            chunk: chunk_containing(position, block_size),
            block_size,
        }
    }

    /// Last sampled world space position.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Chunk the viewer stands in.
    pub fn chunk(&self) -> ChunkCoord {
        self.chunk
    }

    /// Records a new sample.
    ///
    /// # Returns
    /// `true` if the viewer crossed into a different chunk.
    pub fn update(&mut self, position: Point3<f32>) -> bool {
        self.position = position;
        let chunk = chunk_containing(position, self.block_size);
        if chunk == self.chunk {
            return false;
        }
        log::debug!("Viewer moved from chunk {:?} to {:?}", self.chunk, chunk);
        self.chunk = chunk;
        true
    }
}
