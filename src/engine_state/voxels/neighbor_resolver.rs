//! # Neighbor Resolver
//!
//! Answers "which block sits at this chunk-relative offset" against an
//! [`ActiveSet`], including offsets that spill into one of the eight planar
//! neighbours of the chunk.
//!
//! ## Vertical bounds
//!
//! - `y < 0` reads as [`Block::Stone`], so the bottom of the world never leaks faces
//! - `y >= 256` reads as [`Block::Air`], the open sky above the world ceiling
//!
//! ## Missing neighbours
//!
//! Eligibility gating guarantees that a chunk is only meshed once its full 3x3
//! neighbourhood is resident. A query that nevertheless reaches an absent
//! neighbour is a logic error: debug builds panic, release builds log it and
//! read air.

use crate::engine_state::voxels::{
    block::Block,
    chunk::{Chunk, ChunkCoord, CHUNK_DIMENSION, WORLD_HEIGHT},
    world::ActiveSet,
};

/// Splits a horizontal local coordinate into the chunk offset it falls into and
/// the coordinate inside that chunk.
#[inline]
fn wrap(local: i32) -> (i32, i32) {
    if local < 0 {
        (-1, local + CHUNK_DIMENSION)
    } else if local >= CHUNK_DIMENSION {
        (1, local - CHUNK_DIMENSION)
    } else {
        (0, local)
    }
}

#[cold]
fn missing_neighbor(origin: ChunkCoord, missing: ChunkCoord) -> Block {
    if cfg!(debug_assertions) {
        panic!("chunk {:?} queried absent neighbour {:?}", origin, missing);
    }
    log::error!(
        "Chunk {:?} queried absent neighbour {:?}, reading air",
        origin,
        missing
    );
    Block::Air
}

/// Resolves the block at chunk-relative coordinates of the chunk at `position`.
///
/// `x` and `z` may lie one chunk outside `[0, 16)`, in which case the query is
/// answered by the matching neighbour with the coordinate wrapped by 16.
///
/// # Examples
///
/// ```
/// use voxel_streaming::{block_at, ActiveSet, Block, ChunkCoord};
///
/// let mut world = ActiveSet::new();
/// world.add_chunk_at(ChunkCoord::new(0, 0));
/// assert_eq!(block_at(&world, ChunkCoord::new(0, 0), 0, -1, 0), Block::Stone);
/// assert_eq!(block_at(&world, ChunkCoord::new(0, 0), 0, 256, 0), Block::Air);
/// ```
pub fn block_at(active: &ActiveSet, position: ChunkCoord, x: i32, y: i32, z: i32) -> Block {
    if y < 0 {
        return Block::Stone;
    }
    if y >= WORLD_HEIGHT {
        return Block::Air;
    }

    let (dx, local_x) = wrap(x);
    let (dz, local_z) = wrap(z);
    let target = position.offset(dx, dz);

    match active.get_chunk_at(target) {
        Some(chunk) => chunk.get_block_at(local_x, y, local_z),
        None => missing_neighbor(position, target),
    }
}

/// A resolver bound to one chunk and its eight planar neighbours.
///
/// Looking the neighbourhood up once keeps hash map lookups out of the per-voxel
/// meshing loop. Answers are identical to [`block_at`].
pub struct Neighborhood<'a> {
    center: ChunkCoord,
    /// Indexed `(dz + 1) * 3 + (dx + 1)`.
    chunks: [Option<&'a Chunk>; 9],
}

impl<'a> Neighborhood<'a> {
    /// Binds the neighbourhood of the chunk at `center`, all taken from `active`.
    pub fn new(active: &'a ActiveSet, center: ChunkCoord) -> Self {
        let chunks = std::array::from_fn(|index| {
            let dx = (index % 3) as i32 - 1;
            let dz = (index / 3) as i32 - 1;
            active.get_chunk_at(center.offset(dx, dz))
        });

        Neighborhood { center, chunks }
    }

    /// Binds the neighbourhood of `chunk`, which does not need to be in `active`.
    pub fn around(active: &'a ActiveSet, chunk: &'a Chunk) -> Self {
        let mut neighborhood = Self::new(active, chunk.position);
        neighborhood.chunks[4] = Some(chunk);
        neighborhood
    }

    /// Returns `true` if the center and all eight neighbours are present.
    pub fn is_complete(&self) -> bool {
        self.chunks.iter().all(Option::is_some)
    }

    /// Resolves the block at coordinates relative to the center chunk.
    #[inline]
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Block {
        if y < 0 {
            return Block::Stone;
        }
        if y >= WORLD_HEIGHT {
            return Block::Air;
        }

        let (dx, local_x) = wrap(x);
        let (dz, local_z) = wrap(z);

        match self.chunks[((dz + 1) * 3 + (dx + 1)) as usize] {
            Some(chunk) => chunk.get_block_at(local_x, y, local_z),
            None => missing_neighbor(self.center, self.center.offset(dx, dz)),
        }
    }
}
