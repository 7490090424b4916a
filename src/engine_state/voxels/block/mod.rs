//! # Block Module
//!
//! This module provides the voxel content tag stored in every sub chunk cell,
//! together with the six axis-aligned block faces used during meshing.

use num_derive::FromPrimitive;

pub mod block_side;

/// The integer type sub chunks store each block as.
pub type BlockTypeSize = u8;

/// Enumerates all possible block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion back from the compact
/// `BlockTypeSize` representation used by the sub chunk storage.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Block {
    /// Empty space. Faces are emitted towards air.
    #[default]
    Air = 0,

    /// The only block produced by terrain generation.
    Grass = 1,

    /// Never stored; synthesized for queries below the bottom of the world.
    Stone = 2,
}

impl Block {
    /// Converts a `BlockTypeSize` back into a `Block`.
    ///
    /// Unknown values decode as `Air`, matching the "empty space" default used
    /// for every other out-of-range query.
    #[inline]
    pub fn from_int(btype: BlockTypeSize) -> Self {
        num_traits::FromPrimitive::from_u8(btype).unwrap_or(Block::Air)
    }

    /// Encodes the block for sub chunk storage.
    #[inline]
    pub fn to_int(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Returns `true` for every block that occludes a neighbouring face.
    pub fn is_solid(self) -> bool {
        self != Block::Air
    }
}
