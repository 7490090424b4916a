//! # World Module
//!
//! This module provides the [`ActiveSet`], the coordinate-keyed collection of
//! chunk columns currently resident around the viewer.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only chunks inside the
//! viewer's extended window are kept in memory. Chunk lookup is O(1) through a
//! hash map keyed by [`ChunkCoord`]; nothing ever scans the set to find a chunk.
//!
//! Cloning an `ActiveSet` is cheap: voxel arrays and meshes are reference
//! counted, so the clone handed to the background worker shares block data with
//! the foreground copy until one side writes to it.

use std::collections::hash_map::{self, HashMap};

use crate::engine_state::voxels::chunk::{Chunk, ChunkCoord};

/// The mapping from chunk coordinate to the chunk currently resident there.
///
/// At most one chunk exists per coordinate.
///
/// # Examples
///
/// ```
/// use voxel_streaming::{ActiveSet, ChunkCoord};
///
/// let mut world = ActiveSet::new();
/// assert!(world.add_chunk_at(ChunkCoord::new(0, 0)));
/// assert!(!world.add_chunk_at(ChunkCoord::new(0, 0)));
/// assert_eq!(world.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ActiveSet {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ActiveSet {
    /// Creates a new, empty active set.
    pub fn new() -> Self {
        ActiveSet {
            chunks: HashMap::new(),
        }
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if no chunk is resident.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns `true` if a chunk is resident at `position`.
    pub fn contains(&self, position: ChunkCoord) -> bool {
        self.chunks.contains_key(&position)
    }

    /// Adds a fresh, ungenerated chunk at `position` if none exists there.
    ///
    /// Returns `true` if a chunk was inserted.
    pub fn add_chunk_at(&mut self, position: ChunkCoord) -> bool {
        match self.chunks.entry(position) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(entry) => {
                entry.insert(Chunk::new(position));
                true
            }
        }
    }

    /// Inserts an existing chunk keyed by its own position, returning any chunk
    /// it displaced.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.position, chunk)
    }

    /// Retrieves the chunk at `position`.
    pub fn get_chunk_at(&self, position: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    /// Retrieves the chunk at `position` for modification.
    pub fn get_chunk_at_mut(&mut self, position: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    /// Removes and returns the chunk at `position`.
    pub fn remove(&mut self, position: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&position)
    }

    /// Iterates over all resident chunks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Iterates over all resident coordinates in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Counts how many of the eight distinct neighbour offsets of `position`
    /// hold a resident chunk.
    pub fn neighbor_count(&self, position: ChunkCoord) -> usize {
        position
            .neighbors()
            .into_iter()
            .filter(|neighbor| self.contains(*neighbor))
            .count()
    }

    /// Ring completeness: all eight planar neighbours of `position` are resident.
    pub fn has_complete_ring(&self, position: ChunkCoord) -> bool {
        self.neighbor_count(position) == 8
    }
}

impl FromIterator<Chunk> for ActiveSet {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        let mut set = ActiveSet::new();
        for chunk in iter {
            set.insert(chunk);
        }
        set
    }
}

impl IntoIterator for ActiveSet {
    type Item = Chunk;
    type IntoIter = hash_map::IntoValues<ChunkCoord, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_of(center: ChunkCoord, radius: i32) -> ActiveSet {
        let mut set = ActiveSet::new();
        for x in -radius..=radius {
            for z in -radius..=radius {
                set.add_chunk_at(center.offset(x, z));
            }
        }
        set
    }

    #[test]
    fn at_most_one_chunk_per_coordinate() {
        let mut set = ActiveSet::new();
        let position = ChunkCoord::new(2, 5);
        assert!(set.add_chunk_at(position));
        assert!(!set.add_chunk_at(position));
        let displaced = set.insert(Chunk::new(position));
        assert!(displaced.is_some());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn only_center_of_isolated_three_by_three_has_complete_ring() {
        let set = block_of(ChunkCoord::new(0, 0), 1);
        let complete: Vec<ChunkCoord> = set
            .coords()
            .filter(|coord| set.has_complete_ring(*coord))
            .collect();
        assert_eq!(complete, vec![ChunkCoord::new(0, 0)]);
        assert_eq!(set.neighbor_count(ChunkCoord::new(1, 1)), 3);
        assert_eq!(set.neighbor_count(ChunkCoord::new(0, 1)), 5);
    }

    #[test]
    fn collects_from_chunks() {
        let set: ActiveSet = (0..4).map(|x| Chunk::new(ChunkCoord::new(x, 0))).collect();
        assert_eq!(set.len(), 4);
        assert!(set.get_chunk_at(ChunkCoord::new(3, 0)).is_some());
        assert!(set.get_chunk_at(ChunkCoord::new(4, 0)).is_none());
    }
}
