//! # Render Surface
//!
//! The seam between chunk streaming and whatever draws the meshes.
//!
//! A [`RenderSurface`] accepts meshes and hands back an opaque handle to detach
//! them later. The foreground engine keeps a [`MeshRegistry`] of the handle it
//! got for every sub chunk and reconciles it against each published active set,
//! so the surface only ever sees meshes that are actually live.

use std::{collections::HashMap, sync::Arc};

use crate::engine_state::{
    rendering::meshing::{Mesh, MeshId},
    voxels::{chunk::ChunkCoord, world::ActiveSet},
};

/// A scene that sub chunk meshes can be attached to and detached from.
pub trait RenderSurface {
    /// Identifies an attached mesh.
    type Handle;

    /// Attaches `mesh` to the scene.
    fn add_mesh(&mut self, mesh: &Arc<Mesh>) -> Self::Handle;

    /// Detaches a previously attached mesh.
    fn remove_mesh(&mut self, handle: Self::Handle);
}

/// Counts of surface calls made by one [`MeshRegistry::sync`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Meshes attached.
    pub attached: usize,
    /// Meshes detached.
    pub detached: usize,
}

type SlotKey = (ChunkCoord, usize);

/// Tracks which mesh is attached to the render surface for every sub chunk.
#[derive(Debug)]
pub struct MeshRegistry<H> {
    attached: HashMap<SlotKey, (MeshId, H)>,
}

impl<H> Default for MeshRegistry<H> {
    fn default() -> Self {
        MeshRegistry {
            attached: HashMap::new(),
        }
    }
}

impl<H> MeshRegistry<H> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes currently attached.
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    /// Returns `true` if nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    /// The identity of the mesh attached for a sub chunk, if any.
    pub fn attached_mesh(&self, position: ChunkCoord, sub_chunk_index: usize) -> Option<MeshId> {
        self.attached
            .get(&(position, sub_chunk_index))
            .map(|(id, _)| *id)
    }

    /// Brings the surface in line with `active`.
    ///
    /// 1. Every attachment belonging to a chunk in `removed` is detached.
    /// 2. For every sub chunk mesh in `active`, a mesh that replaces a different
    ///    attached mesh is attached only after the old one is detached.
    /// 3. Any remaining attachment without a live mesh behind it is detached.
    pub fn sync<S>(
        &mut self,
        surface: &mut S,
        active: &ActiveSet,
        removed: &[ChunkCoord],
    ) -> SyncStats
    where
        S: RenderSurface<Handle = H>,
    {
        let mut stats = SyncStats::default();

        if !removed.is_empty() {
            let doomed: Vec<SlotKey> = self
                .attached
                .keys()
                .filter(|(position, _)| removed.contains(position))
                .copied()
                .collect();
            for key in doomed {
                if let Some((_, handle)) = self.attached.remove(&key) {
                    surface.remove_mesh(handle);
                    stats.detached += 1;
                }
            }
        }

        for chunk in active.iter() {
            for (index, sub_chunk) in chunk.sub_chunks().iter().enumerate() {
                let Some(mesh) = sub_chunk.mesh() else {
                    continue;
                };
                let key = (chunk.position, index);

                if let Some((id, _)) = self.attached.get(&key) {
                    if *id == mesh.id() {
                        continue;
                    }
                }
                if let Some((_, handle)) = self.attached.remove(&key) {
                    surface.remove_mesh(handle);
                    stats.detached += 1;
                }

                let handle = surface.add_mesh(mesh);
                self.attached.insert(key, (mesh.id(), handle));
                stats.attached += 1;
            }
        }

        let stale: Vec<SlotKey> = self
            .attached
            .iter()
            .filter(|((position, index), (id, _))| {
                active
                    .get_chunk_at(*position)
                    .and_then(|chunk| chunk.sub_chunk(*index).mesh())
                    .map_or(true, |mesh| mesh.id() != *id)
            })
            .map(|(key, _)| *key)
            .collect();
        if !stale.is_empty() {
            log::debug!("Detaching {} stale meshes", stale.len());
        }
        for key in stale {
            if let Some((_, handle)) = self.attached.remove(&key) {
                surface.remove_mesh(handle);
                stats.detached += 1;
            }
        }

        stats
    }

    /// Detaches every mesh.
    pub fn clear<S>(&mut self, surface: &mut S) -> usize
    where
        S: RenderSurface<Handle = H>,
    {
        let count = self.attached.len();
        for (_, (_, handle)) in self.attached.drain() {
            surface.remove_mesh(handle);
        }
        count
    }
}

/// A render surface that keeps attached meshes in memory without drawing them.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    next_handle: u64,
    live: HashMap<u64, Arc<Mesh>>,
    total_attached: usize,
    total_detached: usize,
}

impl HeadlessSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes currently attached.
    pub fn live_meshes(&self) -> usize {
        self.live.len()
    }

    /// Total quads across all attached meshes.
    pub fn live_quads(&self) -> usize {
        self.live.values().map(|mesh| mesh.quad_count()).sum()
    }

    /// Returns `true` if a mesh with this identity is attached.
    pub fn contains(&self, id: MeshId) -> bool {
        self.live.values().any(|mesh| mesh.id() == id)
    }

    /// Iterates over the attached meshes.
    pub fn meshes(&self) -> impl Iterator<Item = &Arc<Mesh>> {
        self.live.values()
    }

    /// Number of `add_mesh` calls over the surface's lifetime.
    pub fn total_attached(&self) -> usize {
        self.total_attached
    }

    /// Number of `remove_mesh` calls over the surface's lifetime.
    pub fn total_detached(&self) -> usize {
        self.total_detached
    }
}

impl RenderSurface for HeadlessSurface {
    type Handle = u64;

    fn add_mesh(&mut self, mesh: &Arc<Mesh>) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.insert(handle, Arc::clone(mesh));
        self.total_attached += 1;
        handle
    }

    fn remove_mesh(&mut self, handle: u64) {
        if self.live.remove(&handle).is_none() {
            log::warn!("Detached unknown mesh handle {}", handle);
        }
        self.total_detached += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::Chunk;

    fn meshed_chunk(position: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(position);
        chunk.mark_terrain_generated();
        let mut meshes: [Option<Arc<Mesh>>; 16] = Default::default();
        meshes[0] = Some(Arc::new(Mesh::new(position, 0)));
        meshes[3] = Some(Arc::new(Mesh::new(position, 3)));
        chunk.install_meshes(meshes);
        chunk
    }

    #[test]
    fn sync_attaches_every_live_mesh_once() {
        let mut surface = HeadlessSurface::new();
        let mut registry = MeshRegistry::new();
        let active: ActiveSet = [meshed_chunk(ChunkCoord::new(0, 0))].into_iter().collect();

        let stats = registry.sync(&mut surface, &active, &[]);
        assert_eq!(stats, SyncStats { attached: 2, detached: 0 });
        assert_eq!(surface.live_meshes(), 2);

        let again = registry.sync(&mut surface, &active, &[]);
        assert_eq!(again, SyncStats::default());
    }

    #[test]
    fn removed_chunks_are_detached() {
        let mut surface = HeadlessSurface::new();
        let mut registry = MeshRegistry::new();
        let gone = ChunkCoord::new(4, 4);
        let active: ActiveSet = [meshed_chunk(gone), meshed_chunk(ChunkCoord::new(0, 0))]
            .into_iter()
            .collect();
        registry.sync(&mut surface, &active, &[]);

        let mut next = active.clone();
        next.remove(gone);
        let stats = registry.sync(&mut surface, &next, &[gone]);
        assert_eq!(stats.detached, 2);
        assert_eq!(surface.live_meshes(), 2);
        assert!(registry.attached_mesh(gone, 0).is_none());
    }

    #[test]
    fn rebuilt_meshes_replace_the_old_attachment() {
        let mut surface = HeadlessSurface::new();
        let mut registry = MeshRegistry::new();
        let position = ChunkCoord::new(0, 0);
        let mut active: ActiveSet = [meshed_chunk(position)].into_iter().collect();
        registry.sync(&mut surface, &active, &[]);
        let old = registry.attached_mesh(position, 0).expect("attached");

        let chunk = active.get_chunk_at_mut(position).expect("resident");
        let mut meshes: [Option<Arc<Mesh>>; 16] = Default::default();
        meshes[0] = Some(Arc::new(Mesh::new(position, 0)));
        chunk.install_meshes(meshes);

        let stats = registry.sync(&mut surface, &active, &[]);
        // Slot 0 swapped, slot 3 lost its mesh.
        assert_eq!(stats, SyncStats { attached: 1, detached: 2 });
        assert!(!surface.contains(old));
        assert_eq!(surface.live_meshes(), 1);
    }

    #[test]
    fn clear_detaches_everything() {
        let mut surface = HeadlessSurface::new();
        let mut registry = MeshRegistry::new();
        let active: ActiveSet = [meshed_chunk(ChunkCoord::new(0, 0))].into_iter().collect();
        registry.sync(&mut surface, &active, &[]);

        assert_eq!(registry.clear(&mut surface), 2);
        assert!(registry.is_empty());
        assert_eq!(surface.live_meshes(), 0);
        assert_eq!(surface.total_detached(), 2);
    }
}
