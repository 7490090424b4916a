//! Mesh data structures for voxel rendering.
//!
//! A [`Mesh`] is the immutable, renderable geometry of one sub chunk: a list of
//! unit quads, four vertices and six indices each. Meshes are built on the
//! worker and then shared read-only, so every mesh carries a process-unique
//! [`MeshId`] the foreground uses to tell a rebuilt mesh from the one it
//! already attached.

use std::sync::atomic::{AtomicU64, Ordering};

use super::face::Face;
use crate::engine_state::{
    rendering::Vertex,
    voxels::{block::block_side::BlockSide, chunk::ChunkCoord},
};

/// Lowest `v` texture coordinate used by voxel quads.
pub const ATLAS_V_MIN: f32 = 0.0;
/// Highest `v` texture coordinate used by voxel quads; the lower half of the atlas.
pub const ATLAS_V_MAX: f32 = 0.5;

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a built mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl MeshId {
    fn next() -> Self {
        MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric identity.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Geometry of a single sub chunk.
#[derive(Debug)]
pub struct Mesh {
    id: MeshId,
    position: ChunkCoord,
    sub_chunk_index: usize,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Creates a new, empty mesh for sub chunk `sub_chunk_index` of the chunk at `position`.
    ///
    /// # Arguments
    /// * `position` - The chunk this mesh belongs to
    /// * `sub_chunk_index` - The vertical slab, `0` at the bottom of the world
    ///
    /// # Returns
    /// A new `Mesh` with a fresh [`MeshId`] and no geometry.
    pub fn new(position: ChunkCoord, sub_chunk_index: usize) -> Self {
        Mesh {
            id: MeshId::next(),
            position,
            sub_chunk_index,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Appends one face, scaling its corners by `block_size`.
    pub fn add_face(&mut self, face: &Face, block_size: f32) {
        let num_faces_generated = self.quad_count() as u32;
        self.vertices
            .extend_from_slice(&Self::generate_face_vertices(face, block_size));
        self.indices
            .extend_from_slice(&Self::generate_face_indices(num_faces_generated));
    }

    /// Generates vertex data for a single face of a block.
    ///
    /// # Arguments
    /// * `face` - The face to generate vertices for
    /// * `block_size` - World space edge length of one block
    ///
    /// # Returns
    /// The four corners of the face in lower-left, lower-right, upper-left,
    /// upper-right order. Together with the indices from
    /// [`Mesh::generate_face_indices`] they form two counter-clockwise triangles.
    pub fn generate_face_vertices(face: &Face, block_size: f32) -> [Vertex; 4] {
        let normal = face.block_side.normal();
        let scale = |corner: cgmath::Point3<i32>| {
            [
                corner.x as f32 * block_size,
                corner.y as f32 * block_size,
                corner.z as f32 * block_size,
            ]
        };

        [
            Vertex::new(scale(face.ll), normal, [0.0, ATLAS_V_MIN]),
            Vertex::new(scale(face.lr), normal, [1.0, ATLAS_V_MIN]),
            Vertex::new(scale(face.ul), normal, [0.0, ATLAS_V_MAX]),
            Vertex::new(scale(face.ur), normal, [1.0, ATLAS_V_MAX]),
        ]
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    ///
    /// # Arguments
    /// * `num_faces_generated` - The number of faces that have been generated so far
    ///
    /// # Returns
    /// Six indices forming two triangles over the face's four vertices.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        let base = num_faces_generated * 4;
        [base, base + 1, base + 3, base, base + 3, base + 2]
    }

    /// Identity of this mesh.
    pub fn id(&self) -> MeshId {
        self.id
    }

    /// The chunk this mesh belongs to.
    pub fn position(&self) -> ChunkCoord {
        self.position
    }

    /// Index of the sub chunk this mesh covers.
    pub fn sub_chunk_index(&self) -> usize {
        self.sub_chunk_index
    }

    /// Vertex buffer contents.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Index buffer contents.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Returns `true` if the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Counts the quads facing each side, indexed by [`BlockSide`] value.
    pub fn quads_per_side(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for quad in self.vertices.chunks_exact(4) {
            if let Some(side) = BlockSide::all()
                .into_iter()
                .find(|side| side.normal() == quad[0].normal())
            {
                counts[side as usize] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_ids_are_unique() {
        let a = Mesh::new(ChunkCoord::new(0, 0), 0);
        let b = Mesh::new(ChunkCoord::new(0, 0), 0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn faces_append_four_vertices_and_six_indices() {
        let mut mesh = Mesh::new(ChunkCoord::new(0, 0), 0);
        mesh.add_face(&Face::new(0, 0, 0, BlockSide::TOP), 1.0);
        mesh.add_face(&Face::new(1, 0, 0, BlockSide::TOP), 1.0);

        assert_eq!(mesh.quad_count(), 2);
        assert_eq!(mesh.vertices().len(), 8);
        assert_eq!(mesh.indices(), &[0, 1, 3, 0, 3, 2, 4, 5, 7, 4, 7, 6]);
        assert_eq!(mesh.quads_per_side()[BlockSide::TOP as usize], 2);
    }

    #[test]
    fn vertices_are_scaled_and_use_lower_atlas_half() {
        let vertices = Mesh::generate_face_vertices(&Face::new(1, 2, 3, BlockSide::TOP), 2.0);
        for vertex in &vertices {
            assert_eq!(vertex.position()[1], 6.0);
            assert!((ATLAS_V_MIN..=ATLAS_V_MAX).contains(&vertex.tex_coords()[1]));
            assert_eq!(vertex.normal(), [0.0, 1.0, 0.0]);
        }
    }
}
