//! Face-culled meshing for voxel rendering.
//!
//! Every grass voxel contributes one unit quad for each of its six sides whose
//! neighbouring voxel is air. Neighbours are read through a
//! [`Neighborhood`], so faces on chunk borders are culled against the adjacent
//! chunk's terrain and the world floor reads as stone.

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, Block},
    chunk::{Chunk, CHUNK_DIMENSION},
    neighbor_resolver::Neighborhood,
};

use super::{face::Face, mesh::Mesh};

/// Builds the mesh of sub chunk `sub_chunk_index` of `chunk`.
///
/// # Arguments
/// * `neighborhood` - Resolver bound to `chunk` and its eight neighbours
/// * `chunk` - The chunk being meshed
/// * `sub_chunk_index` - Which vertical slab to mesh
/// * `block_size` - World space edge length of one block
///
/// # Returns
/// `None` if the sub chunk produced no visible faces.
pub fn culled_sub_chunk(
    neighborhood: &Neighborhood<'_>,
    chunk: &Chunk,
    sub_chunk_index: usize,
    block_size: f32,
) -> Option<Mesh> {
    let sub_chunk = chunk.sub_chunk(sub_chunk_index);
    if sub_chunk.is_empty() {
        return None;
    }

    let base_x = chunk.position.x * CHUNK_DIMENSION;
    let base_y = sub_chunk_index as i32 * CHUNK_DIMENSION;
    let base_z = chunk.position.z * CHUNK_DIMENSION;
    let mut mesh = Mesh::new(chunk.position, sub_chunk_index);

    for x in 0..CHUNK_DIMENSION {
        for y in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                if sub_chunk.get_block_at(x, y, z) != Block::Grass {
                    continue;
                }

                let chunk_y = base_y + y;
                for side in BlockSide::all() {
                    let offset = side.offset();
                    let neighbor =
                        neighborhood.block_at(x + offset.x, chunk_y + offset.y, z + offset.z);
                    if !neighbor.is_solid() {
                        mesh.add_face(
                            &Face::new(base_x + x, chunk_y, base_z + z, side),
                            block_size,
                        );
                    }
                }
            }
        }
    }

    if mesh.is_empty() {
        None
    } else {
        Some(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{chunk::ChunkCoord, world::ActiveSet};

    fn empty_block_around(center: ChunkCoord) -> ActiveSet {
        let mut set = ActiveSet::new();
        for position in center.neighbors() {
            let mut chunk = Chunk::new(position);
            chunk.mark_terrain_generated();
            set.insert(chunk);
        }
        set
    }

    #[test]
    fn lone_block_gets_six_faces() {
        let center = ChunkCoord::new(0, 0);
        let set = empty_block_around(center);
        let mut chunk = Chunk::new(center);
        chunk.set_block_at(5, 37, 9, Block::Grass);
        chunk.mark_terrain_generated();

        let neighborhood = Neighborhood::around(&set, &chunk);
        let mesh = culled_sub_chunk(&neighborhood, &chunk, 2, 1.0).expect("visible");
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.quads_per_side(), [1; 6]);
        assert!(culled_sub_chunk(&neighborhood, &chunk, 3, 1.0).is_none());
    }

    #[test]
    fn floor_block_skips_bottom_face() {
        let center = ChunkCoord::new(0, 0);
        let set = empty_block_around(center);
        let mut chunk = Chunk::new(center);
        chunk.set_block_at(5, 0, 9, Block::Grass);
        chunk.mark_terrain_generated();

        let neighborhood = Neighborhood::around(&set, &chunk);
        let mesh = culled_sub_chunk(&neighborhood, &chunk, 0, 1.0).expect("visible");
        assert_eq!(mesh.quad_count(), 5);
        assert_eq!(mesh.quads_per_side()[BlockSide::BOTTOM as usize], 0);
    }

    #[test]
    fn border_faces_are_culled_against_neighbor_chunks() {
        let center = ChunkCoord::new(2, -3);
        let mut set = empty_block_around(center);
        set.get_chunk_at_mut(center.offset(1, 0))
            .expect("east neighbour")
            .set_block_at(0, 20, 4, Block::Grass);

        let mut chunk = Chunk::new(center);
        chunk.set_block_at(15, 20, 4, Block::Grass);
        chunk.mark_terrain_generated();

        let neighborhood = Neighborhood::around(&set, &chunk);
        let mesh = culled_sub_chunk(&neighborhood, &chunk, 1, 1.0).expect("visible");
        assert_eq!(mesh.quad_count(), 5);
        assert_eq!(mesh.quads_per_side()[BlockSide::RIGHT as usize], 0);
    }

    #[test]
    fn vertices_are_placed_in_world_space() {
        let center = ChunkCoord::new(-1, 2);
        let set = empty_block_around(center);
        let mut chunk = Chunk::new(center);
        chunk.set_block_at(0, 17, 0, Block::Grass);
        chunk.mark_terrain_generated();

        let neighborhood = Neighborhood::around(&set, &chunk);
        let mesh = culled_sub_chunk(&neighborhood, &chunk, 1, 0.5).expect("visible");
        for vertex in mesh.vertices() {
            let [x, y, z] = vertex.position();
            assert!((-8.0..=-7.5).contains(&x));
            assert!((8.5..=9.0).contains(&y));
            assert!((16.0..=16.5).contains(&z));
        }
    }
}
