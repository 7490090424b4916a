//! # Terrain Generation
//!
//! Pure, deterministic mapping from `(seed, chunk coordinate)` to a populated
//! column of sub chunks.
//!
//! Every column `(x, z)` of a chunk gets a surface height
//!
//! ```text
//! height = |noise(seed, (chunk_x * 16 + x) / 30, (chunk_z * 16 + z) / 30)| * 20 + 90
//! ```
//!
//! and every block below that height is grass, everything above it air. The
//! noise primitive itself sits behind [`NoiseSource`]; the default source is
//! Perlin noise from the `noise` crate.

use noise::{NoiseFn, Perlin};

use crate::engine_state::voxels::{
    block::Block,
    chunk::{
        Chunk, ChunkCoord, SubChunk, CHUNK_DIMENSION, SUB_CHUNKS_PER_CHUNK, SUB_CHUNK_VOLUME,
    },
};

/// Horizontal distance, in blocks, that maps to one unit of noise space.
pub const TERRAIN_HORIZONTAL_SCALE: f64 = 30.0;
/// Height variation contributed by the noise, in blocks.
pub const TERRAIN_AMPLITUDE: f64 = 20.0;
/// Lowest possible surface height, in blocks.
pub const TERRAIN_BASE_HEIGHT: f64 = 90.0;

/// A pure two dimensional noise function returning values in `[-1, 1]`.
///
/// Implementations must return identical values for identical inputs.
pub trait NoiseSource: Send + Sync {
    /// Samples the noise field at `(u, v)`.
    fn sample(&self, u: f64, v: f64) -> f64;
}

/// Seeded Perlin noise.
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    /// Creates the Perlin field for the given world seed.
    pub fn new(seed: u32) -> Self {
        PerlinNoise {
            perlin: Perlin::new(seed),
        }
    }
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, u: f64, v: f64) -> f64 {
        self.perlin.get([u, v]).clamp(-1.0, 1.0)
    }
}

/// Generates chunk terrain from a world seed.
#[derive(Clone, Debug)]
pub struct TerrainGenerator<N: NoiseSource = PerlinNoise> {
    seed: u32,
    noise: N,
}

impl TerrainGenerator<PerlinNoise> {
    /// Creates a generator backed by Perlin noise seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        Self::with_noise(seed, PerlinNoise::new(seed))
    }
}

impl<N: NoiseSource> TerrainGenerator<N> {
    /// Creates a generator backed by an arbitrary noise source.
    pub fn with_noise(seed: u32, noise: N) -> Self {
        TerrainGenerator { seed, noise }
    }

    /// The world seed this generator was built with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Surface height of the world column at global block coordinates `(x, z)`.
    pub fn column_height(&self, global_x: i32, global_z: i32) -> f64 {
        let sample = self.noise.sample(
            global_x as f64 / TERRAIN_HORIZONTAL_SCALE,
            global_z as f64 / TERRAIN_HORIZONTAL_SCALE,
        );
        sample.abs() * TERRAIN_AMPLITUDE + TERRAIN_BASE_HEIGHT
    }

    /// Generates the sixteen sub chunks of the chunk at `position`.
    ///
    /// Sub chunks lying entirely above the highest column store no voxels.
    pub fn generate(&self, position: ChunkCoord) -> [SubChunk; SUB_CHUNKS_PER_CHUNK] {
        let dimension = CHUNK_DIMENSION as usize;
        let mut heights = [[0.0f64; CHUNK_DIMENSION as usize]; CHUNK_DIMENSION as usize];
        let mut max_height = f64::MIN;

        for (x, column) in heights.iter_mut().enumerate() {
            for (z, height) in column.iter_mut().enumerate() {
                *height = self.column_height(
                    position.x * CHUNK_DIMENSION + x as i32,
                    position.z * CHUNK_DIMENSION + z as i32,
                );
                max_height = max_height.max(*height);
            }
        }

        std::array::from_fn(|sub_chunk_index| {
            let base_y = sub_chunk_index * dimension;
            if base_y as f64 >= max_height {
                return SubChunk::empty();
            }

            let mut blocks = [Block::Air.to_int(); SUB_CHUNK_VOLUME];
            for (x, column) in heights.iter().enumerate() {
                for y in 0..dimension {
                    for (z, height) in column.iter().enumerate() {
                        if ((base_y + y) as f64) < *height {
                            blocks[x * dimension * dimension + y * dimension + z] =
                                Block::Grass.to_int();
                        }
                    }
                }
            }
            SubChunk::from_blocks(blocks)
        })
    }

    /// Generates terrain for `chunk` in place and marks it generated.
    ///
    /// # Panics
    /// Panics if the chunk's terrain was already generated.
    pub fn populate(&self, chunk: &mut Chunk) {
        assert!(
            !chunk.is_terrain_generated(),
            "terrain for chunk {:?} generated twice",
            chunk.position
        );
        let sub_chunks = self.generate(chunk.position);
        chunk.install_terrain(sub_chunks);
    }
}

/// Generates the sub chunks of chunk `(chunk_x, chunk_z)` for `seed` with the
/// default Perlin noise.
pub fn generate(seed: u32, chunk_x: i32, chunk_z: i32) -> [SubChunk; SUB_CHUNKS_PER_CHUNK] {
    TerrainGenerator::new(seed).generate(ChunkCoord::new(chunk_x, chunk_z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::WORLD_HEIGHT;

    struct ConstantNoise(f64);

    impl NoiseSource for ConstantNoise {
        fn sample(&self, _u: f64, _v: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let first = generate(0, 3, -7);
        let second = generate(0, 3, -7);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.blocks(), b.blocks());
        }
    }

    #[test]
    fn height_follows_the_noise_formula() {
        let generator = TerrainGenerator::with_noise(0, ConstantNoise(-0.5));
        assert_eq!(generator.column_height(12, 40), 100.0);

        let sub_chunks = generator.generate(ChunkCoord::new(0, 0));
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.install_terrain(sub_chunks);

        for y in 0..WORLD_HEIGHT {
            let expected = if y < 100 { Block::Grass } else { Block::Air };
            assert_eq!(chunk.get_block_at(7, y, 3), expected, "y = {}", y);
        }
        // 100 / 16 = 6.25, so slabs 7 and up are empty.
        assert!(!chunk.sub_chunk(6).is_empty());
        assert!(chunk.sub_chunks()[7..].iter().all(SubChunk::is_empty));
    }

    #[test]
    fn perlin_heights_stay_in_range() {
        let generator = TerrainGenerator::new(42);
        for x in -64..64 {
            for z in (-64..64).step_by(7) {
                let height = generator.column_height(x, z);
                assert!((TERRAIN_BASE_HEIGHT..=TERRAIN_BASE_HEIGHT + TERRAIN_AMPLITUDE)
                    .contains(&height));
            }
        }
    }

    #[test]
    fn populate_marks_chunk_generated() {
        let generator = TerrainGenerator::new(0);
        let mut chunk = Chunk::new(ChunkCoord::new(1, 2));
        generator.populate(&mut chunk);
        assert!(chunk.is_terrain_generated());
        // The bottom of the world is always below the surface.
        assert_eq!(chunk.get_block_at(0, 0, 0), Block::Grass);
        assert_eq!(chunk.get_block_at(0, 255, 0), Block::Air);
    }

    #[test]
    #[should_panic(expected = "generated twice")]
    fn populating_twice_panics() {
        let generator = TerrainGenerator::new(0);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        generator.populate(&mut chunk);
        generator.populate(&mut chunk);
    }
}
