//! # Voxel Core
//!
//! This module represents the voxel world that streams around the viewer.
//!
//! ## Architecture
//!
//! * **Block**: The three voxel kinds and the six faces of a voxel
//! * **Chunk**: A 16x256x16 column split into sixteen 16³ sub chunks
//! * **World**: The active set, every resident chunk keyed by coordinate
//! * **Neighbor resolver**: Block lookups that cross into adjacent chunks
//! * **Terrain**: Deterministic noise heightmap generation
//! * **Chunk grid**: Which chunks belong in the active set and which are ready to mesh
//! * **Tasks**: The background pass tying all of the above together
//!
//! ## Data Flow
//!
//! 1. The viewer crosses a chunk boundary
//! 2. The chunk grid moves the window, destroying and creating chunks
//! 3. Chunks whose whole neighbourhood is resident get terrain and meshes
//! 4. The finished active set replaces the published one
//!
//! ## Thread Safety
//!
//! Chunks never point at each other; neighbours are found by coordinate. Voxel
//! arrays and meshes sit behind `Arc`, so snapshots handed to the worker are
//! cheap to take and are copied on write.

pub mod block;
pub mod chunk;
pub mod chunk_grid;
pub mod neighbor_resolver;
pub mod tasks;
pub mod terrain;
pub mod world;
