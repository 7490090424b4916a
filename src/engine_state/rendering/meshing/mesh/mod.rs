//! Mesh generation for voxel rendering.
//!
//! This module converts voxel data into GPU-friendly mesh representations.
//!
//! # Architecture
//! - [`Mesh`]: The geometry of one sub chunk, with vertices and indices
//! - [`Face`]: A single unit quad on one side of a voxel
//! - Culled meshing: one quad per solid-to-air boundary of every grass voxel

mod culled;
mod face;
#[allow(clippy::module_inception)]
mod mesh;

pub use culled::culled_sub_chunk;
pub use face::Face;
pub use mesh::*;
