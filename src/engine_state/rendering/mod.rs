//! Rendering side of the voxel engine.
//!
//! This module contains everything between voxel data and a drawable scene: the
//! vertex format, the sub chunk mesher, and the [`RenderSurface`] seam the
//! foreground uses to attach and detach meshes.

pub mod meshing;
pub mod render_surface;
mod vertex;

// Re-export commonly used types
pub use render_surface::{HeadlessSurface, MeshRegistry, RenderSurface, SyncStats};
pub use vertex::Vertex;
