//! # Voxel Task System
//!
//! Background work on the voxel world. A chunk update moves the active window,
//! generates terrain and builds meshes in one pass on the update worker.

pub mod chunk_update_task;

pub use chunk_update_task::{ChunkUpdateResult, ChunkUpdateTask};
