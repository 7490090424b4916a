//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format emitted by the mesher and the buffer
//! layout a GPU pipeline needs to consume it.

/// A vertex of a sub chunk mesh.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), world space, already scaled by the block size
/// - Normal: 3x f32 (12 bytes), outward unit normal of the face
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Vertex {
            position,
            normal,
            tex_coords,
        }
    }

    /// World space position.
    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    /// Outward facing normal.
    pub fn normal(&self) -> [f32; 3] {
        self.normal
    }

    /// Atlas texture coordinates.
    pub fn tex_coords(&self) -> [f32; 2] {
        self.tex_coords
    }

    /// Returns the vertex buffer layout description for a shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    /// - `location = 2`: tex_coords (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
