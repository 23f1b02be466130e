//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex formats used for drawing voxels and the
//! targeted-block outline, plus the per-draw uniform block.

/// A vertex of the shared unit cube.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Quad-local texture coordinates: [f32; 2] (8 bytes)
///
/// Total size: 32 bytes, eight floats
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position relative to the cube center
    pub position: [f32; 3],
    /// Outward normal of the face this vertex belongs to
    pub normal: [f32; 3],
    /// UV within the face quad, in [0, 1]²
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Returns the vertex buffer layout description for the block pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    /// - `location = 2`: tex_coords (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// A vertex of the outline wireframe.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// Position relative to the cube center
    pub position: [f32; 3],
}

impl LineVertex {
    /// Returns the vertex buffer layout description for the outline pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Per-draw uniform block: where the cube goes and which atlas tile it samples.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceUniform {
    /// Model matrix, column-major
    pub model: [[f32; 4]; 4],
    /// Atlas offset in xy and scale in zw
    pub uv_offset_scale: [f32; 4],
}
