//! # Error Types
//!
//! Typed failures for the three places the viewer can fail: mutating the voxel grid,
//! bringing up the render pipeline, and reading the configuration file.
//!
//! Read paths on the grid never fail (out-of-bounds reads are `Empty`), so only
//! `VoxelGrid::set` produces a [`GridError`].

use thiserror::Error;

/// Rejected voxel grid mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// The target cell lies outside `[0, width) x [0, height) x [0, depth)`.
    #[error("cell ({x}, {y}, {z}) is outside the voxel grid")]
    OutOfBounds {
        /// X coordinate of the rejected cell
        x: i32,
        /// Y coordinate of the rejected cell
        y: i32,
        /// Z coordinate of the rejected cell
        z: i32,
    },
}

/// Failure while acquiring GPU resources for the render pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No adapter compatible with the window surface was found.
    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to create a device.
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The window surface could not be created.
    #[error("failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// A shader source file could not be read.
    #[error("failed to read shader source '{path}': {source}")]
    ShaderSource {
        /// Path of the shader file
        path: String,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// The device rejected the shader program or the pipeline built from it.
    #[error("shader program '{label}' failed to compile or link:\n{message}")]
    ShaderCompilation {
        /// Debug label of the program
        label: &'static str,
        /// Validation message reported by the device
        message: String,
    },

    /// The atlas image exists but could not be decoded.
    #[error("failed to decode texture '{path}': {source}")]
    AtlasDecode {
        /// Path of the image file
        path: String,
        /// Underlying decode failure
        source: image::ImageError,
    },

    /// A named GPU buffer or bind group was looked up before it was created.
    #[error("no {kind} named '{name}' has been created")]
    MissingResource {
        /// What kind of resource was requested
        kind: &'static str,
        /// Registry name of the resource
        name: &'static str,
    },

    /// A buffer write would run past the end of the buffer.
    #[error("write of {len} bytes at offset {offset} overflows buffer '{name}' ({capacity} bytes)")]
    BufferOverflow {
        /// Registry name of the buffer
        name: &'static str,
        /// Byte offset of the write
        offset: u64,
        /// Length of the write in bytes
        len: u64,
        /// Allocated size of the buffer
        capacity: u64,
    },

    /// The swap chain did not hand out a frame.
    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// The window itself could not be created.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}

/// Failure while reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for [`crate::config::EngineConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
