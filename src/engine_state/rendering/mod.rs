//! Rendering system for the voxel viewer.
//!
//! [`Renderer`] owns the surface and every GPU resource: the buffer registry, bind
//! groups, pipelines, depth buffer and block atlas. A frame is assembled
//! immediate-mode style:
//!
//! ```text
//! renderer.begin_frame();
//! renderer.draw_instance(transform, uv_rect);   // once per visible block
//! renderer.draw_outline(transform);             // optional, targeted block
//! renderer.render()?;                            // upload, encode, present
//! ```
//!
//! Per-draw data goes into one uniform buffer at a fixed stride and is selected
//! with a dynamic offset, so the whole frame costs a single buffer write.

use std::{path::Path, rc::Rc};

use bytemuck::bytes_of;
use cgmath::Matrix4;
use log::{info, trace};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use bind_group_state::BindGroupState;
use pipeline_manager::{FrameDraws, PipelineManager};
use texture::Texture;
use vertex::InstanceUniform;

use super::{
    buffer_state::BufferState,
    camera_state::{camera::CameraUniform, CAMERA_BUFFER_NAME},
    voxels::block::UvRect,
};
use crate::{config::RenderConfig, error::RenderError};

mod bind_group_state;
pub mod frustum;
pub mod meshing;
mod pipeline_manager;
pub mod texture;
pub mod vertex;

pub use vertex::Vertex;

/// Name of the per-draw uniform buffer
pub const INSTANCE_BUFFER_NAME: &str = "instance_uniform_buffer";
/// Name of the shared cube vertex buffer
pub const CUBE_VERTEX_BUFFER_NAME: &str = "cube_vertex_buffer";
/// Name of the outline vertex buffer
pub const OUTLINE_VERTEX_BUFFER_NAME: &str = "outline_vertex_buffer";

/// Draws voxels into a window surface.
pub struct Renderer {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    device: Rc<Device>,
    queue: Rc<Queue>,
    pipeline_manager: PipelineManager,
    bind_group_state: BindGroupState,
    buffer_state: BufferState,
    _atlas: Texture,
    clear_color: wgpu::Color,
    instance_stride: u32,
    instance_capacity: usize,
    instances: Vec<InstanceUniform>,
    outline: Option<InstanceUniform>,
}

impl Renderer {
    /// Acquires every GPU resource needed to draw.
    ///
    /// # Arguments
    /// * `surface` - Configured window surface
    /// * `surface_config` - Its configuration
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue
    /// * `shader_string` - WGSL source of the block and outline programs
    /// * `camera_uniform` - Initial camera uniform contents
    /// * `max_instances` - Most block draws a single frame can hold
    /// * `config` - Atlas path and clear color
    ///
    /// # Errors
    /// Fails if the atlas cannot be decoded or the shader does not compile. Anything
    /// allocated before the failure is released on the way out.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Rc<Device>,
        queue: Rc<Queue>,
        shader_string: &str,
        camera_uniform: &CameraUniform,
        max_instances: usize,
        config: &RenderConfig,
    ) -> Result<Self, RenderError> {
        let atlas = Texture::load_atlas(&device, &queue, Path::new(&config.atlas_path))?;

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let instance_stride =
            wgpu::util::align_to(std::mem::size_of::<InstanceUniform>() as u64, alignment);
        // One extra slot holds the outline.
        let instance_capacity = max_instances + 1;

        let mut buffer_state = BufferState::new(device.clone(), queue.clone());
        buffer_state.create_buffer_init(
            CAMERA_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(CAMERA_BUFFER_NAME),
                contents: bytes_of(camera_uniform),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );
        buffer_state.create_buffer(
            INSTANCE_BUFFER_NAME,
            wgpu::BufferDescriptor {
                label: Some(INSTANCE_BUFFER_NAME),
                size: instance_stride * instance_capacity as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            },
        );
        buffer_state.create_buffer_init(
            CUBE_VERTEX_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(CUBE_VERTEX_BUFFER_NAME),
                contents: bytemuck::cast_slice(&meshing::cube_vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        buffer_state.create_buffer_init(
            OUTLINE_VERTEX_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(OUTLINE_VERTEX_BUFFER_NAME),
                contents: bytemuck::cast_slice(&meshing::outline_vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let bind_group_state = BindGroupState::new(&device, &buffer_state, &atlas)?;
        let pipeline_manager = PipelineManager::new(
            &device,
            &surface_config,
            surface_config.format,
            &bind_group_state,
            shader_string,
        )?;

        let [r, g, b] = config.sky_color;
        info!(
            "Renderer ready: {} instance slots of {} bytes, {} bytes of GPU buffers",
            instance_capacity,
            instance_stride,
            buffer_state.get_total_allocated_memory()
        );

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline_manager,
            bind_group_state,
            buffer_state,
            _atlas: atlas,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            instance_stride: instance_stride as u32,
            instance_capacity,
            instances: Vec::with_capacity(instance_capacity),
            outline: None,
        })
    }

    /// The buffer registry, for uniform writes from other components.
    pub fn buffer_state(&self) -> &BufferState {
        &self.buffer_state
    }

    /// Reconfigures the surface and depth buffer for a new window size.
    ///
    /// Zero-sized windows (minimized) are ignored.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.pipeline_manager.resize(&self.device, &self.surface_config);
    }

    /// Clears the draw list.
    pub fn begin_frame(&mut self) {
        self.instances.clear();
        self.outline = None;
    }

    /// Queues one textured cube.
    ///
    /// # Arguments
    /// * `transform` - Model matrix of the cube
    /// * `uv_rect` - Atlas tile sampled by every face
    pub fn draw_instance(&mut self, transform: Matrix4<f32>, uv_rect: UvRect) {
        self.instances.push(InstanceUniform {
            model: transform.into(),
            uv_offset_scale: uv_rect.offset_scale(),
        });
    }

    /// Queues the wireframe outline. Only the last call of a frame is drawn.
    pub fn draw_outline(&mut self, transform: Matrix4<f32>) {
        self.outline = Some(InstanceUniform {
            model: transform.into(),
            uv_offset_scale: UvRect::FULL.offset_scale(),
        });
    }

    /// Uploads the draw list and presents a frame.
    ///
    /// # Errors
    /// [`RenderError::BufferOverflow`] if more instances were queued than the renderer
    /// was sized for, or [`RenderError::Surface`] on an unrecoverable surface error.
    pub fn render(&mut self) -> Result<(), RenderError> {
        let stride = self.instance_stride as usize;
        let slots = self.instances.len() + usize::from(self.outline.is_some());
        let mut staging = vec![0u8; slots * stride];

        for (slot, instance) in self.instances.iter().chain(self.outline.iter()).enumerate() {
            let start = slot * stride;
            let bytes = bytes_of(instance);
            staging[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !staging.is_empty() {
            self.buffer_state.write_buffer(INSTANCE_BUFFER_NAME, 0, &staging)?;
        }

        let draws = FrameDraws {
            block_count: self.instances.len() as u32,
            outline_slot: self.outline.map(|_| self.instances.len() as u32),
            stride: self.instance_stride,
        };
        trace!(
            "Drawing {} of at most {} blocks",
            draws.block_count, self.instance_capacity
        );

        self.pipeline_manager.render(
            &self.surface,
            &self.surface_config,
            &self.device,
            &self.queue,
            &self.bind_group_state,
            &self.buffer_state,
            draws,
            self.clear_color,
        )
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        info!("Shutting down renderer");
    }
}
