//! Render pipelines and the per-frame render pass.
//!
//! Two pipelines share one WGSL module: the textured, lit block pipeline and the
//! line-list pipeline that draws the outline around the targeted block. Shader and
//! pipeline creation run inside a validation error scope so that a bad shader
//! surfaces as [`RenderError::ShaderCompilation`] instead of a device panic.

use log::warn;
use wgpu::{Device, Queue, RenderPipeline, Surface, SurfaceConfiguration, TextureFormat};

use super::{
    bind_group_state::{
        BindGroupState, CAMERA_BIND_GROUP, CAMERA_BIND_GROUP_LAYOUT, INSTANCE_BIND_GROUP,
        INSTANCE_BIND_GROUP_LAYOUT, TEXTURE_BIND_GROUP, TEXTURE_BIND_GROUP_LAYOUT,
    },
    meshing::{CUBE_VERTEX_COUNT, OUTLINE_VERTEX_COUNT},
    texture,
    vertex::{LineVertex, Vertex},
    CUBE_VERTEX_BUFFER_NAME, OUTLINE_VERTEX_BUFFER_NAME,
};
use crate::{engine_state::buffer_state::BufferState, error::RenderError};

/// What the current frame draws, as offsets into the instance buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDraws {
    /// Number of block instances, stored in slots `0..block_count`
    pub block_count: u32,
    /// Slot holding the outline transform, if a block is targeted
    pub outline_slot: Option<u32>,
    /// Byte distance between consecutive instance slots
    pub stride: u32,
}

/// Owns the render pipelines and the depth buffer.
pub struct PipelineManager {
    block_pipeline: RenderPipeline,
    outline_pipeline: RenderPipeline,
    /// Depth texture used for depth testing
    pub depth_texture: texture::Texture,
}

impl PipelineManager {
    /// Compiles the shader and builds both pipelines.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `config` - Surface configuration, used to size the depth buffer
    /// * `texture_format` - Color format of the surface
    /// * `bind_group_state` - Supplies the three bind group layouts
    /// * `shader_string` - WGSL source with `vs_main`/`fs_main` and `vs_outline`/`fs_outline`
    ///
    /// # Errors
    /// [`RenderError::ShaderCompilation`] if the device rejects the shader or a pipeline.
    pub fn new(
        device: &Device,
        config: &SurfaceConfiguration,
        texture_format: TextureFormat,
        bind_group_state: &BindGroupState,
        shader_string: &str,
    ) -> Result<Self, RenderError> {
        let shader = with_validation(device, "Block Shader", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Block Shader"),
                source: wgpu::ShaderSource::Wgsl(shader_string.into()),
            })
        })?;

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Block Render Pipeline Layout"),
            bind_group_layouts: &[
                bind_group_state.get_bind_group_layout(CAMERA_BIND_GROUP_LAYOUT)?,
                bind_group_state.get_bind_group_layout(TEXTURE_BIND_GROUP_LAYOUT)?,
                bind_group_state.get_bind_group_layout(INSTANCE_BIND_GROUP_LAYOUT)?,
            ],
            push_constant_ranges: &[],
        });

        let color_targets = [Some(wgpu::ColorTargetState {
            format: texture_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let block_pipeline = with_validation(device, "Block Render Pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Block Render Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &color_targets,
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(depth_stencil(wgpu::CompareFunction::Less)),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })?;

        let outline_pipeline = with_validation(device, "Outline Render Pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Outline Render Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_outline"),
                    compilation_options: Default::default(),
                    buffers: &[LineVertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_outline"),
                    compilation_options: Default::default(),
                    targets: &color_targets,
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::LineList,
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil(wgpu::CompareFunction::LessEqual)),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })?;

        let depth_texture = texture::Texture::create_depth_texture(device, config, "DEPTH TEXTURE");

        Ok(Self {
            block_pipeline,
            outline_pipeline,
            depth_texture,
        })
    }

    /// Records and submits one frame.
    ///
    /// Clears to `clear_color`, draws every block slot with the block pipeline, then
    /// the outline slot (if any) with the line pipeline, and presents.
    ///
    /// A lost or outdated surface is reconfigured and the frame is skipped. A timed
    /// out acquire is skipped with a warning.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &self,
        surface: &Surface,
        surface_config: &SurfaceConfiguration,
        device: &Device,
        queue: &Queue,
        bind_group_state: &BindGroupState,
        buffer_state: &BufferState,
        draws: FrameDraws,
        clear_color: wgpu::Color,
    ) -> Result<(), RenderError> {
        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                surface.configure(device, surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame, skipping it");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let camera_bind_group = bind_group_state.get_bind_group(CAMERA_BIND_GROUP)?;
        let texture_bind_group = bind_group_state.get_bind_group(TEXTURE_BIND_GROUP)?;
        let instance_bind_group = bind_group_state.get_bind_group(INSTANCE_BIND_GROUP)?;
        let cube_vertices = buffer_state.get_buffer(CUBE_VERTEX_BUFFER_NAME)?;
        let outline_vertices = buffer_state.get_buffer(OUTLINE_VERTEX_BUFFER_NAME)?;

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = device.create_command_encoder(&Default::default());
        {
            let depth_stencil_attachment = Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                ..Default::default()
            });

            rpass.set_pipeline(&self.block_pipeline);
            rpass.set_bind_group(0, camera_bind_group, &[]);
            rpass.set_bind_group(1, texture_bind_group, &[]);
            rpass.set_vertex_buffer(0, cube_vertices.slice(..));
            for slot in 0..draws.block_count {
                rpass.set_bind_group(2, instance_bind_group, &[slot * draws.stride]);
                rpass.draw(0..CUBE_VERTEX_COUNT, 0..1);
            }

            if let Some(slot) = draws.outline_slot {
                rpass.set_pipeline(&self.outline_pipeline);
                rpass.set_vertex_buffer(0, outline_vertices.slice(..));
                rpass.set_bind_group(2, instance_bind_group, &[slot * draws.stride]);
                rpass.draw(0..OUTLINE_VERTEX_COUNT, 0..1);
            }
        }

        queue.submit([encoder.finish()]);
        frame.present();
        Ok(())
    }

    /// Recreates the depth texture for a new surface size.
    pub fn resize(&mut self, device: &Device, config: &SurfaceConfiguration) {
        self.depth_texture = texture::Texture::create_depth_texture(device, config, "DEPTH TEXTURE");
    }
}

fn depth_stencil(depth_compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: texture::Texture::DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Runs `create` inside a validation error scope and converts a captured error.
fn with_validation<T>(
    device: &Device,
    label: &'static str,
    create: impl FnOnce() -> T,
) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let created = create();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(RenderError::ShaderCompilation {
            label,
            message: err.to_string(),
        }),
        None => Ok(created),
    }
}
