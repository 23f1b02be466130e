//! Manages WebGPU bind groups and their layouts.
//!
//! Three groups are bound for every draw:
//!
//! | Group | Contents                                   |
//! |-------|--------------------------------------------|
//! | 0     | camera view-projection and light direction |
//! | 1     | block atlas texture and sampler            |
//! | 2     | per-draw model matrix and atlas rect       |
//!
//! Group 2 uses a dynamic offset into one large uniform buffer, so a single bind
//! group serves every draw in a frame.

use std::collections::HashMap;

use wgpu::{BindGroup, BindGroupLayout, Device};

use super::{texture::Texture, vertex::InstanceUniform, INSTANCE_BUFFER_NAME};
use crate::{
    engine_state::{buffer_state::BufferState, camera_state::CAMERA_BUFFER_NAME},
    error::RenderError,
};

/// Name of the camera bind group
pub const CAMERA_BIND_GROUP: &str = "camera_bind_group";
/// Name of the camera bind group layout
pub const CAMERA_BIND_GROUP_LAYOUT: &str = "camera_bind_group_layout";
/// Name of the atlas bind group
pub const TEXTURE_BIND_GROUP: &str = "texture_bind_group";
/// Name of the atlas bind group layout
pub const TEXTURE_BIND_GROUP_LAYOUT: &str = "texture_bind_group_layout";
/// Name of the per-draw bind group
pub const INSTANCE_BIND_GROUP: &str = "instance_bind_group";
/// Name of the per-draw bind group layout
pub const INSTANCE_BIND_GROUP_LAYOUT: &str = "instance_bind_group_layout";

/// Registry of bind groups and layouts, keyed by name.
pub struct BindGroupState {
    bind_groups: HashMap<&'static str, wgpu::BindGroup>,
    bind_group_layouts: HashMap<&'static str, wgpu::BindGroupLayout>,
}

impl BindGroupState {
    /// Builds the camera, atlas and per-draw bind groups.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Registry holding the camera and instance buffers
    /// * `atlas` - The block atlas texture
    ///
    /// # Errors
    /// Fails if the camera or instance buffer has not been created yet.
    pub fn new(
        device: &Device,
        buffer_state: &BufferState,
        atlas: &Texture,
    ) -> Result<Self, RenderError> {
        let mut bind_groups = HashMap::new();
        let mut bind_group_layouts = HashMap::new();

        let (camera_bind_group, camera_bind_group_layout) =
            Self::generate_camera_bindgroups(device, buffer_state)?;
        bind_groups.insert(CAMERA_BIND_GROUP, camera_bind_group);
        bind_group_layouts.insert(CAMERA_BIND_GROUP_LAYOUT, camera_bind_group_layout);

        let (texture_bind_group, texture_bind_group_layout) =
            Self::generate_texture_bindgroups(device, atlas);
        bind_groups.insert(TEXTURE_BIND_GROUP, texture_bind_group);
        bind_group_layouts.insert(TEXTURE_BIND_GROUP_LAYOUT, texture_bind_group_layout);

        let (instance_bind_group, instance_bind_group_layout) =
            Self::generate_instance_bindgroups(device, buffer_state)?;
        bind_groups.insert(INSTANCE_BIND_GROUP, instance_bind_group);
        bind_group_layouts.insert(INSTANCE_BIND_GROUP_LAYOUT, instance_bind_group_layout);

        Ok(Self {
            bind_groups,
            bind_group_layouts,
        })
    }

    /// Retrieves a bind group by name.
    pub fn get_bind_group(&self, name: &'static str) -> Result<&wgpu::BindGroup, RenderError> {
        self.bind_groups
            .get(name)
            .ok_or(RenderError::MissingResource { kind: "bind group", name })
    }

    /// Retrieves a bind group layout by name.
    pub fn get_bind_group_layout(
        &self,
        name: &'static str,
    ) -> Result<&wgpu::BindGroupLayout, RenderError> {
        self.bind_group_layouts
            .get(name)
            .ok_or(RenderError::MissingResource {
                kind: "bind group layout",
                name,
            })
    }

    fn generate_camera_bindgroups(
        device: &Device,
        buffer_state: &BufferState,
    ) -> Result<(BindGroup, BindGroupLayout), RenderError> {
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some(CAMERA_BIND_GROUP_LAYOUT),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer_state
                    .get_buffer(CAMERA_BUFFER_NAME)?
                    .as_entire_binding(),
            }],
            label: Some(CAMERA_BIND_GROUP),
        });

        Ok((camera_bind_group, camera_bind_group_layout))
    }

    fn generate_texture_bindgroups(device: &Device, atlas: &Texture) -> (BindGroup, BindGroupLayout) {
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        // Must agree with the filterable flag of the texture entry.
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some(TEXTURE_BIND_GROUP_LAYOUT),
            });

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
            label: Some(TEXTURE_BIND_GROUP),
        });

        (texture_bind_group, texture_bind_group_layout)
    }

    fn generate_instance_bindgroups(
        device: &Device,
        buffer_state: &BufferState,
    ) -> Result<(BindGroup, BindGroupLayout), RenderError> {
        let binding_size = wgpu::BufferSize::new(std::mem::size_of::<InstanceUniform>() as u64);

        let instance_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: binding_size,
                    },
                    count: None,
                }],
                label: Some(INSTANCE_BIND_GROUP_LAYOUT),
            });

        let instance_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &instance_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: buffer_state.get_buffer(INSTANCE_BUFFER_NAME)?,
                    offset: 0,
                    size: binding_size,
                }),
            }],
            label: Some(INSTANCE_BIND_GROUP),
        });

        Ok((instance_bind_group, instance_bind_group_layout))
    }
}
