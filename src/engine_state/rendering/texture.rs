//! Texture handling for the rendering pipeline.
//!
//! Provides the depth buffer and the block texture atlas. The atlas is read from a
//! PNG on disk; a missing file is tolerated and replaced by a single white texel so
//! the world still renders (untextured) with lighting.

use std::path::Path;

use image::RgbaImage;
use log::{info, warn};
use wgpu::util::DeviceExt;

use crate::error::RenderError;

/// A GPU texture with its view and sampler.
///
/// The underlying texture is destroyed when this value is dropped.
pub struct Texture {
    /// The underlying WebGPU texture resource.
    pub texture: wgpu::Texture,
    /// The texture view used for binding the texture to the pipeline.
    pub view: wgpu::TextureView,
    /// The sampler used for texture filtering and addressing.
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// The texture format used for depth buffers.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface dimensions.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `config` - The surface configuration containing dimensions
    /// * `label` - Debug label for the texture
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads an RGBA8 image as a nearest-filtered, edge-clamped 2D texture.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        label: &str,
    ) -> Self {
        let (width, height) = image.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Loads the block atlas from `path`, falling back to a white texel when the file
    /// does not exist.
    ///
    /// # Errors
    /// Returns [`RenderError::AtlasDecode`] if the file exists but is not a readable image.
    pub fn load_atlas(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<Self, RenderError> {
        let image = match read_atlas_image(path)? {
            Some(image) => {
                info!(
                    "Loaded texture atlas '{}' ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                image
            }
            None => {
                warn!(
                    "Texture atlas '{}' not found, rendering untextured",
                    path.display()
                );
                fallback_atlas_image()
            }
        };

        Ok(Self::from_rgba(device, queue, &image, "Block Atlas"))
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}

/// Reads and decodes the atlas image.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_atlas_image(path: &Path) -> Result<Option<RgbaImage>, RenderError> {
    let to_error = |source| RenderError::AtlasDecode {
        path: path.display().to_string(),
        source,
    };

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(to_error(image::ImageError::IoError(err))),
    };

    let image = image::load_from_memory(&bytes).map_err(to_error)?;
    Ok(Some(image.to_rgba8()))
}

/// A single opaque white texel, sampled in place of a missing atlas.
pub fn fallback_atlas_image() -> RgbaImage {
    RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]))
}
