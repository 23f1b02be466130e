//! # Graphics Resources Builder
//!
//! Creates the window and the WebGPU context the engine renders with.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Builds them once the event loop is running and hands them
//!   back through the event loop proxy
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::{path::Path, sync::Arc};

use log::info;
use wgpu::{Adapter, Device, Instance, Queue, Surface, SurfaceConfiguration};
use winit::{
    dpi::LogicalSize,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::{config::RenderConfig, engine_state::WINDOW_TITLE, error::RenderError};

/// Everything needed to start drawing into the window.
pub struct Graphics {
    /// The application window
    pub window: Arc<Window>,
    /// The WebGPU instance
    pub instance: Instance,
    /// Surface bound to the window
    pub surface: Surface<'static>,
    /// Configuration the surface was configured with
    pub surface_config: SurfaceConfiguration,
    /// The selected adapter
    pub adapter: Adapter,
    /// Logical device
    pub device: Device,
    /// Command queue for `device`
    pub queue: Queue,
    /// WGSL source of the block and outline programs
    pub shader_file_string: String,
}

/// Outcome of graphics initialization, delivered as the event loop's user event.
pub type GraphicsEvent = Result<Graphics, RenderError>;

/// Creates the window, surface, device and queue, and reads the shader source.
///
/// # Arguments
/// * `event_loop` - The active event loop used to create the window and surface
/// * `config` - Window size and shader path
fn create_graphics(event_loop: &ActiveEventLoop, config: &RenderConfig) -> GraphicsEvent {
    let window_attrs = Window::default_attributes()
        .with_title(WINDOW_TITLE)
        .with_inner_size(LogicalSize::new(config.window_width, config.window_height));
    let window = Arc::new(event_loop.create_window(window_attrs)?);

    // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance.create_surface(window.clone())?;

    let shader_file_string =
        std::fs::read_to_string(Path::new(&config.shader_path)).map_err(|source| {
            RenderError::ShaderSource {
                path: config.shader_path.clone(),
                source,
            }
        })?;

    pollster::block_on(async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Ok::<_, RenderError>(Graphics {
            window,
            instance,
            surface,
            surface_config,
            adapter,
            device,
            queue,
            shader_file_string,
        })
    })
}

/// Builds [`Graphics`] once and sends the result through the event loop proxy.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsEvent>>,
    config: RenderConfig,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// Waiting for the event loop to resume
    Builder(GraphicsBuilder),

    /// Graphics resources have been handed to the engine
    Moved,
}

impl GraphicsBuilder {
    /// Creates a builder that will report back through `event_loop_proxy`.
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsEvent>, config: RenderConfig) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
            config,
        }
    }

    /// Creates the graphics resources and sends them to the application.
    ///
    /// Does nothing after the first call.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        let gfx = create_graphics(event_loop, &self.config);
        if event_loop_proxy.send_event(gfx).is_err() {
            // The loop only refuses events once it has exited.
            log::warn!("Event loop closed before graphics were delivered");
        }
    }
}
