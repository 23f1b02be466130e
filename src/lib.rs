#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Viewer
//!
//! A small first-person voxel world viewer and editor built with Rust and WGPU.
//!
//! A fixed-size grid of blocks is generated at startup. The player walks around it
//! with gravity and collision, and breaks or places blocks from a limited inventory.
//!
//! ## Key Modules
//!
//! * `application_state` - Window, graphics initialization and input handling
//! * `engine_state` - World, player physics, camera, inventory and rendering
//! * `config` - JSON configuration with defaults for every field
//! * `error` - Error types for grid edits, rendering and configuration
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_viewer::run();
//! }
//! ```
//!
//! Logging goes to stdout and is filtered with `RUST_LOG` (default `info`).

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};
use log::{error, info};
use winit::event_loop::EventLoop;

use config::EngineConfig;

pub mod application_state;
pub mod config;
pub mod engine_state;
pub mod error;

/// Opens the window and runs the viewer until it is closed.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let config = EngineConfig::load();

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create the event loop: {}", e);
            return;
        }
    };

    let graphics = MaybeGraphics::Builder(GraphicsBuilder::new(
        event_loop.create_proxy(),
        config.render.clone(),
    ));
    let mut state = ApplicationState::new(graphics, config);

    if let Err(e) = event_loop.run_app(&mut state) {
        error!("Event loop terminated with an error: {}", e);
    }
}
