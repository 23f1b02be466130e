//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Input handling and cursor capture
//! - Application lifecycle events
//! - The transition from initialization to the running state

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{Graphics, GraphicsEvent, MaybeGraphics};
use input_manager::InputManager;
use log::{error, info, warn};

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{config::EngineConfig, engine_state::EngineState};

/// The main application state container that manages the application's lifecycle.
///
/// Holds the graphics builder until the window exists, then the running engine.
/// Implements `ApplicationHandler` to receive window and device events.
pub struct ApplicationState {
    /// The current graphics state
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Configuration the engine is built from
    pub config: EngineConfig,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The world, player and renderer
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: web_time::Instant,

    /// Title last written to the window
    pub title: String,
}

/// Captures and hides the cursor so mouse motion only turns the camera.
///
/// Locking is not available everywhere; confining is tried second.
fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        warn!("Could not capture the cursor: {}", e);
    }
    window.set_cursor_visible(false);
}

fn release_cursor(window: &Window) {
    if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        warn!("Could not release the cursor: {}", e);
    }
    window.set_cursor_visible(true);
}

fn is_exit_request(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
                ..
            }
    )
}

impl ApplicationState {
    /// Creates the application in its pre-window state.
    pub fn new(graphics: MaybeGraphics, config: EngineConfig) -> Self {
        Self {
            graphics,
            state: None,
            config,
        }
    }

    /// Builds the engine from freshly created graphics resources.
    ///
    /// Exits the event loop if the renderer cannot be brought up.
    fn initialize_application_state(&mut self, event_loop: &ActiveEventLoop, gfx: Graphics) {
        let window = gfx.window;
        let engine_state = match EngineState::new(
            gfx.surface,
            gfx.surface_config,
            gfx.device,
            gfx.queue,
            &gfx.shader_file_string,
            &self.config,
        ) {
            Ok(engine_state) => engine_state,
            Err(e) => {
                error!("Failed to start the renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        grab_cursor(&window);
        let title = engine_state.hud_title();
        window.set_title(&title);
        info!("Viewer running");

        self.state = Some(InitializedApplicationState {
            engine_state,
            window,
            input_manager: InputManager::new(),
            last_wait_time: web_time::Instant::now(),
            title,
        });
        self.graphics = MaybeGraphics::Moved;
    }
}

impl ApplicationHandler<GraphicsEvent> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if is_exit_request(&event) {
            event_loop.exit();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.resize_surface(size);
            }
            WindowEvent::Focused(is_focused) => {
                if is_focused {
                    grab_cursor(&state.window);
                } else {
                    state.input_manager.reset_inputs();
                    release_cursor(&state.window);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = state.engine_state.render() {
                    error!("Rendering failed: {}", e);
                    event_loop.exit();
                }
            }
            _ => (),
        }
    }

    /// Feeds raw mouse motion to the input manager.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    /// Starts graphics initialization the first time the application resumes.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the outcome of graphics initialization.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsEvent) {
        match graphics {
            Ok(gfx) => self.initialize_application_state(event_loop, gfx),
            Err(e) => {
                error!("Failed to initialize graphics: {}", e);
                event_loop.exit();
            }
        }
    }

    /// Runs one frame of input and simulation, then requests a redraw.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let now = web_time::Instant::now();
            let wait_dt = now - state.last_wait_time;
            state.last_wait_time = now;

            let processed_input = state.input_manager.get_and_reset_processed_input();
            state.engine_state.set_input_commands(processed_input);
            state.engine_state.update(wait_dt);

            let title = state.engine_state.hud_title();
            if title != state.title {
                state.window.set_title(&title);
                state.title = title;
            }

            state.window.request_redraw();
        }
    }
}
