//! # Engine State Module
//!
//! Everything that exists once the window and GPU are up: the voxel world, the
//! player, the camera, the inventory and the renderer.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the subsystems and runs one frame at a time
//! * `buffer_state` - Named registry of GPU buffers
//! * `camera_state` - Camera, projection and frustum planes
//! * `rendering` - Pipelines, culling and the per-frame draw list
//! * `voxels` - Block types, the grid, collision and raycasting
//! * `player` / `inventory` - Physics body and block counts
//!
//! ## Frame
//!
//! 1. Mouse motion turns the camera; hotbar keys change the selection.
//! 2. Elapsed time is converted into fixed physics ticks for the player.
//! 3. The camera moves to the player, and a ray is cast for the targeted block.
//! 4. Break and place act on the target.
//! 5. Solid cells inside the frustum are drawn, then the outline.

use std::rc::Rc;

use camera_state::CameraState;
use frame_clock::FrameClock;
use inventory::Inventory;
use log::{debug, info};
use player::{MovementInput, Player};
use rendering::{frustum, meshing, Renderer};
use voxels::{
    block::atlas_rect,
    raycast::{cast_ray_default, RaycastHit},
    world::VoxelGrid,
};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{
    application_state::input_state::ProcessedInputState, config::EngineConfig, error::RenderError,
};

pub mod buffer_state;
pub mod camera_state;
pub mod frame_clock;
pub mod inventory;
pub mod player;
pub mod rendering;
pub mod voxels;

/// Title prefix shown before the HUD text.
pub const WINDOW_TITLE: &str = "Voxel Viewer";

/// Hotbar keys, in slot order.
const HOTBAR_KEYS: [KeyCode; 4] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];

/// The running world and its renderer.
pub struct EngineState {
    /// The voxel world
    pub world: VoxelGrid,
    /// The player body
    pub player: Player,
    /// Block counts and hotbar selection
    pub inventory: Inventory,
    /// Camera state managing orientation, projection and culling planes
    pub camera_state: CameraState,
    /// The block the player is looking at
    pub target: Option<RaycastHit>,
    /// Current player actions derived from input
    pub player_actions: PlayerAction,
    renderer: Renderer,
    clock: FrameClock,
    mouse_sensitivity: f32,
}

impl EngineState {
    /// Generates the world, spawns the player and brings up the renderer.
    ///
    /// # Arguments
    ///
    /// * `surface` - The configured window surface
    /// * `surface_config` - Its configuration
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `shader_string` - WGSL source of the block and outline programs
    /// * `config` - Engine configuration
    ///
    /// # Errors
    ///
    /// Any [`RenderError`] raised while acquiring GPU resources.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        shader_string: &str,
        config: &EngineConfig,
    ) -> Result<Self, RenderError> {
        let world = VoxelGrid::from_config(&config.world);
        let player = Player::spawn(&world, &config.player);
        info!("Player spawned at {:?}", player.position);

        let mut camera_state = CameraState::new(player.position, &config.player, &config.render);
        camera_state.resize(surface_config.width, surface_config.height);

        let max_instances = world.width() * world.height() * world.depth();
        let renderer = Renderer::new(
            surface,
            surface_config,
            Rc::new(device),
            Rc::new(queue),
            shader_string,
            &camera_state.camera_uniform,
            max_instances,
            &config.render,
        )?;

        Ok(Self {
            world,
            player,
            inventory: Inventory::new(&config.inventory),
            camera_state,
            target: None,
            player_actions: PlayerAction::default(),
            renderer,
            clock: FrameClock::new(),
            mouse_sensitivity: config.player.mouse_sensitivity,
        })
    }

    /// Resizes the surface and projection when the window size changes.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.camera_state.resize(size.width, size.height);
        self.renderer.resize_surface(size);
    }

    /// Sets the input for the next [`update`](Self::update).
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.player_actions = PlayerAction::from_input(&input);
    }

    /// Advances the simulation by `frame_time`.
    pub fn update(&mut self, frame_time: web_time::Duration) {
        let actions = self.player_actions;

        if let Some(delta) = actions.rotate_view {
            self.camera_state.rotate(delta, self.mouse_sensitivity);
        }
        if let Some(slot) = actions.select_slot {
            self.inventory.select_slot(slot);
        }

        let ticks = self.clock.advance(frame_time);
        let yaw = self.camera_state.camera.yaw();
        for _ in 0..ticks {
            self.player.tick(&self.world, &actions.movement, yaw);
        }
        self.camera_state.follow(self.player.position);

        let camera = &self.camera_state.camera;
        self.target = cast_ray_default(&self.world, camera.position, camera.yaw(), camera.pitch());

        if let Some(target) = self.target {
            if actions.break_block {
                self.inventory.break_block(&mut self.world, &target);
            } else if actions.place_block {
                self.inventory.place_block(&mut self.world, &target);
            }
        }

        if self.clock.fps_updated() {
            if let Some(fps) = self.clock.fps() {
                debug!(
                    "{} FPS, {} of {} bytes of GPU buffers written",
                    fps,
                    self.renderer.buffer_state().get_total_used_memory(),
                    self.renderer.buffer_state().get_total_allocated_memory()
                );
            }
        }
    }

    /// Draws the world and the target outline.
    pub fn render(&mut self) -> Result<(), RenderError> {
        self.camera_state.update(self.renderer.buffer_state())?;
        let planes = self.camera_state.frustum_planes();

        self.renderer.begin_frame();
        for (cell, block) in frustum::visible_blocks(&self.world, &planes) {
            self.renderer
                .draw_instance(meshing::block_transform(cell), atlas_rect(block));
        }
        if let Some(target) = self.target {
            self.renderer.draw_outline(meshing::outline_transform(target.hit));
        }
        self.renderer.render()
    }

    /// Window title carrying the hotbar and frame rate.
    pub fn hud_title(&self) -> String {
        match self.clock.fps() {
            Some(fps) => format!(
                "{} | {} | {} FPS",
                WINDOW_TITLE,
                self.inventory.hotbar_summary(),
                fps
            ),
            None => format!("{} | {}", WINDOW_TITLE, self.inventory.hotbar_summary()),
        }
    }
}

/// Player actions for one frame, derived from input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerAction {
    /// Movement keys held
    pub movement: MovementInput,
    /// Mouse motion this frame, in pixels
    pub rotate_view: Option<(f64, f64)>,
    /// Hotbar slot chosen this frame
    pub select_slot: Option<usize>,
    /// Left mouse button went down this frame
    pub break_block: bool,
    /// Right mouse button went down this frame
    pub place_block: bool,
}

impl PlayerAction {
    /// Translates processed input: movement and jump are level-triggered, slot
    /// selection and break/place are edge-triggered.
    pub fn from_input(input: &ProcessedInputState) -> Self {
        let movement = MovementInput {
            forward: input.get_key_state(KeyCode::KeyW).is_active(),
            backward: input.get_key_state(KeyCode::KeyS).is_active(),
            left: input.get_key_state(KeyCode::KeyA).is_active(),
            right: input.get_key_state(KeyCode::KeyD).is_active(),
            jump: input.get_key_state(KeyCode::Space).is_active(),
        };

        let select_slot = HOTBAR_KEYS
            .iter()
            .position(|&key| input.get_key_state(key).is_just_pressed());

        Self {
            movement,
            rotate_view: input.get_mouse_delta(),
            select_slot,
            break_block: input.get_mouse_button_state(MouseButton::Left).is_just_pressed(),
            place_block: input.get_mouse_button_state(MouseButton::Right).is_just_pressed(),
        }
    }
}
