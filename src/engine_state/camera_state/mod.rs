//! # Camera State Management
//!
//! Ties the first-person [`Camera`](camera::Camera) to its projection, the GPU
//! uniform the shaders read, and the frustum planes used for culling.
//!
//! The camera has no motion of its own: its position is the center of the player's
//! box, copied in every frame by [`CameraState::follow`], and only its orientation is
//! driven directly by mouse input.

use cgmath::{Deg, Point3, Vector3};

use crate::{
    config::{PlayerConfig, RenderConfig},
    error::RenderError,
};

use super::{buffer_state::BufferState, rendering::frustum::{self, FrustumPlane}};

pub mod camera;

/// Name of the GPU buffer used for camera uniform data
pub const CAMERA_BUFFER_NAME: &str = "camera_buffer";

/// Camera, projection and the uniform mirrored to the GPU.
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// Perspective projection for the current window size
    pub projection: camera::Projection,
    /// GPU-side copy of view-projection and lighting
    pub camera_uniform: camera::CameraUniform,
}

impl CameraState {
    /// Creates the camera at `position` with the configured spawn orientation.
    ///
    /// # Arguments
    /// * `position` - Initial eye position (the player's box center)
    /// * `player` - Spawn yaw and pitch
    /// * `render` - Window size, field of view, clip distances and lighting
    pub fn new(position: Point3<f32>, player: &PlayerConfig, render: &RenderConfig) -> Self {
        let camera = camera::Camera::new(position, Deg(player.spawn_yaw), Deg(player.spawn_pitch));
        let projection = camera::Projection::new(
            render.window_width,
            render.window_height,
            Deg(render.fov_y),
            render.z_near,
            render.z_far,
        );

        let mut camera_uniform =
            camera::CameraUniform::new(Vector3::from(render.light_direction), render.ambient_strength);
        camera_uniform.update_view_proj(&camera, &projection);

        Self {
            camera,
            projection,
            camera_uniform,
        }
    }

    /// Moves the eye to `position`.
    pub fn follow(&mut self, position: Point3<f32>) {
        self.camera.position = position;
    }

    /// Applies a mouse delta in pixels.
    pub fn rotate(&mut self, delta: (f64, f64), sensitivity: f32) {
        self.camera.rotate(delta, sensitivity);
    }

    /// Updates the projection for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// The six culling planes of the current view.
    pub fn frustum_planes(&self) -> [FrustumPlane; 6] {
        frustum::extract_planes(self.camera.view_matrix(), self.projection.perspective_matrix())
    }

    /// Recomputes the uniform and uploads it to [`CAMERA_BUFFER_NAME`].
    pub fn update(&mut self, buffer_state: &BufferState) -> Result<(), RenderError> {
        self.camera_uniform.update_view_proj(&self.camera, &self.projection);
        buffer_state.write_buffer(CAMERA_BUFFER_NAME, 0, bytemuck::bytes_of(&self.camera_uniform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_orientation_comes_from_config() {
        let state = CameraState::new(
            Point3::new(15.0, 8.9, 15.0),
            &PlayerConfig::default(),
            &RenderConfig::default(),
        );
        assert_eq!(state.camera.yaw(), Deg(0.0));
        assert_eq!(state.camera.pitch(), Deg(-30.0));
        assert_eq!(state.camera_uniform.ambient(), 0.4);
    }

    #[test]
    fn following_moves_the_frustum() {
        let mut state = CameraState::new(
            Point3::new(0.0, 0.0, 0.0),
            &PlayerConfig {
                spawn_pitch: 0.0,
                ..Default::default()
            },
            &RenderConfig::default(),
        );
        let ahead = Point3::new(0.0, 0.0, -5.0);
        assert!(frustum::is_box_visible(ahead, 0.5, &state.frustum_planes()));

        state.follow(Point3::new(0.0, 0.0, -20.0));
        assert!(!frustum::is_box_visible(ahead, 0.5, &state.frustum_planes()));
    }
}
