//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - First-person orientation (yaw and pitch in degrees) and the look direction
//! - View and projection matrix calculation
//! - The uniform block uploaded to the shaders
//!
//! ## Conventions
//! Yaw 0 looks down -Z and increases counter-clockwise seen from above, so yaw 90
//! looks down -X. Pitch is positive upwards. The look direction for a yaw/pitch pair is
//! `(-sin(yaw) cos(pitch), sin(pitch), -cos(yaw) cos(pitch))`; the view matrix, the
//! movement basis and block targeting all derive from it.

use cgmath::*;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// WGPU's normalized device coordinates range from -1 to 1 in X and Y, but 0 to 1
/// in Z. This matrix:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,  // Scale Z from [-1,1] to [-0.5,0.5]
    0.0, 0.0, 0.5, 1.0,  // Translate Z from [-0.5,0.5] to [0,1]
);

/// Pitch limit used when building the view matrix. At exactly ±90° the look direction
/// is parallel to the up vector and the view basis degenerates.
const SAFE_VIEW_PITCH: f32 = 89.99;

/// Lowest allowed pitch in degrees.
pub const MIN_PITCH: f32 = -90.0;
/// Highest allowed pitch in degrees.
pub const MAX_PITCH: f32 = 90.0;

/// Unit look direction for a yaw/pitch pair.
///
/// # Arguments
/// * `yaw` - Rotation about the vertical axis, 0 looking down -Z
/// * `pitch` - Elevation above the horizon
///
/// # Returns
/// `(-sin(yaw) cos(pitch), sin(pitch), -cos(yaw) cos(pitch))`
pub fn look_direction(yaw: Deg<f32>, pitch: Deg<f32>) -> Vector3<f32> {
    let (yaw_sin, yaw_cos) = Rad::from(yaw).sin_cos();
    let (pitch_sin, pitch_cos) = Rad::from(pitch).sin_cos();
    Vector3::new(-yaw_sin * pitch_cos, pitch_sin, -yaw_cos * pitch_cos)
}

/// Horizontal walking direction for a yaw, `(-sin(yaw), 0, -cos(yaw))`.
pub fn walk_forward(yaw: Deg<f32>) -> Vector3<f32> {
    let (yaw_sin, yaw_cos) = Rad::from(yaw).sin_cos();
    Vector3::new(-yaw_sin, 0.0, -yaw_cos)
}

/// Horizontal strafing direction for a yaw, `(cos(yaw), 0, -sin(yaw))`.
pub fn walk_right(yaw: Deg<f32>) -> Vector3<f32> {
    let (yaw_sin, yaw_cos) = Rad::from(yaw).sin_cos();
    Vector3::new(yaw_cos, 0.0, -yaw_sin)
}

/// Represents a first-person camera in 3D space.
///
/// The camera stores its position and orientation in degrees. Orientation only
/// changes through [`Camera::set_yaw`], [`Camera::set_pitch`] and
/// [`Camera::rotate`], which keep yaw in `[0, 360)` and pitch in `[-90, 90]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial position of the camera in world space
    /// * `yaw` - Initial yaw, wrapped into `[0, 360)`
    /// * `pitch` - Initial pitch, clamped to `[-90, 90]`
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, Point3};
    /// use voxel_viewer::engine_state::camera_state::camera::Camera;
    ///
    /// let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(370.0), Deg(120.0));
    /// assert_eq!(camera.yaw(), Deg(10.0));
    /// assert_eq!(camera.pitch(), Deg(90.0));
    /// ```
    pub fn new<V: Into<Point3<f32>>>(position: V, yaw: Deg<f32>, pitch: Deg<f32>) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: Deg(0.0),
            pitch: Deg(0.0),
        };
        camera.set_yaw(yaw);
        camera.set_pitch(pitch);
        camera
    }

    /// Current yaw in `[0, 360)`.
    pub fn yaw(&self) -> Deg<f32> {
        self.yaw
    }

    /// Current pitch in `[-90, 90]`.
    pub fn pitch(&self) -> Deg<f32> {
        self.pitch
    }

    /// Sets the yaw, wrapping it into `[0, 360)`.
    pub fn set_yaw(&mut self, yaw: Deg<f32>) {
        let wrapped = yaw.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        self.yaw = Deg(if wrapped >= 360.0 { 0.0 } else { wrapped });
    }

    /// Sets the pitch, clamping it to `[-90, 90]`.
    pub fn set_pitch(&mut self, pitch: Deg<f32>) {
        self.pitch = Deg(pitch.0.clamp(MIN_PITCH, MAX_PITCH));
    }

    /// Applies a mouse motion delta.
    ///
    /// Moving the mouse right turns right and moving it down looks down.
    ///
    /// # Arguments
    /// * `delta` - Mouse motion in pixels (x right, y down)
    /// * `sensitivity` - Degrees of rotation per pixel
    pub fn rotate(&mut self, delta: (f64, f64), sensitivity: f32) {
        let (dx, dy) = (delta.0 as f32, delta.1 as f32);
        self.set_yaw(self.yaw - Deg(dx * sensitivity));
        self.set_pitch(self.pitch - Deg(dy * sensitivity));
    }

    /// Unit look direction, shared with block targeting.
    pub fn forward(&self) -> Vector3<f32> {
        look_direction(self.yaw, self.pitch)
    }

    /// Calculates the view matrix for this camera.
    ///
    /// The view matrix transforms world coordinates to view (camera) space. It looks
    /// along [`Camera::forward`], with the pitch kept just short of vertical.
    ///
    /// # Returns
    /// A 4x4 right-handed view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let pitch = Deg(self.pitch.0.clamp(-SAFE_VIEW_PITCH, SAFE_VIEW_PITCH));
        Matrix4::look_to_rh(
            self.position,
            look_direction(self.yaw, pitch),
            Vector3::unit_y(),
        )
    }
}

/// Represents a camera's projection matrix and related parameters.
///
/// This handles the perspective projection used to render the 3D scene.
/// It manages the aspect ratio, field of view, and near/far clipping planes.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: Self::aspect_of(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    ///
    /// # Arguments
    /// * `width` - New viewport width in pixels
    /// * `height` - New viewport height in pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = Self::aspect_of(width, height);
    }

    /// The plain right-handed perspective matrix with OpenGL's [-1, 1] depth range.
    ///
    /// This is the matrix the frustum planes are extracted from.
    pub fn perspective_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// Calculates the projection matrix uploaded to the GPU.
    ///
    /// Combines the perspective projection with the OpenGL to WGPU coordinate system transform.
    ///
    /// # Returns
    /// A 4x4 projection matrix ready for use in shaders
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.perspective_matrix()
    }

    // A minimised window reports a zero height.
    fn aspect_of(width: u32, height: u32) -> f32 {
        width.max(1) as f32 / height.max(1) as f32
    }
}

/// GPU-friendly representation of camera and lighting data for shaders.
///
/// This struct is used to pass camera data to the GPU in a format that matches
/// the layout expected by the shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // We can't use cgmath with bytemuck directly so we'll have to convert the Matrix4 into a 4x4 f32 array
    view_proj: [[f32; 4]; 4],
    /// Normalised direction towards the light in xyz, ambient strength in w
    light: [f32; 4],
}

impl CameraUniform {
    /// Creates a new camera uniform with an identity matrix and the given lighting.
    ///
    /// # Arguments
    /// * `light_direction` - Direction towards the light, normalised here
    /// * `ambient` - Brightness floor of faces turned away from the light
    pub fn new(light_direction: Vector3<f32>, ambient: f32) -> Self {
        let light = normalize_or_up(light_direction);
        Self {
            view_proj: Matrix4::identity().into(),
            light: [light.x, light.y, light.z, ambient],
        }
    }

    /// Updates the view-projection matrix from the current camera state.
    ///
    /// # Arguments
    /// * `camera` - The camera to get the view matrix from
    /// * `projection` - The projection to use
    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_proj = (projection.calc_matrix() * camera.view_matrix()).into();
    }

    /// Normalised light direction.
    pub fn light_direction(&self) -> Vector3<f32> {
        Vector3::new(self.light[0], self.light[1], self.light[2])
    }

    /// Ambient strength.
    pub fn ambient(&self) -> f32 {
        self.light[3]
    }
}

/// Normalises `v`, falling back to straight up for a zero vector.
pub fn normalize_or_up(v: Vector3<f32>) -> Vector3<f32> {
    if v.magnitude2() > 0.0 {
        v.normalize()
    } else {
        Vector3::unit_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn yaw_wraps_into_a_full_turn() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(370.0), Deg(0.0));
        assert!((camera.yaw().0 - 10.0).abs() < 1e-4);
        camera.set_yaw(Deg(-30.0));
        assert!((camera.yaw().0 - 330.0).abs() < 1e-4);
        camera.set_yaw(Deg(360.0));
        assert_eq!(camera.yaw(), Deg(0.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(120.0));
        assert_eq!(camera.pitch(), Deg(90.0));
        camera.set_pitch(Deg(-100.0));
        assert_eq!(camera.pitch(), Deg(-90.0));
        camera.set_pitch(Deg(-30.0));
        assert_eq!(camera.pitch(), Deg(-30.0));
    }

    #[test]
    fn yaw_zero_looks_down_negative_z() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        assert_vec_close(camera.forward(), Vector3::new(0.0, 0.0, -1.0));
        assert_vec_close(walk_right(camera.yaw()), Vector3::new(1.0, 0.0, 0.0));

        let turned = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(90.0), Deg(0.0));
        assert_vec_close(turned.forward(), Vector3::new(-1.0, 0.0, 0.0));
        assert_vec_close(walk_right(turned.yaw()), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn right_is_forward_cross_up() {
        for yaw in [0.0, 33.0, 145.0, 260.0] {
            let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(yaw), Deg(0.0));
            assert_vec_close(walk_forward(Deg(yaw)), camera.forward());
            assert_vec_close(walk_forward(Deg(yaw)).cross(Vector3::unit_y()), walk_right(Deg(yaw)));
        }
    }

    #[test]
    fn mouse_right_turns_right_and_mouse_down_looks_down() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        let right_before = walk_right(camera.yaw());
        camera.rotate((100.0, 0.0), 0.1);
        // Turning right by 10 degrees swings the forward vector towards the old right.
        assert!(camera.forward().dot(right_before) > 0.1);
        camera.rotate((0.0, 50.0), 0.1);
        assert!((camera.pitch().0 + 5.0).abs() < 1e-4);
    }

    #[test]
    fn view_matrix_puts_the_look_target_on_the_negative_z_axis() {
        let camera = Camera::new(Point3::new(3.0, 4.0, 5.0), Deg(47.0), Deg(-20.0));
        let target = camera.position + camera.forward() * 2.0;
        let in_view = camera.view_matrix() * target.to_homogeneous();
        assert!(in_view.x.abs() < 1e-4 && in_view.y.abs() < 1e-4);
        assert!((in_view.z + 2.0).abs() < 1e-4);
    }

    #[test]
    fn view_matrix_is_finite_looking_straight_up() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(90.0));
        let m: [[f32; 4]; 4] = camera.view_matrix().into();
        assert!(m.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn uniform_normalises_the_light() {
        let uniform = CameraUniform::new(Vector3::new(0.8, 1.0, 0.6), 0.4);
        assert!((uniform.light_direction().magnitude() - 1.0).abs() < 1e-6);
        assert_eq!(uniform.ambient(), 0.4);
        assert_eq!(normalize_or_up(Vector3::new(0.0, 0.0, 0.0)), Vector3::unit_y());
    }
}
