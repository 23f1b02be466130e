//! # Raycast Module
//!
//! Fixed-step ray marching used to find the block the player is looking at, and the
//! empty cell in front of it where a new block would be placed.

use cgmath::{Deg, Point3};

use super::world::VoxelGrid;
use crate::engine_state::camera_state::camera::look_direction;

/// Default reach of the player, in world units.
pub const DEFAULT_MAX_DISTANCE: f32 = 5.0;
/// Default distance advanced per march step.
pub const DEFAULT_STEP_SIZE: f32 = 0.05;

/// A solid cell found by [`cast_ray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaycastHit {
    /// The first solid cell along the ray.
    pub hit: Point3<i32>,
    /// The cell the ray occupied just before `hit`, if it lies inside the grid.
    /// This is where a placed block goes.
    pub previous: Option<Point3<i32>>,
}

/// Rounds a continuous position to the cell whose center is nearest.
pub fn nearest_cell(position: Point3<f32>) -> Point3<i32> {
    position.map(|v| (v + 0.5).floor() as i32)
}

/// Marches a ray from `origin` along the yaw/pitch look direction.
///
/// The ray advances `step_size` per step for `max_distance / step_size` steps. After
/// each step the position is rounded to the nearest cell and tested for solidity;
/// cells outside the grid are skipped. The previous cell reported on a hit is the
/// rounded position from before that step, so on the very first step it is the
/// origin's own cell.
///
/// # Arguments
///
/// * `grid` - The voxel grid to march through
/// * `origin` - Ray start, usually the camera position
/// * `yaw` - Rotation about the vertical axis
/// * `pitch` - Elevation above the horizon
/// * `max_distance` - Reach of the ray
/// * `step_size` - Distance covered per step
///
/// # Returns
///
/// The first solid cell hit, or `None` if the ray runs out of steps first.
pub fn cast_ray(
    grid: &VoxelGrid,
    origin: Point3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
    max_distance: f32,
    step_size: f32,
) -> Option<RaycastHit> {
    let step = look_direction(yaw, pitch) * step_size;
    let steps = (max_distance / step_size) as usize;

    let mut position = origin;
    for _ in 0..steps {
        let previous = nearest_cell(position);
        position += step;
        let cell = nearest_cell(position);

        if !grid.contains(cell) {
            continue;
        }
        if grid.is_solid(cell.x, cell.y, cell.z) {
            return Some(RaycastHit {
                hit: cell,
                previous: grid.contains(previous).then_some(previous),
            });
        }
    }

    None
}

/// [`cast_ray`] with the default reach and step size.
pub fn cast_ray_default(
    grid: &VoxelGrid,
    origin: Point3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
) -> Option<RaycastHit> {
    cast_ray(grid, origin, yaw, pitch, DEFAULT_MAX_DISTANCE, DEFAULT_STEP_SIZE)
}
