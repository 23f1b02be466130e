//! # Collision Module
//!
//! Axis-aligned box queries against the voxel grid. Every solid cell is treated as a
//! unit box centered on its integer coordinates.
//!
//! Resolution of movement is done by the caller one axis at a time (X, then Y, then
//! Z), testing the candidate position for each axis with [`check_collision`]. See
//! `Player::tick` for the full policy.

use cgmath::{Point3, Vector3};

use super::world::VoxelGrid;

/// Margin added around the box when choosing which cells to test, so boxes that
/// touch a cell face exactly still consider that cell.
const CELL_RANGE_EPSILON: f32 = 0.01;

/// Outcome of a box-vs-grid query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Grid coordinates of the first overlapping cell found.
    pub cell: Point3<i32>,
    /// World-space Y of that cell's top face (`cell.y + 0.5`).
    pub top: f32,
}

/// Tests an axis-aligned box against every solid cell it could touch.
///
/// The candidate cells are those in `floor(min - ε) ..= ceil(max + ε)` on each axis,
/// clamped to the grid. Overlap is strict on every axis, so boxes that only share a
/// face with a cell do not collide.
///
/// # Arguments
///
/// * `grid` - The voxel grid to test against
/// * `center` - Center of the box
/// * `half_extents` - Half of the box size along each axis
///
/// # Returns
///
/// The first colliding cell found (in x, y, z iteration order) and its top surface,
/// or `None` if the box is clear.
pub fn check_collision(
    grid: &VoxelGrid,
    center: Point3<f32>,
    half_extents: Vector3<f32>,
) -> Option<Collision> {
    let min = center - half_extents;
    let max = center + half_extents;

    let x_range = cell_range(min.x, max.x, grid.width());
    let y_range = cell_range(min.y, max.y, grid.height());
    let z_range = cell_range(min.z, max.z, grid.depth());

    for bx in x_range.clone() {
        for by in y_range.clone() {
            for bz in z_range.clone() {
                if !grid.is_solid(bx, by, bz) {
                    continue;
                }

                let cell_min = Point3::new(bx as f32 - 0.5, by as f32 - 0.5, bz as f32 - 0.5);
                let cell_max = Point3::new(bx as f32 + 0.5, by as f32 + 0.5, bz as f32 + 0.5);
                let overlaps = min.x < cell_max.x
                    && max.x > cell_min.x
                    && min.y < cell_max.y
                    && max.y > cell_min.y
                    && min.z < cell_max.z
                    && max.z > cell_min.z;

                if overlaps {
                    return Some(Collision {
                        cell: Point3::new(bx, by, bz),
                        top: cell_max.y,
                    });
                }
            }
        }
    }

    None
}

/// Inclusive range of cell coordinates a `[min, max]` interval may overlap.
fn cell_range(min: f32, max: f32, extent: usize) -> std::ops::RangeInclusive<i32> {
    let low = ((min - CELL_RANGE_EPSILON).floor() as i32).max(0);
    let high = ((max + CELL_RANGE_EPSILON).ceil() as i32).min(extent as i32 - 1);
    low..=high
}
