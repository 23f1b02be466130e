//! # Player Module
//!
//! The player is an axis-aligned box moved by a fixed-step physics tick. Each tick:
//!
//! 1. Gravity is subtracted from the vertical velocity.
//! 2. A ground probe tests the box shifted down by `height/2 + 0.01`; if it hits
//!    and jump is held, the vertical velocity becomes the jump strength.
//! 3. The horizontal wish direction from the movement keys is normalised and scaled
//!    by the move speed.
//! 4. The resulting displacement is resolved one axis at a time (X, then Y, then Z).
//!    An axis whose candidate position collides is not applied. A blocked downward
//!    move snaps the box onto the surface it hit and zeroes the velocity; a blocked
//!    upward move only zeroes the velocity.

use cgmath::{InnerSpace, Point3, Vector2, Vector3, Zero};
use log::trace;

use crate::{
    config::PlayerConfig,
    engine_state::camera_state::camera::{walk_forward, walk_right},
};

use super::voxels::{collision::check_collision, world::VoxelGrid};

/// Distance below the box bottom probed for ground contact.
const GROUND_PROBE_DEPTH: f32 = 0.01;
/// Gap left between the box bottom and the surface it lands on.
const LANDING_CLEARANCE: f32 = 0.001;

/// Movement keys held during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl MovementInput {
    fn has_horizontal(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// The player body.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Center of the box
    pub position: Point3<f32>,
    /// Vertical velocity in units per tick, positive up
    pub vertical_velocity: f32,
    half_extents: Vector3<f32>,
    gravity: f32,
    jump_strength: f32,
    move_speed: f32,
}

impl Player {
    /// Creates a resting player centered on `position`.
    pub fn new(position: Point3<f32>, config: &PlayerConfig) -> Self {
        Self {
            position,
            vertical_velocity: 0.0,
            half_extents: Vector3::from(config.aabb_dims) / 2.0,
            gravity: config.gravity,
            jump_strength: config.jump_strength,
            move_speed: config.move_speed,
        }
    }

    /// Creates a player at the spawn point of `grid`.
    pub fn spawn(grid: &VoxelGrid, config: &PlayerConfig) -> Self {
        Self::new(Self::spawn_point(grid, config), config)
    }

    /// Spawn position: horizontally centered, one unit above the terrain surface.
    pub fn spawn_point(grid: &VoxelGrid, config: &PlayerConfig) -> Point3<f32> {
        Point3::new(
            grid.width() as f32 / 2.0,
            grid.ground_level() as f32 + config.aabb_dims[1] / 2.0 + 1.0,
            grid.depth() as f32 / 2.0,
        )
    }

    /// Half of the box size along each axis.
    pub fn half_extents(&self) -> Vector3<f32> {
        self.half_extents
    }

    /// Whether a solid cell lies just below the box.
    pub fn on_ground(&self, grid: &VoxelGrid) -> bool {
        let probe = Point3::new(
            self.position.x,
            self.position.y - self.half_extents.y - GROUND_PROBE_DEPTH,
            self.position.z,
        );
        check_collision(grid, probe, self.half_extents).is_some()
    }

    /// Horizontal displacement `(dx, dz)` for one tick.
    ///
    /// Forward and right come from the camera's walking basis, so "forward" is always
    /// the horizontal part of the look direction. Diagonal input is normalised so it
    /// is no faster.
    pub fn wish_displacement(&self, input: &MovementInput, yaw: cgmath::Deg<f32>) -> Vector2<f32> {
        if !input.has_horizontal() {
            return Vector2::zero();
        }

        let forward = walk_forward(yaw);
        let forward = Vector2::new(forward.x, forward.z);
        let right = walk_right(yaw);
        let right = Vector2::new(right.x, right.z);

        let mut wish = Vector2::zero();
        if input.forward {
            wish += forward;
        }
        if input.backward {
            wish -= forward;
        }
        if input.right {
            wish += right;
        }
        if input.left {
            wish -= right;
        }

        if wish.magnitude2() > 0.0 {
            wish.normalize() * self.move_speed
        } else {
            wish
        }
    }

    /// Advances the player by one physics tick.
    pub fn tick(&mut self, grid: &VoxelGrid, input: &MovementInput, yaw: cgmath::Deg<f32>) {
        self.vertical_velocity -= self.gravity;
        if input.jump && self.on_ground(grid) {
            self.vertical_velocity = self.jump_strength;
        }

        let horizontal = self.wish_displacement(input, yaw);
        let delta = Vector3::new(horizontal.x, self.vertical_velocity, horizontal.y);
        self.resolve_movement(grid, delta);
    }

    /// Moves the box by `delta`, resolving collisions one axis at a time.
    ///
    /// The current vertical velocity decides how a blocked Y move is handled, so
    /// callers moving the box directly should set it to `delta.y` first.
    pub fn resolve_movement(&mut self, grid: &VoxelGrid, delta: Vector3<f32>) {
        let current = self.position;
        let target = current + delta;
        let mut resolved = current;

        let x_candidate = Point3::new(target.x, current.y, current.z);
        if check_collision(grid, x_candidate, self.half_extents).is_none() {
            resolved.x = target.x;
        }

        let y_candidate = Point3::new(resolved.x, target.y, current.z);
        match check_collision(grid, y_candidate, self.half_extents) {
            None => resolved.y = target.y,
            Some(hit) if self.vertical_velocity < 0.0 => {
                trace!("Landed on cell {:?}", hit.cell);
                self.vertical_velocity = 0.0;
                resolved.y = hit.top + self.half_extents.y + LANDING_CLEARANCE;
            }
            Some(_) => {
                if self.vertical_velocity > 0.0 {
                    self.vertical_velocity = 0.0;
                }
            }
        }

        let z_candidate = Point3::new(resolved.x, resolved.y, target.z);
        if check_collision(grid, z_candidate, self.half_extents).is_none() {
            resolved.z = target.z;
        }

        self.position = resolved;
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Deg;

    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn floor_grid() -> VoxelGrid {
        let mut grid = VoxelGrid::new(10, 10, 10);
        for x in 0..10 {
            for z in 0..10 {
                grid.set(x, 0, z, BlockType::Stone).unwrap();
            }
        }
        grid
    }

    fn standing_player() -> Player {
        // Bottom rests 0.001 above the floor top at y = 0.5.
        Player::new(Point3::new(5.0, 1.401, 5.0), &PlayerConfig::default())
    }

    #[test]
    fn spawn_point_is_above_the_ground() {
        let grid = VoxelGrid::new(30, 20, 30);
        let spawn = Player::spawn_point(&grid, &PlayerConfig::default());
        assert_eq!(spawn, Point3::new(15.0, 6.0 + 0.9 + 1.0, 15.0));
    }

    #[test]
    fn standing_player_is_on_ground_and_stays_put() {
        let grid = floor_grid();
        let mut player = standing_player();
        assert!(player.on_ground(&grid));

        for _ in 0..10 {
            player.tick(&grid, &MovementInput::default(), Deg(0.0));
        }
        assert!((player.position.y - 1.401).abs() < 1e-4);
        assert_eq!(player.vertical_velocity, 0.0);
    }

    #[test]
    fn falling_player_lands_on_the_floor() {
        let grid = floor_grid();
        let mut player = Player::new(Point3::new(5.0, 4.0, 5.0), &PlayerConfig::default());
        assert!(!player.on_ground(&grid));

        for _ in 0..120 {
            player.tick(&grid, &MovementInput::default(), Deg(0.0));
        }
        assert!((player.position.y - (0.5 + 0.9 + 0.001)).abs() < 1e-5);
        assert_eq!(player.vertical_velocity, 0.0);
    }

    #[test]
    fn jump_only_from_the_ground() {
        let grid = floor_grid();
        let jump = MovementInput {
            jump: true,
            ..Default::default()
        };

        let mut grounded = standing_player();
        grounded.tick(&grid, &jump, Deg(0.0));
        assert_eq!(grounded.vertical_velocity, 0.23);
        assert!(grounded.position.y > 1.401);

        let mut airborne = Player::new(Point3::new(5.0, 5.0, 5.0), &PlayerConfig::default());
        airborne.tick(&grid, &jump, Deg(0.0));
        assert!(airborne.vertical_velocity < 0.0);
    }

    #[test]
    fn forward_at_yaw_zero_moves_towards_negative_z() {
        let player = standing_player();
        let forward = MovementInput {
            forward: true,
            ..Default::default()
        };
        let wish = player.wish_displacement(&forward, Deg(0.0));
        assert!((wish - Vector2::new(0.0, -0.1)).magnitude() < 1e-6);

        let strafe = MovementInput {
            right: true,
            ..Default::default()
        };
        let wish = player.wish_displacement(&strafe, Deg(0.0));
        assert!((wish - Vector2::new(0.1, 0.0)).magnitude() < 1e-6);
    }

    #[test]
    fn diagonal_movement_is_not_faster() {
        let player = standing_player();
        let diagonal = MovementInput {
            forward: true,
            right: true,
            ..Default::default()
        };
        let wish = player.wish_displacement(&diagonal, Deg(37.0));
        assert!((wish.magnitude() - 0.1).abs() < 1e-6);

        let opposed = MovementInput {
            forward: true,
            backward: true,
            ..Default::default()
        };
        assert_eq!(player.wish_displacement(&opposed, Deg(0.0)), Vector2::zero());
    }

    #[test]
    fn walls_block_only_their_axis() {
        let mut grid = floor_grid();
        for y in 1..4 {
            for z in 0..10 {
                grid.set(7, y, z, BlockType::Stone).unwrap();
            }
        }
        let mut player = Player::new(Point3::new(6.1, 1.401, 5.0), &PlayerConfig::default());
        player.vertical_velocity = 0.0;
        player.resolve_movement(&grid, Vector3::new(0.3, 0.0, 0.2));
        assert_eq!(player.position.x, 6.1);
        assert!((player.position.z - 5.2).abs() < 1e-6);
    }

    #[test]
    fn rising_into_a_ceiling_stops_upward_velocity() {
        let mut grid = floor_grid();
        grid.set(5, 3, 5, BlockType::Stone).unwrap();
        let mut player = standing_player();
        player.vertical_velocity = 0.23;
        player.resolve_movement(&grid, Vector3::new(0.0, 0.23, 0.0));
        assert_eq!(player.vertical_velocity, 0.0);
        assert_eq!(player.position.y, 1.401);
    }

    #[test]
    fn walking_forward_follows_the_camera_heading() {
        use crate::engine_state::camera_state::camera::Camera;

        let player = standing_player();
        let forward = MovementInput {
            forward: true,
            ..Default::default()
        };
        for yaw in [0.0, 57.0, 181.0, 299.0] {
            let camera = Camera::new(player.position, Deg(yaw), Deg(-35.0));
            let look = camera.forward();
            let heading = Vector2::new(look.x, look.z).normalize() * 0.1;
            let wish = player.wish_displacement(&forward, camera.yaw());
            assert!((wish - heading).magnitude() < 1e-5, "yaw {yaw}: {wish:?}");
        }
    }
}
