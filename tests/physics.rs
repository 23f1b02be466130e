//! Player movement against hand-built grids.

use cgmath::{Deg, Point3, Vector3};
use voxel_viewer::{
    config::PlayerConfig,
    engine_state::{
        player::{MovementInput, Player},
        voxels::{block::block_type::BlockType, collision::check_collision, world::VoxelGrid},
    },
};

/// Stone floor at y = 0 and a stone wall filling the x = 7 plane.
fn walled_room() -> VoxelGrid {
    let mut grid = VoxelGrid::new(10, 10, 10);
    for x in 0..10 {
        for z in 0..10 {
            grid.set(x, 0, z, BlockType::Stone).unwrap();
        }
    }
    for y in 1..10 {
        for z in 0..10 {
            grid.set(7, y, z, BlockType::Stone).unwrap();
        }
    }
    grid
}

#[test]
fn small_random_moves_never_tunnel() {
    let grid = walled_room();
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let mut player = Player::new(Point3::new(3.0, 1.401, 5.0), &PlayerConfig::default());

    for _ in 0..2000 {
        let mut delta = Vector3::new(
            rng.f32() * 1.8 - 0.9,
            rng.f32() * 1.8 - 0.9,
            rng.f32() * 1.8 - 0.9,
        );
        // Stay over the floor and below the top of the wall.
        if !(1.0..9.0).contains(&(player.position.x + delta.x)) {
            delta.x = -delta.x;
        }
        if !(1.0..9.0).contains(&(player.position.z + delta.z)) {
            delta.z = -delta.z;
        }
        if player.position.y > 6.0 {
            delta.y = -delta.y.abs();
        }

        player.vertical_velocity = delta.y;
        player.resolve_movement(&grid, delta);

        assert_eq!(
            check_collision(&grid, player.position, player.half_extents()),
            None,
            "player ended inside a block at {:?}",
            player.position
        );
        assert!(player.position.x < 7.0, "walked through the wall");
    }
}

#[test]
fn dropped_player_comes_to_rest_on_the_terrain() {
    let grid = VoxelGrid::from_config(&Default::default());
    let config = PlayerConfig::default();
    let mut player = Player::spawn(&grid, &config);
    let idle = MovementInput::default();

    for _ in 0..120 {
        player.tick(&grid, &idle, Deg(0.0));
    }

    let grass_top = grid.ground_level() as f32 + 0.5;
    let expected = grass_top + config.aabb_dims[1] / 2.0 + 0.001;
    assert!((player.position.y - expected).abs() < 1e-4);
    assert_eq!(player.vertical_velocity, 0.0);
    assert!(player.on_ground(&grid));
}

#[test]
fn jump_rises_and_lands_again() {
    let grid = walled_room();
    let config = PlayerConfig::default();
    let mut player = Player::new(Point3::new(3.0, 1.401, 5.0), &config);
    let jump = MovementInput {
        jump: true,
        ..Default::default()
    };

    player.tick(&grid, &jump, Deg(0.0));
    assert_eq!(player.vertical_velocity, config.jump_strength);

    let idle = MovementInput::default();
    let mut peak = player.position.y;
    for _ in 0..60 {
        player.tick(&grid, &idle, Deg(0.0));
        peak = peak.max(player.position.y);
    }

    assert!(peak > 2.5, "peak {} too low", peak);
    assert!((player.position.y - 1.401).abs() < 1e-4);
    assert!(player.on_ground(&grid));
}

#[test]
fn walking_forward_stops_at_the_wall() {
    let grid = walled_room();
    let mut player = Player::new(Point3::new(3.0, 1.401, 5.0), &PlayerConfig::default());
    let walk = MovementInput {
        forward: true,
        ..Default::default()
    };

    // Yaw 270 turns "forward" towards +X.
    for _ in 0..100 {
        player.tick(&grid, &walk, Deg(270.0));
    }

    assert!(player.position.x > 6.0 && player.position.x + 0.3 <= 6.5 + 1e-4);
    assert!((player.position.z - 5.0).abs() < 1e-4);
}
