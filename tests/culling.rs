//! Frustum culling of a generated world through the camera the viewer draws with.

use cgmath::Point3;
use voxel_viewer::{
    config::{PlayerConfig, RenderConfig, WorldConfig},
    engine_state::{
        camera_state::CameraState,
        player::Player,
        rendering::frustum::{self, BLOCK_HALF_EXTENT},
        voxels::world::VoxelGrid,
    },
};

fn camera_at(position: Point3<f32>, yaw: f32, pitch: f32) -> CameraState {
    CameraState::new(
        position,
        &PlayerConfig {
            spawn_yaw: yaw,
            spawn_pitch: pitch,
            ..Default::default()
        },
        &RenderConfig::default(),
    )
}

#[test]
fn looking_at_the_sky_culls_most_of_the_terrain() {
    let world = VoxelGrid::from_config(&WorldConfig::default());
    let eye = Player::spawn_point(&world, &PlayerConfig::default());
    let total = world.solid_cells().count();

    let up = camera_at(eye, 0.0, 80.0);
    let visible = frustum::visible_blocks(&world, &up.frustum_planes()).count();
    assert!(visible < total / 10, "{} of {} cells drawn", visible, total);
}

#[test]
fn the_ground_ahead_survives_culling() {
    let world = VoxelGrid::from_config(&WorldConfig::default());
    let eye = Point3::new(15.0, 7.9, 15.0);

    let down = camera_at(eye, 0.0, -60.0);
    let planes = down.frustum_planes();
    let drawn: Vec<_> = frustum::visible_blocks(&world, &planes).collect();

    assert!(drawn.iter().any(|&(cell, _)| cell == Point3::new(15, 6, 14)));
    assert!(drawn.len() < world.solid_cells().count());
}

#[test]
fn the_cell_at_the_eye_is_never_culled() {
    let world = VoxelGrid::from_config(&WorldConfig::default());
    let mut rng = fastrand::Rng::with_seed(42);

    for _ in 0..200 {
        let eye = Point3::new(
            rng.f32() * world.width() as f32,
            rng.f32() * world.height() as f32,
            rng.f32() * world.depth() as f32,
        );
        let camera = camera_at(eye, rng.f32() * 360.0, rng.f32() * 180.0 - 90.0);
        assert!(frustum::is_box_visible(
            eye,
            BLOCK_HALF_EXTENT,
            &camera.frustum_planes()
        ));
    }
}

#[test]
fn cells_behind_the_far_plane_are_culled() {
    let config = RenderConfig::default();
    let camera = camera_at(Point3::new(0.0, 0.0, 0.0), 0.0, 0.0);
    let planes = camera.frustum_planes();

    let beyond = Point3::new(0.0, 0.0, -(config.z_far + 5.0));
    let behind = Point3::new(0.0, 0.0, 10.0);
    assert!(!frustum::is_box_visible(beyond, BLOCK_HALF_EXTENT, &planes));
    assert!(!frustum::is_box_visible(behind, BLOCK_HALF_EXTENT, &planes));
}
