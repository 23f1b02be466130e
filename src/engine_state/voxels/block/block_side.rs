//! # Block Side Module
//!
//! This module defines the six faces of a unit voxel cube: their outward normals and
//! their corner positions, wound counter-clockwise when seen from outside the cube.

use cgmath::Vector3;

/// Corners of the unit cube centered on the origin.
///
/// Index layout: 0-3 are the front (+Z) face, 4-7 the back (-Z) face, each ordered
/// left-bottom, right-bottom, right-top, left-top when seen from +Z.
pub const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
];

/// The twelve edges of the cube as pairs of [`CUBE_CORNERS`] indices.
pub const CUBE_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Represents the six possible faces of a voxel block.
///
/// The order is: [Front, Back, Left, Right, Top, Bottom]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    Front = 0,

    /// The back face (facing negative Z)
    Back = 1,

    /// The left face (facing negative X)
    Left = 2,

    /// The right face (facing positive X)
    Right = 3,

    /// The top face (facing positive Y)
    Top = 4,

    /// The bottom face (facing negative Y)
    Bottom = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::Front,
            BlockSide::Back,
            BlockSide::Left,
            BlockSide::Right,
            BlockSide::Top,
            BlockSide::Bottom,
        ]
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        match self {
            BlockSide::Front => Vector3::new(0.0, 0.0, 1.0),
            BlockSide::Back => Vector3::new(0.0, 0.0, -1.0),
            BlockSide::Left => Vector3::new(-1.0, 0.0, 0.0),
            BlockSide::Right => Vector3::new(1.0, 0.0, 0.0),
            BlockSide::Top => Vector3::new(0.0, 1.0, 0.0),
            BlockSide::Bottom => Vector3::new(0.0, -1.0, 0.0),
        }
    }

    /// Indices into [`CUBE_CORNERS`] of this face's quad, counter-clockwise from outside.
    ///
    /// The first corner takes quad-local UV (0, 0), then (1, 0), (1, 1), (0, 1).
    pub fn corner_indices(self) -> [usize; 4] {
        match self {
            BlockSide::Front => [0, 1, 2, 3],
            BlockSide::Back => [5, 4, 7, 6],
            BlockSide::Left => [4, 0, 3, 7],
            BlockSide::Right => [1, 5, 6, 2],
            BlockSide::Top => [3, 2, 6, 7],
            BlockSide::Bottom => [4, 5, 1, 0],
        }
    }

    /// Corner positions of this face's quad, counter-clockwise from outside.
    pub fn corners(self) -> [[f32; 3]; 4] {
        self.corner_indices().map(|i| CUBE_CORNERS[i])
    }
}
