//! Static geometry for voxel rendering.
//!
//! Every block is drawn from the same 36-vertex unit cube, positioned by a per-draw
//! model matrix. The targeted block's wireframe comes from a 24-vertex line list
//! built from the cube's twelve edges.
//!
//! Lighting is a single directional light plus an ambient floor, evaluated per
//! face: `ambient + max(n · l, 0) * (1 - ambient)`. The shader computes the same
//! expression; [`face_brightness`] is the CPU reference for it.

use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

use super::vertex::{LineVertex, Vertex};
use crate::engine_state::voxels::block::block_side::{BlockSide, CUBE_CORNERS, CUBE_EDGES};

/// Vertices in the shared cube mesh (six faces of two triangles).
pub const CUBE_VERTEX_COUNT: u32 = 36;
/// Vertices in the outline line list (twelve edges).
pub const OUTLINE_VERTEX_COUNT: u32 = 24;
/// Outline boxes are drawn this much larger than a cell to stay off the faces.
pub const OUTLINE_SCALE: f32 = 1.002;

/// Quad-local UVs assigned to a face's corners in winding order.
const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
/// Corner order of the two triangles that make up a quad.
const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// Builds the unit cube as a non-indexed triangle list, counter-clockwise from outside.
pub fn cube_vertices() -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(CUBE_VERTEX_COUNT as usize);
    for side in BlockSide::all() {
        let corners = side.corners();
        let normal: [f32; 3] = side.normal().into();
        for corner in QUAD_TRIANGLES {
            vertices.push(Vertex {
                position: corners[corner],
                normal,
                tex_coords: QUAD_TEX_COORDS[corner],
            });
        }
    }
    vertices
}

/// Builds the unit cube's edges as a line list.
pub fn outline_vertices() -> Vec<LineVertex> {
    CUBE_EDGES
        .iter()
        .flat_map(|edge| edge.map(|corner| LineVertex {
            position: CUBE_CORNERS[corner],
        }))
        .collect()
}

/// Lambert term with an ambient floor.
///
/// `light_direction` points from the surface towards the light and need not be
/// normalized. The result lies in `[ambient, 1]` for `ambient` in `[0, 1]`.
pub fn face_brightness(normal: Vector3<f32>, light_direction: Vector3<f32>, ambient: f32) -> f32 {
    let diffuse = normal.normalize().dot(light_direction.normalize()).max(0.0);
    ambient + diffuse * (1.0 - ambient)
}

/// Model matrix placing the unit cube on a cell.
pub fn block_transform(cell: Point3<i32>) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(cell.x as f32, cell.y as f32, cell.z as f32))
}

/// Model matrix for the outline around a cell.
pub fn outline_transform(cell: Point3<i32>) -> Matrix4<f32> {
    block_transform(cell) * Matrix4::from_scale(OUTLINE_SCALE)
}

#[cfg(test)]
mod tests {
    use cgmath::{Vector4, Zero};

    use super::*;

    #[test]
    fn cube_has_two_outward_triangles_per_face() {
        let vertices = cube_vertices();
        assert_eq!(vertices.len(), CUBE_VERTEX_COUNT as usize);

        for triangle in vertices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vector3::from(triangle[i].position));
            let winding = (b - a).cross(c - a);
            let normal = Vector3::from(triangle[0].normal);
            assert!(winding.dot(normal) > 0.0);
            // Every vertex of the triangle sits on the face its normal names.
            for vertex in triangle {
                assert!((Vector3::from(vertex.position).dot(normal) - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn each_face_covers_the_whole_tile() {
        for face in cube_vertices().chunks(6) {
            let mut tex_coords: Vec<[f32; 2]> = face.iter().map(|v| v.tex_coords).collect();
            tex_coords.sort_by(|a, b| a.partial_cmp(b).unwrap());
            tex_coords.dedup();
            assert_eq!(tex_coords, vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
        }
    }

    #[test]
    fn outline_has_twelve_edges() {
        let vertices = outline_vertices();
        assert_eq!(vertices.len(), OUTLINE_VERTEX_COUNT as usize);
        for pair in vertices.chunks(2) {
            let length = (Vector3::from(pair[0].position) - Vector3::from(pair[1].position)).magnitude();
            assert!((length - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn brightness_is_ambient_when_facing_away() {
        let up = Vector3::unit_y();
        assert_eq!(face_brightness(-up, up, 0.3), 0.3);
        assert!((face_brightness(up, up * 4.0, 0.3) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn brightness_stays_in_range() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..500 {
            let mut random_vector = || {
                Vector3::new(rng.f32() - 0.5, rng.f32() - 0.5, rng.f32() - 0.5)
            };
            let normal = random_vector();
            let light = random_vector();
            if normal.is_zero() || light.is_zero() {
                continue;
            }
            let ambient = 0.25;
            let brightness = face_brightness(normal, light, ambient);
            assert!((ambient..=1.0 + 1e-6).contains(&brightness));
        }
    }

    #[test]
    fn block_transform_moves_the_cube_onto_its_cell() {
        let moved = block_transform(Point3::new(3, -1, 7)) * Vector4::new(0.5, 0.5, 0.5, 1.0);
        assert_eq!(moved, Vector4::new(3.5, -0.5, 7.5, 1.0));
    }
}
