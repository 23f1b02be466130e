//! View-frustum culling.
//!
//! The six clip planes are pulled straight out of the combined clip matrix
//! `P * V` (Gribb/Hartmann): with `r0..r3` the matrix rows, left is `r3 + r0`,
//! right `r3 - r0`, bottom `r3 + r1`, top `r3 - r1`, near `r3 + r2` and far
//! `r3 - r2`. The projection must use the GL depth convention (`[-1, 1]`) for the
//! near plane formula to hold, so callers pass [`Projection::perspective_matrix`]
//! rather than the wgpu-corrected matrix.
//!
//! [`Projection::perspective_matrix`]: crate::engine_state::camera_state::camera::Projection::perspective_matrix

use cgmath::{Matrix, Matrix4, Point3, Vector4};

use crate::engine_state::voxels::{block::block_type::BlockType, world::VoxelGrid};

/// Half of a voxel's edge length.
pub const BLOCK_HALF_EXTENT: f32 = 0.5;

/// A plane `a*x + b*y + c*z + d = 0` whose positive side faces into the frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumPlane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl FrustumPlane {
    fn from_row(row: Vector4<f32>) -> Self {
        Self {
            a: row.x,
            b: row.y,
            c: row.z,
            d: row.w,
        }
    }

    /// Scales the plane so `(a, b, c)` has unit length.
    ///
    /// Degenerate planes (zero normal) are returned unchanged.
    fn normalized(self) -> Self {
        let length = (self.a * self.a + self.b * self.b + self.c * self.c).sqrt();
        if length == 0.0 {
            return self;
        }
        Self {
            a: self.a / length,
            b: self.b / length,
            c: self.c / length,
            d: self.d / length,
        }
    }

    /// Signed distance from the plane, positive on the inside.
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.a * point.x + self.b * point.y + self.c * point.z + self.d
    }
}

/// Extracts the left, right, bottom, top, near and far planes of `projection * view`.
pub fn extract_planes(view: Matrix4<f32>, projection: Matrix4<f32>) -> [FrustumPlane; 6] {
    let clip = projection * view;
    let [r0, r1, r2, r3] = [0, 1, 2, 3].map(|i| clip.row(i));

    [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r3 + r2, r3 - r2]
        .map(|row| FrustumPlane::from_row(row).normalized())
}

/// Tests a cube centered at `center` against every plane.
///
/// For each plane the cube's extent along the normal is
/// `r = half_extent * (|a| + |b| + |c|)`; the cube is rejected as soon as its center
/// lies further than `r` outside one plane. Cubes straddling a plane are kept, so a
/// visible cube is never culled.
pub fn is_box_visible(center: Point3<f32>, half_extent: f32, planes: &[FrustumPlane; 6]) -> bool {
    planes.iter().all(|plane| {
        let r = half_extent * (plane.a.abs() + plane.b.abs() + plane.c.abs());
        plane.signed_distance(center) >= -r
    })
}

/// Solid cells of `grid` that survive the frustum test.
pub fn visible_blocks<'a>(
    grid: &'a VoxelGrid,
    planes: &'a [FrustumPlane; 6],
) -> impl Iterator<Item = (Point3<i32>, BlockType)> + 'a {
    grid.solid_cells().filter(move |(cell, _)| {
        let center = Point3::new(cell.x as f32, cell.y as f32, cell.z as f32);
        is_box_visible(center, BLOCK_HALF_EXTENT, planes)
    })
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, SquareMatrix, Zero};

    use super::*;
    use crate::engine_state::camera_state::camera::{Camera, Projection};

    fn planes_for(camera: &Camera) -> [FrustumPlane; 6] {
        let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        extract_planes(camera.view_matrix(), projection.perspective_matrix())
    }

    #[test]
    fn planes_are_unit_length() {
        let camera = Camera::new((3.0, 4.0, 5.0), Deg(30.0), Deg(-10.0));
        for plane in planes_for(&camera) {
            let length = (plane.a * plane.a + plane.b * plane.b + plane.c * plane.c).sqrt();
            assert!((length - 1.0).abs() < 1e-4, "{plane:?}");
        }
    }

    #[test]
    fn near_and_far_planes_sit_at_the_clip_distances() {
        // Yaw 0 looks down -Z.
        let camera = Camera::new((0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        let planes = planes_for(&camera);
        let near = planes[4];
        let far = planes[5];
        assert!(near.signed_distance(Point3::new(0.0, 0.0, -0.2)) > 0.0);
        assert!(near.signed_distance(Point3::new(0.0, 0.0, -0.05)) < 0.0);
        assert!(far.signed_distance(Point3::new(0.0, 0.0, -99.0)) > 0.0);
        assert!(far.signed_distance(Point3::new(0.0, 0.0, -101.0)) < 0.0);
    }

    #[test]
    fn box_ahead_is_visible_and_box_behind_is_not() {
        let camera = Camera::new((0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        let planes = planes_for(&camera);
        assert!(is_box_visible(Point3::new(0.0, 0.0, -10.0), 0.5, &planes));
        assert!(!is_box_visible(Point3::new(0.0, 0.0, 10.0), 0.5, &planes));
        assert!(!is_box_visible(Point3::new(50.0, 0.0, -10.0), 0.5, &planes));
        assert!(!is_box_visible(Point3::new(0.0, 0.0, -200.0), 0.5, &planes));
    }

    #[test]
    fn box_around_the_camera_is_visible() {
        let camera = Camera::new((7.0, 2.0, -4.0), Deg(123.0), Deg(40.0));
        let planes = planes_for(&camera);
        assert!(is_box_visible(Point3::new(7.0, 2.0, -4.0), 0.5, &planes));
    }

    #[test]
    fn points_inside_the_frustum_are_never_culled() {
        let camera = Camera::new((1.0, 2.0, 3.0), Deg(200.0), Deg(-25.0));
        let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let view = camera.view_matrix();
        let clip = projection.perspective_matrix();
        let planes = extract_planes(view, clip);
        let Some(inverse) = (clip * view).invert() else {
            panic!("clip matrix is singular");
        };

        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..1000 {
            let ndc = Vector4::new(
                rng.f32() * 2.0 - 1.0,
                rng.f32() * 2.0 - 1.0,
                rng.f32() * 1.9 - 0.95,
                1.0,
            );
            let world = inverse * ndc;
            let point = Point3::new(world.x / world.w, world.y / world.w, world.z / world.w);
            assert!(
                is_box_visible(point, 0.5, &planes),
                "point {point:?} inside the frustum was culled"
            );
        }
    }

    #[test]
    fn degenerate_matrix_culls_nothing() {
        let planes = extract_planes(Matrix4::zero(), Matrix4::identity());
        for plane in planes {
            assert!(!plane.a.is_nan() && !plane.d.is_nan());
        }
        assert!(is_box_visible(Point3::new(123.0, -9.0, 4.0), 0.5, &planes));
    }

    #[test]
    fn box_past_a_plane_by_more_than_its_projected_extent_is_culled() {
        let pass = FrustumPlane { a: 0.0, b: 0.0, c: 0.0, d: 1.0 };
        let x_positive = FrustumPlane { a: 1.0, b: 0.0, c: 0.0, d: 0.0 };
        let planes = [x_positive, pass, pass, pass, pass, pass];

        // Extent along +X is 0.5, even though the bounding sphere reaches 0.87.
        assert!(!is_box_visible(Point3::new(-0.7, 0.0, 0.0), 0.5, &planes));
        assert!(is_box_visible(Point3::new(-0.4, 0.0, 0.0), 0.5, &planes));

        // A diagonal plane sees the cube's corner: extent 0.5 * √2.
        let diagonal = FrustumPlane {
            a: std::f32::consts::FRAC_1_SQRT_2,
            b: std::f32::consts::FRAC_1_SQRT_2,
            c: 0.0,
            d: 0.0,
        };
        let planes = [diagonal, pass, pass, pass, pass, pass];
        assert!(is_box_visible(Point3::new(-0.3, -0.3, 0.0), 0.5, &planes));
        assert!(!is_box_visible(Point3::new(-0.6, -0.6, 0.0), 0.5, &planes));
    }
}
