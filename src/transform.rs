use std::f32::consts::PI;

use nalgebra as na;
use na::{matrix, Matrix4, Vector3};

use crate::error::RenderError;
use crate::util::{from_hom_point, to_hom_point, Vertex};

pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 100.0;

/// 4x4 homogeneous transform.
/// nalgebra keeps matrices column-major, so `as_slice()[12..15]` is the translation and
/// `as_slice()[11]` is the -1 that moves -z into w for a perspective projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        return Transform::identity();
    }
}

impl From<Matrix4<f32>> for Transform {
    fn from(matrix: Matrix4<f32>) -> Self {
        return Transform { matrix };
    }
}

impl Transform {
    pub fn identity() -> Transform {
        return Transform { matrix: Matrix4::identity() };
    }

    /// Standard OpenGL style perspective projection, looking down -z.
    ///
    /// Nothing is validated here: fov -> 0 or near == far give non-finite entries, which then
    /// turn every projected vertex into garbage. Use `try_perspective` to reject such input.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Transform {
        let tan_half = (fov / 2.0).tan();
        let depth = far - near;
        let matrix = matrix![1.0 / (aspect * tan_half), 0.0,            0.0,                   0.0;
                             0.0,                       1.0 / tan_half, 0.0,                   0.0;
                             0.0,                       0.0,            -(far + near) / depth, -(2.0 * far * near) / depth;
                             0.0,                       0.0,            -1.0,                  0.0];
        return Transform { matrix };
    }

    /// Same as `perspective`, but fails on parameters that would produce a degenerate matrix.
    pub fn try_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Result<Transform, RenderError> {
        validate_perspective(fov, aspect, near, far)?;
        return Ok(Transform::perspective(fov, aspect, near, far));
    }

    /// Minimal camera: translates the world by -eye and nothing else.
    /// The target is accepted for API symmetry only, no rotation towards it is computed.
    pub fn look_at(eye: Vector3<f32>, _target: Vector3<f32>) -> Transform {
        let matrix = matrix![1.0, 0.0, 0.0, -eye.x;
                             0.0, 1.0, 0.0, -eye.y;
                             0.0, 0.0, 1.0, -eye.z;
                             0.0, 0.0, 0.0, 1.0];
        return Transform { matrix };
    }

    /// Composition, applying `self` first and `next` afterwards.
    pub fn then(&self, next: &Transform) -> Transform {
        return Transform { matrix: next.matrix * self.matrix };
    }

    /// Applies the transform to a point, followed by the perspective divide (skipped when w == 0).
    pub fn transform_point(&self, p: Vector3<f32>) -> Vector3<f32> {
        return from_hom_point(self.matrix * to_hom_point(p));
    }

    /// Transforms the vertex position, color and uv pass through untouched.
    pub fn transform_vertex(&self, v: Vertex) -> Vertex {
        return Vertex {
            position: self.transform_point(v.position),
            ..v
        };
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        return &self.matrix;
    }

    /// Column-major view of the 16 entries.
    pub fn as_slice(&self) -> &[f32] {
        return self.matrix.as_slice();
    }

    pub fn is_finite(&self) -> bool {
        return self.matrix.iter().all(|value| value.is_finite());
    }
}

/// Checks 0 < fov < pi, aspect > 0 and 0 < near < far, all finite.
pub fn validate_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Result<(), RenderError> {
    let all_finite = fov.is_finite() && aspect.is_finite() && near.is_finite() && far.is_finite();
    let valid = all_finite && fov > 0.0 && fov < PI && aspect > 0.0 && near > 0.0 && far > near;
    if !valid {
        return Err(RenderError::InvalidCamera { fov, aspect, near, far });
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use na::vector;

    const EPS: f32 = 1e-5;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < EPS, "expected {b}, got {a}");
    }

    #[test]
    fn identity_is_default() {
        let m = Transform::default();
        let expected: [f32; 16] = [1.0, 0.0, 0.0, 0.0,
                                   0.0, 1.0, 0.0, 0.0,
                                   0.0, 0.0, 1.0, 0.0,
                                   0.0, 0.0, 0.0, 1.0];
        assert_eq!(m.as_slice(), &expected[..]);
    }

    #[test]
    fn perspective_matches_closed_form() {
        let (fov, aspect, near, far) = (PI / 3.0, 800.0 / 600.0, DEFAULT_NEAR, DEFAULT_FAR);
        let m = Transform::perspective(fov, aspect, near, far);
        let s = m.as_slice();
        let tan_half = (fov / 2.0).tan();

        assert_close(s[0], 1.0 / (aspect * tan_half));
        assert_close(s[5], 1.0 / tan_half);
        assert_close(s[10], -(far + near) / (far - near));
        assert_close(s[14], -(2.0 * far * near) / (far - near));
        assert_close(s[11], -1.0);
        assert_close(s[15], 0.0);
        for i in [1, 2, 3, 4, 6, 7, 8, 9, 12, 13] {
            assert_close(s[i], 0.0);
        }
    }

    #[test]
    fn perspective_degenerate_input_is_not_finite() {
        assert!(!Transform::perspective(0.0, 1.0, 0.1, 100.0).is_finite());
        assert!(!Transform::perspective(1.0, 1.0, 5.0, 5.0).is_finite());
    }

    #[test]
    fn try_perspective_rejects_bad_parameters() {
        assert!(Transform::try_perspective(PI / 3.0, 1.5, 0.1, 100.0).is_ok());
        for (fov, aspect, near, far) in [
            (0.0, 1.0, 0.1, 100.0),
            (PI, 1.0, 0.1, 100.0),
            (1.0, 0.0, 0.1, 100.0),
            (1.0, -1.0, 0.1, 100.0),
            (1.0, 1.0, 0.0, 100.0),
            (1.0, 1.0, 5.0, 5.0),
            (1.0, 1.0, 10.0, 5.0),
            (f32::NAN, 1.0, 0.1, 100.0),
        ] {
            let result = Transform::try_perspective(fov, aspect, near, far);
            assert!(
                matches!(result, Err(RenderError::InvalidCamera { .. })),
                "accepted fov={fov} aspect={aspect} near={near} far={far}"
            );
        }
    }

    #[test]
    fn look_at_ignores_target() {
        let eye = vector![1.0, -2.0, 5.0];
        let a = Transform::look_at(eye, vector![0.0, 0.0, 0.0]);
        let b = Transform::look_at(eye, vector![10.0, 3.0, -7.0]);
        assert_eq!(a, b);

        let s = a.as_slice();
        assert_eq!(s[12..15], [-1.0f32, 2.0, -5.0]);
        let mut expected = Transform::identity();
        expected.matrix[(0, 3)] = -1.0;
        expected.matrix[(1, 3)] = 2.0;
        expected.matrix[(2, 3)] = -5.0;
        assert_eq!(a, expected);
    }

    #[test]
    fn transform_divides_by_w() {
        let projection = Transform::perspective(PI / 2.0, 1.0, 0.1, 100.0);
        let p = projection.transform_point(vector![1.0, 1.0, -2.0]);
        // tan(45 deg) == 1, so x and y are just divided by w == 2.
        assert_close(p.x, 0.5);
        assert_close(p.y, 0.5);
    }

    #[test]
    fn zero_w_leaves_clip_space() {
        let projection = Transform::perspective(PI / 2.0, 1.0, 0.1, 100.0);
        // z == 0 gives w == 0.
        let p = projection.transform_point(vector![1.0, 2.0, 0.0]);
        assert_close(p.x, 1.0);
        assert_close(p.y, 2.0);
    }

    #[test]
    fn then_applies_view_before_projection() {
        let view = Transform::look_at(vector![0.0, 0.0, 5.0], vector![0.0, 0.0, 0.0]);
        let projection = Transform::perspective(PI / 2.0, 1.0, 0.1, 100.0);
        let combined = view.then(&projection);

        let point = vector![0.5, 0.25, 2.0];
        let stepwise = projection.transform_point(view.transform_point(point));
        let p = combined.transform_point(point);
        assert_close(p.x, stepwise.x);
        assert_close(p.y, stepwise.y);
        assert_close(p.z, stepwise.z);
        // View moves the point to z == -3, so w == 3.
        assert_close(p.x, 0.5 / 3.0);
        assert_close(p.y, 0.25 / 3.0);
    }

    #[test]
    fn transform_vertex_keeps_attributes() {
        let v = Vertex::new(vector![1.0, 2.0, 3.0], crate::image::RED, vector![0.25, 0.75]);
        let moved = Transform::look_at(vector![1.0, 1.0, 1.0], vector![0.0, 0.0, 0.0]).transform_vertex(v);
        assert_eq!(moved.position, vector![0.0, 1.0, 2.0]);
        assert_eq!(moved.color, v.color);
        assert_eq!(moved.uv, v.uv);
    }
}
