use nalgebra as na;
use na::{vector, Vector2, Vector3, Vector4};

use crate::image::Color;

/// Vertex of a primitive, as it travels through the pipeline.
/// Position is in world space before transform and in normalized device space after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3<f32>,
    pub color: Color,
    pub uv: Vector2<f32>, // Carried along, nothing samples it yet.
}

impl Vertex {
    pub fn new(position: Vector3<f32>, color: Color, uv: Vector2<f32>) -> Vertex {
        return Vertex { position, color, uv };
    }
}

/// Transformation of a point to homogenous coordinates.
pub fn to_hom_point(v: Vector3<f32>) -> Vector4<f32> {
    return vector![v.x, v.y, v.z, 1.0];
}

/// Transformation of a point from homogenous coordinates.
/// With w == 0 there is nothing sensible to divide by, so x, y, z are returned as is.
pub fn from_hom_point(v: Vector4<f32>) -> Vector3<f32> {
    if v.w == 0.0 {
        return vector![v.x, v.y, v.z];
    }
    return vector![v.x / v.w, v.y / v.w, v.z / v.w];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hom_round_trip_keeps_point() {
        let p = vector![1.5, -2.0, 3.25];
        assert_eq!(from_hom_point(to_hom_point(p)), p);
    }

    #[test]
    fn divides_by_w() {
        let p = from_hom_point(vector![2.0, 4.0, -6.0, 2.0]);
        assert_eq!(p, vector![1.0, 2.0, -3.0]);
    }

    #[test]
    fn zero_w_skips_divide() {
        let p = from_hom_point(vector![2.0, 4.0, -6.0, 0.0]);
        assert_eq!(p, vector![2.0, 4.0, -6.0]);
    }
}
