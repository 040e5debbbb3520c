//! Coordinate geometry support
//!
//! Diagram coordinates are the geometric ground truth: every angle's
//! `calculated_value` comes from here and never from a solved value.

use serde::{Deserialize, Serialize};

/// 2D point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Cross product z-component (for 2D)
    pub fn cross_z(&self, other: &Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn minus(&self, other: &Point2D) -> Point2D {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

/// Geometric computations using coordinates
pub mod ops {
    use super::*;

    /// Normalize degrees into `[0, 360)`
    pub fn normalize_degrees(degrees: f64) -> f64 {
        let d = degrees % 360.0;
        if d < 0.0 {
            d + 360.0
        } else {
            d
        }
    }

    /// Polar direction of the ray `vertex -> p`, in degrees within `[0, 360)`
    pub fn direction(vertex: Point2D, p: Point2D) -> f64 {
        let v = p.minus(&vertex);
        normalize_degrees(v.y.atan2(v.x).to_degrees())
    }

    /// Angle at `vertex` between the rays towards `p1` and `p2`, in degrees
    ///
    /// The `atan2` difference is normalized to `[0, 360)` and folded to the
    /// representative at most 180.
    pub fn calculated_value(vertex: Point2D, p1: Point2D, p2: Point2D) -> f64 {
        let diff = normalize_degrees(direction(vertex, p2) - direction(vertex, p1));
        if diff > 180.0 {
            360.0 - diff
        } else {
            diff
        }
    }

    /// Check if three points are collinear, relative to the spread of the points
    pub fn are_collinear(p1: Point2D, p2: Point2D, p3: Point2D, epsilon: f64) -> bool {
        let v1 = p2.minus(&p1);
        let v2 = p3.minus(&p1);
        let scale = (v1.x.abs() + v1.y.abs()).max(v2.x.abs() + v2.y.abs()).max(1.0);

        v1.cross_z(&v2).abs() / (scale * scale) < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);

        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_collinearity() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(1.0, 1.0);
        let p3 = Point2D::new(2.0, 2.0);

        assert!(ops::are_collinear(p1, p2, p3, 1e-9));
        assert!(!ops::are_collinear(p1, p2, Point2D::new(2.0, 0.0), 1e-9));
    }

    #[test]
    fn test_right_angle_value() {
        let vertex = Point2D::new(0.0, 0.0);
        let value = ops::calculated_value(vertex, Point2D::new(1.0, 0.0), Point2D::new(0.0, 1.0));

        assert!((value - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_value_is_folded_and_order_independent() {
        let vertex = Point2D::new(0.0, 0.0);
        let a = Point2D::new(1.0, 0.0);
        let b = Point2D::new(-1.0, -1.0);

        let ab = ops::calculated_value(vertex, a, b);
        let ba = ops::calculated_value(vertex, b, a);

        assert!((ab - 135.0).abs() < 1e-10);
        assert!((ab - ba).abs() < 1e-10);
    }

    #[test]
    fn test_straight_angle() {
        let vertex = Point2D::new(0.0, 0.0);
        let value = ops::calculated_value(vertex, Point2D::new(-2.0, 0.0), Point2D::new(5.0, 0.0));

        assert!((value - 180.0).abs() < 1e-10);
    }

    #[test]
    fn test_direction_range() {
        let vertex = Point2D::new(1.0, 1.0);

        assert!((ops::direction(vertex, Point2D::new(1.0, 0.0)) - 270.0).abs() < 1e-10);
        assert!(ops::direction(vertex, Point2D::new(2.0, 1.0)).abs() < 1e-10);
    }
}
