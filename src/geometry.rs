//! Planar geometry used by the annotation engine.
//!
//! Everything here is a pure function over [`Point`] values. Coordinates use
//! the image convention: `x` grows to the right, `y` grows downward. Angles
//! returned for arcs follow the painter convention (degrees, counterclockwise
//! on screen, zero at three o'clock).

use serde::{Deserialize, Serialize};

use crate::constants::{COLLINEAR_TOLERANCE, label};

// ============================================================================
// Core Geometry Types
// ============================================================================

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Multiply both coordinates by `factor`.
    pub fn scaled(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    /// Multiply each coordinate by its own factor.
    pub fn scaled_xy(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.x * fx, self.y * fy)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner X coordinate
    pub x: f64,
    /// Top-left corner Y coordinate
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two opposite corners in any order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        let width = (p1.x - p2.x).abs();
        let height = (p1.y - p2.y).abs();
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Scale position and size by `factor` (used to move a rect between spaces).
    pub fn scaled(&self, factor: f64) -> Rect {
        Rect::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

// ============================================================================
// Measurements
// ============================================================================

pub fn distance(a: Point, b: Point) -> f64 {
    a.distance_to(&b)
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Foot of the perpendicular dropped from `c` onto the infinite line through `a` and `b`.
///
/// Degenerates to `a` when `a` and `b` coincide.
pub fn foot_of_perpendicular(a: Point, b: Point, c: Point) -> Point {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return a;
    }
    let t = ((c.x - a.x) * abx + (c.y - a.y) * aby) / len_sq;
    Point::new(a.x + t * abx, a.y + t * aby)
}

/// Whether `a`, `b` and `c` lie on one straight line.
///
/// Coincident points count as collinear.
pub fn is_collinear(a: Point, b: Point, c: Point) -> bool {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let acx = c.x - a.x;
    let acy = c.y - a.y;
    let scale = (abx * abx + aby * aby).sqrt() * (acx * acx + acy * acy).sqrt();
    if scale == 0.0 {
        return true;
    }
    let cross = abx * acy - aby * acx;
    (cross / scale).abs() < COLLINEAR_TOLERANCE
}

/// Whether `p`, assumed to lie on line `ab`, falls between `a` and `b` inclusive.
pub fn is_on_segment(a: Point, b: Point, p: Point) -> bool {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return p.distance_to(&a) <= f64::EPSILON;
    }
    let t = ((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq;
    let slack = COLLINEAR_TOLERANCE;
    (-slack..=1.0 + slack).contains(&t)
}

/// Interior angle ∠abc in degrees, in `[0, 180]`.
///
/// Returns 0 when either edge has zero length.
pub fn angle_degree(a: Point, b: Point, c: Point) -> f64 {
    let bax = a.x - b.x;
    let bay = a.y - b.y;
    let bcx = c.x - b.x;
    let bcy = c.y - b.y;
    let norm = (bax * bax + bay * bay).sqrt() * (bcx * bcx + bcy * bcy).sqrt();
    if norm == 0.0 {
        return 0.0;
    }
    let cos = ((bax * bcx + bay * bcy) / norm).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Screen direction of `p` as seen from `origin`, in degrees `[0, 360)`.
///
/// The y axis is flipped so that counterclockwise on screen is positive.
fn screen_direction(origin: Point, p: Point) -> f64 {
    let deg = (-(p.y - origin.y)).atan2(p.x - origin.x).to_degrees();
    deg.rem_euclid(360.0)
}

/// Start angle of the arc marking ∠abc, such that sweeping
/// [`angle_degree`] counterclockwise from it spans the interior of the angle.
pub fn arc_start_degree(a: Point, b: Point, c: Point) -> f64 {
    let da = screen_direction(b, a);
    let dc = screen_direction(b, c);
    if (dc - da).rem_euclid(360.0) <= 180.0 {
        da
    } else {
        dc
    }
}

/// Radius of the arc drawn at the vertex of ∠abc.
pub fn arc_radius(a: Point, b: Point, c: Point) -> f64 {
    let shorter = distance(a, b).min(distance(b, c));
    (shorter * label::ARC_RADIUS_RATIO).min(label::ARC_RADIUS_MAX)
}

/// Bounding square of the arc marking ∠abc, centered on the vertex `b`.
pub fn arc_bounding_rect(a: Point, b: Point, c: Point) -> Rect {
    let r = arc_radius(a, b, c);
    Rect::from_corners(b.offset(-r, -r), b.offset(r, r))
}

/// Point halfway along the arc marking ∠abc.
pub fn arc_midpoint(a: Point, b: Point, c: Point) -> Point {
    let r = arc_radius(a, b, c);
    let mid = (arc_start_degree(a, b, c) + angle_degree(a, b, c) / 2.0).to_radians();
    Point::new(b.x + r * mid.cos(), b.y - r * mid.sin())
}

/// Bounding square of the circle centered on `center` passing through `rim`.
pub fn circle_bounding_rect(center: Point, rim: Point) -> Rect {
    let r = distance(center, rim);
    Rect::from_corners(center.offset(-r, -r), center.offset(r, r))
}

// ============================================================================
// Label Placement
// ============================================================================

/// Anchor for the index text drawn next to a point.
pub fn index_label_anchor(p: Point) -> Point {
    p.offset(label::INDEX_OFFSET, -label::INDEX_OFFSET)
}

/// Anchor for a distance label, pushed off the midpoint perpendicular to `ab`.
pub fn distance_label_anchor(a: Point, b: Point) -> Point {
    let mid = midpoint(a, b);
    let len = distance(a, b);
    if len == 0.0 {
        return mid.offset(label::DISTANCE_OFFSET, -label::DISTANCE_OFFSET);
    }
    let nx = -(b.y - a.y) / len;
    let ny = (b.x - a.x) / len;
    mid.offset(nx * label::DISTANCE_OFFSET, ny * label::DISTANCE_OFFSET)
}

/// Anchor for a degree label, just outside the arc along its bisector.
pub fn degree_label_anchor(vertex: Point, arc_mid: Point) -> Point {
    let len = distance(vertex, arc_mid);
    if len == 0.0 {
        return arc_mid.offset(label::DEGREE_OFFSET, -label::DEGREE_OFFSET);
    }
    let scale = (len + label::DEGREE_OFFSET) / len;
    Point::new(
        vertex.x + (arc_mid.x - vertex.x) * scale,
        vertex.y + (arc_mid.y - vertex.y) * scale,
    )
}

/// Round to two decimals, the precision shown in labels and summaries.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_point(p: Point, x: f64, y: f64) -> bool {
        approx_eq(p.x, x) && approx_eq(p.y, y)
    }

    #[test]
    fn test_distance_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!(approx_eq(distance(a, b), 5.0));
        assert!(approx_point(midpoint(a, b), 1.5, 2.0));
    }

    #[test]
    fn test_foot_of_perpendicular() {
        let foot = foot_of_perpendicular(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 5.0),
        );
        assert!(approx_point(foot, 5.0, 0.0));

        // Foot outside the segment
        let foot = foot_of_perpendicular(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(-4.0, -2.0),
        );
        assert!(approx_point(foot, -3.0, -3.0));
    }

    #[test]
    fn test_foot_with_coincident_base() {
        let a = Point::new(2.0, 2.0);
        assert_eq!(foot_of_perpendicular(a, a, Point::new(9.0, 1.0)), a);
    }

    #[test]
    fn test_collinear() {
        assert!(is_collinear(
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(-3.0, -3.0)
        ));
        assert!(!is_collinear(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 5.0)
        ));
        let p = Point::new(1.0, 1.0);
        assert!(is_collinear(p, p, Point::new(4.0, 7.0)));
    }

    #[test]
    fn test_on_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!(is_on_segment(a, b, Point::new(5.0, 0.0)));
        assert!(is_on_segment(a, b, a));
        assert!(is_on_segment(a, b, b));
        assert!(!is_on_segment(a, b, Point::new(12.0, 0.0)));
        assert!(!is_on_segment(a, b, Point::new(-0.5, 0.0)));
    }

    #[test]
    fn test_angle_degree() {
        let a = Point::new(10.0, 10.0);
        let b = Point::new(20.0, 10.0);
        let c = Point::new(20.0, 20.0);
        assert!((angle_degree(a, b, c) - 90.0).abs() < 1e-9);
        assert!((angle_degree(a, b, Point::new(30.0, 10.0)) - 180.0).abs() < 1e-9);
        assert_eq!(angle_degree(a, a, c), 0.0);
    }

    #[test]
    fn test_arc_start_spans_interior() {
        // Vertex at origin, one edge to the right, one edge straight up on screen.
        let b = Point::new(0.0, 0.0);
        let right = Point::new(10.0, 0.0);
        let up = Point::new(0.0, -10.0);
        assert!(approx_eq(arc_start_degree(right, b, up), 0.0));
        assert!(approx_eq(arc_start_degree(up, b, right), 0.0));

        // Edge pointing down on screen sits at 270; interior runs 270 -> 360.
        let down = Point::new(0.0, 10.0);
        assert!(approx_eq(arc_start_degree(right, b, down), 270.0));
    }

    #[test]
    fn test_arc_midpoint_on_bisector() {
        let b = Point::new(0.0, 0.0);
        let a = Point::new(100.0, 0.0);
        let c = Point::new(0.0, -100.0);
        let mid = arc_midpoint(a, b, c);
        let r = arc_radius(a, b, c);
        assert!(approx_eq(mid.x, mid.y.abs()));
        assert!(approx_eq(distance(b, mid), r));
        assert!(mid.y < 0.0);
    }

    #[test]
    fn test_arc_rect_centered_on_vertex() {
        let rect = arc_bounding_rect(
            Point::new(0.0, 0.0),
            Point::new(20.0, 20.0),
            Point::new(40.0, 0.0),
        );
        assert!(approx_point(rect.center(), 20.0, 20.0));
        assert!(approx_eq(rect.width, rect.height));
    }

    #[test]
    fn test_circle_bounding_rect() {
        let rect = circle_bounding_rect(Point::new(10.0, 10.0), Point::new(13.0, 14.0));
        assert_eq!(rect, Rect::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_rect_from_corners_any_order() {
        let r1 = Rect::from_corners(Point::new(10.0, 20.0), Point::new(50.0, 80.0));
        let r2 = Rect::from_corners(Point::new(50.0, 80.0), Point::new(10.0, 20.0));
        assert_eq!(r1, r2);
        assert_eq!(r1, Rect::new(10.0, 20.0, 40.0, 60.0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(89.999), 90.0);
    }
}
