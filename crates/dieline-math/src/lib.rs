#![warn(missing_docs)]

//! Math types and 2D geometry primitives for dieline compilation.
//!
//! Thin wrappers around nalgebra providing raster-space points and vectors,
//! tolerance constants, and the handful of stateless segment queries the
//! compiler is built on: point/segment distance, projection onto a segment,
//! segment-segment intersection, and axis-aligned bounds.
//!
//! All coordinates are in raster pixel space (Y grows downward).

use nalgebra::Vector2;

/// A point in raster pixel space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in raster pixel space.
pub type Vec2 = Vector2<f64>;

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in pixels.
    pub linear: f64,
    /// Tolerance on segment parameters (dimensionless).
    pub parametric: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 px linear, 1e-9 parametric).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        parametric: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 2D cross product (z component of the 3D cross product).
pub fn cross(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Euclidean distance between two points.
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Project `p` onto segment `a`-`b`, clamping the parameter to `[0, 1]`.
///
/// Returns the closest point on the segment and its parameter. A zero-length
/// segment projects everything onto `a` with parameter 0.
pub fn project_onto_segment(p: &Point2, a: &Point2, b: &Point2) -> (Point2, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (*a, 0.0);
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Shortest distance from `p` to segment `a`-`b`.
pub fn distance_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let (closest, _) = project_onto_segment(p, a, b);
    distance(p, &closest)
}

/// Intersection of two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// The intersection point.
    pub point: Point2,
    /// Parameter along the first segment, in `[0, 1]`.
    pub t: f64,
    /// Parameter along the second segment, in `[0, 1]`.
    pub u: f64,
}

/// Intersect segment `a1`-`a2` with segment `b1`-`b2`.
///
/// Both parameters must lie in `[0, 1]` (endpoints included, widened by the
/// parametric tolerance). Parallel and collinear segments report no hit.
pub fn segment_intersection(
    a1: &Point2,
    a2: &Point2,
    b1: &Point2,
    b2: &Point2,
) -> Option<SegmentHit> {
    let tol = Tolerance::DEFAULT;
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = cross(&r, &s);
    if denom.abs() < tol.parametric * r.norm().max(1.0) * s.norm().max(1.0) {
        return None;
    }
    let qp = b1 - a1;
    let t = cross(&qp, &s) / denom;
    let u = cross(&qp, &r) / denom;
    let eps = tol.parametric;
    if !(-eps..=1.0 + eps).contains(&t) || !(-eps..=1.0 + eps).contains(&u) {
        return None;
    }
    let t = t.clamp(0.0, 1.0);
    let u = u.clamp(0.0, 1.0);
    Some(SegmentHit {
        point: a1 + r * t,
        t,
        u,
    })
}

/// Axis-aligned bounding box in raster space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    /// Minimum corner (top-left in raster space).
    pub min: Point2,
    /// Maximum corner (bottom-right in raster space).
    pub max: Point2,
}

impl Bounds2 {
    /// Create bounds from two corners.
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Bounds of a set of points, or `None` if the set is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = *first;
        let mut max = *first;
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self { min, max })
    }

    /// Width along X.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height along Y.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// The four corners, starting at `min` and walking `+X` first.
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.min.x, self.min.y),
            Point2::new(self.max.x, self.min.y),
            Point2::new(self.max.x, self.max.y),
            Point2::new(self.min.x, self.max.y),
        ]
    }

    /// True if the box has no area.
    pub fn is_degenerate(&self) -> bool {
        let tol = Tolerance::DEFAULT;
        tol.is_zero(self.width()) || tol.is_zero(self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_project_inside_segment() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        let (q, t) = project_onto_segment(&Point2::new(4.0, 3.0), &a, &b);
        assert_relative_eq!(q.x, 4.0);
        assert_relative_eq!(q.y, 0.0);
        assert_relative_eq!(t, 0.4);
    }

    #[test]
    fn test_project_clamps_to_endpoints() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        let (q, t) = project_onto_segment(&Point2::new(-5.0, 2.0), &a, &b);
        assert_eq!(q, a);
        assert_eq!(t, 0.0);
        let (q, t) = project_onto_segment(&Point2::new(15.0, 2.0), &a, &b);
        assert_eq!(q, b);
        assert_eq!(t, 1.0);
    }

    #[test]
    fn test_distance_to_degenerate_segment() {
        let a = Point2::new(1.0, 1.0);
        let d = distance_to_segment(&Point2::new(4.0, 5.0), &a, &a);
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_segment_intersection_cross() {
        let hit = segment_intersection(
            &Point2::new(0.0, 50.0),
            &Point2::new(100.0, 50.0),
            &Point2::new(40.0, 0.0),
            &Point2::new(40.0, 100.0),
        )
        .unwrap();
        assert_relative_eq!(hit.point.x, 40.0);
        assert_relative_eq!(hit.point.y, 50.0);
        assert_relative_eq!(hit.t, 0.4);
        assert_relative_eq!(hit.u, 0.5);
    }

    #[test]
    fn test_segment_intersection_at_endpoint() {
        // Crease starting exactly on the left edge of a square.
        let hit = segment_intersection(
            &Point2::new(0.0, 50.0),
            &Point2::new(100.0, 50.0),
            &Point2::new(0.0, 100.0),
            &Point2::new(0.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(hit.point.x, 0.0);
        assert_relative_eq!(hit.point.y, 50.0);
        assert_eq!(hit.t, 0.0);
    }

    #[test]
    fn test_segment_intersection_misses() {
        assert!(segment_intersection(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(2.0, -1.0),
            &Point2::new(2.0, 1.0),
        )
        .is_none());
        // Parallel
        assert!(segment_intersection(
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(10.0, 1.0),
        )
        .is_none());
    }

    #[test]
    fn test_bounds() {
        let pts = [
            Point2::new(3.0, 7.0),
            Point2::new(-1.0, 2.0),
            Point2::new(5.0, 4.0),
        ];
        let b = Bounds2::from_points(&pts).unwrap();
        assert_eq!(b.min, Point2::new(-1.0, 2.0));
        assert_eq!(b.max, Point2::new(5.0, 7.0));
        assert_relative_eq!(b.width(), 6.0);
        assert_relative_eq!(b.height(), 5.0);
        assert!(Bounds2::from_points(&[] as &[Point2]).is_none());
    }

    #[test]
    fn test_degenerate_bounds() {
        let pts = [Point2::new(0.0, 5.0), Point2::new(10.0, 5.0)];
        assert!(Bounds2::from_points(&pts).unwrap().is_degenerate());
    }
}
