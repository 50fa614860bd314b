//! Polygon and polyline types used throughout the pipeline.

use dieline_ir::Point2D;
use dieline_math::{cross, Bounds2, Point2, Tolerance};

/// A 2D polygon (closed ring, first point is not repeated at the end).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Vertices of the polygon in order.
    pub points: Vec<Point2>,
}

impl Polygon {
    /// Create a new polygon from points.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Polygon from IR points.
    pub fn from_ir(points: &[Point2D]) -> Self {
        Self::new(points.iter().map(|p| Point2::from(*p)).collect())
    }

    /// Polygon covering a full `width` x `height` raster.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, height),
            Point2::new(0.0, height),
        ])
    }

    /// Check if the polygon is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Signed area of the polygon.
    /// Positive for counter-clockwise in a Y-up frame (clockwise on screen).
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area / 2.0
    }

    /// Unsigned area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid. Falls back to the vertex average for zero-area rings.
    pub fn centroid(&self) -> Point2 {
        if self.points.is_empty() {
            return Point2::origin();
        }
        let a = self.signed_area();
        if Tolerance::DEFAULT.is_zero(a) {
            let n = self.points.len() as f64;
            let (sx, sy) = self
                .points
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            return Point2::new(sx / n, sy / n);
        }
        let n = self.points.len();
        let (mut cx, mut cy) = (0.0, 0.0);
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let f = cross(&p.coords, &q.coords);
            cx += (p.x + q.x) * f;
            cy += (p.y + q.y) * f;
        }
        Point2::new(cx / (6.0 * a), cy / (6.0 * a))
    }

    /// Axis-aligned bounds.
    pub fn bounds(&self) -> Option<Bounds2> {
        Bounds2::from_points(&self.points)
    }

    /// Edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Even-odd point containment test.
    pub fn contains(&self, p: &Point2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Drop consecutive duplicate vertices (including a repeated closing vertex).
    pub fn dedup(&mut self) {
        let tol = Tolerance::DEFAULT;
        self.points.dedup_by(|a, b| tol.points_equal(a, b));
        while self.points.len() > 1 {
            let first = self.points[0];
            let last = self.points[self.points.len() - 1];
            if tol.points_equal(&first, &last) {
                self.points.pop();
            } else {
                break;
            }
        }
    }

    /// Number of vertices left after removing consecutive duplicates.
    pub fn distinct_vertex_count(&self) -> usize {
        let mut copy = self.clone();
        copy.dedup();
        copy.len()
    }

    /// Points converted to the IR representation.
    pub fn to_ir(&self) -> Vec<Point2D> {
        self.points.iter().map(|p| Point2D::from(*p)).collect()
    }
}

/// An open polyline (non-closed path).
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Points along the path.
    pub points: Vec<Point2>,
}

impl Polyline {
    /// Create a new polyline.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Polyline from IR points.
    pub fn from_ir(points: &[Point2D]) -> Self {
        Self::new(points.iter().map(|p| Point2::from(*p)).collect())
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Total length of the polyline.
    pub fn length(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Straight-line distance from the first to the last point.
    pub fn chord_length(&self) -> f64 {
        match (self.start(), self.end()) {
            (Some(a), Some(b)) => (b - a).norm(),
            _ => 0.0,
        }
    }

    /// Starting point.
    pub fn start(&self) -> Option<&Point2> {
        self.points.first()
    }

    /// Ending point.
    pub fn end(&self) -> Option<&Point2> {
        self.points.last()
    }
}
