//! Catmull-Rom curve fitting for strokes promoted from straight to curved.

use dieline_ir::{Point2D, Stroke};

use crate::error::{CompileError, Result};
use crate::polygon::Polyline;

/// Default number of samples emitted per input span.
pub const DEFAULT_SEGMENTS_PER_SPAN: usize = 10;

/// Arc/chord ratio above which a path counts as curved.
const CURVED_RATIO: f64 = 1.1;

/// Resample a polyline through a uniform Catmull-Rom spline.
///
/// Each span `p[i]..p[i+1]` contributes `segments_per_span` samples starting
/// at `p[i]`. Missing neighbors at the ends are replaced by the endpoint
/// itself, so no phantom control points are needed. The input's last point
/// is appended verbatim, so the curve ends exactly where the stroke did.
pub fn to_curve(points: &[Point2D], segments_per_span: usize) -> Result<Vec<Point2D>> {
    if points.len() < 2 {
        return Err(CompileError::TooFewPoints(points.len()));
    }
    if segments_per_span == 0 {
        return Err(CompileError::ZeroSegments);
    }

    let n = points.len();
    let mut out = Vec::with_capacity((n - 1) * segments_per_span + 1);
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];
        for j in 0..segments_per_span {
            let t = j as f64 / segments_per_span as f64;
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    out.push(points[n - 1]);
    Ok(out)
}

fn catmull_rom(p0: Point2D, p1: Point2D, p2: Point2D, p3: Point2D, t: f64) -> Point2D {
    let t2 = t * t;
    let t3 = t2 * t;
    let axis = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point2D::new(axis(p0.x, p1.x, p2.x, p3.x), axis(p0.y, p1.y, p2.y, p3.y))
}

/// Copy of `stroke` with its points replaced by a fitted curve.
///
/// The input stroke is not modified; the caller swaps the result into its
/// stroke collection.
pub fn promote_to_curve(stroke: &Stroke, segments_per_span: usize) -> Result<Stroke> {
    let points = to_curve(&stroke.points, segments_per_span)?;
    Ok(Stroke {
        points,
        ..stroke.clone()
    })
}

/// True if the path's length exceeds its chord by more than 10%.
///
/// Two-point paths are always straight.
pub fn is_curved(points: &[Point2D]) -> bool {
    if points.len() < 3 {
        return false;
    }
    let line = Polyline::from_ir(points);
    let chord = line.chord_length();
    if chord <= 0.0 {
        // Closed loop: any real extent means it bends back on itself.
        return line.length() > 0.0;
    }
    line.length() / chord > CURVED_RATIO
}
