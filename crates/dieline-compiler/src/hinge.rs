//! Hinge construction: one fold edge per crease.

use log::{debug, warn};

use dieline_ir::{Hinge, Panel, Point2D, Stroke};
use dieline_math::{distance, Point2, Tolerance};

/// True if segment `p`-`q` matches the chord `a`-`b` in either direction,
/// with both endpoints within `tolerance`.
fn segment_matches(p: Point2, q: Point2, a: Point2, b: Point2, tolerance: f64) -> bool {
    let forward = distance(&p, &a) <= tolerance && distance(&q, &b) <= tolerance;
    let backward = distance(&p, &b) <= tolerance && distance(&q, &a) <= tolerance;
    forward || backward
}

/// True if the panel has an edge or seam lying along the chord `a`-`b`.
pub fn panel_touches(panel: &Panel, a: Point2, b: Point2, tolerance: f64) -> bool {
    let ring: Vec<Point2> = panel
        .raster_vertices()
        .into_iter()
        .map(Point2::from)
        .collect();
    let n = ring.len();
    let on_edge = (0..n).any(|i| segment_matches(ring[i], ring[(i + 1) % n], a, b, tolerance));
    on_edge
        || panel.seams.iter().any(|s| {
            segment_matches(s.start.into(), s.end.into(), a, b, tolerance)
        })
}

/// Build one hinge per crease stroke with a usable chord.
///
/// The axis is the unit direction from the crease's first point to its
/// last. Panels are matched by shared edge or seam; the first two matches
/// become `panel_a` and `panel_b`. Zero-length creases produce no hinge.
pub fn build_hinges(
    creases: &[Stroke],
    panels: &[Panel],
    tolerance: f64,
    fold_angle_degrees: f64,
) -> Vec<Hinge> {
    let tol = Tolerance::DEFAULT;
    let mut hinges = Vec::with_capacity(creases.len());

    for crease in creases {
        let Some((start, end)) = crease.chord() else {
            warn!("crease {} has fewer than 2 points; no hinge", crease.id);
            continue;
        };
        let (a, b) = (Point2::from(start), Point2::from(end));
        let dir = b - a;
        let len = dir.norm();
        if tol.is_zero(len) {
            warn!("crease {} has zero length; no hinge", crease.id);
            continue;
        }

        let mut connected = panels
            .iter()
            .filter(|p| panel_touches(p, a, b, tolerance))
            .map(|p| p.id.clone());
        let panel_a = connected.next();
        let panel_b = connected.next();
        let extra = connected.count();
        if extra > 0 {
            debug!(
                "crease {} touches {} more panel(s) than a hinge can hold",
                crease.id, extra
            );
        }

        let hinge = Hinge {
            id: format!("hinge_{}", hinges.len()),
            start: Point2D::from(a),
            end: Point2D::from(b),
            fold_angle_degrees,
            axis: [dir.x / len, dir.y / len, 0.0],
            panel_a,
            panel_b,
        };
        debug!(
            "{} from crease {} connects {} panel(s)",
            hinge.id,
            crease.id,
            hinge.connected_panels()
        );
        hinges.push(hinge);
    }
    hinges
}
