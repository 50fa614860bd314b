//! Crease validation and endpoint snapping against cut geometry.
//!
//! A crease is valid when both of its endpoints lie within tolerance of a
//! cut stroke: a vertex or any point on one of its edges. Closed cut strokes
//! include their wrap-around edge. Distances are inclusive, so a point
//! exactly `tolerance` away still counts.

use dieline_ir::{CreaseValidation, Point2D, Stroke, ValidationReport};
use dieline_math::{project_onto_segment, Point2};

/// Nearest point on any cut stroke to `p`, with its distance.
///
/// Returns `None` when there is no cut geometry at all.
pub fn nearest_on_cuts(p: Point2, cuts: &[Stroke]) -> Option<(Point2, f64)> {
    let mut best: Option<(Point2, f64)> = None;
    let mut consider = |q: Point2| {
        let d = (q - p).norm();
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((q, d));
        }
    };

    for cut in cuts {
        let pts: Vec<Point2> = cut.points.iter().map(|&q| q.into()).collect();
        match pts.as_slice() {
            [] => {}
            [only] => consider(*only),
            _ => {
                let wrap = cut.closed && pts.len() > 2;
                let edge_count = if wrap { pts.len() } else { pts.len() - 1 };
                for i in 0..edge_count {
                    let a = pts[i];
                    let b = pts[(i + 1) % pts.len()];
                    consider(project_onto_segment(&p, &a, &b).0);
                }
            }
        }
    }
    best
}

fn endpoint_failure(label: &str, p: Point2D, cuts: &[Stroke], tolerance: f64) -> Option<String> {
    match nearest_on_cuts(p.into(), cuts) {
        Some((_, d)) if d <= tolerance => None,
        Some((_, d)) => Some(format!(
            "{label} point ({:.1}, {:.1}) is {d:.1}px from the nearest cut line (tolerance {tolerance}px)",
            p.x, p.y
        )),
        None => Some(format!("{label} point ({:.1}, {:.1}) has no cut line to attach to", p.x, p.y)),
    }
}

/// Check that both endpoints of `crease` lie on cut geometry.
pub fn validate_crease(crease: &Stroke, cuts: &[Stroke], tolerance: f64) -> CreaseValidation {
    let Some((start, end)) = crease.chord() else {
        return CreaseValidation {
            valid: false,
            message: format!("crease {}: needs at least 2 points", crease.id),
        };
    };
    if cuts.is_empty() {
        return CreaseValidation {
            valid: false,
            message: format!("crease {}: no cut lines to validate against", crease.id),
        };
    }

    let failures: Vec<String> = [("start", start), ("end", end)]
        .into_iter()
        .filter_map(|(label, p)| endpoint_failure(label, p, cuts, tolerance))
        .collect();

    if failures.is_empty() {
        CreaseValidation {
            valid: true,
            message: format!("crease {}: both endpoints lie on a cut line", crease.id),
        }
    } else {
        CreaseValidation {
            valid: false,
            message: format!("crease {}: {}", crease.id, failures.join("; ")),
        }
    }
}

/// Validate every crease and summarize.
pub fn validate_creases(creases: &[Stroke], cuts: &[Stroke], tolerance: f64) -> ValidationReport {
    let mut report = ValidationReport {
        total: creases.len(),
        ..Default::default()
    };
    for crease in creases {
        let result = validate_crease(crease, cuts, tolerance);
        if result.valid {
            report.valid += 1;
        } else {
            report.invalid += 1;
            report.messages.push(result.message);
        }
    }
    report
}

/// Move `p` onto the nearest cut geometry if it is within `tolerance`.
///
/// Returns `None` when nothing is close enough.
pub fn snap_point(p: Point2D, cuts: &[Stroke], tolerance: f64) -> Option<Point2D> {
    nearest_on_cuts(p.into(), cuts)
        .filter(|&(_, d)| d <= tolerance)
        .map(|(q, _)| q.into())
}

/// Copy of `crease` with each endpoint snapped onto cut geometry where possible.
///
/// Interior points are left alone; endpoints out of range stay where they are.
pub fn snap_crease(crease: &Stroke, cuts: &[Stroke], tolerance: f64) -> Stroke {
    let mut snapped = crease.clone();
    let last = snapped.points.len().saturating_sub(1);
    for i in [0, last] {
        if let Some(p) = snapped.points.get(i).copied() {
            if let Some(q) = snap_point(p, cuts, tolerance) {
                snapped.points[i] = q;
            }
        }
    }
    snapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dieline_ir::StrokeKind;

    fn stroke(kind: StrokeKind, coords: &[(f64, f64)], closed: bool) -> Stroke {
        Stroke::new(
            "s",
            kind,
            coords.iter().map(|&(x, y)| Point2D::new(x, y)).collect(),
            closed,
        )
    }

    fn outline() -> Vec<Stroke> {
        vec![stroke(
            StrokeKind::Cut,
            &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)],
            true,
        )]
    }

    #[test]
    fn test_endpoints_on_edges() {
        let c = stroke(StrokeKind::Crease, &[(0.0, 50.0), (100.0, 50.0)], false);
        let r = validate_crease(&c, &outline(), 10.0);
        assert!(r.valid, "{}", r.message);
    }

    #[test]
    fn test_wrap_edge_only_when_closed() {
        let mut cuts = outline();
        let c = stroke(StrokeKind::Crease, &[(0.0, 50.0), (100.0, 50.0)], false);
        cuts[0].closed = false;
        let r = validate_crease(&c, &cuts, 10.0);
        assert!(!r.valid);
        assert!(r.message.contains("start point"));
        assert!(!r.message.contains("end point"));
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        // Both starts sit exactly 10px from the outline: one inside the left
        // edge, one diagonally outside the (0, 0) corner vertex.
        let starts = [(10.0, 50.0), (-6.0, -8.0)];
        let cases = [(9.0, false), (10.0, true), (11.0, true)];
        for start in starts {
            let c = stroke(StrokeKind::Crease, &[start, (100.0, 50.0)], false);
            for (tolerance, expected) in cases {
                let r = validate_crease(&c, &outline(), tolerance);
                assert_eq!(r.valid, expected, "{start:?} at {tolerance}: {}", r.message);
            }
        }
    }

    #[test]
    fn test_snap_outside_corner_lands_on_vertex() {
        let snapped = snap_point(Point2D::new(-6.0, -8.0), &outline(), 10.0).unwrap();
        assert_relative_eq!(snapped.x, 0.0);
        assert_relative_eq!(snapped.y, 0.0);
        assert!(snap_point(Point2D::new(-6.0, -8.0), &outline(), 9.0).is_none());
    }

    #[test]
    fn test_both_endpoints_reported() {
        let c = stroke(StrokeKind::Crease, &[(40.0, 50.0), (60.0, 50.0)], false);
        let r = validate_crease(&c, &outline(), 10.0);
        assert!(!r.valid);
        assert!(r.message.contains("start point"));
        assert!(r.message.contains("end point"));
    }

    #[test]
    fn test_no_cuts_is_invalid() {
        let c = stroke(StrokeKind::Crease, &[(0.0, 0.0), (1.0, 1.0)], false);
        let r = validate_crease(&c, &[], 10.0);
        assert!(!r.valid);
        assert!(r.message.contains("no cut lines"));
    }

    #[test]
    fn test_report_counts() {
        let creases = [
            stroke(StrokeKind::Crease, &[(0.0, 50.0), (100.0, 50.0)], false),
            stroke(StrokeKind::Crease, &[(40.0, 50.0), (60.0, 50.0)], false),
            stroke(StrokeKind::Crease, &[(0.0, 0.0)], false),
        ];
        let report = validate_creases(&creases, &outline(), 10.0);
        assert_eq!(report.total, 3);
        assert_eq!(report.valid, 1);
        assert_eq!(report.invalid, 2);
        assert_eq!(report.messages.len(), 2);
        assert!(!report.all_valid());
    }

    #[test]
    fn test_single_point_cut_counts_as_vertex() {
        let cuts = vec![stroke(StrokeKind::Cut, &[(5.0, 5.0)], false)];
        let (q, d) = nearest_on_cuts(Point2::new(8.0, 9.0), &cuts).unwrap();
        assert_eq!(q, Point2::new(5.0, 5.0));
        assert_relative_eq!(d, 5.0);
        assert!(nearest_on_cuts(Point2::new(0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn test_snap_point() {
        let snapped = snap_point(Point2D::new(4.0, 30.0), &outline(), 10.0).unwrap();
        assert_relative_eq!(snapped.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(snapped.y, 30.0, epsilon = 1e-9);
        assert!(snap_point(Point2D::new(50.0, 50.0), &outline(), 10.0).is_none());
    }

    #[test]
    fn test_snap_crease_moves_only_endpoints() {
        let c = stroke(
            StrokeKind::Crease,
            &[(3.0, 50.0), (50.0, 52.0), (96.0, 50.0)],
            false,
        );
        let snapped = snap_crease(&c, &outline(), 10.0);
        assert_eq!(snapped.points[0], Point2D::new(0.0, 50.0));
        assert_eq!(snapped.points[1], Point2D::new(50.0, 52.0));
        assert_eq!(snapped.points[2], Point2D::new(100.0, 50.0));
        assert!(validate_crease(&snapped, &outline(), 0.0).valid);
    }
}
