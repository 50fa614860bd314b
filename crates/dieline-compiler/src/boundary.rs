//! Boundary merging: cut strokes to one outer ring plus holes.
//!
//! This is not a polygon union. With several cut strokes the outer ring is
//! the axis-aligned bounding box of every cut point, and each stroke after
//! the first is kept as a hole ring. A true multi-contour union can replace
//! [`merge`] without changing its callers.

use log::{debug, warn};

use dieline_ir::Stroke;
use dieline_math::Bounds2;

use crate::polygon::Polygon;

/// Minimum distinct vertices for a usable ring.
const MIN_RING_VERTICES: usize = 3;

/// Where the outer ring came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySource {
    /// No cut strokes: the full raster rectangle.
    Raster,
    /// The single cut stroke's own points.
    SingleCut,
    /// Bounding box of several cut strokes.
    BoundingBox,
    /// Cut geometry was degenerate; fell back to the raster rectangle.
    DegenerateFallback,
}

/// Merged outline of all cut strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    /// Outer ring (at least 3 distinct vertices).
    pub outer: Polygon,
    /// Hole rings.
    pub holes: Vec<Polygon>,
    /// How `outer` was derived.
    pub source: BoundarySource,
    /// Cut strokes that were ignored or replaced, one message each.
    pub warnings: Vec<String>,
}

impl BoundaryPolygon {
    fn raster(width: f64, height: f64, source: BoundarySource, warnings: Vec<String>) -> Self {
        Self {
            outer: Polygon::rectangle(width, height),
            holes: Vec::new(),
            source,
            warnings,
        }
    }
}

fn note(warnings: &mut Vec<String>, msg: String) {
    warn!("{msg}");
    warnings.push(msg);
}

/// Reduce cut strokes to a single boundary.
///
/// - no cut strokes: the raster rectangle;
/// - one stroke: its points (if it has at least 3 distinct vertices);
/// - several: the bounding box of all their points, with every stroke after
///   the first kept as a hole.
///
/// Degenerate cut geometry falls back to the raster rectangle. Strokes that
/// cannot be used (no points, or a hole with fewer than 3 distinct vertices)
/// are dropped and reported in [`BoundaryPolygon::warnings`].
pub fn merge(cuts: &[Stroke], width: f64, height: f64) -> BoundaryPolygon {
    let mut warnings = Vec::new();
    let usable: Vec<&Stroke> = cuts.iter().filter(|s| !s.points.is_empty()).collect();
    for s in cuts.iter().filter(|s| s.points.is_empty()) {
        note(&mut warnings, format!("ignoring cut stroke {} without points", s.id));
    }

    match usable.as_slice() {
        [] => BoundaryPolygon::raster(width, height, BoundarySource::Raster, warnings),
        [single] => {
            let mut outer = Polygon::from_ir(&single.points);
            outer.dedup();
            if outer.len() < MIN_RING_VERTICES {
                note(
                    &mut warnings,
                    format!(
                        "cut stroke {} has {} distinct vertices; using the raster outline",
                        single.id,
                        outer.len()
                    ),
                );
                return BoundaryPolygon::raster(
                    width,
                    height,
                    BoundarySource::DegenerateFallback,
                    warnings,
                );
            }
            BoundaryPolygon {
                outer,
                holes: Vec::new(),
                source: BoundarySource::SingleCut,
                warnings,
            }
        }
        [_, rest @ ..] => {
            let all = usable
                .iter()
                .flat_map(|s| s.points.iter().map(|p| dieline_math::Point2::from(*p)));
            let bounds = match Bounds2::from_points(&all.collect::<Vec<_>>()) {
                Some(b) if !b.is_degenerate() => b,
                _ => {
                    note(
                        &mut warnings,
                        "cut strokes span no area; using the raster outline".to_string(),
                    );
                    return BoundaryPolygon::raster(
                        width,
                        height,
                        BoundarySource::DegenerateFallback,
                        warnings,
                    );
                }
            };
            let mut holes = Vec::with_capacity(rest.len());
            for s in rest {
                let mut ring = Polygon::from_ir(&s.points);
                ring.dedup();
                if ring.len() < MIN_RING_VERTICES {
                    note(
                        &mut warnings,
                        format!(
                            "cut stroke {} has {} distinct vertices; not kept as a hole",
                            s.id,
                            ring.len()
                        ),
                    );
                } else {
                    holes.push(ring);
                }
            }
            debug!(
                "merged {} cut strokes into a {:.1}x{:.1} bounding outline with {} hole(s)",
                usable.len(),
                bounds.width(),
                bounds.height(),
                holes.len()
            );
            BoundaryPolygon {
                outer: Polygon::new(bounds.corners().to_vec()),
                holes,
                source: BoundarySource::BoundingBox,
                warnings,
            }
        }
    }
}
