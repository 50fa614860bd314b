//! Crease splitting: partition the boundary into panels.
//!
//! A crease bisects a region when its chord, extended at both ends by the
//! configured slack, crosses the region's ring at exactly two distinct
//! points. The ring is walked from one crossing to the other in each
//! direction, and each half is closed by the crease chord.
//!
//! Anything short of a clean bisection degrades to keeping the region whole.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use dieline_ir::{Bounds2D, Panel, Point2D, RasterSize, Seam, Stroke};
use dieline_math::{distance_to_segment, segment_intersection, Bounds2, Point2, Tolerance};

use crate::boundary::BoundaryPolygon;
use crate::polygon::Polygon;

/// What to do with more than one crease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiCreasePolicy {
    /// Keep the whole boundary as one panel.
    #[default]
    SinglePanel,
    /// Apply each crease in turn to every region it cleanly bisects.
    Recursive,
}

/// Why a bisection was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisectFailure {
    /// The crease chord has no length.
    ZeroLengthCrease,
    /// The chord crossed the ring this many distinct times (not 2).
    Crossings(usize),
    /// One side of the cut has no area.
    DegenerateSide,
}

impl std::fmt::Display for BisectFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BisectFailure::ZeroLengthCrease => write!(f, "crease has zero length"),
            BisectFailure::Crossings(n) => {
                write!(f, "crease crosses the outline {n} time(s), expected 2")
            }
            BisectFailure::DegenerateSide => write!(f, "one side of the split has no area"),
        }
    }
}

/// Panels produced by [`split`], plus any degradations that happened.
#[derive(Debug, Clone, Default)]
pub struct SplitResult {
    /// Panels, ids `panel_0..`.
    pub panels: Vec<Panel>,
    /// One message per degradation.
    pub warnings: Vec<String>,
}

/// Two halves of a ring and the chord between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Bisection {
    /// The two sides, each closed by the chord.
    pub sides: [Polygon; 2],
    /// Where the extended crease crossed the ring.
    pub chord: (Point2, Point2),
}

/// Region of the boundary with the creases that produced it.
///
/// Each seam is paired with the chord actually cut into the ring, so a
/// region only keeps seams it still borders.
#[derive(Debug, Clone)]
struct Region {
    ring: Polygon,
    seams: Vec<(Seam, (Point2, Point2))>,
}

impl Region {
    fn borders(&self, chord: (Point2, Point2)) -> bool {
        let tol = Tolerance::DEFAULT;
        let on_chord = |p: &Point2| tol.is_zero(distance_to_segment(p, &chord.0, &chord.1));
        self.ring.edges().any(|(p, q)| on_chord(&p) && on_chord(&q))
    }
}

#[derive(Debug, Clone, Copy)]
struct Crossing {
    point: Point2,
    edge: usize,
    u: f64,
    t: f64,
}

impl Crossing {
    fn ring_position(&self) -> f64 {
        self.edge as f64 + self.u
    }
}

/// Bisect `ring` along the chord `start`-`end`.
///
/// `extension` lengthens the chord at both ends so a crease stopping just
/// short of the outline still reaches it.
pub fn bisect(
    ring: &Polygon,
    start: Point2,
    end: Point2,
    extension: f64,
) -> Result<Bisection, BisectFailure> {
    let tol = Tolerance::DEFAULT;
    let dir = end - start;
    let len = dir.norm();
    if tol.is_zero(len) {
        return Err(BisectFailure::ZeroLengthCrease);
    }
    let slack = dir / len * extension;
    let a = start - slack;
    let b = end + slack;

    let mut crossings: Vec<Crossing> = ring
        .edges()
        .enumerate()
        .filter_map(|(edge, (p, q))| {
            segment_intersection(&a, &b, &p, &q).map(|hit| Crossing {
                point: hit.point,
                edge,
                u: hit.u,
                t: hit.t,
            })
        })
        .collect();

    // A chord through a vertex hits both adjacent edges at the same point.
    crossings.sort_by(|x, y| x.t.partial_cmp(&y.t).unwrap_or(std::cmp::Ordering::Equal));
    crossings.dedup_by(|x, y| tol.points_equal(&x.point, &y.point));
    if crossings.len() != 2 {
        return Err(BisectFailure::Crossings(crossings.len()));
    }

    let (first, second) = if crossings[0].ring_position() <= crossings[1].ring_position() {
        (crossings[0], crossings[1])
    } else {
        (crossings[1], crossings[0])
    };

    let n = ring.len();
    let mut side_a = vec![first.point];
    side_a.extend((first.edge + 1..=second.edge).map(|k| ring.points[k % n]));
    side_a.push(second.point);

    let mut side_b = vec![second.point];
    side_b.extend((second.edge + 1..=first.edge + n).map(|k| ring.points[k % n]));
    side_b.push(first.point);

    let mut side_a = Polygon::new(side_a);
    let mut side_b = Polygon::new(side_b);
    side_a.dedup();
    side_b.dedup();
    if side_a.len() < 3
        || side_b.len() < 3
        || tol.is_zero(side_a.area())
        || tol.is_zero(side_b.area())
    {
        return Err(BisectFailure::DegenerateSide);
    }
    Ok(Bisection {
        sides: [side_a, side_b],
        chord: (first.point, second.point),
    })
}

/// Split the boundary into panels along the creases.
///
/// - no creases: one panel equal to the boundary;
/// - one crease: two panels if it bisects the outline cleanly, else one;
/// - several creases: one panel, unless `policy` is
///   [`MultiCreasePolicy::Recursive`].
///
/// Holes go to the panel containing their centroid.
pub fn split(
    boundary: &BoundaryPolygon,
    creases: &[Stroke],
    raster: RasterSize,
    extension: f64,
    policy: MultiCreasePolicy,
) -> SplitResult {
    let mut warnings = Vec::new();
    let whole = Region {
        ring: boundary.outer.clone(),
        seams: Vec::new(),
    };

    let chords: Vec<(&Stroke, Point2, Point2)> = creases
        .iter()
        .filter_map(|c| match c.chord() {
            Some((a, b)) => Some((c, Point2::from(a), Point2::from(b))),
            None => {
                warnings.push(format!(
                    "crease {} has fewer than 2 points and was ignored",
                    c.id
                ));
                None
            }
        })
        .collect();

    let regions = match (chords.as_slice(), policy) {
        ([], _) => vec![whole],
        ([single], _) => split_region(&whole, single, extension, &mut warnings)
            .unwrap_or_else(|| vec![whole]),
        (_, MultiCreasePolicy::SinglePanel) => {
            warnings.push(format!(
                "{} creases: multi-crease splitting is disabled, compiled as a single panel",
                chords.len()
            ));
            vec![whole]
        }
        (_, MultiCreasePolicy::Recursive) => {
            let mut regions = vec![whole];
            for chord in &chords {
                let mut next = Vec::with_capacity(regions.len() + 1);
                let mut quiet = Vec::new();
                for region in regions {
                    match split_region(&region, chord, extension, &mut quiet) {
                        Some(halves) => next.extend(halves),
                        None => next.push(region),
                    }
                }
                let split_any = next
                    .iter()
                    .any(|r| r.seams.iter().any(|(s, _)| is_seam_of(s, chord)));
                if !split_any {
                    warnings.push(format!("crease {} did not split any panel", chord.0.id));
                }
                regions = next;
            }
            regions
        }
    };

    for w in &warnings {
        warn!("{w}");
    }
    debug!("split boundary into {} panel(s)", regions.len());

    let panels = build_panels(&regions, &boundary.holes, raster);
    SplitResult { panels, warnings }
}

fn is_seam_of(seam: &Seam, chord: &(&Stroke, Point2, Point2)) -> bool {
    seam.start == Point2D::from(chord.1) && seam.end == Point2D::from(chord.2)
}

fn split_region(
    region: &Region,
    chord: &(&Stroke, Point2, Point2),
    extension: f64,
    warnings: &mut Vec<String>,
) -> Option<Vec<Region>> {
    let (crease, start, end) = *chord;
    match bisect(&region.ring, start, end, extension) {
        Ok(Bisection { sides, chord }) => {
            let seam = Seam {
                start: start.into(),
                end: end.into(),
            };
            let halves = sides
                .into_iter()
                .map(|ring| {
                    let mut child = Region {
                        ring,
                        seams: Vec::new(),
                    };
                    child.seams = region
                        .seams
                        .iter()
                        .copied()
                        .filter(|&(_, cut)| child.borders(cut))
                        .collect();
                    child.seams.push((seam, chord));
                    child
                })
                .collect();
            Some(halves)
        }
        Err(reason) => {
            warnings.push(format!(
                "crease {} not split: {}; kept as a single panel",
                crease.id, reason
            ));
            None
        }
    }
}

fn build_panels(regions: &[Region], holes: &[Polygon], raster: RasterSize) -> Vec<Panel> {
    let mut panel_holes: Vec<Vec<&Polygon>> = vec![Vec::new(); regions.len()];
    for hole in holes {
        let c = hole.centroid();
        let owner = regions.iter().position(|r| r.ring.contains(&c)).unwrap_or(0);
        panel_holes[owner].push(hole);
    }

    regions
        .iter()
        .zip(panel_holes)
        .enumerate()
        .map(|(i, (region, holes))| {
            let center = region.ring.centroid();
            let local = |ring: &Polygon| -> Vec<Point2D> {
                ring.points
                    .iter()
                    .map(|p| Point2D::new(p.x - center.x, p.y - center.y))
                    .collect()
            };
            let vertices = local(&region.ring);
            let bounds = region
                .ring
                .bounds()
                .map(|b| Bounds2::new(b.min - center.coords, b.max - center.coords))
                .map(Bounds2D::from)
                .unwrap_or(Bounds2D {
                    min: Point2D::default(),
                    max: Point2D::default(),
                });
            Panel {
                id: format!("panel_{i}"),
                vertices,
                center: center.into(),
                bounds,
                holes: holes.into_iter().map(local).collect(),
                source_raster_size: raster,
                uvs: Vec::new(),
                seams: region.seams.iter().map(|&(s, _)| s).collect(),
            }
        })
        .collect()
}
