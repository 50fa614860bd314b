//! Stroke classification: detected paths to typed strokes.
//!
//! Color is the primary signal. When a raster is available, a handful of
//! points along each path are sampled and averaged; a clearly red, blue,
//! green or yellow average decides the type. Anything else (no raster, all
//! samples off-raster, or an ambiguous color) falls back to the orientation
//! of the path's chord.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use dieline_ir::{Point2D, Stroke, StrokeKind, StrokeSet};

use crate::curve::is_curved;
use crate::raster::PixelSampler;

/// Classifier thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Maximum number of pixels sampled per path.
    pub max_color_samples: usize,
    /// Half-width of the horizontal/vertical angle windows (degrees).
    pub angle_tolerance_degrees: f64,
    /// Minimum channel value for a channel to count as dominant.
    pub color_threshold: f64,
    /// Blue must stay below this for a yellow (emboss) match.
    pub emboss_blue_max: f64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            max_color_samples: 10,
            angle_tolerance_degrees: 15.0,
            color_threshold: 150.0,
            emboss_blue_max: 100.0,
        }
    }
}

/// A path produced by line detection or freehand input, before typing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectedPath {
    /// Optional id carried through to the stroke.
    pub id: Option<String>,
    /// Points in raster space.
    pub points: Vec<Point2D>,
    /// Whether the path is closed.
    pub closed: bool,
}

impl DetectedPath {
    /// An open path without an id.
    pub fn new(points: Vec<Point2D>) -> Self {
        Self {
            id: None,
            points,
            closed: false,
        }
    }
}

/// How a path's type was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// Average sampled color.
    Color,
    /// Chord angle.
    Angle,
}

/// Result of classifying a batch of paths.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Typed strokes.
    pub strokes: StrokeSet,
    /// Paths typed by color.
    pub by_color: usize,
    /// Paths typed by angle.
    pub by_angle: usize,
    /// Paths whose arc length clearly exceeds their chord.
    pub curved: usize,
}

/// Average RGB along a path, as floating point channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageColor {
    /// Mean red.
    pub r: f64,
    /// Mean green.
    pub g: f64,
    /// Mean blue.
    pub b: f64,
}

/// Sample up to `max_samples` evenly spaced vertices of `points` and average them.
///
/// Off-raster samples are skipped; `None` if nothing was sampled.
pub fn average_color(
    points: &[Point2D],
    sampler: &dyn PixelSampler,
    max_samples: usize,
) -> Option<AverageColor> {
    let n = points.len();
    let count = max_samples.min(n);
    if count == 0 {
        return None;
    }
    let (mut r, mut g, mut b, mut hits) = (0.0, 0.0, 0.0, 0usize);
    for i in 0..count {
        let idx = i * n / count;
        let p = points[idx];
        if let Some(c) = sampler.sample_pixel(p.x.round() as i64, p.y.round() as i64) {
            r += c.r as f64;
            g += c.g as f64;
            b += c.b as f64;
            hits += 1;
        }
    }
    if hits == 0 {
        return None;
    }
    let n = hits as f64;
    Some(AverageColor {
        r: r / n,
        g: g / n,
        b: b / n,
    })
}

/// Map an average color to a stroke type, or `None` if no channel dominates.
pub fn classify_by_color(c: AverageColor, settings: &ClassifierSettings) -> Option<StrokeKind> {
    let t = settings.color_threshold;
    if c.r > c.g && c.r > c.b && c.r > t {
        Some(StrokeKind::Cut)
    } else if c.b > c.r && c.b > c.g && c.b > t {
        Some(StrokeKind::Crease)
    } else if c.g > c.r && c.g > c.b && c.g > t {
        Some(StrokeKind::Perf)
    } else if c.r > t && c.g > t && c.b < settings.emboss_blue_max {
        Some(StrokeKind::Emboss)
    } else {
        None
    }
}

/// Type a path by the orientation of its first-to-last chord.
///
/// The angle is the raw `atan2` direction in (-180, 180] degrees, so the
/// drawing direction matters: a chord within tolerance of 0 or 180 is a cut,
/// one within tolerance of +90 (drawn downward in raster space) is a crease,
/// anything else a perforation. Paths with fewer than two points are cuts.
pub fn classify_by_angle(points: &[Point2D], settings: &ClassifierSettings) -> StrokeKind {
    if points.len() < 2 {
        return StrokeKind::Cut;
    }
    let a = points[0];
    let b = points[points.len() - 1];
    let angle = (b.y - a.y).atan2(b.x - a.x).to_degrees();
    let tol = settings.angle_tolerance_degrees;
    if angle.abs() < tol || (angle - 180.0).abs() < tol {
        StrokeKind::Cut
    } else if (angle - 90.0).abs() < tol {
        StrokeKind::Crease
    } else {
        StrokeKind::Perf
    }
}

/// Type one path, trying color first when a sampler is given.
pub fn classify_path(
    points: &[Point2D],
    sampler: Option<&dyn PixelSampler>,
    settings: &ClassifierSettings,
) -> (StrokeKind, Basis) {
    let by_color = sampler
        .and_then(|s| average_color(points, s, settings.max_color_samples))
        .and_then(|c| classify_by_color(c, settings));
    match by_color {
        Some(kind) => (kind, Basis::Color),
        None => (classify_by_angle(points, settings), Basis::Angle),
    }
}

/// Classify paths without a raster (angle heuristic only).
pub fn classify(paths: &[DetectedPath], settings: &ClassifierSettings) -> Classification {
    classify_paths(paths, None, settings)
}

/// Classify paths, sampling colors from `sampler`.
pub fn classify_with_raster(
    paths: &[DetectedPath],
    sampler: &(dyn PixelSampler + Sync),
    settings: &ClassifierSettings,
) -> Classification {
    classify_paths(paths, Some(sampler), settings)
}

fn classify_paths(
    paths: &[DetectedPath],
    sampler: Option<&(dyn PixelSampler + Sync)>,
    settings: &ClassifierSettings,
) -> Classification {
    // Each path is independent; order is preserved by the indexed collect.
    let typed: Vec<(StrokeKind, Basis, bool)> = paths
        .par_iter()
        .map(|path| {
            let sampler = sampler.map(|s| s as &dyn PixelSampler);
            let (kind, basis) = classify_path(&path.points, sampler, settings);
            (kind, basis, is_curved(&path.points))
        })
        .collect();

    let mut result = Classification::default();
    let mut counters = [0usize; 4];
    for (path, (kind, basis, curved)) in paths.iter().zip(typed) {
        let slot = &mut counters[kind as usize];
        let id = path
            .id
            .clone()
            .unwrap_or_else(|| format!("{}_{}", kind.as_str(), slot));
        *slot += 1;
        match basis {
            Basis::Color => result.by_color += 1,
            Basis::Angle => result.by_angle += 1,
        }
        if curved {
            result.curved += 1;
        }
        result
            .strokes
            .push(Stroke::new(id, kind, path.points.clone(), path.closed));
    }

    debug!(
        "classified {} paths: {} cut, {} crease, {} perf, {} emboss ({} by color, {} curved)",
        paths.len(),
        result.strokes.cut.len(),
        result.strokes.crease.len(),
        result.strokes.perf.len(),
        result.strokes.emboss.len(),
        result.by_color,
        result.curved,
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{FnSampler, Rgb};

    fn path(coords: &[(f64, f64)]) -> DetectedPath {
        DetectedPath::new(coords.iter().map(|&(x, y)| Point2D::new(x, y)).collect())
    }

    fn solid(color: Rgb) -> FnSampler<impl Fn(u32, u32) -> Rgb> {
        FnSampler::new(200, 200, move |_, _| color)
    }

    #[test]
    fn test_red_is_cut_regardless_of_angle() {
        let sampler = solid(Rgb::new(255, 0, 0));
        // Vertical chord would be a crease by angle.
        let paths = [path(&[(50.0, 10.0), (50.0, 190.0)])];
        let out = classify_with_raster(&paths, &sampler, &ClassifierSettings::default());
        assert_eq!(out.strokes.cut.len(), 1);
        assert_eq!(out.by_color, 1);
    }

    #[test]
    fn test_blue_is_crease_regardless_of_angle() {
        let sampler = solid(Rgb::new(0, 0, 255));
        let paths = [path(&[(10.0, 50.0), (190.0, 50.0)])];
        let out = classify_with_raster(&paths, &sampler, &ClassifierSettings::default());
        assert_eq!(out.strokes.crease.len(), 1);
        assert_eq!(out.strokes.crease[0].id, "crease_0");
    }

    #[test]
    fn test_green_and_yellow() {
        let settings = ClassifierSettings::default();
        let green = AverageColor { r: 0.0, g: 200.0, b: 0.0 };
        let yellow = AverageColor { r: 255.0, g: 255.0, b: 0.0 };
        assert_eq!(classify_by_color(green, &settings), Some(StrokeKind::Perf));
        assert_eq!(classify_by_color(yellow, &settings), Some(StrokeKind::Emboss));
    }

    #[test]
    fn test_ambiguous_color_falls_back_to_angle() {
        // Grey has no dominant channel.
        let sampler = solid(Rgb::new(128, 128, 128));
        let paths = [path(&[(50.0, 10.0), (52.0, 190.0)])];
        let out = classify_with_raster(&paths, &sampler, &ClassifierSettings::default());
        assert_eq!(out.strokes.crease.len(), 1);
        assert_eq!(out.by_angle, 1);
    }

    #[test]
    fn test_off_raster_path_falls_back_to_angle() {
        let sampler = solid(Rgb::new(255, 0, 0));
        let paths = [path(&[(500.0, 500.0), (900.0, 505.0)])];
        let out = classify_with_raster(&paths, &sampler, &ClassifierSettings::default());
        assert_eq!(out.strokes.cut.len(), 1);
        assert_eq!(out.by_angle, 1);
    }

    #[test]
    fn test_angle_windows() {
        let s = ClassifierSettings::default();
        let kind = |x: f64, y: f64| {
            classify_by_angle(&[Point2D::new(0.0, 0.0), Point2D::new(x, y)], &s)
        };
        assert_eq!(kind(100.0, 5.0), StrokeKind::Cut);
        assert_eq!(kind(100.0, -5.0), StrokeKind::Cut);
        assert_eq!(kind(-100.0, 5.0), StrokeKind::Cut);
        assert_eq!(kind(5.0, 100.0), StrokeKind::Crease);
        assert_eq!(kind(100.0, 100.0), StrokeKind::Perf);
    }

    #[test]
    fn test_angle_follows_drawing_direction() {
        let s = ClassifierSettings::default();
        let kind = |from: (f64, f64), to: (f64, f64)| {
            classify_by_angle(&[Point2D::new(from.0, from.1), Point2D::new(to.0, to.1)], &s)
        };
        // Downward vertical is +90, upward is -90.
        assert_eq!(kind((0.0, 0.0), (0.0, 100.0)), StrokeKind::Crease);
        assert_eq!(kind((0.0, 100.0), (0.0, 0.0)), StrokeKind::Perf);
        // Leftward and slightly upward lands near -174, outside both cut windows.
        assert_eq!(kind((0.0, 0.0), (-100.0, -10.0)), StrokeKind::Perf);
    }

    #[test]
    fn test_degenerate_paths_are_cuts() {
        let out = classify(
            &[DetectedPath::default(), path(&[(3.0, 4.0)])],
            &ClassifierSettings::default(),
        );
        assert_eq!(out.strokes.cut.len(), 2);
        assert!(out.strokes.cut[0].points.is_empty());
    }

    #[test]
    fn test_sampling_is_bounded() {
        use std::cell::Cell;
        struct Counting(Cell<usize>);
        impl PixelSampler for Counting {
            fn sample_pixel(&self, _x: i64, _y: i64) -> Option<Rgb> {
                self.0.set(self.0.get() + 1);
                Some(Rgb::new(255, 0, 0))
            }
        }
        let sampler = Counting(Cell::new(0));
        let points: Vec<_> = (0..100).map(|i| Point2D::new(i as f64, 0.0)).collect();
        let avg = average_color(&points, &sampler, 10).unwrap();
        assert_eq!(sampler.0.get(), 10);
        assert_eq!(avg.r, 255.0);
    }

    #[test]
    fn test_ids_count_per_kind_and_keep_given_ids() {
        let mut named = path(&[(0.0, 0.0), (0.0, 100.0)]);
        named.id = Some("fold".into());
        let paths = [
            path(&[(0.0, 0.0), (100.0, 0.0)]),
            named,
            path(&[(0.0, 50.0), (100.0, 50.0)]),
        ];
        let out = classify(&paths, &ClassifierSettings::default());
        let cut_ids: Vec<_> = out.strokes.cut.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(cut_ids, ["cut_0", "cut_1"]);
        assert_eq!(out.strokes.crease[0].id, "fold");
    }
}
