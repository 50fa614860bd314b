//! Data model for dieline compilation.
//!
//! This crate defines the serializable types shared between the compiler, the
//! CLI, and the external collaborators (annotation capture, 3D construction,
//! project persistence). Input side: typed strokes and the records they are
//! read from. Output side: the compiled panel/hinge model.
//!
//! The model is purely declarative; all geometry work happens in the compiler.

use serde::{Deserialize, Serialize};
use std::fmt;

mod input;

pub use input::{Annotations, Coords, Design, StrokeRecord};

/// Errors raised while reading stroke records.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    /// A flat coordinate list had an odd number of values.
    #[error("stroke {stroke}: flat coordinate list has odd length {len}")]
    OddCoordinateCount {
        /// Id (or generated id) of the offending stroke.
        stroke: String,
        /// Number of values in the list.
        len: usize,
    },
    /// JSON (de)serialization failed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// 2D point in raster pixel space, serializable as `{ "x": .., "y": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate (pixels, grows right).
    pub x: f64,
    /// Y coordinate (pixels, grows down).
    pub y: f64,
}

impl Point2D {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<dieline_math::Point2> for Point2D {
    fn from(p: dieline_math::Point2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point2D> for dieline_math::Point2 {
    fn from(p: Point2D) -> Self {
        dieline_math::Point2::new(p.x, p.y)
    }
}

/// Pixel dimensions of the source raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RasterSize {
    /// Create a raster size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Semantic type of an annotation stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeKind {
    /// Die-cut edge defining the outer silhouette.
    Cut,
    /// Fold line between two panels.
    Crease,
    /// Perforation line.
    Perf,
    /// Decorative raised or debossed region.
    Emboss,
}

impl StrokeKind {
    /// All kinds, in canonical order.
    pub const ALL: [StrokeKind; 4] = [
        StrokeKind::Cut,
        StrokeKind::Crease,
        StrokeKind::Perf,
        StrokeKind::Emboss,
    ];

    /// Lowercase name as used in JSON and generated ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeKind::Cut => "cut",
            StrokeKind::Crease => "crease",
            StrokeKind::Perf => "perf",
            StrokeKind::Emboss => "emboss",
        }
    }

    /// Drawing style used when rendering strokes of this kind.
    pub fn style(&self) -> StrokeStyle {
        match self {
            StrokeKind::Cut => StrokeStyle {
                color: [255, 0, 0],
                width: 3.0,
                dash: &[],
            },
            StrokeKind::Crease => StrokeStyle {
                color: [0, 0, 255],
                width: 2.0,
                dash: &[10.0, 5.0],
            },
            StrokeKind::Perf => StrokeStyle {
                color: [0, 255, 0],
                width: 2.0,
                dash: &[5.0, 10.0],
            },
            StrokeKind::Emboss => StrokeStyle {
                color: [255, 255, 0],
                width: 4.0,
                dash: &[],
            },
        }
    }
}

impl fmt::Display for StrokeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line appearance for a stroke kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// RGB color.
    pub color: [u8; 3],
    /// Line width in pixels.
    pub width: f64,
    /// Dash pattern (empty = solid).
    pub dash: &'static [f64],
}

impl StrokeStyle {
    /// Color as a `#rrggbb` hex string.
    pub fn hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            self.color[0], self.color[1], self.color[2]
        )
    }
}

/// A typed annotation stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Identifier, unique within a stroke set.
    pub id: String,
    /// Semantic type.
    pub kind: StrokeKind,
    /// Ordered points. Normally at least 2; degenerate strokes are tolerated
    /// and rejected by the stage that consumes them.
    pub points: Vec<Point2D>,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

impl Stroke {
    /// Create a stroke.
    pub fn new(id: impl Into<String>, kind: StrokeKind, points: Vec<Point2D>, closed: bool) -> Self {
        Self {
            id: id.into(),
            kind,
            points,
            closed,
        }
    }

    /// First point.
    pub fn start(&self) -> Option<Point2D> {
        self.points.first().copied()
    }

    /// Last point.
    pub fn end(&self) -> Option<Point2D> {
        self.points.last().copied()
    }

    /// First and last point, if the stroke has at least two points.
    pub fn chord(&self) -> Option<(Point2D, Point2D)> {
        if self.points.len() < 2 {
            return None;
        }
        Some((self.points[0], self.points[self.points.len() - 1]))
    }
}

/// Strokes grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeSet {
    /// Cut strokes.
    pub cut: Vec<Stroke>,
    /// Crease strokes.
    pub crease: Vec<Stroke>,
    /// Perforation strokes.
    pub perf: Vec<Stroke>,
    /// Emboss strokes.
    pub emboss: Vec<Stroke>,
}

impl StrokeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stroke to the group matching its kind.
    pub fn push(&mut self, stroke: Stroke) {
        self.of_kind_mut(stroke.kind).push(stroke);
    }

    /// Strokes of one kind.
    pub fn of_kind(&self, kind: StrokeKind) -> &[Stroke] {
        match kind {
            StrokeKind::Cut => &self.cut,
            StrokeKind::Crease => &self.crease,
            StrokeKind::Perf => &self.perf,
            StrokeKind::Emboss => &self.emboss,
        }
    }

    fn of_kind_mut(&mut self, kind: StrokeKind) -> &mut Vec<Stroke> {
        match kind {
            StrokeKind::Cut => &mut self.cut,
            StrokeKind::Crease => &mut self.crease,
            StrokeKind::Perf => &mut self.perf,
            StrokeKind::Emboss => &mut self.emboss,
        }
    }

    /// Iterate over every stroke, grouped in canonical kind order.
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        StrokeKind::ALL.into_iter().flat_map(|k| self.of_kind(k).iter())
    }

    /// Find a stroke by id.
    pub fn find(&self, id: &str) -> Option<&Stroke> {
        self.iter().find(|s| s.id == id)
    }

    /// Replace the stroke with the same id (and kind). Returns false if none matched.
    pub fn replace(&mut self, stroke: Stroke) -> bool {
        let group = self.of_kind_mut(stroke.kind);
        match group.iter_mut().find(|s| s.id == stroke.id) {
            Some(slot) => {
                *slot = stroke;
                true
            }
            None => false,
        }
    }

    /// Total number of strokes.
    pub fn len(&self) -> usize {
        self.cut.len() + self.crease.len() + self.perf.len() + self.emboss.len()
    }

    /// True if there are no strokes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Axis-aligned box in panel-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2D {
    /// Minimum corner.
    pub min: Point2D,
    /// Maximum corner.
    pub max: Point2D,
}

impl Bounds2D {
    /// Width along X.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height along Y.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

impl From<dieline_math::Bounds2> for Bounds2D {
    fn from(b: dieline_math::Bounds2) -> Self {
        Self {
            min: b.min.into(),
            max: b.max.into(),
        }
    }
}

/// Texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uv {
    /// Horizontal, 0 at the raster's left edge.
    pub u: f64,
    /// Vertical, 0 at the raster's bottom edge.
    pub v: f64,
}

/// The crease chord a panel was split along, in raster coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seam {
    /// Crease start point.
    pub start: Point2D,
    /// Crease end point.
    pub end: Point2D,
}

/// A flat region of material bounded by cuts and creases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// Identifier (`panel_<n>`).
    pub id: String,
    /// Polygon vertices relative to `center`.
    pub vertices: Vec<Point2D>,
    /// Area centroid in raster coordinates.
    pub center: Point2D,
    /// Bounds of `vertices` (panel-local).
    pub bounds: Bounds2D,
    /// Hole rings relative to `center`.
    #[serde(default)]
    pub holes: Vec<Vec<Point2D>>,
    /// Raster the panel was compiled against.
    pub source_raster_size: RasterSize,
    /// One texture coordinate per vertex.
    #[serde(default)]
    pub uvs: Vec<Uv>,
    /// Crease chords this panel was split along.
    #[serde(default)]
    pub seams: Vec<Seam>,
}

impl Panel {
    /// Vertices translated back into raster coordinates.
    pub fn raster_vertices(&self) -> Vec<Point2D> {
        self.vertices
            .iter()
            .map(|v| Point2D::new(v.x + self.center.x, v.y + self.center.y))
            .collect()
    }
}

/// Default fold angle for hinges, in degrees.
pub const DEFAULT_FOLD_ANGLE: f64 = 90.0;

/// Fold relationship between (at most) two panels along a crease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hinge {
    /// Identifier (`hinge_<n>`).
    pub id: String,
    /// Crease start (raster coordinates).
    pub start: Point2D,
    /// Crease end (raster coordinates).
    pub end: Point2D,
    /// Target fold angle.
    pub fold_angle_degrees: f64,
    /// Unit fold axis in the raster plane (z is always 0).
    pub axis: [f64; 3],
    /// First connected panel.
    pub panel_a: Option<String>,
    /// Second connected panel.
    pub panel_b: Option<String>,
}

impl Hinge {
    /// Number of panels this hinge connects.
    pub fn connected_panels(&self) -> usize {
        self.panel_a.is_some() as usize + self.panel_b.is_some() as usize
    }
}

/// Emboss direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbossKind {
    /// Pushed out of the material.
    #[default]
    Raised,
    /// Pushed into the material.
    Debossed,
}

/// Decorative overlay carried through to the 3D layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbossRegion {
    /// Identifier (`emboss_<n>`).
    pub id: String,
    /// Outline in raster coordinates.
    pub path: Vec<Point2D>,
    /// Depth in millimeters.
    pub depth_mm: f64,
    /// Raised or debossed.
    pub kind: EmbossKind,
}

/// Output of one compile invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledModel {
    /// Flat panels.
    pub panels: Vec<Panel>,
    /// Fold edges between panels.
    pub hinges: Vec<Hinge>,
    /// Decorative overlays.
    pub emboss_regions: Vec<EmbossRegion>,
}

impl CompiledModel {
    /// Look up a panel by id.
    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Outcome of checking a single crease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreaseValidation {
    /// Both endpoints lie on cut geometry.
    pub valid: bool,
    /// Human-readable explanation.
    pub message: String,
}

/// Batch validation summary over a crease set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Creases checked.
    pub total: usize,
    /// Creases that passed.
    pub valid: usize,
    /// Creases that failed.
    pub invalid: usize,
    /// One message per invalid crease.
    pub messages: Vec<String>,
}

impl ValidationReport {
    /// True if every crease passed.
    pub fn all_valid(&self) -> bool {
        self.invalid == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(id: &str, kind: StrokeKind) -> Stroke {
        Stroke::new(
            id,
            kind,
            vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)],
            false,
        )
    }

    #[test]
    fn test_stroke_set_routes_by_kind() {
        let mut set = StrokeSet::new();
        set.push(stroke("a", StrokeKind::Cut));
        set.push(stroke("b", StrokeKind::Crease));
        set.push(stroke("c", StrokeKind::Crease));
        assert_eq!(set.cut.len(), 1);
        assert_eq!(set.crease.len(), 2);
        assert_eq!(set.len(), 3);
        let ids: Vec<_> = set.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_stroke_set_replace() {
        let mut set = StrokeSet::new();
        set.push(stroke("a", StrokeKind::Crease));
        let mut moved = stroke("a", StrokeKind::Crease);
        moved.points[1] = Point2D::new(20.0, 5.0);
        assert!(set.replace(moved.clone()));
        assert_eq!(set.find("a"), Some(&moved));
        assert!(!set.replace(stroke("missing", StrokeKind::Crease)));
    }

    #[test]
    fn test_chord_requires_two_points() {
        let mut s = stroke("a", StrokeKind::Cut);
        assert!(s.chord().is_some());
        s.points.truncate(1);
        assert!(s.chord().is_none());
    }

    #[test]
    fn test_style_hex() {
        assert_eq!(StrokeKind::Cut.style().hex(), "#ff0000");
        assert_eq!(StrokeKind::Emboss.style().hex(), "#ffff00");
        assert!(StrokeKind::Cut.style().dash.is_empty());
    }

    #[test]
    fn test_model_json_uses_camel_case() {
        let model = CompiledModel {
            panels: Vec::new(),
            hinges: vec![Hinge {
                id: "hinge_0".into(),
                start: Point2D::new(0.0, 300.0),
                end: Point2D::new(800.0, 300.0),
                fold_angle_degrees: DEFAULT_FOLD_ANGLE,
                axis: [1.0, 0.0, 0.0],
                panel_a: Some("panel_0".into()),
                panel_b: None,
            }],
            emboss_regions: Vec::new(),
        };
        let json = model.to_json().unwrap();
        assert!(json.contains("\"foldAngleDegrees\""));
        assert!(json.contains("\"panelA\""));
        assert!(json.contains("\"embossRegions\""));
        let back = CompiledModel::from_json(&json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_raster_vertices_undo_centering() {
        let panel = Panel {
            id: "panel_0".into(),
            vertices: vec![Point2D::new(-5.0, -5.0), Point2D::new(5.0, 5.0)],
            center: Point2D::new(10.0, 20.0),
            bounds: Bounds2D {
                min: Point2D::new(-5.0, -5.0),
                max: Point2D::new(5.0, 5.0),
            },
            holes: Vec::new(),
            source_raster_size: RasterSize::new(100, 100),
            uvs: Vec::new(),
            seams: Vec::new(),
        };
        assert_eq!(
            panel.raster_vertices(),
            vec![Point2D::new(5.0, 15.0), Point2D::new(15.0, 25.0)]
        );
    }
}
