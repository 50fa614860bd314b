//! Stroke records as they arrive from the annotation layer or a line detector.

use serde::{Deserialize, Serialize};

use crate::{IrError, Point2D, RasterSize, Stroke, StrokeKind, StrokeSet};

/// Coordinate list in any of the accepted layouts.
///
/// Detectors emit flat `[x0, y0, x1, y1, ...]` lists, the drawing layer emits
/// `[[x, y], ...]` pairs, and round-tripped strokes use `{x, y}` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coords {
    /// Interleaved x/y values.
    Flat(Vec<f64>),
    /// `[x, y]` pairs.
    Pairs(Vec<[f64; 2]>),
    /// Point objects.
    Points(Vec<Point2D>),
}

impl Coords {
    /// Convert to points. `label` names the stroke in error messages.
    pub fn to_points(&self, label: &str) -> Result<Vec<Point2D>, IrError> {
        match self {
            Coords::Flat(values) => {
                if values.len() % 2 != 0 {
                    return Err(IrError::OddCoordinateCount {
                        stroke: label.to_string(),
                        len: values.len(),
                    });
                }
                Ok(values
                    .chunks_exact(2)
                    .map(|c| Point2D::new(c[0], c[1]))
                    .collect())
            }
            Coords::Pairs(pairs) => Ok(pairs.iter().map(|p| Point2D::new(p[0], p[1])).collect()),
            Coords::Points(points) => Ok(points.clone()),
        }
    }
}

/// One stroke as stored by the annotation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    /// Optional identifier; generated as `<kind>_<index>` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Coordinates.
    pub points: Coords,
    /// Whether the path is closed.
    #[serde(default)]
    pub closed: bool,
}

impl StrokeRecord {
    /// Record for an existing stroke (pairs layout).
    pub fn from_stroke(stroke: &Stroke) -> Self {
        Self {
            id: Some(stroke.id.clone()),
            points: Coords::Pairs(stroke.points.iter().map(|p| [p.x, p.y]).collect()),
            closed: stroke.closed,
        }
    }

    /// Points of this record, using `fallback_id` in error messages.
    pub fn points(&self, fallback_id: &str) -> Result<Vec<Point2D>, IrError> {
        self.points.to_points(self.id.as_deref().unwrap_or(fallback_id))
    }

    /// Build a typed stroke. `index` is the record's position in its group.
    pub fn to_stroke(&self, kind: StrokeKind, index: usize) -> Result<Stroke, IrError> {
        let id = self
            .id
            .clone()
            .unwrap_or_else(|| format!("{}_{}", kind.as_str(), index));
        let points = self.points.to_points(&id)?;
        Ok(Stroke::new(id, kind, points, self.closed))
    }
}

/// Stroke records keyed by type, the annotation layer's storage shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    /// Cut records.
    #[serde(default)]
    pub cut: Vec<StrokeRecord>,
    /// Crease records.
    #[serde(default)]
    pub crease: Vec<StrokeRecord>,
    /// Perforation records.
    #[serde(default)]
    pub perf: Vec<StrokeRecord>,
    /// Emboss records.
    #[serde(default)]
    pub emboss: Vec<StrokeRecord>,
}

impl Annotations {
    fn group(&self, kind: StrokeKind) -> &[StrokeRecord] {
        match kind {
            StrokeKind::Cut => &self.cut,
            StrokeKind::Crease => &self.crease,
            StrokeKind::Perf => &self.perf,
            StrokeKind::Emboss => &self.emboss,
        }
    }

    /// Convert every record into a typed stroke.
    pub fn to_stroke_set(&self) -> Result<StrokeSet, IrError> {
        let mut set = StrokeSet::new();
        for kind in StrokeKind::ALL {
            for (i, record) in self.group(kind).iter().enumerate() {
                set.push(record.to_stroke(kind, i)?);
            }
        }
        Ok(set)
    }

    /// Records for a stroke set (pairs layout, ids kept).
    pub fn from_stroke_set(set: &StrokeSet) -> Self {
        let records = |kind: StrokeKind| -> Vec<StrokeRecord> {
            set.of_kind(kind).iter().map(StrokeRecord::from_stroke).collect()
        };
        Self {
            cut: records(StrokeKind::Cut),
            crease: records(StrokeKind::Crease),
            perf: records(StrokeKind::Perf),
            emboss: records(StrokeKind::Emboss),
        }
    }
}

fn default_version() -> String {
    "0.1".to_string()
}

/// A design project: the raster it annotates and its strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Format version string.
    #[serde(default = "default_version")]
    pub version: String,
    /// Source raster dimensions.
    pub raster: RasterSize,
    /// Stroke records by type.
    #[serde(default)]
    pub annotations: Annotations,
}

impl Design {
    /// Create a design with no strokes.
    pub fn new(raster: RasterSize) -> Self {
        Self {
            version: default_version(),
            raster,
            annotations: Annotations::default(),
        }
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
