#![warn(missing_docs)]

//! Dieline compiler: typed 2D strokes to a panel/hinge model.
//!
//! Given the cut, crease, perforation and emboss strokes drawn over a
//! packaging design raster, this crate derives the flat panels the design
//! folds from, the hinges between them, and the emboss overlays, ready for
//! an external 3D builder.
//!
//! # Example
//!
//! ```ignore
//! use dieline_compiler::{compile, CompileSettings};
//! use dieline_ir::{RasterSize, StrokeSet};
//!
//! let strokes: StrokeSet = // ... from classification or a saved design
//! let result = compile(&strokes, RasterSize::new(800, 600), &CompileSettings::default())?;
//!
//! println!("Panels: {}", result.model.panels.len());
//! for w in &result.warnings {
//!     eprintln!("warning: {w}");
//! }
//! ```

pub mod boundary;
pub mod classify;
pub mod curve;
pub mod emboss;
pub mod error;
pub mod hinge;
pub mod polygon;
pub mod raster;
pub mod split;
pub mod svg;
pub mod uv;
pub mod validate;

pub use boundary::{merge, BoundaryPolygon, BoundarySource};
pub use classify::{
    classify, classify_path, classify_with_raster, Basis, Classification, ClassifierSettings,
    DetectedPath,
};
pub use curve::{is_curved, promote_to_curve, to_curve};
pub use emboss::extract_emboss_regions;
pub use error::{CompileError, Result};
pub use hinge::build_hinges;
pub use polygon::{Polygon, Polyline};
pub use raster::{FnSampler, PixelSampler, Rgb};
pub use split::{bisect, split, Bisection, MultiCreasePolicy, SplitResult};
pub use svg::{model_to_svg, strokes_to_svg};
pub use uv::{assign_uvs, map_uv};
pub use validate::{snap_crease, snap_point, validate_crease, validate_creases};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use dieline_ir::{
    CompiledModel, Design, EmbossKind, RasterSize, StrokeKind, StrokeSet, ValidationReport,
    DEFAULT_FOLD_ANGLE,
};

/// Compilation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileSettings {
    /// Stroke classifier thresholds.
    pub classifier: ClassifierSettings,
    /// Max endpoint distance (px) for a crease to attach to a panel edge.
    pub hinge_tolerance: f64,
    /// Max endpoint distance (px) from a cut line for a valid crease.
    pub crease_tolerance: f64,
    /// Length (px) each crease is extended at both ends before splitting.
    pub crease_extension: f64,
    /// Fold angle assigned to every hinge (degrees).
    pub default_fold_angle: f64,
    /// Emboss depth (mm).
    pub emboss_depth_mm: f64,
    /// Emboss direction.
    pub emboss_kind: EmbossKind,
    /// Samples per span when promoting strokes to curves.
    pub curve_segments_per_span: usize,
    /// Handling of designs with more than one crease.
    pub multi_crease: MultiCreasePolicy,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            classifier: ClassifierSettings::default(),
            hinge_tolerance: 20.0,
            crease_tolerance: 10.0,
            crease_extension: 10.0,
            default_fold_angle: DEFAULT_FOLD_ANGLE,
            emboss_depth_mm: 2.0,
            emboss_kind: EmbossKind::Raised,
            curve_segments_per_span: curve::DEFAULT_SEGMENTS_PER_SPAN,
            multi_crease: MultiCreasePolicy::SinglePanel,
        }
    }
}

impl CompileSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("hinge_tolerance", self.hinge_tolerance),
            ("crease_tolerance", self.crease_tolerance),
            ("crease_extension", self.crease_extension),
            ("emboss_depth_mm", self.emboss_depth_mm),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CompileError::InvalidSettings(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }
        if !(-180.0..=180.0).contains(&self.default_fold_angle) {
            return Err(CompileError::InvalidSettings(
                "default_fold_angle must be between -180 and 180 degrees".into(),
            ));
        }
        if self.curve_segments_per_span == 0 {
            return Err(CompileError::InvalidSettings(
                "curve_segments_per_span must be at least 1".into(),
            ));
        }
        let c = &self.classifier;
        if c.max_color_samples == 0 {
            return Err(CompileError::InvalidSettings(
                "classifier.max_color_samples must be at least 1".into(),
            ));
        }
        if !(0.0..90.0).contains(&c.angle_tolerance_degrees) {
            return Err(CompileError::InvalidSettings(
                "classifier.angle_tolerance_degrees must be between 0 and 90".into(),
            ));
        }
        Ok(())
    }
}

/// Result of a compile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compilation {
    /// Panels, hinges and emboss regions.
    pub model: CompiledModel,
    /// Crease validation over the input strokes.
    pub validation: ValidationReport,
    /// Degradations encountered along the way.
    pub warnings: Vec<String>,
}

/// Compile typed strokes into a panel/hinge model.
///
/// This is the main entry point. It:
/// 1. Merges cut strokes into a boundary
/// 2. Splits the boundary along creases into panels
/// 3. Maps texture coordinates for every panel
/// 4. Builds one hinge per crease
/// 5. Carries emboss strokes through as regions
/// 6. Validates creases against the cut lines
///
/// Geometric ambiguity never fails the compile; it is reported in
/// [`Compilation::warnings`]. Only bad settings or an empty raster are errors.
pub fn compile(
    strokes: &StrokeSet,
    raster: RasterSize,
    settings: &CompileSettings,
) -> Result<Compilation> {
    settings.validate()?;
    if raster.is_empty() {
        return Err(CompileError::InvalidRaster(raster.width, raster.height));
    }
    let mut warnings = Vec::new();

    let mut boundary = merge(
        strokes.of_kind(StrokeKind::Cut),
        raster.width as f64,
        raster.height as f64,
    );
    warnings.append(&mut boundary.warnings);

    let creases = strokes.of_kind(StrokeKind::Crease);
    let mut split_result = split(
        &boundary,
        creases,
        raster,
        settings.crease_extension,
        settings.multi_crease,
    );
    warnings.append(&mut split_result.warnings);
    let mut panels = split_result.panels;
    assign_uvs(&mut panels)?;

    let hinges = build_hinges(
        creases,
        &panels,
        settings.hinge_tolerance,
        settings.default_fold_angle,
    );
    if panels.len() > 1 {
        for hinge in hinges.iter().filter(|h| h.connected_panels() < 2) {
            let msg = format!(
                "{} connects {} panel(s); expected 2",
                hinge.id,
                hinge.connected_panels()
            );
            warn!("{msg}");
            warnings.push(msg);
        }
    }

    let perfs = strokes.of_kind(StrokeKind::Perf);
    if !perfs.is_empty() {
        debug!("{} perforation stroke(s) are not part of the model", perfs.len());
    }

    let emboss_regions = extract_emboss_regions(
        strokes.of_kind(StrokeKind::Emboss),
        settings.emboss_depth_mm,
        settings.emboss_kind,
    );

    let validation = validate_creases(
        creases,
        strokes.of_kind(StrokeKind::Cut),
        settings.crease_tolerance,
    );

    info!(
        "compiled {} panel(s), {} hinge(s), {} emboss region(s); {}/{} creases valid",
        panels.len(),
        hinges.len(),
        emboss_regions.len(),
        validation.valid,
        validation.total
    );

    Ok(Compilation {
        model: CompiledModel {
            panels,
            hinges,
            emboss_regions,
        },
        validation,
        warnings,
    })
}

/// Compile a saved design document.
pub fn compile_design(design: &Design, settings: &CompileSettings) -> Result<Compilation> {
    let strokes = design.annotations.to_stroke_set()?;
    compile(&strokes, design.raster, settings)
}
