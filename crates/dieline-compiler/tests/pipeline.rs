//! Pipeline integration tests
//!
//! Raw paths are classified against a synthetic raster, stored as a design
//! document, reloaded, and compiled into a panel/hinge model.

use approx::assert_relative_eq;

use dieline_compiler::{
    classify_with_raster, compile, compile_design, model_to_svg, CompileSettings, DetectedPath,
    FnSampler, MultiCreasePolicy, Polygon, Rgb,
};
use dieline_ir::{Annotations, CompiledModel, Design, Point2D, RasterSize, StrokeKind};

const W: u32 = 800;
const H: u32 = 600;

/// Blue fold row at y=300, red border, white paper.
fn painted_raster(x: u32, y: u32) -> Rgb {
    if y == 300 {
        Rgb::new(20, 40, 230)
    } else if x == 0 || y == 0 || x == W - 1 || y == H - 1 {
        Rgb::new(230, 30, 30)
    } else {
        Rgb::new(255, 255, 255)
    }
}

fn path(coords: &[(f64, f64)], closed: bool) -> DetectedPath {
    DetectedPath {
        id: None,
        points: coords.iter().map(|&(x, y)| Point2D::new(x, y)).collect(),
        closed,
    }
}

fn classified_design() -> Design {
    let paths = vec![
        path(&[(0.0, 0.0), (800.0, 0.0), (800.0, 600.0), (0.0, 600.0)], true),
        path(&[(0.0, 300.0), (800.0, 300.0)], false),
        path(&[(100.0, 100.0), (200.0, 200.0)], false),
    ];
    let sampler = FnSampler::new(W, H, painted_raster);
    let classification = classify_with_raster(&paths, &sampler, &Default::default());
    assert_eq!(classification.by_color, 2);
    assert_eq!(classification.by_angle, 1);

    let mut design = Design::new(RasterSize::new(W, H));
    design.annotations = Annotations::from_stroke_set(&classification.strokes);
    design
}

#[test]
fn test_classified_paths_get_expected_kinds() {
    let design = classified_design();
    let strokes = design.annotations.to_stroke_set().unwrap();
    assert_eq!(strokes.of_kind(StrokeKind::Cut)[0].id, "cut_0");
    assert_eq!(strokes.of_kind(StrokeKind::Crease)[0].id, "crease_0");
    assert_eq!(strokes.of_kind(StrokeKind::Perf)[0].id, "perf_0");
    assert!(strokes.of_kind(StrokeKind::Emboss).is_empty());
}

#[test]
fn test_design_round_trip_then_compile() {
    let json = classified_design().to_json().unwrap();
    let design = Design::from_json(&json).unwrap();
    let result = compile_design(&design, &CompileSettings::default()).unwrap();

    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert!(result.validation.all_valid(), "{:?}", result.validation.messages);

    let model = &result.model;
    assert_eq!(model.panels.len(), 2);
    let total: f64 = model
        .panels
        .iter()
        .map(|p| Polygon::from_ir(&p.vertices).area())
        .sum();
    assert_relative_eq!(total, 480_000.0, epsilon = 1e-6);

    assert_eq!(model.hinges.len(), 1);
    let hinge = &model.hinges[0];
    assert_eq!(hinge.panel_a.as_deref(), Some("panel_0"));
    assert_eq!(hinge.panel_b.as_deref(), Some("panel_1"));

    for panel in &model.panels {
        assert_eq!(panel.uvs.len(), panel.vertices.len());
        for uv in &panel.uvs {
            assert!((-1e-9..=1.0 + 1e-9).contains(&uv.u));
            assert!((-1e-9..=1.0 + 1e-9).contains(&uv.v));
        }
    }

    let reloaded = CompiledModel::from_json(&model.to_json().unwrap()).unwrap();
    assert_eq!(&reloaded, model);

    let svg = model_to_svg(model, design.raster);
    assert!(svg.contains(r#"id="panel_1""#));
    assert!(svg.contains(r#"id="hinge_0""#));
}

#[test]
fn test_flat_coordinates_and_recursive_creases() {
    let json = r#"{
        "raster": {"width": 300, "height": 300},
        "annotations": {
            "cut": [{"points": [0, 0, 300, 0, 300, 300, 0, 300], "closed": true}],
            "crease": [
                {"points": [100, 0, 100, 300]},
                {"id": "fold_b", "points": [[200, 0], [200, 300]]}
            ]
        }
    }"#;
    let design = Design::from_json(json).unwrap();

    let single = compile_design(&design, &CompileSettings::default()).unwrap();
    assert_eq!(single.model.panels.len(), 1);
    assert_eq!(single.warnings.len(), 1);
    assert!(single.validation.all_valid());

    let settings = CompileSettings {
        multi_crease: MultiCreasePolicy::Recursive,
        ..Default::default()
    };
    let recursive = compile_design(&design, &settings).unwrap();
    assert_eq!(recursive.model.panels.len(), 3);
    assert_eq!(recursive.model.hinges.len(), 2);
    // Panels run right to left: the first crease splits off the left third.
    let pairs: Vec<_> = recursive
        .model
        .hinges
        .iter()
        .map(|h| (h.panel_a.as_deref(), h.panel_b.as_deref()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (Some("panel_1"), Some("panel_2")),
            (Some("panel_0"), Some("panel_1")),
        ]
    );
    assert!(recursive.warnings.is_empty(), "{:?}", recursive.warnings);
}

#[test]
fn test_stray_crease_is_reported_not_fatal() {
    let mut strokes = dieline_ir::StrokeSet::new();
    strokes.push(dieline_ir::Stroke::new(
        "crease_0",
        StrokeKind::Crease,
        vec![Point2D::new(300.0, 200.0), Point2D::new(400.0, 250.0)],
        false,
    ));
    let result = compile(&strokes, RasterSize::new(W, H), &Default::default()).unwrap();
    assert_eq!(result.model.panels.len(), 1);
    assert_eq!(result.model.hinges.len(), 1);
    assert_eq!(result.model.hinges[0].connected_panels(), 0);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.validation.invalid, 1);
}
