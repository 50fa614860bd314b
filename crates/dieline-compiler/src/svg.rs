//! SVG previews of annotated strokes and compiled models.
//!
//! Strokes are drawn with their kind's line style. Compiled models draw
//! panel outlines and holes in the cut style, hinges in the crease style and
//! emboss regions in the emboss style, all in raster coordinates.

use std::fmt::{self, Write};

use dieline_ir::{CompiledModel, Point2D, RasterSize, StrokeKind, StrokeSet};

fn header(w: &mut impl Write, raster: RasterSize) -> fmt::Result {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#)?;
    writeln!(
        w,
        r#"<svg width="{0}" height="{1}" viewBox="0 0 {0} {1}" version="1.1" xmlns="http://www.w3.org/2000/svg">"#,
        raster.width, raster.height
    )
}

fn style_attrs(kind: StrokeKind) -> String {
    let style = kind.style();
    let mut attrs = format!(
        r#"fill="none" stroke="{}" stroke-width="{}""#,
        style.hex(),
        style.width
    );
    if !style.dash.is_empty() {
        let dash: Vec<String> = style.dash.iter().map(|d| d.to_string()).collect();
        attrs.push_str(&format!(r#" stroke-dasharray="{}""#, dash.join(",")));
    }
    attrs
}

fn path(w: &mut impl Write, id: &str, points: &[Point2D], closed: bool, attrs: &str) -> fmt::Result {
    if points.is_empty() {
        return Ok(());
    }
    write!(w, r#"<path id="{id}" {attrs} d=""#)?;
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { "L" };
        write!(w, "{cmd} {},{} ", p.x, p.y)?;
    }
    if closed {
        write!(w, "Z")?;
    }
    writeln!(w, r#""/>"#)
}

/// Write an SVG of every stroke in `strokes`, one layer per kind.
pub fn write_strokes(w: &mut impl Write, strokes: &StrokeSet, raster: RasterSize) -> fmt::Result {
    header(w, raster)?;
    for kind in StrokeKind::ALL {
        let attrs = style_attrs(kind);
        writeln!(w, r#"<g id="{kind}">"#)?;
        for stroke in strokes.of_kind(kind) {
            path(w, &stroke.id, &stroke.points, stroke.closed, &attrs)?;
        }
        writeln!(w, "</g>")?;
    }
    writeln!(w, "</svg>")
}

/// Write an SVG of a compiled model's panels, hinges and emboss regions.
pub fn write_model(w: &mut impl Write, model: &CompiledModel, raster: RasterSize) -> fmt::Result {
    header(w, raster)?;

    let cut = style_attrs(StrokeKind::Cut);
    writeln!(w, r#"<g id="panels">"#)?;
    for panel in &model.panels {
        path(w, &panel.id, &panel.raster_vertices(), true, &cut)?;
        for (i, hole) in panel.holes.iter().enumerate() {
            let ring: Vec<Point2D> = hole
                .iter()
                .map(|v| Point2D::new(v.x + panel.center.x, v.y + panel.center.y))
                .collect();
            path(w, &format!("{}_hole_{i}", panel.id), &ring, true, &cut)?;
        }
    }
    writeln!(w, "</g>")?;

    let crease = style_attrs(StrokeKind::Crease);
    writeln!(w, r#"<g id="hinges">"#)?;
    for hinge in &model.hinges {
        path(w, &hinge.id, &[hinge.start, hinge.end], false, &crease)?;
    }
    writeln!(w, "</g>")?;

    let emboss = style_attrs(StrokeKind::Emboss);
    writeln!(w, r#"<g id="emboss">"#)?;
    for region in &model.emboss_regions {
        path(w, &region.id, &region.path, false, &emboss)?;
    }
    writeln!(w, "</g>")?;
    writeln!(w, "</svg>")
}

/// [`write_strokes`] into a new string.
pub fn strokes_to_svg(strokes: &StrokeSet, raster: RasterSize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_strokes(&mut out, strokes, raster);
    out
}

/// [`write_model`] into a new string.
pub fn model_to_svg(model: &CompiledModel, raster: RasterSize) -> String {
    let mut out = String::new();
    let _ = write_model(&mut out, model, raster);
    out
}
