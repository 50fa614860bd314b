//! Emboss strokes carried into the model as decorative regions.

use log::debug;

use dieline_ir::{EmbossKind, EmbossRegion, Stroke};

/// One region per emboss stroke with at least one point, ids `emboss_<n>`.
pub fn extract_emboss_regions(strokes: &[Stroke], depth_mm: f64, kind: EmbossKind) -> Vec<EmbossRegion> {
    let regions: Vec<EmbossRegion> = strokes
        .iter()
        .filter(|s| !s.points.is_empty())
        .enumerate()
        .map(|(i, s)| EmbossRegion {
            id: format!("emboss_{i}"),
            path: s.points.clone(),
            depth_mm,
            kind,
        })
        .collect();
    debug!("extracted {} emboss region(s)", regions.len());
    regions
}
