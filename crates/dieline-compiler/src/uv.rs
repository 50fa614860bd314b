//! Texture coordinates for panel vertices.

use dieline_ir::{Panel, Point2D, RasterSize, Uv};

use crate::error::{CompileError, Result};

/// Map panel-local vertices to texture coordinates over the source raster.
///
/// Each vertex is translated back by `center`; then `u = x / width` and
/// `v = 1 - y / height`, since raster rows grow downward and texture rows
/// grow upward. Vertices outside the raster map outside `[0, 1]` unclamped.
pub fn map_uv(vertices: &[Point2D], center: Point2D, raster: RasterSize) -> Result<Vec<Uv>> {
    if raster.is_empty() {
        return Err(CompileError::InvalidRaster(raster.width, raster.height));
    }
    let (w, h) = (raster.width as f64, raster.height as f64);
    Ok(vertices
        .iter()
        .map(|p| Uv {
            u: (p.x + center.x) / w,
            v: 1.0 - (p.y + center.y) / h,
        })
        .collect())
}

/// Fill in `uvs` for each panel from its own source raster.
pub fn assign_uvs(panels: &mut [Panel]) -> Result<()> {
    for panel in panels {
        panel.uvs = map_uv(&panel.vertices, panel.center, panel.source_raster_size)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_corners() {
        let raster = RasterSize::new(800, 600);
        let center = Point2D::new(400.0, 300.0);
        let local = [Point2D::new(-400.0, -300.0), Point2D::new(400.0, 300.0)];
        let uvs = map_uv(&local, center, raster).unwrap();
        assert_relative_eq!(uvs[0].u, 0.0);
        assert_relative_eq!(uvs[0].v, 1.0);
        assert_relative_eq!(uvs[1].u, 1.0);
        assert_relative_eq!(uvs[1].v, 0.0);
    }

    #[test]
    fn test_outside_raster_is_not_clamped() {
        let uvs = map_uv(
            &[Point2D::new(-10.0, 110.0)],
            Point2D::new(0.0, 0.0),
            RasterSize::new(100, 100),
        )
        .unwrap();
        assert_relative_eq!(uvs[0].u, -0.1);
        assert_relative_eq!(uvs[0].v, -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_raster_rejected() {
        let err = map_uv(&[], Point2D::default(), RasterSize::new(0, 10)).unwrap_err();
        assert!(matches!(err, CompileError::InvalidRaster(0, 10)));
    }
}
