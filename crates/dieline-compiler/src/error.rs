//! Error types for the dieline compiler.

use thiserror::Error;

/// Errors that can occur during compilation.
///
/// Geometric ambiguity is never an error: those cases degrade to a coarser
/// result and are reported as warnings. Only inputs with no sensible fallback
/// end up here.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Raster has a zero dimension.
    #[error("invalid raster size {0}x{1}")]
    InvalidRaster(u32, u32),

    /// Invalid compile settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Curve fitting needs at least two points.
    #[error("cannot fit a curve through {0} point(s); at least 2 are required")]
    TooFewPoints(usize),

    /// Curve fitting needs at least one segment per span.
    #[error("segments per span must be at least 1")]
    ZeroSegments,

    /// Stroke records could not be read.
    #[error(transparent)]
    Ir(#[from] dieline_ir::IrError),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;
