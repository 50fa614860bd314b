//! Read-only pixel access for color-based stroke classification.

/// An RGB color sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Narrow capability for reading pixels from a raster snapshot.
///
/// Implementations return `None` for coordinates outside the raster. The
/// classifier never writes through this interface.
pub trait PixelSampler {
    /// Color at integer pixel `(x, y)`.
    fn sample_pixel(&self, x: i64, y: i64) -> Option<Rgb>;
}

impl<T: PixelSampler + ?Sized> PixelSampler for &T {
    fn sample_pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        (**self).sample_pixel(x, y)
    }
}

/// Sampler backed by a closure over a `width` x `height` raster.
pub struct FnSampler<F> {
    width: u32,
    height: u32,
    f: F,
}

impl<F> FnSampler<F>
where
    F: Fn(u32, u32) -> Rgb,
{
    /// Create a sampler; `f` is only called for in-bounds coordinates.
    pub fn new(width: u32, height: u32, f: F) -> Self {
        Self { width, height, f }
    }
}

impl<F> PixelSampler for FnSampler<F>
where
    F: Fn(u32, u32) -> Rgb,
{
    fn sample_pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((self.f)(x as u32, y as u32))
    }
}

#[cfg(feature = "image")]
impl PixelSampler for image::RgbaImage {
    fn sample_pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        if x < 0 || y < 0 {
            return None;
        }
        let px = self.get_pixel_checked(u32::try_from(x).ok()?, u32::try_from(y).ok()?)?;
        Some(Rgb::new(px[0], px[1], px[2]))
    }
}

#[cfg(feature = "image")]
impl PixelSampler for image::RgbImage {
    fn sample_pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        if x < 0 || y < 0 {
            return None;
        }
        let px = self.get_pixel_checked(u32::try_from(x).ok()?, u32::try_from(y).ok()?)?;
        Some(Rgb::new(px[0], px[1], px[2]))
    }
}
