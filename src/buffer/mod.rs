//! The raster primitive capability that every filter is written against.
//!
//! Filters never touch pixels directly. They call the primitives of
//! [`RasterBuffer`] in a fixed order with computed parameters, so any imaging
//! backend that implements the trait can run them. A backend for
//! [`image::DynamicImage`] is provided in [`dynamic`].

mod dynamic;
mod shape;

pub use shape::RoundedRect;

use image::{Rgb, Rgba};

use crate::error::BufferError;

/// Rectangular area of an image in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    #[must_use]
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Value used for the pixels an [`RasterBuffer::embed`] adds around the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extend {
    /// Every band set to zero
    Black,
    /// Every band set to its maximum
    White,
}

/// Resampling kernel for [`RasterBuffer::resize_with_vscale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kernel {
    Nearest,
    /// Bilinear; does not ring on hard edges
    Linear,
    Cubic,
    Lanczos3,
}

/// Porter-Duff operator used by [`RasterBuffer::composite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendMode {
    /// Source over destination
    Over,
    /// Destination kept where the source is opaque: `alpha = dst_alpha * src_alpha`
    DestIn,
}

/// Primitive operations on a mutable decoded raster.
///
/// All mutating primitives work in place; a primitive that fails leaves the
/// buffer as it was. Temporary buffers are released by `Drop`.
///
/// Implemented for [`image::DynamicImage`], which narrows high bit-depth
/// images to 8-bit RGB or RGBA as primitives rewrite them.
pub trait RasterBuffer: Sized {
    /// Decodes an encoded image (PNG, JPEG, ...) into a new buffer.
    fn decode(bytes: &[u8]) -> Result<Self, BufferError>;

    /// Rasterizes a vector shape into a new buffer of `shape.width x shape.height`.
    fn rasterize(shape: &RoundedRect) -> Result<Self, BufferError>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn has_alpha(&self) -> bool;

    /// Samples the pixel at `(x, y)`. Opaque images report alpha 255.
    fn get_point(&self, x: u32, y: u32) -> Result<Rgba<u8>, BufferError>;

    /// Bounding box of the pixels whose difference from `background` exceeds
    /// `threshold` on any band, scanning inward from all four edges.
    fn find_trim(&self, threshold: f64, background: Rgb<u8>) -> Result<Region, BufferError>;

    /// Crops the buffer to `region`.
    fn extract_area(&mut self, region: Region) -> Result<(), BufferError>;

    /// Composites the alpha channel onto an opaque `background` and drops it.
    fn flatten(&mut self, background: Rgb<u8>) -> Result<(), BufferError>;

    /// Places the image at `(x, y)` on a `width x height` canvas filled with
    /// `extend`. Offsets may be negative; the image is clipped to the canvas.
    fn embed(
        &mut self,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        extend: Extend,
    ) -> Result<(), BufferError>;

    fn copy(&self) -> Result<Self, BufferError>;

    /// Resizes to fit inside `width x height` keeping the aspect ratio.
    fn thumbnail(&mut self, width: u32, height: u32) -> Result<(), BufferError>;

    /// Resizes by independent horizontal and vertical factors.
    fn resize_with_vscale(
        &mut self,
        hscale: f64,
        vscale: f64,
        kernel: Kernel,
    ) -> Result<(), BufferError>;

    fn gaussian_blur(&mut self, sigma: f64) -> Result<(), BufferError>;

    /// Draws a rectangle outline, or a filled rectangle when `fill` is set.
    fn draw_rect(&mut self, ink: Rgba<u8>, region: Region, fill: bool)
    -> Result<(), BufferError>;

    /// Appends an opaque alpha channel; no-op when one is already present.
    fn add_alpha(&mut self) -> Result<(), BufferError>;

    /// Per-band `out = in * scale[band] + offset[band]`.
    fn linear(&mut self, scale: &[f64], offset: &[f64]) -> Result<(), BufferError>;

    /// Composites `overlay` onto the buffer with its top-left corner at `(x, y)`.
    fn composite(
        &mut self,
        overlay: &Self,
        mode: BlendMode,
        x: i64,
        y: i64,
    ) -> Result<(), BufferError>;
}
