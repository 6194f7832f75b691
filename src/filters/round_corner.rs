use crate::{
    buffer::{BlendMode, RasterBuffer, RoundedRect},
    error::RoundCornerError,
};

/// Makes the pixels outside a rounded rectangle of radii `(rx, ry)` transparent.
///
/// A white rounded rectangle covering the whole image is rasterized and
/// composited with [`BlendMode::DestIn`], so each pixel keeps its color and
/// its alpha is multiplied by the mask coverage. Opaque images gain an alpha
/// channel. Radii of zero leave every pixel unchanged.
///
/// # Errors
///
/// * Rasterization and compositing failures are returned unchanged.
///
/// # Examples
/// ```
/// use image::{DynamicImage, GenericImageView, RgbImage};
/// use imageops_pipeline::round_corner;
///
/// let mut image = DynamicImage::ImageRgb8(RgbImage::new(32, 32));
/// round_corner(&mut image, 8, 8).unwrap();
/// assert_eq!(image.get_pixel(0, 0)[3], 0);
/// assert_eq!(image.get_pixel(16, 16)[3], 255);
/// ```
pub fn round_corner<B: RasterBuffer>(image: &mut B, rx: u32, ry: u32) -> Result<(), RoundCornerError> {
    let (width, height) = (image.width(), image.height());
    log::debug!(target: "filters", "round corner {width}x{height} radius {rx}x{ry}");

    let mask = B::rasterize(&RoundedRect::mask(width, height, rx, ry))?;
    image.composite(&mask, BlendMode::DestIn, 0, 0)?;
    Ok(())
}

/// Trait providing the rounded-corner operation on raster buffers.
pub trait RoundCornerExt {
    /// Masks the image to a rounded rectangle, in place.
    ///
    /// See [`round_corner`].
    ///
    /// # Errors
    ///
    /// * Rasterization and compositing failures are returned unchanged.
    fn round_corner_mut(&mut self, rx: u32, ry: u32) -> Result<&mut Self, RoundCornerError>;
}

impl<B: RasterBuffer> RoundCornerExt for B {
    fn round_corner_mut(&mut self, rx: u32, ry: u32) -> Result<&mut Self, RoundCornerError> {
        round_corner(self, rx, ry)?;
        Ok(self)
    }
}
