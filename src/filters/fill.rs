use image::{Rgb, Rgba};

use crate::{
    buffer::{BlendMode, Extend, Kernel, RasterBuffer, Region},
    color::resolve_color,
    error::{BufferError, FillError},
    utils::center_offset,
};

/// Gaussian sigma applied to the stretched background in [`FillMode::Blur`].
pub const BLUR_SIGMA: f64 = 50.0;

/// How the area around the image is filled when it is placed on a larger canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillMode {
    /// Canvas extended with black
    Black,
    /// Canvas extended with white
    White,
    /// Canvas filled with a blurred, stretched copy of the image
    Blur,
    /// Canvas painted with an opaque color
    Solid(Rgb<u8>),
}

impl FillMode {
    /// Parses a fill token, case-insensitively.
    ///
    /// Any token other than `black`, `white` and `blur` is resolved as a
    /// color, so unknown tokens become `Solid` black.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "black" => Self::Black,
            "white" => Self::White,
            "blur" => Self::Blur,
            other => Self::Solid(resolve_color(other)),
        }
    }

    /// Color that transparent pixels are flattened against, `None` for blur.
    #[must_use]
    pub const fn flatten_color(&self) -> Option<Rgb<u8>> {
        match *self {
            Self::Black => Some(Rgb([0, 0, 0])),
            Self::White => Some(Rgb([255, 255, 255])),
            Self::Blur => None,
            Self::Solid(color) => Some(color),
        }
    }
}

/// Places the image centered on a `width x height` canvas filled according to `token`.
///
/// See [`fill_with_mode`] for the steps.
///
/// # Errors
///
/// * `FillError::InvalidCanvas` - When `width` or `height` is zero
/// * `FillError::Buffer` - The first primitive failure, unchanged
///
/// # Examples
/// ```
/// use image::{DynamicImage, GenericImageView, RgbImage};
/// use imageops_pipeline::fill;
///
/// let mut image = DynamicImage::ImageRgb8(RgbImage::new(40, 20));
/// fill(&mut image, 50, 50, "cornflowerblue", false).unwrap();
/// assert_eq!(image.dimensions(), (50, 50));
/// ```
pub fn fill<B: RasterBuffer>(
    image: &mut B,
    width: u32,
    height: u32,
    token: &str,
    upscale: bool,
) -> Result<(), FillError> {
    fill_with_mode(image, width, height, FillMode::from_token(token), upscale)
}

/// Places the image centered on a `width x height` canvas filled with `mode`.
///
/// Transparent images are first flattened against the mode's color, except
/// for [`FillMode::Blur`]. `Black` and `White` then extend the canvas around
/// the image without resampling it. `Blur` and `Solid` build a background
/// layer from the image stretched to exactly `width x height`, blurred or
/// painted over, and composite a copy on top. The copy is shrunk to fit the
/// canvas when it is larger than it, or scaled to fit whenever `upscale` is
/// set. Centering offsets truncate toward zero.
///
/// # Errors
///
/// * `FillError::InvalidCanvas` - When `width` or `height` is zero
/// * `FillError::Buffer` - The first primitive failure, unchanged
pub fn fill_with_mode<B: RasterBuffer>(
    image: &mut B,
    width: u32,
    height: u32,
    mode: FillMode,
    upscale: bool,
) -> Result<(), FillError> {
    if width == 0 || height == 0 {
        return Err(FillError::InvalidCanvas { width, height });
    }
    log::debug!(
        target: "filters",
        "fill {}x{} -> {width}x{height} with {mode:?}, upscale {upscale}",
        image.width(),
        image.height()
    );

    if image.has_alpha() {
        if let Some(background) = mode.flatten_color() {
            image.flatten(background)?;
        }
    }

    match mode {
        FillMode::Black => extend_canvas_impl(image, width, height, Extend::Black),
        FillMode::White => extend_canvas_impl(image, width, height, Extend::White),
        FillMode::Blur => layer_over_background_impl(image, width, height, upscale, |canvas| {
            canvas.gaussian_blur(BLUR_SIGMA)
        }),
        FillMode::Solid(Rgb([red, green, blue])) => {
            layer_over_background_impl(image, width, height, upscale, |canvas| {
                canvas.draw_rect(
                    Rgba([red, green, blue, u8::MAX]),
                    Region::new(0, 0, width, height),
                    true,
                )
            })
        }
    }
}

fn extend_canvas_impl<B: RasterBuffer>(
    image: &mut B,
    width: u32,
    height: u32,
    extend: Extend,
) -> Result<(), FillError> {
    let x = center_offset(width, image.width());
    let y = center_offset(height, image.height());
    image.embed(x, y, width, height, extend)?;
    Ok(())
}

/// Stretches the image into a background layer, lets `paint` finish it, and
/// composites a fitted copy of the original on top.
fn layer_over_background_impl<B, F>(
    image: &mut B,
    width: u32,
    height: u32,
    upscale: bool,
    paint: F,
) -> Result<(), FillError>
where
    B: RasterBuffer,
    F: FnOnce(&mut B) -> Result<(), BufferError>,
{
    let mut foreground = image.copy()?;
    if upscale || width < foreground.width() || height < foreground.height() {
        foreground.thumbnail(width, height)?;
    }

    // Solid fills overwrite the stretched pixels, but the stretch also sizes the canvas
    image.resize_with_vscale(
        f64::from(width) / f64::from(image.width()),
        f64::from(height) / f64::from(image.height()),
        Kernel::Linear,
    )?;
    paint(image)?;

    let x = center_offset(width, foreground.width());
    let y = center_offset(height, foreground.height());
    image.composite(&foreground, BlendMode::Over, x, y)?;
    Ok(())
}

/// Trait providing the fill-to-canvas operation on raster buffers.
pub trait FillExt {
    /// Places the image centered on a `width x height` canvas, in place.
    ///
    /// See [`fill`].
    ///
    /// # Errors
    ///
    /// * `FillError::InvalidCanvas` - When `width` or `height` is zero
    /// * `FillError::Buffer` - The first primitive failure, unchanged
    fn fill_canvas_mut(
        &mut self,
        width: u32,
        height: u32,
        token: &str,
        upscale: bool,
    ) -> Result<&mut Self, FillError>;
}

impl<B: RasterBuffer> FillExt for B {
    fn fill_canvas_mut(
        &mut self,
        width: u32,
        height: u32,
        token: &str,
        upscale: bool,
    ) -> Result<&mut Self, FillError> {
        fill(self, width, height, token, upscale)?;
        Ok(self)
    }
}
