use image::Rgb;

use crate::{buffer::RasterBuffer, error::TrimError};

/// Smallest tolerance accepted by [`trim`]; zero would demand pixel-perfect
/// equality, which compressed images never have.
pub const MIN_TRIM_TOLERANCE: u32 = 1;

/// Corner whose pixel is taken as the background color to trim away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Corner {
    #[default]
    TopLeft,
    BottomRight,
}

impl Corner {
    /// `"bottom-right"` selects [`Corner::BottomRight`]; every other token
    /// selects [`Corner::TopLeft`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token == "bottom-right" {
            Self::BottomRight
        } else {
            Self::TopLeft
        }
    }

    /// Pixel coordinates of this corner in a `width x height` image.
    #[must_use]
    pub const fn point(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Self::TopLeft => (0, 0),
            Self::BottomRight => (width.saturating_sub(1), height.saturating_sub(1)),
        }
    }
}

/// Removes the uniform border whose color matches the pixel at `corner`.
///
/// Pixels differing from the sampled color by more than `tolerance` on any
/// band count as content; the buffer is cropped to their bounding box.
/// A tolerance of 0 is raised to [`MIN_TRIM_TOLERANCE`].
///
/// # Errors
///
/// * Sampling, bounding-box detection and cropping failures are returned
///   unchanged. A uniform image has no content and fails rather than being
///   left untouched.
///
/// # Examples
/// ```
/// use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
/// use imageops_pipeline::{Corner, trim};
///
/// let mut image = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
/// image.put_pixel(3, 4, Rgb([0, 0, 0]));
/// let mut image = DynamicImage::ImageRgb8(image);
///
/// trim(&mut image, Corner::TopLeft, 10).unwrap();
/// assert_eq!(image.dimensions(), (1, 1));
/// ```
pub fn trim<B: RasterBuffer>(image: &mut B, corner: Corner, tolerance: u32) -> Result<(), TrimError> {
    let tolerance = tolerance.max(MIN_TRIM_TOLERANCE);
    let (x, y) = corner.point(image.width(), image.height());

    let sample = image.get_point(x, y)?;
    let background = Rgb([sample[0], sample[1], sample[2]]);
    let region = image.find_trim(f64::from(tolerance), background)?;
    log::debug!(
        target: "filters",
        "trim {corner:?} background {background:?} tolerance {tolerance} -> {region:?}"
    );

    image.extract_area(region)?;
    Ok(())
}

/// Trait providing the trim operation on raster buffers.
pub trait TrimExt {
    /// Removes the uniform border matching the pixel at `corner`, in place.
    ///
    /// See [`trim`].
    ///
    /// # Errors
    ///
    /// * Returns the first primitive failure, see [`trim`].
    fn trim_mut(&mut self, corner: Corner, tolerance: u32) -> Result<&mut Self, TrimError>;
}

impl<B: RasterBuffer> TrimExt for B {
    fn trim_mut(&mut self, corner: Corner, tolerance: u32) -> Result<&mut Self, TrimError> {
        trim(self, corner, tolerance)?;
        Ok(self)
    }
}
