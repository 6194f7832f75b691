//! # imageops-pipeline
//!
//! In-place raster transforms for image delivery pipelines.
//!
//! Every filter mutates a decoded image through the [`RasterBuffer`] trait,
//! which is implemented for [`image::DynamicImage`]:
//!
//! - **Trim**: Removes a uniform border sampled from a corner pixel
//! - **Fill**: Centers the image on a larger canvas filled with black, white,
//!   a solid color or a blurred stretch of the image itself
//! - **Watermark**: Composites a loaded overlay at an offset with optional opacity
//! - **Rounded corners**: Masks the image to a rounded rectangle
//! - **Color tokens**: Resolves named and hex colors, falling back to black
//!
//! ## Example Usage
//!
//! ```no_run
//! use image::{DynamicImage, RgbImage};
//! use imageops_pipeline::{Corner, FillExt, RoundCornerExt, TrimExt, WatermarkExt};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = |path: &str| std::fs::read(path);
//! let mut image = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
//!
//! image
//!     .trim_mut(Corner::TopLeft, 10)?
//!     .fill_canvas_mut(800, 800, "blur", false)?
//!     .watermark_mut(&loader, &["logo.png", "-20", "-20", "60"])?
//!     .round_corner_mut(24, 24)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `serde`: Enables serialization support for the parameter types (optional)

mod buffer;
mod color;
mod error;
mod filters;
mod utils;

#[cfg(test)]
mod test_utils;

pub use buffer::{BlendMode, Extend, Kernel, RasterBuffer, Region, RoundedRect};
pub use color::{FALLBACK_COLOR, lookup_named_color, parse_hex_color, resolve_color};
pub use error::{BoxError, BufferError, FillError, RoundCornerError, TrimError, WatermarkError};
pub use filters::fill::{BLUR_SIGMA, FillExt, FillMode, fill, fill_with_mode};
pub use filters::round_corner::{RoundCornerExt, round_corner};
pub use filters::trim::{Corner, MIN_TRIM_TOLERANCE, TrimExt, trim};
pub use filters::watermark::{
    ImageLoader, Offset, WatermarkExt, WatermarkSpec, apply_watermark, unescape_reference,
    watermark,
};
