//! [`RasterBuffer`] backend for [`DynamicImage`].
//!
//! Pixel math runs on 8-bit RGB or RGBA working copies; high bit-depth
//! inputs are narrowed the first time a primitive rewrites them.

use image::{
    DynamicImage, GenericImageView, Pixel, Rgb, RgbImage, Rgba, RgbaImage,
    imageops::{self, FilterType},
};
use imageproc::{
    definitions::Clamp,
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut},
    filter::gaussian_blur_f32,
    map::map_colors,
    rect::Rect,
};

use super::{BlendMode, Extend, Kernel, RasterBuffer, Region, RoundedRect};
use crate::{
    error::BufferError,
    utils::{normalize_alpha_with_max, validate_non_empty_image},
};

impl RasterBuffer for DynamicImage {
    fn decode(bytes: &[u8]) -> Result<Self, BufferError> {
        image::load_from_memory(bytes).map_err(BufferError::Decode)
    }

    fn rasterize(shape: &RoundedRect) -> Result<Self, BufferError> {
        shape.render().map(DynamicImage::ImageRgba8)
    }

    fn width(&self) -> u32 {
        GenericImageView::width(self)
    }

    fn height(&self) -> u32 {
        GenericImageView::height(self)
    }

    fn has_alpha(&self) -> bool {
        self.color().has_alpha()
    }

    fn get_point(&self, x: u32, y: u32) -> Result<Rgba<u8>, BufferError> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return Err(BufferError::PointOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        Ok(self.get_pixel(x, y))
    }

    fn find_trim(&self, threshold: f64, background: Rgb<u8>) -> Result<Region, BufferError> {
        let image = self.to_rgba8();
        let (width, height) = image.dimensions();
        let mut bounds = [width, height, 0, 0]; // [x1, y1, x2, y2]
        let mut found = false;

        for (x, y, pixel) in image.enumerate_pixels() {
            let Rgb(effective) = blend_over_background_impl(*pixel, background);
            let difference = effective
                .iter()
                .zip(background.0)
                .map(|(&value, reference)| (f64::from(value) - f64::from(reference)).abs())
                .fold(0.0, f64::max);

            if difference > threshold {
                update_bounds_impl(&mut bounds, x, y);
                found = true;
            }
        }

        if !found {
            return Err(BufferError::NoContentFound);
        }

        let [x1, y1, x2, y2] = bounds;
        Ok(Region::new(x1, y1, x2 - x1 + 1, y2 - y1 + 1))
    }

    fn extract_area(&mut self, region: Region) -> Result<(), BufferError> {
        let Region {
            left,
            top,
            width,
            height,
        } = region;
        if region.is_empty() {
            return Err(BufferError::EmptyRegion { width, height });
        }

        let (image_width, image_height) = self.dimensions();
        let fits = left.checked_add(width).is_some_and(|right| right <= image_width)
            && top.checked_add(height).is_some_and(|bottom| bottom <= image_height);
        if !fits {
            return Err(BufferError::RegionOutOfBounds {
                left,
                top,
                width,
                height,
                image_width,
                image_height,
            });
        }

        *self = self.crop_imm(left, top, width, height);
        Ok(())
    }

    fn flatten(&mut self, background: Rgb<u8>) -> Result<(), BufferError> {
        if !self.has_alpha() {
            return Ok(());
        }
        let flattened: RgbImage = map_colors(&self.to_rgba8(), |pixel| {
            blend_over_background_impl(pixel, background)
        });
        *self = DynamicImage::ImageRgb8(flattened);
        Ok(())
    }

    fn embed(
        &mut self,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        extend: Extend,
    ) -> Result<(), BufferError> {
        validate_non_empty_image(width, height, "embed")?;
        let value = match extend {
            Extend::Black => u8::MIN,
            Extend::White => u8::MAX,
        };

        *self = if self.has_alpha() {
            let mut canvas = RgbaImage::from_pixel(width, height, Rgba([value; 4]));
            imageops::replace(&mut canvas, &self.to_rgba8(), x, y);
            DynamicImage::ImageRgba8(canvas)
        } else {
            let mut canvas = RgbImage::from_pixel(width, height, Rgb([value; 3]));
            imageops::replace(&mut canvas, &self.to_rgb8(), x, y);
            DynamicImage::ImageRgb8(canvas)
        };
        Ok(())
    }

    fn copy(&self) -> Result<Self, BufferError> {
        Ok(self.clone())
    }

    fn thumbnail(&mut self, width: u32, height: u32) -> Result<(), BufferError> {
        validate_non_empty_image(width, height, "thumbnail")?;
        *self = self.resize(width, height, FilterType::Lanczos3);
        Ok(())
    }

    fn resize_with_vscale(
        &mut self,
        hscale: f64,
        vscale: f64,
        kernel: Kernel,
    ) -> Result<(), BufferError> {
        let valid = |scale: f64| scale.is_finite() && scale > 0.0;
        if !valid(hscale) || !valid(vscale) {
            return Err(BufferError::InvalidParameter(format!(
                "resize scale must be positive, got {hscale}x{vscale}"
            )));
        }

        let (width, height) = self.dimensions();
        let scaled = |size: u32, scale: f64| ((f64::from(size) * scale).round() as u32).max(1);
        *self = self.resize_exact(
            scaled(width, hscale),
            scaled(height, vscale),
            filter_type_impl(kernel),
        );
        Ok(())
    }

    fn gaussian_blur(&mut self, sigma: f64) -> Result<(), BufferError> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(BufferError::InvalidParameter(format!(
                "blur sigma must be positive, got {sigma}"
            )));
        }

        *self = if self.has_alpha() {
            DynamicImage::ImageRgba8(gaussian_blur_f32(&self.to_rgba8(), sigma as f32))
        } else {
            DynamicImage::ImageRgb8(gaussian_blur_f32(&self.to_rgb8(), sigma as f32))
        };
        Ok(())
    }

    fn draw_rect(
        &mut self,
        ink: Rgba<u8>,
        region: Region,
        fill: bool,
    ) -> Result<(), BufferError> {
        let Region {
            left,
            top,
            width,
            height,
        } = region;
        if region.is_empty() {
            return Err(BufferError::EmptyRegion { width, height });
        }
        let rect = Rect::at(left as i32, top as i32).of_size(width, height);

        *self = if self.has_alpha() {
            let mut image = self.to_rgba8();
            if fill {
                draw_filled_rect_mut(&mut image, rect, ink);
            } else {
                draw_hollow_rect_mut(&mut image, rect, ink);
            }
            DynamicImage::ImageRgba8(image)
        } else {
            let mut image = self.to_rgb8();
            let ink = ink.to_rgb();
            if fill {
                draw_filled_rect_mut(&mut image, rect, ink);
            } else {
                draw_hollow_rect_mut(&mut image, rect, ink);
            }
            DynamicImage::ImageRgb8(image)
        };
        Ok(())
    }

    fn add_alpha(&mut self) -> Result<(), BufferError> {
        if !self.has_alpha() {
            *self = DynamicImage::ImageRgba8(self.to_rgba8());
        }
        Ok(())
    }

    fn linear(&mut self, scale: &[f64], offset: &[f64]) -> Result<(), BufferError> {
        let bands = if self.has_alpha() { 4 } else { 3 };
        for actual in [scale.len(), offset.len()] {
            if actual != bands {
                return Err(BufferError::BandMismatch {
                    expected: bands,
                    actual,
                });
            }
        }

        let transform = |channels: &mut [u8]| {
            channels
                .iter_mut()
                .zip(scale.iter().zip(offset))
                .for_each(|(value, (a, b))| {
                    *value = <u8 as Clamp<f32>>::clamp((f64::from(*value) * a + b) as f32);
                });
        };

        *self = if bands == 4 {
            let mut image = self.to_rgba8();
            image.pixels_mut().for_each(|pixel| transform(&mut pixel.0));
            DynamicImage::ImageRgba8(image)
        } else {
            let mut image = self.to_rgb8();
            image.pixels_mut().for_each(|pixel| transform(&mut pixel.0));
            DynamicImage::ImageRgb8(image)
        };
        Ok(())
    }

    fn composite(
        &mut self,
        overlay: &Self,
        mode: BlendMode,
        x: i64,
        y: i64,
    ) -> Result<(), BufferError> {
        let mut base = self.to_rgba8();
        let source = overlay.to_rgba8();

        match mode {
            BlendMode::Over => {
                imageops::overlay(&mut base, &source, x, y);
                // An opaque base stays opaque under "over"
                *self = if self.has_alpha() {
                    DynamicImage::ImageRgba8(base)
                } else {
                    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(base).to_rgb8())
                };
            }
            BlendMode::DestIn => {
                let (source_width, source_height) = source.dimensions();
                for (px, py, pixel) in base.enumerate_pixels_mut() {
                    let sx = i64::from(px) - x;
                    let sy = i64::from(py) - y;
                    let inside = (0..i64::from(source_width)).contains(&sx)
                        && (0..i64::from(source_height)).contains(&sy);
                    let coverage = if inside {
                        source.get_pixel(sx as u32, sy as u32)[3]
                    } else {
                        0
                    };
                    pixel[3] = scale_alpha_impl(pixel[3], coverage);
                }
                *self = DynamicImage::ImageRgba8(base);
            }
        }
        Ok(())
    }
}

fn filter_type_impl(kernel: Kernel) -> FilterType {
    match kernel {
        Kernel::Nearest => FilterType::Nearest,
        Kernel::Linear => FilterType::Triangle,
        Kernel::Cubic => FilterType::CatmullRom,
        Kernel::Lanczos3 => FilterType::Lanczos3,
    }
}

/// Composites a straight-alpha pixel onto an opaque background.
fn blend_over_background_impl(pixel: Rgba<u8>, background: Rgb<u8>) -> Rgb<u8> {
    let Rgba([red, green, blue, alpha]) = pixel;
    let alpha = normalize_alpha_with_max(alpha, f32::from(u8::MAX));
    let mix = |value: u8, reference: u8| {
        <u8 as Clamp<f32>>::clamp(
            f32::from(value) * alpha + f32::from(reference) * (1.0 - alpha),
        )
    };
    let Rgb([bg_red, bg_green, bg_blue]) = background;
    Rgb([mix(red, bg_red), mix(green, bg_green), mix(blue, bg_blue)])
}

/// `alpha * coverage / 255`, rounded.
fn scale_alpha_impl(alpha: u8, coverage: u8) -> u8 {
    ((u16::from(alpha) * u16::from(coverage) + 127) / 255) as u8
}

fn update_bounds_impl(bounds: &mut [u32; 4], x: u32, y: u32) {
    bounds[0] = bounds[0].min(x);
    bounds[1] = bounds[1].min(y);
    bounds[2] = bounds[2].max(x);
    bounds[3] = bounds[3].max(y);
}
