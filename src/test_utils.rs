//! Shared fixtures for unit tests.

use std::{
    cell::{Cell, RefCell},
    io::Cursor,
};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba};
use itertools::iproduct;

use crate::{
    buffer::{BlendMode, Extend, Kernel, RasterBuffer, Region, RoundedRect},
    error::BufferError,
};

/// 2x2 RGB image with distinct pixels.
pub fn create_test_rgb_image() -> RgbImage {
    let mut image = RgbImage::new(2, 2);
    image.put_pixel(0, 0, Rgb([200, 150, 100]));
    image.put_pixel(1, 0, Rgb([50, 100, 150]));
    image.put_pixel(0, 1, Rgb([25, 75, 125]));
    image.put_pixel(1, 1, Rgb([10, 20, 30]));
    image
}

/// White image with a black block at `(left, top, width, height)`.
pub fn create_framed_rgb_image(width: u32, height: u32, content: (u32, u32, u32, u32)) -> RgbImage {
    let (left, top, content_width, content_height) = content;
    let mut image = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for (x, y) in iproduct!(left..left + content_width, top..top + content_height) {
        image.put_pixel(x, y, Rgb([0, 0, 0]));
    }
    image
}

/// PNG encoding of `image`.
pub fn encode_png(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Primitive call observed by a [`RecordingBuffer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Decode,
    Rasterize(RoundedRect),
    GetPoint(u32, u32),
    FindTrim(f64, Rgb<u8>),
    ExtractArea(Region),
    Flatten(Rgb<u8>),
    Embed(i64, i64, u32, u32, Extend),
    Copy,
    Thumbnail(u32, u32),
    ResizeWithVscale(f64, f64, Kernel),
    GaussianBlur(f64),
    DrawRect(Rgba<u8>, Region, bool),
    AddAlpha,
    Linear(Vec<f64>, Vec<f64>),
    Composite {
        overlay: &'static str,
        mode: BlendMode,
        x: i64,
        y: i64,
    },
    Release,
}

thread_local! {
    static CALLS: RefCell<Vec<(&'static str, Call)>> = const { RefCell::new(Vec::new()) };
    static FAIL_ON: Cell<Option<&'static str>> = const { Cell::new(None) };
}

fn record(label: &'static str, call: Call) {
    // Buffers dropped during thread teardown have nowhere to log
    let _ = CALLS.try_with(|calls| calls.borrow_mut().push((label, call)));
}

/// Makes every later call to `primitive` on this thread fail, on any buffer.
///
/// Cleared by [`RecordingBuffer::new`].
pub fn fail_on(primitive: &'static str) {
    FAIL_ON.with(|fail| fail.set(Some(primitive)));
}

fn injected_failure(primitive: &'static str) -> Result<(), BufferError> {
    if FAIL_ON.with(Cell::get) == Some(primitive) {
        Err(BufferError::InvalidParameter(format!("injected {primitive} failure")))
    } else {
        Ok(())
    }
}

/// Drains the calls recorded on this thread, labelled by buffer.
pub fn take_calls() -> Vec<(&'static str, Call)> {
    CALLS.with(|calls| calls.borrow_mut().drain(..).collect())
}

/// Calls recorded against the buffer labelled `label`.
pub fn calls_on(calls: &[(&'static str, Call)], label: &str) -> Vec<Call> {
    calls
        .iter()
        .filter(|(owner, _)| *owner == label)
        .map(|(_, call)| call.clone())
        .collect()
}

/// Geometry-only buffer that records every primitive call.
///
/// The original buffer is labelled `"image"`; copies are `"copy"`, decoded
/// buffers `"overlay"` and rasterized ones `"mask"`.
#[derive(Debug)]
pub struct RecordingBuffer {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub alpha: bool,
    pub point: Rgba<u8>,
    pub trim_region: Option<Region>,
}

impl RecordingBuffer {
    /// Creates the buffer under test and clears this thread's call log and
    /// injected failure.
    pub fn new(width: u32, height: u32, alpha: bool) -> Self {
        take_calls();
        FAIL_ON.with(|fail| fail.set(None));
        Self::labelled("image", width, height, alpha)
    }

    fn labelled(label: &'static str, width: u32, height: u32, alpha: bool) -> Self {
        Self {
            label,
            width,
            height,
            alpha,
            point: Rgba([255, 255, 255, 255]),
            trim_region: None,
        }
    }

    fn record(&self, call: Call) {
        record(self.label, call);
    }
}

impl Drop for RecordingBuffer {
    fn drop(&mut self) {
        self.record(Call::Release);
    }
}

impl RasterBuffer for RecordingBuffer {
    /// Accepts `b"WxH"` or `b"WxHa"` (with alpha).
    fn decode(bytes: &[u8]) -> Result<Self, BufferError> {
        record("overlay", Call::Decode);
        injected_failure("decode")?;
        let text = std::str::from_utf8(bytes)
            .map_err(|e| BufferError::InvalidParameter(e.to_string()))?;
        let (text, alpha) = match text.strip_suffix('a') {
            Some(rest) => (rest, true),
            None => (text, false),
        };
        let (width, height) = text
            .split_once('x')
            .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
            .ok_or_else(|| BufferError::InvalidParameter(format!("bad fixture {text:?}")))?;
        Ok(Self::labelled("overlay", width, height, alpha))
    }

    fn rasterize(shape: &RoundedRect) -> Result<Self, BufferError> {
        record("mask", Call::Rasterize(*shape));
        injected_failure("rasterize")?;
        Ok(Self::labelled("mask", shape.width, shape.height, true))
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn has_alpha(&self) -> bool {
        self.alpha
    }

    fn get_point(&self, x: u32, y: u32) -> Result<Rgba<u8>, BufferError> {
        self.record(Call::GetPoint(x, y));
        injected_failure("get_point")?;
        Ok(self.point)
    }

    fn find_trim(&self, threshold: f64, background: Rgb<u8>) -> Result<Region, BufferError> {
        self.record(Call::FindTrim(threshold, background));
        self.trim_region.ok_or(BufferError::NoContentFound)
    }

    fn extract_area(&mut self, region: Region) -> Result<(), BufferError> {
        self.record(Call::ExtractArea(region));
        injected_failure("extract_area")?;
        self.width = region.width;
        self.height = region.height;
        Ok(())
    }

    fn flatten(&mut self, background: Rgb<u8>) -> Result<(), BufferError> {
        self.record(Call::Flatten(background));
        injected_failure("flatten")?;
        self.alpha = false;
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
        self.record(Call::Embed(x, y, width, height, extend));
        injected_failure("embed")?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn copy(&self) -> Result<Self, BufferError> {
        self.record(Call::Copy);
        injected_failure("copy")?;
        Ok(Self::labelled("copy", self.width, self.height, self.alpha))
    }

    fn thumbnail(&mut self, width: u32, height: u32) -> Result<(), BufferError> {
        self.record(Call::Thumbnail(width, height));
        injected_failure("thumbnail")?;
        let ratio = f64::min(
            f64::from(width) / f64::from(self.width),
            f64::from(height) / f64::from(self.height),
        );
        self.width = ((f64::from(self.width) * ratio).round() as u32).max(1);
        self.height = ((f64::from(self.height) * ratio).round() as u32).max(1);
        Ok(())
    }

    fn resize_with_vscale(
        &mut self,
        hscale: f64,
        vscale: f64,
        kernel: Kernel,
    ) -> Result<(), BufferError> {
        self.record(Call::ResizeWithVscale(hscale, vscale, kernel));
        injected_failure("resize_with_vscale")?;
        self.width = (f64::from(self.width) * hscale).round() as u32;
        self.height = (f64::from(self.height) * vscale).round() as u32;
        Ok(())
    }

    fn gaussian_blur(&mut self, sigma: f64) -> Result<(), BufferError> {
        self.record(Call::GaussianBlur(sigma));
        injected_failure("gaussian_blur")?;
        Ok(())
    }

    fn draw_rect(
        &mut self,
        ink: Rgba<u8>,
        region: Region,
        fill: bool,
    ) -> Result<(), BufferError> {
        self.record(Call::DrawRect(ink, region, fill));
        injected_failure("draw_rect")?;
        Ok(())
    }

    fn add_alpha(&mut self) -> Result<(), BufferError> {
        self.record(Call::AddAlpha);
        injected_failure("add_alpha")?;
        self.alpha = true;
        Ok(())
    }

    fn linear(&mut self, scale: &[f64], offset: &[f64]) -> Result<(), BufferError> {
        self.record(Call::Linear(scale.to_vec(), offset.to_vec()));
        injected_failure("linear")?;
        Ok(())
    }

    fn composite(
        &mut self,
        overlay: &Self,
        mode: BlendMode,
        x: i64,
        y: i64,
    ) -> Result<(), BufferError> {
        self.record(Call::Composite {
            overlay: overlay.label,
            mode,
            x,
            y,
        });
        injected_failure("composite")?;
        if mode == BlendMode::DestIn {
            self.alpha = true;
        }
        Ok(())
    }
}
