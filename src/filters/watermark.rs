use std::borrow::Cow;

use crate::{
    buffer::{BlendMode, RasterBuffer},
    error::{BoxError, WatermarkError},
    utils::center_offset,
};

/// Fetches the encoded bytes of an image by reference (path, URL, key, ...).
///
/// Implemented for every `Fn(&str) -> Result<Vec<u8>, E>` closure whose error
/// converts into [`BoxError`], so `|path: &str| std::fs::read(path)` is a loader.
pub trait ImageLoader {
    fn load(&self, reference: &str) -> Result<Vec<u8>, BoxError>;
}

impl<F, E> ImageLoader for F
where
    F: Fn(&str) -> Result<Vec<u8>, E>,
    E: Into<BoxError>,
{
    fn load(&self, reference: &str) -> Result<Vec<u8>, BoxError> {
        self(reference).map_err(Into::into)
    }
}

/// Position of the watermark along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Offset {
    /// Centered on the image
    Center,
    /// Pixels from the leading edge; negative counts from the trailing edge
    Pixels(i64),
}

impl Offset {
    /// `"center"` or an integer; anything unparseable is `Pixels(0)`.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        if token == "center" {
            return Self::Center;
        }
        Self::Pixels(token.parse().unwrap_or_else(|_| {
            log::debug!(target: "filters", "unparseable watermark offset {token:?}, using 0");
            0
        }))
    }

    /// Leading-edge coordinate of an `overlay_extent` wide overlay on an
    /// `extent` wide image.
    ///
    /// A negative result is shifted by `extent - overlay_extent`, so `-10`
    /// leaves 10 pixels between the overlay and the trailing edge. The shift
    /// saturates at `i64::MIN`.
    #[must_use]
    pub fn resolve(self, extent: u32, overlay_extent: u32) -> i64 {
        let position = match self {
            Self::Center => center_offset(extent, overlay_extent),
            Self::Pixels(pixels) => pixels,
        };
        if position < 0 {
            position.saturating_add(i64::from(extent) - i64::from(overlay_extent))
        } else {
            position
        }
    }
}

/// Parsed watermark arguments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatermarkSpec {
    /// Reference handed to the [`ImageLoader`], already unescaped
    pub image: String,
    pub x: Offset,
    pub y: Offset,
    /// Opacity multiplier (percentage / 100); `None` leaves the overlay as is
    pub alpha: Option<f64>,
}

impl WatermarkSpec {
    /// Parses `[image, x, y, alpha_percent?]`.
    ///
    /// Returns `None` when fewer than three arguments are given. Parsing is
    /// otherwise lenient: an image reference that cannot be unescaped is used
    /// raw, and an unparseable alpha percentage counts as 0. Alpha is not
    /// clamped.
    #[must_use]
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Option<Self> {
        let [image, x, y, rest @ ..] = args else {
            return None;
        };

        let alpha = rest.first().map(|percent| {
            let percent = percent.as_ref();
            percent.parse::<f64>().unwrap_or_else(|_| {
                log::debug!(target: "filters", "unparseable watermark alpha {percent:?}, using 0");
                0.0
            }) / 100.0
        });

        Some(Self {
            image: unescape_reference(image.as_ref()).into_owned(),
            x: Offset::parse(x.as_ref()),
            y: Offset::parse(y.as_ref()),
            alpha,
        })
    }
}

/// Query-unescapes an image reference (`%XX` sequences, `+` as space).
///
/// The raw reference is returned when any `%` is not followed by two hex
/// digits or the decoded bytes are not UTF-8.
#[must_use]
pub fn unescape_reference(raw: &str) -> Cow<'_, str> {
    let bytes = raw.as_bytes();
    let malformed = bytes.iter().enumerate().any(|(index, &byte)| {
        byte == b'%'
            && !bytes
                .get(index + 1..index + 3)
                .is_some_and(|digits| digits.iter().all(u8::is_ascii_hexdigit))
    });
    if malformed {
        log::trace!(target: "filters", "malformed escape in {raw:?}, using it raw");
        return Cow::Borrowed(raw);
    }

    match urlencoding::decode(&raw.replace('+', " ")) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Borrowed(raw),
    }
}

/// Composites a loaded image onto `image` as a watermark.
///
/// `args` is `[image, x, y, alpha_percent?]`; with fewer than three
/// arguments nothing happens. `x` and `y` are `"center"` or pixel offsets,
/// negative offsets counting from the right and bottom edges. An alpha
/// percentage attenuates the overlay's opacity without changing its colors.
///
/// # Errors
///
/// * `WatermarkError::Load` - When the loader fails
/// * `WatermarkError::Buffer` - When decoding or compositing the overlay fails
///
/// # Examples
/// ```
/// use image::{DynamicImage, RgbImage};
/// use imageops_pipeline::{BoxError, watermark};
///
/// # fn encoded_logo() -> Vec<u8> {
/// #     let mut bytes = Vec::new();
/// #     DynamicImage::ImageRgb8(RgbImage::new(4, 4))
/// #         .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
/// #         .unwrap();
/// #     bytes
/// # }
/// let loader = |_reference: &str| -> Result<Vec<u8>, BoxError> { Ok(encoded_logo()) };
/// let mut image = DynamicImage::ImageRgb8(RgbImage::new(20, 20));
///
/// watermark(&mut image, &loader, &["logo.png", "-2", "center", "50"]).unwrap();
/// ```
pub fn watermark<B, L, S>(image: &mut B, loader: &L, args: &[S]) -> Result<(), WatermarkError>
where
    B: RasterBuffer,
    L: ImageLoader + ?Sized,
    S: AsRef<str>,
{
    match WatermarkSpec::from_args(args) {
        Some(spec) => apply_watermark(image, loader, &spec),
        None => {
            log::debug!(target: "filters", "watermark needs 3 arguments, got {}", args.len());
            Ok(())
        }
    }
}

/// Composites the watermark described by `spec` onto `image`.
///
/// # Errors
///
/// * `WatermarkError::Load` - When the loader fails
/// * `WatermarkError::Buffer` - When decoding or compositing the overlay fails
pub fn apply_watermark<B, L>(
    image: &mut B,
    loader: &L,
    spec: &WatermarkSpec,
) -> Result<(), WatermarkError>
where
    B: RasterBuffer,
    L: ImageLoader + ?Sized,
{
    let bytes = loader
        .load(&spec.image)
        .map_err(|source| WatermarkError::Load {
            reference: spec.image.clone(),
            source,
        })?;
    let mut overlay = B::decode(&bytes)?;

    let x = spec.x.resolve(image.width(), overlay.width());
    let y = spec.y.resolve(image.height(), overlay.height());
    log::debug!(
        target: "filters",
        "watermark {:?} {}x{} at ({x}, {y}) alpha {:?}",
        spec.image,
        overlay.width(),
        overlay.height(),
        spec.alpha
    );

    if let Some(alpha) = spec.alpha {
        overlay.add_alpha()?;
        overlay.linear(&[1.0, 1.0, 1.0, alpha], &[0.0; 4])?;
    }

    image.composite(&overlay, BlendMode::Over, x, y)?;
    Ok(())
}

/// Trait providing the watermark operation on raster buffers.
pub trait WatermarkExt {
    /// Composites a loaded image onto this one, in place.
    ///
    /// See [`watermark`].
    ///
    /// # Errors
    ///
    /// * `WatermarkError::Load` - When the loader fails
    /// * `WatermarkError::Buffer` - When decoding or compositing the overlay fails
    fn watermark_mut<L, S>(&mut self, loader: &L, args: &[S]) -> Result<&mut Self, WatermarkError>
    where
        L: ImageLoader + ?Sized,
        S: AsRef<str>;
}

impl<B: RasterBuffer> WatermarkExt for B {
    fn watermark_mut<L, S>(&mut self, loader: &L, args: &[S]) -> Result<&mut Self, WatermarkError>
    where
        L: ImageLoader + ?Sized,
        S: AsRef<str>,
    {
        watermark(self, loader, args)?;
        Ok(self)
    }
}
