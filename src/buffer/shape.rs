use image::{Rgb, RgbaImage};
use resvg::{tiny_skia::Pixmap, usvg};

use crate::error::BufferError;

/// Rounded rectangle anchored at the origin, described declaratively and
/// rasterized through SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundedRect {
    pub width: u32,
    pub height: u32,
    pub rx: u32,
    pub ry: u32,
    pub fill: Rgb<u8>,
}

impl RoundedRect {
    /// Opaque white rectangle of the given size, the shape used for alpha masks.
    #[must_use]
    pub const fn mask(width: u32, height: u32, rx: u32, ry: u32) -> Self {
        Self {
            width,
            height,
            rx,
            ry,
            fill: Rgb([255, 255, 255]),
        }
    }

    /// SVG document drawing this shape on a canvas of the same size.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let Self {
            width,
            height,
            rx,
            ry,
            fill: Rgb([red, green, blue]),
        } = *self;
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><rect x="0" y="0" width="{width}" height="{height}" rx="{rx}" ry="{ry}" fill="#{red:02x}{green:02x}{blue:02x}"/></svg>"##
        )
    }

    /// Renders the shape into a straight-alpha RGBA image.
    pub(crate) fn render(&self) -> Result<RgbaImage, BufferError> {
        let Self { width, height, .. } = *self;
        if width == 0 || height == 0 {
            return Err(BufferError::InvalidDimensions {
                context: "rasterize",
                width,
                height,
            });
        }

        let tree = usvg::Tree::from_str(&self.to_svg(), &usvg::Options::default())
            .map_err(BufferError::SvgParse)?;
        let mut pixmap = Pixmap::new(width, height).ok_or(BufferError::Rasterize { width, height })?;
        resvg::render(&tree, usvg::Transform::default(), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied pixels
        let data = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();

        RgbaImage::from_raw(width, height, data).ok_or(BufferError::Rasterize { width, height })
    }
}
