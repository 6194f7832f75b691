use thiserror::Error;

/// Boxed error returned by an [`ImageLoader`](crate::ImageLoader).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by [`RasterBuffer`](crate::RasterBuffer) primitives.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("point ({x}, {y}) is outside the {width}x{height} image")]
    PointOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("no pixel differs from the background by more than the threshold")]
    NoContentFound,

    #[error("region {width}x{height} has zero area")]
    EmptyRegion { width: u32, height: u32 },

    #[error(
        "region {width}x{height} at ({left}, {top}) exceeds the {image_width}x{image_height} image"
    )]
    RegionOutOfBounds {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("{context}: image dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions {
        context: &'static str,
        width: u32,
        height: u32,
    },

    #[error("expected {expected} bands, image has {actual}")]
    BandMismatch { expected: usize, actual: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to decode image")]
    Decode(#[source] image::ImageError),

    #[error("failed to parse mask SVG")]
    SvgParse(#[source] resvg::usvg::Error),

    #[error("failed to allocate a {width}x{height} pixmap")]
    Rasterize { width: u32, height: u32 },
}

/// Errors of the trim operator.
#[derive(Debug, Error)]
pub enum TrimError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Errors of the fill-to-canvas operator.
#[derive(Debug, Error)]
pub enum FillError {
    #[error("target canvas {width}x{height} has zero area")]
    InvalidCanvas { width: u32, height: u32 },

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Errors of the watermark operator.
#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("failed to load watermark image {reference:?}")]
    Load {
        reference: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Errors of the rounded-corner operator.
#[derive(Debug, Error)]
pub enum RoundCornerError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
}
