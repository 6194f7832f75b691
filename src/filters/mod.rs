//! In-place transforms built from [`RasterBuffer`](crate::RasterBuffer) primitives.

pub mod fill;
pub mod round_corner;
pub mod trim;
pub mod watermark;
