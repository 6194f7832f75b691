//! Internal utility functions shared by the buffer backend and the filters.

use image::Primitive;

use crate::error::BufferError;

/// Normalizes an alpha value using a pre-computed max value.
///
/// # Arguments
///
/// * `alpha` - The alpha value to normalize
/// * `max_value` - The pre-computed maximum value for the type
///
/// # Returns
///
/// The normalized alpha value as a floating-point number between 0 and 1
#[inline]
pub fn normalize_alpha_with_max<S>(alpha: S, max_value: f32) -> f32
where
    S: Into<f32> + Primitive,
{
    alpha.into() / max_value
}

/// Validates that an image or canvas has non-zero dimensions.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
/// * `context` - The primitive or filter asking, used in the error message
pub fn validate_non_empty_image(
    width: u32,
    height: u32,
    context: &'static str,
) -> Result<(), BufferError> {
    if width == 0 || height == 0 {
        Err(BufferError::InvalidDimensions {
            context,
            width,
            height,
        })
    } else {
        Ok(())
    }
}

/// Offset that centers `inner` inside `outer`, truncating toward zero.
///
/// Negative when `inner` is larger than `outer`.
#[inline]
pub fn center_offset(outer: u32, inner: u32) -> i64 {
    (i64::from(outer) - i64::from(inner)) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_alpha_with_max_with_valid_input_returns_correct_ratios() {
        assert_eq!(normalize_alpha_with_max(0u8, 255.0), 0.0);
        assert_eq!(normalize_alpha_with_max(127u8, 255.0), 127.0 / 255.0);
        assert_eq!(normalize_alpha_with_max(255u8, 255.0), 1.0);
    }

    #[test]
    fn validate_non_empty_image_with_valid_dimensions_accepts() {
        validate_non_empty_image(100, 100, "test").unwrap();
        validate_non_empty_image(1, 1, "test").unwrap();
        assert!(validate_non_empty_image(0, 100, "test").is_err());
        assert!(validate_non_empty_image(100, 0, "test").is_err());
        assert!(validate_non_empty_image(0, 0, "test").is_err());
    }

    #[test]
    fn center_offset_with_odd_difference_truncates_toward_zero() {
        assert_eq!(center_offset(8, 3), 2); // 5 / 2 = 2.5 -> 2
        assert_eq!(center_offset(3, 8), -2); // -5 / 2 = -2.5 -> -2
        assert_eq!(center_offset(4, 4), 0);
    }
}
