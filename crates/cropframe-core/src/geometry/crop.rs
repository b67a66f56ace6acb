//! Aspect-locked crop seeding and validation of user-adjusted rectangles.
//!
//! # Coordinate System
//!
//! - All values are in source-image pixels (not normalized)
//! - (0, 0) = top-left corner
//! - Values are `f64` because the interactive editor reports sub-pixel
//!   positions; rounding happens only when rasterizing

use super::{CropRectangle, Dimensions, GeometryError, TargetSpec};

/// Compute the largest centered rectangle with the target aspect ratio.
///
/// The result is inscribed in the source image and touches two opposite
/// edges: the top and bottom when the source is relatively wider than the
/// target, the left and right otherwise.
///
/// # Errors
///
/// Returns `GeometryError::InvalidDimensions` if either source side is not a
/// positive finite number or the target has zero area.
///
/// # Example
///
/// ```ignore
/// let rect = compute_initial_crop(Dimensions::new(1000.0, 500.0), TargetSpec::default())?;
/// assert_eq!(rect.width, 1000.0);
/// ```
pub fn compute_initial_crop(
    source: Dimensions,
    target: TargetSpec,
) -> Result<CropRectangle, GeometryError> {
    let source = source.validated()?;
    target.validate()?;

    let target_aspect = target.aspect();

    if source.aspect() > target_aspect {
        // Source is wider: full height, trim the sides
        let height = source.height;
        let width = (height * target_aspect).min(source.width);
        let x = ((source.width - width) / 2.0).max(0.0);
        Ok(CropRectangle::new(x, 0.0, width, height))
    } else {
        // Source is taller or equal: full width, trim top and bottom
        let width = source.width;
        let height = (width / target_aspect).min(source.height);
        let y = ((source.height - height) / 2.0).max(0.0);
        Ok(CropRectangle::new(0.0, y, width, height))
    }
}

/// Validate a user-adjusted crop rectangle against the source bounds.
///
/// # Behavior
///
/// - Width or height below `min_dimension` is rejected, never grown
/// - A side longer than the source is shrunk to the source extent, then the
///   minimum is checked again
/// - `x` and `y` are clamped so the rectangle stays inside the source
/// - The aspect ratio is not checked; the crop tool enforces it
///
/// # Errors
///
/// - `GeometryError::InvalidDimensions` for an invalid source or non-finite rect
/// - `GeometryError::CropTooSmall` if either side is below the minimum
pub fn validate_crop(
    rect: CropRectangle,
    source: Dimensions,
    min_dimension: f64,
) -> Result<CropRectangle, GeometryError> {
    let source = source.validated()?;
    rect.check_finite()?;
    let min = if min_dimension.is_finite() {
        min_dimension.max(0.0)
    } else {
        0.0
    };

    let too_small = |width: f64, height: f64| GeometryError::CropTooSmall { width, height, min };

    if rect.width < min || rect.height < min || rect.width <= 0.0 || rect.height <= 0.0 {
        return Err(too_small(rect.width, rect.height));
    }

    let width = rect.width.min(source.width);
    let height = rect.height.min(source.height);
    if width < min || height < min {
        return Err(too_small(width, height));
    }

    let x = rect.x.clamp(0.0, source.width - width);
    let y = rect.y.clamp(0.0, source.height - height);

    Ok(CropRectangle::new(x, y, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-2;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_landscape_source_banner_target() {
        // Source aspect 2.0 < target aspect 10.25: full width, trim vertically
        let rect =
            compute_initial_crop(Dimensions::new(1000.0, 500.0), TargetSpec::default()).unwrap();

        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.width, 1000.0);
        assert!(approx(rect.height, 97.56), "height was {}", rect.height);
        assert!(approx(rect.y, 201.22), "y was {}", rect.y);
    }

    #[test]
    fn test_portrait_source_banner_target() {
        let rect =
            compute_initial_crop(Dimensions::new(400.0, 800.0), TargetSpec::default()).unwrap();

        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.width, 400.0);
        assert!(approx(rect.height, 39.02), "height was {}", rect.height);
        assert!(approx(rect.y, 380.49), "y was {}", rect.y);
    }

    #[test]
    fn test_wider_source_trims_sides() {
        // 2050x100 has aspect 20.5, wider than 10.25
        let rect =
            compute_initial_crop(Dimensions::new(2050.0, 100.0), TargetSpec::default()).unwrap();

        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.height, 100.0);
        assert!(approx(rect.width, 1025.0));
        assert!(approx(rect.x, 512.5));
    }

    #[test]
    fn test_equal_aspect_covers_source() {
        let target = TargetSpec::new(200, 200).unwrap();
        let rect = compute_initial_crop(Dimensions::new(300.0, 300.0), target).unwrap();

        assert_eq!(rect, CropRectangle::new(0.0, 0.0, 300.0, 300.0));
    }

    #[test]
    fn test_initial_crop_rejects_degenerate_source() {
        for (w, h) in [(0.0, 100.0), (100.0, 0.0), (-5.0, 100.0), (f64::NAN, 1.0)] {
            let result = compute_initial_crop(Dimensions::new(w, h), TargetSpec::default());
            assert!(
                matches!(result, Err(GeometryError::InvalidDimensions { .. })),
                "expected InvalidDimensions for {}x{}",
                w,
                h
            );
        }
    }

    #[test]
    fn test_validate_accepts_inside_rect() {
        let source = Dimensions::new(400.0, 300.0);
        let rect = CropRectangle::new(10.0, 20.0, 100.0, 60.0);
        assert_eq!(validate_crop(rect, source, 50.0).unwrap(), rect);
    }

    #[test]
    fn test_validate_rejects_narrow_rect() {
        let source = Dimensions::new(400.0, 300.0);
        let result = validate_crop(CropRectangle::new(0.0, 0.0, 49.9, 100.0), source, 50.0);
        assert!(matches!(result, Err(GeometryError::CropTooSmall { .. })));
    }

    #[test]
    fn test_validate_rejects_short_rect() {
        let source = Dimensions::new(400.0, 300.0);
        let result = validate_crop(CropRectangle::new(0.0, 0.0, 100.0, 10.0), source, 50.0);
        assert!(matches!(result, Err(GeometryError::CropTooSmall { .. })));
    }

    #[test]
    fn test_validate_clamps_position_keeps_size() {
        let source = Dimensions::new(400.0, 300.0);

        let clamped = validate_crop(CropRectangle::new(380.0, 290.0, 100.0, 60.0), source, 50.0)
            .unwrap();
        assert_eq!(clamped, CropRectangle::new(300.0, 240.0, 100.0, 60.0));

        let clamped = validate_crop(CropRectangle::new(-25.0, -3.0, 100.0, 60.0), source, 50.0)
            .unwrap();
        assert_eq!(clamped, CropRectangle::new(0.0, 0.0, 100.0, 60.0));
    }

    #[test]
    fn test_validate_shrinks_oversized_rect() {
        let source = Dimensions::new(400.0, 300.0);
        let clamped =
            validate_crop(CropRectangle::new(-10.0, 5.0, 500.0, 100.0), source, 50.0).unwrap();
        assert_eq!(clamped, CropRectangle::new(0.0, 5.0, 400.0, 100.0));
    }

    #[test]
    fn test_validate_source_smaller_than_minimum() {
        let source = Dimensions::new(40.0, 300.0);
        let result = validate_crop(CropRectangle::new(0.0, 0.0, 60.0, 60.0), source, 50.0);
        assert!(matches!(result, Err(GeometryError::CropTooSmall { .. })));
    }

    #[test]
    fn test_validate_does_not_enforce_aspect() {
        let source = Dimensions::new(1000.0, 1000.0);
        let rect = CropRectangle::new(0.0, 0.0, 60.0, 500.0);
        assert_eq!(validate_crop(rect, source, 50.0).unwrap(), rect);
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let source = Dimensions::new(400.0, 300.0);
        let result = validate_crop(CropRectangle::new(f64::NAN, 0.0, 100.0, 100.0), source, 50.0);
        assert!(matches!(result, Err(GeometryError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_validate_rejects_invalid_source() {
        let result = validate_crop(
            CropRectangle::new(0.0, 0.0, 100.0, 100.0),
            Dimensions::new(0.0, 300.0),
            50.0,
        );
        assert!(matches!(result, Err(GeometryError::InvalidDimensions { .. })));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating source dimensions, including fractional sizes.
    fn source_strategy() -> impl Strategy<Value = (f64, f64)> {
        (0.5f64..=20_000.0, 0.5f64..=20_000.0)
    }

    /// Strategy for generating target sizes.
    fn target_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=4000, 1u32..=4000)
    }

    proptest! {
        /// Property: The seeded rectangle is always inside the source.
        #[test]
        fn prop_initial_crop_contained(
            (sw, sh) in source_strategy(),
            (tw, th) in target_strategy(),
        ) {
            let target = TargetSpec::new(tw, th).unwrap();
            let rect = compute_initial_crop(Dimensions::new(sw, sh), target).unwrap();

            prop_assert!(rect.x >= 0.0);
            prop_assert!(rect.y >= 0.0);
            prop_assert!(rect.right() <= sw * (1.0 + 1e-12), "right {} > {}", rect.right(), sw);
            prop_assert!(rect.bottom() <= sh * (1.0 + 1e-12), "bottom {} > {}", rect.bottom(), sh);
        }

        /// Property: The seeded rectangle has the target aspect ratio.
        #[test]
        fn prop_initial_crop_aspect_matches_target(
            (sw, sh) in source_strategy(),
            (tw, th) in target_strategy(),
        ) {
            let target = TargetSpec::new(tw, th).unwrap();
            let rect = compute_initial_crop(Dimensions::new(sw, sh), target).unwrap();

            let relative = (rect.aspect() - target.aspect()).abs() / target.aspect();
            prop_assert!(relative <= 1e-6, "aspect {} vs {}", rect.aspect(), target.aspect());
        }

        /// Property: The seeded rectangle spans the source on one axis.
        #[test]
        fn prop_initial_crop_is_maximal(
            (sw, sh) in source_strategy(),
            (tw, th) in target_strategy(),
        ) {
            let target = TargetSpec::new(tw, th).unwrap();
            let rect = compute_initial_crop(Dimensions::new(sw, sh), target).unwrap();

            prop_assert!(rect.width == sw || rect.height == sh);
        }

        /// Property: The seeded rectangle is centered.
        #[test]
        fn prop_initial_crop_centered(
            (sw, sh) in source_strategy(),
            (tw, th) in target_strategy(),
        ) {
            let target = TargetSpec::new(tw, th).unwrap();
            let rect = compute_initial_crop(Dimensions::new(sw, sh), target).unwrap();

            let left_gap = rect.x;
            let right_gap = sw - rect.right();
            let top_gap = rect.y;
            let bottom_gap = sh - rect.bottom();
            prop_assert!((left_gap - right_gap).abs() <= 1e-6 * sw.max(1.0));
            prop_assert!((top_gap - bottom_gap).abs() <= 1e-6 * sh.max(1.0));
        }

        /// Property: Anything below the minimum is rejected regardless of position.
        #[test]
        fn prop_validate_rejects_below_minimum(
            x in -500.0f64..=500.0,
            y in -500.0f64..=500.0,
            small in 0.0f64..50.0,
            other in 50.0f64..=300.0,
            narrow in any::<bool>(),
        ) {
            let (w, h) = if narrow { (small, other) } else { (other, small) };
            let result = validate_crop(
                CropRectangle::new(x, y, w, h),
                Dimensions::new(400.0, 400.0),
                50.0,
            );
            let rejected = matches!(result, Err(GeometryError::CropTooSmall { .. }));
            prop_assert!(rejected);
        }

        /// Property: Accepted rectangles are contained and keep their size when it fits.
        #[test]
        fn prop_validate_clamps_into_bounds(
            x in -1000.0f64..=1000.0,
            y in -1000.0f64..=1000.0,
            w in 50.0f64..=400.0,
            h in 50.0f64..=300.0,
        ) {
            let source = Dimensions::new(400.0, 300.0);
            let rect = validate_crop(CropRectangle::new(x, y, w, h), source, 50.0).unwrap();

            prop_assert!(rect.fits_within(source));
            prop_assert_eq!(rect.width, w);
            prop_assert_eq!(rect.height, h);
        }
    }
}
