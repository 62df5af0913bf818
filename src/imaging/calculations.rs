//! Pure calculation functions for output dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Every dimension they return is rounded to the nearest pixel and is at
//! least 1: a surface can never be zero pixels wide.

use super::backend::Dimensions;
use super::params::{Edge, SizeSpec};
use crate::error::{ResizeError, Result};

/// Compute the output size for `spec` applied to a source of `natural` size.
///
/// - `Percent { factor }` scales both edges by `factor / 100`.
/// - `Absolute` without aspect lock returns the requested size as-is,
///   distortion included.
/// - `Absolute` with aspect lock keeps the `authoritative` edge and derives
///   the other one from the natural ratio; the other requested value is ignored.
///
/// # Errors
/// * [`ResizeError::InvalidSource`] if either natural edge is zero
/// * [`ResizeError::InvalidSize`] if a percent factor is not a positive number
///
/// # Examples
/// ```
/// # use simple_resize::imaging::{compute_target_dimensions, Dimensions, Edge, SizeSpec};
/// let natural = Dimensions::new(800, 600);
/// let spec = SizeSpec::Absolute { width: 400, height: 0, keep_aspect: true, authoritative: Edge::Width };
/// assert_eq!(compute_target_dimensions(natural, &spec).unwrap(), Dimensions::new(400, 300));
///
/// let half = SizeSpec::Percent { factor: 50.0 };
/// assert_eq!(compute_target_dimensions(natural, &half).unwrap(), Dimensions::new(400, 300));
/// ```
pub fn compute_target_dimensions(natural: Dimensions, spec: &SizeSpec) -> Result<Dimensions> {
    if natural.is_degenerate() {
        return Err(ResizeError::InvalidSource {
            width: natural.width,
            height: natural.height,
        });
    }

    match *spec {
        SizeSpec::Percent { factor } => {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ResizeError::InvalidSize(format!(
                    "percent factor must be a positive number, got {factor}"
                )));
            }
            let scale = factor / 100.0;
            Ok(Dimensions::new(
                to_pixels(natural.width as f64 * scale),
                to_pixels(natural.height as f64 * scale),
            ))
        }
        SizeSpec::Absolute {
            width,
            height,
            keep_aspect: false,
            ..
        } => Ok(Dimensions::new(width.max(1), height.max(1))),
        SizeSpec::Absolute {
            width,
            height,
            keep_aspect: true,
            authoritative,
        } => match authoritative {
            Edge::Width => {
                let width = width.max(1);
                Ok(Dimensions::new(width, derive_height(natural, width)?))
            }
            Edge::Height => {
                let height = height.max(1);
                Ok(Dimensions::new(derive_width(natural, height)?, height))
            }
        },
    }
}

/// Height that preserves the natural ratio at the given width.
pub fn derive_height(natural: Dimensions, width: u32) -> Result<u32> {
    let ratio = aspect_ratio(natural)?;
    Ok(to_pixels(width as f64 / ratio))
}

/// Width that preserves the natural ratio at the given height.
pub fn derive_width(natural: Dimensions, height: u32) -> Result<u32> {
    let ratio = aspect_ratio(natural)?;
    Ok(to_pixels(height as f64 * ratio))
}

/// Natural width / height.
fn aspect_ratio(natural: Dimensions) -> Result<f64> {
    if natural.is_degenerate() {
        return Err(ResizeError::InvalidSource {
            width: natural.width,
            height: natural.height,
        });
    }
    Ok(natural.width as f64 / natural.height as f64)
}

/// Round to the nearest pixel, saturating at `u32::MAX`, never below 1.
fn to_pixels(value: f64) -> u32 {
    // float → int `as` casts saturate
    (value.round() as u32).max(1)
}
