//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, TIFF, WebP) |
//! | **Target size** | [`compute_target_dimensions`] (pure math) |
//! | **Draw + encode** | `resize_exact` + JPEG / PNG / lossless WebP encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing the requested output
//! - **Source**: The immutable decoded raster
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;
mod source;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{compute_target_dimensions, derive_height, derive_width};
pub use params::{
    Edge, EncodeConfig, OutputFormat, Quality, QualityScale, ResampleFilter, SizeSpec,
};
pub use rust_backend::RustBackend;
pub use source::SourceImage;
