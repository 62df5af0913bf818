//! Shared test utilities: synthetic images and fixture files.
//!
//! Tests build their inputs in memory instead of shipping binary fixtures.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = write_test_png(tmp.path(), "photo.png", 800, 600);
//! let source = gradient_source(800, 600);
//! ```

use crate::imaging::SourceImage;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// A single-color source. Zero edges are allowed (degenerate sources).
pub fn solid_source(width: u32, height: u32) -> SourceImage {
    SourceImage::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        image::Rgb([90, 120, 150]),
    )))
}

/// An RGB gradient, so resampling and lossy encoding have something to chew on.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

pub fn gradient_source(width: u32, height: u32) -> SourceImage {
    SourceImage::new(gradient_image(width, height))
}

/// PNG-encoded gradient.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    gradient_image(width, height)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Write a PNG gradient to `dir/name` and return its path.
pub fn write_test_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(width, height)).unwrap();
    path
}
