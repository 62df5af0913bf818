//! The decoded source raster.

use super::backend::Dimensions;
use image::DynamicImage;
use std::sync::Arc;

/// An immutable decoded image and its natural dimensions.
///
/// Clones share the same pixel buffer, so handing a source to the encode
/// task costs a reference count, not a copy. Nothing in the crate mutates
/// the pixels after construction.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: Arc<DynamicImage>,
}

impl SourceImage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            pixels: Arc::new(image),
        }
    }

    pub fn natural_width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.natural_width(), self.natural_height())
    }

    pub fn image(&self) -> &DynamicImage {
        &self.pixels
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}
