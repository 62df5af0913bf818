//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: decode and render. Render covers the whole draw-then-encode step:
//! allocate a surface of the target size, draw the source onto it, encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the recording
//! `MockBackend` in this module's test submodule.

use super::params::EncodeConfig;
use super::source::SourceImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    DecodeFailed(String),
    #[error("Encode failed: {0}")]
    EncodeFailed(String),
}

/// Pixel size of an image or surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero edge leaves the aspect ratio undefined.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// `Send + Sync` because renders run on the blocking thread pool.
pub trait ImageBackend: Send + Sync {
    /// Decode an encoded image into an immutable source raster.
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError>;

    /// Draw `source` scaled to exactly `target` and encode the surface.
    ///
    /// May return an empty buffer; callers treat that as an encode failure.
    fn render(
        &self,
        source: &SourceImage,
        target: Dimensions,
        config: &EncodeConfig,
    ) -> Result<Vec<u8>, BackendError>;
}
