//! Error taxonomy for the resize pipeline.
//!
//! Every variant is recoverable: the user can retry with a different file or
//! different settings. Backend failures are folded into the variant that
//! describes them from the user's point of view.

use crate::imaging::{BackendError, OutputFormat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    /// The selected file is not an image.
    #[error("{name} is not an image (type: {media_type})")]
    InvalidInput { name: String, media_type: String },

    /// The decoded image has a zero edge, so its aspect ratio is undefined.
    #[error("Source image is {width}x{height}; both edges must be non-zero")]
    InvalidSource { width: u32, height: u32 },

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The encoder failed or produced no data.
    #[error("{format} encoder produced no output: {reason}")]
    Encode {
        format: OutputFormat,
        reason: String,
    },

    #[error("No image loaded")]
    NoSource,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode task failed: {0}")]
    Task(String),
}

impl ResizeError {
    pub(crate) fn from_backend(err: BackendError, format: OutputFormat) -> Self {
        match err {
            BackendError::Io(e) => Self::Io(e),
            BackendError::DecodeFailed(reason) => Self::Decode(reason),
            BackendError::EncodeFailed(reason) => Self::Encode { format, reason },
        }
    }
}

pub type Result<T> = std::result::Result<T, ResizeError>;
