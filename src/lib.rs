//! # Simple Resize
//!
//! A local image resizer. Pick an image, say how big the result should be
//! (pixels or percent, with or without keeping the aspect ratio), choose
//! JPEG, PNG or WebP and a quality, then preview or save the result. Pixels
//! never leave the machine.
//!
//! # Pipeline
//!
//! ```text
//! 1. Accept   file      →  InputFile       (media type must be image/*)
//! 2. Decode   bytes     →  SourceImage     (natural width/height)
//! 3. Size     SizeSpec  →  Dimensions      (pure math, always ≥ 1)
//! 4. Render   surface   →  ResizeResult    (draw + encode, the one async step)
//! 5. Deliver  result    →  preview handle or resized-WxH.ext
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`input`] | Input boundary: rejects non-image files before anything is read |
//! | [`imaging`] | Dimension math, parameter types, the backend trait and the `image`-crate backend |
//! | [`engine`] | Async render on the blocking pool, superseded-request tagging |
//! | [`session`] | Per-session form state and the aspect-lock edit handlers |
//! | [`output`] | Download naming and saving, revocable previews, CLI report formatting |
//! | [`config`] | `simple-resize.toml` loading, merging over stock defaults, validation |
//! | [`error`] | The [`ResizeError`] taxonomy |
//!
//! # Design Decisions
//!
//! ## Explicit Authoritative Edge
//!
//! With the aspect lock on, exactly one of width and height is what the user
//! asked for; the other is derived. Which one is an explicit [`imaging::Edge`]
//! carried in [`imaging::SizeSpec`], recorded by the session's edit handlers.
//! Nothing infers it from the order events happened to arrive in.
//!
//! ## Stale Results Are Dropped
//!
//! Encoding runs off the caller's task. If the user changes their mind while
//! an encode is in flight, the engine hands out a newer ticket and the older
//! encode's result is discarded when it lands
//! ([`engine::ResizeOutcome::Superseded`]).
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling and encoding all go through the `image` crate. No
//! system libraries, no external processes; the binary is self-contained.

pub mod config;
pub mod engine;
pub mod error;
pub mod imaging;
pub mod input;
pub mod output;
pub mod session;

pub use engine::{ResizeEngine, ResizeOutcome, ResizeResult};
pub use error::{ResizeError, Result};

#[cfg(test)]
pub(crate) mod test_helpers;
