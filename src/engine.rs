//! The resize engine: target-size computation plus the draw-then-encode step.
//!
//! Encoding is the only slow step and the only suspend point. It runs on
//! tokio's blocking pool so the caller's task (and everything else on the
//! runtime) keeps going while pixels are crunched.
//!
//! ## Superseded requests
//!
//! A caller that fires a new resize before the previous one finished must not
//! see the older result land on top of the newer one. Every request takes a
//! [`RequestTicket`] from a monotonically increasing counter; when an encode
//! completes, its result is only delivered if no newer ticket has been issued
//! in the meantime. Otherwise the caller gets [`ResizeOutcome::Superseded`]
//! and the bytes are dropped.

use crate::error::{ResizeError, Result};
use crate::imaging::{
    Dimensions, EncodeConfig, ImageBackend, OutputFormat, SizeSpec, SourceImage,
    compute_target_dimensions,
};
use crate::input::InputFile;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Largest edge a surface may have, in pixels.
pub const DEFAULT_MAX_EDGE: u32 = 16_384;

/// An encoded resize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeResult {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

impl ResizeResult {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Download name, e.g. `resized-640x480.webp`.
    pub fn filename(&self) -> String {
        crate::output::download_filename(self.dimensions(), self.format)
    }
}

/// Identifies one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// What a tracked request delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The latest request finished; here is its result.
    Fresh(ResizeResult),
    /// A newer request was issued before this one completed.
    Superseded,
}

impl ResizeOutcome {
    pub fn into_fresh(self) -> Option<ResizeResult> {
        match self {
            Self::Fresh(result) => Some(result),
            Self::Superseded => None,
        }
    }
}

/// Drives a backend through the resize pipeline.
pub struct ResizeEngine<B> {
    backend: Arc<B>,
    generation: AtomicU64,
    max_edge: u32,
}

impl<B: ImageBackend + 'static> ResizeEngine<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            generation: AtomicU64::new(0),
            max_edge: DEFAULT_MAX_EDGE,
        }
    }

    pub fn with_max_edge(mut self, max_edge: u32) -> Self {
        self.max_edge = max_edge.max(1);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Decode an accepted input file.
    pub fn decode(&self, input: &InputFile) -> Result<SourceImage> {
        let source = self
            .backend
            .decode(input.bytes())
            .map_err(|e| ResizeError::from_backend(e, OutputFormat::default()))?;
        tracing::debug!(
            file = input.name(),
            width = source.natural_width(),
            height = source.natural_height(),
            "decoded source"
        );
        Ok(source)
    }

    /// Output size for `spec` applied to `source`.
    pub fn compute_target_dimensions(
        &self,
        source: &SourceImage,
        spec: &SizeSpec,
    ) -> Result<Dimensions> {
        compute_target_dimensions(source.dimensions(), spec)
    }

    /// Draw `source` onto a `target`-sized surface and encode it.
    ///
    /// # Errors
    /// * [`ResizeError::InvalidSize`] if `target` exceeds the surface limit
    /// * [`ResizeError::Encode`] if the encoder fails or returns no bytes
    /// * [`ResizeError::Task`] if the encode task panicked
    pub async fn render(
        &self,
        source: &SourceImage,
        target: Dimensions,
        config: &EncodeConfig,
    ) -> Result<ResizeResult> {
        if target.width > self.max_edge || target.height > self.max_edge {
            return Err(ResizeError::InvalidSize(format!(
                "{target} exceeds the {max}x{max} surface limit",
                max = self.max_edge
            )));
        }

        tracing::debug!(%target, format = %config.format, "rendering");
        let backend = Arc::clone(&self.backend);
        let source = source.clone();
        let config = *config;
        let bytes = tokio::task::spawn_blocking(move || backend.render(&source, target, &config))
            .await
            .map_err(|e| ResizeError::Task(e.to_string()))?
            .map_err(|e| ResizeError::from_backend(e, config.format))?;

        if bytes.is_empty() {
            return Err(ResizeError::Encode {
                format: config.format,
                reason: "encoder returned an empty buffer".to_string(),
            });
        }
        tracing::debug!(%target, bytes = bytes.len(), "encoded");

        Ok(ResizeResult {
            width: target.width,
            height: target.height,
            format: config.format,
            bytes,
        })
    }

    /// Issue a ticket for a new request, superseding all earlier ones.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is still the latest request.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Compute, render and deliver the result only if `ticket` is still current.
    ///
    /// Errors from a superseded request are dropped along with its result.
    pub async fn resize_tracked(
        &self,
        ticket: RequestTicket,
        source: &SourceImage,
        spec: &SizeSpec,
        config: &EncodeConfig,
    ) -> Result<ResizeOutcome> {
        let rendered = match self.compute_target_dimensions(source, spec) {
            Ok(target) => self.render(source, target, config).await,
            Err(e) => Err(e),
        };

        if !self.is_current(ticket) {
            tracing::debug!(?ticket, "discarding superseded resize");
            return Ok(ResizeOutcome::Superseded);
        }
        rendered.map(ResizeOutcome::Fresh)
    }

    /// Start a new request and run it to completion.
    pub async fn resize(
        &self,
        source: &SourceImage,
        spec: &SizeSpec,
        config: &EncodeConfig,
    ) -> Result<ResizeOutcome> {
        let ticket = self.begin();
        self.resize_tracked(ticket, source, spec, config).await
    }
}
