//! Per-session resize state and the handlers that edit it.
//!
//! A [`ResizeSession`] holds what a resize form would: the loaded image, the
//! width/height fields, the percent field and its toggle, the aspect lock,
//! and the output format and quality. Each front end owns one session and
//! passes it by reference to its handlers; there is no global state.
//!
//! ## Aspect lock policy
//!
//! The last edited field wins. [`set_width`](ResizeSession::set_width) and
//! [`set_height`](ResizeSession::set_height) record which edge the user
//! touched, and that edge is passed explicitly to
//! [`compute_target_dimensions`] as the authoritative one. The same
//! derivation runs on load, on every edit and when the lock is switched on,
//! so the fields can never drift apart. Loading an image resets both fields
//! to its natural size with width authoritative.

use crate::config::ResizeConfig;
use crate::engine::{ResizeEngine, ResizeOutcome};
use crate::error::{ResizeError, Result};
use crate::imaging::{
    Dimensions, Edge, EncodeConfig, ImageBackend, OutputFormat, Quality, QualityScale,
    ResampleFilter, SizeSpec, SourceImage, compute_target_dimensions, derive_height,
    derive_width,
};

/// An image the session is working on.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub name: String,
    pub image: SourceImage,
}

#[derive(Debug, Clone)]
pub struct ResizeSession {
    source: Option<LoadedSource>,
    width: u32,
    height: u32,
    percent: f64,
    use_percent: bool,
    keep_aspect: bool,
    authoritative: Edge,
    format: OutputFormat,
    quality: Quality,
    quality_scale: QualityScale,
    filter: ResampleFilter,
}

impl Default for ResizeSession {
    fn default() -> Self {
        Self::from_config(&ResizeConfig::default())
    }
}

impl ResizeSession {
    pub fn from_config(config: &ResizeConfig) -> Self {
        let scale = config.output.quality_scale;
        Self {
            source: None,
            width: 0,
            height: 0,
            percent: config.size.percent,
            use_percent: config.size.use_percent,
            keep_aspect: config.size.keep_aspect,
            authoritative: config.size.authoritative,
            format: config.output.format,
            quality: scale.snap(config.output.quality),
            quality_scale: scale,
            filter: config.output.filter,
        }
    }

    /// Load a new image, replacing any previous one.
    pub fn load(&mut self, name: &str, image: SourceImage) {
        let natural = image.dimensions();
        tracing::debug!(file = name, %natural, "session loaded source");
        self.width = natural.width;
        self.height = natural.height;
        self.authoritative = Edge::Width;
        self.source = Some(LoadedSource {
            name: name.to_string(),
            image,
        });
    }

    pub fn source(&self) -> Option<&LoadedSource> {
        self.source.as_ref()
    }

    /// Edit the width field. Under aspect lock the height follows.
    pub fn set_width(&mut self, width: u32) -> Result<()> {
        self.width = width;
        self.authoritative = Edge::Width;
        self.sync_locked_edge()
    }

    /// Edit the height field. Under aspect lock the width follows.
    pub fn set_height(&mut self, height: u32) -> Result<()> {
        self.height = height;
        self.authoritative = Edge::Height;
        self.sync_locked_edge()
    }

    /// Toggle the aspect lock. Switching it on re-derives the
    /// non-authoritative field from the authoritative one.
    pub fn set_keep_aspect(&mut self, keep_aspect: bool) -> Result<()> {
        self.keep_aspect = keep_aspect;
        self.sync_locked_edge()
    }

    pub fn set_use_percent(&mut self, use_percent: bool) {
        self.use_percent = use_percent;
    }

    pub fn set_percent(&mut self, percent: f64) {
        self.percent = percent;
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Set quality, snapped to the session's quality scale.
    pub fn set_quality(&mut self, quality: f32) {
        self.quality = self.quality_scale.snap(quality);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn authoritative(&self) -> Edge {
        self.authoritative
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// The size request the form currently describes.
    pub fn size_spec(&self) -> SizeSpec {
        if self.use_percent {
            SizeSpec::Percent {
                factor: self.percent,
            }
        } else {
            SizeSpec::Absolute {
                width: self.width,
                height: self.height,
                keep_aspect: self.keep_aspect,
                authoritative: self.authoritative,
            }
        }
    }

    pub fn encode_config(&self) -> EncodeConfig {
        EncodeConfig {
            format: self.format,
            quality: self.quality,
            filter: self.filter,
        }
    }

    /// Output size for the current settings.
    pub fn target_dimensions(&self) -> Result<Dimensions> {
        let source = self.source.as_ref().ok_or(ResizeError::NoSource)?;
        compute_target_dimensions(source.image.dimensions(), &self.size_spec())
    }

    /// Run a resize with the current settings.
    ///
    /// Superseded if another resize on the same engine started meanwhile.
    pub async fn resize<B: ImageBackend + 'static>(
        &self,
        engine: &ResizeEngine<B>,
    ) -> Result<ResizeOutcome> {
        let source = self.source.as_ref().ok_or(ResizeError::NoSource)?;
        engine
            .resize(&source.image, &self.size_spec(), &self.encode_config())
            .await
    }

    fn sync_locked_edge(&mut self) -> Result<()> {
        if !self.keep_aspect {
            return Ok(());
        }
        let Some(source) = &self.source else {
            return Ok(());
        };
        let natural = source.image.dimensions();
        match self.authoritative {
            Edge::Width => self.height = derive_height(natural, self.width.max(1))?,
            Edge::Height => self.width = derive_width(natural, self.height.max(1))?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::solid_source;

    fn loaded(width: u32, height: u32) -> ResizeSession {
        let mut session = ResizeSession::default();
        session.load("photo.jpg", solid_source(width, height));
        session
    }

    #[test]
    fn load_resets_fields_to_natural_size() {
        let mut session = loaded(800, 600);
        session.set_height(10).unwrap();

        session.load("other.png", solid_source(300, 200));
        assert_eq!((session.width(), session.height()), (300, 200));
        assert_eq!(session.authoritative(), Edge::Width);
        assert_eq!(session.source().unwrap().name, "other.png");
    }

    #[test]
    fn width_edit_derives_height() {
        let mut session = loaded(800, 600);
        session.set_width(400).unwrap();
        assert_eq!(session.height(), 300);
        assert_eq!(
            session.target_dimensions().unwrap(),
            Dimensions::new(400, 300)
        );
    }

    #[test]
    fn height_edit_derives_width_and_wins() {
        let mut session = loaded(800, 600);
        session.set_width(400).unwrap();
        session.set_height(150).unwrap();
        assert_eq!(session.width(), 200);
        assert_eq!(session.authoritative(), Edge::Height);
        assert_eq!(
            session.target_dimensions().unwrap(),
            Dimensions::new(200, 150)
        );
    }

    #[test]
    fn unlocked_edits_are_independent() {
        let mut session = loaded(800, 600);
        session.set_keep_aspect(false).unwrap();
        session.set_width(500).unwrap();
        session.set_height(500).unwrap();
        assert_eq!(
            session.target_dimensions().unwrap(),
            Dimensions::new(500, 500)
        );
    }

    #[test]
    fn relocking_rederives_from_last_edited_field() {
        let mut session = loaded(800, 600);
        session.set_keep_aspect(false).unwrap();
        session.set_width(500).unwrap();
        session.set_height(90).unwrap();

        session.set_keep_aspect(true).unwrap();
        assert_eq!((session.width(), session.height()), (120, 90));
    }

    #[test]
    fn percent_mode_ignores_pixel_fields() {
        let mut session = loaded(800, 600);
        session.set_width(10).unwrap();
        session.set_use_percent(true);
        session.set_percent(50.0);
        assert_eq!(
            session.target_dimensions().unwrap(),
            Dimensions::new(400, 300)
        );
    }

    #[test]
    fn quality_snaps_to_scale() {
        let mut session = ResizeSession::default();
        session.set_quality(0.33);
        assert!((session.quality().value() - 0.35).abs() < 1e-6);

        let mut config = ResizeConfig::default();
        config.output.quality_scale = QualityScale::Continuous;
        let mut session = ResizeSession::from_config(&config);
        session.set_quality(0.33);
        assert_eq!(session.quality().value(), 0.33);
    }

    #[test]
    fn degenerate_source_fails_on_locked_edit() {
        let mut session = loaded(0, 600);
        let result = session.set_width(100);
        assert!(matches!(result, Err(ResizeError::InvalidSource { .. })));
    }

    #[test]
    fn no_source_means_no_dimensions() {
        let session = ResizeSession::default();
        assert!(matches!(
            session.target_dimensions(),
            Err(ResizeError::NoSource)
        ));
    }

    #[tokio::test]
    async fn resize_sends_session_settings_to_backend() {
        let engine = ResizeEngine::new(MockBackend::new());
        let mut session = loaded(800, 600);
        session.set_width(400).unwrap();
        session.set_format(OutputFormat::WebP);
        session.set_quality(0.5);

        let result = session.resize(&engine).await.unwrap().into_fresh().unwrap();
        assert_eq!(result.filename(), "resized-400x300.webp");

        let ops = engine.backend().get_operations();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            RecordedOp::Render {
                width: 400,
                height: 300,
                format: OutputFormat::WebP,
                quality,
            } => assert!((quality.value() - 0.5).abs() < 1e-6),
            other => panic!("unexpected operation {other:?}"),
        }
    }

    #[tokio::test]
    async fn resize_without_source_is_an_error() {
        let engine = ResizeEngine::new(MockBackend::new());
        let session = ResizeSession::default();
        let result = session.resize(&engine).await;
        assert!(matches!(result, Err(ResizeError::NoSource)));
    }
}
