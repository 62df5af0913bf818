//! Parameter types for resize operations.
//!
//! These types describe *what* to produce, not *how*. They are the interface
//! between the [`calculations`](super::calculations) (which decide the output
//! size), the [`engine`](crate::engine) (which schedules the encode) and the
//! [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`SizeSpec`]: absolute pixels (optionally aspect-locked) or a percent scale.
//! - [`Edge`]: which field the user edited last; authoritative under aspect lock.
//! - [`OutputFormat`]: JPEG, PNG or WebP, with file extension and media type.
//! - [`Quality`]: encoder quality in `[0, 1]`. Clamped on construction.
//! - [`QualityScale`]: how user-entered quality values snap (stepped or continuous).
//! - [`ResampleFilter`]: filter used when drawing the source onto the surface.
//! - [`EncodeConfig`]: format + quality + filter for one render.

use image::ImageFormat;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The dimension the user touched last.
///
/// With aspect lock on, this edge keeps the value the user typed and the
/// other edge is derived from the source's natural ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    #[default]
    Width,
    Height,
}

impl FromStr for Edge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "width" | "w" => Ok(Self::Width),
            "height" | "h" => Ok(Self::Height),
            other => Err(format!("unknown edge '{other}' (expected width or height)")),
        }
    }
}

/// Requested output size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSpec {
    /// Explicit pixel size. With `keep_aspect`, only `authoritative` is honored.
    Absolute {
        width: u32,
        height: u32,
        keep_aspect: bool,
        authoritative: Edge,
    },
    /// Scale both edges by `factor` percent (100 = unchanged).
    Percent { factor: f64 },
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    WebP,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Jpeg, Self::Png, Self::WebP];

    /// File extension used for downloads.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::WebP => ImageFormat::WebP,
        }
    }

    /// Whether the encoder discards information (and so honors quality).
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WebP",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" | "image/jpeg" => Ok(Self::Jpeg),
            "png" | "image/png" => Ok(Self::Png),
            "webp" | "image/webp" => Ok(Self::WebP),
            other => Err(format!(
                "unsupported output format '{other}' (expected jpeg, png or webp)"
            )),
        }
    }
}

/// Encoder quality in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(f32);

impl Quality {
    pub const DEFAULT: f32 = 0.9;

    /// Clamp into `[0, 1]`. NaN falls back to the default.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Quality on the 1–100 scale lossy encoders take.
    pub fn percent(self) -> u8 {
        ((self.0 * 100.0).round() as u8).clamp(1, 100)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// How user-entered quality values are normalized.
///
/// `Stepped` matches a slider with range 0.05–1.0 and step 0.05;
/// `Continuous` accepts any value in 0–1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityScale {
    #[default]
    Stepped,
    Continuous,
}

impl QualityScale {
    const STEP: f32 = 0.05;

    pub fn snap(self, value: f32) -> Quality {
        match self {
            Self::Continuous => Quality::new(value),
            Self::Stepped => {
                let q = Quality::new(value).value();
                let steps = (q / Self::STEP).round().max(1.0);
                Quality::new(steps * Self::STEP)
            }
        }
    }
}

/// Resampling filter used to draw the source onto the target surface.
///
/// `Triangle` (bilinear) is the default, matching what 2D canvases use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Everything the backend needs to encode one render.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EncodeConfig {
    pub format: OutputFormat,
    pub quality: Quality,
    pub filter: ResampleFilter,
}

impl EncodeConfig {
    pub fn new(format: OutputFormat, quality: Quality) -> Self {
        Self {
            format,
            quality,
            filter: ResampleFilter::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_unit_range() {
        assert_eq!(Quality::new(-0.5).value(), 0.0);
        assert_eq!(Quality::new(0.5).value(), 0.5);
        assert_eq!(Quality::new(1.5).value(), 1.0);
    }

    #[test]
    fn quality_nan_uses_default() {
        assert_eq!(Quality::new(f32::NAN), Quality::default());
    }

    #[test]
    fn quality_percent_never_zero() {
        assert_eq!(Quality::new(0.0).percent(), 1);
        assert_eq!(Quality::new(0.92).percent(), 92);
        assert_eq!(Quality::new(1.0).percent(), 100);
    }

    #[test]
    fn stepped_scale_snaps_to_twentieths() {
        let scale = QualityScale::Stepped;
        assert!((scale.snap(0.93).value() - 0.95).abs() < 1e-6);
        assert!((scale.snap(0.91).value() - 0.90).abs() < 1e-6);
        // Slider minimum is 0.05
        assert!((scale.snap(0.0).value() - 0.05).abs() < 1e-6);
        assert_eq!(scale.snap(3.0).value(), 1.0);
    }

    #[test]
    fn continuous_scale_keeps_value() {
        assert_eq!(QualityScale::Continuous.snap(0.0).value(), 0.0);
        assert_eq!(QualityScale::Continuous.snap(0.37).value(), 0.37);
    }

    #[test]
    fn format_extensions() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::WebP.extension(), "webp");
    }

    #[test]
    fn format_parses_names_and_media_types() {
        assert_eq!("JPG".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("image/webp".parse::<OutputFormat>(), Ok(OutputFormat::WebP));
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn only_jpeg_is_lossy() {
        let lossy: Vec<_> = OutputFormat::ALL
            .into_iter()
            .filter(|f| f.is_lossy())
            .collect();
        assert_eq!(lossy, vec![OutputFormat::Jpeg]);
    }

    #[test]
    fn edge_parses_short_forms() {
        assert_eq!("h".parse::<Edge>(), Ok(Edge::Height));
        assert_eq!("Width".parse::<Edge>(), Ok(Edge::Width));
        assert!("depth".parse::<Edge>().is_err());
    }
}
