//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with format sniffing |
//! | Draw onto surface | `image::DynamicImage::resize_exact` (filter from [`EncodeConfig`]) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality 1–100) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless, quality ignored) |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder::new_lossless` (quality ignored) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{EncodeConfig, OutputFormat};
use super::source::SourceImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Input formats whose decoders are compiled in.
const DECODABLE: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

/// Whether the compiled-in decoders can read `format`.
pub fn can_decode(format: ImageFormat) -> bool {
    DECODABLE.contains(&format) && format.reading_enabled()
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert the drawn surface into a pixel layout the encoder accepts.
///
/// JPEG has no alpha channel, so transparent pixels are flattened to RGB.
/// The WebP encoder takes 8-bit RGB(A) only; PNG takes anything up to 16-bit.
fn surface_for(format: OutputFormat, drawn: DynamicImage) -> DynamicImage {
    match format {
        OutputFormat::Jpeg => match drawn {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => drawn,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
        OutputFormat::WebP => match drawn {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => drawn,
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
        OutputFormat::Png => match drawn {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                DynamicImage::ImageRgba16(drawn.to_rgba16())
            }
            other => other,
        },
    }
}

/// Encode a surface into an in-memory buffer.
fn encode(surface: &DynamicImage, config: &EncodeConfig) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let result = match config.format {
        OutputFormat::Jpeg => surface.write_with_encoder(JpegEncoder::new_with_quality(
            &mut buf,
            config.quality.percent(),
        )),
        OutputFormat::Png => surface.write_with_encoder(PngEncoder::new(&mut buf)),
        OutputFormat::WebP => surface.write_with_encoder(WebPEncoder::new_lossless(&mut buf)),
    };
    result.map_err(|e| BackendError::EncodeFailed(format!("{} encode failed: {e}", config.format)))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        match reader.format() {
            Some(format) if can_decode(format) => {}
            Some(format) => {
                return Err(BackendError::DecodeFailed(format!(
                    "no decoder for {format:?}"
                )));
            }
            None => {
                return Err(BackendError::DecodeFailed(
                    "unrecognized image data".to_string(),
                ));
            }
        }
        let image = reader
            .decode()
            .map_err(|e| BackendError::DecodeFailed(e.to_string()))?;
        Ok(SourceImage::new(image))
    }

    fn render(
        &self,
        source: &SourceImage,
        target: Dimensions,
        config: &EncodeConfig,
    ) -> Result<Vec<u8>, BackendError> {
        // The surface lives until the end of this call, on every path.
        let drawn = source.image().resize_exact(
            target.width,
            target.height,
            config.filter.filter_type(),
        );
        let surface = surface_for(config.format, drawn);
        encode(&surface, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::{Quality, ResampleFilter};
    use crate::test_helpers::{gradient_source, png_bytes};
    use image::{GenericImageView, RgbaImage};

    #[test]
    fn compiled_in_decoders() {
        for format in [
            ImageFormat::Jpeg,
            ImageFormat::Png,
            ImageFormat::Tiff,
            ImageFormat::WebP,
        ] {
            assert!(can_decode(format), "expected {format:?} to be decodable");
        }
        assert!(!can_decode(ImageFormat::Gif));
    }

    #[test]
    fn decode_png_reports_natural_dimensions() {
        let backend = RustBackend::new();
        let source = backend.decode(&png_bytes(200, 150)).unwrap();
        assert_eq!(source.dimensions(), Dimensions::new(200, 150));
    }

    #[test]
    fn decode_garbage_errors() {
        let backend = RustBackend::new();
        let result = backend.decode(b"definitely not an image");
        assert!(matches!(result, Err(BackendError::DecodeFailed(_))));
    }

    #[test]
    fn decode_truncated_png_errors() {
        let backend = RustBackend::new();
        let bytes = png_bytes(64, 64);
        let result = backend.decode(&bytes[..bytes.len() / 2]);
        assert!(result.is_err());
    }

    #[test]
    fn render_each_format_produces_decodable_output() {
        let backend = RustBackend::new();
        let source = gradient_source(120, 90);

        for format in OutputFormat::ALL {
            let bytes = backend
                .render(
                    &source,
                    Dimensions::new(60, 45),
                    &EncodeConfig::new(format, Quality::new(0.8)),
                )
                .unwrap();
            assert!(!bytes.is_empty(), "{format} produced no bytes");
            assert_eq!(
                image::guess_format(&bytes).unwrap(),
                format.image_format(),
                "{format} output sniffed as the wrong format"
            );
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!(decoded.dimensions(), (60, 45));
        }
    }

    #[test]
    fn render_fills_surface_without_preserving_aspect() {
        let backend = RustBackend::new();
        let source = gradient_source(800, 600);
        let bytes = backend
            .render(
                &source,
                Dimensions::new(50, 50),
                &EncodeConfig::new(OutputFormat::Png, Quality::new(1.0)),
            )
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (50, 50));
    }

    #[test]
    fn render_jpeg_flattens_alpha() {
        let backend = RustBackend::new();
        let rgba = RgbaImage::from_fn(32, 32, |x, _| image::Rgba([255, 0, 0, (x * 8) as u8]));
        let source = SourceImage::new(DynamicImage::ImageRgba8(rgba));
        let bytes = backend
            .render(
                &source,
                Dimensions::new(16, 16),
                &EncodeConfig::new(OutputFormat::Jpeg, Quality::new(0.9)),
            )
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn render_webp_keeps_alpha() {
        let backend = RustBackend::new();
        let rgba = RgbaImage::from_pixel(10, 10, image::Rgba([0, 0, 255, 128]));
        let source = SourceImage::new(DynamicImage::ImageRgba8(rgba));
        let bytes = backend
            .render(
                &source,
                Dimensions::new(5, 5),
                &EncodeConfig::new(OutputFormat::WebP, Quality::new(0.5)),
            )
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.color().has_alpha());
    }

    #[test]
    fn jpeg_quality_changes_size() {
        let backend = RustBackend::new();
        let source = gradient_source(256, 256);
        let render = |q: f32| {
            backend
                .render(
                    &source,
                    Dimensions::new(256, 256),
                    &EncodeConfig::new(OutputFormat::Jpeg, Quality::new(q)),
                )
                .unwrap()
                .len()
        };
        assert!(render(0.1) < render(1.0));
    }

    #[test]
    fn lossless_formats_ignore_quality() {
        let backend = RustBackend::new();
        let source = gradient_source(64, 64);
        for format in [OutputFormat::Png, OutputFormat::WebP] {
            let low = backend
                .render(
                    &source,
                    Dimensions::new(32, 32),
                    &EncodeConfig::new(format, Quality::new(0.0)),
                )
                .unwrap();
            let high = backend
                .render(
                    &source,
                    Dimensions::new(32, 32),
                    &EncodeConfig::new(format, Quality::new(1.0)),
                )
                .unwrap();
            assert_eq!(low, high, "{format} output should not depend on quality");
        }
    }

    #[test]
    fn nearest_filter_upscale_keeps_exact_colors() {
        let backend = RustBackend::new();
        let source = SourceImage::new(DynamicImage::ImageRgb8(image::RgbImage::from_fn(
            2,
            1,
            |x, _| if x == 0 { image::Rgb([0, 0, 0]) } else { image::Rgb([255, 255, 255]) },
        )));
        let config = EncodeConfig {
            filter: ResampleFilter::Nearest,
            ..EncodeConfig::new(OutputFormat::Png, Quality::default())
        };
        let bytes = backend
            .render(&source, Dimensions::new(4, 2), &config)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0), &image::Rgb([0, 0, 0]));
        assert_eq!(decoded.get_pixel(3, 1), &image::Rgb([255, 255, 255]));
    }
}
