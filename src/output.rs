//! Output boundary: downloads, previews and CLI result formatting.
//!
//! # Downloads
//!
//! A result is saved as `resized-<width>x<height>.<ext>` where `ext` is
//! `jpg`, `png` or `webp`. Nothing is written unless the encode succeeded.
//!
//! # Previews
//!
//! A [`PreviewHandle`] is a transient, revocable reference to the encoded
//! bytes: a temporary file plus its `file://` URL. The file disappears when
//! the handle is revoked or dropped, so a preview never outlives its holder.
//! [`data_url`] gives an inline alternative for embedding.
//!
//! # Report format
//!
//! ```text
//! photo.jpg (4032x3024)
//!     Resized: 1008x756 (25%)
//!     Format: JPEG, quality 0.90
//!     Size: 182.4 KiB
//!     Saved: out/resized-1008x756.jpg
//! ```

use crate::engine::ResizeResult;
use crate::imaging::{Dimensions, OutputFormat, Quality};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Download file name for a result of `dims` encoded as `format`.
pub fn download_filename(dims: Dimensions, format: OutputFormat) -> String {
    format!(
        "resized-{}x{}.{}",
        dims.width,
        dims.height,
        format.extension()
    )
}

/// Write `result` into `dir` under its download name.
pub fn save_download(result: &ResizeResult, dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(result.filename());
    std::fs::write(&path, &result.bytes)?;
    tracing::info!(path = %path.display(), bytes = result.bytes.len(), "saved download");
    Ok(path)
}

/// Inline `data:` URL for the encoded bytes.
pub fn data_url(result: &ResizeResult) -> String {
    format!(
        "data:{};base64,{}",
        result.format.media_type(),
        STANDARD.encode(&result.bytes)
    )
}

/// A revocable reference to a rendered preview.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
    media_type: &'static str,
}

impl PreviewHandle {
    /// Write the result to a temporary file and hand out a reference to it.
    pub fn create(result: &ResizeResult) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("resize-preview-")
            .suffix(&format!(".{}", result.format.extension()))
            .tempfile()?;
        file.write_all(&result.bytes)?;
        file.flush()?;
        tracing::debug!(path = %file.path().display(), "created preview");
        Ok(Self {
            file,
            media_type: result.format.media_type(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.file.path().display())
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    /// Release the preview now instead of at drop.
    pub fn revoke(self) -> std::io::Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        tracing::debug!(path = %path.display(), "revoked preview");
        Ok(())
    }
}

/// Everything printed about one resize.
#[derive(Debug, Clone, Serialize)]
pub struct ResizeReport {
    pub source: String,
    pub natural_width: u32,
    pub natural_height: u32,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    /// `None` for lossless formats.
    pub quality: Option<f32>,
    pub bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<PathBuf>,
}

impl ResizeReport {
    pub fn new(source: &str, natural: Dimensions, result: &ResizeResult, quality: Quality) -> Self {
        Self {
            source: source.to_string(),
            natural_width: natural.width,
            natural_height: natural.height,
            width: result.width,
            height: result.height,
            format: result.format,
            quality: result.format.is_lossy().then_some(quality.value()),
            bytes: result.bytes.len(),
            saved: None,
        }
    }

    pub fn with_saved(mut self, path: PathBuf) -> Self {
        self.saved = Some(path);
        self
    }
}

/// Format a report as indented lines (see the [module docs](self)).
pub fn format_report(report: &ResizeReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}x{})",
        report.source, report.natural_width, report.natural_height
    )];
    lines.push(format!(
        "    Resized: {}x{} ({})",
        report.width,
        report.height,
        format_scale(report.natural_width, report.width)
    ));
    match report.quality {
        Some(q) => lines.push(format!("    Format: {}, quality {q:.2}", report.format)),
        None => lines.push(format!("    Format: {} (lossless)", report.format)),
    }
    lines.push(format!("    Size: {}", format_bytes(report.bytes)));
    if let Some(path) = &report.saved {
        lines.push(format!("    Saved: {}", path.display()));
    }
    lines
}

/// Width change as a whole percentage, e.g. `25%`.
fn format_scale(natural: u32, resized: u32) -> String {
    if natural == 0 {
        return "n/a".to_string();
    }
    format!("{:.0}%", resized as f64 * 100.0 / natural as f64)
}

fn format_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}
