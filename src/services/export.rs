use crate::models::{Direction, GradientKind, GradientSpec, RasterImage};
use camino::Utf8Path;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::fs;
use std::io::Cursor;
use thiserror::Error;

/// Errors that can occur while encoding or writing an image
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Encoded output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    /// Pick a format from a file extension; anything but `jpg`/`jpeg` is PNG.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("jpg") | Some("jpeg") => ExportFormat::Jpeg,
            _ => ExportFormat::Png,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }
}

/// Lossless PNG bytes for `image`
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Cursor::new(Vec::new());
    PngEncoder::new(&mut bytes).write_image(
        image.as_bytes(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes.into_inner())
}

/// JPEG bytes for `image`. `quality` is clamped to 1..=100.
pub fn encode_jpeg(image: &RasterImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).write_image(
        image.as_bytes(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes.into_inner())
}

/// Encode `image` in the format implied by `path` and write it there.
///
/// # Returns
/// The format that was written
pub fn save(image: &RasterImage, path: &Utf8Path, jpeg_quality: u8) -> Result<ExportFormat, ExportError> {
    let format = ExportFormat::from_path(path);
    let bytes = match format {
        ExportFormat::Png => encode_png(image)?,
        ExportFormat::Jpeg => encode_jpeg(image, jpeg_quality)?,
    };
    fs::write(path, bytes)?;
    tracing::info!(
        "Saved {}x{} {:?} image to {}",
        image.width(),
        image.height(),
        format,
        path
    );
    Ok(format)
}

/// CSS `background` declaration approximating `spec`.
///
/// Only four linear directions have a dedicated CSS angle; the rest use the
/// default diagonal.
pub fn css(spec: &GradientSpec) -> String {
    let (primary, secondary) = (spec.primary(), spec.secondary());
    match spec.kind() {
        GradientKind::Linear(direction) => {
            let angle = match direction {
                Direction::LeftToRight => "to right",
                Direction::TopToBottom => "to bottom",
                Direction::TopLeftToBottomRight => "135deg",
                Direction::TopRightToBottomLeft => "225deg",
                _ => "135deg",
            };
            format!(
                "background: linear-gradient({}, {} 0%, {} 100%);",
                angle, primary, secondary
            )
        }
        GradientKind::Radial(position) => format!(
            "background: radial-gradient(circle at {}, {} 0%, {} 100%);",
            position.name().replace('-', " "),
            primary,
            secondary
        ),
    }
}

/// Suggested file name: `{primary}-{secondary}_{lg|rg}_{W}x{H}.{ext}`
///
/// Colors are the six hex digits without `#`.
pub fn default_filename(spec: &GradientSpec, extension: &str) -> String {
    format!(
        "{}-{}_{}_{}x{}.{}",
        spec.primary().hex_digits(),
        spec.secondary().hex_digits(),
        spec.kind().short_tag(),
        spec.width(),
        spec.height(),
        extension.trim_start_matches('.')
    )
}
