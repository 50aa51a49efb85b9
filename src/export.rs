//! Export artifacts: encoded bytes plus a deterministic file name.
//!
//! PNG exports the surface as is, so a transparent canvas stays transparent.
//! JPEG has no alpha channel; the surface is flattened over opaque white
//! before encoding. SVG export of a raster composition is not available and
//! reports [`ExportError::Unsupported`] without rendering anything.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ExportError;
use crate::markup::slugify;
use crate::raster::flatten_onto;

const JPEG_MATTE: [u8; 3] = [255, 255, 255];

// ============================================================================
// ExportFormat
// ============================================================================

/// Output formats offered by the editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpg,
    Svg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Png, Self::Jpg, Self::Svg];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpg => "JPG",
            Self::Svg => "SVG",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Parses a format from a file extension or name (`png`, `jpg`, `jpeg`, `svg`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ============================================================================
// SizePreset
// ============================================================================

/// Square output sizes for resampled raster exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Favicon,
    Social,
    Print,
    Hd,
}

impl SizePreset {
    pub const ALL: [SizePreset; 4] = [Self::Favicon, Self::Social, Self::Print, Self::Hd];

    /// Side length in pixels.
    pub fn pixels(&self) -> u32 {
        match self {
            Self::Favicon => 256,
            Self::Social => 512,
            Self::Print => 1024,
            Self::Hd => 2048,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Favicon => "Favicon",
            Self::Social => "Social Media",
            Self::Print => "Print",
            Self::Hd => "High Resolution",
        }
    }

    /// Resamples a rendered surface to this preset's size.
    pub fn resample(&self, image: &RgbaImage) -> RgbaImage {
        let px = self.pixels();
        if image.dimensions() == (px, px) {
            return image.clone();
        }
        imageops::resize(image, px, px, FilterType::Lanczos3)
    }
}

// ============================================================================
// ExportedFile
// ============================================================================

/// A finished export, ready to be saved or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Writes the file into `dir` under its own name and returns the path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "export written");
        Ok(path)
    }
}

/// `<name lowercased, whitespace runs as '-'>-logo.<ext>`.
pub fn export_file_name(name: &str, format: ExportFormat) -> String {
    let stem = slugify(name);
    if stem.is_empty() {
        format!("logo.{}", format.extension())
    } else {
        format!("{stem}-logo.{}", format.extension())
    }
}

/// Like [`export_file_name`], with the preset size appended to the stem.
pub fn sized_file_name(name: &str, format: ExportFormat, preset: SizePreset) -> String {
    let stem = slugify(name);
    let px = preset.pixels();
    if stem.is_empty() {
        format!("logo-{px}.{}", format.extension())
    } else {
        format!("{stem}-logo-{px}.{}", format.extension())
    }
}

// ============================================================================
// Encoders
// ============================================================================

/// Encodes a raster surface in `format`.
pub fn encode_raster(
    image: &RgbaImage,
    format: ExportFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Png => encode_png(image),
        ExportFormat::Jpg => encode_jpg(image, jpeg_quality),
        ExportFormat::Svg => Err(ExportError::Unsupported(format)),
    }
}

/// Encodes the surface losslessly, alpha included.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|source| ExportError::Encode {
            format: ExportFormat::Png,
            source,
        })?;
    Ok(bytes)
}

/// Flattens the surface over white and encodes it as JPEG.
pub fn encode_jpg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let flat = DynamicImage::ImageRgba8(flatten_onto(image, JPEG_MATTE)).to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&flat)
        .map_err(|source| ExportError::Encode {
            format: ExportFormat::Jpg,
            source,
        })?;
    Ok(bytes)
}
