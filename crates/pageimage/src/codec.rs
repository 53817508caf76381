//! Output formats, pixel modes and encoding of annotated images.

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use image::{DynamicImage, RgbaImage};

use crate::error::ImageError;

/// File formats an annotated image can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl OutputFormat {
    /// Map a file extension (with or without the leading dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" | "jpe" => Some(OutputFormat::Jpeg),
            "bmp" => Some(OutputFormat::Bmp),
            "tif" | "tiff" => Some(OutputFormat::Tiff),
            _ => None,
        }
    }

    /// Infer the format from a destination path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ImageError::UnknownFormat(path.display().to_string()))
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
        }
    }

    /// Whether the format can store an alpha channel.
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Bmp => image::ImageFormat::Bmp,
            OutputFormat::Tiff => image::ImageFormat::Tiff,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| ImageError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Channel layout of the annotated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImageMode {
    /// Opaque three-channel image; alpha is discarded.
    Rgb,
    /// Four-channel image with alpha.
    #[default]
    Rgba,
}

impl FromStr for ImageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RGB" => Ok(ImageMode::Rgb),
            "RGBA" => Ok(ImageMode::Rgba),
            other => Err(format!("unsupported image mode: {other}")),
        }
    }
}

/// Force every pixel opaque, as RGB mode stores no alpha.
pub(crate) fn make_opaque(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        px.0[3] = 255;
    }
}

/// Encode an RGBA buffer. Alpha is dropped for RGB mode and for formats
/// that cannot store it.
pub(crate) fn encode_rgba(
    image: &RgbaImage,
    format: OutputFormat,
    mode: ImageMode,
) -> Result<Vec<u8>, ImageError> {
    let dynamic = if mode == ImageMode::Rgb || !format.supports_alpha() {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image.clone()).to_rgb8())
    } else {
        DynamicImage::ImageRgba8(image.clone())
    };
    let mut out = Cursor::new(Vec::new());
    dynamic.write_to(&mut out, format.image_format())?;
    Ok(out.into_inner())
}
