//! Error type for the imaging layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Configuration and
//! geometry errors indicate caller misuse and propagate; codec and I/O errors
//! come out of `save` as values so batch callers can carry on.

use pageimage_core::PixelBox;
use thiserror::Error;

/// Error type for page image construction, drawing and persistence.
#[derive(Debug, Error)]
pub enum ImageError {
    /// No backend is registered under the requested tag.
    #[error("unknown image backend: {0:?}")]
    UnknownBackend(String),

    /// The rasterizer could not produce the page image.
    #[error("failed to render page {page_number}: {reason}")]
    Render { page_number: usize, reason: String },

    /// Non-finite or inverted geometry was passed to a drawing primitive.
    #[error("invalid geometry: {0}")]
    Geometry(String),

    /// The crop box does not lie inside the original image.
    #[error("crop box {crop:?} exceeds {width}x{height} image")]
    CropOutOfBounds {
        crop: PixelBox,
        width: u32,
        height: u32,
    },

    /// A replacement image does not match the original's dimensions.
    #[error("image size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The output format could not be inferred from the destination.
    #[error("cannot determine image format from {0:?}")]
    UnknownFormat(String),

    /// Writing to a stream requires an explicit output format.
    #[error("an explicit image format is required when writing to a stream")]
    MissingFormat,

    /// A pixel buffer of the given size could not be allocated.
    #[error("cannot allocate a {0}x{1} pixel buffer")]
    Allocation(u32, u32),

    /// Error from the `image` codecs.
    #[error("image codec error: {0}")]
    Encode(#[from] image::ImageError),

    /// Error from the native PNG encoder of the raster backend.
    #[error("PNG encoding error: {0}")]
    Png(String),

    /// Error writing image data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImageError {
    /// True for errors raised while persisting an image rather than while
    /// building or drawing it.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            ImageError::UnknownFormat(_)
                | ImageError::MissingFormat
                | ImageError::Encode(_)
                | ImageError::Png(_)
                | ImageError::Io(_)
        )
    }
}
