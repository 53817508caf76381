//! Image handler trait: the capability set every raster backend provides.
//!
//! A handler owns two images of one rendered page: the *original*, exactly as
//! rendered (possibly cropped), and the *annotated* copy that drawing
//! primitives modify. All geometry arriving here is already in image space.
//!
//! # Implementing a backend
//!
//! ```ignore
//! #[derive(Debug, Clone)]
//! struct MyHandler { /* original, annotated, context */ }
//!
//! impl ImageHandler for MyHandler {
//!     fn backend(&self) -> &'static str { "mine" }
//!     // ...
//! }
//!
//! registry.register("mine", |ctx| Ok(Box::new(MyHandler::open(ctx)?)));
//! ```

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use dyn_clone::DynClone;
use image::RgbaImage;
use pageimage_core::{BBox, DocumentStream, PixelBox, Point, Rgba};
use tracing::debug;

use crate::codec::{ImageMode, OutputFormat};
use crate::error::ImageError;
use crate::render::{PageRasterizer, RenderRequest, flatten_onto_white};

/// Render descriptor shared by a handler and its copies.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// Document the page comes from.
    pub stream: DocumentStream,
    /// 1-based page number.
    pub page_number: usize,
    /// Dots per inch.
    pub resolution: u32,
    /// Size of the rendered (root) page in page units.
    pub page_size: (f64, f64),
    /// Engine that produces the original image.
    pub rasterizer: Arc<dyn PageRasterizer>,
}

impl HandlerContext {
    /// 0-based page index.
    pub fn page_index(&self) -> usize {
        self.page_number.saturating_sub(1)
    }

    /// Render the page and flatten it onto an opaque white background.
    pub fn render(&self) -> Result<RgbaImage, ImageError> {
        let request = RenderRequest {
            stream: &self.stream,
            page_index: self.page_index(),
            resolution: self.resolution,
            page_size: self.page_size,
        };
        let mut image = self.rasterizer.rasterize(&request)?;
        flatten_onto_white(&mut image);
        debug!(
            page = self.page_number,
            resolution = self.resolution,
            width = image.width(),
            height = image.height(),
            "rendered page image"
        );
        Ok(image)
    }
}

/// Where a saved image goes.
pub enum SaveTarget<'a> {
    /// A file; the format defaults to the one named by its extension.
    Path(&'a Path),
    /// Any byte sink; the format must be given explicitly.
    Writer(&'a mut dyn Write),
}

impl<'a> From<&'a Path> for SaveTarget<'a> {
    fn from(path: &'a Path) -> Self {
        SaveTarget::Path(path)
    }
}

impl<'a> From<&'a std::path::PathBuf> for SaveTarget<'a> {
    fn from(path: &'a std::path::PathBuf) -> Self {
        SaveTarget::Path(path.as_path())
    }
}

impl<'a> From<&'a mut Vec<u8>> for SaveTarget<'a> {
    fn from(buf: &'a mut Vec<u8>) -> Self {
        SaveTarget::Writer(buf)
    }
}

impl fmt::Debug for SaveTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveTarget::Path(p) => f.debug_tuple("Path").field(p).finish(),
            SaveTarget::Writer(_) => f.write_str("Writer"),
        }
    }
}

/// Capability set of a raster backend.
///
/// Handlers are cloneable through [`dyn_clone`], so a boxed handler can be
/// duplicated without knowing its concrete type.
pub trait ImageHandler: DynClone + fmt::Debug {
    /// Registry tag of this backend.
    fn backend(&self) -> &'static str;

    /// Render descriptor this handler was built from.
    fn context(&self) -> &HandlerContext;

    /// Snapshot of the original image.
    fn original(&self) -> RgbaImage;

    /// Snapshot of the annotated image.
    fn annotated(&self) -> RgbaImage;

    /// Replace the original image. The annotated image is reset to match it.
    fn set_original(&mut self, image: RgbaImage) -> Result<(), ImageError>;

    /// Replace the annotated image.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::SizeMismatch`] unless `image` has the original's size.
    fn set_annotated(&mut self, image: RgbaImage) -> Result<(), ImageError>;

    /// Width and height of the original image in pixels.
    fn size(&self) -> (u32, u32);

    /// Crop the original image to `cropbox` (top-left inclusive,
    /// bottom-right exclusive), keeping the annotated image consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::CropOutOfBounds`] if the box is empty or exceeds the image.
    fn crop_original(&mut self, cropbox: PixelBox) -> Result<(), ImageError>;

    /// Draw a line of `width` pixels between two points.
    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64) -> Result<(), ImageError>;

    /// Fill `bbox` with `fill` and outline it one pixel wide with `outline`.
    fn rectangle(&mut self, bbox: BBox, fill: Rgba, outline: Rgba) -> Result<(), ImageError>;

    /// Fill the ellipse inscribed in `bbox` and outline it with `stroke`.
    fn ellipse(&mut self, bbox: BBox, fill: Rgba, stroke: Rgba) -> Result<(), ImageError>;

    /// Reset the annotated image to a fresh copy of the original, in `mode`
    /// (or the current mode when `None`).
    fn reset(&mut self, mode: Option<ImageMode>);

    /// Current channel layout of the annotated image.
    fn mode(&self) -> ImageMode;

    /// Encode the annotated image.
    fn encode(&self, format: OutputFormat) -> Result<Vec<u8>, ImageError>;

    /// Save the annotated image.
    ///
    /// The image is encoded in memory before anything is written, so a
    /// failure leaves an existing destination file untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnknownFormat`] when no format is given and the
    /// path has no recognised extension, [`ImageError::MissingFormat`] when
    /// writing to a stream without a format, and codec or I/O errors.
    fn save(&self, target: SaveTarget<'_>, format: Option<OutputFormat>) -> Result<(), ImageError> {
        let format = match (format, &target) {
            (Some(format), _) => format,
            (None, SaveTarget::Path(path)) => OutputFormat::from_path(path)?,
            (None, SaveTarget::Writer(_)) => return Err(ImageError::MissingFormat),
        };
        let bytes = self.encode(format)?;
        match target {
            SaveTarget::Path(path) => std::fs::write(path, &bytes)?,
            SaveTarget::Writer(writer) => writer.write_all(&bytes)?,
        }
        debug!(backend = self.backend(), %format, bytes = bytes.len(), "saved annotated image");
        Ok(())
    }
}

dyn_clone::clone_trait_object!(ImageHandler);

/// Reject non-finite coordinates before they reach a backend.
pub(crate) fn check_points(points: &[Point]) -> Result<(), ImageError> {
    match points.iter().find(|p| !p.is_finite()) {
        Some(p) => Err(ImageError::Geometry(format!("non-finite point {p:?}"))),
        None => Ok(()),
    }
}

/// Reject non-finite or inverted boxes before they reach a backend.
pub(crate) fn check_bbox(bbox: &BBox) -> Result<(), ImageError> {
    if !bbox.is_finite() {
        return Err(ImageError::Geometry(format!("non-finite box {bbox:?}")));
    }
    if !bbox.is_ordered() {
        return Err(ImageError::Geometry(format!("inverted box {bbox:?}")));
    }
    Ok(())
}

/// Validate a crop box against image dimensions.
pub(crate) fn check_crop(cropbox: PixelBox, (width, height): (u32, u32)) -> Result<(), ImageError> {
    if cropbox.is_empty() || !cropbox.fits_within(width, height) {
        return Err(ImageError::CropOutOfBounds {
            crop: cropbox,
            width,
            height,
        });
    }
    Ok(())
}
