//! Page rasterization: the seam to the rendering engine.
//!
//! A [`PageRasterizer`] turns one page of a document stream into pixels.
//! Whatever it returns is flattened onto white and made opaque before a
//! handler sees it.

use std::fmt;

use image::RgbaImage;
use pageimage_core::DocumentStream;

use crate::error::ImageError;

/// Resolution used when none is requested, in dots per inch.
pub const DEFAULT_RESOLUTION: u32 = 72;

/// Page units per inch.
const POINTS_PER_INCH: f64 = 72.0;

/// What to render.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub stream: &'a DocumentStream,
    /// 0-based page index.
    pub page_index: usize,
    /// Dots per inch.
    pub resolution: u32,
    /// Width and height of the page in page units.
    pub page_size: (f64, f64),
}

impl RenderRequest<'_> {
    /// Pixel dimensions of the page at the requested resolution.
    pub fn pixel_size(&self) -> (u32, u32) {
        let scale = f64::from(self.resolution) / POINTS_PER_INCH;
        let px = |v: f64| (v * scale).ceil().max(1.0) as u32;
        (px(self.page_size.0), px(self.page_size.1))
    }
}

/// Renders document pages to RGBA images.
pub trait PageRasterizer: fmt::Debug + Send + Sync {
    /// Rasterize the requested page.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Render`] if the page cannot be rendered.
    fn rasterize(&self, request: &RenderRequest<'_>) -> Result<RgbaImage, ImageError>;
}

/// Renders every page as a blank white sheet of the right size.
///
/// Useful when only the overlays matter, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankRasterizer;

impl PageRasterizer for BlankRasterizer {
    fn rasterize(&self, request: &RenderRequest<'_>) -> Result<RgbaImage, ImageError> {
        let (w, h) = request.pixel_size();
        Ok(RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255])))
    }
}

/// Treats the document stream as a single encoded raster page
/// (a scanned PNG, JPEG, BMP or TIFF).
///
/// The image is used at its native size; `resolution` is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodedImageRasterizer;

impl PageRasterizer for EncodedImageRasterizer {
    fn rasterize(&self, request: &RenderRequest<'_>) -> Result<RgbaImage, ImageError> {
        if request.page_index != 0 {
            return Err(ImageError::Render {
                page_number: request.page_index + 1,
                reason: "an encoded image stream holds a single page".to_string(),
            });
        }
        let decoded =
            image::load_from_memory(request.stream.bytes()).map_err(|e| ImageError::Render {
                page_number: 1,
                reason: e.to_string(),
            })?;
        Ok(decoded.to_rgba8())
    }
}

/// Composite a rendered page over white and drop its transparency.
pub(crate) fn flatten_onto_white(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        let [r, g, b, a] = px.0;
        if a == 255 {
            continue;
        }
        let alpha = u32::from(a);
        let over = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        px.0 = [over(r), over(g), over(b), 255];
    }
}
