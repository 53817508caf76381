//! Array-backed image handler.
//!
//! Keeps both images as plain `image::RgbaImage` pixel arrays and draws by
//! writing pixels directly. A pixel is covered by a shape when its center
//! lies inside the shape; there is no anti-aliasing. Colors are blended with
//! straight-alpha source-over compositing.
//!
//! Cropping applies the same crop to the annotated buffer, so annotations
//! inside the kept region survive a crop.

use std::fmt;

use image::RgbaImage;
use image::imageops;
use pageimage_core::{BBox, PixelBox, Point, Rgba};
use tracing::debug;

use crate::codec::{ImageMode, OutputFormat, encode_rgba, make_opaque};
use crate::error::ImageError;
use crate::handler::{HandlerContext, ImageHandler, check_bbox, check_crop, check_points};

/// Pixel-array backend.
#[derive(Clone)]
pub struct ArrayHandler {
    context: HandlerContext,
    original: RgbaImage,
    annotated: RgbaImage,
    mode: ImageMode,
}

impl ArrayHandler {
    /// Registry tag.
    pub const TAG: &'static str = "array";

    /// Render the page described by `context`.
    pub fn open(context: HandlerContext) -> Result<Self, ImageError> {
        let original = context.render()?;
        Ok(Self::with_original(context, original))
    }

    /// Wrap an already rendered original image.
    pub fn with_original(context: HandlerContext, original: RgbaImage) -> Self {
        Self {
            context,
            annotated: original.clone(),
            original,
            mode: ImageMode::default(),
        }
    }

    /// Registry constructor.
    pub fn boxed(context: HandlerContext) -> Result<Box<dyn ImageHandler>, ImageError> {
        Ok(Box::new(Self::open(context)?))
    }

    /// Borrow the original pixel array.
    pub fn original_buffer(&self) -> &RgbaImage {
        &self.original
    }

    /// Borrow the annotated pixel array.
    pub fn annotated_buffer(&self) -> &RgbaImage {
        &self.annotated
    }

    /// Mutably borrow the annotated pixel array for custom drawing.
    pub fn annotated_buffer_mut(&mut self) -> &mut RgbaImage {
        &mut self.annotated
    }
}

impl fmt::Debug for ArrayHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayHandler")
            .field("context", &self.context)
            .field("size", &self.original.dimensions())
            .field("mode", &self.mode)
            .finish()
    }
}

impl ImageHandler for ArrayHandler {
    fn backend(&self) -> &'static str {
        Self::TAG
    }

    fn context(&self) -> &HandlerContext {
        &self.context
    }

    fn original(&self) -> RgbaImage {
        self.original.clone()
    }

    fn annotated(&self) -> RgbaImage {
        self.annotated.clone()
    }

    fn set_original(&mut self, image: RgbaImage) -> Result<(), ImageError> {
        self.original = image;
        self.reset(None);
        Ok(())
    }

    fn set_annotated(&mut self, image: RgbaImage) -> Result<(), ImageError> {
        let expected = self.original.dimensions();
        if image.dimensions() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: image.dimensions(),
            });
        }
        self.annotated = image;
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.original.dimensions()
    }

    fn crop_original(&mut self, cropbox: PixelBox) -> Result<(), ImageError> {
        check_crop(cropbox, self.size())?;
        let (x, y, w, h) = (cropbox.x0, cropbox.y0, cropbox.width(), cropbox.height());
        self.original = imageops::crop_imm(&self.original, x, y, w, h).to_image();
        self.annotated = imageops::crop_imm(&self.annotated, x, y, w, h).to_image();
        debug!(backend = Self::TAG, ?cropbox, "cropped original and annotated images");
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64) -> Result<(), ImageError> {
        check_points(&[from, to])?;
        stroke_segment(&mut self.annotated, from, to, width, color);
        Ok(())
    }

    fn rectangle(&mut self, bbox: BBox, fill: Rgba, outline: Rgba) -> Result<(), ImageError> {
        check_bbox(&bbox)?;
        let Some((xs, ys)) = covered_span(&self.annotated, &bbox) else {
            return Ok(());
        };
        for y in ys.0..=ys.1 {
            for x in xs.0..=xs.1 {
                let border = x == xs.0 || x == xs.1 || y == ys.0 || y == ys.1;
                let color = if border && !outline.is_transparent() { outline } else { fill };
                blend(self.annotated.get_pixel_mut(x, y), color);
            }
        }
        Ok(())
    }

    fn ellipse(&mut self, bbox: BBox, fill: Rgba, stroke: Rgba) -> Result<(), ImageError> {
        check_bbox(&bbox)?;
        let (rx, ry) = (bbox.width() / 2.0, bbox.height() / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return Ok(());
        }
        let Some((xs, ys)) = covered_span(&self.annotated, &bbox) else {
            return Ok(());
        };
        let c = bbox.center();
        let (irx, iry) = (rx - 1.0, ry - 1.0);
        for y in ys.0..=ys.1 {
            for x in xs.0..=xs.1 {
                let dx = f64::from(x) + 0.5 - c.x;
                let dy = f64::from(y) + 0.5 - c.y;
                if (dx / rx).powi(2) + (dy / ry).powi(2) > 1.0 {
                    continue;
                }
                let inner =
                    irx > 0.0 && iry > 0.0 && (dx / irx).powi(2) + (dy / iry).powi(2) <= 1.0;
                let color = if inner { fill } else { stroke };
                blend(self.annotated.get_pixel_mut(x, y), color);
            }
        }
        Ok(())
    }

    fn reset(&mut self, mode: Option<ImageMode>) {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        self.annotated = self.original.clone();
        if self.mode == ImageMode::Rgb {
            make_opaque(&mut self.annotated);
        }
        debug!(backend = Self::TAG, mode = ?self.mode, "reset annotated image");
    }

    fn mode(&self) -> ImageMode {
        self.mode
    }

    fn encode(&self, format: OutputFormat) -> Result<Vec<u8>, ImageError> {
        encode_rgba(&self.annotated, format, self.mode)
    }
}

/// Straight-alpha source-over blend of `color` onto one pixel.
fn blend(px: &mut image::Rgba<u8>, color: Rgba) {
    match color.a {
        0 => {}
        255 => px.0 = color.to_array(),
        a => {
            let sa = f32::from(a) / 255.0;
            let da = f32::from(px.0[3]) / 255.0;
            let out_a = sa + da * (1.0 - sa);
            let mix = |s: u8, d: u8| {
                ((f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a).round() as u8
            };
            px.0 = [
                mix(color.r, px.0[0]),
                mix(color.g, px.0[1]),
                mix(color.b, px.0[2]),
                (out_a * 255.0).round() as u8,
            ];
        }
    }
}

/// Inclusive pixel index range whose centers fall in `[lo, hi]`, clipped to `[0, len)`.
fn center_range(lo: f64, hi: f64, len: u32) -> Option<(u32, u32)> {
    if len == 0 {
        return None;
    }
    let first = (lo - 0.5).ceil().max(0.0);
    let last = (hi - 0.5).floor().min(f64::from(len - 1));
    if first > last {
        return None;
    }
    Some((first as u32, last as u32))
}

type Span = (u32, u32);

fn covered_span(image: &RgbaImage, bbox: &BBox) -> Option<(Span, Span)> {
    let xs = center_range(bbox.x0, bbox.x1, image.width())?;
    let ys = center_range(bbox.top, bbox.bottom, image.height())?;
    Some((xs, ys))
}

/// Paint every pixel whose center lies within a `width`-wide band around
/// the segment, with flat caps. The band is half-open across the segment so
/// a one-pixel line on a pixel boundary covers exactly one row or column.
fn stroke_segment(image: &mut RgbaImage, from: Point, to: Point, width: f64, color: Rgba) {
    if color.is_transparent() {
        return;
    }
    let half = (width / 2.0).max(0.5);
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = dx.hypot(dy);
    let bounds = BBox::new(
        from.x.min(to.x) - half,
        from.y.min(to.y) - half,
        from.x.max(to.x) + half,
        from.y.max(to.y) + half,
    );
    let Some((xs, ys)) = covered_span(image, &bounds) else {
        return;
    };
    for y in ys.0..=ys.1 {
        for x in xs.0..=xs.1 {
            let px = f64::from(x) + 0.5 - from.x;
            let py = f64::from(y) + 0.5 - from.y;
            let inside = if len == 0.0 {
                px.abs() < half && py.abs() < half
            } else {
                let along = (px * dx + py * dy) / len;
                let across = (px * dy - py * dx) / len;
                (0.0..=len).contains(&along) && across >= -half && across < half
            };
            if inside {
                blend(image.get_pixel_mut(x, y), color);
            }
        }
    }
}
