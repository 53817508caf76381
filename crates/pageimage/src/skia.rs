//! Raster-drawing image handler built on `tiny-skia`.
//!
//! Shapes are filled and stroked as anti-aliased paths. Pixmaps store
//! premultiplied color, so images are converted on the way in and out.
//!
//! Cropping replaces the original with the cropped region and then resets
//! the annotated image to it; annotations drawn before a crop are dropped.

use std::fmt;

use image::RgbaImage;
use pageimage_core::{BBox, PixelBox, Point, Rgba};
use tiny_skia::{ColorU8, FillRule, IntRect, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::debug;

use crate::codec::{ImageMode, OutputFormat, encode_rgba};
use crate::error::ImageError;
use crate::handler::{HandlerContext, ImageHandler, check_bbox, check_crop, check_points};

/// Width of rectangle and ellipse outlines, in pixels.
const OUTLINE_WIDTH: f32 = 1.0;

/// `tiny-skia` backend.
#[derive(Clone)]
pub struct SkiaHandler {
    context: HandlerContext,
    original: Pixmap,
    annotated: Pixmap,
    mode: ImageMode,
}

impl SkiaHandler {
    /// Registry tag.
    pub const TAG: &'static str = "skia";

    /// Render the page described by `context`.
    pub fn open(context: HandlerContext) -> Result<Self, ImageError> {
        let original = context.render()?;
        Self::with_original(context, &original)
    }

    /// Wrap an already rendered original image.
    pub fn with_original(
        context: HandlerContext,
        original: &RgbaImage,
    ) -> Result<Self, ImageError> {
        let original = to_pixmap(original)?;
        Ok(Self {
            context,
            annotated: original.clone(),
            original,
            mode: ImageMode::default(),
        })
    }

    /// Registry constructor.
    pub fn boxed(context: HandlerContext) -> Result<Box<dyn ImageHandler>, ImageError> {
        Ok(Box::new(Self::open(context)?))
    }

    /// Borrow the annotated pixmap.
    pub fn pixmap(&self) -> &Pixmap {
        &self.annotated
    }

    /// Mutably borrow the annotated pixmap for custom drawing.
    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.annotated
    }
}

impl fmt::Debug for SkiaHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkiaHandler")
            .field("context", &self.context)
            .field("size", &(self.original.width(), self.original.height()))
            .field("mode", &self.mode)
            .finish()
    }
}

impl ImageHandler for SkiaHandler {
    fn backend(&self) -> &'static str {
        Self::TAG
    }

    fn context(&self) -> &HandlerContext {
        &self.context
    }

    fn original(&self) -> RgbaImage {
        to_rgba_image(&self.original)
    }

    fn annotated(&self) -> RgbaImage {
        to_rgba_image(&self.annotated)
    }

    fn set_original(&mut self, image: RgbaImage) -> Result<(), ImageError> {
        self.original = to_pixmap(&image)?;
        self.reset(None);
        Ok(())
    }

    fn set_annotated(&mut self, image: RgbaImage) -> Result<(), ImageError> {
        let expected = self.size();
        if image.dimensions() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: image.dimensions(),
            });
        }
        self.annotated = to_pixmap(&image)?;
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.original.width(), self.original.height())
    }

    fn crop_original(&mut self, cropbox: PixelBox) -> Result<(), ImageError> {
        let size = self.size();
        check_crop(cropbox, size)?;
        let out_of_bounds = || ImageError::CropOutOfBounds {
            crop: cropbox,
            width: size.0,
            height: size.1,
        };
        let x = i32::try_from(cropbox.x0).map_err(|_| out_of_bounds())?;
        let y = i32::try_from(cropbox.y0).map_err(|_| out_of_bounds())?;
        let rect = IntRect::from_xywh(x, y, cropbox.width(), cropbox.height())
            .ok_or_else(out_of_bounds)?;
        self.original = self.original.clone_rect(rect).ok_or_else(out_of_bounds)?;
        self.reset(None);
        debug!(backend = Self::TAG, ?cropbox, "cropped original image");
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64) -> Result<(), ImageError> {
        check_points(&[from, to])?;
        if color.is_transparent() {
            return Ok(());
        }
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return Ok(());
        };
        let stroke = Stroke {
            width: width as f32,
            ..Stroke::default()
        };
        self.annotated
            .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
        Ok(())
    }

    fn rectangle(&mut self, bbox: BBox, fill: Rgba, outline: Rgba) -> Result<(), ImageError> {
        check_bbox(&bbox)?;
        if !fill.is_transparent() {
            if let Some(rect) = to_rect(&bbox) {
                self.annotated
                    .fill_rect(rect, &paint(fill), Transform::identity(), None);
            }
        }
        if outline.is_transparent() {
            return Ok(());
        }
        if let Some(rect) = to_rect(&bbox.inset(f64::from(OUTLINE_WIDTH) / 2.0)) {
            let path = PathBuilder::from_rect(rect);
            self.annotated.stroke_path(
                &path,
                &paint(outline),
                &outline_stroke(),
                Transform::identity(),
                None,
            );
        }
        Ok(())
    }

    fn ellipse(&mut self, bbox: BBox, fill: Rgba, stroke: Rgba) -> Result<(), ImageError> {
        check_bbox(&bbox)?;
        if !fill.is_transparent() {
            if let Some(path) = to_rect(&bbox).and_then(PathBuilder::from_oval) {
                self.annotated.fill_path(
                    &path,
                    &paint(fill),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
        if stroke.is_transparent() {
            return Ok(());
        }
        let ring =
            to_rect(&bbox.inset(f64::from(OUTLINE_WIDTH) / 2.0)).and_then(PathBuilder::from_oval);
        if let Some(path) = ring {
            self.annotated.stroke_path(
                &path,
                &paint(stroke),
                &outline_stroke(),
                Transform::identity(),
                None,
            );
        }
        Ok(())
    }

    fn reset(&mut self, mode: Option<ImageMode>) {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        self.annotated = self.original.clone();
        if self.mode == ImageMode::Rgb {
            for px in self.annotated.pixels_mut() {
                let c = px.demultiply();
                *px = ColorU8::from_rgba(c.red(), c.green(), c.blue(), 255).premultiply();
            }
        }
        debug!(backend = Self::TAG, mode = ?self.mode, "reset annotated image");
    }

    fn mode(&self) -> ImageMode {
        self.mode
    }

    fn encode(&self, format: OutputFormat) -> Result<Vec<u8>, ImageError> {
        match (format, self.mode) {
            (OutputFormat::Png, ImageMode::Rgba) => self
                .annotated
                .encode_png()
                .map_err(|e| ImageError::Png(e.to_string())),
            _ => encode_rgba(&to_rgba_image(&self.annotated), format, self.mode),
        }
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn outline_stroke() -> Stroke {
    Stroke {
        width: OUTLINE_WIDTH,
        ..Stroke::default()
    }
}

fn to_rect(bbox: &BBox) -> Option<Rect> {
    Rect::from_ltrb(
        bbox.x0 as f32,
        bbox.top as f32,
        bbox.x1 as f32,
        bbox.bottom as f32,
    )
}

fn to_pixmap(image: &RgbaImage) -> Result<Pixmap, ImageError> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(ImageError::Allocation(width, height))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    image
}
