//! Shared helpers for pageimage integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use image::RgbaImage;
use pageimage::{
    BBox, DocumentStream, HandlerContext, ImageError, ImageHandler, ImageMode, OutputFormat,
    PageView, PixelBox, Point, Rgba,
};

/// A drawing call as seen by a backend, in image space.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Line { from: Point, to: Point, color: Rgba, width: f64 },
    Rectangle { bbox: BBox, fill: Rgba, outline: Rgba },
    Ellipse { bbox: BBox, fill: Rgba, stroke: Rgba },
    Crop(PixelBox),
}

pub type OpLog = Arc<Mutex<Vec<Op>>>;

/// Backend that renders like the real ones but only records drawing calls.
#[derive(Debug, Clone)]
pub struct RecordingHandler {
    context: HandlerContext,
    original: RgbaImage,
    annotated: RgbaImage,
    mode: ImageMode,
    log: OpLog,
}

impl RecordingHandler {
    pub fn open(context: HandlerContext, log: OpLog) -> Result<Self, ImageError> {
        let original = context.render()?;
        Ok(Self {
            context,
            annotated: original.clone(),
            original,
            mode: ImageMode::Rgba,
            log,
        })
    }

    fn record(&self, op: Op) {
        self.log.lock().unwrap().push(op);
    }
}

impl ImageHandler for RecordingHandler {
    fn backend(&self) -> &'static str {
        "recording"
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
        self.annotated = image;
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.original.dimensions()
    }

    fn crop_original(&mut self, cropbox: PixelBox) -> Result<(), ImageError> {
        self.record(Op::Crop(cropbox));
        self.original = image::imageops::crop_imm(
            &self.original,
            cropbox.x0,
            cropbox.y0,
            cropbox.width(),
            cropbox.height(),
        )
        .to_image();
        self.reset(None);
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64) -> Result<(), ImageError> {
        self.record(Op::Line { from, to, color, width });
        Ok(())
    }

    fn rectangle(&mut self, bbox: BBox, fill: Rgba, outline: Rgba) -> Result<(), ImageError> {
        self.record(Op::Rectangle { bbox, fill, outline });
        Ok(())
    }

    fn ellipse(&mut self, bbox: BBox, fill: Rgba, stroke: Rgba) -> Result<(), ImageError> {
        self.record(Op::Ellipse { bbox, fill, stroke });
        Ok(())
    }

    fn reset(&mut self, mode: Option<ImageMode>) {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        self.annotated = self.original.clone();
    }

    fn mode(&self) -> ImageMode {
        self.mode
    }

    fn encode(&self, _format: OutputFormat) -> Result<Vec<u8>, ImageError> {
        Ok(Vec::new())
    }
}

/// An original page of the given size backed by an empty stream.
pub fn blank_page(width: f64, height: f64) -> PageView {
    PageView::new(DocumentStream::from_bytes(Vec::<u8>::new()), 1, width, height)
}

/// Assert two points agree to within floating-point noise.
pub fn assert_point_eq(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

/// Assert two boxes agree to within floating-point noise.
pub fn assert_bbox_eq(actual: BBox, expected: BBox) {
    assert_point_eq(actual.origin(), expected.origin());
    assert_point_eq(actual.far_corner(), expected.far_corner());
}
