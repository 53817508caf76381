//! Page image facade: page-space drawing on top of an [`ImageHandler`].
//!
//! [`PageImager`] renders a page's root at a resolution with a chosen
//! backend, crops the render down to the page when the page is a sub-region,
//! and hands back a [`PageImage`]. Every drawing verb on a `PageImage` takes
//! page-space geometry, runs it through the image's [`Reprojector`] and
//! forwards it to the backend.
//!
//! # Example
//!
//! ```
//! use pageimage::{DocumentStream, DrawStyle, PageImager, PageView};
//!
//! let page = PageView::new(DocumentStream::from_bytes(Vec::<u8>::new()), 1, 600.0, 800.0);
//! let imager = PageImager::default();
//! let mut image = imager.to_image(&page).unwrap();
//! image
//!     .draw_line(((10.0, 20.0), (50.0, 60.0)), &DrawStyle::default())
//!     .unwrap()
//!     .draw_rect((100.0, 100.0, 200.0, 150.0), &DrawStyle::rects_default())
//!     .unwrap();
//! let png = image.to_png().unwrap();
//! assert!(!png.is_empty());
//! ```

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use pageimage_core::{
    Anchor, BBox, Bounded, DEFAULT_RADIUS, DrawStyle, PageContent, PageFrame, Point, Reprojector,
    Rgba, Segment, Table, TableFinderDebug, WordOptions,
};
use tracing::{debug, warn};

use crate::codec::{ImageMode, OutputFormat};
use crate::error::ImageError;
use crate::handler::{HandlerContext, ImageHandler, SaveTarget};
use crate::registry::{DEFAULT_BACKEND, HandlerRegistry};
use crate::render::{BlankRasterizer, DEFAULT_RESOLUTION, PageRasterizer};

/// Radius of the intersection markers drawn by `debug_tablefinder`.
const INTERSECTION_RADIUS: f64 = 3.0;

/// Options controlling how page images are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImageOptions {
    /// Render resolution in dots per inch.
    pub resolution: u32,
    /// Registry tag of the backend to use.
    pub backend: String,
    /// Channel layout of the annotated image.
    pub mode: ImageMode,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            backend: DEFAULT_BACKEND.to_string(),
            mode: ImageMode::default(),
        }
    }
}

/// Produces [`PageImage`]s: holds the backend registry, the rasterizer and
/// the image options.
#[derive(Debug, Clone)]
pub struct PageImager {
    registry: HandlerRegistry,
    rasterizer: Arc<dyn PageRasterizer>,
    options: ImageOptions,
}

impl Default for PageImager {
    /// Blank pages, default registry and default options.
    fn default() -> Self {
        Self::new(Arc::new(BlankRasterizer))
    }
}

impl PageImager {
    pub fn new(rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self {
            registry: HandlerRegistry::default(),
            rasterizer,
            options: ImageOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &ImageOptions {
        &self.options
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for adding custom backends.
    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Render descriptor for the root of `page`.
    pub fn context_for<P: PageFrame + ?Sized>(&self, page: &P) -> HandlerContext {
        let root = page.root_bbox();
        HandlerContext {
            stream: page.stream().clone(),
            page_number: page.page_number(),
            resolution: self.options.resolution,
            page_size: (root.width(), root.height()),
            rasterizer: Arc::clone(&self.rasterizer),
        }
    }

    /// Render `page` with the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnknownBackend`] if the configured backend is
    /// not registered, or any rendering or cropping error.
    pub fn to_image<'p, P: PageFrame + ?Sized>(
        &self,
        page: &'p P,
    ) -> Result<PageImage<'p, P>, ImageError> {
        let handler = self
            .registry
            .create(&self.options.backend, self.context_for(page))?;
        PageImage::new(page, handler, self.options.mode)
    }

    /// Build an image of `page` from an existing handler instead of
    /// rendering again.
    ///
    /// The new image uses the source's backend and its images. The source
    /// must hold an uncropped render of the page's root.
    pub fn to_image_from<'p, P: PageFrame + ?Sized>(
        &self,
        page: &'p P,
        source: &(dyn ImageHandler + 'static),
    ) -> Result<PageImage<'p, P>, ImageError> {
        PageImage::new(page, dyn_clone::clone_box(source), self.options.mode)
    }
}

/// A rendered page with an annotation overlay drawn in page coordinates.
pub struct PageImage<'p, P: PageFrame + ?Sized> {
    page: &'p P,
    handler: Box<dyn ImageHandler>,
    reprojector: Reprojector,
    mode: ImageMode,
}

impl<'p, P: PageFrame + ?Sized> PageImage<'p, P> {
    /// Wrap a handler holding a render of `page`'s root.
    ///
    /// Computes the scale from the handler's image width, crops the image to
    /// the page when the page is a sub-region of its root, then resets the
    /// overlay in `mode`.
    pub fn new(
        page: &'p P,
        mut handler: Box<dyn ImageHandler>,
        mode: ImageMode,
    ) -> Result<Self, ImageError> {
        let bbox = page.bbox();
        let root_bbox = page.root_bbox();
        let (width, height) = handler.size();
        let reprojector = Reprojector::for_page(&bbox, &root_bbox, width);

        // Each render dimension is rounded up on its own, so the width-derived
        // scale can overshoot the last row or column.
        let cropbox = if page.is_original() {
            None
        } else {
            reprojector
                .crop_box(&bbox, &root_bbox)
                .map(|cropbox| cropbox.clamped(width, height))
        };
        if let Some(cropbox) = cropbox {
            handler.crop_original(cropbox)?;
        }
        handler.reset(Some(mode));

        debug!(
            page = page.page_number(),
            backend = handler.backend(),
            scale = reprojector.scale(),
            ?cropbox,
            "created page image"
        );
        Ok(Self {
            page,
            handler,
            reprojector,
            mode,
        })
    }

    /// The page this image annotates.
    pub fn page(&self) -> &'p P {
        self.page
    }

    /// Pixels per page unit.
    pub fn scale(&self) -> f64 {
        self.reprojector.scale()
    }

    pub fn reprojector(&self) -> &Reprojector {
        &self.reprojector
    }

    pub fn handler(&self) -> &(dyn ImageHandler + 'static) {
        self.handler.as_ref()
    }

    pub fn handler_mut(&mut self) -> &mut dyn ImageHandler {
        self.handler.as_mut()
    }

    /// Width and height of the image in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.handler.size()
    }

    /// The page render, cropped to the page.
    pub fn original(&self) -> RgbaImage {
        self.handler.original()
    }

    /// The page render with every annotation drawn so far.
    pub fn annotated(&self) -> RgbaImage {
        self.handler.annotated()
    }

    /// Replace the original image; the overlay is reset to it.
    pub fn set_original(&mut self, image: RgbaImage) -> Result<(), ImageError> {
        self.handler.set_original(image)
    }

    pub fn set_annotated(&mut self, image: RgbaImage) -> Result<(), ImageError> {
        self.handler.set_annotated(image)
    }

    /// Discard all annotations.
    pub fn reset(&mut self) -> &mut Self {
        self.handler.reset(Some(self.mode));
        self
    }

    /// An independent image of the same page with a fresh overlay.
    pub fn copy(&self) -> Self {
        let mut handler = self.handler.clone();
        handler.reset(Some(self.mode));
        Self {
            page: self.page,
            handler,
            reprojector: self.reprojector,
            mode: self.mode,
        }
    }

    fn project(&self, point: Point) -> Point {
        self.reprojector.reproject_point(point)
    }

    fn stroke_line(&mut self, from: Point, to: Point, style: &DrawStyle) -> Result<(), ImageError> {
        let (from, to) = (self.project(from), self.project(to));
        self.handler.line(from, to, style.stroke, style.stroke_width)
    }

    /// Draw a line between two page-space points.
    pub fn draw_line(
        &mut self,
        segment: impl Segment,
        style: &DrawStyle,
    ) -> Result<&mut Self, ImageError> {
        let (from, to) = segment.endpoints();
        self.stroke_line(from, to, style)?;
        Ok(self)
    }

    pub fn draw_lines<I>(&mut self, segments: I, style: &DrawStyle) -> Result<&mut Self, ImageError>
    where
        I: IntoIterator,
        I::Item: Segment,
    {
        for segment in segments {
            self.draw_line(segment, style)?;
        }
        Ok(self)
    }

    /// Draw a vertical line at `x` across the full height of the page.
    pub fn draw_vline(&mut self, x: f64, style: &DrawStyle) -> Result<&mut Self, ImageError> {
        let bbox = self.page.bbox();
        self.stroke_line(Point::new(x, bbox.top), Point::new(x, bbox.bottom), style)?;
        Ok(self)
    }

    pub fn draw_vlines<I>(&mut self, xs: I, style: &DrawStyle) -> Result<&mut Self, ImageError>
    where
        I: IntoIterator<Item = f64>,
    {
        for x in xs {
            self.draw_vline(x, style)?;
        }
        Ok(self)
    }

    /// Draw a horizontal line at `y` across the full width of the page.
    pub fn draw_hline(&mut self, y: f64, style: &DrawStyle) -> Result<&mut Self, ImageError> {
        let bbox = self.page.bbox();
        self.stroke_line(Point::new(bbox.x0, y), Point::new(bbox.x1, y), style)?;
        Ok(self)
    }

    pub fn draw_hlines<I>(&mut self, ys: I, style: &DrawStyle) -> Result<&mut Self, ImageError>
    where
        I: IntoIterator<Item = f64>,
    {
        for y in ys {
            self.draw_hline(y, style)?;
        }
        Ok(self)
    }

    /// Draw a filled rectangle with a border centered on its edges.
    ///
    /// The box is inset by half the stroke width and filled; when the stroke
    /// width is positive the four sides of the inset box are then stroked.
    pub fn draw_rect(
        &mut self,
        rect: impl Bounded,
        style: &DrawStyle,
    ) -> Result<&mut Self, ImageError> {
        let inner = rect.bbox().inset_clamped(style.stroke_width / 2.0);
        let projected = self.reprojector.reproject_bbox(&inner);
        self.handler
            .rectangle(projected, style.fill, Rgba::TRANSPARENT)?;

        if style.stroke_width > 0.0 {
            let (tl, br) = (inner.origin(), inner.far_corner());
            let (tr, bl) = (Point::new(br.x, tl.y), Point::new(tl.x, br.y));
            self.draw_lines([(tl, tr), (bl, br), (tl, bl), (tr, br)], style)?;
        }
        Ok(self)
    }

    pub fn draw_rects<I>(&mut self, rects: I, style: &DrawStyle) -> Result<&mut Self, ImageError>
    where
        I: IntoIterator,
        I::Item: Bounded,
    {
        for rect in rects {
            self.draw_rect(rect, style)?;
        }
        Ok(self)
    }

    /// Draw a circle of `radius` page units around `center`.
    pub fn draw_circle(
        &mut self,
        center: impl Anchor,
        radius: f64,
        style: &DrawStyle,
    ) -> Result<&mut Self, ImageError> {
        let c = center.anchor();
        let bbox = BBox::new(c.x - radius, c.y - radius, c.x + radius, c.y + radius);
        let projected = self.reprojector.reproject_bbox(&bbox);
        self.handler.ellipse(projected, style.fill, style.stroke)?;
        Ok(self)
    }

    pub fn draw_circles<I>(
        &mut self,
        centers: I,
        radius: f64,
        style: &DrawStyle,
    ) -> Result<&mut Self, ImageError>
    where
        I: IntoIterator,
        I::Item: Anchor,
    {
        for center in centers {
            self.draw_circle(center, radius, style)?;
        }
        Ok(self)
    }

    /// [`draw_circle`](Self::draw_circle) with the default radius.
    pub fn draw_point(
        &mut self,
        center: impl Anchor,
        style: &DrawStyle,
    ) -> Result<&mut Self, ImageError> {
        self.draw_circle(center, DEFAULT_RADIUS, style)
    }

    /// Outline every cell of `table`.
    pub fn debug_table(
        &mut self,
        table: &Table,
        style: &DrawStyle,
    ) -> Result<&mut Self, ImageError> {
        self.draw_rects(&table.cells, style)
    }

    /// Overlay a table-detection result: cells of every table, the edges
    /// considered, and the edge intersections.
    pub fn debug_tablefinder(
        &mut self,
        finder: &TableFinderDebug,
    ) -> Result<&mut Self, ImageError> {
        let rects = DrawStyle::rects_default();
        for table in &finder.tables {
            self.debug_table(table, &rects)?;
        }
        self.draw_lines(&finder.edges, &DrawStyle::edges_default())?;
        self.draw_circles(
            &finder.intersections,
            INTERSECTION_RADIUS,
            &DrawStyle::intersections_default(),
        )
    }

    /// Encode the annotated image.
    pub fn encode(&self, format: OutputFormat) -> Result<Vec<u8>, ImageError> {
        self.handler.encode(format)
    }

    /// The annotated image as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, ImageError> {
        self.encode(OutputFormat::Png)
    }

    /// Save the annotated image.
    ///
    /// Failures are logged and returned; nothing is written unless encoding
    /// succeeded.
    pub fn save<'t>(
        &self,
        target: impl Into<SaveTarget<'t>>,
        format: Option<OutputFormat>,
    ) -> Result<(), ImageError> {
        let target = target.into();
        let described = format!("{target:?}");
        self.handler.save(target, format).inspect_err(|err| {
            warn!(
                page = self.page.page_number(),
                target = %described,
                error = %err,
                "failed to save page image"
            );
        })
    }
}

impl<P: PageContent + ?Sized> PageImage<'_, P> {
    /// Run table detection on the page with `settings` and overlay the result.
    pub fn debug_tablefinder_with(
        &mut self,
        settings: &P::TableSettings,
    ) -> Result<&mut Self, ImageError> {
        let finder = self.page.debug_tablefinder(settings);
        self.debug_tablefinder(&finder)
    }

    /// Outline every word on the page.
    pub fn outline_words(
        &mut self,
        style: &DrawStyle,
        options: &WordOptions,
    ) -> Result<&mut Self, ImageError> {
        let words = self.page.extract_words(options);
        self.draw_rects(&words, style)
    }

    /// Outline every character on the page.
    pub fn outline_chars(&mut self, style: &DrawStyle) -> Result<&mut Self, ImageError> {
        let chars = self.page.chars();
        self.draw_rects(&chars, style)
    }
}

impl<P: PageFrame + ?Sized> fmt::Debug for PageImage<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageImage")
            .field("page_number", &self.page.page_number())
            .field("bbox", &self.page.bbox())
            .field("handler", &self.handler)
            .field("reprojector", &self.reprojector)
            .field("mode", &self.mode)
            .finish()
    }
}
