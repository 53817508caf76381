//! pageimage: render document pages and annotate them in page coordinates.
//!
//! This crate renders a page through a pluggable [`PageRasterizer`], keeps
//! the result in an [`ImageHandler`] backend and exposes [`PageImage`], a
//! facade whose drawing verbs take page-space geometry and reproject it into
//! the pixel space of the render, including renders cropped down to a
//! sub-region of their root page.
//!
//! Two backends ship with the crate:
//!
//! - [`SkiaHandler`] (`"skia"`, the default) draws anti-aliased paths with
//!   `tiny-skia`.
//! - [`ArrayHandler`] (`"array"`) writes pixels of an `image::RgbaImage`
//!   directly.
//!
//! Further backends can be added to a [`HandlerRegistry`].
//!
//! # Example
//!
//! ```
//! use pageimage::{BBox, DocumentStream, DrawStyle, ImageOptions, PageImager, PageView};
//!
//! let page = PageView::new(DocumentStream::from_bytes(Vec::<u8>::new()), 1, 612.0, 792.0);
//! let imager = PageImager::default().with_options(ImageOptions {
//!     resolution: 144,
//!     ..ImageOptions::default()
//! });
//!
//! let region = page.crop(BBox::new(72.0, 72.0, 300.0, 200.0));
//! let mut image = imager.to_image(&region).unwrap();
//! image.draw_hline(100.0, &DrawStyle::default()).unwrap();
//! assert_eq!(image.size(), (456, 256));
//! ```

pub mod array;
pub mod codec;
pub mod error;
pub mod handler;
pub mod page_image;
pub mod registry;
pub mod render;
pub mod skia;

pub use array::ArrayHandler;
pub use codec::{ImageMode, OutputFormat};
pub use error::ImageError;
pub use handler::{HandlerContext, ImageHandler, SaveTarget};
pub use page_image::{ImageOptions, PageImage, PageImager};
pub use registry::{DEFAULT_BACKEND, HandlerConstructor, HandlerRegistry};
pub use render::{
    BlankRasterizer, DEFAULT_RESOLUTION, EncodedImageRasterizer, PageRasterizer, RenderRequest,
};
pub use skia::SkiaHandler;

pub use pageimage_core;
pub use pageimage_core::{
    Anchor, BBox, Bounded, Cell, Char, DEFAULT_FILL, DEFAULT_RADIUS, DEFAULT_STROKE,
    DEFAULT_STROKE_WIDTH, DocumentStream, DrawStyle, Edge, Intersection, Orientation, PageContent,
    PageFrame, PageView, PixelBox, Point, Reprojector, Rgba, Segment, Table, TableFinderDebug, Word,
    WordExtractor, WordOptions,
};
