//! pageimage-core: Raster-independent types for page image annotation.
//!
//! This crate provides the page-space geometry ([`BBox`], [`Point`],
//! [`PixelBox`]), the [`Reprojector`] that maps page space into the pixel
//! space of a rendered image, colors and draw styles, the page-object records
//! produced by extraction, and the [`PageFrame`] / [`PageContent`] traits
//! through which a document layer hands pages to the imaging layer.
//! It has no raster dependencies.

pub mod color;
pub mod geometry;
pub mod objects;
pub mod page;
pub mod reproject;
pub mod stream;
pub mod words;

pub use color::{
    DEFAULT_FILL, DEFAULT_RADIUS, DEFAULT_STROKE, DEFAULT_STROKE_WIDTH, DrawStyle, Rgba,
};
pub use geometry::{Anchor, BBox, Bounded, Orientation, PixelBox, Point, Segment};
pub use objects::{Cell, Char, Edge, Intersection, Table, TableFinderDebug, Word};
pub use page::{PageContent, PageFrame, PageView};
pub use reproject::Reprojector;
pub use stream::DocumentStream;
pub use words::{DEFAULT_X_TOLERANCE, DEFAULT_Y_TOLERANCE, WordExtractor, WordOptions};
