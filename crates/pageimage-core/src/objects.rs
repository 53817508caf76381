//! Page objects handed over by the extraction layer.
//!
//! These records carry only what annotation needs: a bounding box (and text
//! where it exists). Table detection itself happens elsewhere; a
//! [`TableFinderDebug`] is its inspectable result.

use crate::geometry::{Anchor, BBox, Bounded, Orientation, Point, Segment};

/// A single character extracted from a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// The text content of this character.
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
}

impl Char {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }

    /// True for spaces and other whitespace-only characters.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// A word extracted from a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    /// The text content of this word.
    pub text: String,
    /// Bounding box encompassing all constituent characters.
    pub bbox: BBox,
}

/// A detected table cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Bounding box of the cell.
    pub bbox: BBox,
    /// Text content within the cell, if any.
    pub text: Option<String>,
}

impl Cell {
    pub fn new(bbox: BBox) -> Self {
        Self { bbox, text: None }
    }
}

/// A detected table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    /// Bounding box enclosing the entire table.
    pub bbox: BBox,
    /// All cells in the table.
    pub cells: Vec<Cell>,
}

impl Table {
    /// Build a table whose bounding box is the union of its cells.
    ///
    /// Returns `None` for an empty cell list.
    pub fn from_cells(cells: Vec<Cell>) -> Option<Self> {
        let bbox = cells
            .iter()
            .map(|c| c.bbox)
            .reduce(|acc, b| acc.union(&b))?;
        Some(Self { bbox, cells })
    }
}

/// A line segment edge considered by table detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
    /// Edge orientation.
    pub orientation: Orientation,
}

impl Edge {
    pub fn horizontal(x0: f64, y: f64, x1: f64) -> Self {
        Self {
            x0,
            top: y,
            x1,
            bottom: y,
            orientation: Orientation::Horizontal,
        }
    }

    pub fn vertical(x: f64, top: f64, bottom: f64) -> Self {
        Self {
            x0: x,
            top,
            x1: x,
            bottom,
            orientation: Orientation::Vertical,
        }
    }
}

/// An intersection point between horizontal and vertical edges.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    /// X coordinate of the intersection point.
    pub x: f64,
    /// Y coordinate of the intersection point.
    pub y: f64,
}

/// Everything a table-detection run found on a page, for visual debugging.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableFinderDebug {
    pub tables: Vec<Table>,
    pub edges: Vec<Edge>,
    pub intersections: Vec<Intersection>,
}

impl Bounded for Char {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

impl Bounded for Word {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

impl Bounded for Cell {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

impl Bounded for Table {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

impl Bounded for Edge {
    fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.top, self.x1, self.bottom)
    }
}

impl Segment for Edge {
    fn endpoints(&self) -> (Point, Point) {
        (Point::new(self.x0, self.top), Point::new(self.x1, self.bottom))
    }
}

impl Anchor for Intersection {
    fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Anchor for Char {
    fn anchor(&self) -> Point {
        self.bbox.center()
    }
}

impl Anchor for Word {
    fn anchor(&self) -> Point {
        self.bbox.center()
    }
}

impl Anchor for Cell {
    fn anchor(&self) -> Point {
        self.bbox.center()
    }
}
