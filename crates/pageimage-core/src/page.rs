//! Page providers: the boundary with the document/extraction layer.
//!
//! [`PageFrame`] is the geometry an image needs (stream, page number, bounding
//! box, root page). [`PageContent`] adds the extracted objects the debug
//! overlays draw. [`PageView`] implements both for callers that already hold
//! extracted content.

use crate::geometry::{BBox, Bounded, Point};
use crate::objects::{Char, Table, TableFinderDebug, Word};
use crate::stream::DocumentStream;
use crate::words::{WordExtractor, WordOptions};

/// Geometry and identity of a page, or of a sub-region cut from one.
pub trait PageFrame {
    /// Bytes of the document the page belongs to.
    fn stream(&self) -> &DocumentStream;

    /// Page number (1-based) of the root page within its document.
    fn page_number(&self) -> usize;

    /// Bounding box in the root page's coordinate system.
    fn bbox(&self) -> BBox;

    /// The page this one was derived from, or `None` for an original page.
    fn root_page(&self) -> Option<&dyn PageFrame>;

    fn width(&self) -> f64 {
        self.bbox().width()
    }

    fn height(&self) -> f64 {
        self.bbox().height()
    }

    /// True for a page read straight from the document.
    fn is_original(&self) -> bool {
        self.root_page().is_none()
    }

    /// Bounding box of the root page (this page's own box when original).
    fn root_bbox(&self) -> BBox {
        self.root_page().map_or_else(|| self.bbox(), |root| root.bbox())
    }
}

/// Extracted content of a page, used by the debug overlays.
pub trait PageContent: PageFrame {
    /// Settings forwarded to the table detector.
    type TableSettings: Default;

    /// Characters on the page.
    fn chars(&self) -> Vec<Char>;

    /// Words on the page.
    fn extract_words(&self, options: &WordOptions) -> Vec<Word>;

    /// Run table detection and return everything it found.
    fn debug_tablefinder(&self, settings: &Self::TableSettings) -> TableFinderDebug;

    fn find_tables(&self, settings: &Self::TableSettings) -> Vec<Table> {
        self.debug_tablefinder(settings).tables
    }
}

/// How [`PageView::crop`]-style filters decide object membership.
#[derive(Debug, Clone, Copy)]
enum FilterMode {
    /// Center of object falls within bbox.
    Crop,
    /// Object fully contained within bbox.
    Within,
}

impl FilterMode {
    fn keeps(self, object: BBox, region: &BBox) -> bool {
        match self {
            FilterMode::Crop => region.contains_point(object.center()),
            FilterMode::Within => region.contains(&object),
        }
    }
}

/// A page with pre-extracted content.
///
/// Cropping produces a derived view that keeps the root's coordinate system
/// and remembers the root page, so an image of the crop is cut out of a
/// render of the whole page.
#[derive(Debug, Clone)]
pub struct PageView {
    stream: DocumentStream,
    page_number: usize,
    bbox: BBox,
    root: Option<Box<PageView>>,
    chars: Vec<Char>,
    table_finder: TableFinderDebug,
}

impl PageView {
    /// Create an original page of the given size, origin at `(0, 0)`.
    pub fn new(stream: DocumentStream, page_number: usize, width: f64, height: f64) -> Self {
        Self {
            stream,
            page_number,
            bbox: BBox::new(0.0, 0.0, width, height),
            root: None,
            chars: Vec::new(),
            table_finder: TableFinderDebug::default(),
        }
    }

    pub fn with_chars(mut self, chars: Vec<Char>) -> Self {
        self.chars = chars;
        self
    }

    /// Attach the result of an external table-detection run.
    pub fn with_table_finder(mut self, table_finder: TableFinderDebug) -> Self {
        self.table_finder = table_finder;
        self
    }

    /// Derived view of `bbox`, keeping objects whose center falls inside.
    pub fn crop(&self, bbox: BBox) -> PageView {
        self.derive(bbox, FilterMode::Crop)
    }

    /// Derived view of `bbox`, keeping objects fully inside.
    pub fn within_bbox(&self, bbox: BBox) -> PageView {
        self.derive(bbox, FilterMode::Within)
    }

    fn derive(&self, bbox: BBox, mode: FilterMode) -> PageView {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => Box::new(self.without_content()),
        };
        let keep = |b: BBox| mode.keeps(b, &bbox);

        let chars = self.chars.iter().filter(|c| keep(c.bbox)).cloned().collect();
        let tables = self
            .table_finder
            .tables
            .iter()
            .filter(|t| keep(t.bbox))
            .cloned()
            .collect();
        let edges = self
            .table_finder
            .edges
            .iter()
            .filter(|e| keep(e.bbox()))
            .cloned()
            .collect();
        let intersections = self
            .table_finder
            .intersections
            .iter()
            .filter(|i| bbox.contains_point(Point::new(i.x, i.y)))
            .copied()
            .collect();

        PageView {
            stream: self.stream.clone(),
            page_number: self.page_number,
            bbox,
            root: Some(root),
            chars,
            table_finder: TableFinderDebug {
                tables,
                edges,
                intersections,
            },
        }
    }

    fn without_content(&self) -> PageView {
        PageView {
            stream: self.stream.clone(),
            page_number: self.page_number,
            bbox: self.bbox,
            root: None,
            chars: Vec::new(),
            table_finder: TableFinderDebug::default(),
        }
    }

    /// Tables attached to this view.
    pub fn tables(&self) -> &[Table] {
        &self.table_finder.tables
    }
}

impl PageFrame for PageView {
    fn stream(&self) -> &DocumentStream {
        &self.stream
    }

    fn page_number(&self) -> usize {
        self.page_number
    }

    fn bbox(&self) -> BBox {
        self.bbox
    }

    fn root_page(&self) -> Option<&dyn PageFrame> {
        self.root.as_deref().map(|root| root as &dyn PageFrame)
    }
}

impl PageContent for PageView {
    /// Detection already ran; the attached result is returned as-is.
    type TableSettings = ();

    fn chars(&self) -> Vec<Char> {
        self.chars.clone()
    }

    fn extract_words(&self, options: &WordOptions) -> Vec<Word> {
        WordExtractor::extract(&self.chars, options)
    }

    fn debug_tablefinder(&self, _settings: &()) -> TableFinderDebug {
        self.table_finder.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Cell, Edge, Intersection};

    fn page() -> PageView {
        let table = Table::from_cells(vec![
            Cell::new(BBox::new(100.0, 100.0, 200.0, 150.0)),
            Cell::new(BBox::new(200.0, 100.0, 300.0, 150.0)),
        ])
        .unwrap();
        PageView::new(DocumentStream::from_bytes(vec![0u8; 4]), 1, 612.0, 792.0)
            .with_chars(vec![
                Char::new("a", BBox::new(110.0, 110.0, 116.0, 120.0)),
                Char::new("b", BBox::new(116.0, 110.0, 122.0, 120.0)),
                Char::new("z", BBox::new(500.0, 700.0, 506.0, 710.0)),
            ])
            .with_table_finder(TableFinderDebug {
                tables: vec![table],
                edges: vec![Edge::horizontal(100.0, 100.0, 300.0)],
                intersections: vec![Intersection { x: 100.0, y: 100.0 }],
            })
    }

    #[test]
    fn test_original_page_is_its_own_root() {
        let p = page();
        assert!(p.is_original());
        assert_eq!(p.root_bbox(), p.bbox());
        assert_eq!(p.width(), 612.0);
        assert_eq!(p.height(), 792.0);
    }

    #[test]
    fn test_crop_points_at_root() {
        let p = page();
        let c = p.crop(BBox::new(90.0, 90.0, 310.0, 160.0));
        assert!(!c.is_original());
        assert_eq!(c.root_bbox(), BBox::new(0.0, 0.0, 612.0, 792.0));
        assert_eq!(c.bbox(), BBox::new(90.0, 90.0, 310.0, 160.0));
        assert_eq!(c.page_number(), 1);
        assert!(c.stream().same_source(p.stream()));
    }

    #[test]
    fn test_crop_filters_content() {
        let c = page().crop(BBox::new(90.0, 90.0, 310.0, 160.0));
        assert_eq!(c.chars().len(), 2);
        assert_eq!(c.tables().len(), 1);
        let words = c.extract_words(&WordOptions::default());
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "ab");
    }

    #[test]
    fn test_nested_crop_keeps_original_root() {
        let p = page();
        let outer = p.crop(BBox::new(50.0, 50.0, 400.0, 400.0));
        let inner = outer.within_bbox(BBox::new(100.0, 100.0, 200.0, 150.0));
        assert_eq!(inner.root_bbox(), p.bbox());
        assert!(inner.root_page().unwrap().is_original());
    }

    #[test]
    fn test_within_bbox_requires_full_containment() {
        let p = page();
        let c = p.within_bbox(BBox::new(100.0, 100.0, 250.0, 150.0));
        assert!(c.tables().is_empty());
        assert_eq!(c.chars().len(), 2);
    }

    #[test]
    fn test_debug_tablefinder_returns_attached_result() {
        let p = page();
        let found = p.debug_tablefinder(&());
        assert_eq!(found.tables.len(), 1);
        assert_eq!(found.edges.len(), 1);
        assert_eq!(found.intersections.len(), 1);
        assert_eq!(p.find_tables(&()).len(), 1);
    }
}
