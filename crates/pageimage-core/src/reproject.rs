//! Page-space to image-space reprojection.
//!
//! A rendered image always covers a *root* page at some resolution. When the
//! page being annotated is a sub-region of that root, the image is cropped to
//! the sub-region, so page-space coordinates must first be shifted from the
//! page's origin to the root's origin and then scaled to pixels:
//!
//! ```text
//! image = (page + root_origin - page_origin) * scale
//! ```

use crate::geometry::{BBox, PixelBox, Point};

/// Maps page-space geometry into the pixel space of one rendered image.
///
/// The scale and offset are fixed when the image is rendered; every overlay
/// drawn on that image must go through the same `Reprojector`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reprojector {
    scale: f64,
    /// `root_origin - page_origin`, in page units.
    offset: Point,
}

impl Reprojector {
    /// Create a reprojector from an explicit scale and the two origins.
    pub fn new(scale: f64, page_origin: Point, root_origin: Point) -> Self {
        Self {
            scale,
            offset: Point::new(root_origin.x - page_origin.x, root_origin.y - page_origin.y),
        }
    }

    /// Create the reprojector for a page rendered as part of `root_bbox`
    /// into an image `image_width` pixels wide.
    ///
    /// The scale is `image_width / root_bbox.width()`.
    pub fn for_page(page_bbox: &BBox, root_bbox: &BBox, image_width: u32) -> Self {
        let scale = f64::from(image_width) / root_bbox.width();
        Self::new(scale, page_bbox.origin(), root_bbox.origin())
    }

    /// Pixels per page unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Page-space translation applied before scaling.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// True when no origin correction applies (the page is its own root).
    pub fn is_pure_scale(&self) -> bool {
        self.offset.x == 0.0 && self.offset.y == 0.0
    }

    /// Map a page-space point into image space.
    pub fn reproject_point(&self, point: Point) -> Point {
        Point::new(
            (point.x + self.offset.x) * self.scale,
            (point.y + self.offset.y) * self.scale,
        )
    }

    /// Map a page-space bounding box into image space, corner by corner.
    pub fn reproject_bbox(&self, bbox: &BBox) -> BBox {
        BBox::from_corners(
            self.reproject_point(bbox.origin()),
            self.reproject_point(bbox.far_corner()),
        )
    }

    /// Scale a page-space length into pixels.
    pub fn scale_length(&self, length: f64) -> f64 {
        length * self.scale
    }

    /// Pixel crop box that cuts `page_bbox` out of a render of `root_bbox`.
    ///
    /// Returns `None` when the page is not a proper sub-region of its root.
    /// Coordinates are truncated toward zero.
    pub fn crop_box(&self, page_bbox: &BBox, root_bbox: &BBox) -> Option<PixelBox> {
        if page_bbox == root_bbox {
            return None;
        }
        let s = self.scale;
        let image_box = BBox::new(
            (page_bbox.x0 - root_bbox.x0) * s,
            (page_bbox.top - root_bbox.top) * s,
            (page_bbox.x1 - root_bbox.x0) * s,
            (page_bbox.bottom - root_bbox.top) * s,
        );
        Some(PixelBox::from_bbox_truncated(&image_box))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_root_page_is_pure_scale() {
        let page = BBox::new(0.0, 0.0, 600.0, 800.0);
        let r = Reprojector::for_page(&page, &page, 1200);
        assert!(r.is_pure_scale());
        assert_eq!(r.scale(), 2.0);
        for p in [Point::new(0.0, 0.0), Point::new(13.5, 7.25), Point::new(600.0, 800.0)] {
            let q = r.reproject_point(p);
            assert!(approx(q.x, p.x * 2.0));
            assert!(approx(q.y, p.y * 2.0));
        }
    }

    #[test]
    fn test_line_scenario_600_to_1200() {
        let page = BBox::new(0.0, 0.0, 600.0, 800.0);
        let r = Reprojector::for_page(&page, &page, 1200);
        assert_eq!(r.reproject_point(Point::new(10.0, 20.0)), Point::new(20.0, 40.0));
        assert_eq!(r.reproject_point(Point::new(50.0, 60.0)), Point::new(100.0, 120.0));
    }

    #[test]
    fn test_sub_region_translates_then_scales() {
        let root = BBox::new(0.0, 0.0, 600.0, 800.0);
        let page = BBox::new(100.0, 200.0, 300.0, 350.0);
        let r = Reprojector::for_page(&page, &root, 1200);
        assert!(!r.is_pure_scale());

        let origin = r.reproject_point(page.origin());
        assert!(approx(origin.x, 0.0));
        assert!(approx(origin.y, 0.0));

        let full = r.reproject_bbox(&page);
        assert!(approx(full.width(), page.width() * r.scale()));
        assert!(approx(full.height(), page.height() * r.scale()));
    }

    #[test]
    fn test_sub_region_of_offset_root() {
        let root = BBox::new(50.0, 50.0, 650.0, 850.0);
        let page = BBox::new(150.0, 250.0, 250.0, 300.0);
        let r = Reprojector::for_page(&page, &root, 600);
        assert_eq!(r.scale(), 1.0);
        assert_eq!(r.reproject_point(Point::new(160.0, 260.0)), Point::new(60.0, 60.0));
    }

    #[test]
    fn test_crop_box_none_for_root() {
        let root = BBox::new(0.0, 0.0, 600.0, 800.0);
        let r = Reprojector::for_page(&root, &root, 600);
        assert_eq!(r.crop_box(&root, &root), None);
    }

    #[test]
    fn test_crop_box_matches_sub_region_size() {
        let root = BBox::new(0.0, 0.0, 600.0, 800.0);
        let page = BBox::new(100.0, 200.0, 300.0, 350.0);
        let r = Reprojector::for_page(&page, &root, 1200);
        let crop = r.crop_box(&page, &root).unwrap();
        assert_eq!(crop, PixelBox::new(200, 400, 600, 700));
        assert_eq!(crop.width() as f64, page.width() * r.scale());
        assert_eq!(crop.height() as f64, page.height() * r.scale());
    }

    #[test]
    fn test_crop_box_truncates_fractional_pixels() {
        let root = BBox::new(0.0, 0.0, 612.0, 792.0);
        let page = BBox::new(10.3, 20.7, 100.9, 200.2);
        let r = Reprojector::for_page(&page, &root, 612);
        assert_eq!(r.crop_box(&page, &root), Some(PixelBox::new(10, 20, 100, 200)));
    }

    #[test]
    fn test_scale_length() {
        let page = BBox::new(0.0, 0.0, 72.0, 72.0);
        let r = Reprojector::for_page(&page, &page, 200);
        assert!(approx(r.scale_length(72.0), 200.0));
    }
}
