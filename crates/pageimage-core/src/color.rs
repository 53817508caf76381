//! Colors and draw styles for page annotations.
//!
//! Colors are straight (non-premultiplied) 8-bit RGBA. Backends blend them
//! over the annotated image using source-over compositing.

/// Straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const GREEN: Rgba = Rgba::rgb(0, 255, 0);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 255);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// True when drawing with this color leaves pixels unchanged.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

impl From<(u8, u8, u8)> for Rgba {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgba::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Rgba {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Rgba::new(r, g, b, a)
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Rgba::new(r, g, b, a)
    }
}

/// Default rectangle and circle fill: translucent blue.
pub const DEFAULT_FILL: Rgba = Rgba::BLUE.with_alpha(50);
/// Default stroke: mostly opaque red.
pub const DEFAULT_STROKE: Rgba = Rgba::RED.with_alpha(200);
/// Default stroke width in page units.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;
/// Default circle radius in page units.
pub const DEFAULT_RADIUS: f64 = 5.0;

/// Fill, stroke and stroke width used by the drawing verbs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrawStyle {
    /// Interior color of rectangles and circles.
    pub fill: Rgba,
    /// Color of lines, borders and circle outlines.
    pub stroke: Rgba,
    /// Line width in image pixels; rectangles are also inset by half of it
    /// in page units. Zero disables rectangle borders.
    pub stroke_width: f64,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            fill: DEFAULT_FILL,
            stroke: DEFAULT_STROKE,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl DrawStyle {
    /// Style for table cells and generic rectangles.
    pub fn rects_default() -> Self {
        Self::default()
    }

    /// Style for character outlines: opaque red border, quarter-alpha red fill.
    pub fn chars_default() -> Self {
        Self {
            fill: Rgba::RED.with_alpha(255 / 4),
            stroke: Rgba::RED,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    /// Style for table-finder edges.
    pub fn edges_default() -> Self {
        Self {
            stroke_width: 1.0,
            ..Self::default()
        }
    }

    /// Style for table-finder intersection markers.
    pub fn intersections_default() -> Self {
        Self {
            fill: Rgba::TRANSPARENT,
            stroke: Rgba::BLUE.with_alpha(200),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    pub fn with_fill(self, fill: impl Into<Rgba>) -> Self {
        Self {
            fill: fill.into(),
            ..self
        }
    }

    pub fn with_stroke(self, stroke: impl Into<Rgba>) -> Self {
        Self {
            stroke: stroke.into(),
            ..self
        }
    }

    pub fn with_stroke_width(self, stroke_width: f64) -> Self {
        Self {
            stroke_width,
            ..self
        }
    }
}
