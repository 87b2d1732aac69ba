//! Raw decoder output: positioned, styled text runs.

/// An axis-aligned rectangle in top-origin page coordinates.
///
/// `y0` is the top edge and `y1` the bottom edge, so sorting by `y0`
/// ascending walks a page top to bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// True for zero-width or zero-height boxes (stray glyph artifacts).
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Vertical distance between two boxes, 0.0 when they overlap vertically.
    pub fn vertical_gap(&self, other: &BBox) -> f32 {
        if other.y0 > self.y1 {
            other.y0 - self.y1
        } else if self.y0 > other.y1 {
            self.y0 - other.y1
        } else {
            0.0
        }
    }

    /// Horizontal distance between two boxes, 0.0 when they overlap
    /// horizontally.
    pub fn horizontal_gap(&self, other: &BBox) -> f32 {
        if other.x0 > self.x1 {
            other.x0 - self.x1
        } else if self.x0 > other.x1 {
            self.x0 - other.x1
        } else {
            0.0
        }
    }

    /// Whether the two boxes share any vertical extent.
    pub fn overlaps_vertically(&self, other: &BBox) -> bool {
        self.y0 < other.y1 && other.y0 < self.y1
    }
}

/// A minimal unit of positioned text as reported by the PDF decoder.
///
/// Spans are read once per document and never mutated; `order_index` is the
/// extraction order within the page and is unique per page.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// Decoded text content
    pub text: String,

    /// Position on the page, top-origin coordinates
    pub bbox: BBox,

    /// Zero-based page index
    pub page: usize,

    /// Effective font size in points
    pub font_size: f32,

    /// Base font name (e.g. "Helvetica-Bold")
    pub font_name: String,

    /// Whether the font carries a bold style marker
    pub is_bold: bool,

    /// Extraction order within the page, reading-order tiebreak
    pub order_index: usize,
}

impl Span {
    /// Create a span, deriving boldness from the font name.
    pub fn new(
        text: impl Into<String>,
        bbox: BBox,
        page: usize,
        font_size: f32,
        font_name: impl Into<String>,
        order_index: usize,
    ) -> Self {
        let font_name = font_name.into();
        let is_bold = is_bold_font(&font_name);
        Self {
            text: text.into(),
            bbox,
            page,
            font_size,
            font_name,
            is_bold,
            order_index,
        }
    }

    /// Number of characters in the span text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Check a font name for bold style markers.
pub(crate) fn is_bold_font(font_name: &str) -> bool {
    let lower = font_name.to_lowercase();
    lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_union() {
        let a = BBox::new(10.0, 20.0, 50.0, 32.0);
        let b = BBox::new(55.0, 18.0, 90.0, 30.0);
        let u = a.union(&b);
        assert_eq!(u.x0, 10.0);
        assert_eq!(u.y0, 18.0);
        assert_eq!(u.x1, 90.0);
        assert_eq!(u.y1, 32.0);
    }

    #[test]
    fn test_bbox_gaps() {
        let upper = BBox::new(50.0, 100.0, 200.0, 112.0);
        let lower = BBox::new(50.0, 118.0, 200.0, 130.0);
        assert_eq!(upper.vertical_gap(&lower), 6.0);
        assert_eq!(lower.vertical_gap(&upper), 6.0);
        assert_eq!(upper.horizontal_gap(&lower), 0.0);

        let left = BBox::new(50.0, 100.0, 90.0, 112.0);
        let right = BBox::new(95.0, 100.0, 140.0, 112.0);
        assert_eq!(left.horizontal_gap(&right), 5.0);
        assert!(left.overlaps_vertically(&right));
        assert_eq!(left.vertical_gap(&right), 0.0);
    }

    #[test]
    fn test_bbox_degenerate() {
        assert!(BBox::new(10.0, 10.0, 10.0, 20.0).is_degenerate());
        assert!(BBox::new(10.0, 10.0, 20.0, 10.0).is_degenerate());
        assert!(!BBox::new(10.0, 10.0, 20.0, 20.0).is_degenerate());
    }

    #[test]
    fn test_bold_detection() {
        let bold = Span::new(
            "Heading",
            BBox::new(0.0, 0.0, 50.0, 12.0),
            0,
            14.0,
            "Arial-BoldMT",
            0,
        );
        assert!(bold.is_bold);

        let regular = Span::new(
            "body",
            BBox::new(0.0, 0.0, 40.0, 10.0),
            0,
            10.0,
            "TimesNewRoman",
            1,
        );
        assert!(!regular.is_bold);
        assert!(is_bold_font("NotoSans-Black"));
        assert!(is_bold_font("Helvetica-Heavy"));
    }
}
