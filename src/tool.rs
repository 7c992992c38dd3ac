use egui::Color32;

use crate::canvas::Canvas;
use crate::config::DrawingConfig;

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The closed set of drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    #[default]
    Freehand,
    Line,
    Rectangle,
    Ellipse,
    Eraser,
}

impl ToolKind {
    /// All tools in selector and shortcut order (`1` through `5`).
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Freehand,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Eraser,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Freehand => "Pen",
            Self::Line => "Line",
            Self::Rectangle => "Rectangle",
            Self::Ellipse => "Ellipse",
            Self::Eraser => "Eraser",
        }
    }

    /// Tool bound to the digit key `index` (1-based).
    pub fn from_shortcut(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Freehand and eraser write into the canvas on every move instead of at release.
    pub fn is_incremental(self) -> bool {
        matches!(self, Self::Freehand | Self::Eraser)
    }

    pub fn paint_mode(self) -> PaintMode {
        match self {
            Self::Eraser => PaintMode::Clear,
            _ => PaintMode::Color,
        }
    }
}

/// How rasterised pixels are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    /// Write the stroke color, fully opaque.
    Color,
    /// Write full transparency.
    Clear,
}

/// Everything the rasteriser needs besides geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color32,
    pub width: u32,
    pub mode: PaintMode,
}

impl StrokeStyle {
    pub fn from_config(config: &DrawingConfig) -> Self {
        Self {
            color: config.color,
            width: config.width(),
            mode: config.tool.paint_mode(),
        }
    }
}

/// Axis-aligned rectangle with non-negative extent, whatever the drag direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ShapeRect {
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// A shape being dragged out by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    kind: ToolKind,
    start: Point,
    end: Point,
}

impl Shape {
    pub fn new(kind: ToolKind, anchor: Point) -> Self {
        Self {
            kind,
            start: anchor,
            end: anchor,
        }
    }

    /// Record the initial anchor.
    pub fn start(&mut self, anchor: Point) {
        self.start = anchor;
        self.end = anchor;
    }

    /// Record the current anchor pair. Incremental tools pass the last and
    /// current pointer positions, shape tools pass the press point and the
    /// current position.
    pub fn update(&mut self, from: Point, to: Point) {
        self.start = from;
        self.end = to;
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn start_point(&self) -> Point {
        self.start
    }

    pub fn end_point(&self) -> Point {
        self.end
    }

    pub fn bounds(&self) -> ShapeRect {
        ShapeRect::from_corners(self.start, self.end)
    }

    /// Rasterise the shape into `canvas`.
    pub fn draw(&self, canvas: &mut Canvas, style: &StrokeStyle) {
        match self.kind {
            ToolKind::Freehand | ToolKind::Eraser | ToolKind::Line => {
                canvas.draw_segment(self.start, self.end, style)
            }
            ToolKind::Rectangle => canvas.draw_rect(self.bounds(), style),
            ToolKind::Ellipse => canvas.draw_ellipse(self.bounds(), style),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_mapping() {
        assert_eq!(ToolKind::from_shortcut(1), Some(ToolKind::Freehand));
        assert_eq!(ToolKind::from_shortcut(3), Some(ToolKind::Rectangle));
        assert_eq!(ToolKind::from_shortcut(5), Some(ToolKind::Eraser));
        assert_eq!(ToolKind::from_shortcut(0), None);
        assert_eq!(ToolKind::from_shortcut(6), None);
    }

    #[test]
    fn test_eraser_clears() {
        assert_eq!(ToolKind::Eraser.paint_mode(), PaintMode::Clear);
        assert_eq!(ToolKind::Freehand.paint_mode(), PaintMode::Color);
        assert!(ToolKind::Eraser.is_incremental());
        assert!(!ToolKind::Ellipse.is_incremental());
    }

    #[test]
    fn test_rect_normalized_for_every_drag_direction() {
        let a = Point::new(100, 100);
        let corners = [
            Point::new(50, 50),
            Point::new(150, 50),
            Point::new(50, 150),
            Point::new(150, 150),
        ];
        for b in corners {
            let forward = ShapeRect::from_corners(a, b);
            let backward = ShapeRect::from_corners(b, a);
            assert_eq!(forward, backward);
            assert!(forward.width() >= 0);
            assert!(forward.height() >= 0);
        }
    }

    #[test]
    fn test_reverse_drag_rect() {
        let mut shape = Shape::new(ToolKind::Rectangle, Point::new(100, 100));
        shape.update(Point::new(100, 100), Point::new(50, 50));
        let bounds = shape.bounds();
        assert_eq!(bounds.top_left(), Point::new(50, 50));
        assert_eq!(bounds.bottom_right(), Point::new(100, 100));
    }

    #[test]
    fn test_start_resets_both_anchors() {
        let mut shape = Shape::new(ToolKind::Line, Point::new(1, 2));
        shape.update(Point::new(1, 2), Point::new(30, 40));
        shape.start(Point::new(7, 8));
        assert_eq!(shape.start_point(), Point::new(7, 8));
        assert_eq!(shape.end_point(), Point::new(7, 8));
    }
}
