use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x < self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y < self.origin.y + self.size.height
    }
}

/// Edge values for insets and border widths
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayType {
    None,
    #[default]
    Flex,
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    Undefined,
    LeftToRight,
    RightToLeft,
}

/// Geometry computed by an external layout pass and consumed read-only by
/// the differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub frame: Rect,
    pub content_insets: EdgeInsets,
    pub border_width: EdgeInsets,
    pub display_type: DisplayType,
    pub layout_direction: LayoutDirection,
    pub point_scale_factor: f64,
}

impl LayoutMetrics {
    /// Sentinel meaning "layout never ran for this node". The flattener
    /// leaves the accumulated offset untouched for such nodes.
    pub const EMPTY: LayoutMetrics = LayoutMetrics {
        frame: Rect {
            origin: Point {
                x: f64::MIN,
                y: f64::MIN,
            },
            size: Size {
                width: 0.0,
                height: 0.0,
            },
        },
        content_insets: EdgeInsets {
            left: 0.0,
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
        },
        border_width: EdgeInsets {
            left: 0.0,
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
        },
        display_type: DisplayType::Flex,
        layout_direction: LayoutDirection::Undefined,
        point_scale_factor: 1.0,
    };

    pub fn with_frame(frame: Rect) -> Self {
        Self {
            frame,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            frame: Rect::default(),
            content_insets: EdgeInsets::default(),
            border_width: EdgeInsets::default(),
            display_type: DisplayType::default(),
            layout_direction: LayoutDirection::default(),
            point_scale_factor: 1.0,
        }
    }
}
