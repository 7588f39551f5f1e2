//! Core geometry types for layout
//!
//! Fundamental geometric primitives used throughout the table engine.
//! All units are CSS pixels.
//!
//! The coordinate system has its origin at the top-left corner: positive X
//! extends to the right, positive Y extends downward, matching CSS 2.1
//! Section 8.3.1.

use std::fmt;

/// A 2D point in CSS pixel space
///
/// # Examples
///
/// ```
/// use tableflow::Point;
///
/// let p = Point::new(10.0, 20.0);
/// assert_eq!(p.x, 10.0);
/// assert_eq!(Point::ZERO, Point::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate (increases to the right)
    pub x: f32,
    /// Y coordinate (increases downward)
    pub y: f32,
}

impl Point {
    /// The origin (0, 0)
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new point at the given coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translates this point by another point's coordinates
    ///
    /// # Examples
    ///
    /// ```
    /// use tableflow::Point;
    ///
    /// let moved = Point::new(10.0, 20.0).translate(Point::new(5.0, 3.0));
    /// assert_eq!(moved, Point::new(15.0, 23.0));
    /// ```
    pub fn translate(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A 2D size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    /// Width (horizontal extent)
    pub width: f32,
    /// Height (vertical extent)
    pub height: f32,
}

impl Size {
    /// A size with zero width and height
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new size with the given dimensions
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns true if either width or height is zero
    pub fn is_empty(self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle in CSS pixel space
///
/// Defined by an origin point (top-left corner) and a size.
///
/// # Examples
///
/// ```
/// use tableflow::{Point, Rect, Size};
///
/// let rect = Rect::new(Point::new(10.0, 20.0), Size::new(100.0, 50.0));
/// assert_eq!(rect.x(), 10.0);
/// assert_eq!(rect.max_x(), 110.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// The top-left corner of the rectangle
    pub origin: Point,
    /// The size of the rectangle
    pub size: Size,
}

impl Rect {
    /// A zero-sized rectangle at the origin
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    /// Creates a new rectangle from an origin point and size
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Creates a rectangle from x, y, width, height components
    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Returns the x coordinate of the left edge
    pub fn x(self) -> f32 {
        self.origin.x
    }

    /// Returns the y coordinate of the top edge
    pub fn y(self) -> f32 {
        self.origin.y
    }

    /// Returns the width
    pub fn width(self) -> f32 {
        self.size.width
    }

    /// Returns the height
    pub fn height(self) -> f32 {
        self.size.height
    }

    /// Returns the x coordinate of the right edge
    pub fn max_x(self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Returns the y coordinate of the bottom edge
    pub fn max_y(self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Returns this rectangle translated by an offset
    pub fn translate(self, offset: Point) -> Rect {
        Rect {
            origin: self.origin.translate(offset),
            size: self.size,
        }
    }

    /// Returns the smallest rectangle containing both rectangles
    ///
    /// # Examples
    ///
    /// ```
    /// use tableflow::Rect;
    ///
    /// let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
    /// let b = Rect::from_xywh(20.0, 5.0, 10.0, 10.0);
    /// assert_eq!(a.union(b), Rect::from_xywh(0.0, 0.0, 30.0, 15.0));
    /// ```
    pub fn union(self, other: Rect) -> Rect {
        let min_x = self.x().min(other.x());
        let min_y = self.y().min(other.y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.size, self.origin)
    }
}

/// Per-edge offsets (top, right, bottom, left) in CSS pixels
///
/// Used for padding, border widths, and the spacing margins that table
/// cells carry in the separated border model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeOffsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeOffsets {
    /// All-zero offsets
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Creates offsets from top, right, bottom, left values
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform offsets on all four edges
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Total horizontal extent (left + right)
    pub fn horizontal(self) -> f32 {
        self.left + self.right
    }

    /// Total vertical extent (top + bottom)
    pub fn vertical(self) -> f32 {
        self.top + self.bottom
    }
}
