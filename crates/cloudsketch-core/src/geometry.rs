//! Geometric primitives for block layout and path routing.
//!
//! Every element of a diagram is an axis-aligned rectangle, so the layout
//! engine and the route finder only ever need four small value types:
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Insets`] - Margin or padding values for four sides
//! - [`Bounds`] - A rectangle described by its top-left corner and size
//!
//! # Coordinate System
//!
//! Coordinates follow SVG conventions:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! An element's offset is the absolute position of its top-left corner.

use std::fmt;

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use cloudsketch_core::geometry::Point;
/// let offset = Point::new(10.0, 20.0);
/// let moved = offset.add_point(Point::new(5.0, -5.0));
/// assert_eq!(moved, Point::new(15.0, 15.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The dimensions of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Creates a new size with the specified width
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Creates a new size with the specified height
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Returns a new Size with the maximum width and height of both sizes
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns a new Size grown by the horizontal and vertical sums of `insets`
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Spacing around an element, with a value per side.
///
/// Values are given in CSS order: top, right, bottom, left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates insets with the same value on every side
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns a copy with `extra` added to the left side
    pub fn grow_left(mut self, extra: f32) -> Self {
        self.left += extra;
        self
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }

    /// The top-left corner offset inside these insets
    pub fn top_left(self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// An axis-aligned rectangle.
///
/// Bounds are built from an element's offset and size and are what the
/// route finder reasons about when testing segments against cards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Converts bounds to a Size
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns true if `point` lies strictly inside the rectangle.
    ///
    /// Points on an edge are not inside.
    pub fn contains_strict(self, point: Point) -> bool {
        self.min_x < point.x
            && point.x < self.max_x
            && self.min_y < point.y
            && point.y < self.max_y
    }

    /// Moves the bounds by the specified offset
    pub fn translate(self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 2.0);

        assert_eq!(a.add_point(b), Point::new(4.0, 6.0));
        assert_eq!(a.sub_point(b), Point::new(2.0, 2.0));
        assert_eq!(a.midpoint(b), Point::new(2.0, 3.0));
        assert_eq!(a.with_x(0.0).with_y(9.0), Point::new(0.0, 9.0));
    }

    #[test]
    fn test_size_add_padding() {
        let size = Size::new(100.0, 50.0).add_padding(Insets::new(30.0, 0.0, 0.0, 0.0));

        assert!(approx_eq!(f32, size.width(), 100.0));
        assert!(approx_eq!(f32, size.height(), 80.0));
    }

    #[test]
    fn test_size_max() {
        let size = Size::new(10.0, 50.0).max(Size::new(30.0, 20.0));

        assert_eq!(size, Size::new(30.0, 50.0));
    }

    #[test]
    fn test_insets_sums() {
        let insets = Insets::new(10.0, 15.0, 20.0, 15.0);

        assert!(approx_eq!(f32, insets.horizontal_sum(), 30.0));
        assert!(approx_eq!(f32, insets.vertical_sum(), 30.0));
        assert_eq!(insets.top_left(), Point::new(15.0, 10.0));
        assert!(approx_eq!(f32, insets.grow_left(15.0).left(), 30.0));
        assert_eq!(Insets::uniform(5.0), Insets::new(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn test_bounds_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(30.0, 40.0));

        assert!(approx_eq!(f32, bounds.max_x(), 40.0));
        assert!(approx_eq!(f32, bounds.max_y(), 60.0));
        assert_eq!(bounds.center(), Point::new(25.0, 40.0));
        assert_eq!(bounds.to_size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn test_bounds_contains_strict_excludes_edges() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));

        assert!(bounds.contains_strict(Point::new(5.0, 5.0)));
        assert!(!bounds.contains_strict(Point::new(0.0, 5.0)));
        assert!(!bounds.contains_strict(Point::new(10.0, 5.0)));
        assert!(!bounds.contains_strict(Point::new(5.0, 10.0)));
        assert!(!bounds.contains_strict(Point::new(11.0, 5.0)));
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        fn coordinate() -> impl Strategy<Value = f32> {
            -1000.0f32..1000.0
        }

        fn check_translate_preserves_size(
            x: f32,
            y: f32,
            w: f32,
            h: f32,
            dx: f32,
            dy: f32,
        ) -> Result<(), TestCaseError> {
            let bounds = Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h));
            let moved = bounds.translate(Point::new(dx, dy));

            prop_assert!(approx_eq!(f32, moved.width(), bounds.width(), epsilon = 0.01));
            prop_assert!(approx_eq!(f32, moved.height(), bounds.height(), epsilon = 0.01));
            Ok(())
        }

        fn check_center_is_inside(x: f32, y: f32, w: f32, h: f32) -> Result<(), TestCaseError> {
            let bounds = Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h));

            prop_assert!(bounds.contains_strict(bounds.center()));
            Ok(())
        }

        proptest! {
            #[test]
            fn translate_preserves_size(
                x in coordinate(),
                y in coordinate(),
                w in 0.0f32..500.0,
                h in 0.0f32..500.0,
                dx in coordinate(),
                dy in coordinate(),
            ) {
                check_translate_preserves_size(x, y, w, h, dx, dy)?;
            }

            #[test]
            fn center_is_inside(
                x in coordinate(),
                y in coordinate(),
                w in 1.0f32..500.0,
                h in 1.0f32..500.0,
            ) {
                check_center_is_inside(x, y, w, h)?;
            }
        }
    }
}
