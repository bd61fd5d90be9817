//! Geometric primitives for diagram placement.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height of an element
//! - [`Bounds`] - An axis-aligned box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! Diorama uses screen coordinates:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! A node's position is its **top-left** corner, so a node at `(x, y)` with
//! size `(w, h)` covers `[x, x + w] × [y, y + h]`.

use serde::{Deserialize, Serialize};

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use diorama_core::geometry::Point;
/// let anchor = Point::new(400.0, 300.0);
/// let center = Point::new(100.0, 50.0);
///
/// let delta = anchor.sub_point(center);
/// assert_eq!(delta, Point::new(300.0, 250.0));
/// assert_eq!(center.add_point(delta), anchor);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
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

    /// Returns a copy of this point with a different x-coordinate
    pub fn with_x(self, x: f32) -> Self {
        Self { x, ..self }
    }

    /// Returns a copy of this point with a different y-coordinate
    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }

    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the coordinate along `axis`
    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Returns a copy of this point with the coordinate along `axis` replaced
    pub fn with_along(self, axis: Axis, value: f32) -> Self {
        match axis {
            Axis::Horizontal => self.with_x(value),
            Axis::Vertical => self.with_y(value),
        }
    }
}

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
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

    /// Returns true if both dimensions are finite and strictly positive
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// An axis-aligned box with minimum and maximum coordinates.
///
/// Serialized as `{"minX", "minY", "maxX", "maxY"}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a box from explicit extents
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a box centered on `center`
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a box whose top-left corner is `top_left`
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

    /// Returns the lower edge along `axis`
    pub fn min_along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.min_x,
            Axis::Vertical => self.min_y,
        }
    }

    /// Returns the upper edge along `axis`
    pub fn max_along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.max_x,
            Axis::Vertical => self.max_y,
        }
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the box
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the smallest box containing both `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use diorama_core::geometry::{Bounds, Point, Size};
    /// let step = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(160.0, 60.0));
    /// let decision = Bounds::new_from_top_left(Point::new(30.0, 120.0), Size::new(100.0, 100.0));
    ///
    /// let both = step.merge(&decision);
    /// assert_eq!(both.width(), 160.0);
    /// assert_eq!(both.height(), 220.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the box by `offset` without changing its size
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Grows the box outwards by `insets`
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left,
            min_y: self.min_y - insets.top,
            max_x: self.max_x + insets.right,
            max_y: self.max_y + insets.bottom,
        }
    }

    /// Returns the horizontal and vertical overlap amounts between two boxes.
    ///
    /// Each amount is `min(upper edges) - max(lower edges)` on that axis. The
    /// boxes intersect only when both amounts are strictly positive; boxes that
    /// merely touch yield zero on the touching axis.
    ///
    /// # Examples
    ///
    /// ```
    /// # use diorama_core::geometry::{Bounds, Point, Size};
    /// let left = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
    /// let right = Bounds::new_from_top_left(Point::new(50.0, 10.0), Size::new(100.0, 50.0));
    ///
    /// assert_eq!(left.overlap_extents(&right), (50.0, 40.0));
    /// ```
    pub fn overlap_extents(&self, other: &Self) -> (f32, f32) {
        (
            self.max_x.min(other.max_x) - self.min_x.max(other.min_x),
            self.max_y.min(other.max_y) - self.min_y.max(other.min_y),
        )
    }

    /// Returns true if the two boxes share a region of positive area
    pub fn intersects(&self, other: &Self) -> bool {
        let (horizontal, vertical) = self.overlap_extents(other);
        horizontal > 0.0 && vertical > 0.0
    }

    /// Returns true if `point` lies inside or on the edge of the box
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }
}

/// Spacing around a box, with potentially different values for each side
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates insets with the same value on every side
    pub fn uniform(value: f32) -> Self {
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
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Overlap extents do not depend on argument order.
    fn check_overlap_is_symmetric(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        let (ab_x, ab_y) = a.overlap_extents(&b);
        let (ba_x, ba_y) = b.overlap_extents(&a);

        prop_assert!(approx_eq!(f32, ab_x, ba_x));
        prop_assert!(approx_eq!(f32, ab_y, ba_y));
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        Ok(())
    }

    /// Merged bounds contain both inputs.
    fn check_merge_contains_both(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        let merged = a.merge(&b);

        for bounds in [a, b] {
            prop_assert!(merged.min_x() <= bounds.min_x());
            prop_assert!(merged.min_y() <= bounds.min_y());
            prop_assert!(merged.max_x() >= bounds.max_x());
            prop_assert!(merged.max_y() >= bounds.max_y());
        }
        Ok(())
    }

    /// Translating a box moves its center by the same offset.
    fn check_translate_moves_center(bounds: Bounds, offset: Point) -> Result<(), TestCaseError> {
        let moved = bounds.translate(offset).center();
        let expected = bounds.center().add_point(offset);

        prop_assert!(approx_eq!(f32, moved.x(), expected.x(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, moved.y(), expected.y(), epsilon = 0.01));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in bounds_strategy(), b in bounds_strategy()) {
            check_overlap_is_symmetric(a, b)?;
        }

        #[test]
        fn merge_contains_both(a in bounds_strategy(), b in bounds_strategy()) {
            check_merge_contains_both(a, b)?;
        }

        #[test]
        fn translate_moves_center(bounds in bounds_strategy(), offset in point_strategy()) {
            check_translate_moves_center(bounds, offset)?;
        }
    }
}
