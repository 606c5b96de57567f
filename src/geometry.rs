//! Integer geometry primitives shared by the tree and its callers.
//!
//! All coordinates are `i32` and all areas are `i64`. Rectangles are
//! axis-aligned and stored corner-to-corner; a rectangle whose corners
//! coincide represents a single point.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in the integer 2D plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle spanning `bottom_left` to `top_right`.
///
/// Well-formed rectangles satisfy `bottom_left.x <= top_right.x` and
/// `bottom_left.y <= top_right.y`; [`crate::rtree::RTree::insert`] rejects
/// anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub bottom_left: Point,
    pub top_right: Point,
}

impl Rect {
    pub fn new(bottom_left: Point, top_right: Point) -> Self {
        Rect {
            bottom_left,
            top_right,
        }
    }

    /// Returns the degenerate rectangle covering exactly `point`.
    pub fn from_point(point: Point) -> Self {
        Rect {
            bottom_left: point,
            top_right: point,
        }
    }

    /// Returns true if both corners coincide.
    pub fn is_point(&self) -> bool {
        self.bottom_left == self.top_right
    }

    /// Returns the area of the rectangle (zero for points).
    ///
    /// Side lengths are widened to `i64` before multiplying, so the result is
    /// exact whenever both sides fit in `i64` after subtraction, i.e. for any
    /// `i32` corner coordinates.
    pub fn area(&self) -> i64 {
        let width = i64::from(self.top_right.x) - i64::from(self.bottom_left.x);
        let height = i64::from(self.top_right.y) - i64::from(self.bottom_left.y);
        width * height
    }

    /// Returns the smallest rectangle that contains both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            bottom_left: Point {
                x: self.bottom_left.x.min(other.bottom_left.x),
                y: self.bottom_left.y.min(other.bottom_left.y),
            },
            top_right: Point {
                x: self.top_right.x.max(other.top_right.x),
                y: self.top_right.y.max(other.top_right.y),
            },
        }
    }

    /// Returns the additional area required to enlarge `self` to cover `other`.
    pub fn enlargement(&self, other: &Rect) -> i64 {
        self.union(other).area() - self.area()
    }

    /// Returns true if this rectangle overlaps `other`.
    ///
    /// Rectangles that merely touch at an edge or a corner count as
    /// overlapping.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let x_min = self.bottom_left.x.max(other.bottom_left.x);
        let x_max = self.top_right.x.min(other.top_right.x);
        let y_min = self.bottom_left.y.max(other.bottom_left.y);
        let y_max = self.top_right.y.min(other.top_right.y);
        x_min <= x_max && y_min <= y_max
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.bottom_left, self.top_right)
    }
}
