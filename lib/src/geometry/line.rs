//! Line segment type.
//!
//! This module provides the Line type representing a line segment between two points.
//! Grid infill is expressed as a sequence of axis-aligned lines.

use super::PointF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line segment defined by two endpoints, in millimetres.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: PointF,
    pub b: PointF,
}

impl Line {
    /// Create a new line segment from two points.
    #[inline]
    pub const fn new(a: PointF, b: PointF) -> Self {
        Self { a, b }
    }

    /// True for a segment parallel to the Y axis (`x1 == x2`).
    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.a.x == self.b.x
    }

    /// True for a segment parallel to the X axis (`y1 == y2`).
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.a.y == self.b.y
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?} -> {:?})", self.a, self.b)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({:.3}, {:.3}) -> ({:.3}, {:.3})]",
            self.a.x, self.a.y, self.b.x, self.b.y
        )
    }
}
