//! Axis-aligned bounding box.

use super::PointF;
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D axis-aligned bounding box in millimetres.
///
/// An empty box (no points merged yet) has `min > max` and contains nothing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: PointF,
    pub max: PointF,
}

impl BoundingBox {
    /// Create a bounding box from explicit corners.
    #[inline]
    pub const fn new(min: PointF, max: PointF) -> Self {
        Self { min, max }
    }

    /// Create an empty bounding box.
    pub fn empty() -> Self {
        Self {
            min: PointF::new(CoordF::INFINITY, CoordF::INFINITY),
            max: PointF::new(CoordF::NEG_INFINITY, CoordF::NEG_INFINITY),
        }
    }

    /// Bounding box of a set of points.
    pub fn from_points(points: &[PointF]) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.merge_point(*p);
        }
        bb
    }

    /// Grow the box to include a point.
    pub fn merge_point(&mut self, p: PointF) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Grow the box to include another box.
    pub fn merge(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.merge_point(other.min);
        self.merge_point(other.max);
    }

    /// True if no point has been merged.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, p: PointF) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// Width along X.
    #[inline]
    pub fn width(&self) -> CoordF {
        self.max.x - self.min.x
    }

    /// Height along Y.
    #[inline]
    pub fn height(&self) -> CoordF {
        self.max.y - self.min.y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.min, self.max)
    }
}
