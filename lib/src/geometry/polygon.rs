//! Polygon type for closed contour loops.
//!
//! A [`Polygon`] keeps its points exactly as resolved. Loops taken from a
//! cross-section already end on their first point; G-code emission still
//! re-appends the first point after walking the loop.

use super::{BoundingBox, PointF};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// A closed polygon defined by a sequence of points.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<PointF>,
}

/// A collection of polygons.
pub type Polygons = Vec<Polygon>;

impl Polygon {
    /// Create a new empty polygon.
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a polygon from a vector of points.
    #[inline]
    pub fn from_points(points: Vec<PointF>) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle traced counter-clockwise from `min`.
    pub fn rectangle(min: PointF, max: PointF) -> Self {
        Self::from_points(vec![
            min,
            PointF::new(max.x, min.y),
            max,
            PointF::new(min.x, max.y),
        ])
    }

    /// Get the points of this polygon.
    #[inline]
    pub fn points(&self) -> &[PointF] {
        &self.points
    }

    /// Number of stored points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the polygon has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point, where the loop starts and ends.
    #[inline]
    pub fn first_point(&self) -> Option<PointF> {
        self.points.first().copied()
    }

    /// Get the bounding box of the polygon.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }
}

impl Deref for Polygon {
    type Target = [PointF];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl From<Vec<PointF>> for Polygon {
    fn from(points: Vec<PointF>) -> Self {
        Self::from_points(points)
    }
}

impl fmt::Debug for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polygon({} points)", self.points.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle() {
        let square = Polygon::rectangle(PointF::new(0.0, 0.0), PointF::new(10.0, 10.0));
        assert_eq!(square.len(), 4);
        assert_eq!(square.first_point(), Some(PointF::new(0.0, 0.0)));
    }

    #[test]
    fn test_bounding_box() {
        let square = Polygon::rectangle(PointF::new(-1.0, 2.0), PointF::new(3.0, 7.0));
        let bb = square.bounding_box();
        assert_eq!(bb.min, PointF::new(-1.0, 2.0));
        assert_eq!(bb.max, PointF::new(3.0, 7.0));
    }

    #[test]
    fn test_empty_polygon() {
        let poly = Polygon::new();
        assert!(poly.is_empty());
        assert_eq!(poly.first_point(), None);
        assert!(poly.bounding_box().is_empty());
    }
}
