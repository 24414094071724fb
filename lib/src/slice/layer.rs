//! Layer representation.

use crate::geometry::{BoundingBox, Polygons};
use crate::CoordF;

/// A single accepted layer.
///
/// `index` is dense and zero-based over the accepted layers, so it can differ
/// from the candidate height index when cross-sections were rejected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layer {
    /// Position in the accepted layer list.
    pub index: usize,
    /// Height of the cutting plane (mm).
    pub z_height: CoordF,
    /// Perimeter loops, in extraction order.
    pub contours: Polygons,
}

impl Layer {
    /// Create a layer.
    pub fn new(index: usize, z_height: CoordF, contours: Polygons) -> Self {
        Self {
            index,
            z_height,
            contours,
        }
    }

    /// True if at least one valid contour survived extraction.
    #[inline]
    pub fn has_contours(&self) -> bool {
        !self.contours.is_empty()
    }

    /// Number of contours.
    #[inline]
    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    /// Bounding box over every contour vertex of this layer.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for contour in &self.contours {
            bb.merge(&contour.bounding_box());
        }
        bb
    }
}
