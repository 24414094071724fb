//! Cross-section data and the geometry source contract.
//!
//! Plane/solid intersection is not performed here. A [`GeometrySource`]
//! (a loaded mesh, or an in-memory fixture in tests) produces a
//! [`CrossSection`] per requested height, and the slicer only consumes it.

use crate::geometry::{Point3F, PointF};
use crate::CoordF;
use serde::{Deserialize, Serialize};

/// Vertical extent of a model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelExtent {
    pub min_z: CoordF,
    pub max_z: CoordF,
}

impl ModelExtent {
    /// Create an extent from its bounds.
    #[inline]
    pub const fn new(min_z: CoordF, max_z: CoordF) -> Self {
        Self { min_z, max_z }
    }

    /// Model height (`max_z - min_z`).
    #[inline]
    pub fn height(&self) -> CoordF {
        self.max_z - self.min_z
    }

    /// True when there is something to slice (`max_z > min_z`).
    #[inline]
    pub fn is_sliceable(&self) -> bool {
        self.max_z > self.min_z
    }
}

/// Intersection of a model with a horizontal plane.
///
/// `entities` are ordered index sequences into `vertices`, one path each.
/// Closed loops repeat their first index at the end.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    /// Height of the cutting plane.
    pub plane_z: CoordF,
    /// Intersection vertices in model space.
    pub vertices: Vec<Point3F>,
    /// Loops as index sequences into `vertices`.
    pub entities: Vec<Vec<usize>>,
}

impl CrossSection {
    /// Create a cross-section at `plane_z`.
    pub fn new(plane_z: CoordF, vertices: Vec<Point3F>, entities: Vec<Vec<usize>>) -> Self {
        Self {
            plane_z,
            vertices,
            entities,
        }
    }

    /// Number of entities.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// True if the section holds at least one entity.
    #[inline]
    pub fn has_entities(&self) -> bool {
        !self.entities.is_empty()
    }

    /// Project onto the cutting plane.
    ///
    /// Returns the planar vertices (same indices, same entities) and the
    /// transform lifting planar points back into model space.
    pub fn to_2d(&self) -> (PlanarSection, PlaneTransform) {
        let planar = PlanarSection {
            vertices: self.vertices.iter().map(Point3F::xy).collect(),
            entities: self.entities.clone(),
        };
        (planar, PlaneTransform { z: self.plane_z })
    }
}

/// A cross-section projected onto its plane.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanarSection {
    pub vertices: Vec<PointF>,
    pub entities: Vec<Vec<usize>>,
}

impl PlanarSection {
    /// Create a planar section.
    pub fn new(vertices: Vec<PointF>, entities: Vec<Vec<usize>>) -> Self {
        Self { vertices, entities }
    }
}

/// Transform from planar coordinates back to model space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaneTransform {
    pub z: CoordF,
}

impl PlaneTransform {
    /// Lift a planar point to model space.
    #[inline]
    pub fn to_3d(&self, p: PointF) -> Point3F {
        p.with_z(self.z)
    }
}

/// Anything that can be cut by horizontal planes.
pub trait GeometrySource {
    /// Vertical extent, or `None` for an empty model.
    fn extent(&self) -> Option<ModelExtent>;

    /// Cross-section at height `z`, or `None` when the plane misses the model.
    fn cross_section(&self, z: CoordF) -> Option<CrossSection>;
}

impl<T: GeometrySource + ?Sized> GeometrySource for &T {
    fn extent(&self) -> Option<ModelExtent> {
        (**self).extent()
    }

    fn cross_section(&self, z: CoordF) -> Option<CrossSection> {
        (**self).cross_section(z)
    }
}
