//! Geometry primitives for the slicer.
//!
//! This module provides the geometric types used throughout the toolpath pipeline:
//! - [`PointF`] and [`Point3F`] - 2D and 3D points in millimetres
//! - [`Line`] - Line segment between two points (infill segments)
//! - [`Polygon`] - Contour loop resolved from a cross-section
//! - [`BoundingBox`] - Axis-aligned 2D bounding box
//!
//! ## Coordinate System
//!
//! All coordinates are unscaled `f64` millimetres. G-code is written with two
//! decimals, so no integer scaling is applied internally.

mod bounding_box;
mod line;
mod point;
mod polygon;

pub use bounding_box::BoundingBox;
pub use line::Line;
pub use point::{Point3F, PointF};
pub use polygon::{Polygon, Polygons};
