//! Slicing module - converts a solid model into layers.
//!
//! This module contains the layer sequencing and contour extraction:
//! - [`Slicer`] - Layer sequencer driving a [`GeometrySource`]
//! - [`Layer`] - A single accepted layer with its contours
//! - [`CrossSection`] / [`PlanarSection`] - Cross-section data handed over by the geometry source
//! - [`extract_contours`] - Entity/vertex arrays to closed polygons

mod contour;
mod layer;
mod section;
mod slicer;

pub use contour::{extract_contours, MIN_CONTOUR_POINTS};
pub use layer::Layer;
pub use section::{CrossSection, GeometrySource, ModelExtent, PlanarSection, PlaneTransform};
pub use slicer::{slice_heights, Slicer};
