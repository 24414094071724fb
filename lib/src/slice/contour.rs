//! Contour extraction from planar cross-sections.

use super::PlanarSection;
use crate::geometry::{Polygon, Polygons};
use log::warn;

/// Minimum number of points for an entity to count as a closed loop.
pub const MIN_CONTOUR_POINTS: usize = 4;

/// Resolve each entity of `section` into a polygon.
///
/// Entities are kept in their original order. An entity resolving to fewer
/// than [`MIN_CONTOUR_POINTS`] points, or referencing a vertex that does not
/// exist, is skipped with a warning.
pub fn extract_contours(section: &PlanarSection, layer_index: usize) -> Polygons {
    let mut contours = Polygons::with_capacity(section.entities.len());

    for (entity_index, entity) in section.entities.iter().enumerate() {
        let points: Option<Vec<_>> = entity
            .iter()
            .map(|&i| section.vertices.get(i).copied())
            .collect();

        let Some(points) = points else {
            warn!(
                "Skipping path {} at layer {}: vertex index out of range",
                entity_index, layer_index
            );
            continue;
        };

        if points.len() < MIN_CONTOUR_POINTS {
            warn!(
                "Skipping incomplete path {} at layer {} ({} points)",
                entity_index,
                layer_index,
                points.len()
            );
            continue;
        }

        contours.push(Polygon::from_points(points));
    }

    contours
}
