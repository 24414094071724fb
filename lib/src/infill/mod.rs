//! Infill pattern generation module.
//!
//! A single fixed-spacing orthogonal grid is supported. Lines are laid over
//! the layer bounding box and clipped to it; no polygon clipping is done,
//! so the grid also covers concave regions and holes inside the box.
//!
//! # Algorithm
//!
//! 1. Vertical lines at `x = min_x + k * spacing` while `x <= max_x`, full Y span
//! 2. Horizontal lines at `y = min_y + k * spacing` while `y <= max_y`, full X span

use crate::geometry::{BoundingBox, Line, PointF};
use crate::CoordF;

/// Orthogonal grid infill generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridInfill {
    spacing: CoordF,
}

impl GridInfill {
    /// Create a grid generator with the given line spacing (mm).
    pub fn new(spacing: CoordF) -> Self {
        Self { spacing }
    }

    /// Whether the spacing can produce any lines.
    pub fn is_valid(&self) -> bool {
        self.spacing.is_finite() && self.spacing > 0.0
    }

    /// Generate grid segments over `bounds`, vertical lines first.
    pub fn generate(&self, bounds: &BoundingBox) -> Vec<Line> {
        if !self.is_valid() || bounds.is_empty() || !bounds_are_finite(bounds) {
            return Vec::new();
        }

        let (min, max) = (bounds.min, bounds.max);
        let mut lines = Vec::new();

        for x in grid_positions(min.x, max.x, self.spacing) {
            lines.push(Line::new(PointF::new(x, min.y), PointF::new(x, max.y)));
        }
        for y in grid_positions(min.y, max.y, self.spacing) {
            lines.push(Line::new(PointF::new(min.x, y), PointF::new(max.x, y)));
        }

        lines
    }
}

/// Generate grid segments over `bounds` at `spacing`.
pub fn generate_grid(bounds: &BoundingBox, spacing: CoordF) -> Vec<Line> {
    GridInfill::new(spacing).generate(bounds)
}

fn bounds_are_finite(bounds: &BoundingBox) -> bool {
    [bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y]
        .iter()
        .all(|v| v.is_finite())
}

/// Positions `start + k * spacing` up to and including `end`.
fn grid_positions(start: CoordF, end: CoordF, spacing: CoordF) -> impl Iterator<Item = CoordF> {
    (0usize..)
        .map(move |k| start + k as CoordF * spacing)
        .take_while(move |&v| v <= end)
}
