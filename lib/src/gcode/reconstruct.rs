//! Toolpath reconstruction from G-code.
//!
//! Replays `G1` lines with sticky coordinates: an axis keeps its last value
//! until a line sets it again. Everything else (comments, machine-state
//! commands, `F`/`E` words) leaves the position untouched.

use crate::geometry::Point3F;
use crate::{CoordF, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Last known tool position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub x: Option<CoordF>,
    pub y: Option<CoordF>,
    /// Starts at 0.0 until a line sets it.
    pub z: CoordF,
}

impl Cursor {
    /// Current position, once X and Y are both known.
    pub fn position(&self) -> Option<Point3F> {
        Some(Point3F::new(self.x?, self.y?, self.z))
    }

    /// Apply one line.
    ///
    /// Returns the updated cursor and, for motion lines carrying X or Y, the
    /// position reached (once both X and Y are known).
    ///
    /// A Z-only move such as a layer change reports no point. The point list
    /// then has exactly one entry per planar move, but a path plotted from it
    /// shows no vertical segment between layers: the first move of a layer
    /// jumps straight from the last XY of the layer below to the new height.
    pub fn apply(self, line: &str) -> (Cursor, Option<Point3F>) {
        let code = line.split(';').next().unwrap_or_default();
        let mut words = code.split_whitespace();
        if words.next() != Some("G1") {
            return (self, None);
        }

        let mut next = self;
        let mut planar = false;
        for word in words {
            let mut chars = word.chars();
            let axis = chars.next();
            let Ok(value) = chars.as_str().parse::<CoordF>() else {
                continue;
            };
            match axis {
                Some('X') => {
                    next.x = Some(value);
                    planar = true;
                }
                Some('Y') => {
                    next.y = Some(value);
                    planar = true;
                }
                Some('Z') => next.z = value,
                _ => {}
            }
        }

        let point = if planar { next.position() } else { None };
        (next, point)
    }
}

/// Result of replaying a G-code stream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    /// Positions reached, in stream order.
    pub points: Vec<Point3F>,
    /// Cursor after the last line.
    pub cursor: Cursor,
}

impl Reconstruction {
    /// Fold step: apply one line.
    pub fn step(mut self, line: &str) -> Self {
        let (cursor, point) = self.cursor.apply(line);
        self.cursor = cursor;
        self.points.extend(point);
        self
    }

    /// No qualifying motion was found.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Component-wise minimum and maximum over all positions.
    pub fn bounds(&self) -> Option<(Point3F, Point3F)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Point3F::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3F::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }

    /// Distinct Z values, ascending.
    pub fn distinct_z_levels(&self) -> Vec<CoordF> {
        let mut levels: Vec<CoordF> = self.points.iter().map(|p| p.z).collect();
        levels.sort_by(|a, b| a.total_cmp(b));
        levels.dedup();
        levels
    }

    /// Positions as pretty JSON.
    pub fn points_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.points)
    }
}

/// Replay `lines` into positions.
pub fn reconstruct<I, S>(lines: I) -> Reconstruction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .fold(Reconstruction::default(), |acc, line| acc.step(line.as_ref()))
}

/// Read a G-code file and replay it.
pub fn reconstruct_file<P: AsRef<Path>>(path: P) -> Result<Reconstruction> {
    let content = fs::read_to_string(path)?;
    Ok(reconstruct(content.lines()))
}
