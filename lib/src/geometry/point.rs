//! Point types.

use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// A 2D point in millimetres.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: CoordF,
    pub y: CoordF,
}

impl PointF {
    /// Create a new point.
    #[inline]
    pub const fn new(x: CoordF, y: CoordF) -> Self {
        Self { x, y }
    }

    /// Lift the point onto a plane at height `z`.
    #[inline]
    pub fn with_z(&self, z: CoordF) -> Point3F {
        Point3F::new(self.x, self.y, z)
    }
}

impl fmt::Debug for PointF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for PointF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// A 3D point in millimetres.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3F {
    pub x: CoordF,
    pub y: CoordF,
    pub z: CoordF,
}

impl Point3F {
    /// Create a new 3D point.
    #[inline]
    pub const fn new(x: CoordF, y: CoordF, z: CoordF) -> Self {
        Self { x, y, z }
    }

    /// Drop the Z component.
    #[inline]
    pub fn xy(&self) -> PointF {
        PointF::new(self.x, self.y)
    }

    /// Squared distance to another point.
    #[inline]
    pub fn distance_squared(&self, other: &Point3F) -> CoordF {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

impl Sub for Point3F {
    type Output = Point3F;

    fn sub(self, rhs: Point3F) -> Point3F {
        Point3F::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Debug for Point3F {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Point3F {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_squared() {
        let a = Point3F::new(0.0, 0.0, 0.0);
        let b = Point3F::new(2.0, 3.0, 6.0);
        assert!((a.distance_squared(&b) - 49.0).abs() < 1e-9);
        assert_eq!(b - a, b);
    }

    #[test]
    fn test_lift_and_drop() {
        let p = PointF::new(1.0, 2.0).with_z(3.0);
        assert_eq!(p, Point3F::new(1.0, 2.0, 3.0));
        assert_eq!(p.xy(), PointF::new(1.0, 2.0));
    }
}
