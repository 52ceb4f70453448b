//! Bed geometry
//!
//! Positions are integer micrometres in bed space, origin at the front-left
//! corner of the printable area.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of lift motors (and measured corners)
pub const CORNER_COUNT: usize = 4;

/// One of the four lift motors / measurement corners
///
/// The index doubles as the motor-select line number, so a `Corner`
/// can only ever name one of the four motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Corner(u8);

impl Corner {
    /// All corners in measurement order
    pub const ALL: [Corner; CORNER_COUNT] = [Corner(0), Corner(1), Corner(2), Corner(3)];

    /// First corner measured in a pass
    pub const FIRST: Corner = Corner(0);

    /// Create a corner from a motor index (0-3)
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < CORNER_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Array index of this corner
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The corner after this one, or `None` after the last
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corner {}", self.0)
    }
}

/// A point on the bed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BedPoint {
    /// X position in micrometres
    pub x_um: i32,
    /// Y position in micrometres
    pub y_um: i32,
}

impl BedPoint {
    /// Create a point from micrometre coordinates
    pub const fn new(x_um: i32, y_um: i32) -> Self {
        Self { x_um, y_um }
    }

    /// Create a point from whole-millimetre coordinates
    pub const fn from_mm(x_mm: i32, y_mm: i32) -> Self {
        Self {
            x_um: x_mm * 1000,
            y_um: y_mm * 1000,
        }
    }
}

/// Printable bed area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BedGeometry {
    /// Bed size along X in micrometres
    pub width_um: i32,
    /// Bed size along Y in micrometres
    pub depth_um: i32,
}

impl Default for BedGeometry {
    fn default() -> Self {
        Self::from_mm(180, 240)
    }
}

impl BedGeometry {
    /// Create a bed from whole-millimetre dimensions
    pub const fn from_mm(width_mm: i32, depth_mm: i32) -> Self {
        Self {
            width_um: width_mm * 1000,
            depth_um: depth_mm * 1000,
        }
    }

    /// Check whether a point lies on the bed (edges inclusive)
    pub fn contains(&self, point: BedPoint) -> bool {
        (0..=self.width_um).contains(&point.x_um) && (0..=self.depth_um).contains(&point.y_um)
    }

    /// Center of the bed
    pub const fn center(&self) -> BedPoint {
        BedPoint::new(self.width_um / 2, self.depth_um / 2)
    }

    /// Measurement points above the four lift motors
    ///
    /// Each point is inset from the bed edges by `inset_x_um` / `inset_y_um`.
    /// Order: left-back, left-front, right-back, right-front, which is
    /// also the motor-select order.
    pub const fn corners(&self, inset_x_um: i32, inset_y_um: i32) -> [BedPoint; CORNER_COUNT] {
        let left = inset_x_um;
        let right = self.width_um - inset_x_um;
        let front = inset_y_um;
        let back = self.depth_um - inset_y_um;
        [
            BedPoint::new(left, back),
            BedPoint::new(left, front),
            BedPoint::new(right, back),
            BedPoint::new(right, front),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_bounds() {
        assert_eq!(Corner::new(0), Some(Corner::FIRST));
        assert_eq!(Corner::new(3).map(Corner::index), Some(3));
        assert_eq!(Corner::new(4), None);
        assert_eq!(Corner::new(255), None);
    }

    #[test]
    fn test_corner_iteration_order() {
        let mut corner = Some(Corner::FIRST);
        let mut seen = 0;
        while let Some(c) = corner {
            assert_eq!(c, Corner::ALL[seen]);
            seen += 1;
            corner = c.next();
        }
        assert_eq!(seen, CORNER_COUNT);
    }

    #[test]
    fn test_default_corners() {
        let bed = BedGeometry::default();
        let corners = bed.corners(20_000, 40_000);
        assert_eq!(corners[0], BedPoint::from_mm(20, 200));
        assert_eq!(corners[1], BedPoint::from_mm(20, 40));
        assert_eq!(corners[2], BedPoint::from_mm(160, 200));
        assert_eq!(corners[3], BedPoint::from_mm(160, 40));
    }

    #[test]
    fn test_contains_edges() {
        let bed = BedGeometry::from_mm(100, 50);
        assert!(bed.contains(BedPoint::new(0, 0)));
        assert!(bed.contains(BedPoint::from_mm(100, 50)));
        assert!(!bed.contains(BedPoint::new(-1, 10)));
        assert!(!bed.contains(BedPoint::from_mm(10, 51)));
    }

    #[test]
    fn test_center() {
        assert_eq!(BedGeometry::from_mm(180, 240).center(), BedPoint::from_mm(90, 120));
    }
}
