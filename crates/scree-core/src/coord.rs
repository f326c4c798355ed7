//! Grid coordinates and metric goals supplied by an upstream planner.

use std::fmt;

/// An integer `(row, col)` grid coordinate.
///
/// Signed so that path vertices produced upstream can fall outside the
/// local map; consumers skip those.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub col: i32,
}

impl GridCoord {
    /// Construct from `(row, col)`.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A goal point in the map's center-relative metric frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Goal {
    /// Metres along the map x axis.
    pub x: f32,
    /// Metres along the map y axis.
    pub y: f32,
}

impl Goal {
    /// Construct from metric `(x, y)`.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
