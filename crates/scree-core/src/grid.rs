//! The dense [`Grid`] primitive and its [`GridShape`].
//!
//! Grids are row-major `f32` arrays over a fixed footprint. Values follow
//! the sentinel convention shared by every layer: `NaN` is unknown,
//! `+inf` is blocked (or a terminal marker), anything else is a finite
//! measurement or cost. See [`Cell`](crate::Cell) for the tagged form.

use crate::error::GridError;

/// Dimensions of a grid in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridShape {
    /// Number of columns (W).
    pub width: usize,
    /// Number of rows (H).
    pub height: usize,
}

impl GridShape {
    /// A `cell_n × cell_n` shape.
    pub const fn square(cell_n: usize) -> Self {
        Self {
            width: cell_n,
            height: cell_n,
        }
    }

    /// Total number of cells.
    pub const fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Row-major flat index of `(row, col)`. No bounds check.
    #[inline]
    pub const fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Whether `(row, col)` lies inside the grid.
    #[inline]
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Whether `(row, col)` lies inside the grid and off its outermost ring.
    ///
    /// Windowed searches only accept neighbours that pass this guard.
    #[inline]
    pub fn is_interior(&self, row: i32, col: i32) -> bool {
        row >= 1 && col >= 1 && (row as usize) + 1 < self.height && (col as usize) + 1 < self.width
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A W×H dense float layer with a metric resolution.
///
/// The shape is fixed at construction. `resolution` is metres per cell and
/// is only used for the center-relative metric mapping; the buffer is
/// never reallocated by any method on this type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    shape: GridShape,
    resolution: f32,
    data: Vec<f32>,
}

impl Grid {
    /// Create a grid filled with `NaN` (all cells unknown).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyShape`] if either dimension is zero and
    /// [`GridError::InvalidResolution`] if `resolution` is not finite and
    /// positive.
    pub fn new(shape: GridShape, resolution: f32) -> Result<Self, GridError> {
        Self::filled(shape, resolution, f32::NAN)
    }

    /// Create a grid with every cell set to `value`.
    pub fn filled(shape: GridShape, resolution: f32, value: f32) -> Result<Self, GridError> {
        validate(shape, resolution)?;
        Ok(Self {
            shape,
            resolution,
            data: vec![value; shape.cell_count()],
        })
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::LengthMismatch`] if `data.len()` is not
    /// `width * height`, in addition to the checks of [`Grid::new`].
    pub fn from_vec(shape: GridShape, resolution: f32, data: Vec<f32>) -> Result<Self, GridError> {
        validate(shape, resolution)?;
        if data.len() != shape.cell_count() {
            return Err(GridError::LengthMismatch {
                expected: shape.cell_count(),
                actual: data.len(),
            });
        }
        Ok(Self {
            shape,
            resolution,
            data,
        })
    }

    /// Grid dimensions.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.shape.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.shape.height
    }

    /// Metres per cell.
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Update the metric resolution. The buffer is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidResolution`] if `resolution` is not
    /// finite and positive; the previous value is kept.
    pub fn set_resolution(&mut self, resolution: f32) -> Result<(), GridError> {
        validate(self.shape, resolution)?;
        self.resolution = resolution;
        Ok(())
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.shape.height && col < self.shape.width {
            Some(self.data[self.shape.index(row, col)])
        } else {
            None
        }
    }

    /// Set the value at `(row, col)`. Returns `false` outside the grid.
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> bool {
        if row < self.shape.height && col < self.shape.width {
            let i = self.shape.index(row, col);
            self.data[i] = value;
            true
        } else {
            false
        }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Row-major view of the data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable row-major view of the data.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Copy values and resolution from `other` into this grid's existing
    /// buffer.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if the shapes differ.
    pub fn copy_from(&mut self, other: &Grid) -> Result<(), GridError> {
        if other.shape != self.shape {
            return Err(GridError::ShapeMismatch {
                expected: self.shape,
                actual: other.shape,
            });
        }
        self.data.copy_from_slice(&other.data);
        self.resolution = other.resolution;
        Ok(())
    }

    /// Center-relative metric position `(x, y)` of `(row, col)`.
    ///
    /// `x = (0.5·W − col)·resolution`, `y = (0.5·H − row)·resolution`:
    /// x grows toward column 0 and y toward row 0, anchored at the grid
    /// center point.
    pub fn metric_position(&self, row: usize, col: usize) -> (f32, f32) {
        let x = (0.5 * self.shape.width as f32 - col as f32) * self.resolution;
        let y = (0.5 * self.shape.height as f32 - row as f32) * self.resolution;
        (x, y)
    }

    /// Iterate `(row, col, value)` in raster order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let width = self.shape.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i / width, i % width, v))
    }
}

fn validate(shape: GridShape, resolution: f32) -> Result<(), GridError> {
    if shape.width == 0 || shape.height == 0 {
        return Err(GridError::EmptyShape { shape });
    }
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(GridError::InvalidResolution { value: resolution });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_unknown() {
        let g = Grid::new(GridShape::square(4), 0.1).unwrap();
        assert_eq!(g.as_slice().len(), 16);
        assert!(g.as_slice().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rejects_empty_shape_and_bad_resolution() {
        assert!(matches!(
            Grid::new(GridShape { width: 0, height: 3 }, 0.1),
            Err(GridError::EmptyShape { .. })
        ));
        assert!(matches!(
            Grid::new(GridShape::square(3), 0.0),
            Err(GridError::InvalidResolution { .. })
        ));
        assert!(matches!(
            Grid::new(GridShape::square(3), f32::NAN),
            Err(GridError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn from_vec_checks_length() {
        let err = Grid::from_vec(GridShape::square(2), 1.0, vec![0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::LengthMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn get_set_row_major() {
        let mut g = Grid::filled(GridShape { width: 3, height: 2 }, 1.0, 0.0).unwrap();
        assert!(g.set(1, 2, 7.0));
        assert_eq!(g.as_slice()[5], 7.0);
        assert_eq!(g.get(1, 2), Some(7.0));
        assert_eq!(g.get(2, 0), None);
        assert!(!g.set(0, 3, 1.0));
    }

    #[test]
    fn interior_guard_excludes_outer_ring() {
        let shape = GridShape::square(5);
        assert!(!shape.is_interior(0, 2));
        assert!(!shape.is_interior(2, 4));
        assert!(shape.is_interior(1, 1));
        assert!(shape.is_interior(3, 3));
        assert!(!shape.is_interior(-1, 2));
    }

    #[test]
    fn metric_position_center_anchored() {
        let g = Grid::new(GridShape::square(4), 0.5).unwrap();
        assert_eq!(g.metric_position(2, 2), (0.0, 0.0));
        assert_eq!(g.metric_position(0, 0), (1.0, 1.0));
        assert_eq!(g.metric_position(3, 1), (0.5, -0.5));
    }

    #[test]
    fn copy_from_requires_same_shape() {
        let mut a = Grid::new(GridShape::square(2), 1.0).unwrap();
        let b = Grid::filled(GridShape::square(2), 0.5, 3.0).unwrap();
        a.copy_from(&b).unwrap();
        assert_eq!(a.as_slice(), &[3.0; 4]);
        assert_eq!(a.resolution(), 0.5);

        let c = Grid::new(GridShape::square(3), 1.0).unwrap();
        assert!(a.copy_from(&c).is_err());
    }

    #[test]
    fn set_resolution_keeps_data() {
        let mut g = Grid::filled(GridShape::square(2), 1.0, 2.0).unwrap();
        g.set_resolution(0.25).unwrap();
        assert_eq!(g.resolution(), 0.25);
        assert_eq!(g.as_slice(), &[2.0; 4]);
        assert!(g.set_resolution(-1.0).is_err());
        assert_eq!(g.resolution(), 0.25);
    }
}
