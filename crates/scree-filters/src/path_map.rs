//! Path rasterisation into a scratch map.
//!
//! The path filters do not search the path directly. They first stamp
//! each vertex into a grid-sized [`Cell`] map, then run the window search
//! over that map. The map is owned by the filter and cleared to
//! [`Cell::Unknown`] (or a background value) at the start of every call.

use scree_core::{Cell, GridCoord, GridShape};
use tracing::debug;

/// Grid-sized scratch map of tagged cells.
#[derive(Clone, Debug)]
pub(crate) struct PathMap {
    shape: GridShape,
    cells: Vec<Cell>,
}

impl PathMap {
    pub(crate) fn new(shape: GridShape) -> Self {
        Self {
            shape,
            cells: vec![Cell::Unknown; shape.cell_count()],
        }
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn reset(&mut self, background: Cell) {
        self.cells.fill(background);
    }

    /// Write `cell` at `at`. Returns `false` if `at` is off the grid.
    fn stamp(&mut self, at: GridCoord, cell: Cell) -> bool {
        if !self.shape.contains(at.row, at.col) {
            return false;
        }
        let i = self.shape.index(at.row as usize, at.col as usize);
        self.cells[i] = cell;
        true
    }

    /// Heading map: every interior vertex stores the bearing
    /// `atan2(Δcol, Δrow)` toward the next vertex at a different cell,
    /// the final vertex stores [`Cell::Terminal`]. Vertices with no
    /// distinct successor get no bearing. A single-vertex path marks
    /// only its terminal.
    pub(crate) fn mark_bearings(&mut self, path: &[GridCoord]) {
        self.reset(Cell::Unknown);
        let Some((&last, rest)) = path.split_last() else {
            return;
        };
        let mut skipped = 0usize;

        for (i, &here) in rest.iter().enumerate().skip(1) {
            let Some(next) = path[i + 1..].iter().find(|&&p| p != here) else {
                continue;
            };
            let bearing = ((next.col - here.col) as f32).atan2((next.row - here.row) as f32);
            if !self.stamp(here, Cell::Finite(bearing)) {
                skipped += 1;
            }
        }
        if !self.stamp(last, Cell::Terminal) {
            skipped += 1;
        }
        log_skipped(skipped, path.len());
    }

    /// Arc-length map: every vertex stores the path length in metres
    /// from itself to the tail. A vertex visited more than once keeps the
    /// value of its earliest visit.
    pub(crate) fn mark_arc_length(&mut self, path: &[GridCoord], resolution: f32) {
        self.reset(Cell::Unknown);
        let Some(&tail) = path.last() else {
            return;
        };
        let mut skipped = 0usize;
        let mut prev = tail;
        let mut length = 0.0f32;

        for &here in path.iter().rev() {
            let dr = (here.row - prev.row) as f32;
            let dc = (here.col - prev.col) as f32;
            length += resolution * dr.hypot(dc);
            if !self.stamp(here, Cell::Finite(length)) {
                skipped += 1;
            }
            prev = here;
        }
        log_skipped(skipped, path.len());
    }

    /// Occupancy map: path cells `1.0`, everything else `0.0`.
    pub(crate) fn mark_binary(&mut self, path: &[GridCoord]) {
        self.reset(Cell::Finite(0.0));
        let mut skipped = 0usize;
        for &here in path {
            if !self.stamp(here, Cell::Finite(1.0)) {
                skipped += 1;
            }
        }
        log_skipped(skipped, path.len());
    }
}

fn log_skipped(skipped: usize, total: usize) {
    if skipped > 0 {
        debug!(skipped, total, "path vertices outside the grid ignored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn at(map: &PathMap, row: usize, col: usize) -> Cell {
        map.cells()[map.shape.index(row, col)]
    }

    fn path(points: &[(i32, i32)]) -> Vec<GridCoord> {
        points.iter().map(|&p| GridCoord::from(p)).collect()
    }

    #[test]
    fn bearings_skip_head_and_mark_terminal() {
        let mut map = PathMap::new(GridShape::square(6));
        map.mark_bearings(&path(&[(1, 1), (1, 2), (1, 3), (2, 3)]));
        assert_eq!(at(&map, 1, 1), Cell::Unknown);
        assert_eq!(at(&map, 1, 2), Cell::Finite(FRAC_PI_2));
        assert_eq!(at(&map, 1, 3), Cell::Finite(0.0));
        assert_eq!(at(&map, 2, 3), Cell::Terminal);
    }

    #[test]
    fn bearings_look_past_repeated_vertices() {
        let mut map = PathMap::new(GridShape::square(6));
        map.mark_bearings(&path(&[(1, 1), (2, 2), (2, 2), (3, 2), (4, 2)]));
        assert_eq!(at(&map, 2, 2), Cell::Finite(0.0));
        assert_eq!(at(&map, 3, 2), Cell::Finite(0.0));
        assert_eq!(at(&map, 4, 2), Cell::Terminal);
    }

    #[test]
    fn single_vertex_is_terminal_only() {
        let mut map = PathMap::new(GridShape::square(4));
        map.mark_bearings(&path(&[(2, 2)]));
        let known = map.cells().iter().filter(|c| c.is_known()).count();
        assert_eq!(known, 1);
        assert_eq!(at(&map, 2, 2), Cell::Terminal);
    }

    #[test]
    fn arc_length_counts_back_from_tail() {
        let mut map = PathMap::new(GridShape::square(6));
        map.mark_arc_length(&path(&[(1, 1), (1, 2), (2, 3)]), 0.5);
        let length = |row, col| at(&map, row, col).finite().unwrap();
        assert_eq!(length(2, 3), 0.0);
        assert!((length(1, 2) - 0.5 * 2f32.sqrt()).abs() < 1e-6);
        assert!((length(1, 1) - (0.5 * 2f32.sqrt() + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn off_grid_vertices_are_ignored() {
        let mut map = PathMap::new(GridShape::square(4));
        map.mark_binary(&path(&[(-1, 0), (1, 1), (9, 9)]));
        assert_eq!(at(&map, 1, 1), Cell::Finite(1.0));
        let marked = map
            .cells()
            .iter()
            .filter(|&&c| c == Cell::Finite(1.0))
            .count();
        assert_eq!(marked, 1);
    }

    #[test]
    fn each_call_starts_clean() {
        let mut map = PathMap::new(GridShape::square(4));
        map.mark_arc_length(&path(&[(1, 1), (1, 2)]), 1.0);
        map.mark_arc_length(&path(&[(2, 2)]), 1.0);
        assert_eq!(at(&map, 1, 1), Cell::Unknown);
        assert_eq!(at(&map, 2, 2), Cell::Finite(0.0));
    }
}
