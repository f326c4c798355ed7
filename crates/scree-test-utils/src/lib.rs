//! Test utilities and mock types for scree development.
//!
//! Provides grid and layer fixtures, a [`LayerSet`] for assembling named
//! inputs, and the mock plugins in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{ConstPlugin, CountingPlugin, ReadThroughPlugin};

use scree_core::{Goal, Grid, GridCoord, GridShape};
use scree_plugin::{apply_layers, Plugin};

/// Elevation assigned to free cells by [`obstacle_grid`].
pub const GROUND: f32 = -1.0;
/// Elevation assigned to obstacle cells by [`obstacle_grid`].
pub const OBSTACLE: f32 = 1.0;

/// A `shape` grid filled with `value`.
pub fn grid(shape: GridShape, resolution: f32, value: f32) -> Grid {
    Grid::filled(shape, resolution, value).expect("fixture grid")
}

/// A grid filled with `background` and the listed `(row, col, value)` cells.
pub fn grid_with(
    shape: GridShape,
    resolution: f32,
    background: f32,
    cells: &[(usize, usize, f32)],
) -> Grid {
    let mut g = grid(shape, resolution, background);
    for &(row, col, value) in cells {
        assert!(g.set(row, col, value), "fixture cell ({row}, {col}) outside {shape}");
    }
    g
}

/// Square elevation map: [`GROUND`] everywhere except [`OBSTACLE`] at
/// each listed `(row, col)`.
///
/// With the default step threshold of `0.0` only the listed cells count
/// as obstacles.
pub fn obstacle_grid(cell_n: usize, resolution: f32, obstacles: &[(usize, usize)]) -> Grid {
    let cells: Vec<_> = obstacles.iter().map(|&(r, c)| (r, c, OBSTACLE)).collect();
    grid_with(GridShape::square(cell_n), resolution, GROUND, &cells)
}

/// A single `elevation` base layer filled with `value`.
pub fn elevation_layers(shape: GridShape, resolution: f32, value: f32) -> (Vec<Grid>, Vec<String>) {
    (vec![grid(shape, resolution, value)], vec!["elevation".to_string()])
}

/// Straight path from `from` to `to`, stepping one cell per vertex along
/// each axis that still differs.
pub fn straight_path(from: (i32, i32), to: (i32, i32)) -> Vec<GridCoord> {
    let (mut row, mut col) = from;
    let mut path = vec![GridCoord::new(row, col)];
    while (row, col) != to {
        row += (to.0 - row).signum();
        col += (to.1 - col).signum();
        path.push(GridCoord::new(row, col));
    }
    path
}

/// Assert `actual` is within `tol` of `expected`.
#[track_caller]
pub fn assert_close(actual: f32, expected: f32, tol: f32) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} ± {tol}, got {actual}"
    );
}

// ── Layer sets ─────────────────────────────────────────────────────

/// Ordered named grids for one registry.
#[derive(Clone, Debug, Default)]
pub struct LayerSet {
    grids: Vec<Grid>,
    names: Vec<String>,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `grid` under `name`.
    pub fn with(mut self, name: &str, grid: Grid) -> Self {
        self.names.push(name.to_string());
        self.grids.push(grid);
        self
    }

    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Run `plugin` once against `base` and `plugin_layers`.
pub fn run_plugin(
    plugin: &mut dyn Plugin,
    base: &LayerSet,
    plugin_layers: &LayerSet,
    goal: Option<Goal>,
    path: Option<&[GridCoord]>,
) -> Grid {
    apply_layers(
        plugin,
        base.grids(),
        base.names(),
        plugin_layers.grids(),
        plugin_layers.names(),
        goal,
        path,
    )
    .expect("layer set counts always match")
}

/// Run `plugin` once against a single `elevation` base layer.
pub fn run_on_elevation(plugin: &mut dyn Plugin, elevation: &Grid) -> Grid {
    let base = LayerSet::new().with("elevation", elevation.clone());
    run_plugin(plugin, &base, &LayerSet::new(), None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_path_includes_both_ends() {
        let path = straight_path((2, 2), (2, 5));
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], GridCoord::new(2, 2));
        assert_eq!(path[3], GridCoord::new(2, 5));

        let diag = straight_path((1, 1), (3, 3));
        assert_eq!(diag, vec![GridCoord::new(1, 1), GridCoord::new(2, 2), GridCoord::new(3, 3)]);
    }

    #[test]
    fn obstacle_grid_marks_listed_cells() {
        let g = obstacle_grid(5, 0.5, &[(2, 3)]);
        assert_eq!(g.get(2, 3), Some(OBSTACLE));
        assert_eq!(g.get(0, 0), Some(GROUND));
    }
}
