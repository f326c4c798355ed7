//! Distance-along-path cost.
//!
//! Needs a path. Two encodings are selectable with [`PathDistanceMode`]:
//!
//! - [`ArcLength`](PathDistanceMode::ArcLength): every path vertex is
//!   stamped with its remaining arc length to the tail. A cell's cost is
//!   the minimum over path cells within `radius` (inclusive) of
//!   `distance · distance_cost_scaling + remaining_length`.
//! - [`Binary`](PathDistanceMode::Binary): the cost is the metric
//!   distance to the nearest path cell within `radius` (inclusive).
//!
//! Both output `+inf` where no path cell is in range. With no path the
//! output is all-`NaN`.
//!
//! Constructed via the builder pattern: [`PathDistanceFilter::builder`].

use scree_core::{Cell, Degradation, Grid, GridShape, ParamError};
use scree_plugin::{Plugin, PluginInputs};

use crate::layers;
use crate::params::{self, check};
use crate::path_map::PathMap;
use crate::window::{sweep, Cutoff, Window};

/// Cost encoding of [`PathDistanceFilter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PathDistanceMode {
    /// Scaled distance plus remaining arc length.
    #[default]
    ArcLength,
    /// Distance to the nearest path cell.
    Binary,
}

/// Tunable parameters of [`PathDistanceFilter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathDistanceParams {
    /// Search radius in metres.
    pub radius: f32,
    /// Metres per cell.
    pub resolution: f32,
    /// Weight on the off-path distance (arc-length mode).
    pub distance_cost_scaling: f32,
    /// Cost encoding.
    pub mode: PathDistanceMode,
}

impl Default for PathDistanceParams {
    fn default() -> Self {
        Self {
            radius: 2.0,
            resolution: 0.05,
            distance_cost_scaling: 1.0,
            mode: PathDistanceMode::ArcLength,
        }
    }
}

/// Path distance cost filter.
#[derive(Debug)]
pub struct PathDistanceFilter {
    params: PathDistanceParams,
    output_layer: String,
    path_map: PathMap,
    out: Grid,
}

/// Builder for [`PathDistanceFilter`].
pub struct PathDistanceFilterBuilder {
    shape: GridShape,
    params: PathDistanceParams,
    output_layer: String,
}

impl PathDistanceFilter {
    /// Create a new builder with the default parameters.
    pub fn builder() -> PathDistanceFilterBuilder {
        PathDistanceFilterBuilder {
            shape: GridShape::square(layers::DEFAULT_CELL_N),
            params: PathDistanceParams::default(),
            output_layer: layers::PATH_DISTANCE.to_string(),
        }
    }

    /// Current parameters.
    pub fn path_params(&self) -> &PathDistanceParams {
        &self.params
    }

    /// Switch cost encoding for subsequent calls.
    pub fn set_mode(&mut self, mode: PathDistanceMode) {
        self.params.mode = mode;
    }
}

impl PathDistanceFilterBuilder {
    /// Square map of `cell_n × cell_n` cells (default 100).
    pub fn cell_n(mut self, cell_n: usize) -> Self {
        self.shape = GridShape::square(cell_n);
        self
    }

    /// Arbitrary map shape.
    pub fn shape(mut self, shape: GridShape) -> Self {
        self.shape = shape;
        self
    }

    /// Search radius in metres (default 2.0).
    pub fn radius(mut self, radius: f32) -> Self {
        self.params.radius = radius;
        self
    }

    /// Metres per cell (default 0.05).
    pub fn resolution(mut self, resolution: f32) -> Self {
        self.params.resolution = resolution;
        self
    }

    /// Off-path distance weight (default 1.0).
    pub fn distance_cost_scaling(mut self, scaling: f32) -> Self {
        self.params.distance_cost_scaling = scaling;
        self
    }

    /// Cost encoding (default [`PathDistanceMode::ArcLength`]).
    pub fn mode(mut self, mode: PathDistanceMode) -> Self {
        self.params.mode = mode;
        self
    }

    /// Name to publish under (default `path_distance_filter_layer`).
    pub fn output_layer(mut self, name: impl Into<String>) -> Self {
        self.output_layer = name.into();
        self
    }

    /// Build the filter, validating all configuration.
    pub fn build(self) -> Result<PathDistanceFilter, String> {
        let p = self.params;
        check("radius", p.radius, params::positive)?;
        check("resolution", p.resolution, params::positive)?;
        check("distance_cost_scaling", p.distance_cost_scaling, params::finite)?;
        let out = Grid::new(self.shape, p.resolution).map_err(|e| e.to_string())?;

        Ok(PathDistanceFilter {
            params: p,
            output_layer: self.output_layer,
            path_map: PathMap::new(self.shape),
            out,
        })
    }
}

impl Plugin for PathDistanceFilter {
    fn name(&self) -> &str {
        "path_distance_filter"
    }

    fn output_layer(&self) -> &str {
        &self.output_layer
    }

    fn uses_path(&self) -> bool {
        true
    }

    fn params(&self) -> Vec<(&'static str, f32)> {
        let p = &self.params;
        vec![
            ("radius", p.radius),
            ("resolution", p.resolution),
            ("distance_cost_scaling", p.distance_cost_scaling),
        ]
    }

    fn configure(&mut self, name: &str, value: f32) -> Result<(), ParamError> {
        match name {
            "radius" => self.params.radius = params::positive(name, value)?,
            "resolution" => {
                self.params.resolution = params::resolution(&mut self.out, name, value)?;
            }
            "distance_cost_scaling" => {
                self.params.distance_cost_scaling = params::finite(name, value)?;
            }
            _ => return Err(params::unknown(self.name(), name)),
        }
        Ok(())
    }

    fn compute(&mut self, inputs: &PluginInputs<'_>) -> Result<(), Degradation> {
        let Some(path) = inputs.path() else {
            self.out.fill(f32::NAN);
            return Err(Degradation::NoPath);
        };
        let shape = self.out.shape();
        let p = self.params;
        let window = Window::metric(p.radius, p.resolution, Cutoff::Inclusive(p.radius));

        match p.mode {
            PathDistanceMode::ArcLength => {
                self.path_map.mark_arc_length(path, p.resolution);
                let map = self.path_map.cells();
                sweep(shape, self.out.as_mut_slice(), |row, col| {
                    window
                        .best(map, shape, row, col, Cell::is_known, |cell, d| {
                            d * p.distance_cost_scaling + cell.to_raw()
                        })
                        .map_or(Cell::Blocked.to_raw(), |hit| hit.score)
                });
            }
            PathDistanceMode::Binary => {
                self.path_map.mark_binary(path);
                let map = self.path_map.cells();
                sweep(shape, self.out.as_mut_slice(), |row, col| {
                    window
                        .nearest(map, shape, row, col, |cell| cell == Cell::Finite(1.0))
                        .map_or(Cell::Blocked.to_raw(), |hit| hit.distance)
                });
            }
        }
        Ok(())
    }

    fn output(&self) -> &Grid {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use scree_core::GridCoord;
    use scree_test_utils::{run_plugin, straight_path, LayerSet};

    fn filter(mode: PathDistanceMode) -> PathDistanceFilter {
        PathDistanceFilter::builder()
            .cell_n(11)
            .radius(1.0)
            .resolution(0.5)
            .mode(mode)
            .build()
            .unwrap()
    }

    fn run(f: &mut PathDistanceFilter, path: Option<&[GridCoord]>) -> Grid {
        run_plugin(f, &LayerSet::new(), &LayerSet::new(), None, path)
    }

    #[test]
    fn no_path_is_all_nan() {
        let mut f = filter(PathDistanceMode::ArcLength);
        let out = run(&mut f, None);
        assert!(out.as_slice().iter().all(|v| v.is_nan()));
        let empty: Vec<GridCoord> = Vec::new();
        let out = run(&mut f, Some(&empty));
        assert!(out.as_slice().iter().all(|v| v.is_nan()));
        assert!(f.uses_path());
    }

    #[test]
    fn arc_length_adds_remaining_path() {
        let mut f = filter(PathDistanceMode::ArcLength);
        let path = straight_path((5, 2), (5, 8));
        let out = run(&mut f, Some(&path));
        // On the path: remaining length only.
        assert_eq!(out.get(5, 8), Some(0.0));
        assert_eq!(out.get(5, 6), Some(1.0));
        // One row off, next to the tail: 0.5 m off-path + 0 remaining.
        assert_eq!(out.get(4, 8), Some(0.5));
        // Far from the path.
        assert_eq!(out.get(1, 1), Some(f32::INFINITY));
    }

    #[test]
    fn arc_length_prefers_cheaper_vertex_over_nearer_one() {
        let mut f = PathDistanceFilter::builder()
            .cell_n(11)
            .radius(1.0)
            .resolution(0.5)
            .distance_cost_scaling(0.1)
            .build()
            .unwrap();
        let path = straight_path((5, 2), (5, 8));
        let out = run(&mut f, Some(&path));
        // From (5, 5) the vertex two cells toward the tail is 1.0 m
        // cheaper in arc length and costs only 0.1 m of scaled distance.
        let expected = 2.0 * 0.5 * 0.1 + 0.5;
        assert!((out.get(5, 5).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn binary_single_vertex_distance() {
        let mut f = filter(PathDistanceMode::Binary);
        let path = [GridCoord::new(5, 5)];
        let out = run(&mut f, Some(&path));
        assert_eq!(out.get(5, 5), Some(0.0));
        assert_eq!(out.get(5, 7), Some(1.0));
        assert_eq!(out.get(5, 8), Some(f32::INFINITY));
    }

    #[test]
    fn configure_names() {
        let mut f = filter(PathDistanceMode::ArcLength);
        f.configure("distance_cost_scaling", 2.5).unwrap();
        assert_eq!(f.path_params().distance_cost_scaling, 2.5);
        assert!(f.configure("midpoint", 0.5).is_err());
    }

    proptest! {
        #[test]
        fn binary_matches_closed_form(row in 1i32..10, col in 1i32..10, qr in 0usize..11, qc in 0usize..11) {
            let mut f = filter(PathDistanceMode::Binary);
            let path = [GridCoord::new(row, col)];
            let out = run(&mut f, Some(&path));

            let dy = qr as f32 - row as f32;
            let dx = qc as f32 - col as f32;
            let d = 0.5 * (dx * dx + dy * dy).sqrt();
            let got = out.get(qr, qc).unwrap();
            if d <= 1.0 {
                prop_assert_eq!(got, d);
            } else {
                prop_assert_eq!(got, f32::INFINITY);
            }
        }
    }
}
