//! Heading field that steers back onto the path.
//!
//! The path is rasterised into a heading map (see
//! `PathMap::mark_bearings`): interior vertices hold the bearing toward
//! the next vertex, the last vertex holds a terminal marker. Each cell
//! then looks for the nearest marked cell strictly within `radius`:
//!
//! - terminal: output `atan2(dx, dy)`, the raw offset toward the end of
//!   the path;
//! - heading `b`: blend the unit heading with the offset toward the path,
//!   weighted by a logistic in the normalised distance,
//!
//!   ```text
//!   s     = distance_cost_scaling / (1 + e^(−steepness·(d/radius − midpoint)))
//!   avg_x = ½·(cos b + s·dy)
//!   avg_y = ½·(sin b + s·dx)
//!   out   = atan2(avg_y, avg_x)
//!   ```
//!
//!   so far from the path the offset dominates and on the path the
//!   heading does;
//! - nothing in range: `+inf`.
//!
//! With no path the output is all-`NaN`.

use scree_core::{Cell, Degradation, Grid, GridShape, ParamError};
use scree_plugin::{Plugin, PluginInputs};

use crate::layers;
use crate::params::{self, check};
use crate::path_map::PathMap;
use crate::window::{sigmoid, sweep, Cutoff, Hit, Window};

/// Tunable parameters of [`PathAngleFilter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathAngleParams {
    /// Search radius in metres.
    pub radius: f32,
    /// Metres per cell.
    pub resolution: f32,
    /// Weight on the offset toward the path.
    pub distance_cost_scaling: f32,
    /// Logistic midpoint on `distance / radius`.
    pub midpoint: f32,
    /// Logistic steepness.
    pub steepness: f32,
}

impl Default for PathAngleParams {
    fn default() -> Self {
        Self {
            radius: 2.0,
            resolution: 0.05,
            distance_cost_scaling: 1.0,
            midpoint: 0.5,
            steepness: 10.0,
        }
    }
}

impl PathAngleParams {
    /// Output heading for the nearest marked cell, if any.
    pub fn heading(&self, nearest: Option<Hit<Cell>>) -> f32 {
        let Some(hit) = nearest else {
            return Cell::Blocked.to_raw();
        };
        let (dx, dy) = (hit.dx as f32, hit.dy as f32);
        match hit.value {
            Cell::Finite(bearing) => {
                let weight = self.distance_cost_scaling
                    * sigmoid(self.steepness * (hit.distance / self.radius - self.midpoint));
                let avg_x = 0.5 * (bearing.cos() + dy * weight);
                let avg_y = 0.5 * (bearing.sin() + dx * weight);
                avg_y.atan2(avg_x)
            }
            _ => dx.atan2(dy),
        }
    }
}

/// Path heading filter.
///
/// Constructed via the builder pattern: [`PathAngleFilter::builder`].
#[derive(Debug)]
pub struct PathAngleFilter {
    params: PathAngleParams,
    output_layer: String,
    path_map: PathMap,
    out: Grid,
}

/// Builder for [`PathAngleFilter`].
pub struct PathAngleFilterBuilder {
    shape: GridShape,
    params: PathAngleParams,
    output_layer: String,
}

impl PathAngleFilter {
    /// Create a new builder with the default parameters.
    pub fn builder() -> PathAngleFilterBuilder {
        PathAngleFilterBuilder {
            shape: GridShape::square(layers::DEFAULT_CELL_N),
            params: PathAngleParams::default(),
            output_layer: layers::PATH_ANGLE.to_string(),
        }
    }

    /// Current parameters.
    pub fn angle_params(&self) -> &PathAngleParams {
        &self.params
    }
}

impl PathAngleFilterBuilder {
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

    /// Offset weight (default 1.0).
    pub fn distance_cost_scaling(mut self, scaling: f32) -> Self {
        self.params.distance_cost_scaling = scaling;
        self
    }

    /// Logistic midpoint (default 0.5).
    pub fn midpoint(mut self, midpoint: f32) -> Self {
        self.params.midpoint = midpoint;
        self
    }

    /// Logistic steepness (default 10).
    pub fn steepness(mut self, steepness: f32) -> Self {
        self.params.steepness = steepness;
        self
    }

    /// Name to publish under (default `path_angle_filter_layer`).
    pub fn output_layer(mut self, name: impl Into<String>) -> Self {
        self.output_layer = name.into();
        self
    }

    /// Build the filter, validating all configuration.
    pub fn build(self) -> Result<PathAngleFilter, String> {
        let p = self.params;
        check("radius", p.radius, params::positive)?;
        check("resolution", p.resolution, params::positive)?;
        check("distance_cost_scaling", p.distance_cost_scaling, params::finite)?;
        check("midpoint", p.midpoint, params::finite)?;
        check("steepness", p.steepness, params::finite)?;
        let out = Grid::new(self.shape, p.resolution).map_err(|e| e.to_string())?;

        Ok(PathAngleFilter {
            params: p,
            output_layer: self.output_layer,
            path_map: PathMap::new(self.shape),
            out,
        })
    }
}

impl Plugin for PathAngleFilter {
    fn name(&self) -> &str {
        "path_angle_filter"
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
            ("midpoint", p.midpoint),
            ("steepness", p.steepness),
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
            "midpoint" => self.params.midpoint = params::finite(name, value)?,
            "steepness" => self.params.steepness = params::finite(name, value)?,
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
        let window = Window::metric(p.radius, p.resolution, Cutoff::Exclusive(p.radius));

        self.path_map.mark_bearings(path);
        let map = self.path_map.cells();
        sweep(shape, self.out.as_mut_slice(), |row, col| {
            p.heading(window.nearest(map, shape, row, col, Cell::is_known))
        });
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
    use scree_test_utils::{assert_close, run_plugin, straight_path, LayerSet};
    use std::f32::consts::PI;

    fn filter() -> PathAngleFilter {
        PathAngleFilter::builder()
            .cell_n(11)
            .radius(1.5)
            .resolution(0.5)
            .build()
            .unwrap()
    }

    fn run(f: &mut PathAngleFilter, path: Option<&[GridCoord]>) -> Grid {
        run_plugin(f, &LayerSet::new(), &LayerSet::new(), None, path)
    }

    #[test]
    fn no_path_is_all_nan() {
        let mut f = filter();
        let out = run(&mut f, None);
        assert!(out.as_slice().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn on_path_heading_follows_path() {
        let mut f = filter();
        // Heading east along row 5: bearing atan2(1, 0) = π/2.
        let path = straight_path((5, 1), (5, 9));
        let out = run(&mut f, Some(&path));
        // On an interior vertex the offset is zero and the heading wins.
        assert_close(out.get(5, 4).unwrap(), PI / 2.0, 1e-6);
    }

    #[test]
    fn blend_leans_toward_path() {
        let mut f = filter();
        let path = straight_path((5, 1), (5, 9));
        let out = run(&mut f, Some(&path));
        // Above the path the offset points down (+row = +x), so the
        // heading tilts from π/2 toward 0.
        let above = out.get(3, 4).unwrap();
        assert!(above > 0.0 && above < PI / 2.0, "got {above}");
        // Below, it tilts the other way.
        let below = out.get(7, 4).unwrap();
        assert!(below > PI / 2.0 && below < PI, "got {below}");
    }

    #[test]
    fn out_of_range_is_infinite() {
        let mut f = filter();
        let path = [GridCoord::new(5, 5)];
        let out = run(&mut f, Some(&path));
        assert_eq!(out.get(1, 1), Some(f32::INFINITY));
        // Exactly at the radius: strict cutoff.
        assert_eq!(out.get(5, 8), Some(f32::INFINITY));
    }

    #[test]
    fn heading_edge_cases() {
        let p = PathAngleParams::default();
        assert_eq!(p.heading(None), f32::INFINITY);
        let terminal = Hit {
            dx: 1,
            dy: -1,
            distance: 0.07,
            score: 0.07,
            value: Cell::Terminal,
        };
        assert_close(p.heading(Some(terminal)), (1.0f32).atan2(-1.0), 1e-6);
    }

    proptest! {
        #[test]
        fn single_vertex_points_at_it(row in 0usize..11, col in 0usize..11) {
            let mut f = filter();
            let path = [GridCoord::new(5, 5)];
            let out = run(&mut f, Some(&path));

            let dy = 5 - row as i32;
            let dx = 5 - col as i32;
            let d = 0.5 * ((dx * dx + dy * dy) as f32).sqrt();
            let got = out.get(row, col).unwrap();
            if d < 1.5 {
                prop_assert_eq!(got, (dx as f32).atan2(dy as f32));
            } else {
                prop_assert_eq!(got, f32::INFINITY);
            }
        }
    }
}
