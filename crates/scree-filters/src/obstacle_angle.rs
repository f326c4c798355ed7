//! Bearing away from the nearest obstacle.
//!
//! Uses the obstacle test of [`DistanceFilter`](crate::DistanceFilter).
//! For each cell the nearest obstacle anywhere in the square window of
//! `⌈radius / resolution⌉` cells decides the output:
//!
//! - closer than `min_distance`: `+inf` (inside the obstacle's keep-out);
//! - strictly within `radius`: `atan2(−dx, −dy)`, the bearing from the
//!   obstacle toward the query cell with map axes swapped relative to
//!   `(row, col)`;
//! - otherwise: `NaN`.

use scree_core::{Cell, Degradation, Grid, GridShape, ParamError};
use scree_plugin::{Plugin, PluginInputs};
use smallvec::{smallvec, SmallVec};

use crate::distance::is_step;
use crate::layers;
use crate::params::{self, check};
use crate::window::{sweep, Cutoff, Hit, Window};

/// Tunable parameters of [`ObstacleAngleFilter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleAngleParams {
    /// Search radius in metres.
    pub radius: f32,
    /// Metres per cell.
    pub resolution: f32,
    /// Minimum input value that counts as an obstacle.
    pub step_threshold: f32,
    /// Keep-out distance in metres.
    pub min_distance: f32,
}

impl Default for ObstacleAngleParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            resolution: 0.05,
            step_threshold: 0.0,
            min_distance: 0.34,
        }
    }
}

impl ObstacleAngleParams {
    /// Output value for the nearest obstacle hit, if any.
    pub fn bearing<T>(&self, nearest: Option<Hit<T>>) -> f32 {
        match nearest {
            Some(hit) if hit.distance < self.min_distance => Cell::Blocked.to_raw(),
            Some(hit) if hit.distance < self.radius => {
                (-(hit.dx as f32)).atan2(-(hit.dy as f32))
            }
            _ => f32::NAN,
        }
    }
}

/// Obstacle bearing filter.
///
/// Constructed via the builder pattern: [`ObstacleAngleFilter::builder`].
#[derive(Debug)]
pub struct ObstacleAngleFilter {
    params: ObstacleAngleParams,
    input_layer: String,
    output_layer: String,
    out: Grid,
}

/// Builder for [`ObstacleAngleFilter`].
pub struct ObstacleAngleFilterBuilder {
    shape: GridShape,
    params: ObstacleAngleParams,
    input_layer: String,
    output_layer: String,
}

impl ObstacleAngleFilter {
    /// Create a new builder with the default parameters.
    pub fn builder() -> ObstacleAngleFilterBuilder {
        ObstacleAngleFilterBuilder {
            shape: GridShape::square(layers::DEFAULT_CELL_N),
            params: ObstacleAngleParams::default(),
            input_layer: layers::ELEVATION.to_string(),
            output_layer: layers::OBSTACLE_ANGLE.to_string(),
        }
    }

    /// Current parameters.
    pub fn angle_params(&self) -> &ObstacleAngleParams {
        &self.params
    }
}

impl ObstacleAngleFilterBuilder {
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

    /// Search radius in metres (default 0.5).
    pub fn radius(mut self, radius: f32) -> Self {
        self.params.radius = radius;
        self
    }

    /// Metres per cell (default 0.05).
    pub fn resolution(mut self, resolution: f32) -> Self {
        self.params.resolution = resolution;
        self
    }

    /// Obstacle threshold (default 0.0).
    pub fn step_threshold(mut self, step_threshold: f32) -> Self {
        self.params.step_threshold = step_threshold;
        self
    }

    /// Keep-out distance in metres (default 0.34).
    pub fn min_distance(mut self, min_distance: f32) -> Self {
        self.params.min_distance = min_distance;
        self
    }

    /// Name of the layer to read (default `elevation`).
    pub fn input_layer(mut self, name: impl Into<String>) -> Self {
        self.input_layer = name.into();
        self
    }

    /// Name to publish under (default `obstacle_angle_filter_layer`).
    pub fn output_layer(mut self, name: impl Into<String>) -> Self {
        self.output_layer = name.into();
        self
    }

    /// Build the filter, validating all configuration.
    pub fn build(self) -> Result<ObstacleAngleFilter, String> {
        let p = self.params;
        check("radius", p.radius, params::positive)?;
        check("resolution", p.resolution, params::positive)?;
        check("step_threshold", p.step_threshold, params::finite)?;
        check("min_distance", p.min_distance, params::non_negative)?;
        let out = Grid::new(self.shape, p.resolution).map_err(|e| e.to_string())?;

        Ok(ObstacleAngleFilter {
            params: p,
            input_layer: self.input_layer,
            output_layer: self.output_layer,
            out,
        })
    }
}

impl Plugin for ObstacleAngleFilter {
    fn name(&self) -> &str {
        "obstacle_angle_filter"
    }

    fn output_layer(&self) -> &str {
        &self.output_layer
    }

    fn input_layers(&self) -> SmallVec<[&str; 3]> {
        smallvec![self.input_layer.as_str()]
    }

    fn params(&self) -> Vec<(&'static str, f32)> {
        let p = &self.params;
        vec![
            ("radius", p.radius),
            ("resolution", p.resolution),
            ("step_threshold", p.step_threshold),
            ("min_distance", p.min_distance),
        ]
    }

    fn configure(&mut self, name: &str, value: f32) -> Result<(), ParamError> {
        match name {
            "radius" => self.params.radius = params::positive(name, value)?,
            "resolution" => {
                self.params.resolution = params::resolution(&mut self.out, name, value)?;
            }
            "step_threshold" => self.params.step_threshold = params::finite(name, value)?,
            "min_distance" => self.params.min_distance = params::non_negative(name, value)?,
            _ => return Err(params::unknown(self.name(), name)),
        }
        Ok(())
    }

    fn compute(&mut self, inputs: &PluginInputs<'_>) -> Result<(), Degradation> {
        let shape = self.out.shape();
        let input = inputs.require(&self.input_layer, shape)?.as_slice();
        let p = self.params;
        let window = Window::metric(p.radius, p.resolution, Cutoff::Unbounded);

        sweep(shape, self.out.as_mut_slice(), |row, col| {
            p.bearing(window.nearest(input, shape, row, col, |v| is_step(v, p.step_threshold)))
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
    use scree_test_utils::{assert_close, obstacle_grid, run_on_elevation};
    use std::f32::consts::{FRAC_PI_2, PI};

    fn filter(min_distance: f32) -> ObstacleAngleFilter {
        ObstacleAngleFilter::builder()
            .cell_n(11)
            .radius(2.0)
            .resolution(0.5)
            .min_distance(min_distance)
            .build()
            .unwrap()
    }

    #[test]
    fn bearing_points_away_from_obstacle() {
        let mut f = filter(0.0);
        let out = run_on_elevation(&mut f, &obstacle_grid(11, 0.5, &[(5, 5)]));
        // Query two columns right of the obstacle: dx = -2, dy = 0.
        assert_close(out.get(5, 7).unwrap(), FRAC_PI_2, 1e-6);
        // Two rows below: dx = 0, dy = -2.
        assert_close(out.get(7, 5).unwrap(), 0.0, 1e-6);
        // Two rows above: dx = 0, dy = 2.
        assert_close(out.get(3, 5).unwrap().abs(), PI, 1e-6);
    }

    #[test]
    fn keep_out_is_infinite() {
        let mut f = filter(1.0);
        let out = run_on_elevation(&mut f, &obstacle_grid(11, 0.5, &[(5, 5)]));
        assert_eq!(out.get(5, 6), Some(f32::INFINITY));
        // Exactly at min_distance the strict guard lets the bearing through.
        assert!(out.get(5, 7).unwrap().is_finite());
    }

    #[test]
    fn radius_is_strict() {
        let mut f = filter(0.0);
        let out = run_on_elevation(&mut f, &obstacle_grid(11, 0.5, &[(5, 5)]));
        // Four cells away is exactly the 2.0 m radius.
        assert!(out.get(5, 9).unwrap().is_nan());
        assert!(out.get(5, 8).unwrap().is_finite());
    }

    #[test]
    fn nan_without_obstacles() {
        let mut f = filter(0.34);
        let out = run_on_elevation(&mut f, &obstacle_grid(11, 0.5, &[]));
        assert!(out.as_slice().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn equidistant_obstacles_first_in_raster_order_wins() {
        let mut f = filter(0.0);
        let out = run_on_elevation(&mut f, &obstacle_grid(11, 0.5, &[(4, 5), (6, 5)]));
        // From (5, 5): the upper obstacle (dy = -1) is scanned first.
        assert_close(out.get(5, 5).unwrap(), 0.0, 1e-6);
    }
}
