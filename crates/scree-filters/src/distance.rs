//! Distance to the nearest obstacle, raw or as a smoothed cost.
//!
//! A neighbour is an obstacle when its input value is not below
//! `step_threshold` (unknown `NaN` cells count as obstacles). The search
//! window is `⌈radius / resolution⌉` cells and accepts distances up to
//! and including `radius`.
//!
//! # Modes
//!
//! - [`DistanceMode::Raw`]: the nearest distance in metres, `NaN` if no
//!   obstacle is in range.
//! - [`DistanceMode::Smoothed`]: `+inf` when the nearest obstacle is
//!   closer than `min_distance`, `0.0` when none is in range, otherwise
//!
//!   ```text
//!   n    = (d − min_distance) / (radius − min_distance)
//!   cost = 1 − 1 / (1 + e^(−steepness·(n − midpoint)))
//!   ```
//!
//!   which falls from near 1 at `min_distance` toward 0 at `radius`.
//!   With `radius == min_distance` the normalisation is `0/0` and the
//!   cost is `NaN` for obstacles exactly at that distance.
//!
//! Constructed via the builder pattern: [`DistanceFilter::builder`].

use scree_core::{Cell, Degradation, Grid, GridShape, ParamError};
use scree_plugin::{Plugin, PluginInputs};
use smallvec::{smallvec, SmallVec};

use crate::layers;
use crate::params::{self, check};
use crate::window::{sigmoid, sweep, Cutoff, Window};

/// Output encoding of [`DistanceFilter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceMode {
    /// Metric distance, `NaN` when nothing is in range.
    Raw,
    /// Logistic cost with a `min_distance` keep-out.
    #[default]
    Smoothed,
}

/// Whether `value` is a step obstacle at `threshold`.
///
/// Written as `!(value < threshold)` so `NaN` counts as an obstacle.
#[inline]
pub(crate) fn is_step(value: f32, threshold: f32) -> bool {
    !(value < threshold)
}

/// Tunable parameters of [`DistanceFilter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceParams {
    /// Search radius in metres.
    pub radius: f32,
    /// Metres per cell.
    pub resolution: f32,
    /// Minimum input value that counts as an obstacle.
    pub step_threshold: f32,
    /// Keep-out distance in metres (smoothed mode).
    pub min_distance: f32,
    /// Logistic midpoint on the normalised distance (smoothed mode).
    pub midpoint: f32,
    /// Logistic steepness (smoothed mode).
    pub steepness: f32,
    /// Output encoding.
    pub mode: DistanceMode,
}

impl Default for DistanceParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            resolution: 0.05,
            step_threshold: 0.0,
            min_distance: 0.34,
            midpoint: 0.4,
            steepness: 10.0,
            mode: DistanceMode::Smoothed,
        }
    }
}

impl DistanceParams {
    fn window(&self) -> Window {
        Window::metric(self.radius, self.resolution, Cutoff::Inclusive(self.radius))
    }

    /// Map the nearest obstacle distance (if any) to the output value.
    pub fn cost(&self, nearest: Option<f32>) -> f32 {
        match (self.mode, nearest) {
            (DistanceMode::Raw, Some(d)) => d,
            (DistanceMode::Raw, None) => f32::NAN,
            (DistanceMode::Smoothed, Some(d)) if d < self.min_distance => {
                Cell::Blocked.to_raw()
            }
            (DistanceMode::Smoothed, None) => 0.0,
            (DistanceMode::Smoothed, Some(d)) => {
                let normalized = (d - self.min_distance) / (self.radius - self.min_distance);
                1.0 - sigmoid(self.steepness * (normalized - self.midpoint))
            }
        }
    }
}

/// Nearest-obstacle distance filter.
///
/// Reads one input layer (default `elevation`) and publishes
/// `distance_filter_layer`.
///
/// ```
/// use scree_filters::{DistanceFilter, DistanceMode};
/// use scree_plugin::Plugin;
///
/// let filter = DistanceFilter::builder()
///     .cell_n(40)
///     .radius(0.5)
///     .resolution(0.05)
///     .mode(DistanceMode::Raw)
///     .build()
///     .unwrap();
/// assert_eq!(filter.output_layer(), "distance_filter_layer");
/// ```
#[derive(Debug)]
pub struct DistanceFilter {
    params: DistanceParams,
    input_layer: String,
    output_layer: String,
    out: Grid,
}

/// Builder for [`DistanceFilter`].
pub struct DistanceFilterBuilder {
    shape: GridShape,
    params: DistanceParams,
    input_layer: String,
    output_layer: String,
}

impl DistanceFilter {
    /// Create a new builder with the default parameters.
    pub fn builder() -> DistanceFilterBuilder {
        DistanceFilterBuilder {
            shape: GridShape::square(layers::DEFAULT_CELL_N),
            params: DistanceParams::default(),
            input_layer: layers::ELEVATION.to_string(),
            output_layer: layers::DISTANCE.to_string(),
        }
    }

    /// Current parameters.
    pub fn distance_params(&self) -> &DistanceParams {
        &self.params
    }

    /// Switch output encoding for subsequent calls.
    pub fn set_mode(&mut self, mode: DistanceMode) {
        self.params.mode = mode;
    }
}

impl DistanceFilterBuilder {
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

    /// Logistic midpoint (default 0.4).
    pub fn midpoint(mut self, midpoint: f32) -> Self {
        self.params.midpoint = midpoint;
        self
    }

    /// Logistic steepness (default 10).
    pub fn steepness(mut self, steepness: f32) -> Self {
        self.params.steepness = steepness;
        self
    }

    /// Output encoding (default [`DistanceMode::Smoothed`]).
    pub fn mode(mut self, mode: DistanceMode) -> Self {
        self.params.mode = mode;
        self
    }

    /// Name of the layer to read (default `elevation`).
    pub fn input_layer(mut self, name: impl Into<String>) -> Self {
        self.input_layer = name.into();
        self
    }

    /// Name to publish under (default `distance_filter_layer`).
    pub fn output_layer(mut self, name: impl Into<String>) -> Self {
        self.output_layer = name.into();
        self
    }

    /// Build the filter, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the shape is empty or a parameter is out of range.
    pub fn build(self) -> Result<DistanceFilter, String> {
        let p = self.params;
        check("radius", p.radius, params::positive)?;
        check("resolution", p.resolution, params::positive)?;
        check("step_threshold", p.step_threshold, params::finite)?;
        check("min_distance", p.min_distance, params::non_negative)?;
        check("midpoint", p.midpoint, params::finite)?;
        check("steepness", p.steepness, params::finite)?;
        let out = Grid::new(self.shape, p.resolution).map_err(|e| e.to_string())?;

        Ok(DistanceFilter {
            params: p,
            input_layer: self.input_layer,
            output_layer: self.output_layer,
            out,
        })
    }
}

impl Plugin for DistanceFilter {
    fn name(&self) -> &str {
        "distance_filter"
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
            "step_threshold" => self.params.step_threshold = params::finite(name, value)?,
            "min_distance" => self.params.min_distance = params::non_negative(name, value)?,
            "midpoint" => self.params.midpoint = params::finite(name, value)?,
            "steepness" => self.params.steepness = params::finite(name, value)?,
            _ => return Err(params::unknown(self.name(), name)),
        }
        Ok(())
    }

    fn compute(&mut self, inputs: &PluginInputs<'_>) -> Result<(), Degradation> {
        let shape = self.out.shape();
        let input = inputs.require(&self.input_layer, shape)?.as_slice();
        let p = self.params;
        let window = p.window();

        sweep(shape, self.out.as_mut_slice(), |row, col| {
            let nearest = window
                .nearest(input, shape, row, col, |v| is_step(v, p.step_threshold))
                .map(|hit| hit.distance);
            p.cost(nearest)
        });
        Ok(())
    }

    fn output(&self) -> &Grid {
        &self.out
    }
}
