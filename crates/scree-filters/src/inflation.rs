//! Obstacle inflation in cell units.
//!
//! Same obstacle test as [`DistanceFilter`](crate::DistanceFilter), but
//! the radius is a whole number of cells and the output is the unscaled
//! Euclidean cell distance to the nearest obstacle, `NaN` if none lies
//! within the disc of that radius. The output grid carries resolution
//! `1.0` since its values are in cells.

use scree_core::{Degradation, Grid, GridShape, ParamError};
use scree_plugin::{Plugin, PluginInputs};
use smallvec::{smallvec, SmallVec};

use crate::distance::is_step;
use crate::layers;
use crate::params::{self, check};
use crate::window::{sweep, Cutoff, Window};

/// Obstacle inflation filter.
///
/// Constructed via the builder pattern: [`InflationFilter::builder`].
#[derive(Debug)]
pub struct InflationFilter {
    radius: u32,
    step_threshold: f32,
    input_layer: String,
    output_layer: String,
    out: Grid,
}

/// Builder for [`InflationFilter`].
pub struct InflationFilterBuilder {
    shape: GridShape,
    radius: u32,
    step_threshold: f32,
    input_layer: String,
    output_layer: String,
}

impl InflationFilter {
    /// Create a new builder with radius 1 and threshold 0.
    pub fn builder() -> InflationFilterBuilder {
        InflationFilterBuilder {
            shape: GridShape::square(layers::DEFAULT_CELL_N),
            radius: 1,
            step_threshold: 0.0,
            input_layer: layers::ELEVATION.to_string(),
            output_layer: layers::INFLATION.to_string(),
        }
    }

    /// Radius in cells.
    pub fn radius(&self) -> u32 {
        self.radius
    }
}

impl InflationFilterBuilder {
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

    /// Radius in cells (default 1).
    pub fn radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    /// Obstacle threshold (default 0.0).
    pub fn step_threshold(mut self, step_threshold: f32) -> Self {
        self.step_threshold = step_threshold;
        self
    }

    /// Name of the layer to read (default `elevation`).
    pub fn input_layer(mut self, name: impl Into<String>) -> Self {
        self.input_layer = name.into();
        self
    }

    /// Name to publish under (default `inflation_filter_layer`).
    pub fn output_layer(mut self, name: impl Into<String>) -> Self {
        self.output_layer = name.into();
        self
    }

    /// Build the filter, validating all configuration.
    pub fn build(self) -> Result<InflationFilter, String> {
        check("step_threshold", self.step_threshold, params::finite)?;
        let out = Grid::new(self.shape, 1.0).map_err(|e| e.to_string())?;
        Ok(InflationFilter {
            radius: self.radius,
            step_threshold: self.step_threshold,
            input_layer: self.input_layer,
            output_layer: self.output_layer,
            out,
        })
    }
}

fn whole_cells(name: &str, value: f32) -> Result<u32, ParamError> {
    let value = params::non_negative(name, value)?;
    if value.fract() != 0.0 || value > u32::MAX as f32 {
        return Err(ParamError::Invalid {
            name: name.to_string(),
            value,
            reason: "must be a whole number of cells",
        });
    }
    Ok(value as u32)
}

impl Plugin for InflationFilter {
    fn name(&self) -> &str {
        "inflation_filter"
    }

    fn output_layer(&self) -> &str {
        &self.output_layer
    }

    fn input_layers(&self) -> SmallVec<[&str; 3]> {
        smallvec![self.input_layer.as_str()]
    }

    fn params(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("radius", self.radius as f32),
            ("step_threshold", self.step_threshold),
        ]
    }

    fn configure(&mut self, name: &str, value: f32) -> Result<(), ParamError> {
        match name {
            "radius" => self.radius = whole_cells(name, value)?,
            "step_threshold" => self.step_threshold = params::finite(name, value)?,
            _ => return Err(params::unknown(self.name(), name)),
        }
        Ok(())
    }

    fn compute(&mut self, inputs: &PluginInputs<'_>) -> Result<(), Degradation> {
        let shape = self.out.shape();
        let input = inputs.require(&self.input_layer, shape)?.as_slice();
        let threshold = self.step_threshold;
        let radius = i32::try_from(self.radius).unwrap_or(i32::MAX);
        let window = Window::cells(radius, Cutoff::Inclusive(radius as f32));

        sweep(shape, self.out.as_mut_slice(), |row, col| {
            window
                .nearest(input, shape, row, col, |v| is_step(v, threshold))
                .map_or(f32::NAN, |hit| hit.distance)
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
    use scree_test_utils::{obstacle_grid, run_on_elevation};

    fn filter(cell_n: usize, radius: u32) -> InflationFilter {
        InflationFilter::builder()
            .cell_n(cell_n)
            .radius(radius)
            .build()
            .unwrap()
    }

    #[test]
    fn distances_are_in_cells() {
        let mut f = filter(9, 3);
        let out = run_on_elevation(&mut f, &obstacle_grid(9, 0.05, &[(4, 4)]));
        assert_eq!(out.get(4, 4), Some(0.0));
        assert_eq!(out.get(4, 7), Some(3.0));
        assert_eq!(out.get(5, 5), Some(2f32.sqrt()));
        assert_eq!(out.resolution(), 1.0);
    }

    #[test]
    fn disc_not_square() {
        let mut f = filter(9, 2);
        let out = run_on_elevation(&mut f, &obstacle_grid(9, 0.05, &[(4, 4)]));
        // (2, 2) is inside the 5×5 window but √8 > 2 cells away.
        assert!(out.get(2, 2).unwrap().is_nan());
        assert_eq!(out.get(2, 4), Some(2.0));
    }

    #[test]
    fn zero_radius_marks_obstacles_only() {
        let mut f = filter(5, 0);
        let out = run_on_elevation(&mut f, &obstacle_grid(5, 0.05, &[(2, 2)]));
        assert_eq!(out.get(2, 2), Some(0.0));
        assert!(out.get(2, 3).unwrap().is_nan());
    }

    #[test]
    fn huge_radius_finishes_on_a_small_grid() {
        let mut f = filter(5, 1);
        f.configure("radius", 50000.0).unwrap();
        let out = run_on_elevation(&mut f, &obstacle_grid(5, 0.05, &[(2, 2)]));
        assert_eq!(out.get(2, 2), Some(0.0));
        assert_eq!(out.get(0, 0), Some(8f32.sqrt()));
        assert_eq!(out.get(4, 2), Some(2.0));
    }

    #[test]
    fn radius_must_be_whole() {
        let mut f = filter(5, 1);
        assert!(f.configure("radius", 1.5).is_err());
        assert!(f.configure("radius", -1.0).is_err());
        f.configure("radius", 4.0).unwrap();
        assert_eq!(f.radius(), 4);
        assert_eq!(f.params()[0], ("radius", 4.0));
    }
}
