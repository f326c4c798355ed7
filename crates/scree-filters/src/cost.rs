//! Final cost layer combining the upstream filter outputs.
//!
//! Reads only plugin layers. Two combinations are available through
//! [`CombineMode`]:
//!
//! - linear: `w_obstacle·distance + w_path·path_distance + w_goal·goal_distance`.
//!   A term with weight `0` contributes `0` whatever its layer holds, so
//!   sentinels in a disabled layer do not leak into the sum.
//! - bearing: the obstacle bearing (falling back to the path bearing where
//!   the obstacle bearing is `NaN`) is turned into a vector of length
//!   `w_obstacle·distance`, the path bearing into one of length `w_path`.
//!   The output is the angle of their average.
//!
//! If any layer the active combination needs is missing, the previous
//! output is returned unchanged.

use scree_core::{Cell, Degradation, Grid, GridShape, ParamError};
use scree_plugin::{Plugin, PluginInputs};
use smallvec::{smallvec, SmallVec};

use crate::layers;
use crate::params::{self, check};
use crate::window::sweep;

/// Which combination [`CostFilter`] computes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CombineMode {
    /// Weighted sum of the distance layers.
    #[default]
    Linear,
    /// Averaged obstacle and path bearings.
    Bearing,
    /// Bearing when both bearing layers are published, linear otherwise.
    Auto,
}

/// Weights of the combination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostWeights {
    /// Weight on the obstacle distance layer.
    pub obstacle_cost_scaling: f32,
    /// Weight on the path distance layer (path bearing in bearing mode).
    pub path_distance_cost_scaling: f32,
    /// Weight on the goal distance layer.
    pub goal_distance_cost_scaling: f32,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            obstacle_cost_scaling: 1.0,
            path_distance_cost_scaling: 1.0,
            goal_distance_cost_scaling: 1.0,
        }
    }
}

/// Names of the layers the combination reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostLayers {
    /// Obstacle distance.
    pub distance: String,
    /// Distance along the path.
    pub path_distance: String,
    /// Distance to the goal.
    pub goal_distance: String,
    /// Bearing away from obstacles.
    pub obstacle_angle: String,
    /// Heading onto the path.
    pub path_angle: String,
}

impl Default for CostLayers {
    fn default() -> Self {
        Self {
            distance: layers::DISTANCE.to_string(),
            path_distance: layers::PATH_DISTANCE.to_string(),
            goal_distance: layers::GOAL_DISTANCE.to_string(),
            obstacle_angle: layers::OBSTACLE_ANGLE.to_string(),
            path_angle: layers::PATH_ANGLE.to_string(),
        }
    }
}

#[inline]
fn term(weight: f32, value: f32) -> f32 {
    if weight == 0.0 {
        0.0
    } else {
        weight * value
    }
}

impl CostWeights {
    /// Linear cost of one cell.
    pub fn linear(&self, distance: f32, path_distance: f32, goal_distance: f32) -> f32 {
        term(self.obstacle_cost_scaling, distance)
            + term(self.path_distance_cost_scaling, path_distance)
            + term(self.goal_distance_cost_scaling, goal_distance)
    }

    /// Combined bearing of one cell.
    pub fn bearing(&self, obstacle_angle: f32, path_angle: f32, distance: f32) -> f32 {
        let obstacle_angle = match Cell::from_raw(obstacle_angle) {
            Cell::Unknown => path_angle,
            _ => obstacle_angle,
        };
        let o = self.obstacle_cost_scaling * distance;
        let p = self.path_distance_cost_scaling;
        let x = 0.5 * (o * obstacle_angle.cos() + p * path_angle.cos());
        let y = 0.5 * (o * obstacle_angle.sin() + p * path_angle.sin());
        y.atan2(x)
    }
}

/// Cost combination filter.
///
/// Constructed via the builder pattern: [`CostFilter::builder`].
#[derive(Debug)]
pub struct CostFilter {
    mode: CombineMode,
    weights: CostWeights,
    layers: CostLayers,
    output_layer: String,
    out: Grid,
}

/// Builder for [`CostFilter`].
pub struct CostFilterBuilder {
    shape: GridShape,
    mode: CombineMode,
    weights: CostWeights,
    layers: CostLayers,
    output_layer: String,
}

impl CostFilter {
    /// Create a new builder: linear mode, unit weights, default layer names.
    pub fn builder() -> CostFilterBuilder {
        CostFilterBuilder {
            shape: GridShape::square(layers::DEFAULT_CELL_N),
            mode: CombineMode::default(),
            weights: CostWeights::default(),
            layers: CostLayers::default(),
            output_layer: layers::COST.to_string(),
        }
    }

    /// Current weights.
    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Current combination.
    pub fn mode(&self) -> CombineMode {
        self.mode
    }

    /// Switch combination for subsequent calls.
    pub fn set_mode(&mut self, mode: CombineMode) {
        self.mode = mode;
    }

    fn resolve(&self, inputs: &PluginInputs<'_>) -> CombineMode {
        match self.mode {
            CombineMode::Auto => {
                let map = inputs.map();
                let published = |name: &str| map.plugin_layer(name).is_some();
                if published(&self.layers.obstacle_angle) && published(&self.layers.path_angle) {
                    CombineMode::Bearing
                } else {
                    CombineMode::Linear
                }
            }
            mode => mode,
        }
    }
}

impl CostFilterBuilder {
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

    /// Combination (default [`CombineMode::Linear`]).
    pub fn mode(mut self, mode: CombineMode) -> Self {
        self.mode = mode;
        self
    }

    /// All three weights at once.
    pub fn weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Obstacle distance weight (default 1.0).
    pub fn obstacle_cost_scaling(mut self, weight: f32) -> Self {
        self.weights.obstacle_cost_scaling = weight;
        self
    }

    /// Path distance weight (default 1.0).
    pub fn path_distance_cost_scaling(mut self, weight: f32) -> Self {
        self.weights.path_distance_cost_scaling = weight;
        self
    }

    /// Goal distance weight (default 1.0).
    pub fn goal_distance_cost_scaling(mut self, weight: f32) -> Self {
        self.weights.goal_distance_cost_scaling = weight;
        self
    }

    /// Input layer names (default: the filters' default outputs).
    pub fn layers(mut self, layers: CostLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Name to publish under (default `cost_filter_layer`).
    pub fn output_layer(mut self, name: impl Into<String>) -> Self {
        self.output_layer = name.into();
        self
    }

    /// Build the filter, validating all configuration.
    pub fn build(self) -> Result<CostFilter, String> {
        let w = self.weights;
        check("obstacle_cost_scaling", w.obstacle_cost_scaling, params::finite)?;
        check("path_distance_cost_scaling", w.path_distance_cost_scaling, params::finite)?;
        check("goal_distance_cost_scaling", w.goal_distance_cost_scaling, params::finite)?;
        let out = Grid::new(self.shape, 1.0).map_err(|e| e.to_string())?;
        Ok(CostFilter {
            mode: self.mode,
            weights: w,
            layers: self.layers,
            output_layer: self.output_layer,
            out,
        })
    }
}

impl Plugin for CostFilter {
    fn name(&self) -> &str {
        "cost_filter"
    }

    fn output_layer(&self) -> &str {
        &self.output_layer
    }

    fn input_layers(&self) -> SmallVec<[&str; 3]> {
        let l = &self.layers;
        match self.mode {
            CombineMode::Linear => smallvec![
                l.distance.as_str(),
                l.path_distance.as_str(),
                l.goal_distance.as_str(),
            ],
            CombineMode::Bearing => smallvec![
                l.obstacle_angle.as_str(),
                l.path_angle.as_str(),
                l.distance.as_str(),
            ],
            CombineMode::Auto => smallvec![
                l.distance.as_str(),
                l.path_distance.as_str(),
                l.goal_distance.as_str(),
                l.obstacle_angle.as_str(),
                l.path_angle.as_str(),
            ],
        }
    }

    fn params(&self) -> Vec<(&'static str, f32)> {
        let w = &self.weights;
        vec![
            ("obstacle_cost_scaling", w.obstacle_cost_scaling),
            ("path_distance_cost_scaling", w.path_distance_cost_scaling),
            ("goal_distance_cost_scaling", w.goal_distance_cost_scaling),
        ]
    }

    fn configure(&mut self, name: &str, value: f32) -> Result<(), ParamError> {
        let w = &mut self.weights;
        match name {
            "obstacle_cost_scaling" => w.obstacle_cost_scaling = params::finite(name, value)?,
            "path_distance_cost_scaling" => {
                w.path_distance_cost_scaling = params::finite(name, value)?;
            }
            "goal_distance_cost_scaling" => {
                w.goal_distance_cost_scaling = params::finite(name, value)?;
            }
            _ => return Err(params::unknown("cost_filter", name)),
        }
        Ok(())
    }

    fn compute(&mut self, inputs: &PluginInputs<'_>) -> Result<(), Degradation> {
        let shape = self.out.shape();
        let w = self.weights;
        let l = &self.layers;

        match self.resolve(inputs) {
            CombineMode::Bearing => {
                let obstacle = inputs.require_plugin(&l.obstacle_angle, shape)?.as_slice();
                let path = inputs.require_plugin(&l.path_angle, shape)?.as_slice();
                let distance = inputs.require_plugin(&l.distance, shape)?.as_slice();
                sweep(shape, self.out.as_mut_slice(), |row, col| {
                    let i = shape.index(row, col);
                    w.bearing(obstacle[i], path[i], distance[i])
                });
            }
            _ => {
                let distance = inputs.require_plugin(&l.distance, shape)?.as_slice();
                let path = inputs.require_plugin(&l.path_distance, shape)?.as_slice();
                let goal = inputs.require_plugin(&l.goal_distance, shape)?.as_slice();
                sweep(shape, self.out.as_mut_slice(), |row, col| {
                    let i = shape.index(row, col);
                    w.linear(distance[i], path[i], goal[i])
                });
            }
        }
        Ok(())
    }

    fn output(&self) -> &Grid {
        &self.out
    }
}
