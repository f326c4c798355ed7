//! Straight-line distance to the goal.
//!
//! Closed form, no window: each cell is placed in the map's metric frame
//! and the output is its Euclidean distance to the goal point. Where the
//! frame origin sits is selected with [`GoalFrame`]. With no goal the
//! output is all-`NaN`.

use scree_core::{Degradation, Goal, Grid, GridShape, ParamError};
use scree_plugin::{Plugin, PluginInputs};

use crate::layers;
use crate::params::{self, check};
use crate::window::sweep;

/// Placement of the metric origin relative to the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GoalFrame {
    /// `x = (W/2 − col)·res`, `y = (H/2 − row)·res`. The origin lies on
    /// a cell corner, so no cell of an odd grid sits exactly on it.
    #[default]
    CornerAnchored,
    /// `x = ((W−1)/2 − col)·res`, `y = ((H−1)/2 − row)·res`. The centre
    /// cell of an odd grid is the origin.
    CellCentered,
}

impl GoalFrame {
    /// Metric position of `(row, col)` on a grid of `shape`.
    pub fn position(self, shape: GridShape, resolution: f32, row: usize, col: usize) -> (f32, f32) {
        let (cx, cy) = match self {
            Self::CornerAnchored => (0.5 * shape.width as f32, 0.5 * shape.height as f32),
            Self::CellCentered => (
                0.5 * (shape.width as f32 - 1.0),
                0.5 * (shape.height as f32 - 1.0),
            ),
        };
        ((cx - col as f32) * resolution, (cy - row as f32) * resolution)
    }
}

/// Goal distance filter.
///
/// Constructed via the builder pattern: [`GoalDistanceFilter::builder`].
#[derive(Debug)]
pub struct GoalDistanceFilter {
    resolution: f32,
    frame: GoalFrame,
    output_layer: String,
    out: Grid,
}

/// Builder for [`GoalDistanceFilter`].
pub struct GoalDistanceFilterBuilder {
    shape: GridShape,
    resolution: f32,
    frame: GoalFrame,
    output_layer: String,
}

impl GoalDistanceFilter {
    /// Create a new builder with resolution 0.05 and the corner-anchored frame.
    pub fn builder() -> GoalDistanceFilterBuilder {
        GoalDistanceFilterBuilder {
            shape: GridShape::square(layers::DEFAULT_CELL_N),
            resolution: 0.05,
            frame: GoalFrame::default(),
            output_layer: layers::GOAL_DISTANCE.to_string(),
        }
    }

    /// Metres per cell.
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Origin placement.
    pub fn frame(&self) -> GoalFrame {
        self.frame
    }

    /// Switch origin placement for subsequent calls.
    pub fn set_frame(&mut self, frame: GoalFrame) {
        self.frame = frame;
    }

    fn distances(&mut self, goal: Goal) {
        let shape = self.out.shape();
        let (resolution, frame) = (self.resolution, self.frame);
        sweep(shape, self.out.as_mut_slice(), |row, col| {
            let (x, y) = frame.position(shape, resolution, row, col);
            (goal.x - x).hypot(goal.y - y)
        });
    }
}

impl GoalDistanceFilterBuilder {
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

    /// Metres per cell (default 0.05).
    pub fn resolution(mut self, resolution: f32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Origin placement (default [`GoalFrame::CornerAnchored`]).
    pub fn frame(mut self, frame: GoalFrame) -> Self {
        self.frame = frame;
        self
    }

    /// Name to publish under (default `goal_distance_filter_layer`).
    pub fn output_layer(mut self, name: impl Into<String>) -> Self {
        self.output_layer = name.into();
        self
    }

    /// Build the filter, validating all configuration.
    pub fn build(self) -> Result<GoalDistanceFilter, String> {
        check("resolution", self.resolution, params::positive)?;
        let out = Grid::new(self.shape, self.resolution).map_err(|e| e.to_string())?;
        Ok(GoalDistanceFilter {
            resolution: self.resolution,
            frame: self.frame,
            output_layer: self.output_layer,
            out,
        })
    }
}

impl Plugin for GoalDistanceFilter {
    fn name(&self) -> &str {
        "goal_distance_filter"
    }

    fn output_layer(&self) -> &str {
        &self.output_layer
    }

    fn uses_goal(&self) -> bool {
        true
    }

    fn params(&self) -> Vec<(&'static str, f32)> {
        vec![("resolution", self.resolution)]
    }

    fn configure(&mut self, name: &str, value: f32) -> Result<(), ParamError> {
        match name {
            "resolution" => self.resolution = params::resolution(&mut self.out, name, value)?,
            _ => return Err(params::unknown(self.name(), name)),
        }
        Ok(())
    }

    fn compute(&mut self, inputs: &PluginInputs<'_>) -> Result<(), Degradation> {
        match inputs.goal() {
            Some(goal) => {
                self.distances(goal);
                Ok(())
            }
            None => {
                self.out.fill(f32::NAN);
                Err(Degradation::NoGoal)
            }
        }
    }

    fn output(&self) -> &Grid {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use scree_test_utils::{assert_close, run_plugin, LayerSet};

    fn run(f: &mut GoalDistanceFilter, goal: Option<Goal>) -> Grid {
        run_plugin(f, &LayerSet::new(), &LayerSet::new(), goal, None)
    }

    fn filter(cell_n: usize, resolution: f32, frame: GoalFrame) -> GoalDistanceFilter {
        GoalDistanceFilter::builder()
            .cell_n(cell_n)
            .resolution(resolution)
            .frame(frame)
            .build()
            .unwrap()
    }

    #[test]
    fn no_goal_is_all_nan() {
        let mut f = filter(5, 0.1, GoalFrame::CornerAnchored);
        let out = run(&mut f, None);
        assert!(out.as_slice().iter().all(|v| v.is_nan()));
        assert!(f.uses_goal());
    }

    #[test]
    fn cell_centered_origin_is_center_cell() {
        let mut f = filter(7, 0.1, GoalFrame::CellCentered);
        let out = run(&mut f, Some(Goal::new(0.0, 0.0)));
        assert_eq!(out.get(3, 3), Some(0.0));
        assert_close(out.get(3, 5).unwrap(), 0.2, 1e-6);
    }

    #[test]
    fn corner_anchored_is_half_a_cell_off() {
        let mut f = filter(7, 0.1, GoalFrame::CornerAnchored);
        let out = run(&mut f, Some(Goal::new(0.0, 0.0)));
        let half = 0.05f32;
        assert_close(out.get(3, 3).unwrap(), half.hypot(half), 1e-6);
    }

    #[test]
    fn axes_follow_columns_and_rows() {
        let mut f = filter(7, 1.0, GoalFrame::CellCentered);
        // x grows toward lower columns, y toward lower rows.
        let out = run(&mut f, Some(Goal::new(2.0, 1.0)));
        assert_eq!(out.get(2, 1), Some(0.0));
    }

    #[test]
    fn resolution_is_reconfigurable() {
        let mut f = filter(5, 0.1, GoalFrame::CellCentered);
        f.configure("resolution", 0.2).unwrap();
        assert_eq!(f.output().resolution(), 0.2);
        assert!(f.configure("resolution", 0.0).is_err());
        assert_eq!(f.resolution(), 0.2);
    }

    proptest! {
        #[test]
        fn linear_in_resolution(
            row in 0usize..9,
            col in 0usize..9,
            resolution in 0.01f32..1.0,
        ) {
            let goal = Some(Goal::new(0.0, 0.0));
            let mut single = filter(9, resolution, GoalFrame::CornerAnchored);
            let mut double = filter(9, 2.0 * resolution, GoalFrame::CornerAnchored);
            let a = run(&mut single, goal).get(row, col).unwrap();
            let b = run(&mut double, goal).get(row, col).unwrap();
            prop_assert!((b - 2.0 * a).abs() <= 1e-4 * b.max(1.0));
        }
    }
}
