//! The [`Plugin`] trait.
//!
//! A plugin owns exactly one output grid, allocated at construction and
//! refilled on every call, plus any scratch buffers it needs. Callers
//! never see that buffer directly: [`Plugin::apply`] hands back a copy.

use crate::inputs::PluginInputs;
use scree_core::{Degradation, Goal, Grid, GridCoord, GridShape, LayerError, LayerTable, MapView, ParamError};
use smallvec::SmallVec;

/// A layer filter run once per frame.
///
/// # Contract
///
/// - `compute()` never panics on bad inputs. A missing or mis-shaped
///   input layer returns a [`Degradation`] *before* the output buffer is
///   touched, so the previous frame's output survives.
/// - `configure()` takes effect on the next call and never reallocates.
///   Geometry is fixed; a different grid size needs a new plugin.
/// - The output always has shape [`shape()`](Self::shape).
///
/// # Object safety
///
/// This trait is object-safe; the pipeline stores plugins as
/// `Vec<Box<dyn Plugin>>`.
///
/// # Examples
///
/// ```
/// use scree_core::{Degradation, Grid, GridShape, ParamError};
/// use scree_plugin::{Plugin, PluginInputs};
///
/// struct Constant {
///     value: f32,
///     out: Grid,
/// }
///
/// impl Plugin for Constant {
///     fn name(&self) -> &str { "constant" }
///     fn output_layer(&self) -> &str { "constant_layer" }
///     fn params(&self) -> Vec<(&'static str, f32)> { vec![("value", self.value)] }
///     fn configure(&mut self, name: &str, value: f32) -> Result<(), ParamError> {
///         match name {
///             "value" => { self.value = value; Ok(()) }
///             _ => Err(ParamError::Unknown { plugin: self.name().into(), name: name.into() }),
///         }
///     }
///     fn compute(&mut self, _inputs: &PluginInputs<'_>) -> Result<(), Degradation> {
///         self.out.fill(self.value);
///         Ok(())
///     }
///     fn output(&self) -> &Grid { &self.out }
/// }
///
/// let plugin = Constant { value: 1.0, out: Grid::new(GridShape::square(4), 0.1).unwrap() };
/// assert_eq!(plugin.shape(), GridShape::square(4));
/// ```
pub trait Plugin: Send + 'static {
    /// Human-readable name for logging and parameter routing.
    fn name(&self) -> &str;

    /// Name under which the output is published as a plugin layer.
    fn output_layer(&self) -> &str;

    /// Named layers this plugin reads. Default: none.
    fn input_layers(&self) -> SmallVec<[&str; 3]> {
        SmallVec::new()
    }

    /// Whether [`compute`](Self::compute) reads the goal.
    fn uses_goal(&self) -> bool {
        false
    }

    /// Whether [`compute`](Self::compute) reads the path.
    fn uses_path(&self) -> bool {
        false
    }

    /// Output shape, fixed at construction.
    fn shape(&self) -> GridShape {
        self.output().shape()
    }

    /// Current parameter values by name.
    fn params(&self) -> Vec<(&'static str, f32)>;

    /// Overwrite one named parameter.
    ///
    /// A rejected update leaves every parameter unchanged.
    fn configure(&mut self, name: &str, value: f32) -> Result<(), ParamError>;

    /// Recompute the cached output in place.
    fn compute(&mut self, inputs: &PluginInputs<'_>) -> Result<(), Degradation>;

    /// The cached output from the last call.
    fn output(&self) -> &Grid;

    /// Run one frame and return a copy of the output.
    ///
    /// Never fails: degradations are logged and the cached output
    /// (stale or reset, see [`Degradation`]) is returned.
    fn apply(&mut self, inputs: &PluginInputs<'_>) -> Grid {
        if let Err(reason) = self.compute(inputs) {
            log_degradation(self.name(), &reason);
        }
        self.output().clone()
    }
}

/// Run `plugin` against parallel grid/name lists.
///
/// Builds the name tables for this one call. Use a
/// [`Pipeline`](crate::Pipeline) to keep tables across frames.
///
/// # Errors
///
/// Returns [`LayerError::CountMismatch`] if a grid list and its name list
/// differ in length.
pub fn apply_layers<S: AsRef<str>, T: AsRef<str>>(
    plugin: &mut dyn Plugin,
    base_layers: &[Grid],
    base_names: &[S],
    plugin_layers: &[Grid],
    plugin_names: &[T],
    goal: Option<Goal>,
    path: Option<&[GridCoord]>,
) -> Result<Grid, LayerError> {
    let base_table = LayerTable::new(base_names);
    let plugin_table = LayerTable::new(plugin_names);
    let view = MapView::new(base_layers, &base_table, plugin_layers, &plugin_table)?;
    let inputs = PluginInputs::new(view).with_goal(goal).with_path(path);
    Ok(plugin.apply(&inputs))
}

pub(crate) fn log_degradation(plugin: &str, reason: &Degradation) {
    match reason {
        Degradation::MissingLayer { layer } => {
            tracing::warn!(plugin, layer = %layer, "input layer missing, keeping previous output");
        }
        Degradation::ShapeMismatch {
            layer,
            expected,
            actual,
        } => {
            tracing::warn!(
                plugin,
                layer = %layer,
                %expected,
                %actual,
                "input layer has wrong shape, keeping previous output"
            );
        }
        Degradation::NoPath | Degradation::NoGoal => {
            tracing::debug!(plugin, %reason, "external state absent, output reset");
        }
    }
}

