//! Sequential plugin runner.
//!
//! [`Pipeline`] owns a validated plugin list and one output slot per
//! plugin. Every slot is registered as a plugin layer from construction,
//! so a stage that names a later stage's output sees that stage's
//! previous-frame result (all-NaN before the first frame).

use scree_core::{Degradation, Goal, Grid, GridCoord, GridError, GridShape, LayerError, LayerTable, MapView, ParamError};
use tracing::{debug, trace_span};

use crate::config::{ConfigError, PipelineConfig};
use crate::inputs::PluginInputs;
use crate::plugin::{log_degradation, Plugin};

use std::error::Error;
use std::fmt;

// ── Pipeline ───────────────────────────────────────────────────────

/// A validated, ordered set of plugins and their published layers.
pub struct Pipeline {
    shape: GridShape,
    plugins: Vec<Box<dyn Plugin>>,
    outputs: Vec<Grid>,
    plugin_table: LayerTable,
    base_table: LayerTable,
    frames: u64,
}

impl Pipeline {
    /// Validate `config` and allocate one output slot per plugin.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let PipelineConfig { shape, plugins } = config;

        let names: Vec<&str> = plugins.iter().map(|p| p.output_layer()).collect();
        let plugin_table = LayerTable::new(&names[..]);
        let outputs = plugins.iter().map(|p| p.output().clone()).collect();

        debug!(
            plugins = plugins.len(),
            %shape,
            "pipeline built"
        );

        Ok(Self {
            shape,
            plugins,
            outputs,
            plugin_table,
            base_table: LayerTable::default(),
            frames: 0,
        })
    }

    /// Run every plugin once, in order.
    ///
    /// `base_layers` and `base_names` are parallel lists. The name table
    /// is rebuilt only when `base_names` differs from the previous frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] without running any plugin if the base
    /// lists disagree in length or a base layer has the wrong shape.
    pub fn run<S: AsRef<str>>(
        &mut self,
        base_layers: &[Grid],
        base_names: &[S],
        goal: Option<Goal>,
        path: Option<&[GridCoord]>,
    ) -> Result<FrameReport, FrameError> {
        if base_layers.len() != base_names.len() {
            return Err(FrameError::Layers(LayerError::CountMismatch {
                grids: base_layers.len(),
                names: base_names.len(),
            }));
        }
        for (grid, name) in base_layers.iter().zip(base_names) {
            if grid.shape() != self.shape {
                return Err(FrameError::BaseShape {
                    layer: name.as_ref().to_string(),
                    expected: self.shape,
                    actual: grid.shape(),
                });
            }
        }
        if self.base_table.refresh(base_names) {
            debug!(layers = self.base_table.len(), "base layer table rebuilt");
        }

        let mut report = FrameReport {
            frame: self.frames,
            degraded: Vec::new(),
        };

        for i in 0..self.plugins.len() {
            let plugin = &mut self.plugins[i];
            let _span = trace_span!("stage", plugin = plugin.name()).entered();

            let view = MapView::new(base_layers, &self.base_table, &self.outputs, &self.plugin_table)
                .map_err(FrameError::Layers)?;
            let inputs = PluginInputs::new(view).with_goal(goal).with_path(path);

            if let Err(reason) = plugin.compute(&inputs) {
                log_degradation(plugin.name(), &reason);
                report.degraded.push(StageDegradation {
                    plugin: plugin.name().to_string(),
                    reason,
                });
            }
            self.outputs[i]
                .copy_from(plugin.output())
                .map_err(FrameError::Output)?;
        }

        self.frames += 1;
        Ok(report)
    }

    /// Route a parameter update to the plugin called `plugin`.
    pub fn configure(&mut self, plugin: &str, param: &str, value: f32) -> Result<(), ConfigureError> {
        let target = self
            .plugins
            .iter_mut()
            .find(|p| p.name() == plugin)
            .ok_or_else(|| ConfigureError::UnknownPlugin(plugin.to_string()))?;
        target.configure(param, value).map_err(ConfigureError::Param)
    }

    /// The published layer called `name`.
    pub fn layer(&self, name: &str) -> Option<&Grid> {
        self.plugin_table
            .position(name)
            .and_then(|i| self.outputs.get(i))
    }

    /// All published layers in plugin order.
    pub fn layers(&self) -> &[Grid] {
        &self.outputs
    }

    /// Published layer names in plugin order.
    pub fn plugin_layer_names(&self) -> &[String] {
        self.plugin_table.names()
    }

    /// The plugin called `name`.
    pub fn plugin(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    /// Map shape shared by every layer.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Number of frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("shape", &self.shape)
            .field("layers", &self.plugin_table.names())
            .field("frames", &self.frames)
            .finish()
    }
}

// ── Reports ────────────────────────────────────────────────────────

/// A plugin that degraded during a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDegradation {
    /// Plugin name.
    pub plugin: String,
    /// What went wrong.
    pub reason: Degradation,
}

/// Outcome of one [`Pipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    /// Zero-based frame counter.
    pub frame: u64,
    /// Plugins that could not compute a fresh output.
    pub degraded: Vec<StageDegradation>,
}

impl FrameReport {
    /// Whether every plugin produced a fresh output.
    pub fn is_clean(&self) -> bool {
        self.degraded.is_empty()
    }
}

// ── Errors ─────────────────────────────────────────────────────────

/// A frame rejected before any plugin ran.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    /// Base grids and base names differ in count.
    Layers(LayerError),
    /// A base layer's shape differs from the map shape.
    BaseShape {
        /// Offending layer name.
        layer: String,
        /// Map shape.
        expected: GridShape,
        /// Layer shape.
        actual: GridShape,
    },
    /// A plugin's output no longer matches its slot.
    Output(GridError),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layers(e) => write!(f, "base layers rejected: {e}"),
            Self::BaseShape {
                layer,
                expected,
                actual,
            } => write!(f, "base layer '{layer}' is {actual}, map is {expected}"),
            Self::Output(e) => write!(f, "plugin output rejected: {e}"),
        }
    }
}

impl Error for FrameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Layers(e) => Some(e),
            Self::Output(e) => Some(e),
            Self::BaseShape { .. } => None,
        }
    }
}

/// Errors from [`Pipeline::configure`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigureError {
    /// No plugin has this name.
    UnknownPlugin(String),
    /// The plugin rejected the update.
    Param(ParamError),
}

impl fmt::Display for ConfigureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlugin(name) => write!(f, "no plugin named '{name}'"),
            Self::Param(e) => write!(f, "{e}"),
        }
    }
}

impl Error for ConfigureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Param(e) => Some(e),
            Self::UnknownPlugin(_) => None,
        }
    }
}

