//! Pipeline configuration and startup validation.

use indexmap::IndexMap;
use scree_core::GridShape;

use crate::plugin::Plugin;

use std::error::Error;
use std::fmt;

// ── Config ─────────────────────────────────────────────────────────

/// Everything needed to build a [`Pipeline`](crate::Pipeline).
///
/// Plugins run in the order they appear in `plugins`.
pub struct PipelineConfig {
    /// Shape every layer in the map shares.
    pub shape: GridShape,
    /// Plugins in execution order.
    pub plugins: Vec<Box<dyn Plugin>>,
}

impl PipelineConfig {
    /// Empty config for a map of `shape`.
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            plugins: Vec::new(),
        }
    }

    /// Append a plugin.
    pub fn with_plugin(mut self, plugin: impl Plugin) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Check the config for structural errors.
    ///
    /// Checks performed:
    ///
    /// 1. At least one plugin.
    /// 2. Every plugin's output shape equals `shape`.
    /// 3. No two plugins publish the same output layer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plugins.is_empty() {
            return Err(ConfigError::EmptyPipeline);
        }

        for plugin in &self.plugins {
            if plugin.shape() != self.shape {
                return Err(ConfigError::ShapeMismatch {
                    plugin: plugin.name().to_string(),
                    expected: self.shape,
                    actual: plugin.shape(),
                });
            }
        }

        let mut publisher: IndexMap<&str, usize> = IndexMap::new();
        let mut conflicts = Vec::new();
        for (i, plugin) in self.plugins.iter().enumerate() {
            let layer = plugin.output_layer();
            if let Some(&j) = publisher.get(layer) {
                conflicts.push(LayerConflict {
                    layer: layer.to_string(),
                    first: self.plugins[j].name().to_string(),
                    second: plugin.name().to_string(),
                });
            } else {
                publisher.insert(layer, i);
            }
        }
        if !conflicts.is_empty() {
            return Err(ConfigError::DuplicateLayer(conflicts));
        }

        Ok(())
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("PipelineConfig")
            .field("shape", &self.shape)
            .field("plugins", &names)
            .finish()
    }
}

// ── Errors ─────────────────────────────────────────────────────────

/// Two plugins that publish the same output layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerConflict {
    /// The contested layer name.
    pub layer: String,
    /// Earlier plugin in pipeline order.
    pub first: String,
    /// Later plugin in pipeline order.
    pub second: String,
}

/// Errors from pipeline validation (startup-time, not per-frame).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No plugins registered.
    EmptyPipeline,
    /// A plugin's output shape differs from the map shape.
    ShapeMismatch {
        /// Which plugin.
        plugin: String,
        /// Map shape.
        expected: GridShape,
        /// Plugin shape.
        actual: GridShape,
    },
    /// Two or more plugins publish the same layer.
    DuplicateLayer(Vec<LayerConflict>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPipeline => write!(f, "pipeline has no plugins"),
            Self::ShapeMismatch {
                plugin,
                expected,
                actual,
            } => write!(
                f,
                "plugin '{plugin}' produces {actual} grids, map is {expected}"
            ),
            Self::DuplicateLayer(conflicts) => {
                write!(f, "duplicate output layers: ")?;
                for (i, c) in conflicts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(
                        f,
                        "layer '{}' published by '{}' and '{}'",
                        c.layer, c.first, c.second
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl Error for ConfigError {}

