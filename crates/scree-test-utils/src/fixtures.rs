//! Reusable plugin test fixtures.
//!
//! Three standard plugins for pipeline and dispatch testing:
//!
//! - [`ConstPlugin`] writes a constant value, reads nothing.
//! - [`ReadThroughPlugin`] copies one named layer to its output.
//! - [`CountingPlugin`] writes how many times it has run.
//!
//! Each publishes `"{name}_layer"` unless told otherwise.

use scree_core::{Degradation, Grid, GridShape, ParamError};
use scree_plugin::{Plugin, PluginInputs};
use smallvec::{smallvec, SmallVec};

const RESOLUTION: f32 = 1.0;

fn unknown_grid(shape: GridShape) -> Grid {
    Grid::new(shape, RESOLUTION).expect("fixture shape must be non-empty")
}

fn unknown_param(plugin: &str, name: &str) -> ParamError {
    ParamError::Unknown {
        plugin: plugin.to_string(),
        name: name.to_string(),
    }
}

/// Writes a constant value to all cells. Parameter: `value`.
pub struct ConstPlugin {
    pub name: String,
    pub layer: String,
    pub value: f32,
    out: Grid,
}

impl ConstPlugin {
    pub fn new(name: impl Into<String>, shape: GridShape, value: f32) -> Self {
        let name = name.into();
        Self {
            layer: format!("{name}_layer"),
            name,
            value,
            out: unknown_grid(shape),
        }
    }

    /// Publish under `layer` instead of the default name.
    pub fn publishing(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }
}

impl Plugin for ConstPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_layer(&self) -> &str {
        &self.layer
    }

    fn params(&self) -> Vec<(&'static str, f32)> {
        vec![("value", self.value)]
    }

    fn configure(&mut self, name: &str, value: f32) -> Result<(), ParamError> {
        match name {
            "value" => {
                self.value = value;
                Ok(())
            }
            _ => Err(unknown_param(&self.name, name)),
        }
    }

    fn compute(&mut self, _inputs: &PluginInputs<'_>) -> Result<(), Degradation> {
        self.out.fill(self.value);
        Ok(())
    }

    fn output(&self) -> &Grid {
        &self.out
    }
}

/// Copies the layer called `input` (base-first lookup) to its output.
///
/// Useful for testing layer routing: if the output matches the source,
/// lookup and stage ordering are working.
pub struct ReadThroughPlugin {
    pub name: String,
    pub input: String,
    layer: String,
    out: Grid,
}

impl ReadThroughPlugin {
    pub fn new(name: impl Into<String>, input: impl Into<String>, shape: GridShape) -> Self {
        let name = name.into();
        Self {
            layer: format!("{name}_layer"),
            name,
            input: input.into(),
            out: unknown_grid(shape),
        }
    }
}

impl Plugin for ReadThroughPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_layer(&self) -> &str {
        &self.layer
    }

    fn input_layers(&self) -> SmallVec<[&str; 3]> {
        smallvec![self.input.as_str()]
    }

    fn params(&self) -> Vec<(&'static str, f32)> {
        Vec::new()
    }

    fn configure(&mut self, name: &str, _value: f32) -> Result<(), ParamError> {
        Err(unknown_param(&self.name, name))
    }

    fn compute(&mut self, inputs: &PluginInputs<'_>) -> Result<(), Degradation> {
        let source = inputs.require(&self.input, self.out.shape())?;
        self.out.as_mut_slice().copy_from_slice(source.as_slice());
        Ok(())
    }

    fn output(&self) -> &Grid {
        &self.out
    }
}

/// Fills its output with the number of completed calls, starting at 1.
pub struct CountingPlugin {
    pub name: String,
    layer: String,
    calls: usize,
    out: Grid,
}

impl CountingPlugin {
    pub fn new(name: impl Into<String>, shape: GridShape) -> Self {
        let name = name.into();
        Self {
            layer: format!("{name}_layer"),
            name,
            calls: 0,
            out: unknown_grid(shape),
        }
    }

    /// How many times `compute()` has been called.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Plugin for CountingPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_layer(&self) -> &str {
        &self.layer
    }

    fn params(&self) -> Vec<(&'static str, f32)> {
        Vec::new()
    }

    fn configure(&mut self, name: &str, _value: f32) -> Result<(), ParamError> {
        Err(unknown_param(&self.name, name))
    }

    fn compute(&mut self, _inputs: &PluginInputs<'_>) -> Result<(), Degradation> {
        self.calls += 1;
        self.out.fill(self.calls as f32);
        Ok(())
    }

    fn output(&self) -> &Grid {
        &self.out
    }
}
