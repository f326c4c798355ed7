//! Error types for the scree framework.
//!
//! Construction and configuration failures are real errors. Per-frame
//! problems a plugin can recover from (a missing input layer, no path)
//! are [`Degradation`]s: logged, never propagated as failures.

use crate::grid::GridShape;
use std::error::Error;
use std::fmt;

/// Errors from grid construction and grid-to-grid operations.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A dimension is zero.
    EmptyShape {
        /// The rejected shape.
        shape: GridShape,
    },
    /// Resolution is NaN, infinite, zero, or negative.
    InvalidResolution {
        /// The rejected value.
        value: f32,
    },
    /// A buffer's length does not match `width * height`.
    LengthMismatch {
        /// `width * height`.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
    /// Two grids that must share a shape do not.
    ShapeMismatch {
        /// Shape of the receiving grid.
        expected: GridShape,
        /// Shape of the other grid.
        actual: GridShape,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyShape { shape } => write!(f, "grid shape {shape} has no cells"),
            Self::InvalidResolution { value } => {
                write!(f, "resolution must be finite and positive, got {value}")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "buffer has {actual} values, grid needs {expected}")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "grid shape {actual} does not match {expected}")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from assembling a layer registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerError {
    /// The number of grids differs from the number of names.
    CountMismatch {
        /// Number of grids supplied.
        grids: usize,
        /// Number of names in the table.
        names: usize,
    },
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountMismatch { grids, names } => {
                write!(f, "{grids} layer grids but {names} layer names")
            }
        }
    }
}

impl Error for LayerError {}

/// Errors from a named parameter update.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamError {
    /// The plugin has no parameter with this name.
    Unknown {
        /// Plugin that rejected the update.
        plugin: String,
        /// The unrecognised parameter name.
        name: String,
    },
    /// The value is outside the parameter's valid range.
    Invalid {
        /// Parameter name.
        name: String,
        /// The rejected value.
        value: f32,
        /// What the parameter requires.
        reason: &'static str,
    },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { plugin, name } => {
                write!(f, "plugin '{plugin}' has no parameter '{name}'")
            }
            Self::Invalid {
                name,
                value,
                reason,
            } => write!(f, "parameter '{name}' = {value} rejected: {reason}"),
        }
    }
}

impl Error for ParamError {}

/// Why a plugin could not compute a fresh output this frame.
///
/// For [`MissingLayer`](Self::MissingLayer) and
/// [`ShapeMismatch`](Self::ShapeMismatch) the previous output is kept
/// untouched. For [`NoPath`](Self::NoPath) and [`NoGoal`](Self::NoGoal)
/// the output is reset to all-unknown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Degradation {
    /// A required input layer is absent from every registry.
    MissingLayer {
        /// The layer name that could not be resolved.
        layer: String,
    },
    /// An input layer's shape differs from the plugin's.
    ShapeMismatch {
        /// The offending layer.
        layer: String,
        /// Plugin shape.
        expected: GridShape,
        /// Layer shape.
        actual: GridShape,
    },
    /// The plugin needs a path and none (or an empty one) was supplied.
    NoPath,
    /// The plugin needs a goal and none was supplied.
    NoGoal,
}

impl Degradation {
    /// Whether the plugin kept its previous output for this degradation.
    pub fn keeps_previous_output(&self) -> bool {
        matches!(self, Self::MissingLayer { .. } | Self::ShapeMismatch { .. })
    }
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLayer { layer } => {
                write!(f, "layer '{layer}' not found in base or plugin layers")
            }
            Self::ShapeMismatch {
                layer,
                expected,
                actual,
            } => write!(f, "layer '{layer}' is {actual}, expected {expected}"),
            Self::NoPath => write!(f, "no path set"),
            Self::NoGoal => write!(f, "no goal set"),
        }
    }
}

impl Error for Degradation {}
