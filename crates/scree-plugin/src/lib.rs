//! Plugin trait, per-call inputs, and the sequential pipeline for scree.
//!
//! The [`Plugin`] trait is the capability interface every layer filter
//! implements: `configure` between calls, `apply` once per frame with the
//! map, goal, and path passed explicitly. [`Pipeline`] runs a validated
//! list of plugins in order and publishes each output as a named layer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod inputs;
pub mod pipeline;
pub mod plugin;

pub use config::{ConfigError, LayerConflict, PipelineConfig};
pub use inputs::PluginInputs;
pub use pipeline::{ConfigureError, FrameError, FrameReport, Pipeline, StageDegradation};
pub use plugin::{apply_layers, Plugin};
