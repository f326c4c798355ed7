//! Scree: navigation layers from a local elevation grid.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! scree sub-crates. For most users, adding `scree` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use scree::prelude::*;
//!
//! // A 32×32 map at 5 cm per cell with one obstacle.
//! let shape = GridShape::square(32);
//! let mut elevation = Grid::filled(shape, 0.05, -1.0).unwrap();
//! elevation.set(10, 12, 1.0);
//!
//! let config = PipelineConfig::new(shape)
//!     .with_plugin(DistanceFilter::builder().shape(shape).build().unwrap())
//!     .with_plugin(PathDistanceFilter::builder().shape(shape).build().unwrap())
//!     .with_plugin(GoalDistanceFilter::builder().shape(shape).build().unwrap())
//!     .with_plugin(CostFilter::builder().shape(shape).build().unwrap());
//! let mut pipeline = Pipeline::new(config).unwrap();
//!
//! let path: Vec<GridCoord> = (4..28).map(|col| GridCoord::new(16, col)).collect();
//! let report = pipeline
//!     .run(&[elevation], &["elevation"], Some(Goal::new(0.0, 0.0)), Some(&path))
//!     .unwrap();
//! assert!(report.is_clean());
//!
//! let cost = pipeline.layer("cost_filter_layer").unwrap();
//! assert!(cost.get(16, 16).unwrap().is_finite());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `scree-core` | Grids, sentinels, coordinates, layer tables, errors |
//! | [`plugin`] | `scree-plugin` | Plugin trait, per-call inputs, pipeline |
//! | [`filters`] | `scree-filters` | Window search and the navigation filters |
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for grids and coordinates.
//! - `parallel`: run each filter's per-cell sweep on the rayon pool.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grids, sentinels, coordinates, and errors (`scree-core`).
///
/// The dense [`types::Grid`] and its tagged [`types::Cell`] view are also
/// available in the [`prelude`].
pub use scree_core as types;

/// Plugin trait and sequential pipeline (`scree-plugin`).
///
/// The [`plugin::Plugin`] trait is the extension point for user-defined
/// layers; [`plugin::Pipeline`] runs a validated list of them per frame.
pub use scree_plugin as plugin;

/// Navigation filters (`scree-filters`).
///
/// Obstacle distance, inflation, and bearing, path distance and heading,
/// goal distance, and the [`filters::CostFilter`] combiner. The windowed
/// search they share is [`filters::window`].
pub use scree_filters as filters;

/// Common imports for typical scree usage.
///
/// ```rust
/// use scree::prelude::*;
/// ```
///
/// This imports the grid types, the plugin trait and pipeline, and every
/// filter with its mode enum.
pub mod prelude {
    // Core types
    pub use scree_core::{Cell, Goal, Grid, GridCoord, GridShape};

    // Errors
    pub use scree_core::{Degradation, GridError, LayerError, ParamError};

    // Plugin contract and pipeline
    pub use scree_plugin::{
        ConfigError, FrameError, FrameReport, Pipeline, PipelineConfig, Plugin, PluginInputs,
    };

    // Filters
    pub use scree_filters::{
        CombineMode, CostFilter, DistanceFilter, DistanceMode, GoalDistanceFilter, GoalFrame,
        InflationFilter, ObstacleAngleFilter, PathAngleFilter, PathDistanceFilter,
        PathDistanceMode,
    };
}
