//! Navigation layer filters for the scree plugin framework.
//!
//! Every filter implements [`scree_plugin::Plugin`] and publishes one
//! named layer. Five of them are instances of the windowed nearest-feature
//! search in [`window`]; the goal filter is closed form.
//!
//! # Pipeline order (each frame)
//!
//! 1. [`DistanceFilter`]: reads(elevation) → writes(distance_filter_layer)
//! 2. [`InflationFilter`]: reads(elevation) → writes(inflation_filter_layer)
//! 3. [`ObstacleAngleFilter`]: reads(elevation) → writes(obstacle_angle_filter_layer)
//! 4. [`PathDistanceFilter`]: path → writes(path_distance_filter_layer)
//! 5. [`PathAngleFilter`]: path → writes(path_angle_filter_layer)
//! 6. [`GoalDistanceFilter`]: goal → writes(goal_distance_filter_layer)
//! 7. [`CostFilter`]: reads(1, 4, 6 or 1, 3, 5) → writes(cost_filter_layer)
//!
//! # Features
//!
//! - `parallel`: sweep grid rows on the rayon thread pool.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cost;
pub mod distance;
pub mod goal_distance;
pub mod inflation;
pub mod layers;
pub mod obstacle_angle;
mod params;
pub mod path_angle;
pub mod path_distance;
mod path_map;
pub mod window;

pub use cost::{CombineMode, CostFilter, CostFilterBuilder, CostLayers, CostWeights};
pub use distance::{DistanceFilter, DistanceFilterBuilder, DistanceMode, DistanceParams};
pub use goal_distance::{GoalDistanceFilter, GoalDistanceFilterBuilder, GoalFrame};
pub use inflation::{InflationFilter, InflationFilterBuilder};
pub use obstacle_angle::{ObstacleAngleFilter, ObstacleAngleFilterBuilder, ObstacleAngleParams};
pub use path_angle::{PathAngleFilter, PathAngleFilterBuilder, PathAngleParams};
pub use path_distance::{
    PathDistanceFilter, PathDistanceFilterBuilder, PathDistanceMode, PathDistanceParams,
};
pub use window::{Cutoff, Hit, Window};
