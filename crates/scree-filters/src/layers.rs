//! Default layer names used by the filter set.

/// Elevation base layer read by the obstacle filters.
pub const ELEVATION: &str = "elevation";
/// Output of [`DistanceFilter`](crate::DistanceFilter).
pub const DISTANCE: &str = "distance_filter_layer";
/// Output of [`InflationFilter`](crate::InflationFilter).
pub const INFLATION: &str = "inflation_filter_layer";
/// Output of [`ObstacleAngleFilter`](crate::ObstacleAngleFilter).
pub const OBSTACLE_ANGLE: &str = "obstacle_angle_filter_layer";
/// Output of [`PathDistanceFilter`](crate::PathDistanceFilter).
pub const PATH_DISTANCE: &str = "path_distance_filter_layer";
/// Output of [`PathAngleFilter`](crate::PathAngleFilter).
pub const PATH_ANGLE: &str = "path_angle_filter_layer";
/// Output of [`GoalDistanceFilter`](crate::GoalDistanceFilter).
pub const GOAL_DISTANCE: &str = "goal_distance_filter_layer";
/// Output of [`CostFilter`](crate::CostFilter).
pub const COST: &str = "cost_filter_layer";

/// Default map width and height in cells.
pub const DEFAULT_CELL_N: usize = 100;
