//! Benchmark profiles and utilities for the scree navigation filters.
//!
//! Provides pre-built inputs and [`PipelineConfig`] profiles for
//! benchmarking:
//!
//! - [`reference_profile`]: 100x100 grid (10K cells) with every filter
//! - [`stress_profile`]: 316x316 grid (~100K cells) for stress testing
//! - [`reference_terrain`]: deterministic boulder field via seed
//! - [`reference_path`]: a diagonal path across the grid

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use scree_core::{Goal, Grid, GridCoord, GridShape};
use scree_filters::{
    CostFilter, DistanceFilter, GoalDistanceFilter, InflationFilter, ObstacleAngleFilter,
    PathAngleFilter, PathDistanceFilter,
};
use scree_plugin::PipelineConfig;

/// Metres per cell used by every profile.
pub const RESOLUTION: f32 = 0.05;

/// Elevation of free ground.
pub const GROUND: f32 = -0.3;

/// Elevation of a boulder cell.
pub const BOULDER: f32 = 0.5;

/// Build a reference benchmark profile: 100x100 grid (10K cells).
///
/// Pipeline: Distance → Inflation(3) → ObstacleAngle → PathDistance →
/// PathAngle → GoalDistance → Cost, all at their default radii.
pub fn reference_profile() -> Result<PipelineConfig, String> {
    profile(GridShape::square(100))
}

/// Build a stress benchmark profile: 316x316 grid (~100K cells).
///
/// Same pipeline as [`reference_profile`] but at 10x the cell count.
pub fn stress_profile() -> Result<PipelineConfig, String> {
    profile(GridShape::square(316))
}

fn profile(shape: GridShape) -> Result<PipelineConfig, String> {
    Ok(PipelineConfig::new(shape)
        .with_plugin(DistanceFilter::builder().shape(shape).build()?)
        .with_plugin(InflationFilter::builder().shape(shape).radius(3).build()?)
        .with_plugin(ObstacleAngleFilter::builder().shape(shape).build()?)
        .with_plugin(PathDistanceFilter::builder().shape(shape).build()?)
        .with_plugin(PathAngleFilter::builder().shape(shape).build()?)
        .with_plugin(GoalDistanceFilter::builder().shape(shape).build()?)
        .with_plugin(CostFilter::builder().shape(shape).build()?))
}

/// Generate a deterministic boulder field.
///
/// Scatters `boulders` single-cell obstacles over [`GROUND`] using a
/// simple hash of the seed. Collisions are allowed.
pub fn reference_terrain(shape: GridShape, boulders: usize, seed: u64) -> Result<Grid, String> {
    let mut grid = Grid::filled(shape, RESOLUTION, GROUND).map_err(|e| e.to_string())?;
    let cells = shape.cell_count().max(1) as u64;
    for i in 0..boulders as u64 {
        let pos = (seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(i.wrapping_mul(1442695040888963407))
            % cells) as usize;
        grid.as_mut_slice()[pos] = BOULDER;
    }
    Ok(grid)
}

/// Diagonal path from near the bottom-left corner to near the top-right.
pub fn reference_path(shape: GridShape) -> Vec<GridCoord> {
    let n = shape.width.min(shape.height) as i32;
    (2..n - 2).map(|i| GridCoord::new(n - 1 - i, i)).collect()
}

/// Goal near the top-right of the map.
pub fn reference_goal(shape: GridShape) -> Goal {
    let half = 0.4 * shape.width.min(shape.height) as f32 * RESOLUTION;
    Goal::new(-half, half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scree_plugin::Pipeline;

    #[test]
    fn reference_profile_validates() {
        let config = reference_profile().unwrap();
        config.validate().unwrap();
        assert_eq!(config.plugins.len(), 7);
    }

    #[test]
    fn stress_profile_validates() {
        stress_profile().unwrap().validate().unwrap();
    }

    #[test]
    fn terrain_is_deterministic() {
        let shape = GridShape::square(50);
        let a = reference_terrain(shape, 40, 7).unwrap();
        let b = reference_terrain(shape, 40, 7).unwrap();
        assert_eq!(a, b);
        let boulders = a.as_slice().iter().filter(|&&v| v == BOULDER).count();
        assert!(boulders > 0 && boulders <= 40);
    }

    #[test]
    fn path_stays_inside() {
        let shape = GridShape::square(100);
        let path = reference_path(shape);
        assert_eq!(path.len(), 96);
        assert!(path.iter().all(|p| shape.is_interior(p.row, p.col)));
    }

    #[test]
    fn reference_frame_is_clean() {
        let shape = GridShape::square(100);
        let mut pipeline = Pipeline::new(reference_profile().unwrap()).unwrap();
        let terrain = reference_terrain(shape, 200, 42).unwrap();
        let path = reference_path(shape);
        let report = pipeline
            .run(&[terrain], &["elevation"], Some(reference_goal(shape)), Some(&path))
            .unwrap();
        assert!(report.is_clean());
    }
}
