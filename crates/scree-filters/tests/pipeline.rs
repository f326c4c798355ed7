//! The full filter set running as one pipeline.

use scree_core::{Degradation, Goal, GridCoord, GridShape};
use scree_filters::{
    layers, CombineMode, CostFilter, DistanceFilter, GoalDistanceFilter, GoalFrame,
    InflationFilter, ObstacleAngleFilter, PathAngleFilter, PathDistanceFilter,
};
use scree_plugin::{Pipeline, PipelineConfig};
use scree_test_utils::{assert_close, obstacle_grid, straight_path};

const CELL_N: usize = 21;
const RES: f32 = 0.1;

fn pipeline(mode: CombineMode) -> Pipeline {
    let shape = GridShape::square(CELL_N);
    let config = PipelineConfig::new(shape)
        .with_plugin(
            DistanceFilter::builder()
                .shape(shape)
                .radius(0.5)
                .resolution(RES)
                .min_distance(0.15)
                .build()
                .unwrap(),
        )
        .with_plugin(InflationFilter::builder().shape(shape).radius(3).build().unwrap())
        .with_plugin(
            ObstacleAngleFilter::builder()
                .shape(shape)
                .radius(0.5)
                .resolution(RES)
                .min_distance(0.15)
                .build()
                .unwrap(),
        )
        .with_plugin(
            PathDistanceFilter::builder()
                .shape(shape)
                .radius(0.5)
                .resolution(RES)
                .build()
                .unwrap(),
        )
        .with_plugin(
            PathAngleFilter::builder()
                .shape(shape)
                .radius(0.5)
                .resolution(RES)
                .build()
                .unwrap(),
        )
        .with_plugin(
            GoalDistanceFilter::builder()
                .shape(shape)
                .resolution(RES)
                .frame(GoalFrame::CellCentered)
                .build()
                .unwrap(),
        )
        .with_plugin(CostFilter::builder().shape(shape).mode(mode).build().unwrap());
    Pipeline::new(config).unwrap()
}

fn path() -> Vec<GridCoord> {
    straight_path((10, 2), (10, 18))
}

#[test]
fn publishes_every_layer_in_order() {
    let p = pipeline(CombineMode::Linear);
    assert_eq!(
        p.plugin_layer_names(),
        &[
            layers::DISTANCE,
            layers::INFLATION,
            layers::OBSTACLE_ANGLE,
            layers::PATH_DISTANCE,
            layers::PATH_ANGLE,
            layers::GOAL_DISTANCE,
            layers::COST,
        ]
    );
}

#[test]
fn full_frame_is_clean_and_cost_sums_layers() {
    let mut p = pipeline(CombineMode::Linear);
    let elevation = obstacle_grid(CELL_N, RES, &[(5, 5)]);
    let path = path();
    let report = p
        .run(&[elevation], &[layers::ELEVATION], Some(Goal::new(0.0, 0.0)), Some(&path))
        .unwrap();
    assert!(report.is_clean(), "{:?}", report.degraded);

    let at = |name: &str, row, col| p.layer(name).unwrap().get(row, col).unwrap();
    for (row, col) in [(10, 10), (9, 12), (6, 8)] {
        let expected = at(layers::DISTANCE, row, col)
            + at(layers::PATH_DISTANCE, row, col)
            + at(layers::GOAL_DISTANCE, row, col);
        assert_close(at(layers::COST, row, col), expected, 1e-5);
    }
    // The centre cell is on the path and is the goal.
    assert_eq!(at(layers::GOAL_DISTANCE, 10, 10), 0.0);
    assert_eq!(at(layers::INFLATION, 5, 5), 0.0);
    assert_eq!(p.layer(layers::INFLATION).unwrap().resolution(), 1.0);
}

#[test]
fn missing_goal_and_path_degrade_but_frame_completes() {
    let mut p = pipeline(CombineMode::Linear);
    let elevation = obstacle_grid(CELL_N, RES, &[(5, 5)]);
    let report = p.run(&[elevation], &[layers::ELEVATION], None, None).unwrap();

    let reasons: Vec<_> = report
        .degraded
        .iter()
        .map(|d| (d.plugin.as_str(), d.reason.clone()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("path_distance_filter", Degradation::NoPath),
            ("path_angle_filter", Degradation::NoPath),
            ("goal_distance_filter", Degradation::NoGoal),
        ]
    );
    // NaN path and goal layers propagate through the weighted sum.
    assert!(p.layer(layers::COST).unwrap().get(10, 10).unwrap().is_nan());
}

#[test]
fn missing_elevation_keeps_obstacle_layers() {
    let mut p = pipeline(CombineMode::Linear);
    let elevation = obstacle_grid(CELL_N, RES, &[(5, 5)]);
    let path = path();
    let goal = Some(Goal::new(0.0, 0.0));
    p.run(&[elevation], &[layers::ELEVATION], goal, Some(&path)).unwrap();
    let before = p.layer(layers::DISTANCE).unwrap().clone();

    let report = p.run::<&str>(&[], &[], goal, Some(&path)).unwrap();
    assert_eq!(report.degraded.len(), 3);
    assert!(report
        .degraded
        .iter()
        .all(|d| d.reason == Degradation::MissingLayer { layer: layers::ELEVATION.into() }));
    assert_eq!(p.layer(layers::DISTANCE).unwrap(), &before);
}

#[test]
fn auto_mode_switches_to_bearing() {
    let mut p = pipeline(CombineMode::Auto);
    let elevation = obstacle_grid(CELL_N, RES, &[]);
    let path = path();
    p.run(&[elevation], &[layers::ELEVATION], None, Some(&path)).unwrap();

    // No obstacles: the obstacle bearing is NaN everywhere and the path
    // heading wins. On the path it points east along the row.
    let cost = p.layer(layers::COST).unwrap();
    assert_close(cost.get(10, 10).unwrap(), std::f32::consts::FRAC_PI_2, 1e-5);
}

#[test]
fn configure_reaches_the_named_filter() {
    let mut p = pipeline(CombineMode::Linear);
    p.configure("cost_filter", "goal_distance_cost_scaling", 0.0).unwrap();
    let elevation = obstacle_grid(CELL_N, RES, &[]);
    let path = path();
    p.run(&[elevation], &[layers::ELEVATION], None, Some(&path)).unwrap();

    // Goal layer is NaN but disabled; distance is 0 with no obstacles in
    // range in smoothed mode, leaving the path term.
    let cost = p.layer(layers::COST).unwrap().get(10, 18).unwrap();
    assert_eq!(cost, 0.0);
    assert!(p.configure("cost_filter", "radius", 1.0).is_err());
}
