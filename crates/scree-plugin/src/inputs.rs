//! Inputs passed to a plugin for one call.
//!
//! [`PluginInputs`] bundles the frame's [`MapView`] with the externally
//! supplied goal and path. Goal and path are call arguments rather than
//! state stored on the plugin, so there is no window in which a plugin
//! can observe a half-updated path.

use scree_core::{Degradation, Goal, Grid, GridCoord, GridShape, MapView};

/// Read-only inputs for [`Plugin::compute`](crate::Plugin::compute).
#[derive(Clone, Copy, Debug)]
pub struct PluginInputs<'a> {
    map: MapView<'a>,
    goal: Option<Goal>,
    path: Option<&'a [GridCoord]>,
}

impl<'a> PluginInputs<'a> {
    /// Inputs with no goal and no path.
    pub fn new(map: MapView<'a>) -> Self {
        Self {
            map,
            goal: None,
            path: None,
        }
    }

    /// Attach (or clear) the goal.
    pub fn with_goal(mut self, goal: Option<Goal>) -> Self {
        self.goal = goal;
        self
    }

    /// Attach (or clear) the path.
    pub fn with_path(mut self, path: Option<&'a [GridCoord]>) -> Self {
        self.path = path;
        self
    }

    /// The frame's layers.
    pub fn map(&self) -> &MapView<'a> {
        &self.map
    }

    /// The goal, if one is set.
    pub fn goal(&self) -> Option<Goal> {
        self.goal
    }

    /// The path, if one is set and non-empty.
    pub fn path(&self) -> Option<&'a [GridCoord]> {
        self.path.filter(|p| !p.is_empty())
    }

    /// Resolve `name` base-first and check it has `shape`.
    ///
    /// # Errors
    ///
    /// [`Degradation::MissingLayer`] if the name is in neither registry,
    /// [`Degradation::ShapeMismatch`] if the layer has another shape.
    pub fn require(&self, name: &str, shape: GridShape) -> Result<&'a Grid, Degradation> {
        let grid = self.map.layer(name).ok_or_else(|| missing(name))?;
        check_shape(name, grid, shape)
    }

    /// Like [`require`](Self::require) but only searches plugin layers.
    pub fn require_plugin(&self, name: &str, shape: GridShape) -> Result<&'a Grid, Degradation> {
        let grid = self.map.plugin_layer(name).ok_or_else(|| missing(name))?;
        check_shape(name, grid, shape)
    }
}

fn missing(name: &str) -> Degradation {
    Degradation::MissingLayer {
        layer: name.to_string(),
    }
}

fn check_shape<'a>(name: &str, grid: &'a Grid, shape: GridShape) -> Result<&'a Grid, Degradation> {
    if grid.shape() == shape {
        Ok(grid)
    } else {
        Err(Degradation::ShapeMismatch {
            layer: name.to_string(),
            expected: shape,
            actual: grid.shape(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scree_core::LayerTable;

    #[test]
    fn empty_path_reads_as_none() {
        let table = LayerTable::default();
        let view = MapView::new(&[], &table, &[], &table).unwrap();
        let path: Vec<GridCoord> = Vec::new();
        let inputs = PluginInputs::new(view).with_path(Some(&path));
        assert!(inputs.path().is_none());
        assert!(inputs.goal().is_none());
    }

    #[test]
    fn require_reports_missing_and_shape() {
        let base = [Grid::new(GridShape::square(3), 1.0).unwrap()];
        let base_table = LayerTable::new(&["elevation"]);
        let empty = LayerTable::default();
        let view = MapView::new(&base, &base_table, &[], &empty).unwrap();
        let inputs = PluginInputs::new(view);

        assert!(inputs.require("elevation", GridShape::square(3)).is_ok());
        assert_eq!(
            inputs.require("slope", GridShape::square(3)).unwrap_err(),
            Degradation::MissingLayer {
                layer: "slope".into()
            }
        );
        assert!(matches!(
            inputs.require("elevation", GridShape::square(4)),
            Err(Degradation::ShapeMismatch { .. })
        ));
        assert!(inputs
            .require_plugin("elevation", GridShape::square(3))
            .is_err());
    }
}
