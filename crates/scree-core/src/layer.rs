//! Named layer lookup.
//!
//! A frame arrives as two ordered lists of grids with parallel name lists:
//! base layers (from the elevation map) and plugin layers (outputs of
//! earlier plugins). [`LayerTable`] turns a name list into an O(1)
//! name→index map that is rebuilt only when the list changes.
//! [`MapView`] pairs both tables with their grids and resolves names
//! base-first.

use crate::error::LayerError;
use crate::grid::Grid;
use indexmap::IndexMap;

/// Precomputed name→index table for one ordered layer list.
///
/// Duplicate names resolve to their first occurrence.
#[derive(Clone, Debug, Default)]
pub struct LayerTable {
    names: Vec<String>,
    index: IndexMap<String, usize>,
}

impl LayerTable {
    /// Build a table for `names`.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let mut table = Self::default();
        table.rebuild(names);
        table
    }

    /// Bring the table in line with `names`.
    ///
    /// Returns `true` if the list differed and the table was rebuilt,
    /// `false` if it already matched and nothing was touched.
    pub fn refresh<S: AsRef<str>>(&mut self, names: &[S]) -> bool {
        let unchanged = self.names.len() == names.len()
            && self
                .names
                .iter()
                .zip(names)
                .all(|(a, b)| a.as_str() == b.as_ref());
        if unchanged {
            return false;
        }
        self.rebuild(names);
        true
    }

    fn rebuild<S: AsRef<str>>(&mut self, names: &[S]) {
        self.names.clear();
        self.index.clear();
        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            self.names.push(name.to_string());
            self.index.entry(name.to_string()).or_insert(i);
        }
    }

    /// Position of the first layer called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether a layer called `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The registered names in order, duplicates included.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of registered layers.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no layers are registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Read-only view of one frame's layers.
#[derive(Clone, Copy, Debug)]
pub struct MapView<'a> {
    base: &'a [Grid],
    base_table: &'a LayerTable,
    plugin: &'a [Grid],
    plugin_table: &'a LayerTable,
}

impl<'a> MapView<'a> {
    /// Pair grids with their tables.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::CountMismatch`] if a grid list and its table
    /// have different lengths.
    pub fn new(
        base: &'a [Grid],
        base_table: &'a LayerTable,
        plugin: &'a [Grid],
        plugin_table: &'a LayerTable,
    ) -> Result<Self, LayerError> {
        for (grids, table) in [(base, base_table), (plugin, plugin_table)] {
            if grids.len() != table.len() {
                return Err(LayerError::CountMismatch {
                    grids: grids.len(),
                    names: table.len(),
                });
            }
        }
        Ok(Self {
            base,
            base_table,
            plugin,
            plugin_table,
        })
    }

    /// Resolve `name` in the base layers, then the plugin layers.
    pub fn layer(&self, name: &str) -> Option<&'a Grid> {
        self.base_layer(name).or_else(|| self.plugin_layer(name))
    }

    /// Resolve `name` in the base layers only.
    pub fn base_layer(&self, name: &str) -> Option<&'a Grid> {
        self.base_table
            .position(name)
            .and_then(|i| self.base.get(i))
    }

    /// Resolve `name` in the plugin layers only.
    pub fn plugin_layer(&self, name: &str) -> Option<&'a Grid> {
        self.plugin_table
            .position(name)
            .and_then(|i| self.plugin.get(i))
    }

    /// Base-layer names in order.
    pub fn base_names(&self) -> &'a [String] {
        self.base_table.names()
    }

    /// Plugin-layer names in order.
    pub fn plugin_names(&self) -> &'a [String] {
        self.plugin_table.names()
    }
}
