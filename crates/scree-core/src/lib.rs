//! Core types for the scree navigation-layer framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! fundamental abstractions shared across the workspace: the dense
//! [`Grid`], the tagged [`Cell`] sentinel, grid coordinates and goals,
//! the name→index [`LayerTable`] with its base-first [`MapView`], and the
//! error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod coord;
pub mod error;
pub mod grid;
pub mod layer;

pub use cell::Cell;
pub use coord::{Goal, GridCoord};
pub use error::{Degradation, GridError, LayerError, ParamError};
pub use grid::{Grid, GridShape};
pub use layer::{LayerTable, MapView};
