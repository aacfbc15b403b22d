//! Spatial indexing backends.

mod grid;

pub use grid::Grid;
