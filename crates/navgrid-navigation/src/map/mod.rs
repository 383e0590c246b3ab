//! Map-related functionality for navigation.
//!
//! This module provides the passability grid, its coordinate types, and the
//! coverage rasterizer that turns source geometry into grid cell values.

pub mod coverage;
pub mod grid;
pub mod point_types;

pub use coverage::{CoverageRasterizer, RASTER_RES, UpAxis};
pub use grid::Grid;
pub use point_types::{Position, WorldPoint3};
