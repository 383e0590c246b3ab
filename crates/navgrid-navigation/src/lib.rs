//! Grid-based navigation: passability grids, coverage rasterization and
//! spatial queries (paths, line of sight, nearest reachable cell).

pub mod astar;
pub mod error;
pub mod map;
pub mod query;
pub mod settings;

pub use error::NavigationError;
pub use map::{CoverageRasterizer, Grid, Position, RASTER_RES, UpAxis, WorldPoint3};
pub use query::{Query, QueryConfig, QueryState};
pub use settings::NavigationSettings;
