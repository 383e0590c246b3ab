//! TOML settings for building queries and thresholding coverage.
//!
//! ```toml
//! [query]
//! disable_connectivity = false
//! blocker_mask = 255
//! force_passable_mask = 0
//!
//! [robust]
//! max_start_distance = 4
//! max_end_distance = 4
//!
//! [coverage]
//! min_samples = 4
//! covered_value = 0
//! ```
//!
//! Every key is optional; missing keys take the values shown above.

use config::{Config, File, FileFormat};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::error::NavigationError;
use crate::map::{CoverageRasterizer, Grid};
use crate::query::{DEFAULT_BLOCKER_MASK, DEFAULT_FORCE_PASSABLE_MASK, Query, QueryConfig};

/// Construction parameters for [`Query`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub disable_connectivity: bool,
    pub blocker_mask: u8,
    pub force_passable_mask: u8,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            disable_connectivity: false,
            blocker_mask: DEFAULT_BLOCKER_MASK,
            force_passable_mask: DEFAULT_FORCE_PASSABLE_MASK,
        }
    }
}

impl QuerySettings {
    pub fn config(&self) -> QueryConfig {
        if self.disable_connectivity {
            QueryConfig::DISABLE_CONNECTIVITY
        } else {
            QueryConfig::empty()
        }
    }

    /// Binds a query to `grid` with these settings.
    pub fn build_query<'a>(&self, grid: &'a Grid) -> Query<'a> {
        Query::new(grid, self.config(), self.blocker_mask, self.force_passable_mask)
    }
}

/// Endpoint substitution ranges for [`Query::robust_find_straight_path`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RobustSettings {
    pub max_start_distance: u32,
    pub max_end_distance: u32,
}

impl Default for RobustSettings {
    fn default() -> Self {
        Self {
            max_start_distance: 4,
            max_end_distance: 4,
        }
    }
}

/// Threshold used when turning coverage counts into cell values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoverageSettings {
    pub min_samples: u32,
    pub covered_value: u8,
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            min_samples: 4,
            covered_value: 0,
        }
    }
}

impl CoverageSettings {
    /// Writes `covered_value` into every cell of `grid` with enough coverage.
    pub fn apply(&self, rasterizer: &CoverageRasterizer, grid: &mut Grid) -> Result<usize, NavigationError> {
        rasterizer.apply_to_grid(grid, self.min_samples, self.covered_value)
    }
}

/// All navigation settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    pub query: QuerySettings,
    pub robust: RobustSettings,
    pub coverage: CoverageSettings,
}

impl NavigationSettings {
    /// Loads settings from a TOML file. The file must exist.
    pub fn load(path: &str) -> Result<Self, NavigationError> {
        info!("Attempting to load navigation settings from {}", path);

        let settings = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(true))
            .build()
            .and_then(|config| config.try_deserialize::<NavigationSettings>());

        match settings {
            Ok(settings) => {
                info!("Successfully loaded navigation settings: {:?}", settings);
                Ok(settings)
            }
            Err(e) => {
                error!("Failed to load navigation settings: {}", e);
                Err(e.into())
            }
        }
    }

    /// Parses settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, NavigationError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize::<NavigationSettings>()?;
        debug!(?settings, "Parsed navigation settings");
        Ok(settings)
    }
}
