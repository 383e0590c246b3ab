//! This module defines the error types used by the `navgrid-navigation` crate.

#![warn(missing_docs)]

use thiserror::Error;

/// Error type for navigation grid construction and configuration.
///
/// Query operations never return this type: an unreachable target or an
/// exhausted search budget is reported as `false` / `None` by the query itself.
#[derive(Debug, PartialEq, Error)]
pub enum NavigationError {
    /// Error for invalid grid dimensions.
    /// This variant is returned when width or height is zero or the cell count overflows.
    #[error("Invalid grid dimensions: {0}")]
    InvalidDimensions(&'static str),
    /// Error for a serialized grid that cannot be decoded.
    /// This variant is returned for truncated input or a header that disagrees with the payload.
    #[error("Malformed grid data: {0}")]
    MalformedData(&'static str),
    /// Error for two structures whose sizes must agree but do not.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(&'static str),
    /// Error for settings that could not be loaded or parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<config::ConfigError> for NavigationError {
    fn from(err: config::ConfigError) -> Self {
        NavigationError::InvalidConfiguration(err.to_string())
    }
}
