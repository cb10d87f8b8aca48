#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! GeoJSON conversion, map extents, and route length measurement for
//! utility survey data.
//!
//! Converts raw survey geometry (facility fences, underground and overhead
//! line segments) into `GeoJSON` feature collections for the map, computes
//! the extent the map should fit to, and measures the great-circle length of
//! any `GeoJSON` document in miles.
//!
//! The conversion and measurement functions never fail: geometry that is
//! unparsable, too short, or missing is left out of the result. Only the
//! loaders in [`dataset`] and [`config`] return errors.

pub mod bounds;
pub mod builder;
pub mod config;
pub mod dataset;
pub mod distance;
pub mod measure;

pub use bounds::compute_bounds;
pub use builder::{
    DatasetLayers, LineGroup, build_dataset_layers, build_facility_fences, build_line_segments,
    build_segment_layer, line_groups,
};
pub use distance::{EARTH_RADIUS_MILES, haversine_miles};
pub use measure::{calculate_total_miles, calculate_total_miles_with};

use thiserror::Error;

/// Errors that can occur while loading datasets or configuration.
#[derive(Debug, Error)]
pub enum GisError {
    /// Reading a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing failed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}
