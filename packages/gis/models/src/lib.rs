#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Utility survey dataset, extent, and route length types.
//!
//! These types mirror the raw GIS export consumed by the map designer
//! (facility fences plus underground and overhead transmission line
//! segments, all as latitude/longitude point lists) and the small values
//! derived from it. Every container in the raw schema is optional: a missing
//! or `null` list decodes to an empty one and `null` list entries are
//! dropped, so downstream code never has to check for absent data.

use std::iter::Sum;
use std::ops::AddAssign;

use serde::{Deserialize, Deserializer, Serialize};

/// Default layer tag for facility fence features.
pub const FENCE_LAYER: &str = "ElectricFacilityFence";

/// Default layer tag for underground line segment features.
pub const UNDERGROUND_LAYER: &str = "UGLineSegment";

/// Default layer tag for overhead line segment features.
pub const OVERHEAD_LAYER: &str = "OHLineSegment";

/// Default nesting limit for `GeometryCollection` members.
pub const DEFAULT_MAX_COLLECTION_DEPTH: usize = 32;

/// Decodes an optional list that may contain `null` entries into a plain
/// `Vec`, dropping the nulls.
fn skip_nulls<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.into_iter().flatten().flatten().collect())
}

/// A surveyed point in degrees. Source order is latitude first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Point {
    /// Latitude in degrees (WGS84).
    #[serde(default, alias = "latitude")]
    pub latitude: f64,
    /// Longitude in degrees (WGS84).
    #[serde(default, alias = "longitude")]
    pub longitude: f64,
}

impl Point {
    /// Creates a point from a `(latitude, longitude)` pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the `[longitude, latitude]` position used by `GeoJSON`.
    #[must_use]
    pub const fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// A polygon ring as surveyed. Not necessarily closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Polygon {
    /// Ring vertices in survey order.
    #[serde(default, alias = "points", deserialize_with = "skip_nulls")]
    pub points: Vec<Point>,
}

/// An open polyline as surveyed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Polyline {
    /// Vertices in survey order.
    #[serde(default, alias = "points", deserialize_with = "skip_nulls")]
    pub points: Vec<Point>,
}

/// Attributes recorded for an electric facility fence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenceAttributes {
    /// Facility name.
    #[serde(default)]
    pub name_ets: Option<String>,
}

/// An electric facility enclosure with one or more boundary rings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FacilityFence {
    /// Name of the attribute the source system displays for this record.
    #[serde(default, alias = "displayFieldName")]
    pub display_field_name: Option<String>,
    /// Fence attributes.
    #[serde(default, alias = "attributes")]
    pub attributes: Option<FenceAttributes>,
    /// Boundary rings.
    #[serde(default, alias = "polygons", deserialize_with = "skip_nulls")]
    pub polygons: Vec<Polygon>,
}

impl FacilityFence {
    /// Returns the facility name, if recorded.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attributes.as_ref()?.name_ets.as_deref()
    }
}

/// Attributes recorded for an underground line segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UgLineSegmentAttributes {
    /// Transmission line name.
    #[serde(default)]
    pub tline_nm: Option<String>,
    /// Nominal voltage label (e.g. "138").
    #[serde(default)]
    pub nominal_voltage: Option<String>,
}

/// An underground transmission line segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UgLineSegment {
    /// Name of the attribute the source system displays for this record.
    #[serde(default, alias = "displayFieldName")]
    pub display_field_name: Option<String>,
    /// Segment attributes.
    #[serde(default, alias = "attributes")]
    pub attributes: Option<UgLineSegmentAttributes>,
    /// Segment geometry.
    #[serde(default, alias = "polylines", deserialize_with = "skip_nulls")]
    pub polylines: Vec<Polyline>,
}

/// Attributes recorded for an overhead line segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OhLineSegmentAttributes {
    /// Transmission line name.
    #[serde(default)]
    pub tline_nm: Option<String>,
    /// Operating status (e.g. "In Service").
    #[serde(default)]
    pub status: Option<String>,
    /// Rated voltage in kV.
    #[serde(default)]
    pub ratedkv: Option<String>,
}

/// An overhead transmission line segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OhLineSegment {
    /// Name of the attribute the source system displays for this record.
    #[serde(default, alias = "displayFieldName")]
    pub display_field_name: Option<String>,
    /// Segment attributes.
    #[serde(default, alias = "attributes")]
    pub attributes: Option<OhLineSegmentAttributes>,
    /// Segment geometry.
    #[serde(default, alias = "polylines", deserialize_with = "skip_nulls")]
    pub polylines: Vec<Polyline>,
}

/// Attribute extraction shared by both line segment variants.
///
/// Lets one builder emit features for underground and overhead segments
/// without knowing their attribute schemas.
pub trait SegmentRecord {
    /// Primary label (the transmission line name).
    fn name(&self) -> Option<&str>;

    /// Secondary label shown alongside the name.
    fn extra(&self) -> Option<&str>;

    /// Segment geometry.
    fn polylines(&self) -> &[Polyline];
}

impl SegmentRecord for UgLineSegment {
    fn name(&self) -> Option<&str> {
        self.attributes.as_ref()?.tline_nm.as_deref()
    }

    fn extra(&self) -> Option<&str> {
        self.attributes.as_ref()?.nominal_voltage.as_deref()
    }

    fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }
}

impl SegmentRecord for OhLineSegment {
    fn name(&self) -> Option<&str> {
        self.attributes.as_ref()?.tline_nm.as_deref()
    }

    /// Rated kV, or the operating status for segments with no rating.
    fn extra(&self) -> Option<&str> {
        let attributes = self.attributes.as_ref()?;
        attributes
            .ratedkv
            .as_deref()
            .or(attributes.status.as_deref())
    }

    fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }
}

/// The area the dataset was requested for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestCriteria {
    /// Southern latitude bound.
    #[serde(default, alias = "southernBoundary")]
    pub southern_boundary: f64,
    /// Northern latitude bound.
    #[serde(default, alias = "northernBoundary")]
    pub northern_boundary: f64,
    /// Western longitude bound.
    #[serde(default, alias = "westernBoundary")]
    pub western_boundary: f64,
    /// Eastern longitude bound.
    #[serde(default, alias = "easternBoundary")]
    pub eastern_boundary: f64,
}

impl RequestCriteria {
    /// Returns the requested area as a map extent.
    #[must_use]
    pub const fn to_bounds(&self) -> Bounds {
        Bounds {
            west: self.western_boundary,
            south: self.southern_boundary,
            east: self.eastern_boundary,
            north: self.northern_boundary,
        }
    }
}

/// A raw GIS export covering one requested area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GisDataset {
    /// Declared request area, used as the fallback extent.
    #[serde(default, alias = "requestCriteria")]
    pub request_criteria: Option<RequestCriteria>,
    /// Layers the source system failed to export. Kept opaque.
    #[serde(default, alias = "errorLayers", deserialize_with = "skip_nulls")]
    pub error_layers: Vec<serde_json::Value>,
    /// Facility fences.
    #[serde(
        default,
        alias = "electricFacilityFence",
        deserialize_with = "skip_nulls"
    )]
    pub electric_facility_fence: Vec<FacilityFence>,
    /// Underground line segments.
    #[serde(
        default,
        rename = "UGLineSegment",
        alias = "ugLineSegment",
        deserialize_with = "skip_nulls"
    )]
    pub ug_line_segment: Vec<UgLineSegment>,
    /// Overhead line segments.
    #[serde(
        default,
        rename = "OHLineSegment",
        alias = "ohLineSegment",
        deserialize_with = "skip_nulls"
    )]
    pub oh_line_segment: Vec<OhLineSegment>,
}

/// A map extent in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

/// Total length and visited point count of the lines in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLength {
    /// Sum of great-circle segment lengths, in statute miles.
    pub miles: f64,
    /// Number of points visited, counted once per line they appear in.
    pub points: usize,
}

impl AddAssign for RouteLength {
    fn add_assign(&mut self, rhs: Self) {
        self.miles += rhs.miles;
        self.points += rhs.points;
    }
}

impl Sum for RouteLength {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut total, length| {
            total += length;
            total
        })
    }
}

/// Layer tags stamped onto emitted features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerNames {
    /// Tag for facility fence polygons.
    pub fence: String,
    /// Tag for underground line segments.
    pub underground: String,
    /// Tag for overhead line segments.
    pub overhead: String,
}

impl Default for LayerNames {
    fn default() -> Self {
        Self {
            fence: FENCE_LAYER.to_string(),
            underground: UNDERGROUND_LAYER.to_string(),
            overhead: OVERHEAD_LAYER.to_string(),
        }
    }
}

/// Limits applied while measuring arbitrary `GeoJSON`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Deepest `GeometryCollection` nesting that is still measured.
    pub max_collection_depth: usize,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            max_collection_depth: DEFAULT_MAX_COLLECTION_DEPTH,
        }
    }
}

/// Engine configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GisConfig {
    /// Feature layer tags.
    pub layers: LayerNames,
    /// Measurement limits.
    pub measure: MeasureConfig,
}
