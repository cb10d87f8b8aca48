//! Converts raw survey geometry into `GeoJSON` feature collections.
//!
//! Facility fences become `Polygon` features with a closed exterior ring.
//! Underground and overhead line segments share one `LineString` conversion
//! path; their differing attribute schemas are bridged by
//! [`SegmentRecord`]. Output positions are always `[longitude, latitude]`.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use load_map_gis_models::{FacilityFence, GisDataset, LayerNames, Point, Polyline, SegmentRecord};

/// Property key for a fence's facility name.
pub const FENCE_NAME_KEY: &str = "name_ets";

/// Property key for a line segment's transmission line name.
pub const LINE_NAME_KEY: &str = "tline_nm";

/// Property key for a line segment's secondary label.
pub const LINE_EXTRA_KEY: &str = "extra";

/// Property key for the layer tag.
pub const LAYER_KEY: &str = "layer";

/// One named group of polylines, ready for conversion.
#[derive(Debug, Clone, Copy)]
pub struct LineGroup<'a> {
    /// Layer tag for every feature in the group.
    pub layer: &'a str,
    /// Primary label.
    pub name: Option<&'a str>,
    /// Secondary label (voltage, rating, status...).
    pub extra: Option<&'a str>,
    /// Group geometry.
    pub polylines: &'a [Polyline],
}

impl<'a> LineGroup<'a> {
    /// Builds a group from any segment record.
    #[must_use]
    pub fn from_record<T: SegmentRecord>(record: &'a T, layer: &'a str) -> Self {
        Self {
            layer,
            name: record.name(),
            extra: record.extra(),
            polylines: record.polylines(),
        }
    }
}

/// The display layers of one dataset, each serialized as a
/// `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayers {
    /// Facility fence polygons.
    pub fences: String,
    /// Underground line segments.
    pub underground: String,
    /// Overhead line segments.
    pub overhead: String,
}

/// Builds a property map, leaving out keys whose value is absent.
fn properties<'a>(entries: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) -> JsonObject {
    entries
        .into_iter()
        .filter_map(|(key, value)| Some((key.to_string(), JsonValue::from(value?))))
        .collect()
}

fn feature(geometry: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> String {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
    .to_string()
}

fn positions(points: &[Point]) -> Vec<Vec<f64>> {
    points.iter().map(|p| p.lon_lat().to_vec()).collect()
}

/// Converts a ring to `[lon, lat]` positions, appending the first position
/// when the ring is open. Rings with fewer than 3 points yield `None`.
fn closed_ring(points: &[Point]) -> Option<Vec<Vec<f64>>> {
    if points.len() < 3 {
        return None;
    }

    let mut ring = positions(points);
    let first = points[0].lon_lat();
    let last = points[points.len() - 1].lon_lat();
    if first != last {
        ring.push(first.to_vec());
    }

    Some(ring)
}

fn fence_features(fences: &[FacilityFence], layer: &str) -> Vec<Feature> {
    let mut features = Vec::new();
    let mut skipped = 0_usize;

    for fence in fences {
        for polygon in &fence.polygons {
            let Some(ring) = closed_ring(&polygon.points) else {
                skipped += 1;
                continue;
            };

            features.push(feature(
                Value::Polygon(vec![ring]),
                properties([(FENCE_NAME_KEY, fence.name()), (LAYER_KEY, Some(layer))]),
            ));
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} fence polygon(s) with fewer than 3 points");
    }

    features
}

fn line_features<'a>(groups: impl IntoIterator<Item = LineGroup<'a>>) -> Vec<Feature> {
    let mut features = Vec::new();
    let mut skipped = 0_usize;

    for group in groups {
        for polyline in group.polylines {
            if polyline.points.len() < 2 {
                skipped += 1;
                continue;
            }

            features.push(feature(
                Value::LineString(positions(&polyline.points)),
                properties([
                    (LINE_NAME_KEY, group.name),
                    (LINE_EXTRA_KEY, group.extra),
                    (LAYER_KEY, Some(group.layer)),
                ]),
            ));
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} polyline(s) with fewer than 2 points");
    }

    features
}

/// Serializes facility fences as a `FeatureCollection` of `Polygon`
/// features, one per ring with at least 3 points.
///
/// Each ring is closed if the survey left it open. Only exterior rings are
/// emitted.
#[must_use]
pub fn build_facility_fences(fences: &[FacilityFence], layer: &str) -> String {
    collection(fence_features(fences, layer))
}

/// Serializes line groups as a `FeatureCollection` of `LineString`
/// features, one per polyline with at least 2 points.
#[must_use]
pub fn build_line_segments<'a>(groups: impl IntoIterator<Item = LineGroup<'a>>) -> String {
    collection(line_features(groups))
}

/// Maps segment records of one kind to line groups under a single layer
/// tag. Groups from several kinds can be chained into one
/// [`build_line_segments`] call.
pub fn line_groups<'a, T: SegmentRecord>(
    records: &'a [T],
    layer: &'a str,
) -> impl Iterator<Item = LineGroup<'a>> + 'a {
    records
        .iter()
        .map(move |record| LineGroup::from_record(record, layer))
}

/// Serializes one kind of line segment record under a single layer tag.
#[must_use]
pub fn build_segment_layer<T: SegmentRecord>(records: &[T], layer: &str) -> String {
    build_line_segments(line_groups(records, layer))
}

/// Builds the fence, underground, and overhead layers of a dataset.
#[must_use]
pub fn build_dataset_layers(dataset: &GisDataset, layers: &LayerNames) -> DatasetLayers {
    DatasetLayers {
        fences: build_facility_fences(&dataset.electric_facility_fence, &layers.fence),
        underground: build_segment_layer(&dataset.ug_line_segment, &layers.underground),
        overhead: build_segment_layer(&dataset.oh_line_segment, &layers.overhead),
    }
}
