//! Route length measurement for arbitrary `GeoJSON` text.
//!
//! Input is decoded once into [`MeasuredGeometry`], a closed set of the
//! geometry kinds that have a length. Everything else decodes to
//! [`MeasuredGeometry::Unsupported`] and contributes nothing. Measurement
//! never fails: blank, unparsable, or shapeless input measures as zero.

use geo::{Coord, LineString, MultiLineString};
use load_map_gis_models::{MeasureConfig, RouteLength};
use serde_json::Value;

use crate::distance::haversine_miles;

/// Geometry decoded for length measurement.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasuredGeometry {
    /// A single line.
    LineString(LineString<f64>),
    /// Several independent lines.
    MultiLineString(MultiLineString<f64>),
    /// A polygon's exterior ring, measured as its perimeter.
    Polygon(LineString<f64>),
    /// Nested geometries.
    GeometryCollection(Vec<MeasuredGeometry>),
    /// A geometry kind with no length, a malformed object, or a collection
    /// nested past the depth limit.
    Unsupported,
}

/// Parses a `[lon, lat, ...]` position. Extra components are ignored.
fn parse_position(value: &Value) -> Option<Coord<f64>> {
    let mut components = value.as_array()?.iter();
    let x = components.next()?.as_f64()?;
    let y = components.next()?.as_f64()?;
    Some(Coord { x, y })
}

/// Parses an array of positions, skipping malformed entries.
fn parse_line(value: &Value) -> LineString<f64> {
    value
        .as_array()
        .map(|positions| positions.iter().filter_map(parse_position).collect())
        .unwrap_or_else(|| LineString::new(Vec::new()))
}

impl MeasuredGeometry {
    /// Decodes a `GeoJSON` geometry object.
    ///
    /// `GeometryCollection`s nested more than `max_collection_depth` levels
    /// deep decode as [`Self::Unsupported`].
    #[must_use]
    pub fn decode(value: &Value, max_collection_depth: usize) -> Self {
        Self::decode_nested(value, 0, max_collection_depth)
    }

    fn decode_nested(value: &Value, enclosing: usize, max_collection_depth: usize) -> Self {
        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            return Self::Unsupported;
        };
        let coordinates = value.get("coordinates");

        match kind {
            "LineString" => Self::LineString(coordinates.map_or_else(
                || LineString::new(Vec::new()),
                parse_line,
            )),
            "MultiLineString" => Self::MultiLineString(MultiLineString::new(
                coordinates
                    .and_then(Value::as_array)
                    .map(|lines| {
                        lines
                            .iter()
                            .filter(|line| line.is_array())
                            .map(parse_line)
                            .collect()
                    })
                    .unwrap_or_default(),
            )),
            "Polygon" => coordinates
                .and_then(Value::as_array)
                .and_then(|rings| rings.first())
                .filter(|ring| ring.is_array())
                .map_or(Self::Unsupported, |ring| Self::Polygon(parse_line(ring))),
            "GeometryCollection" => {
                let depth = enclosing + 1;
                if depth > max_collection_depth {
                    log::warn!(
                        "GeometryCollection nested {depth} levels deep exceeds limit of \
                         {max_collection_depth}; ignoring it"
                    );
                    return Self::Unsupported;
                }

                Self::GeometryCollection(
                    value
                        .get("geometries")
                        .and_then(Value::as_array)
                        .map(|members| {
                            members
                                .iter()
                                .map(|member| {
                                    Self::decode_nested(member, depth, max_collection_depth)
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                )
            }
            other => {
                log::debug!("Ignoring {other} geometry for length measurement");
                Self::Unsupported
            }
        }
    }

    /// Every line in the geometry, in document order.
    #[must_use]
    pub fn lines(&self) -> Vec<&LineString<f64>> {
        let mut lines = Vec::new();
        let mut pending = vec![self];

        while let Some(geometry) = pending.pop() {
            match geometry {
                Self::LineString(line) | Self::Polygon(line) => lines.push(line),
                Self::MultiLineString(multi) => lines.extend(&multi.0),
                Self::GeometryCollection(members) => pending.extend(members.iter().rev()),
                Self::Unsupported => {}
            }
        }

        lines
    }

    /// Total great-circle length and visited point count.
    #[must_use]
    pub fn length(&self) -> RouteLength {
        self.lines().into_iter().map(line_length).sum()
    }
}

fn line_length(line: &LineString<f64>) -> RouteLength {
    RouteLength {
        miles: line
            .lines()
            .map(|segment| haversine_miles(segment.start, segment.end))
            .sum(),
        points: line.0.len(),
    }
}

/// The geometry objects a document carries: each feature's geometry for a
/// `FeatureCollection`, the geometry of a `Feature`, or the root itself.
fn root_geometries(root: &Value) -> Vec<&Value> {
    match root.get("type").and_then(Value::as_str) {
        Some(kind) if kind.eq_ignore_ascii_case("FeatureCollection") => root
            .get("features")
            .and_then(Value::as_array)
            .map(|features| {
                features
                    .iter()
                    .filter(|feature| feature.is_object())
                    .filter_map(|feature| feature.get("geometry"))
                    .collect()
            })
            .unwrap_or_default(),
        Some(kind) if kind.eq_ignore_ascii_case("Feature") => {
            root.get("geometry").into_iter().collect()
        }
        _ => vec![root],
    }
}

/// Measures the total length in miles and the number of points of every
/// line in a `GeoJSON` document, using the default limits.
///
/// Accepts a `FeatureCollection`, a `Feature`, or a bare geometry. Returns
/// zero for blank or invalid input.
#[must_use]
pub fn calculate_total_miles(geojson: &str) -> RouteLength {
    calculate_total_miles_with(geojson, &MeasureConfig::default())
}

/// Like [`calculate_total_miles`], with explicit limits.
#[must_use]
pub fn calculate_total_miles_with(geojson: &str, config: &MeasureConfig) -> RouteLength {
    if geojson.trim().is_empty() {
        return RouteLength::default();
    }

    let root: Value = match serde_json::from_str(geojson) {
        Ok(root) => root,
        Err(e) => {
            log::debug!("Ignoring unparsable GeoJSON: {e}");
            return RouteLength::default();
        }
    };

    root_geometries(&root)
        .into_iter()
        .map(|geometry| MeasuredGeometry::decode(geometry, config.max_collection_depth).length())
        .sum()
}

#[cfg(test)]
mod tests {
    use load_map_gis_models::{Point, Polyline};

    use super::*;
    use crate::builder::{LineGroup, build_line_segments};

    fn miles(a: (f64, f64), b: (f64, f64)) -> f64 {
        haversine_miles(Coord { x: a.0, y: a.1 }, Coord { x: b.0, y: b.1 })
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn blank_and_invalid_input_is_zero() {
        for input in ["", "   \n", "not json", "{", "[1, 2", "null", "42", "[]"] {
            assert_eq!(
                calculate_total_miles(input),
                RouteLength::default(),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn bare_line_string() {
        let length = calculate_total_miles(
            r#"{"type":"LineString","coordinates":[[-122.0,37.0],[-121.0,37.0],[-121.0,38.0]]}"#,
        );

        assert_close(
            length.miles,
            miles((-122.0, 37.0), (-121.0, 37.0)) + miles((-121.0, 37.0), (-121.0, 38.0)),
        );
        assert_eq!(length.points, 3);
    }

    #[test]
    fn feature_and_feature_collection() {
        let line = r#"{"type":"LineString","coordinates":[[0.0,0.0],[0.0,1.0]]}"#;
        let feature = format!(r#"{{"type":"Feature","properties":{{}},"geometry":{line}}}"#);
        let collection = format!(
            r#"{{"type":"FeatureCollection","features":[{feature},{feature},"junk",{{"type":"Feature"}}]}}"#
        );

        let single = calculate_total_miles(&feature);
        let double = calculate_total_miles(&collection);

        assert_close(single.miles, miles((0.0, 0.0), (0.0, 1.0)));
        assert_eq!(single.points, 2);
        assert_close(double.miles, 2.0 * single.miles);
        assert_eq!(double.points, 4);
    }

    #[test]
    fn root_type_is_case_insensitive() {
        let length = calculate_total_miles(
            r#"{"type":"featurecollection","features":[
                {"type":"feature","geometry":{"type":"LineString","coordinates":[[0,0],[1,0]]}}
            ]}"#,
        );

        assert_eq!(length.points, 2);
        assert!(length.miles > 0.0);
    }

    #[test]
    fn geometry_type_is_case_sensitive() {
        let length =
            calculate_total_miles(r#"{"type":"linestring","coordinates":[[0,0],[1,0]]}"#);
        assert_eq!(length, RouteLength::default());
    }

    #[test]
    fn multi_line_string_counts_each_line() {
        let length = calculate_total_miles(
            r#"{"type":"MultiLineString","coordinates":[
                [[0,0],[0,1]],
                [[0,1],[1,1]],
                "junk"
            ]}"#,
        );

        assert_close(
            length.miles,
            miles((0.0, 0.0), (0.0, 1.0)) + miles((0.0, 1.0), (1.0, 1.0)),
        );
        assert_eq!(length.points, 4);
    }

    #[test]
    fn polygon_measures_exterior_ring_only() {
        let length = calculate_total_miles(
            r#"{"type":"Polygon","coordinates":[
                [[0,0],[1,0],[1,1],[0,0]],
                [[0.2,0.2],[0.4,0.2],[0.4,0.4],[0.2,0.2]]
            ]}"#,
        );

        assert_close(
            length.miles,
            miles((0.0, 0.0), (1.0, 0.0))
                + miles((1.0, 0.0), (1.0, 1.0))
                + miles((1.0, 1.0), (0.0, 0.0)),
        );
        assert_eq!(length.points, 4);
    }

    #[test]
    fn nested_geometry_collections_sum() {
        let length = calculate_total_miles(
            r#"{"type":"GeometryCollection","geometries":[
                {"type":"LineString","coordinates":[[0,0],[0,1]]},
                {"type":"GeometryCollection","geometries":[
                    {"type":"LineString","coordinates":[[5,5],[5,6],[6,6]]}
                ]}
            ]}"#,
        );

        assert_close(
            length.miles,
            miles((0.0, 0.0), (0.0, 1.0))
                + miles((5.0, 5.0), (5.0, 6.0))
                + miles((5.0, 6.0), (6.0, 6.0)),
        );
        assert_eq!(length.points, 5);
    }

    #[test]
    fn collections_past_depth_limit_are_ignored() {
        let doc = r#"{"type":"GeometryCollection","geometries":[
            {"type":"LineString","coordinates":[[0,0],[0,1]]},
            {"type":"GeometryCollection","geometries":[
                {"type":"LineString","coordinates":[[5,5],[5,6]]}
            ]}
        ]}"#;

        let shallow = calculate_total_miles_with(
            doc,
            &MeasureConfig {
                max_collection_depth: 1,
            },
        );
        let none = calculate_total_miles_with(
            doc,
            &MeasureConfig {
                max_collection_depth: 0,
            },
        );

        assert_eq!(shallow.points, 2);
        assert_close(shallow.miles, miles((0.0, 0.0), (0.0, 1.0)));
        assert_eq!(none, RouteLength::default());
    }

    #[test]
    fn deeply_nested_input_does_not_overflow() {
        let depth = 100;
        let mut doc = r#"{"type":"LineString","coordinates":[[0,0],[0,1]]}"#.to_string();
        for _ in 0..depth {
            doc = format!(r#"{{"type":"GeometryCollection","geometries":[{doc}]}}"#);
        }

        assert_eq!(calculate_total_miles(&doc), RouteLength::default());
    }

    #[test]
    fn unsupported_types_contribute_nothing() {
        let length = calculate_total_miles(
            r#"{"type":"GeometryCollection","geometries":[
                {"type":"Point","coordinates":[0,0]},
                {"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[1,1],[0,0]]]]},
                {"coordinates":[[0,0],[1,0]]},
                {"type":"LineString","coordinates":[[0,0],[1,0]]}
            ]}"#,
        );

        assert_close(length.miles, miles((0.0, 0.0), (1.0, 0.0)));
        assert_eq!(length.points, 2);
    }

    #[test]
    fn malformed_positions_are_skipped() {
        let length = calculate_total_miles(
            r#"{"type":"LineString","coordinates":[
                [0,0],
                "junk",
                [1],
                ["a","b"],
                [0,1,250.0],
                null
            ]}"#,
        );

        assert_close(length.miles, miles((0.0, 0.0), (0.0, 1.0)));
        assert_eq!(length.points, 2);
    }

    #[test]
    fn single_point_line_counts_point_without_distance() {
        let length = calculate_total_miles(r#"{"type":"LineString","coordinates":[[3,4]]}"#);
        assert!(length.miles == 0.0);
        assert_eq!(length.points, 1);
    }

    #[test]
    fn missing_coordinates_are_empty() {
        assert_eq!(
            calculate_total_miles(r#"{"type":"LineString"}"#),
            RouteLength::default()
        );
        assert_eq!(
            calculate_total_miles(r#"{"type":"Polygon","coordinates":[]}"#),
            RouteLength::default()
        );
        assert_eq!(
            calculate_total_miles(r#"{"type":"GeometryCollection"}"#),
            RouteLength::default()
        );
    }

    #[test]
    fn identical_points_measure_zero() {
        let length = calculate_total_miles(
            r#"{"type":"LineString","coordinates":[[-97.7,30.2],[-97.7,30.2]]}"#,
        );
        assert!(length.miles == 0.0);
        assert_eq!(length.points, 2);
    }

    #[test]
    fn lines_preserve_document_order() {
        let geometry = MeasuredGeometry::GeometryCollection(vec![
            MeasuredGeometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 0.0)])),
            MeasuredGeometry::GeometryCollection(vec![MeasuredGeometry::Polygon(
                LineString::from(vec![(2.0, 0.0), (3.0, 0.0)]),
            )]),
            MeasuredGeometry::MultiLineString(MultiLineString::new(vec![LineString::from(
                vec![(4.0, 0.0), (5.0, 0.0)],
            )])),
        ]);

        let starts: Vec<f64> = geometry.lines().iter().map(|line| line.0[0].x).collect();

        assert_eq!(starts, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn built_line_segment_round_trips() {
        let lines = [Polyline {
            points: vec![Point::new(37.0, -122.0), Point::new(37.0, -121.0)],
        }];
        let json = build_line_segments([LineGroup {
            layer: "UGLineSegment",
            name: Some("UG-1"),
            extra: Some("138"),
            polylines: &lines,
        }]);

        let length = calculate_total_miles(&json);

        assert_close(length.miles, miles((-122.0, 37.0), (-121.0, 37.0)));
        assert!((length.miles - 55.18).abs() < 0.01);
        assert_eq!(length.points, 2);
    }
}
