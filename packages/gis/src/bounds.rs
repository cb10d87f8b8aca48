//! Map extent for a raw dataset.

use geo::{BoundingRect, MultiPoint};
use load_map_gis_models::{Bounds, GisDataset, Point, SegmentRecord};

/// Every surveyed point in the dataset: fence rings, then underground and
/// overhead polylines.
fn dataset_points(dataset: &GisDataset) -> impl Iterator<Item = &Point> {
    let fences = dataset
        .electric_facility_fence
        .iter()
        .flat_map(|fence| &fence.polygons)
        .flat_map(|polygon| &polygon.points);
    let underground = dataset
        .ug_line_segment
        .iter()
        .flat_map(SegmentRecord::polylines)
        .flat_map(|line| &line.points);
    let overhead = dataset
        .oh_line_segment
        .iter()
        .flat_map(SegmentRecord::polylines)
        .flat_map(|line| &line.points);

    fences.chain(underground).chain(overhead)
}

/// Computes the extent covering every point in the dataset.
///
/// Falls back to the dataset's request criteria when it contains no
/// geometry. Returns `None` when there is neither geometry nor a declared
/// boundary.
#[must_use]
pub fn compute_bounds(dataset: &GisDataset) -> Option<Bounds> {
    let points: MultiPoint<f64> = dataset_points(dataset)
        .map(|p| geo::Point::new(p.longitude, p.latitude))
        .collect();

    if let Some(rect) = points.bounding_rect() {
        return Some(Bounds {
            west: rect.min().x,
            south: rect.min().y,
            east: rect.max().x,
            north: rect.max().y,
        });
    }

    let fallback = dataset.request_criteria.as_ref().map(|c| c.to_bounds());
    if fallback.is_none() {
        log::debug!("Dataset has no geometry and no request criteria; no extent");
    }
    fallback
}
