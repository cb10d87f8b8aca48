//! Great-circle distance between geodetic points.

use geo::Coord;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.7613;

/// Haversine distance in miles between two points.
///
/// Coordinates are in degrees with `x` as longitude and `y` as latitude,
/// matching `GeoJSON` position order.
#[must_use]
pub fn haversine_miles(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = b.x.to_radians() - a.x.to_radians();

    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lon = (d_lon / 2.0).sin();

    let hav = (lat1.cos() * lat2.cos())
        .mul_add(sin_d_lon * sin_d_lon, sin_d_lat * sin_d_lat)
        .clamp(0.0, 1.0);
    let c = 2.0 * hav.sqrt().atan2((1.0 - hav).sqrt());

    EARTH_RADIUS_MILES * c
}
