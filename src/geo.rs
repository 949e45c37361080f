//! Great-circle distance and bounding-box approximation.
//!
//! Pure functions, no state. Distances are in statute miles on a spherical
//! Earth of radius 3956 mi.

use crate::model::{BoundingBox, GeoPoint};

/// Mean Earth radius used by the haversine formula, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3956.0;

/// Approximate miles per degree of latitude.
pub const MILES_PER_DEGREE: f64 = 69.0;

/// Extra slack added to the longitude half-width so points exactly on the
/// circle are never lost to floating-point error.
const LON_MARGIN_DEG: f64 = 1e-9;

/// Haversine great-circle distance between two points, in miles.
///
/// Symmetric, and `distance(a, a) == 0.0`.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // clamp guards asin against h drifting a hair above 1.0
    2.0 * h.sqrt().min(1.0).asin() * EARTH_RADIUS_MILES
}

/// Rounds a distance to one decimal place for display.
pub fn round_tenth(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}

/// Computes a lat/lon box that contains every point within `radius_miles`
/// of `center`.
///
/// Latitude half-height is `radius / 69` degrees. Longitude half-width is
/// `radius / (69 · cos(lat))`, widened where needed to the exact spherical
/// extent `asin(sin(r) / cos(lat))` of the circle, which grows faster than
/// the flat approximation at high latitudes.
///
/// Degenerate regions never yield an unbounded box:
/// - if the box reaches either pole, the longitude span becomes the full
///   `[-180, 180]` and latitude is clamped to `[-90, 90]`;
/// - if the longitude span crosses the antimeridian, it is likewise widened
///   to `[-180, 180]`.
///
/// Both cases stay conservative (a superset of the circle), at the cost of
/// a looser prefilter.
pub fn bounding_box(center: &GeoPoint, radius_miles: f64) -> BoundingBox {
    let lat_offset = radius_miles / MILES_PER_DEGREE;
    let min_lat = center.latitude - lat_offset;
    let max_lat = center.latitude + lat_offset;

    if max_lat >= 90.0 || min_lat <= -90.0 {
        return BoundingBox {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            min_lon: -180.0,
            max_lon: 180.0,
        };
    }

    // |lat| + offset < 90 here, so cos(lat) > 0 and sin(r) < cos(lat).
    let cos_lat = center.latitude.to_radians().cos();
    let flat = radius_miles / (MILES_PER_DEGREE * cos_lat);
    let angular = radius_miles / EARTH_RADIUS_MILES;
    let spherical = (angular.sin() / cos_lat).min(1.0).asin().to_degrees();
    let lon_offset = flat.max(spherical) + LON_MARGIN_DEG;

    let min_lon = center.longitude - lon_offset;
    let max_lon = center.longitude + lon_offset;

    if min_lon < -180.0 || max_lon > 180.0 {
        return BoundingBox {
            min_lat,
            max_lat,
            min_lon: -180.0,
            max_lon: 180.0,
        };
    }

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Point reached by travelling `distance_miles` from `origin` on the given
/// initial bearing (radians, clockwise from north).
///
/// Used by the sample/synthetic generators to scatter records over a disk.
pub fn destination(origin: &GeoPoint, bearing_rad: f64, distance_miles: f64) -> GeoPoint {
    let angular = distance_miles / EARTH_RADIUS_MILES;
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing_rad.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lon2 = lon1
        + (bearing_rad.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    // normalize to [-180, 180)
    let lon_deg = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    GeoPoint::new(lat2.to_degrees(), lon_deg)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
