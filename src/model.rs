//! Core data types for the flood map aggregation service.
//!
//! This module defines the shared domain model imported by all other modules:
//! points and regions, the normalized `Observation` / `RoadClosure` records,
//! hazard levels, provenance tags, and the error taxonomy. Apart from a few
//! small constructors and accessors it contains no logic and no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::geo;

// ---------------------------------------------------------------------------
// Parameter codes
// ---------------------------------------------------------------------------

/// USGS parameter code for discharge (streamflow), in cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";

/// USGS parameter code for gage height (stage), in feet.
pub const PARAM_STAGE: &str = "00065";

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both coordinates are finite and within the WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Axis-aligned lat/lon rectangle used as a cheap prefilter.
///
/// Always bounded: `min_lat >= -90`, `max_lat <= 90`, `min_lon >= -180`,
/// `max_lon <= 180`. See `geo::bounding_box` for the pole and antimeridian
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }

    /// True when the longitude span had to be widened to the whole globe
    /// (circle reaches a pole or crosses the antimeridian).
    pub fn spans_all_longitudes(&self) -> bool {
        self.min_lon <= -180.0 && self.max_lon >= 180.0
    }
}

/// The circular area a request is scoped to, plus its precomputed
/// bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchRegion {
    pub center: GeoPoint,
    pub radius_miles: f64,
    pub bbox: BoundingBox,
}

impl SearchRegion {
    /// Validates the inputs and derives the bounding box.
    ///
    /// # Errors
    /// - `RegionError::InvalidRadius` — radius is not a positive finite number.
    /// - `RegionError::InvalidCenter` — center is non-finite or out of range.
    pub fn new(center: GeoPoint, radius_miles: f64) -> Result<Self, RegionError> {
        if !radius_miles.is_finite() || radius_miles <= 0.0 {
            return Err(RegionError::InvalidRadius(radius_miles));
        }
        if !center.is_valid() {
            return Err(RegionError::InvalidCenter {
                latitude: center.latitude,
                longitude: center.longitude,
            });
        }

        Ok(Self {
            center,
            radius_miles,
            bbox: geo::bounding_box(&center, radius_miles),
        })
    }

    /// Exact great-circle distance from the center, in miles.
    pub fn distance_to(&self, point: &GeoPoint) -> f64 {
        geo::distance(&self.center, point)
    }

    /// Returns the display distance (rounded to 0.1 mi) if `point` lies
    /// inside the circle, `None` otherwise.
    ///
    /// The rounded value never exceeds the radius, so downstream consumers
    /// can rely on `distance_miles <= radius_miles` for every record.
    pub fn within(&self, point: &GeoPoint) -> Option<f64> {
        let distance = self.distance_to(point);
        if distance <= self.radius_miles {
            Some(geo::round_tenth(distance).min(self.radius_miles))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Discrete hazard severity, totally ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for HazardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HazardLevel::Low => "low",
            HazardLevel::Medium => "medium",
            HazardLevel::High => "high",
        };
        f.write_str(s)
    }
}

/// What an observation measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationCategory {
    GaugeHeight,
    Discharge,
    WeatherAlert,
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Which adapter produced a record.
///
/// `Sample` and `Synthetic` records are generated locally and must never be
/// mistaken for provider data; see `is_authoritative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Usgs,
    Nws,
    Overpass,
    Sample,
    Synthetic,
}

impl Provenance {
    pub fn is_authoritative(&self) -> bool {
        !matches!(self, Provenance::Sample | Provenance::Synthetic)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Provenance::Usgs => "usgs",
            Provenance::Nws => "nws",
            Provenance::Overpass => "overpass",
            Provenance::Sample => "sample",
            Provenance::Synthetic => "synthetic",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Raw reported value: a numeric measurement for gauges, the provider's
/// severity text for alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationValue {
    Measurement(f64),
    Severity(String),
}

/// One normalized hazard observation (gauge reading or weather alert).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Source-qualified id, e.g. `usgs-05568500-00065`.
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub category: ObservationCategory,
    pub value: ObservationValue,
    /// Provider parameter label, e.g. `"Gage height, ft"` or `"NWS Alert"`.
    pub parameter: String,
    pub hazard_level: HazardLevel,
    pub timestamp: String, // ISO 8601
    pub distance_miles: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosureStatus {
    Closed,
    Restricted,
}

impl fmt::Display for ClosureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosureStatus::Closed => f.write_str("Closed"),
            ClosureStatus::Restricted => f.write_str("Restricted"),
        }
    }
}

/// A closed or restricted road segment near the search center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadClosure {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub status: ClosureStatus,
    /// Free-text reason as supplied or derived, e.g. `"potential flooding"`.
    pub reason: String,
    pub description: String,
    pub distance_miles: f64,
    pub provenance: Provenance,
}

impl RoadClosure {
    /// Builds the `"<Status> due to <reason>"` description used by the
    /// rendering layer.
    pub fn describe(status: ClosureStatus, reason: &str) -> String {
        format!("{} due to {}", status, reason)
    }
}

// ---------------------------------------------------------------------------
// Result set
// ---------------------------------------------------------------------------

/// Request-scoped output of one pipeline invocation.
///
/// Records are kept in discovery order (gauges, then alerts), not sorted
/// by hazard level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub observations: Vec<Observation>,
    pub closures: Vec<RoadClosure>,
}

/// Headline counts for a `ResultSet`, as shown in the map's summary panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub observation_count: usize,
    pub closure_count: usize,
    pub high_hazard_count: usize,
    pub closed_road_count: usize,
    pub non_authoritative_count: usize,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty() && self.closures.is_empty()
    }

    pub fn summary(&self) -> ResultSummary {
        let synthetic_obs = self
            .observations
            .iter()
            .filter(|o| !o.provenance.is_authoritative())
            .count();
        let synthetic_closures = self
            .closures
            .iter()
            .filter(|c| !c.provenance.is_authoritative())
            .count();

        ResultSummary {
            observation_count: self.observations.len(),
            closure_count: self.closures.len(),
            high_hazard_count: self
                .observations
                .iter()
                .filter(|o| o.hazard_level == HazardLevel::High)
                .count(),
            closed_road_count: self
                .closures
                .iter()
                .filter(|c| c.status == ClosureStatus::Closed)
                .count(),
            non_authoritative_count: synthetic_obs + synthetic_closures,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a single adapter call produced nothing usable.
///
/// Every variant is non-fatal: the pipeline records it and moves on to the
/// next adapter in the category's fallback chain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Connection failure or timeout.
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx HTTP response from the provider.
    #[error("Upstream error: HTTP {0}")]
    Upstream(u16),
    /// The response body did not match the expected schema.
    #[error("Parse error: {0}")]
    Parse(String),
    /// Valid response, but zero records qualified.
    #[error("No qualifying records: {0}")]
    Empty(String),
}

/// Request-level validation failure; the only error a caller ever sees.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    #[error("Radius must be a positive number of miles, got {0}")]
    InvalidRadius(f64),
    #[error("Center ({latitude}, {longitude}) is outside the valid WGS84 range")]
    InvalidCenter { latitude: f64, longitude: f64 },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
