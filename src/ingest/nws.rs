//! NWS active-alerts adapter.
//!
//! The api.weather.gov active-alerts feed is not bounding-box scoped, so
//! this adapter filters on its own: the alert's event must mention flood,
//! rain, storm, or water, and its location must be inside the radius.
//!
//! Alert location, best available first:
//! 1. a `Point` geometry;
//! 2. the vertex mean of a `Polygon`'s outer ring (an approximation, not
//!    a true centroid);
//! 3. the query center, if the alert is zone-based (carries SAME/UGC
//!    geocodes) and has no geometry at all.
//!
//! Alerts with no geometry and no geocodes are skipped.

use serde::Deserialize;
use std::collections::HashMap;

use crate::classify::classify_alert_severity;
use crate::ingest::{SourceAdapter, get_text};
use crate::model::{
    FetchError, GeoPoint, Observation, ObservationCategory, ObservationValue, Provenance,
    SearchRegion,
};

/// Case-insensitive substrings an alert `event` must contain.
pub const WATER_EVENT_KEYWORDS: [&str; 4] = ["flood", "rain", "storm", "water"];

// ---------------------------------------------------------------------------
// GeoJSON structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AlertCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Point { coordinates: Vec<f64> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    #[serde(other)]
    Unsupported,
}

#[derive(Deserialize, Default)]
struct Properties {
    id: Option<String>,
    #[serde(default)]
    event: String,
    severity: Option<String>,
    headline: Option<String>,
    sent: Option<String>,
    description: Option<String>,
    #[serde(default)]
    geocode: HashMap<String, Vec<String>>,
}

impl Properties {
    fn has_zone_codes(&self) -> bool {
        ["SAME", "UGC"]
            .iter()
            .any(|k| self.geocode.get(*k).is_some_and(|codes| !codes.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn is_water_related(event: &str) -> bool {
    let event = event.to_lowercase();
    WATER_EVENT_KEYWORDS.iter().any(|k| event.contains(k))
}

/// GeoJSON positions are `[lon, lat]`.
fn position_to_point(position: &[f64]) -> Option<GeoPoint> {
    match position {
        [lon, lat, ..] => Some(GeoPoint::new(*lat, *lon)),
        _ => None,
    }
}

fn ring_mean(ring: &[Vec<f64>]) -> Option<GeoPoint> {
    // GeoJSON rings repeat the first vertex at the end
    let open = match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    };
    let points: Vec<GeoPoint> = open.iter().filter_map(|p| position_to_point(p)).collect();
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    Some(GeoPoint::new(
        points.iter().map(|p| p.latitude).sum::<f64>() / n,
        points.iter().map(|p| p.longitude).sum::<f64>() / n,
    ))
}

fn locate(feature: &Feature, region: &SearchRegion) -> Option<GeoPoint> {
    match &feature.geometry {
        Some(Geometry::Point { coordinates }) => position_to_point(coordinates),
        Some(Geometry::Polygon { coordinates }) => coordinates.first().and_then(|r| ring_mean(r)),
        Some(Geometry::Unsupported) => None,
        None if feature.properties.has_zone_codes() => Some(region.center),
        None => None,
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses an NWS active-alerts GeoJSON body into weather-alert
/// `Observation`s inside `region`.
///
/// # Errors
/// - `FetchError::Parse` — the body is not a FeatureCollection.
/// - `FetchError::Empty` — no water-related alert lies within the radius.
pub fn parse_alerts_response(json: &str, region: &SearchRegion) -> Result<Vec<Observation>, FetchError> {
    let collection: AlertCollection = serde_json::from_str(json)
        .map_err(|e| FetchError::Parse(format!("JSON deserialization failed: {}", e)))?;

    let mut alerts = Vec::new();

    for feature in &collection.features {
        let props = &feature.properties;
        if !is_water_related(&props.event) {
            continue;
        }

        let Some(location) = locate(feature, region).filter(|p| p.is_valid()) else {
            continue;
        };
        let Some(distance_miles) = region.within(&location) else {
            continue;
        };

        let severity = props.severity.clone().unwrap_or_else(|| "Unknown".to_string());
        let id = match &props.id {
            Some(id) => format!("nws-{}", id),
            None => format!("nws-{}", alerts.len()),
        };

        alerts.push(Observation {
            id,
            name: props.headline.clone().unwrap_or_else(|| props.event.clone()),
            location,
            category: ObservationCategory::WeatherAlert,
            hazard_level: classify_alert_severity(&severity),
            value: ObservationValue::Severity(severity),
            parameter: "NWS Alert".to_string(),
            timestamp: props
                .sent
                .clone()
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            distance_miles,
            description: props.description.clone().filter(|d| !d.is_empty()),
            provenance: Provenance::Nws,
        });
    }

    if alerts.is_empty() {
        return Err(FetchError::Empty(
            "No water-related alerts within the search radius".to_string(),
        ));
    }

    Ok(alerts)
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Severe-weather alert adapter backed by api.weather.gov.
pub struct NwsAlertAdapter {
    client: reqwest::blocking::Client,
    alerts_url: String,
}

impl NwsAlertAdapter {
    pub fn new(client: reqwest::blocking::Client, alerts_url: impl Into<String>) -> Self {
        Self {
            client,
            alerts_url: alerts_url.into(),
        }
    }
}

impl SourceAdapter<Observation> for NwsAlertAdapter {
    fn name(&self) -> &str {
        "nws"
    }

    fn fetch(&self, region: &SearchRegion) -> Result<Vec<Observation>, FetchError> {
        let body = get_text(&self.client, &self.alerts_url, "application/geo+json")?;
        parse_alerts_response(&body, region)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
