//! USGS NWIS Instantaneous Values (IV) adapter.
//!
//! Handles URL construction and JSON response parsing for the USGS Water
//! Services IV endpoint, queried by bounding box:
//!   https://waterservices.usgs.gov/nwis/iv/?format=json&bBox=W,S,E,N&...
//!
//! The IV service returns WaterML rendered as JSON. See `fixtures.rs` for
//! annotated examples of the response structure.

use serde::Deserialize;

use crate::classify::{category_for_parameter, classify};
use crate::ingest::{SourceAdapter, get_text};
use crate::model::{
    BoundingBox, FetchError, GeoPoint, Observation, ObservationValue, PARAM_DISCHARGE,
    PARAM_STAGE, Provenance, SearchRegion,
};

// ---------------------------------------------------------------------------
// Serde structures for WaterML JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IvResponse {
    value: ValueWrapper,
}

#[derive(Deserialize)]
struct ValueWrapper {
    #[serde(rename = "timeSeries")]
    time_series: Vec<TimeSeries>,
}

#[derive(Deserialize)]
struct TimeSeries {
    #[serde(rename = "sourceInfo")]
    source_info: SourceInfo,
    variable: Variable,
    #[serde(default)]
    values: Vec<Values>,
}

#[derive(Deserialize)]
struct SourceInfo {
    #[serde(rename = "siteName")]
    site_name: String,
    #[serde(rename = "siteCode")]
    site_code: Vec<SiteCode>,
    #[serde(rename = "geoLocation")]
    geo_location: GeoLocation,
}

#[derive(Deserialize)]
struct SiteCode {
    value: String,
}

#[derive(Deserialize)]
struct GeoLocation {
    #[serde(rename = "geogLocation")]
    geog_location: GeogLocation,
}

#[derive(Deserialize)]
struct GeogLocation {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct Variable {
    #[serde(rename = "variableCode")]
    variable_code: Vec<VariableCode>,
    #[serde(rename = "variableName")]
    variable_name: String,
    #[serde(rename = "noDataValue")]
    no_data_value: Option<f64>,
}

#[derive(Deserialize)]
struct VariableCode {
    value: String,
}

#[derive(Deserialize)]
struct Values {
    value: Vec<ValueEntry>,
}

#[derive(Deserialize)]
struct ValueEntry {
    value: String, // USGS returns as string!
    #[serde(rename = "dateTime")]
    date_time: String,
}

/// USGS sentinel for "no data", used when `noDataValue` is absent.
const DEFAULT_NO_DATA_VALUE: f64 = -999_999.0;

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a USGS IV URL for all active sites inside `bbox` reporting gauge
/// height or discharge.
///
/// USGS expects `bBox=west,south,east,north` with at most 7 decimal places.
pub fn build_bbox_iv_url(base_url: &str, bbox: &BoundingBox) -> String {
    format!(
        "{}?format=json&bBox={:.6},{:.6},{:.6},{:.6}&parameterCd={},{}&siteStatus=active",
        base_url,
        bbox.min_lon,
        bbox.min_lat,
        bbox.max_lon,
        bbox.max_lat,
        PARAM_STAGE,
        PARAM_DISCHARGE,
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a USGS IV JSON body into `Observation`s for the sites inside
/// `region`, one per `timeSeries` entry with a usable first value.
///
/// Series are skipped (not errors) when their value array is empty, their
/// first value is the no-data sentinel, their parameter is neither gauge
/// height nor discharge, or the site lies outside the radius.
///
/// # Errors
/// - `FetchError::Parse` — malformed JSON, missing site code / parameter
///   code / location, or a non-numeric value.
/// - `FetchError::Empty` — the response was valid but no series qualified.
pub fn parse_iv_response(json: &str, region: &SearchRegion) -> Result<Vec<Observation>, FetchError> {
    let response: IvResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::Parse(format!("JSON deserialization failed: {}", e)))?;

    let mut observations = Vec::new();

    for series in response.value.time_series {
        let site_code = series
            .source_info
            .site_code
            .first()
            .ok_or_else(|| FetchError::Parse("Missing siteCode".to_string()))?
            .value
            .clone();

        let parameter_code = series
            .variable
            .variable_code
            .first()
            .ok_or_else(|| FetchError::Parse("Missing variableCode".to_string()))?
            .value
            .clone();

        let geog = &series.source_info.geo_location.geog_location;
        let location = GeoPoint::new(geog.latitude, geog.longitude);

        let Some(distance_miles) = region.within(&location) else {
            continue;
        };

        let Some(category) = category_for_parameter(&series.variable.variable_name, &parameter_code)
        else {
            continue;
        };

        // The reading reported for a site is `values[0].value[0]`
        let Some(latest) = series.values.first().and_then(|v| v.value.first()) else {
            continue;
        };

        let value: f64 = latest.value.trim().parse().map_err(|e| {
            FetchError::Parse(format!("Failed to parse value '{}': {}", latest.value, e))
        })?;

        let no_data_value = series.variable.no_data_value.unwrap_or(DEFAULT_NO_DATA_VALUE);
        if (value - no_data_value).abs() < 0.1 {
            continue;
        }

        let value = ObservationValue::Measurement(value);
        observations.push(Observation {
            id: format!("usgs-{}-{}", site_code, parameter_code),
            name: series.source_info.site_name,
            location,
            category,
            hazard_level: classify(category, &value),
            value,
            parameter: series.variable.variable_name,
            timestamp: latest.date_time.clone(),
            distance_miles,
            description: None,
            provenance: Provenance::Usgs,
        });
    }

    if observations.is_empty() {
        return Err(FetchError::Empty(
            "No gauge or discharge readings within the search radius".to_string(),
        ));
    }

    Ok(observations)
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Gauge height / discharge adapter backed by the USGS IV service.
pub struct UsgsGaugeAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl UsgsGaugeAdapter {
    pub fn new(client: reqwest::blocking::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl SourceAdapter<Observation> for UsgsGaugeAdapter {
    fn name(&self) -> &str {
        "usgs"
    }

    fn fetch(&self, region: &SearchRegion) -> Result<Vec<Observation>, FetchError> {
        let url = build_bbox_iv_url(&self.base_url, &region.bbox);
        let body = get_text(&self.client, &url, "application/json")?;
        parse_iv_response(&body, region)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;
    use crate::model::{HazardLevel, ObservationCategory};

    const BASE: &str = "https://waterservices.usgs.gov/nwis/iv/";

    fn sf_region(radius: f64) -> SearchRegion {
        SearchRegion::new(GeoPoint::new(37.7749, -122.4194), radius).unwrap()
    }

    // --- URL construction ---------------------------------------------------

    #[test]
    fn test_build_url_targets_iv_endpoint_with_json_format() {
        let url = build_bbox_iv_url(BASE, &sf_region(50.0).bbox);
        assert!(
            url.starts_with("https://waterservices.usgs.gov/nwis/iv/?"),
            "must target the IV endpoint, got: {}",
            url
        );
        assert!(url.contains("format=json"), "must request JSON format");
        assert!(url.contains("siteStatus=active"), "should filter to active sites");
        assert!(url.contains("parameterCd=00065,00060"), "must request stage and discharge");
    }

    #[test]
    fn test_build_url_orders_bbox_west_south_east_north() {
        let bbox = BoundingBox {
            min_lat: 37.0,
            max_lat: 38.5,
            min_lon: -123.25,
            max_lon: -121.5,
        };
        let url = build_bbox_iv_url(BASE, &bbox);
        assert!(
            url.contains("bBox=-123.250000,37.000000,-121.500000,38.500000"),
            "bBox must be W,S,E,N, got: {}",
            url
        );
    }

    // --- Parsing: happy path ------------------------------------------------

    #[test]
    fn test_parse_keeps_only_sites_inside_radius() {
        let observations = parse_iv_response(fixture_bay_area_iv_json(), &sf_region(50.0))
            .expect("valid fixture should parse");

        let ids: Vec<&str> = observations.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["usgs-11458000-00065", "usgs-11179000-00060"]);
        for obs in &observations {
            assert!(obs.distance_miles <= 50.0, "{} at {} mi", obs.id, obs.distance_miles);
            assert_eq!(obs.provenance, Provenance::Usgs);
        }
    }

    #[test]
    fn test_parse_gauge_height_16_ft_is_high() {
        let observations = parse_iv_response(fixture_bay_area_iv_json(), &sf_region(50.0))
            .expect("should parse");
        let napa = observations
            .iter()
            .find(|o| o.id == "usgs-11458000-00065")
            .expect("Napa gauge should be present");

        assert_eq!(napa.category, ObservationCategory::GaugeHeight);
        assert_eq!(napa.value, ObservationValue::Measurement(16.0));
        assert_eq!(napa.hazard_level, HazardLevel::High);
        assert_eq!(napa.name, "NAPA R NR NAPA CA");
        assert_eq!(napa.parameter, "Gage height, ft");
        assert!(napa.distance_miles > 40.0 && napa.distance_miles < 43.0);
    }

    #[test]
    fn test_parse_discharge_uses_first_value_and_is_medium() {
        let observations = parse_iv_response(fixture_bay_area_iv_json(), &sf_region(50.0))
            .expect("should parse");
        let alameda = observations
            .iter()
            .find(|o| o.id == "usgs-11179000-00060")
            .expect("Alameda Creek discharge should be present");

        assert_eq!(alameda.category, ObservationCategory::Discharge);
        assert_eq!(alameda.value, ObservationValue::Measurement(6000.0));
        assert_eq!(alameda.hazard_level, HazardLevel::Medium);
        assert!(alameda.timestamp.starts_with("2025-04-04T10:00"));
    }

    #[test]
    fn test_parse_multi_entry_array_reads_first_entry() {
        let json = r#"{
          "value": {
            "timeSeries": [{
              "sourceInfo": {
                "siteName": "SAN MATEO C A SAN MATEO CA",
                "siteCode": [{ "value": "11162800", "network": "NWIS" }],
                "geoLocation": { "geogLocation": { "latitude": 37.63, "longitude": -122.41 } }
              },
              "variable": {
                "variableCode": [{ "value": "00065", "network": "NWIS" }],
                "variableName": "Gage height, ft",
                "noDataValue": -999999.0
              },
              "values": [{ "value": [
                { "value": "12.10", "dateTime": "2025-04-04T09:45:00.000-07:00" },
                { "value": "16.0",  "dateTime": "2025-04-04T10:00:00.000-07:00" }
              ]}]
            }]
          }
        }"#;
        let observations = parse_iv_response(json, &sf_region(50.0)).expect("should parse");

        assert_eq!(observations.len(), 1);
        assert_eq!(
            observations[0].value,
            ObservationValue::Measurement(12.1),
            "value[0] is the reading, later entries are ignored"
        );
        assert_eq!(observations[0].hazard_level, HazardLevel::Medium);
        assert_eq!(observations[0].timestamp, "2025-04-04T09:45:00.000-07:00");
    }

    #[test]
    fn test_parse_wider_radius_includes_far_site() {
        let observations = parse_iv_response(fixture_bay_area_iv_json(), &sf_region(100.0))
            .expect("should parse");
        assert!(observations.iter().any(|o| o.id == "usgs-11447650-00065"));
        // sentinel series never appears regardless of radius
        assert!(!observations.iter().any(|o| o.id.contains("11172175")));
    }

    // --- Parsing: error and edge cases --------------------------------------

    #[test]
    fn test_parse_all_sites_outside_radius_is_empty() {
        let result = parse_iv_response(fixture_far_sites_only_iv_json(), &sf_region(50.0));
        assert!(
            matches!(result, Err(FetchError::Empty(_))),
            "no qualifying sites should yield Empty, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_empty_value_array_is_empty() {
        let result = parse_iv_response(fixture_empty_value_array_iv_json(), &sf_region(50.0));
        assert!(matches!(result, Err(FetchError::Empty(_))));
    }

    #[test]
    fn test_parse_empty_time_series_array_is_empty() {
        let result = parse_iv_response(r#"{ "value": { "timeSeries": [] } }"#, &sf_region(50.0));
        assert!(matches!(result, Err(FetchError::Empty(_))));
    }

    #[test]
    fn test_parse_malformed_json_returns_parse_error() {
        let result = parse_iv_response("{ this is not valid json }}}", &sf_region(50.0));
        assert!(
            matches!(result, Err(FetchError::Parse(_))),
            "malformed JSON should return Parse, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_missing_geolocation_returns_parse_error() {
        let json = r#"{
          "value": {
            "timeSeries": [{
              "sourceInfo": {
                "siteName": "Test Site",
                "siteCode": [{ "value": "99999999", "network": "NWIS" }]
              },
              "variable": {
                "variableCode": [{ "value": "00060", "network": "NWIS" }],
                "variableName": "Streamflow, ft&#179;/s",
                "noDataValue": -999999.0
              },
              "values": [{ "value": [{ "value": "1", "dateTime": "2025-04-04T10:00:00Z" }] }]
            }]
          }
        }"#;
        let result = parse_iv_response(json, &sf_region(50.0));
        assert!(matches!(result, Err(FetchError::Parse(_))), "got {:?}", result);
    }
}
