//! Test fixtures: representative JSON payloads from each upstream provider.
//!
//! These are structurally complete but trimmed to the minimum needed to
//! exercise the parsers. All positive cases sit around San Francisco
//! (37.7749, -122.4194) so a 50-mile region keeps some records and drops
//! others.
//!
//! USGS IV response shape:
//!   response.value.timeSeries[]
//!     .sourceInfo.siteCode[0].value       — site number (string)
//!     .sourceInfo.siteName
//!     .sourceInfo.geoLocation.geogLocation.{latitude,longitude}
//!     .variable.variableCode[0].value     — parameter code (string)
//!     .variable.variableName              — e.g. "Gage height, ft"
//!     .variable.noDataValue               — sentinel for missing data (-999999)
//!     .values[0].value[]                 — value[0] is the reading used
//!       .value     — the measurement as a STRING (not a number)
//!       .dateTime  — ISO 8601 with offset
//!
//! NWS alerts (GeoJSON FeatureCollection):
//!   features[].properties.{id,event,severity,headline,sent,description,geocode}
//!   features[].geometry — null, Point [lon, lat], or Polygon [[[lon, lat], …]]
//!
//! Overpass (`[out:json]`):
//!   elements[] of `{type: "way", id, nodes, tags}` and
//!   `{type: "node", id, lat, lon, tags?}`

/// Four Bay Area series:
/// - Napa River gage height 16.0 ft, ~41 mi from SF (kept, high)
/// - Alameda Creek discharge 6000 cfs then 5800, ~28 mi (kept as 6000, medium)
/// - Sacramento River at Freeport gage height 20.0 ft, ~68 mi (dropped, too far)
/// - Coyote Creek with the -999999 sentinel (dropped, no data)
#[cfg(test)]
pub(crate) fn fixture_bay_area_iv_json() -> &'static str {
    r#"{
      "name": "ns1:timeSeriesResponseType",
      "value": {
        "queryInfo": { "queryURL": "http://waterservices.usgs.gov/nwis/iv/format=json&bBox=..." },
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "NAPA R NR NAPA CA",
              "siteCode": [{ "value": "11458000", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 38.3683, "longitude": -122.3025 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "variableName": "Gage height, ft",
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "16.0", "qualifiers": ["P"], "dateTime": "2025-04-04T10:00:00.000-07:00" }
              ]
            }]
          },
          {
            "sourceInfo": {
              "siteName": "ALAMEDA C NR NILES CA",
              "siteCode": [{ "value": "11179000", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 37.5866, "longitude": -121.9616 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "variableName": "Streamflow, ft&#179;/s",
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "6000", "qualifiers": ["P"], "dateTime": "2025-04-04T10:00:00.000-07:00" },
                { "value": "5800", "qualifiers": ["P"], "dateTime": "2025-04-04T09:45:00.000-07:00" }
              ]
            }]
          },
          {
            "sourceInfo": {
              "siteName": "SACRAMENTO R A FREEPORT CA",
              "siteCode": [{ "value": "11447650", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 38.4560, "longitude": -121.5010 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "variableName": "Gage height, ft",
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "20.0", "qualifiers": ["P"], "dateTime": "2025-04-04T10:00:00.000-07:00" }
              ]
            }]
          },
          {
            "sourceInfo": {
              "siteName": "COYOTE C A HWY 237 NR MILPITAS CA",
              "siteCode": [{ "value": "11172175", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 37.3694, "longitude": -121.9177 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "variableName": "Gage height, ft",
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "-999999", "qualifiers": ["P", "Eqp"], "dateTime": "2025-04-04T10:00:00.000-07:00" }
              ]
            }]
          }
        ]
      }
    }"#
}

/// Only the out-of-radius Freeport series; valid but nothing qualifies.
#[cfg(test)]
pub(crate) fn fixture_far_sites_only_iv_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "SACRAMENTO R A FREEPORT CA",
              "siteCode": [{ "value": "11447650", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 38.4560, "longitude": -121.5010 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "variableName": "Gage height, ft",
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "20.0", "qualifiers": ["P"], "dateTime": "2025-04-04T10:00:00.000-07:00" }
              ]
            }]
          }
        ]
      }
    }"#
}

/// Well-formed envelope whose single series has an empty `value` array.
#[cfg(test)]
pub(crate) fn fixture_empty_value_array_iv_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "NAPA R NR NAPA CA",
              "siteCode": [{ "value": "11458000", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 38.3683, "longitude": -122.3025 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "variableName": "Gage height, ft",
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{ "value": [] }]
          }
        ]
      }
    }"#
}

/// Six active alerts around the country:
/// - Flood Warning, Point in Oakland, Severe (kept, high)
/// - Flood Advisory, Polygon around Redwood City, Minor (kept, low)
/// - Winter Storm Watch, no geometry but SAME codes, Moderate (kept at center, medium)
/// - Heat Advisory near SF (dropped, not water-related)
/// - Flash Flood Warning, Point in Houston (dropped, too far)
/// - Coastal Flood Statement with neither geometry nor geocode (dropped)
#[cfg(test)]
pub(crate) fn fixture_nws_alerts_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "id": "https://api.weather.gov/alerts/urn:oid:2.49.0.1.840.0.0001",
          "type": "Feature",
          "geometry": { "type": "Point", "coordinates": [-122.2712, 37.8044] },
          "properties": {
            "id": "urn:oid:2.49.0.1.840.0.0001",
            "event": "Flood Warning",
            "severity": "Severe",
            "headline": "Flood Warning issued April 4 at 9:58AM PDT by NWS San Francisco CA",
            "sent": "2025-04-04T09:58:00-07:00",
            "description": "Lake Merritt is expected to overtop its banks.",
            "geocode": { "SAME": ["006001"], "UGC": ["CAC001"] }
          }
        },
        {
          "id": "https://api.weather.gov/alerts/urn:oid:2.49.0.1.840.0.0002",
          "type": "Feature",
          "geometry": {
            "type": "Polygon",
            "coordinates": [[
              [-122.30, 37.45], [-122.10, 37.45], [-122.10, 37.55], [-122.30, 37.55], [-122.30, 37.45]
            ]]
          },
          "properties": {
            "id": "urn:oid:2.49.0.1.840.0.0002",
            "event": "Flood Advisory",
            "severity": "Minor",
            "headline": "Flood Advisory issued April 4 at 8:12AM PDT by NWS San Francisco CA",
            "sent": "2025-04-04T08:12:00-07:00",
            "description": "Urban and small stream flooding in low-lying areas.",
            "geocode": { "SAME": ["006081"], "UGC": ["CAC081"] }
          }
        },
        {
          "id": "https://api.weather.gov/alerts/urn:oid:2.49.0.1.840.0.0003",
          "type": "Feature",
          "geometry": null,
          "properties": {
            "id": "urn:oid:2.49.0.1.840.0.0003",
            "event": "Winter Storm Watch",
            "severity": "Moderate",
            "headline": "Winter Storm Watch issued April 4 at 3:00AM PDT",
            "sent": "2025-04-04T03:00:00-07:00",
            "description": "Heavy snow above 6000 feet.",
            "geocode": { "SAME": ["006075"], "UGC": ["CAZ006"] }
          }
        },
        {
          "id": "https://api.weather.gov/alerts/urn:oid:2.49.0.1.840.0.0004",
          "type": "Feature",
          "geometry": { "type": "Point", "coordinates": [-122.40, 37.78] },
          "properties": {
            "id": "urn:oid:2.49.0.1.840.0.0004",
            "event": "Heat Advisory",
            "severity": "Moderate",
            "headline": "Heat Advisory",
            "sent": "2025-04-04T11:00:00-07:00",
            "description": "Hot.",
            "geocode": { "SAME": ["006075"] }
          }
        },
        {
          "id": "https://api.weather.gov/alerts/urn:oid:2.49.0.1.840.0.0005",
          "type": "Feature",
          "geometry": { "type": "Point", "coordinates": [-95.3698, 29.7604] },
          "properties": {
            "id": "urn:oid:2.49.0.1.840.0.0005",
            "event": "Flash Flood Warning",
            "severity": "Extreme",
            "headline": "Flash Flood Emergency for Houston",
            "sent": "2025-04-04T12:00:00-05:00",
            "description": "This is a PARTICULARLY DANGEROUS SITUATION.",
            "geocode": { "SAME": ["048201"] }
          }
        },
        {
          "id": "https://api.weather.gov/alerts/urn:oid:2.49.0.1.840.0.0006",
          "type": "Feature",
          "geometry": null,
          "properties": {
            "id": "urn:oid:2.49.0.1.840.0.0006",
            "event": "Coastal Flood Statement",
            "severity": "Minor",
            "headline": "Coastal Flood Statement",
            "sent": "2025-04-04T07:00:00-07:00",
            "description": "Minor tidal overflow."
          }
        }
      ]
    }"#
}

/// Overpass result for a bbox around SF (`out body; >; out skel qt;`):
/// - way 1001 Embarcadero: access=no + flood_prone=yes, middle node 2 (closed, potential flooding)
/// - way 1002 Bayshore Blvd: highway=construction, middle node 5 (restricted, under construction)
/// - way 1003 unnamed: access=no, single node 6 (closed, closed to traffic)
/// - way 1004 Far Road: seasonal=yes, node 7 in Sacramento (dropped, too far)
/// - way 1005: intermittent=yes, references missing node 99 (dropped)
/// - node 2001 Low Water Crossing: hazard:flood=yes (restricted, potential flooding)
#[cfg(test)]
pub(crate) fn fixture_overpass_json() -> &'static str {
    r#"{
      "version": 0.6,
      "generator": "Overpass API 0.7.62",
      "elements": [
        {
          "type": "way", "id": 1001, "nodes": [1, 2, 3],
          "tags": { "highway": "primary", "name": "The Embarcadero", "access": "no", "flood_prone": "yes" }
        },
        {
          "type": "way", "id": 1002, "nodes": [4, 5],
          "tags": { "highway": "construction", "name": "Bayshore Blvd" }
        },
        {
          "type": "way", "id": 1003, "nodes": [6],
          "tags": { "highway": "service", "access": "no" }
        },
        {
          "type": "way", "id": 1004, "nodes": [7],
          "tags": { "highway": "track", "name": "Far Road", "seasonal": "yes" }
        },
        {
          "type": "way", "id": 1005, "nodes": [99],
          "tags": { "highway": "track", "intermittent": "yes" }
        },
        {
          "type": "node", "id": 2001, "lat": 37.7000, "lon": -122.4500,
          "tags": { "hazard:flood": "yes", "name": "Low Water Crossing" }
        },
        { "type": "node", "id": 1, "lat": 37.7950, "lon": -122.3930 },
        { "type": "node", "id": 2, "lat": 37.7990, "lon": -122.3970 },
        { "type": "node", "id": 3, "lat": 37.8030, "lon": -122.4010 },
        { "type": "node", "id": 4, "lat": 37.7300, "lon": -122.4000 },
        { "type": "node", "id": 5, "lat": 37.7350, "lon": -122.4010 },
        { "type": "node", "id": 6, "lat": 37.7600, "lon": -122.4400 },
        { "type": "node", "id": 7, "lat": 38.5816, "lon": -121.4944 }
      ]
    }"#
}
