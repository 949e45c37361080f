//! OpenStreetMap road-hazard adapter (Overpass API).
//!
//! Queries ways and nodes inside the region's bounding box that carry
//! closure or flood-prone tags, then resolves each way to a single location
//! using its middle node. The middle node is not a true centroid; for long
//! curved ways it can sit well off the geometric center. That approximation
//! is accepted here because only a map marker is needed.

use serde::Deserialize;
use std::collections::HashMap;

use crate::ingest::{SourceAdapter, get_text};
use crate::model::{
    BoundingBox, ClosureStatus, FetchError, GeoPoint, Provenance, RoadClosure, SearchRegion,
};

/// Tags that mark a way or node as prone to flooding.
pub const FLOOD_TAGS: [&str; 4] = ["flood_prone", "hazard:flood", "intermittent", "seasonal"];

// ---------------------------------------------------------------------------
// Query construction
// ---------------------------------------------------------------------------

/// Builds the Overpass QL query for closure and flood-prone features in
/// `bbox`. Overpass takes boxes as `(south, west, north, east)`.
///
/// `out body; >; out skel qt;` returns the tagged features first, followed
/// by the bare nodes their ways reference.
pub fn build_overpass_query(bbox: &BoundingBox) -> String {
    let b = format!(
        "({:.6},{:.6},{:.6},{:.6})",
        bbox.min_lat, bbox.min_lon, bbox.max_lat, bbox.max_lon
    );
    format!(
        "[out:json][timeout:25];\n\
         (\n\
         \x20 way[\"access\"=\"no\"]{b};\n\
         \x20 way[\"highway\"=\"construction\"]{b};\n\
         \x20 way[\"flood_prone\"=\"yes\"]{b};\n\
         \x20 way[\"intermittent\"=\"yes\"]{b};\n\
         \x20 way[\"seasonal\"=\"yes\"]{b};\n\
         \x20 node[\"hazard:flood\"=\"yes\"]{b};\n\
         );\n\
         out body;\n\
         >;\n\
         out skel qt;",
        b = b
    )
}

/// Interpreter URL with the query URL-encoded into the `data` parameter.
pub fn build_overpass_url(base_url: &str, query: &str) -> String {
    format!("{}?data={}", base_url, urlencoding::encode(query))
}

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct OverpassResponse {
    elements: Vec<Element>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    #[serde(other)]
    Other,
}

// ---------------------------------------------------------------------------
// Tag interpretation
// ---------------------------------------------------------------------------

fn has_flood_tag(tags: &HashMap<String, String>) -> bool {
    FLOOD_TAGS.iter().any(|t| tags.contains_key(*t))
}

/// `closed` for `access=no`, otherwise `restricted`.
pub fn closure_status(tags: &HashMap<String, String>) -> ClosureStatus {
    if tags.get("access").map(String::as_str) == Some("no") {
        ClosureStatus::Closed
    } else {
        ClosureStatus::Restricted
    }
}

/// Reason by tag priority: flooding beats construction beats a plain
/// access restriction.
pub fn closure_reason(tags: &HashMap<String, String>) -> &'static str {
    if has_flood_tag(tags) {
        "potential flooding"
    } else if tags.get("highway").map(String::as_str) == Some("construction") {
        "under construction"
    } else if tags.get("access").map(String::as_str) == Some("no") {
        "closed to traffic"
    } else {
        "restricted access"
    }
}

fn closure_from_tags(
    id: String,
    location: GeoPoint,
    distance_miles: f64,
    tags: &HashMap<String, String>,
) -> RoadClosure {
    let status = closure_status(tags);
    let reason = closure_reason(tags);
    RoadClosure {
        id,
        name: tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| "Unnamed Road".to_string()),
        location,
        status,
        reason: reason.to_string(),
        description: RoadClosure::describe(status, reason),
        distance_miles,
        provenance: Provenance::Overpass,
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses an Overpass JSON body into `RoadClosure`s inside `region`.
///
/// Two passes: first index every node's coordinates, then resolve each
/// tagged way through its middle node (`nodes[len / 2]`). Tagged nodes use
/// their own coordinates; untagged nodes are geometry only. Ways whose
/// middle node is missing from the response are skipped.
///
/// # Errors
/// - `FetchError::Parse` — the body lacks an `elements` array.
/// - `FetchError::Empty` — nothing qualified.
pub fn parse_overpass_response(json: &str, region: &SearchRegion) -> Result<Vec<RoadClosure>, FetchError> {
    let response: OverpassResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::Parse(format!("JSON deserialization failed: {}", e)))?;

    let node_index: HashMap<i64, GeoPoint> = response
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Node { id, lat, lon, .. } => Some((*id, GeoPoint::new(*lat, *lon))),
            _ => None,
        })
        .collect();

    let mut closures = Vec::new();

    for element in &response.elements {
        let (id, location, tags) = match element {
            Element::Way { id, nodes, tags } if !tags.is_empty() && !nodes.is_empty() => {
                let middle = nodes[nodes.len() / 2];
                let Some(location) = node_index.get(&middle) else {
                    continue;
                };
                (format!("osm-way-{}", id), *location, tags)
            }
            Element::Node { id, lat, lon, tags } if !tags.is_empty() => {
                (format!("osm-node-{}", id), GeoPoint::new(*lat, *lon), tags)
            }
            _ => continue,
        };

        let Some(distance_miles) = region.within(&location) else {
            continue;
        };

        closures.push(closure_from_tags(id, location, distance_miles, tags));
    }

    if closures.is_empty() {
        return Err(FetchError::Empty(
            "No tagged road hazards within the search radius".to_string(),
        ));
    }

    Ok(closures)
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Mapped road-hazard adapter backed by an Overpass interpreter.
pub struct OverpassRoadAdapter {
    client: reqwest::blocking::Client,
    interpreter_url: String,
}

impl OverpassRoadAdapter {
    pub fn new(client: reqwest::blocking::Client, interpreter_url: impl Into<String>) -> Self {
        Self {
            client,
            interpreter_url: interpreter_url.into(),
        }
    }
}

impl SourceAdapter<RoadClosure> for OverpassRoadAdapter {
    fn name(&self) -> &str {
        "overpass"
    }

    fn fetch(&self, region: &SearchRegion) -> Result<Vec<RoadClosure>, FetchError> {
        let query = build_overpass_query(&region.bbox);
        let url = build_overpass_url(&self.interpreter_url, &query);
        let body = get_text(&self.client, &url, "application/json")?;
        parse_overpass_response(&body, region)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
