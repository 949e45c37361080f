/// floodmap_service: flood hazard aggregation for map front ends.
///
/// # Module structure
///
/// ```text
/// floodmap_service
/// ├── model       — shared data types (Observation, RoadClosure, SearchRegion, FetchError, …)
/// ├── geo         — haversine distance, bounding boxes, destination points
/// ├── classify    — hazard-level thresholds for gauges, discharge, and alerts
/// ├── config      — floodmap.toml loader with env overrides
/// ├── ingest
/// │   ├── usgs      — USGS NWIS IV API: bbox URL construction + JSON parsing
/// │   ├── nws       — NWS active alerts: keyword + distance filtering
/// │   ├── overpass  — OpenStreetMap road hazards via Overpass QL
/// │   ├── traffic   — seeded sample traffic incidents
/// │   ├── synthetic — last-resort generator for any category
/// │   └── fixtures (test only) — representative API response payloads
/// ├── pipeline    — per-category fallback chains, run in parallel
/// └── endpoint    — HTTP API serving /flood-data
/// ```

/// Public modules
pub mod classify;
pub mod config;
pub mod endpoint;
pub mod geo;
pub mod ingest;
pub mod model;
pub mod pipeline;
