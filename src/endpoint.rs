/// HTTP endpoint for flood-map queries
///
/// Serves aggregated hazard data to map front ends as JSON.
///
/// Endpoints:
/// - GET /flood-data?lat=&lon=&radius=&show_data= - Aggregated flood map data
/// - GET /health - Service health check

use crate::pipeline::AggregationPipeline;
use tracing::{info, warn};

type JsonResponse = tiny_http::Response<std::io::Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

/// Parameters of a `/flood-data` request after defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodDataQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius_miles: i64,
    pub show_data: bool,
}

/// Parses a raw query string.
///
/// Values that fail to parse are treated as absent: the center falls back
/// to the pipeline default, the radius to `default_radius`, and `show_data`
/// to false. A radius that parses but is not positive is kept so the
/// pipeline can reject it.
pub fn parse_query(query: &str, default_radius: i64) -> FloodDataQuery {
    let mut parsed = FloodDataQuery {
        lat: None,
        lon: None,
        radius_miles: default_radius,
        show_data: false,
    };

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(raw)
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        match key {
            "lat" => parsed.lat = value.parse::<f64>().ok().filter(|v| v.is_finite()),
            "lon" => parsed.lon = value.parse::<f64>().ok().filter(|v| v.is_finite()),
            "radius" => {
                parsed.radius_miles = value.parse::<i64>().unwrap_or(default_radius);
            }
            "show_data" => {
                parsed.show_data = matches!(
                    value.to_lowercase().as_str(),
                    "true" | "1" | "yes" | "on"
                );
            }
            _ => {}
        }
    }

    parsed
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Routes one request and returns the status code and JSON body.
pub fn route(
    pipeline: &AggregationPipeline,
    default_radius: i64,
    method: &str,
    url: &str,
) -> (u16, serde_json::Value) {
    if method != "GET" {
        return (405, serde_json::json!({ "error": "Method not allowed" }));
    }

    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    match path {
        "/health" => (
            200,
            serde_json::json!({
                "status": "ok",
                "service": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            }),
        ),
        "/flood-data" => handle_flood_data(pipeline, parse_query(query, default_radius)),
        _ => (
            404,
            serde_json::json!({
                "error": "Not found",
                "available_endpoints": ["/health", "/flood-data"]
            }),
        ),
    }
}

fn handle_flood_data(pipeline: &AggregationPipeline, query: FloodDataQuery) -> (u16, serde_json::Value) {
    match pipeline.fetch_flood_map_data(query.lat, query.lon, query.radius_miles, query.show_data) {
        Ok(data) => match serde_json::to_value(&data) {
            Ok(body) => (200, body),
            Err(e) => (500, serde_json::json!({ "error": e.to_string() })),
        },
        Err(e) => (400, serde_json::json!({ "error": e.to_string() })),
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified address and port
pub fn start_endpoint_server(
    pipeline: AggregationPipeline,
    bind_address: &str,
    port: u16,
    default_radius: i64,
) -> Result<(), String> {
    let addr = format!("{}:{}", bind_address, port);
    let server = tiny_http::Server::http(&addr)
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    info!(%addr, "HTTP endpoint listening");
    info!("GET /flood-data?lat=&lon=&radius=&show_data=true - Flood map data");
    info!("GET /health - Service health check");

    for request in server.incoming_requests() {
        let method = request.method().to_string();
        let url = request.url().to_string();

        let (status, body) = route(&pipeline, default_radius, &method, &url);
        info!(%method, %url, status, "request handled");

        if let Err(e) = request.respond(create_response(status, body)) {
            warn!(error = %e, "failed to send response");
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: serde_json::Value) -> JsonResponse {
    let body = serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string());
    let mut response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    if let Ok(header) = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response = response.with_header(header);
    }
    response
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
