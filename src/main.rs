//! Flood Hazard Map Service
//!
//! Aggregates river gauges, severe-weather alerts, and road closures around
//! a point into one JSON payload for map front ends.
//!
//! Usage:
//!   cargo run --release                                     # Serve on [endpoint] port from floodmap.toml
//!   cargo run --release -- --endpoint 8000                  # Serve GET /flood-data on port 8000
//!   cargo run --release -- --lat 37.77 --lon -122.42        # One-shot query, JSON to stdout
//!   cargo run --release -- --lat 37.77 --lon -122.42 --radius 25
//!
//! Environment:
//!   FLOODMAP_CONFIG       - path to floodmap.toml (default ./floodmap.toml)
//!   FLOODMAP_SEED         - fixed seed for the sample/synthetic fallbacks
//!   FLOODMAP_TIMEOUT_SECS - per-source timeout
//!   FLOODMAP_USER_AGENT   - User-Agent sent upstream
//!   RUST_LOG              - log filter (default info)

use floodmap_service::config;
use floodmap_service::endpoint;
use floodmap_service::pipeline::AggregationPipeline;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [--endpoint PORT] | --lat LAT --lon LON [--radius MILES]",
        program
    )
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut endpoint_port: Option<u16> = None;
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;
    let mut radius: Option<i64> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let Some(value) = args.get(i + 1) else {
            eprintln!("Error: {} requires a value", flag);
            eprintln!("{}", usage(&args[0]));
            std::process::exit(1);
        };
        let ok = match flag {
            "--endpoint" => value.parse::<u16>().map(|p| endpoint_port = Some(p)).is_ok(),
            "--lat" => value.parse::<f64>().map(|v| lat = Some(v)).is_ok(),
            "--lon" => value.parse::<f64>().map(|v| lon = Some(v)).is_ok(),
            "--radius" => value.parse::<i64>().map(|v| radius = Some(v)).is_ok(),
            _ => {
                eprintln!("Unknown argument: {}", flag);
                eprintln!("{}", usage(&args[0]));
                std::process::exit(1);
            }
        };
        if !ok {
            eprintln!("Error: invalid value for {}: {}", flag, value);
            std::process::exit(1);
        }
        i += 2;
    }

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration failed");
            std::process::exit(1);
        }
    };

    let pipeline = match AggregationPipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!(error = %e, "failed to build HTTP client");
            std::process::exit(1);
        }
    };

    // Without a query point the service runs as an endpoint
    let one_shot = lat.is_some() || lon.is_some();
    if endpoint_port.is_some() || !one_shot {
        let port = config.endpoint.port_or(endpoint_port);
        info!(port, "starting flood map endpoint");
        if let Err(e) = endpoint::start_endpoint_server(
            pipeline,
            &config.endpoint.bind_address,
            port,
            config.region.default_radius_miles,
        ) {
            error!(error = %e, "endpoint server error");
            std::process::exit(1);
        }
        return;
    }

    let radius = radius.unwrap_or(config.region.default_radius_miles);
    let data = match pipeline.fetch_flood_map_data(lat, lon, radius, true) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    match serde_json::to_string_pretty(&data) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!(error = %e, "failed to serialize result");
            std::process::exit(1);
        }
    }
}
