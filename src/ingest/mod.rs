//! Provider adapters.
//!
//! Every upstream source implements `SourceAdapter<R>` for the record type
//! it produces (`Observation` or `RoadClosure`). The pipeline only ever sees
//! ordered lists of `Arc<dyn SourceAdapter<R>>`; it never branches on which
//! provider it is talking to.
//!
//! Submodules:
//! - `usgs`      — USGS NWIS IV gauge height / discharge, bounding-box scoped
//! - `nws`       — NWS active alerts, self-filtered by keyword and distance
//! - `overpass`  — OpenStreetMap road hazards via Overpass QL
//! - `traffic`   — regional traffic-incident fallback (seeded sample data)
//! - `synthetic` — last-resort generator for any category
//! - `fixtures` (test only) — representative provider payloads

pub mod nws;
pub mod overpass;
pub mod synthetic;
pub mod traffic;
pub mod usgs;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::config::HttpConfig;
use crate::model::{FetchError, SearchRegion};

/// A single upstream provider for one record type.
///
/// `fetch` performs one attempt: no retries, no internal fallback. An
/// adapter reports "nothing qualified" as `FetchError::Empty` so the
/// pipeline can move on to the next source.
pub trait SourceAdapter<R>: Send + Sync {
    /// Short stable name used in logs and diagnostics, e.g. `"usgs"`.
    fn name(&self) -> &str;

    fn fetch(&self, region: &SearchRegion) -> Result<Vec<R>, FetchError>;
}

/// Builds the shared blocking HTTP client.
///
/// The client is internally reference-counted; clones handed to each
/// adapter share one connection pool and are safe to use concurrently.
pub fn build_client(http: &HttpConfig) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(http.timeout())
        .user_agent(http.user_agent.clone())
        .build()
}

/// GETs `url` and returns the body, mapping transport failures to
/// `FetchError::Network` and non-2xx statuses to `FetchError::Upstream`.
pub(crate) fn get_text(
    client: &reqwest::blocking::Client,
    url: &str,
    accept: &str,
) -> Result<String, FetchError> {
    tracing::debug!(url, "fetching");

    let response = client
        .get(url)
        .header("Accept", accept)
        .send()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Upstream(status.as_u16()));
    }

    response
        .text()
        .map_err(|e| FetchError::Network(format!("failed reading body: {}", e)))
}
