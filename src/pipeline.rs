//! Aggregation pipeline.
//!
//! Each result category (gauges, alerts, roads) owns an ordered fallback
//! chain of adapters. The chains run in parallel; within a chain adapters
//! are tried strictly in order and the first non-empty success wins. Every
//! attempt is recorded as a `SourceAttempt` so callers can see which source
//! actually answered.
//!
//! After the region is validated nothing in here fails: a category whose
//! whole chain errored simply contributes no records.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use threadpool::ThreadPool;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::ingest::nws::NwsAlertAdapter;
use crate::ingest::overpass::OverpassRoadAdapter;
use crate::ingest::synthetic::SyntheticGenerator;
use crate::ingest::traffic::TrafficIncidentAdapter;
use crate::ingest::usgs::UsgsGaugeAdapter;
use crate::ingest::{SourceAdapter, build_client};
use crate::model::{
    FetchError, GeoPoint, Observation, RegionError, ResultSet, ResultSummary, RoadClosure,
    SearchRegion,
};

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    Gauges,
    Alerts,
    Roads,
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceCategory::Gauges => write!(f, "gauges"),
            SourceCategory::Alerts => write!(f, "alerts"),
            SourceCategory::Roads => write!(f, "roads"),
        }
    }
}

/// What happened when one adapter was asked for data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum AttemptOutcome {
    Accepted { records: usize },
    Empty,
    Network { message: String },
    Upstream { status: u16 },
    Parse { message: String },
}

impl From<&FetchError> for AttemptOutcome {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Network(message) => AttemptOutcome::Network {
                message: message.clone(),
            },
            FetchError::Upstream(status) => AttemptOutcome::Upstream { status: *status },
            FetchError::Parse(message) => AttemptOutcome::Parse {
                message: message.clone(),
            },
            FetchError::Empty(_) => AttemptOutcome::Empty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceAttempt {
    pub category: SourceCategory,
    pub source: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
    pub elapsed_ms: u64,
}

// ---------------------------------------------------------------------------
// Fallback chains
// ---------------------------------------------------------------------------

/// Records accepted from a chain plus the attempts it took to get them.
#[derive(Debug)]
pub struct ChainResult<R> {
    pub records: Vec<R>,
    pub attempts: Vec<SourceAttempt>,
}

/// Ordered adapters for one category.
pub struct FallbackChain<R> {
    category: SourceCategory,
    adapters: Vec<Arc<dyn SourceAdapter<R>>>,
}

impl<R: Send + 'static> FallbackChain<R> {
    pub fn new(category: SourceCategory) -> Self {
        Self {
            category,
            adapters: Vec::new(),
        }
    }

    pub fn with(mut self, adapter: Arc<dyn SourceAdapter<R>>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn category(&self) -> SourceCategory {
        self.category
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Tries each adapter in order; the first `Ok` with at least one record
    /// is accepted and later adapters are never called. If none qualifies
    /// the result is the last adapter's success (possibly empty) or, when it
    /// errored too, no records.
    pub fn run(&self, region: &SearchRegion, timeout: Duration) -> ChainResult<R> {
        let mut attempts = Vec::with_capacity(self.adapters.len());
        let mut fallback = Vec::new();

        for adapter in &self.adapters {
            let started = Instant::now();
            let result = call_with_timeout(Arc::clone(adapter), *region, timeout);
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let outcome = match result {
                Ok(records) if !records.is_empty() => {
                    info!(
                        category = %self.category,
                        source = adapter.name(),
                        records = records.len(),
                        elapsed_ms,
                        "source accepted"
                    );
                    attempts.push(SourceAttempt {
                        category: self.category,
                        source: adapter.name().to_string(),
                        outcome: AttemptOutcome::Accepted {
                            records: records.len(),
                        },
                        elapsed_ms,
                    });
                    return ChainResult { records, attempts };
                }
                Ok(records) => {
                    fallback = records;
                    AttemptOutcome::Empty
                }
                Err(err) => {
                    fallback = Vec::new();
                    warn!(
                        category = %self.category,
                        source = adapter.name(),
                        error = %err,
                        elapsed_ms,
                        "source failed, trying next"
                    );
                    AttemptOutcome::from(&err)
                }
            };

            attempts.push(SourceAttempt {
                category: self.category,
                source: adapter.name().to_string(),
                outcome,
                elapsed_ms,
            });
        }

        warn!(category = %self.category, "every source in chain failed");
        ChainResult {
            records: fallback,
            attempts,
        }
    }
}

/// Runs one adapter call on its own thread and waits at most `timeout`.
///
/// A call that overruns is reported as `Network` and left to finish in the
/// background; its result is discarded.
fn call_with_timeout<R: Send + 'static>(
    adapter: Arc<dyn SourceAdapter<R>>,
    region: SearchRegion,
    timeout: Duration,
) -> Result<Vec<R>, FetchError> {
    let (tx, rx) = mpsc::channel();
    let thread_name = format!("fetch-{}", adapter.name());

    thread::Builder::new()
        .name(thread_name)
        .spawn(move || {
            // Receiver is gone if the caller already timed out
            let _ = tx.send(adapter.fetch(&region));
        })
        .map_err(|e| FetchError::Network(format!("failed to spawn fetch thread: {}", e)))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(FetchError::Network(format!(
            "timed out after {} ms",
            timeout.as_millis()
        ))),
        Err(RecvTimeoutError::Disconnected) => {
            Err(FetchError::Network("adapter panicked".to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Everything returned for one flood-map request.
#[derive(Debug, Clone, Serialize)]
pub struct FloodMapData {
    pub region: SearchRegion,
    pub results: ResultSet,
    pub summary: ResultSummary,
    pub attempts: Vec<SourceAttempt>,
}

enum CategoryOutput {
    Observations(SourceCategory, ChainResult<Observation>),
    Closures(ChainResult<RoadClosure>),
}

pub struct AggregationPipeline {
    gauges: Arc<FallbackChain<Observation>>,
    alerts: Arc<FallbackChain<Observation>>,
    roads: Arc<FallbackChain<RoadClosure>>,
    timeout: Duration,
    default_center: GeoPoint,
    pool: ThreadPool,
}

impl AggregationPipeline {
    pub fn new(
        gauges: FallbackChain<Observation>,
        alerts: FallbackChain<Observation>,
        roads: FallbackChain<RoadClosure>,
        timeout: Duration,
        default_center: GeoPoint,
    ) -> Self {
        Self {
            gauges: Arc::new(gauges),
            alerts: Arc::new(alerts),
            roads: Arc::new(roads),
            timeout,
            default_center,
            pool: ThreadPool::with_name("category-chain".to_string(), 3),
        }
    }

    /// Wires up the default chains against live providers:
    ///
    /// - gauges: usgs, synthetic
    /// - alerts: nws, synthetic (synthetic dropped when `alert_fallback` is off)
    /// - roads: overpass, traffic, synthetic
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(&config.http)?;
        let seed = config.synthetic.seed.unwrap_or_else(rand::random);
        info!(seed, "fallback generators seeded");

        let gauges = FallbackChain::new(SourceCategory::Gauges)
            .with(Arc::new(UsgsGaugeAdapter::new(
                client.clone(),
                config.sources.usgs_iv_url.clone(),
            )))
            .with(Arc::new(SyntheticGenerator::new(
                seed,
                config.synthetic.observation_count,
            )));

        let mut alerts = FallbackChain::new(SourceCategory::Alerts).with(Arc::new(
            NwsAlertAdapter::new(client.clone(), config.sources.nws_alerts_url.clone()),
        ));
        if config.synthetic.alert_fallback {
            alerts = alerts.with(Arc::new(SyntheticGenerator::alerts(
                seed,
                config.synthetic.observation_count,
            )));
        }

        let roads = FallbackChain::new(SourceCategory::Roads)
            .with(Arc::new(OverpassRoadAdapter::new(
                client,
                config.sources.overpass_url.clone(),
            )))
            .with(Arc::new(TrafficIncidentAdapter::new(seed)))
            .with(Arc::new(SyntheticGenerator::new(
                seed,
                config.synthetic.closure_count,
            )));

        Ok(Self::new(
            gauges,
            alerts,
            roads,
            config.http.timeout(),
            config.region.default_center(),
        ))
    }

    /// Runs all three chains in parallel and merges them as gauges, then
    /// alerts, then roads. Attempts are returned in the same category order.
    pub fn run(&self, region: &SearchRegion) -> (ResultSet, Vec<SourceAttempt>) {
        let (tx, rx) = mpsc::channel();

        for chain in [Arc::clone(&self.gauges), Arc::clone(&self.alerts)] {
            let tx = tx.clone();
            let region = *region;
            let timeout = self.timeout;
            self.pool.execute(move || {
                let result = chain.run(&region, timeout);
                let _ = tx.send(CategoryOutput::Observations(chain.category(), result));
            });
        }

        {
            let tx = tx.clone();
            let chain = Arc::clone(&self.roads);
            let region = *region;
            let timeout = self.timeout;
            self.pool.execute(move || {
                let _ = tx.send(CategoryOutput::Closures(chain.run(&region, timeout)));
            });
        }
        drop(tx);

        let mut gauges = None;
        let mut alerts = None;
        let mut roads = None;

        // Ends early if a job panicked and dropped its sender
        for output in rx.iter() {
            match output {
                CategoryOutput::Observations(SourceCategory::Alerts, r) => alerts = Some(r),
                CategoryOutput::Observations(_, r) => gauges = Some(r),
                CategoryOutput::Closures(r) => roads = Some(r),
            }
        }

        let mut results = ResultSet::default();
        let mut attempts = Vec::new();

        for chain_result in [gauges, alerts].into_iter().flatten() {
            results.observations.extend(chain_result.records);
            attempts.extend(chain_result.attempts);
        }
        if let Some(chain_result) = roads {
            results.closures = chain_result.records;
            attempts.extend(chain_result.attempts);
        }

        (results, attempts)
    }

    /// Request entry point.
    ///
    /// A missing coordinate falls back to the configured default center.
    /// With `show_data == false` the region is still validated but no source
    /// is contacted and the result set is empty.
    ///
    /// # Errors
    /// `RegionError` for a non-positive radius or an invalid center.
    pub fn fetch_flood_map_data(
        &self,
        center_lat: Option<f64>,
        center_lon: Option<f64>,
        radius_miles: i64,
        show_data: bool,
    ) -> Result<FloodMapData, RegionError> {
        let center = GeoPoint::new(
            center_lat.unwrap_or(self.default_center.latitude),
            center_lon.unwrap_or(self.default_center.longitude),
        );
        let region = SearchRegion::new(center, radius_miles as f64)?;

        let (results, attempts) = if show_data {
            self.run(&region)
        } else {
            (ResultSet::default(), Vec::new())
        };

        let summary = results.summary();
        info!(
            lat = region.center.latitude,
            lon = region.center.longitude,
            radius = region.radius_miles,
            observations = summary.observation_count,
            closures = summary.closure_count,
            "flood map assembled"
        );

        Ok(FloodMapData {
            region,
            results,
            summary,
            attempts,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
