//! Regional traffic-incident fallback.
//!
//! Stands in for a 511-style incident feed when OpenStreetMap has nothing
//! for the area. No live feed is wired up, so incidents are drawn from a
//! fixed roster of road names and reasons and scattered across the search
//! disk with a seeded RNG. Records are tagged `Provenance::Sample` so
//! consumers can tell them apart from mapped data.

use crate::ingest::SourceAdapter;
use crate::ingest::synthetic::{region_rng, sample_in_disk};
use crate::model::{ClosureStatus, FetchError, Provenance, RoadClosure, SearchRegion};

pub const ROAD_NAMES: [&str; 8] = [
    "Main St",
    "Oak Ave",
    "Pine Rd",
    "Maple Blvd",
    "Highway 1",
    "Route 66",
    "County Rd 5",
    "State Highway 99",
];

pub const INCIDENT_REASONS: [&str; 7] = [
    "flooding",
    "water on roadway",
    "storm damage",
    "road washout",
    "bridge flooding",
    "mudslide",
    "debris",
];

/// One incident per compass direction.
pub const DEFAULT_INCIDENT_COUNT: usize = 8;

const TRAFFIC_SALT: u64 = 0x0511_0511_0511_0511;

pub struct TrafficIncidentAdapter {
    seed: u64,
    count: usize,
}

impl TrafficIncidentAdapter {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            count: DEFAULT_INCIDENT_COUNT,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Incidents for `region`. Status alternates closed / restricted; road
    /// and reason are drawn from the rosters.
    pub fn incidents(&self, region: &SearchRegion) -> Vec<RoadClosure> {
        use rand::Rng;

        let mut rng = region_rng(self.seed, TRAFFIC_SALT, region);

        (0..self.count)
            .map(|i| {
                let (location, distance_miles) = sample_in_disk(&mut rng, region);
                let road = ROAD_NAMES[rng.gen_range(0..ROAD_NAMES.len())];
                let reason = INCIDENT_REASONS[rng.gen_range(0..INCIDENT_REASONS.len())];
                let status = if i % 2 == 0 {
                    ClosureStatus::Closed
                } else {
                    ClosureStatus::Restricted
                };

                RoadClosure {
                    id: format!("traffic-{}", i),
                    name: road.to_string(),
                    location,
                    status,
                    reason: reason.to_string(),
                    description: format!(
                        "Road {} due to {}",
                        status.to_string().to_lowercase(),
                        reason
                    ),
                    distance_miles,
                    provenance: Provenance::Sample,
                }
            })
            .collect()
    }
}

impl SourceAdapter<RoadClosure> for TrafficIncidentAdapter {
    fn name(&self) -> &str {
        "traffic"
    }

    fn fetch(&self, region: &SearchRegion) -> Result<Vec<RoadClosure>, FetchError> {
        let incidents = self.incidents(region);
        if incidents.is_empty() {
            return Err(FetchError::Empty("Incident feed disabled".to_string()));
        }
        Ok(incidents)
    }
}
