//! Last-resort synthetic generator.
//!
//! Used only when every real adapter in a category's chain has failed or
//! come back empty. Output is plausible but invented, is always tagged
//! `Provenance::Synthetic`, and is never empty.
//!
//! All randomness flows from an explicit seed mixed with the search region,
//! so a given `(seed, region)` pair always yields the same records (apart
//! from the generation timestamp).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

use crate::classify::classify;
use crate::geo;
use crate::ingest::SourceAdapter;
use crate::model::{
    ClosureStatus, FetchError, GeoPoint, HazardLevel, Observation, ObservationCategory,
    ObservationValue, Provenance, RoadClosure, SearchRegion,
};

/// Stream salts keep observation and closure draws independent for the
/// same seed.
const OBSERVATION_SALT: u64 = 0x0B5E_7A71_0000_0000;
const CLOSURE_SALT: u64 = 0xC105_ED00_0000_0000;

const ROAD_NAMES: [&str; 3] = ["Main St", "Broadway", "Highway 101"];
const ROAD_REASONS: [&str; 3] = ["flooding", "water on roadway", "flooding"];

/// Band order for generated observations: the first three records cover
/// high, medium, and low.
const BANDS: [HazardLevel; 3] = [HazardLevel::High, HazardLevel::Medium, HazardLevel::Low];

// ---------------------------------------------------------------------------
// Shared sampling helpers
// ---------------------------------------------------------------------------

/// RNG for one `(seed, region)` pair.
pub(crate) fn region_rng(seed: u64, salt: u64, region: &SearchRegion) -> ChaCha8Rng {
    let mixed = seed
        ^ salt
        ^ region.center.latitude.to_bits()
        ^ region.center.longitude.to_bits().rotate_left(21)
        ^ region.radius_miles.to_bits().rotate_left(42);
    ChaCha8Rng::seed_from_u64(mixed)
}

/// Draws a point uniformly by area over the search disk
/// (`d = R·sqrt(u)`, `θ = 2π·u'`) and returns it with its display distance.
pub(crate) fn sample_in_disk<G: Rng>(rng: &mut G, region: &SearchRegion) -> (GeoPoint, f64) {
    for _ in 0..16 {
        let bearing = rng.gen_range(0.0..TAU);
        let d = region.radius_miles * rng.r#gen::<f64>().sqrt();
        let point = geo::destination(&region.center, bearing, d);
        if let Some(distance) = region.within(&point) {
            return (point, distance);
        }
    }
    // Only reachable if every draw landed on the rim and rounded outward.
    (region.center, 0.0)
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Seeded generator of placeholder observations or road closures.
pub struct SyntheticGenerator {
    seed: u64,
    count: usize,
    categories: Vec<ObservationCategory>,
}

impl SyntheticGenerator {
    /// Generator producing `count` records (minimum 1), alternating gauge
    /// height and discharge when used for observations.
    pub fn new(seed: u64, count: usize) -> Self {
        Self {
            seed,
            count: count.max(1),
            categories: vec![ObservationCategory::GaugeHeight, ObservationCategory::Discharge],
        }
    }

    /// Generator for the weather-alert chain.
    pub fn alerts(seed: u64, count: usize) -> Self {
        Self::new(seed, count).with_categories(vec![ObservationCategory::WeatherAlert])
    }

    pub fn with_categories(mut self, categories: Vec<ObservationCategory>) -> Self {
        if !categories.is_empty() {
            self.categories = categories;
        }
        self
    }

    pub fn observations(&self, region: &SearchRegion) -> Vec<Observation> {
        let mut rng = region_rng(self.seed, OBSERVATION_SALT, region);
        let generated_at = chrono::Utc::now().to_rfc3339();

        (0..self.count)
            .map(|i| {
                let category = self.categories[i % self.categories.len()];
                let band = BANDS[i % BANDS.len()];
                let (location, distance_miles) = sample_in_disk(&mut rng, region);
                let (value, parameter, name) = synthetic_value(&mut rng, category, band, i);

                Observation {
                    id: format!("synthetic-{}", i),
                    name,
                    location,
                    category,
                    hazard_level: classify(category, &value),
                    value,
                    parameter: parameter.to_string(),
                    timestamp: generated_at.clone(),
                    distance_miles,
                    description: Some(
                        "Synthetic placeholder; live sources were unavailable".to_string(),
                    ),
                    provenance: Provenance::Synthetic,
                }
            })
            .collect()
    }

    pub fn closures(&self, region: &SearchRegion) -> Vec<RoadClosure> {
        let mut rng = region_rng(self.seed, CLOSURE_SALT, region);

        (0..self.count)
            .map(|i| {
                let (location, distance_miles) = sample_in_disk(&mut rng, region);
                let status = if i % 2 == 0 {
                    ClosureStatus::Closed
                } else {
                    ClosureStatus::Restricted
                };
                let reason = ROAD_REASONS[i % ROAD_REASONS.len()];

                RoadClosure {
                    id: format!("synthetic-road-{}", i),
                    name: ROAD_NAMES[i % ROAD_NAMES.len()].to_string(),
                    location,
                    status,
                    reason: reason.to_string(),
                    description: RoadClosure::describe(status, reason),
                    distance_miles,
                    provenance: Provenance::Synthetic,
                }
            })
            .collect()
    }
}

/// Picks a value inside `band` for `category`, plus its parameter label
/// and a display name.
fn synthetic_value<G: Rng>(
    rng: &mut G,
    category: ObservationCategory,
    band: HazardLevel,
    index: usize,
) -> (ObservationValue, &'static str, String) {
    match category {
        ObservationCategory::GaugeHeight => {
            let feet = match band {
                HazardLevel::High => rng.gen_range(15.5..22.0),
                HazardLevel::Medium => rng.gen_range(10.5..14.5),
                HazardLevel::Low => rng.gen_range(2.0..9.5),
            };
            (
                ObservationValue::Measurement((feet * 100.0_f64).round() / 100.0),
                "Gage height, ft",
                format!("Synthetic Station {}", index + 1),
            )
        }
        ObservationCategory::Discharge => {
            let cfs: f64 = match band {
                HazardLevel::High => rng.gen_range(10_500.0..25_000.0),
                HazardLevel::Medium => rng.gen_range(5_500.0..9_500.0),
                HazardLevel::Low => rng.gen_range(300.0..4_500.0),
            };
            (
                ObservationValue::Measurement(cfs.round()),
                "Streamflow, ft3/s",
                format!("Synthetic Station {}", index + 1),
            )
        }
        ObservationCategory::WeatherAlert => {
            let severity = match band {
                HazardLevel::High => "Severe",
                HazardLevel::Medium => "Moderate",
                HazardLevel::Low => "Minor",
            };
            (
                ObservationValue::Severity(severity.to_string()),
                "NWS Alert",
                format!("Synthetic Flood Advisory {}", index + 1),
            )
        }
    }
}

impl SourceAdapter<Observation> for SyntheticGenerator {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, region: &SearchRegion) -> Result<Vec<Observation>, FetchError> {
        Ok(self.observations(region))
    }
}

impl SourceAdapter<RoadClosure> for SyntheticGenerator {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, region: &SearchRegion) -> Result<Vec<RoadClosure>, FetchError> {
        Ok(self.closures(region))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
