//! Hazard classification.
//!
//! Turns a raw provider measurement or alert severity into a `HazardLevel`.
//! These are simple static thresholds in provider-reported units; every
//! bound is exclusive (a gauge at exactly 15.0 ft is `Medium`, not `High`).

use crate::model::{HazardLevel, ObservationCategory, ObservationValue};

/// Gauge height (ft) above which a site is `High`.
pub const GAUGE_HEIGHT_HIGH_FT: f64 = 15.0;
/// Gauge height (ft) above which a site is `Medium`.
pub const GAUGE_HEIGHT_MEDIUM_FT: f64 = 10.0;
/// Discharge (cfs) above which a site is `High`.
pub const DISCHARGE_HIGH_CFS: f64 = 10_000.0;
/// Discharge (cfs) above which a site is `Medium`.
pub const DISCHARGE_MEDIUM_CFS: f64 = 5_000.0;

fn by_thresholds(value: f64, high: f64, medium: f64) -> HazardLevel {
    // NaN compares false everywhere and falls through to Low
    if value > high {
        HazardLevel::High
    } else if value > medium {
        HazardLevel::Medium
    } else {
        HazardLevel::Low
    }
}

pub fn classify_gauge_height(feet: f64) -> HazardLevel {
    by_thresholds(feet, GAUGE_HEIGHT_HIGH_FT, GAUGE_HEIGHT_MEDIUM_FT)
}

pub fn classify_discharge(cfs: f64) -> HazardLevel {
    by_thresholds(cfs, DISCHARGE_HIGH_CFS, DISCHARGE_MEDIUM_CFS)
}

/// Maps an alert severity string (CAP `Extreme`/`Severe`/`Moderate`/
/// `Minor`/`Unknown`) to a hazard level, case-insensitively.
pub fn classify_alert_severity(severity: &str) -> HazardLevel {
    let severity = severity.to_lowercase();
    if severity.contains("extreme") || severity.contains("severe") {
        HazardLevel::High
    } else if severity.contains("moderate") {
        HazardLevel::Medium
    } else {
        HazardLevel::Low
    }
}

/// Classifies any observation value against its category's table.
///
/// A numeric value under `WeatherAlert`, or severity text under a gauge
/// category, has no defined threshold and classifies as `Low`.
pub fn classify(category: ObservationCategory, value: &ObservationValue) -> HazardLevel {
    match (category, value) {
        (ObservationCategory::GaugeHeight, ObservationValue::Measurement(v)) => {
            classify_gauge_height(*v)
        }
        (ObservationCategory::Discharge, ObservationValue::Measurement(v)) => {
            classify_discharge(*v)
        }
        (ObservationCategory::WeatherAlert, ObservationValue::Severity(s)) => {
            classify_alert_severity(s)
        }
        _ => HazardLevel::Low,
    }
}

/// Determines an observation category from a USGS `variableName` label,
/// falling back to the parameter code.
///
/// USGS spells it "Gage height, ft", so both spellings are accepted.
pub fn category_for_parameter(variable_name: &str, parameter_code: &str) -> Option<ObservationCategory> {
    let name = variable_name.to_lowercase();
    if name.contains("gauge height") || name.contains("gage height") {
        Some(ObservationCategory::GaugeHeight)
    } else if name.contains("discharge") || name.contains("streamflow") {
        Some(ObservationCategory::Discharge)
    } else {
        match parameter_code {
            crate::model::PARAM_STAGE => Some(ObservationCategory::GaugeHeight),
            crate::model::PARAM_DISCHARGE => Some(ObservationCategory::Discharge),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
