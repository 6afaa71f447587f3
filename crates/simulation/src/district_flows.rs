//! Directional flow between districts.
//!
//! Each ordered pair of distinct districts gets a proximity-weighted affinity
//! (closer stations contribute more), scaled by a commute multiplier that
//! depends on the coarse [`TimeWindow`] and the two districts' categories.

use serde::{Deserialize, Serialize};

use crate::config::{BIKES_PER_INTENSITY, COMMUTE_MULTIPLIER, PARTIAL_COMMUTE_MULTIPLIER};
use crate::districts::{DistrictCategory, DistrictConfig, StationCoord};
use crate::time_of_day::TimeWindow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictFlow {
    pub from: String,
    pub to: String,
    pub intensity: f64,
    pub bikes_per_hour: u32,
}

impl DistrictFlow {
    pub fn strength(&self) -> FlowStrength {
        FlowStrength::classify(self.intensity)
    }
}

/// Legend bucket for a flow intensity, judged on its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStrength {
    /// Below 0.3.
    Low,
    /// 0.3 through 0.7.
    Medium,
    /// Above 0.7.
    High,
}

impl FlowStrength {
    pub fn classify(intensity: f64) -> Self {
        let magnitude = intensity.abs();
        if magnitude > 0.7 {
            FlowStrength::High
        } else if magnitude >= 0.3 {
            FlowStrength::Medium
        } else {
            FlowStrength::Low
        }
    }
}

/// Commute bias for traffic from a `from`-category district to a `to`-category one.
pub fn direction_multiplier(window: TimeWindow, from: DistrictCategory, to: DistrictCategory) -> f64 {
    use DistrictCategory::*;
    match (window, from, to) {
        (TimeWindow::Morning, Residential, Business) => COMMUTE_MULTIPLIER,
        (TimeWindow::Morning, Residential, Mixed) | (TimeWindow::Morning, Mixed, Business) => {
            PARTIAL_COMMUTE_MULTIPLIER
        }
        (TimeWindow::Evening, Business, Residential) => COMMUTE_MULTIPLIER,
        (TimeWindow::Evening, Business, Mixed) | (TimeWindow::Evening, Mixed, Residential) => {
            PARTIAL_COMMUTE_MULTIPLIER
        }
        _ => 1.0,
    }
}

fn euclidean_distance(a: StationCoord, b: StationCoord) -> f64 {
    let dr = a.0 as f64 - b.0 as f64;
    let dc = a.1 as f64 - b.1 as f64;
    (dr * dr + dc * dc).sqrt()
}

/// Sum of `1 / (1 + distance)` over every (from station, to station) pair.
pub fn proximity_affinity(from: &[StationCoord], to: &[StationCoord]) -> f64 {
    from.iter()
        .flat_map(|&a| to.iter().map(move |&b| 1.0 / (1.0 + euclidean_distance(a, b))))
        .sum()
}

pub fn bikes_per_hour(intensity: f64) -> u32 {
    (intensity * BIKES_PER_INTENSITY).floor().max(0.0) as u32
}

/// Flows for every ordered pair of distinct districts, in declared order.
pub fn compute_district_flows(config: &DistrictConfig, window: TimeWindow) -> Vec<DistrictFlow> {
    let districts = config.districts();
    let n = districts.len();
    let mut flows = Vec::with_capacity(n * n.saturating_sub(1));
    for (fi, from) in districts.iter().enumerate() {
        for (ti, to) in districts.iter().enumerate() {
            if fi == ti {
                continue;
            }
            let base = proximity_affinity(&from.stations, &to.stations);
            let intensity = base * direction_multiplier(window, from.category, to.category);
            flows.push(DistrictFlow {
                from: from.name.clone(),
                to: to.name.clone(),
                intensity,
                bikes_per_hour: bikes_per_hour(intensity),
            });
        }
    }
    flows
}
