use serde::Serialize;

use crate::districts::{DistrictCategory, DistrictConfig};

use super::types::GridSnapshot;

/// Per-district aggregate of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictSummary {
    pub name: String,
    pub category: DistrictCategory,
    pub stations: usize,
    pub mean_density: f64,
    /// Sum of cell flow over the district's stations (positive = net outflow).
    pub net_flow: f64,
    pub bikes_available: u32,
    pub outbound_bikes_per_hour: u32,
    pub inbound_bikes_per_hour: u32,
}

/// Summarise `snapshot` district by district, in declared order.
///
/// `config` must be the configuration the snapshot was generated from;
/// stations outside its grid are skipped.
pub fn summarize_districts(
    config: &DistrictConfig,
    snapshot: &GridSnapshot,
) -> Vec<DistrictSummary> {
    let size = snapshot.grid_size();
    config
        .districts()
        .iter()
        .map(|district| {
            let mut density_sum = 0.0;
            let mut net_flow = 0.0;
            let mut bikes_available = 0;
            let mut stations = 0;
            for &(row, col) in &district.stations {
                let (Some(d), Some(f)) =
                    (snapshot.density_at(row, col), snapshot.flow_at(row, col))
                else {
                    continue;
                };
                density_sum += d;
                net_flow += f;
                bikes_available += snapshot
                    .station_info()
                    .get(&(row * size + col))
                    .map_or(0, |s| s.bikes_available);
                stations += 1;
            }

            let outbound_bikes_per_hour = snapshot
                .district_flows()
                .iter()
                .filter(|f| f.from == district.name)
                .map(|f| f.bikes_per_hour)
                .sum();
            let inbound_bikes_per_hour = snapshot
                .district_flows()
                .iter()
                .filter(|f| f.to == district.name)
                .map(|f| f.bikes_per_hour)
                .sum();

            DistrictSummary {
                name: district.name.clone(),
                category: district.category,
                stations,
                mean_density: if stations > 0 {
                    density_sum / stations as f64
                } else {
                    0.0
                },
                net_flow,
                bikes_available,
                outbound_bikes_per_hour,
                inbound_bikes_per_hour,
            }
        })
        .collect()
}
