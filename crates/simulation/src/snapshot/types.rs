use std::collections::BTreeMap;

use serde::Serialize;

use crate::district_flows::DistrictFlow;
use crate::grid::SquareGrid;
use crate::stations::StationInfo;
use crate::time_of_day::{TimeFactors, TimeOfDayLabel, TimeWindow};

/// One immutable result of a single generation call.
///
/// Fields are private so a snapshot cannot change after construction; read
/// them through the accessors or serialize the whole thing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub(super) hour: u32,
    pub(super) density: SquareGrid<f64>,
    pub(super) flow: SquareGrid<f64>,
    pub(super) time_factors: TimeFactors,
    pub(super) station_info: BTreeMap<usize, StationInfo>,
    pub(super) district_flows: Vec<DistrictFlow>,
    pub(super) time_window: TimeWindow,
    pub(super) time_of_day: TimeOfDayLabel,
}

impl GridSnapshot {
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn grid_size(&self) -> usize {
        self.density.size()
    }

    /// Occupancy per cell, in `[0, 1]`.
    pub fn density(&self) -> &SquareGrid<f64> {
        &self.density
    }

    /// Signed net flow per cell: positive is outflow, negative is inflow.
    pub fn flow(&self) -> &SquareGrid<f64> {
        &self.flow
    }

    pub fn density_at(&self, row: usize, col: usize) -> Option<f64> {
        self.density.in_bounds(row, col).then(|| *self.density.get(row, col))
    }

    pub fn flow_at(&self, row: usize, col: usize) -> Option<f64> {
        self.flow.in_bounds(row, col).then(|| *self.flow.get(row, col))
    }

    pub fn time_factors(&self) -> &TimeFactors {
        &self.time_factors
    }

    pub fn station_info(&self) -> &BTreeMap<usize, StationInfo> {
        &self.station_info
    }

    pub fn district_flows(&self) -> &[DistrictFlow] {
        &self.district_flows
    }

    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    pub fn time_of_day(&self) -> TimeOfDayLabel {
        self.time_of_day
    }

    pub fn total_bikes(&self) -> u32 {
        self.station_info.values().map(|s| s.bikes_available).sum()
    }
}
