use bevy::prelude::*;

use crate::districts::DistrictConfig;
use crate::sim_rng::SimRng;
use crate::time_of_day::{SimClock, TimeWindow};

use super::generator::generate_snapshot;
use super::types::GridSnapshot;

/// Latest snapshot produced for the running clock, plus the day it belongs to.
///
/// Each regeneration replaces the previous snapshot wholesale; no history is kept.
#[derive(Resource, Debug, Default)]
pub struct CurrentSnapshot {
    pub snapshot: Option<GridSnapshot>,
    pub day: u32,
}

impl CurrentSnapshot {
    fn is_current(&self, clock: &SimClock) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|s| s.hour() == clock.hour && self.day == clock.day)
    }
}

/// Fired whenever `CurrentSnapshot` is replaced.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotGenerated {
    pub day: u32,
    pub hour: u32,
}

/// Regenerate the snapshot when the clock reaches a new hour or the district
/// configuration changes. A failed generation keeps the previous snapshot.
pub fn regenerate_snapshot(
    clock: Res<SimClock>,
    config: Res<DistrictConfig>,
    mut rng: ResMut<SimRng>,
    mut current: ResMut<CurrentSnapshot>,
    mut generated: EventWriter<SnapshotGenerated>,
) {
    if current.is_current(&clock) && !config.is_changed() {
        return;
    }

    match generate_snapshot(&config, clock.hour, &mut rng.0) {
        Ok(snapshot) => {
            debug!(
                "Snapshot for {}: {:?} window, {} bikes, {} district flows",
                clock.formatted(),
                snapshot.time_window(),
                snapshot.total_bikes(),
                snapshot.district_flows().len()
            );
            current.snapshot = Some(snapshot);
            current.day = clock.day;
            generated.send(SnapshotGenerated {
                day: clock.day,
                hour: clock.hour,
            });
        }
        Err(e) => {
            error!("Snapshot generation failed at {}: {}", clock.formatted(), e);
        }
    }
}

/// Announce transitions between flow-bias windows (rush hours starting and ending).
pub fn log_window_changes(
    mut generated: EventReader<SnapshotGenerated>,
    current: Res<CurrentSnapshot>,
    mut last_window: Local<Option<TimeWindow>>,
) {
    if generated.read().last().is_none() {
        return;
    }
    let Some(snapshot) = current.snapshot.as_ref() else {
        return;
    };
    let window = snapshot.time_window();
    if *last_window != Some(window) {
        info!(
            "Day {} {:02}:00 entering {:?} window ({} bikes docked)",
            current.day,
            snapshot.hour(),
            window,
            snapshot.total_bikes()
        );
        *last_window = Some(window);
    }
}
