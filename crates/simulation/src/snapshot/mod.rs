//! Simulation snapshot generation.
//!
//! The generator is a pure function of the hour, the district configuration
//! and an injected RNG. The ECS side keeps the latest snapshot for the running
//! `SimClock` in `CurrentSnapshot`.

pub mod generator;
pub mod summary;
pub mod systems;
pub mod types;

pub use generator::{generate_day, generate_snapshot};
pub use summary::{summarize_districts, DistrictSummary};
pub use systems::{log_window_changes, regenerate_snapshot, CurrentSnapshot, SnapshotGenerated};
pub use types::GridSnapshot;

use bevy::prelude::*;

use crate::districts::DistrictConfig;

pub struct SnapshotPlugin;

impl Plugin for SnapshotPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DistrictConfig>()
            .init_resource::<CurrentSnapshot>()
            .add_event::<SnapshotGenerated>()
            .add_systems(
                FixedUpdate,
                regenerate_snapshot
                    .after(crate::time_of_day::tick_sim_clock)
                    .in_set(crate::SimulationSet::Simulation),
            )
            .add_systems(
                FixedUpdate,
                log_window_changes.in_set(crate::SimulationSet::PostSim),
            );
    }
}
