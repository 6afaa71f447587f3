//! Synthetic bike-share simulation.
//!
//! The core is [`snapshot::generate_snapshot`]: given a district layout, an
//! hour and an RNG it produces one immutable [`snapshot::GridSnapshot`] of
//! station density, cell flow, station stock and district-to-district flow.
//! [`SimulationPlugin`] wires it into a Bevy app driven by [`time_of_day::SimClock`].

use bevy::prelude::*;

pub mod agent_protocol;
pub mod config;
pub mod district_flows;
pub mod districts;
pub mod error;
pub mod grid;
pub mod sim_rng;
pub mod simulation_sets;
pub mod snapshot;
pub mod stations;
pub mod time_of_day;

pub use error::{SimResult, SimulationError};
pub use simulation_sets::SimulationSet;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        simulation_sets::configure_sets(app);
        app.add_plugins((
            sim_rng::SimRngPlugin,
            time_of_day::TimeOfDayPlugin,
            snapshot::SnapshotPlugin,
        ));
    }
}

/// Run one `FixedUpdate` pass outside the main loop, then rotate the snapshot
/// event buffers the way the `First` schedule does on `App::update`.
///
/// Drivers that step the world by hand (batch output, agent mode) call this
/// so `SnapshotGenerated` events are dropped after one step instead of piling up.
pub fn run_fixed_step(world: &mut World) {
    world.run_schedule(FixedUpdate);
    world
        .resource_mut::<Events<snapshot::SnapshotGenerated>>()
        .update();
}
