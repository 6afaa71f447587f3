//! Headless `--agent` mode: a blocking synchronous loop that reads JSON
//! commands from stdin and writes JSON responses to stdout.
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator.
//! Each line of stdout is a JSON response with `"protocol_version"` and
//! `"type"` fields. See [`simulation::agent_protocol`] for the full schema.

use std::io::{BufRead, Write};

use bevy::prelude::*;

use simulation::agent_protocol::{make_response, AgentCommand, AgentResponse, ResponsePayload};
use simulation::districts::DistrictConfig;
use simulation::sim_rng::SimRng;
use simulation::snapshot::{generate_day, generate_snapshot, summarize_districts, CurrentSnapshot};
use simulation::time_of_day::SimClock;

pub fn run_agent_mode(app: &mut App) {
    // Produce the snapshot for the starting hour before accepting commands.
    simulation::run_fixed_step(app.world_mut());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    write_response(&mut stdout, &make_response(ResponsePayload::Ready));
    info!(
        "bikeshare agent mode v{} ready; waiting for commands on stdin",
        simulation::agent_protocol::PROTOCOL_VERSION
    );

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<AgentCommand>(&line) {
            Ok(cmd) => process_command(cmd, app),
            Err(e) => make_response(ResponsePayload::Error {
                message: format!("Parse error: {e}"),
            }),
        };
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);
        write_response(&mut stdout, &response);
        if is_goodbye {
            break;
        }
    }

    info!("bikeshare agent mode shutting down");
}

fn write_response(out: &mut impl Write, response: &AgentResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let _ = writeln!(out, "{json}");
        }
        Err(e) => {
            let _ = writeln!(
                out,
                r#"{{"protocol_version":{},"type":"error","message":"encode failed: {}"}}"#,
                simulation::agent_protocol::PROTOCOL_VERSION,
                e.to_string().replace('"', "'")
            );
        }
    }
    let _ = out.flush();
}

fn error_response(message: impl ToString) -> AgentResponse {
    make_response(ResponsePayload::Error {
        message: message.to_string(),
    })
}

/// Response carrying the current snapshot, or an error if none has been generated.
fn current_snapshot_response(app: &App) -> AgentResponse {
    let current = app.world().resource::<CurrentSnapshot>();
    match &current.snapshot {
        Some(snapshot) => make_response(ResponsePayload::Snapshot {
            day: current.day,
            snapshot: snapshot.clone(),
        }),
        None => error_response("no snapshot has been generated yet"),
    }
}

fn process_command(cmd: AgentCommand, app: &mut App) -> AgentResponse {
    match cmd {
        AgentCommand::Observe => current_snapshot_response(app),

        AgentCommand::Generate { hour } => {
            let day = app.world().resource::<SimClock>().day;
            let result = app
                .world_mut()
                .resource_scope(|world, mut rng: Mut<SimRng>| {
                    generate_snapshot(world.resource::<DistrictConfig>(), hour, &mut rng.0)
                });
            match result {
                Ok(snapshot) => make_response(ResponsePayload::Snapshot { day, snapshot }),
                Err(e) => error_response(e),
            }
        }

        AgentCommand::Advance { hours } => {
            app.world_mut()
                .resource_mut::<SimClock>()
                .advance_hours(hours);
            simulation::run_fixed_step(app.world_mut());
            current_snapshot_response(app)
        }

        AgentCommand::Status => {
            let clock = app.world().resource::<SimClock>();
            make_response(ResponsePayload::Clock {
                day: clock.day,
                hour: clock.hour,
                minute: clock.minute,
                formatted: clock.formatted(),
            })
        }

        AgentCommand::Summary => {
            let world = app.world();
            let current = world.resource::<CurrentSnapshot>();
            match &current.snapshot {
                Some(snapshot) => make_response(ResponsePayload::Summary {
                    day: current.day,
                    hour: snapshot.hour(),
                    districts: summarize_districts(world.resource::<DistrictConfig>(), snapshot),
                }),
                None => error_response("no snapshot has been generated yet"),
            }
        }

        AgentCommand::SimulateDay => {
            let result = app
                .world_mut()
                .resource_scope(|world, mut rng: Mut<SimRng>| {
                    generate_day(world.resource::<DistrictConfig>(), &mut rng.0)
                });
            match result {
                Ok(snapshots) => make_response(ResponsePayload::Day { snapshots }),
                Err(e) => error_response(e),
            }
        }

        AgentCommand::Reseed { seed } => {
            app.world_mut().resource_mut::<SimRng>().reseed(seed);
            make_response(ResponsePayload::Ok)
        }

        AgentCommand::LoadDistricts { config } => {
            match DistrictConfig::from_json(&config.to_string()) {
                Ok(config) => {
                    info!("Agent loaded {} districts", config.len());
                    app.insert_resource(config);
                    simulation::run_fixed_step(app.world_mut());
                    make_response(ResponsePayload::Ok)
                }
                Err(e) => {
                    warn!("Agent district config rejected: {e}");
                    error_response(e)
                }
            }
        }

        AgentCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::snapshot::SnapshotGenerated;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(simulation::SimulationPlugin);
        let mut clock = SimClock::at_hour(6).unwrap();
        clock.paused = true;
        app.insert_resource(clock);
        app.insert_resource(SimRng::from_seed_u64(3));
        simulation::run_fixed_step(app.world_mut());
        app
    }

    fn run(app: &mut App, json: &str) -> serde_json::Value {
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        serde_json::to_value(process_command(cmd, app)).unwrap()
    }

    #[test]
    fn test_observe_returns_current_hour() {
        let mut app = test_app();
        let resp = run(&mut app, r#"{"cmd":"observe"}"#);
        assert_eq!(resp["type"], "snapshot");
        assert_eq!(resp["snapshot"]["hour"], 6);
    }

    #[test]
    fn test_advance_moves_clock_and_snapshot() {
        let mut app = test_app();
        let resp = run(&mut app, r#"{"cmd":"advance","hours":2}"#);
        assert_eq!(resp["snapshot"]["hour"], 8);
        assert_eq!(resp["snapshot"]["time_window"], "morning");

        let status = run(&mut app, r#"{"cmd":"status"}"#);
        assert_eq!(status["type"], "clock");
        assert_eq!(status["hour"], 8);
    }

    #[test]
    fn test_generate_does_not_move_clock() {
        let mut app = test_app();
        let resp = run(&mut app, r#"{"cmd":"generate","hour":18}"#);
        assert_eq!(resp["snapshot"]["time_of_day"], "evening");
        assert_eq!(app.world().resource::<SimClock>().hour, 6);
    }

    #[test]
    fn test_generate_out_of_range_hour() {
        let mut app = test_app();
        let resp = run(&mut app, r#"{"cmd":"generate","hour":24}"#);
        assert_eq!(resp["type"], "error");
        assert!(resp["message"].as_str().unwrap().contains("Invalid input"));
    }

    #[test]
    fn test_simulate_day_and_summary() {
        let mut app = test_app();
        let day = run(&mut app, r#"{"cmd":"simulate_day"}"#);
        assert_eq!(day["snapshots"].as_array().unwrap().len(), 24);

        let summary = run(&mut app, r#"{"cmd":"summary"}"#);
        assert_eq!(summary["type"], "summary");
        assert_eq!(summary["districts"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_load_districts() {
        let mut app = test_app();
        let overlap = r#"{"cmd":"load_districts","config":{"districts":[
            {"name":"a","density_range":[0.1,0.2],"category":"mixed","stations":[[0,0]]},
            {"name":"b","density_range":[0.1,0.2],"category":"mixed","stations":[[0,0]]}]}}"#;
        let resp = run(&mut app, overlap);
        assert_eq!(resp["type"], "error");
        assert!(resp["message"].as_str().unwrap().contains("Configuration error"));

        let good = r#"{"cmd":"load_districts","config":{"grid_size":2,"districts":[
            {"name":"a","density_range":[0.1,0.2],"category":"business","stations":[[0,0]]},
            {"name":"b","density_range":[0.3,0.4],"category":"residential","stations":[[1,1]]}]}}"#;
        assert_eq!(run(&mut app, good)["type"], "ok");

        let snap = run(&mut app, r#"{"cmd":"observe"}"#);
        assert_eq!(snap["snapshot"]["density"].as_array().unwrap().len(), 2);
        assert_eq!(snap["snapshot"]["district_flows"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_reseed_makes_generation_repeatable() {
        let mut app = test_app();
        run(&mut app, r#"{"cmd":"reseed","seed":11}"#);
        let first = run(&mut app, r#"{"cmd":"generate","hour":12}"#);
        run(&mut app, r#"{"cmd":"reseed","seed":11}"#);
        let second = run(&mut app, r#"{"cmd":"generate","hour":12}"#);
        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_advance_drops_old_events() {
        let mut app = test_app();
        for _ in 0..200 {
            run(&mut app, r#"{"cmd":"advance","hours":1}"#);
        }
        let retained = app.world().resource::<Events<SnapshotGenerated>>().len();
        assert!(retained <= 2, "{retained} events retained");
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(run(&mut app, r#"{"cmd":"quit"}"#)["type"], "goodbye");
    }
}
