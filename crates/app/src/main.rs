use std::io::Write;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use simulation::agent_protocol::{make_response, ResponsePayload};
use simulation::districts::DistrictConfig;
use simulation::sim_rng::SimRng;
use simulation::snapshot::CurrentSnapshot;
use simulation::time_of_day::SimClock;

mod agent_mode;

/// Headless bike-share simulation.
///
/// Prints one snapshot per simulated hour as JSON lines, or with `--agent`
/// serves the JSON command protocol on stdin/stdout.
#[derive(Parser, Debug)]
#[command(name = "bikeshare")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Run the newline-delimited JSON agent protocol instead of batch output
    #[arg(long)]
    agent: bool,

    /// Number of hourly snapshots to print in batch mode
    #[arg(long, default_value = "24")]
    hours: u32,

    /// Clock hour (0-23) of the first snapshot
    #[arg(long, default_value = "0")]
    start_hour: u32,

    /// RNG seed. When omitted, the built-in default seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// District preset name (nyc_core, nyc_five_boroughs) or path to a JSON config
    #[arg(long, value_name = "PRESET|FILE")]
    districts: Option<String>,
}

/// Resolve `--districts`: a preset name first, otherwise a JSON file path.
fn load_districts(source: &str) -> Result<DistrictConfig, String> {
    if let Some(preset) = DistrictConfig::preset(source) {
        return Ok(preset);
    }
    let json = std::fs::read_to_string(source)
        .map_err(|e| format!("'{source}' is not a preset and could not be read: {e}"))?;
    DistrictConfig::from_json(&json).map_err(|e| format!("{source}: {e}"))
}

/// Headless app with the clock paused: hours only move when the driver says so.
fn build_app(options: &Cli) -> Result<App, String> {
    let mut clock = SimClock::at_hour(options.start_hour).map_err(|e| e.to_string())?;
    clock.paused = true;

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));
    app.add_plugins(simulation::SimulationPlugin);
    app.insert_resource(clock);
    if let Some(seed) = options.seed {
        app.insert_resource(SimRng::from_seed_u64(seed));
    }
    if let Some(source) = &options.districts {
        let config = load_districts(source)?;
        info!("Loaded {} districts on a {}x{} grid", config.len(), config.grid_size(), config.grid_size());
        app.insert_resource(config);
    }
    Ok(app)
}

/// Print one snapshot per simulated hour as JSON lines.
fn run_batch(app: &mut App, hours: u32) {
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    for step in 0..hours {
        if step > 0 {
            app.world_mut().resource_mut::<SimClock>().advance_hours(1);
        }
        simulation::run_fixed_step(app.world_mut());

        let current = app.world().resource::<CurrentSnapshot>();
        let Some(snapshot) = current.snapshot.clone() else {
            error!("No snapshot after step {step}; stopping");
            break;
        };
        let line = make_response(ResponsePayload::Snapshot {
            day: current.day,
            snapshot,
        });
        match serde_json::to_string(&line) {
            Ok(json) => {
                let _ = writeln!(stdout, "{json}");
            }
            Err(e) => error!("Failed to encode snapshot: {e}"),
        }
    }
    let _ = stdout.flush();
}

fn main() {
    let options = Cli::parse();

    let mut app = match build_app(&options) {
        Ok(app) => app,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    };

    if options.agent {
        agent_mode::run_agent_mode(&mut app);
    } else {
        run_batch(&mut app, options.hours);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("bikeshare").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_defaults() {
        let cli = parse(&[]).unwrap();
        assert!(!cli.agent);
        assert_eq!(cli.hours, 24);
        assert_eq!(cli.start_hour, 0);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.districts, None);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = parse(&[
            "--agent",
            "--hours",
            "6",
            "--start-hour",
            "7",
            "--seed",
            "99",
            "--districts",
            "five_boroughs",
        ])
        .unwrap();
        assert!(cli.agent);
        assert_eq!(cli.hours, 6);
        assert_eq!(cli.start_hour, 7);
        assert_eq!(cli.seed, Some(99));
        assert_eq!(cli.districts.as_deref(), Some("five_boroughs"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--hours"]).is_err());
        assert!(parse(&["--hours", "lots"]).is_err());
        assert!(parse(&["--seed", "-3"]).is_err());
        assert!(parse(&["--weather", "rain"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_load_districts_preset_and_missing_file() {
        assert_eq!(load_districts("five_boroughs").unwrap().len(), 5);
        let err = load_districts("/nonexistent/districts.json").unwrap_err();
        assert!(err.contains("not a preset"), "got: {err}");
    }

    #[test]
    fn test_build_app_rejects_bad_start_hour() {
        let cli = parse(&["--start-hour", "24"]).unwrap();
        assert!(build_app(&cli).is_err());
    }
}
