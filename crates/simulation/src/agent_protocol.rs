//! Agent text protocol types for the `--agent` headless mode.
//!
//! Defines the JSON command/response envelope that external programs (scripts,
//! dashboards, test harnesses) use to drive the simulation over
//! newline-delimited JSON on stdin/stdout.
//!
//! These types live in the `simulation` crate so they can be unit-tested
//! without pulling in the binary. The I/O loop lives in
//! `crates/app/src/agent_mode.rs`.

use serde::{Deserialize, Serialize};

use crate::snapshot::{DistrictSummary, GridSnapshot};

// ---------------------------------------------------------------------------
// Commands (stdin → simulation)
// ---------------------------------------------------------------------------

/// A single command read from one line of stdin. `cmd` is the discriminator.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd")]
pub enum AgentCommand {
    /// Return the snapshot for the clock's current hour.
    #[serde(rename = "observe")]
    Observe,

    /// Generate a one-off snapshot for `hour` without moving the clock.
    #[serde(rename = "generate")]
    Generate { hour: u32 },

    /// Move the clock forward and return the regenerated snapshot.
    #[serde(rename = "advance")]
    Advance { hours: u32 },

    /// Report the clock.
    #[serde(rename = "status")]
    Status,

    /// Per-district summary of the current snapshot.
    #[serde(rename = "summary")]
    Summary,

    /// Generate snapshots for hours 0 through 23.
    #[serde(rename = "simulate_day")]
    SimulateDay,

    /// Restart the RNG stream from `seed`.
    #[serde(rename = "reseed")]
    Reseed { seed: u64 },

    /// Replace the district configuration (same JSON shape as a config file).
    #[serde(rename = "load_districts")]
    LoadDistricts { config: serde_json::Value },

    /// Gracefully shut down the agent session.
    #[serde(rename = "quit")]
    Quit,
}

// ---------------------------------------------------------------------------
// Responses (simulation → stdout)
// ---------------------------------------------------------------------------

/// Every response includes the protocol version and a tagged payload.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    #[serde(rename = "ready")]
    Ready,

    #[serde(rename = "snapshot")]
    Snapshot { day: u32, snapshot: GridSnapshot },

    #[serde(rename = "day")]
    Day { snapshots: Vec<GridSnapshot> },

    #[serde(rename = "clock")]
    Clock {
        day: u32,
        hour: u32,
        minute: u32,
        formatted: String,
    },

    #[serde(rename = "summary")]
    Summary {
        day: u32,
        hour: u32,
        districts: Vec<DistrictSummary>,
    },

    #[serde(rename = "ok")]
    Ok,

    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "goodbye")]
    Goodbye,
}

/// Current protocol version. Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

pub fn make_response(payload: ResponsePayload) -> AgentResponse {
    AgentResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_generate_command() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"cmd":"generate","hour":8}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Generate { hour: 8 }));
    }

    #[test]
    fn deserialize_advance_command() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"cmd":"advance","hours":3}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Advance { hours: 3 }));
    }

    #[test]
    fn deserialize_unit_commands() {
        for (json, check) in [
            (r#"{"cmd":"observe"}"#, "observe"),
            (r#"{"cmd":"status"}"#, "status"),
            (r#"{"cmd":"summary"}"#, "summary"),
            (r#"{"cmd":"simulate_day"}"#, "simulate_day"),
            (r#"{"cmd":"quit"}"#, "quit"),
        ] {
            let cmd: AgentCommand = serde_json::from_str(json).unwrap();
            let matched = match cmd {
                AgentCommand::Observe => "observe",
                AgentCommand::Status => "status",
                AgentCommand::Summary => "summary",
                AgentCommand::SimulateDay => "simulate_day",
                AgentCommand::Quit => "quit",
                other => panic!("unexpected {other:?}"),
            };
            assert_eq!(matched, check);
        }
    }

    #[test]
    fn deserialize_load_districts_command() {
        let json = r#"{"cmd":"load_districts","config":{"grid_size":2,"districts":[]}}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        if let AgentCommand::LoadDistricts { config } = cmd {
            assert_eq!(config["grid_size"], 2);
        } else {
            panic!("expected LoadDistricts");
        }
    }

    #[test]
    fn deserialize_negative_hour_fails() {
        let result: Result<AgentCommand, _> = serde_json::from_str(r#"{"cmd":"generate","hour":-1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_unknown_command_fails() {
        let result: Result<AgentCommand, _> = serde_json::from_str(r#"{"cmd":"set_weather"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serialize_ready_response() {
        let json = serde_json::to_value(make_response(ResponsePayload::Ready)).unwrap();
        assert_eq!(json["protocol_version"], 1);
        assert_eq!(json["type"], "ready");
    }

    #[test]
    fn serialize_error_response() {
        let resp = make_response(ResponsePayload::Error {
            message: "Invalid input: hour must be in 0..=23, got 24".to_string(),
        });
        let json = serde_json::to_value(resp).unwrap();
        assert_eq!(json["type"], "error");
        assert!(json["message"].as_str().unwrap().contains("0..=23"));
    }

    #[test]
    fn serialize_clock_response() {
        let resp = make_response(ResponsePayload::Clock {
            day: 2,
            hour: 17,
            minute: 5,
            formatted: "Day 2 17:05".to_string(),
        });
        let json = serde_json::to_value(resp).unwrap();
        assert_eq!(json["type"], "clock");
        assert_eq!(json["hour"], 17);
        assert_eq!(json["formatted"], "Day 2 17:05");
    }
}
