use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{EVENING_FLOW_BIAS, HOURS_PER_DAY, MORNING_FLOW_BIAS, NORMAL_FLOW_BIAS};
use crate::error::{validate_hour, SimResult};

// ============================================================================
// Coarse bias window
// ============================================================================

/// Coarse partition of the day that skews cell flow and district flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// 07:00 through 09:59.
    Morning,
    /// 17:00 through 19:59.
    Evening,
    Normal,
}

impl TimeWindow {
    pub fn classify(hour: u32) -> SimResult<Self> {
        let hour = validate_hour(hour)?;
        Ok(match hour {
            7..=9 => TimeWindow::Morning,
            17..=19 => TimeWindow::Evening,
            _ => TimeWindow::Normal,
        })
    }

    /// Subtracted from a uniform `[0, 1)` draw when computing cell flow.
    pub fn flow_bias(self) -> f64 {
        match self {
            TimeWindow::Morning => MORNING_FLOW_BIAS,
            TimeWindow::Evening => EVENING_FLOW_BIAS,
            TimeWindow::Normal => NORMAL_FLOW_BIAS,
        }
    }
}

// ============================================================================
// Display label
// ============================================================================

/// Finer time-of-day label shown to consumers.
///
/// Boundaries differ from [`TimeWindow`]: hour 16 is `Midday` here but
/// `Normal` for flow bias. Snapshots carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDayLabel {
    Morning,
    Midday,
    Evening,
    Night,
    Normal,
}

impl TimeOfDayLabel {
    /// First match wins: morning 7-9, midday 9-16, evening 17-19, night 20-6.
    pub fn classify(hour: u32) -> SimResult<Self> {
        let hour = validate_hour(hour)?;
        Ok(if (7..=9).contains(&hour) {
            TimeOfDayLabel::Morning
        } else if (9..=16).contains(&hour) {
            TimeOfDayLabel::Midday
        } else if (17..=19).contains(&hour) {
            TimeOfDayLabel::Evening
        } else if hour >= 20 || hour <= 6 {
            TimeOfDayLabel::Night
        } else {
            TimeOfDayLabel::Normal
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDayLabel::Morning => "morning",
            TimeOfDayLabel::Midday => "midday",
            TimeOfDayLabel::Evening => "evening",
            TimeOfDayLabel::Night => "night",
            TimeOfDayLabel::Normal => "normal",
        }
    }
}

// ============================================================================
// Activity weighting
// ============================================================================

/// Activity weighting per district category for a given hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeFactors {
    pub business: f64,
    pub residential: f64,
    pub mixed: f64,
}

impl TimeFactors {
    pub fn for_hour(hour: u32) -> SimResult<Self> {
        let hour = validate_hour(hour)?;
        Ok(Self {
            business: if (9..=17).contains(&hour) { 0.8 } else { 0.3 },
            residential: if hour >= 18 || hour <= 7 { 0.7 } else { 0.4 },
            mixed: 0.5,
        })
    }
}

// ============================================================================
// Simulation clock
// ============================================================================

/// Wall clock of the running simulation. Snapshot generation keys off `hour`.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub paused: bool,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            day: 1,
            hour: 6, // start just before the morning rush
            minute: 0,
            paused: false,
        }
    }
}

impl SimClock {
    /// Simulated minutes per FixedUpdate tick.
    pub const MINUTES_PER_TICK: u32 = 1;

    pub fn at_hour(hour: u32) -> SimResult<Self> {
        Ok(Self {
            hour: validate_hour(hour)?,
            ..Default::default()
        })
    }

    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        self.minute += Self::MINUTES_PER_TICK;
        while self.minute >= 60 {
            self.minute -= 60;
            self.advance_hours(1);
        }
    }

    /// Jump forward whole hours, rolling over into following days. Ignores `paused`.
    /// The day counter saturates at `u32::MAX`.
    pub fn advance_hours(&mut self, hours: u32) {
        let total = self.hour + hours % HOURS_PER_DAY;
        self.day = self
            .day
            .saturating_add(hours / HOURS_PER_DAY + total / HOURS_PER_DAY);
        self.hour = total % HOURS_PER_DAY;
    }

    pub fn time_window(&self) -> TimeWindow {
        // hour is kept in 0..=23 by construction
        TimeWindow::classify(self.hour).unwrap_or(TimeWindow::Normal)
    }

    pub fn formatted(&self) -> String {
        format!("Day {} {:02}:{:02}", self.day, self.hour, self.minute)
    }
}

pub fn tick_sim_clock(mut clock: ResMut<SimClock>) {
    clock.tick();
}

pub struct TimeOfDayPlugin;

impl Plugin for TimeOfDayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>().add_systems(
            FixedUpdate,
            tick_sim_clock.in_set(crate::SimulationSet::PreSim),
        );
    }
}
