/// Side length of the station grid used by the built-in district presets.
pub const DEFAULT_GRID_SIZE: usize = 4;
/// Largest grid a `DistrictConfig` will accept.
pub const MAX_GRID_SIZE: usize = 64;

pub const HOURS_PER_DAY: u32 = 24;

/// Base noise floor applied to every cell before district overrides, `[min, max)`.
pub const BASE_DENSITY_MIN: f64 = 0.3;
pub const BASE_DENSITY_MAX: f64 = 0.8;

/// Subtracted from a uniform `[0, 1)` draw to skew the sign of cell flow.
pub const MORNING_FLOW_BIAS: f64 = 0.7;
pub const EVENING_FLOW_BIAS: f64 = 0.3;
pub const NORMAL_FLOW_BIAS: f64 = 0.5;

/// Bike count tiers, inclusive on both ends.
pub const BUSINESS_BIKES: (u32, u32) = (25, 34);
pub const NAMED_DISTRICT_BIKES: (u32, u32) = (15, 24);
pub const UNASSIGNED_BIKES: (u32, u32) = (10, 19);
/// Docks per station. Business-tier draws can exceed it, giving utilization above 1.
pub const STATION_CAPACITY: u32 = 30;

/// Multiplier turning a district-pair intensity into bikes per hour.
pub const BIKES_PER_INTENSITY: f64 = 5.0;

/// Strong commute direction (residential to business in the morning, reversed in the evening).
pub const COMMUTE_MULTIPLIER: f64 = 2.0;
/// Secondary commute directions that pass through mixed districts.
pub const PARTIAL_COMMUTE_MULTIPLIER: f64 = 1.5;

/// Name reported for stations that belong to no district.
pub const UNASSIGNED_DISTRICT_NAME: &str = "other";

/// Seed for `SimRng` when none is given.
pub const DEFAULT_SEED: u64 = 42;
