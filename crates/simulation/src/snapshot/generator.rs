use rand::Rng;

use crate::config::{BASE_DENSITY_MAX, BASE_DENSITY_MIN, HOURS_PER_DAY};
use crate::district_flows::compute_district_flows;
use crate::districts::DistrictConfig;
use crate::error::SimResult;
use crate::grid::SquareGrid;
use crate::stations::build_station_info;
use crate::time_of_day::{TimeFactors, TimeOfDayLabel, TimeWindow};

use super::types::GridSnapshot;

/// Produce one snapshot for `hour` (0..=23).
///
/// The only state touched is `rng`; pass a seeded `ChaCha8Rng` for
/// reproducible output or a thread-local RNG for independent concurrent calls.
/// Hour validation happens before any randomness is drawn.
pub fn generate_snapshot<R: Rng + ?Sized>(
    config: &DistrictConfig,
    hour: u32,
    rng: &mut R,
) -> SimResult<GridSnapshot> {
    let time_window = TimeWindow::classify(hour)?;
    let time_of_day = TimeOfDayLabel::classify(hour)?;
    let time_factors = TimeFactors::for_hour(hour)?;

    let density = generate_density(config, rng);

    let bias = time_window.flow_bias();
    let flow = density.map(|&d| d * (rng.gen::<f64>() - bias));

    let station_info = build_station_info(config, rng);
    let district_flows = compute_district_flows(config, time_window);

    Ok(GridSnapshot {
        hour,
        density,
        flow,
        time_factors,
        station_info,
        district_flows,
        time_window,
        time_of_day,
    })
}

/// Base noise everywhere, then each district's range over its own stations,
/// applied in declared order.
fn generate_density<R: Rng + ?Sized>(config: &DistrictConfig, rng: &mut R) -> SquareGrid<f64> {
    let mut density = SquareGrid::from_fn(config.grid_size(), |_, _| {
        rng.gen_range(BASE_DENSITY_MIN..BASE_DENSITY_MAX)
    });
    for district in config.districts() {
        let range = district.density_range;
        for &(row, col) in &district.stations {
            *density.get_mut(row, col) = rng.gen_range(range.min..=range.max);
        }
    }
    density
}

/// One snapshot per hour, 00:00 through 23:00.
pub fn generate_day<R: Rng + ?Sized>(
    config: &DistrictConfig,
    rng: &mut R,
) -> SimResult<Vec<GridSnapshot>> {
    (0..HOURS_PER_DAY)
        .map(|hour| generate_snapshot(config, hour, &mut *rng))
        .collect()
}
