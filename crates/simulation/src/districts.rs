use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_GRID_SIZE, MAX_GRID_SIZE};
use crate::error::{SimResult, SimulationError};

/// A grid position `(row, col)`.
pub type StationCoord = (usize, usize);

/// Economic character of a district; drives time-of-day flow bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistrictCategory {
    Business,
    Residential,
    Mixed,
}

impl DistrictCategory {
    pub fn name(self) -> &'static str {
        match self {
            DistrictCategory::Business => "business",
            DistrictCategory::Residential => "residential",
            DistrictCategory::Mixed => "mixed",
        }
    }
}

/// Inclusive occupancy bounds for stations in a district. Serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct DensityRange {
    pub min: f64,
    pub max: f64,
}

impl DensityRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && 0.0 <= self.min
            && self.min <= self.max
            && self.max <= 1.0
    }
}

impl From<(f64, f64)> for DensityRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<DensityRange> for (f64, f64) {
    fn from(range: DensityRange) -> Self {
        (range.min, range.max)
    }
}

/// A named zone of stations sharing a density range and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub name: String,
    pub density_range: DensityRange,
    pub category: DistrictCategory,
    pub stations: Vec<StationCoord>,
}

impl District {
    pub fn new(
        name: impl Into<String>,
        density_range: DensityRange,
        category: DistrictCategory,
        stations: Vec<StationCoord>,
    ) -> Self {
        Self {
            name: name.into(),
            density_range,
            category,
            stations,
        }
    }
}

/// On-disk / over-the-wire form of a district configuration.
#[derive(Debug, Deserialize)]
struct DistrictConfigFile {
    #[serde(default = "default_grid_size")]
    grid_size: usize,
    districts: Vec<District>,
}

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

/// Validated set of districts laid out on a square station grid.
///
/// Districts keep their declared order, which fixes the order densities are
/// applied in and the order of district flow pairs. Every coordinate is in
/// bounds and claimed by at most one district; construction fails otherwise.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DistrictConfig {
    grid_size: usize,
    districts: Vec<District>,
    /// One entry per grid cell (row-major). None = unassigned.
    cell_map: Vec<Option<usize>>,
}

impl Default for DistrictConfig {
    fn default() -> Self {
        Self::nyc_core()
    }
}

impl DistrictConfig {
    /// Validate `districts` against a `grid_size x grid_size` grid.
    pub fn new(grid_size: usize, districts: Vec<District>) -> SimResult<Self> {
        if grid_size == 0 || grid_size > MAX_GRID_SIZE {
            return Err(SimulationError::InvalidInput(format!(
                "grid size must be in 1..={MAX_GRID_SIZE}, got {grid_size}"
            )));
        }

        let mut names: HashMap<&str, usize> = HashMap::new();
        let mut cell_map: Vec<Option<usize>> = vec![None; grid_size * grid_size];

        for (di, district) in districts.iter().enumerate() {
            if district.name.trim().is_empty() {
                return Err(SimulationError::Configuration(format!(
                    "district #{di} has an empty name"
                )));
            }
            if names.insert(district.name.as_str(), di).is_some() {
                return Err(SimulationError::Configuration(format!(
                    "district '{}' is declared more than once",
                    district.name
                )));
            }
            if !district.density_range.is_valid() {
                return Err(SimulationError::Configuration(format!(
                    "district '{}' has density range [{}, {}]; expected 0 <= min <= max <= 1",
                    district.name, district.density_range.min, district.density_range.max
                )));
            }
            for &(row, col) in &district.stations {
                if row >= grid_size || col >= grid_size {
                    return Err(SimulationError::Configuration(format!(
                        "district '{}' station ({row}, {col}) is outside the {grid_size}x{grid_size} grid",
                        district.name
                    )));
                }
                let slot = &mut cell_map[row * grid_size + col];
                if let Some(owner) = *slot {
                    return Err(SimulationError::Configuration(format!(
                        "station ({row}, {col}) is claimed by both '{}' and '{}'",
                        districts[owner].name, district.name
                    )));
                }
                *slot = Some(di);
            }
        }

        Ok(Self {
            grid_size,
            districts,
            cell_map,
        })
    }

    /// Parse and validate a JSON district configuration.
    ///
    /// ```json
    /// { "grid_size": 4,
    ///   "districts": [{ "name": "manhattan", "density_range": [0.7, 0.9],
    ///                   "category": "business", "stations": [[0, 0], [0, 1]] }] }
    /// ```
    pub fn from_json(json: &str) -> SimResult<Self> {
        let file: DistrictConfigFile = serde_json::from_str(json)?;
        Self::new(file.grid_size, file.districts)
    }

    /// Manhattan, Brooklyn and Queens on a 4x4 grid. Six cells stay unassigned.
    pub fn nyc_core() -> Self {
        Self::from_preset(nyc_core_districts())
    }

    /// All five boroughs on a 4x4 grid; every cell belongs to a district.
    pub fn nyc_five_boroughs() -> Self {
        let mut districts = nyc_core_districts();
        districts.push(District::new(
            "bronx",
            DensityRange::new(0.3, 0.5),
            DistrictCategory::Residential,
            vec![(2, 2), (2, 3)],
        ));
        districts.push(District::new(
            "staten_island",
            DensityRange::new(0.2, 0.4),
            DistrictCategory::Residential,
            vec![(1, 3), (3, 1), (3, 2), (3, 3)],
        ));
        Self::from_preset(districts)
    }

    /// Look up a preset by name (`nyc_core`, `nyc_five_boroughs`).
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "nyc_core" | "core" => Some(Self::nyc_core()),
            "nyc_five_boroughs" | "five_boroughs" => Some(Self::nyc_five_boroughs()),
            _ => None,
        }
    }

    // Presets are fixed data covered by `test_presets_pass_validation`, so the
    // cell map is filled directly instead of going through `new`.
    fn from_preset(districts: Vec<District>) -> Self {
        let grid_size = DEFAULT_GRID_SIZE;
        let mut cell_map = vec![None; grid_size * grid_size];
        for (di, district) in districts.iter().enumerate() {
            for &(row, col) in &district.stations {
                cell_map[row * grid_size + col] = Some(di);
            }
        }
        Self {
            grid_size,
            districts,
            cell_map,
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn station_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&District> {
        self.districts.iter().find(|d| d.name == name)
    }

    /// The district owning `(row, col)`, if any.
    pub fn district_at(&self, row: usize, col: usize) -> Option<&District> {
        self.district_index_at(row, col).map(|i| &self.districts[i])
    }

    pub fn district_index_at(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.grid_size || col >= self.grid_size {
            return None;
        }
        self.cell_map[row * self.grid_size + col]
    }
}

fn nyc_core_districts() -> Vec<District> {
    vec![
        District::new(
            "manhattan",
            DensityRange::new(0.7, 0.9),
            DistrictCategory::Business,
            vec![(0, 0), (0, 1), (1, 0), (1, 1)],
        ),
        District::new(
            "brooklyn",
            DensityRange::new(0.5, 0.7),
            DistrictCategory::Mixed,
            vec![(2, 0), (2, 1), (3, 0)],
        ),
        District::new(
            "queens",
            DensityRange::new(0.4, 0.6),
            DistrictCategory::Residential,
            vec![(0, 2), (0, 3), (1, 2)],
        ),
    ]
}
