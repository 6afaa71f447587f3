use std::collections::BTreeMap;

use rand::Rng;
use serde::{Serialize, Serializer};

use crate::config::{
    BUSINESS_BIKES, NAMED_DISTRICT_BIKES, STATION_CAPACITY, UNASSIGNED_BIKES,
    UNASSIGNED_DISTRICT_NAME,
};
use crate::districts::{District, DistrictCategory, DistrictConfig};

/// Which district a station belongs to. Serialized as the district name, or
/// `"other"` for unassigned stations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StationDistrict {
    Assigned(String),
    Unassigned,
}

impl StationDistrict {
    pub fn name(&self) -> &str {
        match self {
            StationDistrict::Assigned(name) => name,
            StationDistrict::Unassigned => UNASSIGNED_DISTRICT_NAME,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, StationDistrict::Assigned(_))
    }
}

impl Serialize for StationDistrict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Bike stock tier; the range a station's initial bike count is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BikeTier {
    Business,
    NamedDistrict,
    Unassigned,
}

impl BikeTier {
    pub fn for_district(district: Option<&District>) -> Self {
        match district {
            Some(d) if d.category == DistrictCategory::Business => BikeTier::Business,
            Some(_) => BikeTier::NamedDistrict,
            None => BikeTier::Unassigned,
        }
    }

    /// Inclusive `(min, max)` bike count.
    pub fn bounds(self) -> (u32, u32) {
        match self {
            BikeTier::Business => BUSINESS_BIKES,
            BikeTier::NamedDistrict => NAMED_DISTRICT_BIKES,
            BikeTier::Unassigned => UNASSIGNED_BIKES,
        }
    }

    pub fn contains(self, bikes: u32) -> bool {
        let (min, max) = self.bounds();
        (min..=max).contains(&bikes)
    }

    pub fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> u32 {
        let (min, max) = self.bounds();
        rng.gen_range(min..=max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationInfo {
    pub district: StationDistrict,
    pub category: DistrictCategory,
    pub bikes_available: u32,
    pub capacity: u32,
    /// `bikes_available / capacity`.
    pub utilization: f64,
}

impl StationInfo {
    pub fn new(
        district: StationDistrict,
        category: DistrictCategory,
        bikes_available: u32,
    ) -> Self {
        Self {
            district,
            category,
            bikes_available,
            capacity: STATION_CAPACITY,
            utilization: f64::from(bikes_available) / f64::from(STATION_CAPACITY),
        }
    }

    pub fn tier(&self, config: &DistrictConfig) -> BikeTier {
        match &self.district {
            StationDistrict::Assigned(name) => BikeTier::for_district(config.get(name)),
            StationDistrict::Unassigned => BikeTier::Unassigned,
        }
    }
}

/// Resolve every cell's district and draw its bike stock. Keyed by linear
/// station index `row * size + col`.
pub fn build_station_info<R: Rng + ?Sized>(
    config: &DistrictConfig,
    rng: &mut R,
) -> BTreeMap<usize, StationInfo> {
    let size = config.grid_size();
    let mut stations = BTreeMap::new();
    for row in 0..size {
        for col in 0..size {
            let district = config.district_at(row, col);
            let info = StationInfo::new(
                district
                    .map(|d| StationDistrict::Assigned(d.name.clone()))
                    .unwrap_or(StationDistrict::Unassigned),
                district.map_or(DistrictCategory::Mixed, |d| d.category),
                BikeTier::for_district(district).draw(rng),
            );
            stations.insert(row * size + col, info);
        }
    }
    stations
}
