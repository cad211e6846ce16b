//! Startup configuration
//!
//! Read once when a simulation is built; nothing here changes at runtime.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use super::error::{SimError, SimResult};
use super::types::UnitType;

pub const DEFAULT_SEED: u64 = 1;
pub const DEFAULT_TARGET_DISPATCHES: u32 = 10_000;
pub const DEFAULT_MAX_ACTIVE_CALLS: usize = 100;
pub const DEFAULT_MAX_UNITS_PER_EMERGENCY: u32 = 5;
pub const DEFAULT_MAX_ARRIVAL_GAP: u64 = 3;

/// Parameters controlling a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimConfig {
    pub seed: u64,
    /// Resolved emergencies after which the run is complete
    pub target_dispatches: u32,
    /// Admission cap on concurrently open emergencies
    pub max_active_calls: usize,
    /// Upper bound on `required_units` of a generated emergency
    #[serde(default = "default_max_units")]
    pub max_units_per_emergency: u32,
    /// Upper bound on the logical time between two arrivals
    #[serde(default = "default_max_arrival_gap")]
    pub max_arrival_gap: u64,
}

fn default_max_units() -> u32 {
    DEFAULT_MAX_UNITS_PER_EMERGENCY
}

fn default_max_arrival_gap() -> u64 {
    DEFAULT_MAX_ARRIVAL_GAP
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            target_dispatches: DEFAULT_TARGET_DISPATCHES,
            max_active_calls: DEFAULT_MAX_ACTIVE_CALLS,
            max_units_per_emergency: DEFAULT_MAX_UNITS_PER_EMERGENCY,
            max_arrival_gap: DEFAULT_MAX_ARRIVAL_GAP,
        }
    }
}

impl SimConfig {
    pub fn new(seed: u64, target_dispatches: u32, max_active_calls: usize) -> Self {
        Self {
            seed,
            target_dispatches,
            max_active_calls,
            ..Self::default()
        }
    }

    /// Reject non-positive values; the simulation refuses to start on error
    pub fn validate(&self) -> SimResult<()> {
        if self.seed == 0 {
            return Err(invalid("seed must be positive"));
        }
        if self.target_dispatches == 0 {
            return Err(invalid("targetDispatches must be positive"));
        }
        if self.max_active_calls == 0 {
            return Err(invalid("maxActiveCalls must be positive"));
        }
        if self.max_units_per_emergency == 0 {
            return Err(invalid("maxUnitsPerEmergency must be positive"));
        }
        if self.max_arrival_gap == 0 {
            return Err(invalid("maxArrivalGap must be positive"));
        }
        Ok(())
    }
}

/// One city and its initial fleet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityConfig {
    pub name: String,
    pub county: String,
    #[serde(default)]
    pub fleet: BTreeMap<UnitType, u32>,
}

impl CityConfig {
    pub fn new(name: &str, county: &str, police: u32, medics: u32, firefighters: u32) -> Self {
        let fleet = BTreeMap::from([
            (UnitType::Police, police),
            (UnitType::Medics, medics),
            (UnitType::Firefighters, firefighters),
        ]);
        Self {
            name: name.to_string(),
            county: county.to_string(),
            fleet,
        }
    }
}

/// Cities, their fleets and the neighbor relation between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub cities: Vec<CityConfig>,
    /// Pairs of neighboring city names
    #[serde(default)]
    pub adjacency: Vec<(String, String)>,
    /// When true every edge is also added in the reverse direction
    #[serde(default = "default_symmetric")]
    pub symmetric: bool,
}

fn default_symmetric() -> bool {
    true
}

impl RegionConfig {
    pub fn new(cities: Vec<CityConfig>, adjacency: &[(&str, &str)]) -> Self {
        Self {
            cities,
            adjacency: adjacency
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            symmetric: true,
        }
    }

    /// Load a region description from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read region file {}", path.display()))?;
        let region: RegionConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse region file {}", path.display()))?;
        region
            .validate()
            .with_context(|| format!("Region file {} is invalid", path.display()))?;
        Ok(region)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.cities.is_empty() {
            return Err(invalid("region has no cities"));
        }

        let mut names = HashSet::new();
        for city in &self.cities {
            if city.name.trim().is_empty() {
                return Err(invalid("city with an empty name"));
            }
            if !names.insert(city.name.as_str()) {
                return Err(invalid(&format!("duplicate city {}", city.name)));
            }
        }

        for (from, to) in &self.adjacency {
            for name in [from, to] {
                if !names.contains(name.as_str()) {
                    return Err(invalid(&format!("adjacency references unknown city {name}")));
                }
            }
            if from == to {
                return Err(invalid(&format!("city {from} cannot neighbor itself")));
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> SimError {
    SimError::InvalidConfiguration(message.to_string())
}
