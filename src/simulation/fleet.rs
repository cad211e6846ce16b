//! Per-city fleet inventory and the city adjacency graph
//!
//! Neighbor lookups go through a petgraph directed graph; symmetric
//! adjacency is stored as two opposite edges.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::config::RegionConfig;
use super::error::{SimError, SimResult};
use super::types::UnitType;

/// Unit counts indexed by [`UnitType::index`]
pub type UnitCounts = [u32; 3];

/// A city and the units stationed there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub name: String,
    pub county: String,
    /// Units currently available
    fleet: UnitCounts,
    /// Units the city started with
    initial_fleet: UnitCounts,
}

impl City {
    pub fn new(name: impl Into<String>, county: impl Into<String>, fleet: UnitCounts) -> Self {
        Self {
            name: name.into(),
            county: county.into(),
            fleet,
            initial_fleet: fleet,
        }
    }

    pub fn available(&self, unit_type: UnitType) -> u32 {
        self.fleet[unit_type.index()]
    }

    pub fn initial(&self, unit_type: UnitType) -> u32 {
        self.initial_fleet[unit_type.index()]
    }
}

/// Summary row for listing locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub county: String,
    pub neighbors: Vec<String>,
}

/// Registry of every city, its fleet and its neighbors
#[derive(Debug, Default)]
pub struct FleetRegistry {
    /// Directed adjacency graph; node weights are city names
    graph: DiGraph<String, ()>,

    /// Maps city names to their node indices in the graph
    city_to_node: HashMap<String, NodeIndex>,

    /// Storage for city data, in configuration order
    cities: Vec<City>,

    /// Maps city names to their position in `cities`
    city_index: HashMap<String, usize>,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a validated region description
    pub fn from_region(region: &RegionConfig) -> SimResult<Self> {
        region.validate()?;

        let mut registry = Self::new();
        for city in &region.cities {
            let mut fleet = [0; 3];
            for (unit_type, count) in &city.fleet {
                fleet[unit_type.index()] = *count;
            }
            registry.add_city(City::new(city.name.clone(), city.county.clone(), fleet))?;
        }
        for (from, to) in &region.adjacency {
            registry.add_adjacency(from, to, region.symmetric)?;
        }
        Ok(registry)
    }

    /// Adds a city to the registry and the adjacency graph
    pub fn add_city(&mut self, city: City) -> SimResult<()> {
        if self.city_to_node.contains_key(&city.name) {
            return Err(SimError::InvalidConfiguration(format!(
                "duplicate city {}",
                city.name
            )));
        }

        let node_index = self.graph.add_node(city.name.clone());
        self.city_to_node.insert(city.name.clone(), node_index);
        self.city_index.insert(city.name.clone(), self.cities.len());
        self.cities.push(city);
        Ok(())
    }

    /// Declares `to` a neighbor of `from`, and the reverse when `symmetric`
    pub fn add_adjacency(&mut self, from: &str, to: &str, symmetric: bool) -> SimResult<()> {
        let from_node = self.node(from)?;
        let to_node = self.node(to)?;

        self.graph.update_edge(from_node, to_node, ());
        if symmetric {
            self.graph.update_edge(to_node, from_node, ());
        }
        Ok(())
    }

    fn node(&self, city: &str) -> SimResult<NodeIndex> {
        self.city_to_node
            .get(city)
            .copied()
            .ok_or_else(|| SimError::UnknownCity(city.to_string()))
    }

    /// Gets a city by name
    pub fn city(&self, name: &str) -> SimResult<&City> {
        self.city_index
            .get(name)
            .map(|index| &self.cities[*index])
            .ok_or_else(|| SimError::UnknownCity(name.to_string()))
    }

    fn city_mut(&mut self, name: &str) -> SimResult<&mut City> {
        match self.city_index.get(name) {
            Some(index) => Ok(&mut self.cities[*index]),
            None => Err(SimError::UnknownCity(name.to_string())),
        }
    }

    /// All cities in configuration order
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn contains(&self, city: &str) -> bool {
        self.city_index.contains_key(city)
    }

    /// Current count of `unit_type` in `city`
    pub fn available(&self, city: &str, unit_type: UnitType) -> SimResult<u32> {
        Ok(self.city(city)?.available(unit_type))
    }

    /// Decrement the fleet if enough units are available
    ///
    /// On failure the fleet is left untouched.
    pub fn reserve(&mut self, city: &str, unit_type: UnitType, count: u32) -> SimResult<()> {
        let entry = self.city_mut(city)?;
        let available = entry.available(unit_type);
        if count > available {
            return Err(SimError::InsufficientUnits {
                city: city.to_string(),
                unit_type,
                requested: count,
                available,
            });
        }
        entry.fleet[unit_type.index()] = available - count;
        Ok(())
    }

    /// Configured neighbors of `city`, sorted by name
    pub fn neighbors(&self, city: &str) -> SimResult<Vec<String>> {
        let node = self.node(city)?;
        let names: BTreeSet<&String> = self
            .graph
            .neighbors(node)
            .map(|neighbor| &self.graph[neighbor])
            .collect();
        Ok(names.into_iter().cloned().collect())
    }

    /// True when `source` is `target` itself or one of its neighbors
    pub fn is_home_or_neighbor(&self, source: &str, target: &str) -> SimResult<bool> {
        if source == target {
            return Ok(self.contains(source));
        }
        let target_node = self.node(target)?;
        let Some(source_node) = self.city_to_node.get(source) else {
            return Ok(false);
        };
        Ok(self.graph.contains_edge(target_node, *source_node))
    }

    /// Availability of every unit type in `city` and each of its neighbors
    pub fn availability_around(
        &self,
        city: &str,
    ) -> SimResult<BTreeMap<String, BTreeMap<UnitType, u32>>> {
        let mut result = BTreeMap::new();
        let names = std::iter::once(city.to_string()).chain(self.neighbors(city)?);
        for name in names {
            let entry = self.city(&name)?;
            let counts: BTreeMap<UnitType, u32> = UnitType::ALL
                .iter()
                .map(|unit_type| (*unit_type, entry.available(*unit_type)))
                .collect();
            result.insert(name, counts);
        }
        Ok(result)
    }

    /// Availability of one unit type across every city
    pub fn search(&self, unit_type: UnitType) -> BTreeMap<String, u32> {
        self.cities
            .iter()
            .map(|city| (city.name.clone(), city.available(unit_type)))
            .collect()
    }

    /// Every city with its county and neighbors
    pub fn locations(&self) -> Vec<Location> {
        self.cities
            .iter()
            .map(|city| Location {
                city: city.name.clone(),
                county: city.county.clone(),
                neighbors: self.neighbors(&city.name).unwrap_or_default(),
            })
            .collect()
    }

    /// Total units of `unit_type` currently available across the region
    pub fn total_available(&self, unit_type: UnitType) -> u32 {
        self.cities.iter().map(|city| city.available(unit_type)).sum()
    }
}
