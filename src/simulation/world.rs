//! Main simulation engine that ties everything together
//!
//! `Simulation` owns the fleet, the active set, the generator, the random
//! stream and the audit log. Callers drive it with `tick`/`request_next`
//! and act on it with `dispatch`. For concurrent callers wrap it in a
//! [`SharedSimulation`](super::shared::SharedSimulation).

use log::{debug, info};
use std::collections::BTreeMap;

use super::active_set::ActiveEmergencySet;
use super::config::{RegionConfig, SimConfig};
use super::dispatch::{commit_dispatch, DispatchRequest};
use super::error::SimResult;
use super::fleet::{FleetRegistry, Location};
use super::generator::{EmergencyGenerator, GeneratorState, Site};
use super::random::{RandomSource, RandomStream};
use super::ranking::{rank, type_scores, CityTypeScore, RankingKey};
use super::state::{RunStatus, SimulationState};
use super::types::{
    DispatchReceipt, DispatchRecord, Emergency, EmergencyId, Progress, SimTime, UnitType,
};

/// Final results of a run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub status: RunStatus,
    pub dispatches_completed: u32,
    pub target_dispatches: u32,
    /// Units sent per type, indexed by [`UnitType::index`]
    pub units_dispatched: [u64; 3],
    pub reservations: usize,
    pub rejected: usize,
    pub emergencies_generated: usize,
    pub active_remaining: usize,
    pub elapsed: SimTime,
}

impl SimulationReport {
    pub fn total_units(&self) -> u64 {
        self.units_dispatched.iter().sum()
    }

    /// Resolved emergencies as a share of generated ones
    pub fn success_rate(&self) -> f32 {
        if self.emergencies_generated == 0 {
            return 0.0;
        }
        self.dispatches_completed as f32 / self.emergencies_generated as f32 * 100.0
    }

    pub fn log_summary(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Status: {:?}", self.status);
        info!("Elapsed ticks: {}", self.elapsed.0);
        info!(
            "Dispatches completed: {}/{}",
            self.dispatches_completed, self.target_dispatches
        );
        info!("Units dispatched: {}", self.total_units());
        for unit_type in UnitType::ALL {
            info!(
                "  {}: {}",
                unit_type,
                self.units_dispatched[unit_type.index()]
            );
        }
        info!("Emergencies generated: {}", self.emergencies_generated);
        info!("Active emergencies: {}", self.active_remaining);
        info!("Rejected dispatches: {}", self.rejected);
        info!("Success rate: {:.1}%", self.success_rate());
    }
}

/// The dispatch simulation engine
pub struct Simulation {
    config: SimConfig,

    /// Region the engine was built from, kept for `reset`
    region: RegionConfig,

    fleet: FleetRegistry,

    active: ActiveEmergencySet,

    generator: EmergencyGenerator,

    rng: Box<dyn RandomSource>,

    state: SimulationState,

    /// Append-only, in commit order
    records: Vec<DispatchRecord>,

    clock: SimTime,
}

impl Simulation {
    /// Build a simulation seeded from `config.seed`
    pub fn new(config: SimConfig, region: RegionConfig) -> SimResult<Self> {
        let rng = Box::new(RandomStream::seeded(config.seed));
        Self::with_random_source(config, region, rng)
    }

    /// Build a simulation drawing from an explicit random source
    pub fn with_random_source(
        config: SimConfig,
        region: RegionConfig,
        rng: Box<dyn RandomSource>,
    ) -> SimResult<Self> {
        config.validate()?;
        let fleet = FleetRegistry::from_region(&region)?;

        let sites = fleet
            .cities()
            .iter()
            .map(|city| Site {
                city: city.name.clone(),
                county: city.county.clone(),
            })
            .collect();

        info!(
            "Simulation ready: seed={}, targetDispatches={}, maxActiveCalls={}, cities={}",
            config.seed,
            config.target_dispatches,
            config.max_active_calls,
            fleet.city_count()
        );

        Ok(Self {
            generator: EmergencyGenerator::new(&config, sites),
            active: ActiveEmergencySet::new(config.max_active_calls),
            state: SimulationState::new(&config),
            records: Vec::new(),
            clock: SimTime::default(),
            fleet,
            rng,
            config,
            region,
        })
    }

    /// Replace this run with a fresh one built from a new configuration
    pub fn reset(&mut self, config: SimConfig, region: RegionConfig) -> SimResult<()> {
        *self = Self::new(config, region)?;
        Ok(())
    }

    /// Start over with the same configuration and seed
    pub fn restart(&mut self) -> SimResult<()> {
        self.reset(self.config.clone(), self.region.clone())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn fleet(&self) -> &FleetRegistry {
        &self.fleet
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn records(&self) -> &[DispatchRecord] {
        &self.records
    }

    pub fn now(&self) -> SimTime {
        self.clock
    }

    pub fn generator_state(&self) -> GeneratorState {
        self.generator.state()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active_set_full(&self) -> bool {
        self.active.is_full()
    }

    /// Advance the clock one unit and admit every emergency now due
    pub fn tick(&mut self) -> Vec<EmergencyId> {
        if self.state.is_terminal() {
            self.generator.exhaust();
            return Vec::new();
        }
        self.clock = SimTime(self.clock.0 + 1);
        self.admit_due(None)
    }

    /// Jump the clock to the next scheduled arrival and admit it
    ///
    /// Returns `None` when the run is over or the active set is full.
    pub fn request_next(&mut self) -> Option<EmergencyId> {
        if self.state.is_terminal() {
            self.generator.exhaust();
            return None;
        }
        let arrival = self.generator.next_arrival(self.rng.as_mut())?;
        if arrival > self.clock {
            self.clock = arrival;
        }
        self.admit_due(Some(1)).into_iter().next()
    }

    fn admit_due(&mut self, max_admit: Option<usize>) -> Vec<EmergencyId> {
        self.generator.step(
            self.clock,
            self.rng.as_mut(),
            &mut self.active,
            self.state.dispatches_completed,
            self.state.total_target,
            max_admit,
        )
    }

    pub fn emergency(&self, id: EmergencyId) -> Option<&Emergency> {
        self.active.get(id)
    }

    /// Active emergencies ordered by `key`
    pub fn list_active(&self, key: RankingKey) -> Vec<Emergency> {
        rank(&self.active.all(), key)
    }

    /// Ranked active emergencies, at most `limit` of them
    pub fn queue(&self, key: RankingKey, limit: usize) -> Vec<Emergency> {
        let mut ranked = self.list_active(key);
        ranked.truncate(limit);
        ranked
    }

    /// Per-city type counts of the active set, busiest city first
    pub fn type_scores(&self) -> Vec<CityTypeScore> {
        type_scores(&self.active.all())
    }

    /// Units available in `city` and each of its neighbors
    pub fn availability(&self, city: &str) -> SimResult<BTreeMap<String, BTreeMap<UnitType, u32>>> {
        self.fleet.availability_around(city)
    }

    /// Units of one type available in every city
    pub fn search(&self, unit_type: UnitType) -> BTreeMap<String, u32> {
        self.fleet.search(unit_type)
    }

    pub fn locations(&self) -> Vec<Location> {
        self.fleet.locations()
    }

    /// Commit units to an emergency, or change nothing
    pub fn dispatch(&mut self, request: &DispatchRequest) -> SimResult<DispatchReceipt> {
        let result = commit_dispatch(
            request,
            self.clock,
            &mut self.fleet,
            &mut self.active,
            &mut self.state,
            &mut self.records,
        );

        match &result {
            Ok(receipt) => {
                if receipt.resolved && self.state.target_reached() {
                    info!(
                        "Target of {} dispatches reached at tick {}",
                        self.state.total_target, self.clock.0
                    );
                    self.generator.exhaust();
                }
            }
            Err(error) => {
                self.state.record_rejection();
                debug!("Dispatch for emergency {} rejected: {}", request.emergency_id, error);
            }
        }
        result
    }

    pub fn progress(&self) -> Progress {
        Progress {
            dispatches_completed: self.state.dispatches_completed,
            target_dispatches: self.state.total_target,
            active_count: self.active.len(),
        }
    }

    /// Stop the run and return its results
    pub fn stop(&mut self) -> SimulationReport {
        if !self.state.is_terminal() {
            info!("Simulation stopped at tick {}", self.clock.0);
        }
        self.state.stop();
        self.generator.exhaust();
        self.report()
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            status: self.state.status(),
            dispatches_completed: self.state.dispatches_completed,
            target_dispatches: self.state.total_target,
            units_dispatched: self.state.units_dispatched,
            reservations: self.state.reservations,
            rejected: self.state.rejected,
            emergencies_generated: self.generator.generated(),
            active_remaining: self.active.len(),
            elapsed: self.clock,
        }
    }
}
