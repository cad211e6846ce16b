//! Standalone dispatch simulation module
//!
//! This module contains all the core dispatch-allocation logic: emergency
//! generation, admission control, ranking, fleet reservation and dispatch.
//! Front ends and transports call into it and render its results.

mod active_set;
mod config;
mod dispatch;
mod error;
mod fleet;
mod generator;
mod operator;
mod random;
mod ranking;
mod region;
mod shared;
mod state;
mod types;
mod world;

// Re-export public types for external use
pub use active_set::ActiveEmergencySet;
pub use config::{
    CityConfig, RegionConfig, SimConfig, DEFAULT_MAX_ACTIVE_CALLS, DEFAULT_MAX_ARRIVAL_GAP,
    DEFAULT_MAX_UNITS_PER_EMERGENCY, DEFAULT_SEED, DEFAULT_TARGET_DISPATCHES,
};
pub use dispatch::{commit_dispatch, DispatchRequest};
pub use error::{SimError, SimResult};
pub use fleet::{City, FleetRegistry, Location, UnitCounts};
pub use generator::{EmergencyGenerator, GeneratorState, Site};
pub use operator::{dispatch_round, plan_dispatch};
pub use random::{choice, FixedSequence, RandomSource, RandomStream};
pub use ranking::{rank, type_scores, CityTypeScore, RankingKey};
pub use region::default_region;
pub use shared::SharedSimulation;
pub use state::{RunStatus, SimulationState};
pub use types::{
    DispatchReceipt, DispatchRecord, Emergency, EmergencyId, EmergencyStatus, Progress, SimId,
    SimTime, UnitType,
};
pub use world::{Simulation, SimulationReport};
