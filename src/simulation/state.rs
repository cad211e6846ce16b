//! Run progress tracking for the dispatch simulation
//!
//! Counts resolved emergencies against the configured target and decides
//! when the run is over.

use super::config::SimConfig;
use super::types::UnitType;

/// Lifecycle of a run as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Target reached
    Completed,
    /// Stopped by the caller before the target was reached
    Stopped,
}

/// Owned, per-run counters
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub seed: u64,

    /// Emergencies resolved so far
    pub dispatches_completed: u32,

    pub total_target: u32,

    /// Units sent per type, indexed by [`UnitType::index`]
    pub units_dispatched: [u64; 3],

    /// Reservations committed, partial ones included
    pub reservations: usize,

    /// Dispatch attempts rejected with an error
    pub rejected: usize,

    stopped: bool,
}

impl SimulationState {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            seed: config.seed,
            dispatches_completed: 0,
            total_target: config.target_dispatches,
            units_dispatched: [0; 3],
            reservations: 0,
            rejected: 0,
            stopped: false,
        }
    }

    /// Record a committed reservation of `count` units
    pub fn record_units(&mut self, unit_type: UnitType, count: u32) {
        self.units_dispatched[unit_type.index()] += u64::from(count);
        self.reservations += 1;
    }

    /// Record a resolved emergency. Never exceeds the target.
    pub fn complete_dispatch(&mut self) {
        if self.dispatches_completed < self.total_target {
            self.dispatches_completed += 1;
        }
    }

    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn target_reached(&self) -> bool {
        self.dispatches_completed >= self.total_target
    }

    /// No more generation or dispatching happens once terminal
    pub fn is_terminal(&self) -> bool {
        self.stopped || self.target_reached()
    }

    pub fn status(&self) -> RunStatus {
        if self.target_reached() {
            RunStatus::Completed
        } else if self.stopped {
            RunStatus::Stopped
        } else {
            RunStatus::Running
        }
    }

    pub fn total_units_dispatched(&self) -> u64 {
        self.units_dispatched.iter().sum()
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Dispatches: {}/{} | Units sent: {} | Rejected: {}",
            self.dispatches_completed,
            self.total_target,
            self.total_units_dispatched(),
            self.rejected
        )
    }
}
