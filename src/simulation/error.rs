//! Failure kinds surfaced by the simulation engine
//!
//! Every variant is recoverable by the caller except `InvalidConfiguration`,
//! which only occurs before a simulation starts.

use thiserror::Error;

use super::types::{EmergencyId, UnitType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("{city} has only {available} {unit_type} available, {requested} requested")]
    InsufficientUnits {
        city: String,
        unit_type: UnitType,
        requested: u32,
        available: u32,
    },

    #[error("{source_city} is neither {target_city} nor one of its neighbors")]
    InvalidSource {
        source_city: String,
        target_city: String,
    },

    #[error("emergency {0} is not active")]
    EmergencyNotFound(EmergencyId),

    #[error("active emergency cap of {capacity} reached")]
    CapacityExceeded { capacity: usize },

    #[error("emergency {0} is not in the active set")]
    NotFound(EmergencyId),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown city {0}")]
    UnknownCity(String),

    #[error("emergency {emergency_id} needs {expected} units, not {requested}")]
    UnitTypeMismatch {
        emergency_id: EmergencyId,
        expected: UnitType,
        requested: UnitType,
    },

    #[error("cannot dispatch {requested} units to emergency {emergency_id}, {required} required")]
    InvalidCount {
        emergency_id: EmergencyId,
        requested: u32,
        required: u32,
    },

    #[error("simulation has finished, no further dispatches accepted")]
    SimulationFinished,
}

pub type SimResult<T> = std::result::Result<T, SimError>;
