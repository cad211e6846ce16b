//! Committing units to an emergency
//!
//! A dispatch either fully commits (fleet decremented, emergency updated,
//! record appended) or changes nothing. All validation happens before the
//! reservation, and nothing after the reservation can fail.

use log::debug;

use super::active_set::ActiveEmergencySet;
use super::error::{SimError, SimResult};
use super::fleet::FleetRegistry;
use super::state::SimulationState;
use super::types::{DispatchReceipt, DispatchRecord, EmergencyId, SimTime, UnitType};

/// An operator's decision for one emergency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub emergency_id: EmergencyId,
    pub source_city: String,
    pub unit_type: UnitType,
    pub count: u32,
}

impl DispatchRequest {
    pub fn new(
        emergency_id: EmergencyId,
        source_city: impl Into<String>,
        unit_type: UnitType,
        count: u32,
    ) -> Self {
        Self {
            emergency_id,
            source_city: source_city.into(),
            unit_type,
            count,
        }
    }
}

/// Validate and commit a dispatch
///
/// # Arguments
/// * `request` - Emergency, source city, unit type and count to send
/// * `now` - Logical time stamped on the record
/// * `fleet` - Registry the units are reserved from
/// * `active` - Open emergencies; a resolved emergency is removed from it
/// * `state` - Run counters
/// * `records` - Audit log the new record is appended to
pub fn commit_dispatch(
    request: &DispatchRequest,
    now: SimTime,
    fleet: &mut FleetRegistry,
    active: &mut ActiveEmergencySet,
    state: &mut SimulationState,
    records: &mut Vec<DispatchRecord>,
) -> SimResult<DispatchReceipt> {
    if state.is_terminal() {
        return Err(SimError::SimulationFinished);
    }

    let emergency = active
        .get_mut(request.emergency_id)
        .filter(|emergency| emergency.is_open())
        .ok_or(SimError::EmergencyNotFound(request.emergency_id))?;

    if !fleet.contains(&request.source_city) {
        return Err(SimError::UnknownCity(request.source_city.clone()));
    }
    if !fleet.is_home_or_neighbor(&request.source_city, &emergency.city)? {
        return Err(SimError::InvalidSource {
            source_city: request.source_city.clone(),
            target_city: emergency.city.clone(),
        });
    }
    if request.unit_type != emergency.unit_type {
        return Err(SimError::UnitTypeMismatch {
            emergency_id: emergency.id,
            expected: emergency.unit_type,
            requested: request.unit_type,
        });
    }
    if request.count == 0 || request.count > emergency.required_units {
        return Err(SimError::InvalidCount {
            emergency_id: emergency.id,
            requested: request.count,
            required: emergency.required_units,
        });
    }

    fleet.reserve(&request.source_city, request.unit_type, request.count)?;

    let resolved = emergency.apply_units(request.count);
    let remaining_units = emergency.required_units;
    let target_city = emergency.city.clone();

    if resolved {
        active.remove(request.emergency_id)?;
        state.complete_dispatch();
    }
    state.record_units(request.unit_type, request.count);

    let record = DispatchRecord {
        emergency_id: request.emergency_id,
        source_city: request.source_city.clone(),
        target_city,
        unit_type: request.unit_type,
        count: request.count,
        timestamp: now,
    };
    records.push(record.clone());

    debug!(
        "Dispatched {} {} from {} to emergency {} ({} remaining)",
        request.count, request.unit_type, request.source_city, request.emergency_id, remaining_units
    );

    Ok(DispatchReceipt {
        record,
        remaining_units,
        resolved,
    })
}
