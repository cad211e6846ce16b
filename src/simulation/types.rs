//! Core types for the dispatch simulation
//!
//! Plain data shared by every component. Nothing here owns behavior beyond
//! small accessors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimId(pub usize);

/// A wrapper type for emergency IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmergencyId(pub SimId);

impl fmt::Display for EmergencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 .0)
    }
}

/// Logical simulation time, advanced one unit per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTime(pub u64);

/// Kind of response unit, and the kind of emergency that needs it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Police,
    Medics,
    Firefighters,
}

impl UnitType {
    /// Every unit type, in the order random draws index into
    pub const ALL: [UnitType; 3] = [UnitType::Police, UnitType::Medics, UnitType::Firefighters];

    /// Position of this type inside [`UnitType::ALL`]
    pub fn index(self) -> usize {
        match self {
            UnitType::Police => 0,
            UnitType::Medics => 1,
            UnitType::Firefighters => 2,
        }
    }

    /// Human readable name of a single unit of this type
    pub fn unit_noun(self, count: u32) -> &'static str {
        match (self, count) {
            (UnitType::Police, 1) => "police unit",
            (UnitType::Police, _) => "police units",
            (UnitType::Medics, 1) => "ambulance",
            (UnitType::Medics, _) => "ambulances",
            (UnitType::Firefighters, 1) => "fire engine",
            (UnitType::Firefighters, _) => "fire engines",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitType::Police => "Police",
            UnitType::Medics => "Medics",
            UnitType::Firefighters => "Firefighters",
        };
        f.write_str(name)
    }
}

/// Whether an emergency still needs units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyStatus {
    Open,
    Resolved,
}

/// A single incident requiring units of one type at one city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emergency {
    pub id: EmergencyId,
    pub unit_type: UnitType,
    pub county: String,
    pub city: String,
    pub created_at: SimTime,
    /// Units still missing; decremented by partial dispatches
    pub required_units: u32,
    pub status: EmergencyStatus,
}

impl Emergency {
    pub fn new(
        id: EmergencyId,
        unit_type: UnitType,
        county: impl Into<String>,
        city: impl Into<String>,
        created_at: SimTime,
        required_units: u32,
    ) -> Self {
        Self {
            id,
            unit_type,
            county: county.into(),
            city: city.into(),
            created_at,
            required_units,
            status: EmergencyStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == EmergencyStatus::Open
    }

    /// Apply `count` delivered units. Returns true once nothing is missing.
    pub fn apply_units(&mut self, count: u32) -> bool {
        self.required_units = self.required_units.saturating_sub(count);
        if self.required_units == 0 {
            self.status = EmergencyStatus::Resolved;
        }
        self.status == EmergencyStatus::Resolved
    }
}

/// Append-only audit entry for one committed reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub emergency_id: EmergencyId,
    pub source_city: String,
    pub target_city: String,
    pub unit_type: UnitType,
    pub count: u32,
    pub timestamp: SimTime,
}

/// Result of a successful dispatch, handed back to the caller for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub record: DispatchRecord,
    /// Units the emergency still needs after this dispatch
    pub remaining_units: u32,
    pub resolved: bool,
}

impl DispatchReceipt {
    /// Operator-facing notification reporting the exact units sent
    pub fn notification(&self) -> String {
        let record = &self.record;
        let sent = format!(
            "Dispatched {} {} from {} to {} for emergency {}.",
            record.count,
            record.unit_type.unit_noun(record.count),
            record.source_city,
            record.target_city,
            record.emergency_id
        );
        if self.resolved {
            format!("{sent} Emergency resolved.")
        } else {
            format!(
                "{sent} {} more {} still required.",
                self.remaining_units,
                record.unit_type.unit_noun(self.remaining_units)
            )
        }
    }
}

/// Progress counters exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub dispatches_completed: u32,
    pub target_dispatches: u32,
    pub active_count: usize,
}
