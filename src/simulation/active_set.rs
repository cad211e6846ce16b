//! Capacity-bounded collection of open emergencies

use std::collections::HashMap;

use super::error::{SimError, SimResult};
use super::types::{Emergency, EmergencyId};

/// Open emergencies keyed by id, remembering admission order
#[derive(Debug, Clone)]
pub struct ActiveEmergencySet {
    capacity: usize,
    emergencies: HashMap<EmergencyId, Emergency>,
    /// Admission order, used as the snapshot order and ranking tiebreak
    order: Vec<EmergencyId>,
}

impl ActiveEmergencySet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            emergencies: HashMap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Admit an emergency, failing when the cap is reached
    pub fn admit(&mut self, emergency: Emergency) -> SimResult<()> {
        if self.is_full() {
            return Err(SimError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let id = emergency.id;
        if self.emergencies.insert(id, emergency).is_none() {
            self.order.push(id);
        }
        Ok(())
    }

    /// Remove and return an emergency
    pub fn remove(&mut self, id: EmergencyId) -> SimResult<Emergency> {
        let emergency = self.emergencies.remove(&id).ok_or(SimError::NotFound(id))?;
        self.order.retain(|existing| *existing != id);
        Ok(emergency)
    }

    pub fn get(&self, id: EmergencyId) -> Option<&Emergency> {
        self.emergencies.get(&id)
    }

    pub fn get_mut(&mut self, id: EmergencyId) -> Option<&mut Emergency> {
        self.emergencies.get_mut(&id)
    }

    /// Snapshot of every emergency in admission order
    pub fn all(&self) -> Vec<Emergency> {
        self.order
            .iter()
            .filter_map(|id| self.emergencies.get(id))
            .cloned()
            .collect()
    }
}
