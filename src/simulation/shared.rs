//! Thread-safe handle to a running simulation
//!
//! One global lock serializes generation ticks and dispatches, so a
//! reservation and the matching emergency update are never observed half
//! done. No call waits for units: a dispatch either commits or fails at
//! once. Dispatch records are appended in the order callers acquire the
//! lock, which is not necessarily the order requests were issued.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::dispatch::DispatchRequest;
use super::error::SimResult;
use super::ranking::RankingKey;
use super::types::{DispatchReceipt, DispatchRecord, Emergency, EmergencyId, Progress, UnitType};
use super::world::{Simulation, SimulationReport};

#[derive(Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    /// Run `f` with exclusive access to the engine
    pub fn with<T>(&self, f: impl FnOnce(&mut Simulation) -> T) -> T {
        let mut simulation = self.inner.lock();
        f(&mut simulation)
    }

    pub fn tick(&self) -> Vec<EmergencyId> {
        self.inner.lock().tick()
    }

    pub fn request_next(&self) -> Option<EmergencyId> {
        self.inner.lock().request_next()
    }

    pub fn list_active(&self, key: RankingKey) -> Vec<Emergency> {
        self.inner.lock().list_active(key)
    }

    pub fn availability(&self, city: &str) -> SimResult<BTreeMap<String, BTreeMap<UnitType, u32>>> {
        self.inner.lock().availability(city)
    }

    pub fn dispatch(&self, request: &DispatchRequest) -> SimResult<DispatchReceipt> {
        self.inner.lock().dispatch(request)
    }

    pub fn records(&self) -> Vec<DispatchRecord> {
        self.inner.lock().records().to_vec()
    }

    pub fn progress(&self) -> Progress {
        self.inner.lock().progress()
    }

    /// Stop the run. A dispatch already holding the lock completes first.
    pub fn stop(&self) -> SimulationReport {
        self.inner.lock().stop()
    }
}
