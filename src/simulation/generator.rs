//! Emergency generation with admission control
//!
//! The generator drafts one emergency at a time from the random stream and
//! schedules it at a random logical time after the previous arrival. A
//! drafted emergency is only admitted once its time has come and the active
//! set has room; while the set is full it is held, never dropped.

use log::{debug, info, warn};

use super::active_set::ActiveEmergencySet;
use super::config::SimConfig;
use super::random::RandomSource;
use super::types::{Emergency, EmergencyId, SimId, SimTime, UnitType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Idle,
    Generating,
    Exhausted,
}

/// Where an emergency can happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub city: String,
    pub county: String,
}

pub struct EmergencyGenerator {
    state: GeneratorState,
    sites: Vec<Site>,
    max_units: u32,
    max_gap: u64,
    next_id: usize,
    /// Drafted emergency waiting for its arrival time or for capacity
    pending: Option<Emergency>,
    last_arrival: SimTime,
    generated: usize,
}

impl EmergencyGenerator {
    pub fn new(config: &SimConfig, sites: Vec<Site>) -> Self {
        Self {
            state: GeneratorState::Idle,
            sites,
            max_units: config.max_units_per_emergency.max(1),
            max_gap: config.max_arrival_gap.max(1),
            next_id: 0,
            pending: None,
            last_arrival: SimTime::default(),
            generated: 0,
        }
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Emergencies admitted so far
    pub fn generated(&self) -> usize {
        self.generated
    }

    /// Arrival time of the next emergency, drafting it if needed
    pub fn next_arrival(&mut self, rng: &mut dyn RandomSource) -> Option<SimTime> {
        if self.state == GeneratorState::Exhausted {
            return None;
        }
        self.pending_or_draft(rng).map(|emergency| emergency.created_at)
    }

    /// Admit every emergency due at or before `now` while there is room
    ///
    /// At most `max_admit` emergencies are admitted when a limit is given.
    /// Returns the ids of newly admitted emergencies in admission order.
    pub fn step(
        &mut self,
        now: SimTime,
        rng: &mut dyn RandomSource,
        active: &mut ActiveEmergencySet,
        dispatches_completed: u32,
        target_dispatches: u32,
        max_admit: Option<usize>,
    ) -> Vec<EmergencyId> {
        let mut admitted = Vec::new();

        loop {
            if max_admit.is_some_and(|limit| admitted.len() >= limit) {
                break;
            }
            if dispatches_completed >= target_dispatches {
                self.exhaust();
                break;
            }
            if self.state == GeneratorState::Exhausted {
                break;
            }
            self.state = GeneratorState::Generating;

            let due = match self.pending_or_draft(rng) {
                Some(emergency) => emergency.created_at <= now,
                None => false,
            };
            if !due {
                break;
            }
            if active.is_full() {
                debug!(
                    "Active set full ({}), holding next emergency",
                    active.capacity()
                );
                break;
            }

            let Some(emergency) = self.pending.take() else {
                break;
            };
            let id = emergency.id;
            match active.admit(emergency.clone()) {
                Ok(()) => {
                    debug!(
                        "Emergency {} admitted: {} x{} at {}, {}",
                        id,
                        emergency.unit_type,
                        emergency.required_units,
                        emergency.city,
                        emergency.county
                    );
                    self.last_arrival = emergency.created_at;
                    self.generated += 1;
                    admitted.push(id);
                }
                Err(error) => {
                    warn!("Holding emergency {}: {}", id, error);
                    self.pending = Some(emergency);
                    break;
                }
            }
        }

        admitted
    }

    /// Stop generating for good
    pub fn exhaust(&mut self) {
        if self.state != GeneratorState::Exhausted {
            info!("Generator exhausted after {} emergencies", self.generated);
        }
        self.state = GeneratorState::Exhausted;
        self.pending = None;
    }

    fn pending_or_draft(&mut self, rng: &mut dyn RandomSource) -> Option<&Emergency> {
        if self.pending.is_none() {
            self.pending = self.draft(rng);
        }
        self.pending.as_ref()
    }

    /// Draw arrival gap, type, site and unit requirement, in that order
    fn draft(&mut self, rng: &mut dyn RandomSource) -> Option<Emergency> {
        if self.sites.is_empty() {
            return None;
        }

        let gap = rng.next_int(1, self.max_gap);
        let type_index = rng.choose_index(UnitType::ALL.len())?;
        let site_index = rng.choose_index(self.sites.len())?;
        let required_units = rng.next_int(1, u64::from(self.max_units)) as u32;

        let id = EmergencyId(SimId(self.next_id));
        self.next_id += 1;

        let site = &self.sites[site_index];
        Some(Emergency::new(
            id,
            UnitType::ALL[type_index],
            site.county.clone(),
            site.city.clone(),
            SimTime(self.last_arrival.0 + gap),
            required_units,
        ))
    }
}
