//! Ordering of open emergencies for presentation and selection
//!
//! Ranking never mutates its input. Every key falls back to the emergency
//! id, so the same input always yields the same order.

use clap::ValueEnum;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::types::{Emergency, EmergencyId, UnitType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankingKey {
    /// Oldest first
    Date,
    County,
    City,
    /// Cities with the most open emergencies first
    Type,
}

/// Per-city emergency counts behind the `Type` ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityTypeScore {
    pub city: String,
    /// Counts indexed by [`UnitType::index`]
    pub counts: [usize; 3],
    pub total: usize,
    /// Smallest emergency id in the city, the tiebreak between equal totals
    first_id: EmergencyId,
}

impl CityTypeScore {
    pub fn count(&self, unit_type: UnitType) -> usize {
        self.counts[unit_type.index()]
    }
}

/// Order emergencies by `key`
pub fn rank(emergencies: &[Emergency], key: RankingKey) -> Vec<Emergency> {
    let mut ranked = emergencies.to_vec();
    match key {
        RankingKey::Date => ranked.sort_by(by_date),
        RankingKey::County => {
            ranked.sort_by(|a, b| a.county.cmp(&b.county).then_with(|| a.id.cmp(&b.id)))
        }
        RankingKey::City => {
            ranked.sort_by(|a, b| a.city.cmp(&b.city).then_with(|| a.id.cmp(&b.id)))
        }
        RankingKey::Type => {
            let scores = type_scores(emergencies);
            let position: HashMap<&str, usize> = scores
                .iter()
                .enumerate()
                .map(|(index, score)| (score.city.as_str(), index))
                .collect();
            ranked.sort_by(|a, b| {
                position[a.city.as_str()]
                    .cmp(&position[b.city.as_str()])
                    .then_with(|| by_date(a, b))
            });
        }
    }
    ranked
}

/// Emergency counts per city and type, busiest city first
pub fn type_scores(emergencies: &[Emergency]) -> Vec<CityTypeScore> {
    let mut by_city: HashMap<&str, CityTypeScore> = HashMap::new();
    for emergency in emergencies {
        let score = by_city
            .entry(emergency.city.as_str())
            .or_insert_with(|| CityTypeScore {
                city: emergency.city.clone(),
                counts: [0; 3],
                total: 0,
                first_id: emergency.id,
            });
        score.counts[emergency.unit_type.index()] += 1;
        score.total += 1;
        score.first_id = score.first_id.min(emergency.id);
    }

    let mut scores: Vec<CityTypeScore> = by_city.into_values().collect();
    scores.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.first_id.cmp(&b.first_id))
    });
    scores
}

fn by_date(a: &Emergency, b: &Emergency) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}
