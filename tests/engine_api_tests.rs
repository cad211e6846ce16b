//! Caller-facing operations of the simulation engine

use dispatch_sim::simulation::{
    default_region, RankingKey, SharedSimulation, SimConfig, SimError, Simulation, UnitType,
};

fn busy_simulation(seed: u64) -> Simulation {
    let mut simulation = Simulation::new(SimConfig::new(seed, 100, 20), default_region()).unwrap();
    for _ in 0..40 {
        simulation.tick();
    }
    simulation
}

#[test]
fn test_queue_is_ranked_and_limited() {
    let simulation = busy_simulation(4);
    assert!(simulation.active_count() > 5);

    let queue = simulation.queue(RankingKey::Date, 5);
    let full = simulation.list_active(RankingKey::Date);

    assert_eq!(queue.len(), 5);
    assert_eq!(queue[..], full[..5]);
}

#[test]
fn test_type_scores_follow_type_ranking() {
    let simulation = busy_simulation(4);

    let scores = simulation.type_scores();
    let ranked = simulation.list_active(RankingKey::Type);

    let total: usize = scores.iter().map(|score| score.total).sum();
    assert_eq!(total, simulation.active_count());
    assert!(scores.windows(2).all(|pair| pair[0].total >= pair[1].total));
    assert_eq!(ranked[0].city, scores[0].city);
}

#[test]
fn test_search_and_locations_cover_every_city() {
    let simulation = busy_simulation(4);

    let locations = simulation.locations();
    assert_eq!(locations.len(), 9);
    let ashford = locations
        .iter()
        .find(|location| location.city == "Ashford")
        .unwrap();
    assert_eq!(ashford.county, "Harrow");
    assert_eq!(ashford.neighbors, vec!["Brookmere".to_string(), "Colden".to_string()]);

    let police = simulation.search(UnitType::Police);
    assert_eq!(police.len(), 9);
    assert_eq!(police["Ashford"], 18);

    assert!(matches!(
        simulation.availability("Atlantis"),
        Err(SimError::UnknownCity(_))
    ));
}

#[test]
fn test_restart_replays_the_same_run() {
    let mut simulation = busy_simulation(8);
    let before = simulation.list_active(RankingKey::Date);

    simulation.restart().unwrap();
    assert_eq!(simulation.active_count(), 0);
    assert_eq!(simulation.now().0, 0);

    for _ in 0..40 {
        simulation.tick();
    }
    assert_eq!(simulation.list_active(RankingKey::Date), before);
}

#[test]
fn test_reset_applies_new_configuration() {
    let mut simulation = busy_simulation(8);

    simulation
        .reset(SimConfig::new(3, 7, 2), default_region())
        .unwrap();
    assert_eq!(simulation.progress().target_dispatches, 7);

    for _ in 0..20 {
        simulation.tick();
    }
    assert_eq!(simulation.active_count(), 2);

    // An invalid configuration is refused before anything is replaced
    let result = simulation.reset(SimConfig::new(3, 7, 0), default_region());
    assert!(matches!(result, Err(SimError::InvalidConfiguration(_))));
    assert_eq!(simulation.progress().target_dispatches, 7);
}

#[test]
fn test_shared_handle_exposes_engine_operations() {
    let config = SimConfig::new(5, 10, 5);
    let shared = SharedSimulation::new(Simulation::new(config, default_region()).unwrap());

    let id = shared.request_next().unwrap();
    let active = shared.list_active(RankingKey::Date);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, id);

    let around = shared.availability(&active[0].city).unwrap();
    assert!(around.contains_key(&active[0].city));

    let progress = shared.progress();
    assert_eq!(progress.active_count, 1);
    assert_eq!(progress.dispatches_completed, 0);
    assert_eq!(progress.target_dispatches, 10);
}
