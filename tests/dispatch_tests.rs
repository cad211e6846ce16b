//! Dispatch engine validation tests

use std::collections::HashMap;

use dispatch_sim::simulation::{
    default_region, dispatch_round, plan_dispatch, CityConfig, DispatchRequest, EmergencyId,
    FixedSequence, GeneratorState, RankingKey, RegionConfig, RunStatus, SimConfig, SimError,
    SimId, Simulation, SimulationState, UnitType,
};

/// X has no medics, its neighbor Y has three, Z is not adjacent to X
fn scenario_region() -> RegionConfig {
    RegionConfig::new(
        vec![
            CityConfig::new("X", "North", 2, 0, 2),
            CityConfig::new("Y", "North", 2, 3, 2),
            CityConfig::new("Z", "South", 5, 5, 5),
        ],
        &[("X", "Y"), ("Y", "Z")],
    )
}

/// Draws: gap 1, Medics, city X, 2 units
fn scenario_simulation(target_dispatches: u32) -> (Simulation, EmergencyId) {
    let config = SimConfig {
        max_units_per_emergency: 3,
        ..SimConfig::new(42, target_dispatches, 5)
    };
    let rng = Box::new(FixedSequence::new(vec![0.0, 0.5, 0.0, 0.5]));
    let mut simulation =
        Simulation::with_random_source(config, scenario_region(), rng).unwrap();

    let admitted = simulation.tick();
    assert_eq!(admitted.len(), 1);
    (simulation, admitted[0])
}

#[test]
fn test_end_to_end_dispatch_from_neighbor() {
    let (mut simulation, id) = scenario_simulation(1);

    let emergency = simulation.emergency(id).unwrap().clone();
    assert_eq!(emergency.unit_type, UnitType::Medics);
    assert_eq!(emergency.city, "X");
    assert_eq!(emergency.required_units, 2);

    let around = simulation.availability("X").unwrap();
    assert_eq!(around["X"][&UnitType::Medics], 0);
    assert_eq!(around["Y"][&UnitType::Medics], 3);

    // Home city cannot serve it
    let from_home = DispatchRequest::new(id, "X", UnitType::Medics, 2);
    assert!(matches!(
        simulation.dispatch(&from_home),
        Err(SimError::InsufficientUnits { .. })
    ));

    let receipt = simulation
        .dispatch(&DispatchRequest::new(id, "Y", UnitType::Medics, 2))
        .unwrap();

    assert_eq!(receipt.record.source_city, "Y");
    assert_eq!(receipt.record.count, 2);
    assert!(receipt.resolved);
    assert_eq!(
        receipt.notification(),
        format!("Dispatched 2 ambulances from Y to X for emergency {id}. Emergency resolved.")
    );

    assert_eq!(simulation.fleet().available("Y", UnitType::Medics).unwrap(), 1);
    assert!(simulation.emergency(id).is_none());
    assert_eq!(simulation.progress().dispatches_completed, 1);
    assert_eq!(simulation.progress().active_count, 0);
    assert_eq!(simulation.generator_state(), GeneratorState::Exhausted);
    assert!(simulation.is_finished());

    // No further emergencies once exhausted
    for _ in 0..10 {
        assert!(simulation.tick().is_empty());
    }
    assert_eq!(simulation.active_count(), 0);
    assert_eq!(simulation.report().status, RunStatus::Completed);
}

#[test]
fn test_partial_dispatch_keeps_emergency_active() {
    let (mut simulation, id) = scenario_simulation(5);

    let first = simulation
        .dispatch(&DispatchRequest::new(id, "Y", UnitType::Medics, 1))
        .unwrap();
    assert!(!first.resolved);
    assert_eq!(first.remaining_units, 1);
    assert!(first.notification().ends_with("1 more ambulance still required."));

    let still_open = simulation.emergency(id).unwrap();
    assert_eq!(still_open.required_units, 1);
    assert!(simulation
        .list_active(RankingKey::Date)
        .iter()
        .any(|emergency| emergency.id == id));
    assert_eq!(simulation.progress().dispatches_completed, 0);

    let second = simulation
        .dispatch(&DispatchRequest::new(id, "Y", UnitType::Medics, 1))
        .unwrap();
    assert!(second.resolved);
    assert_eq!(simulation.progress().dispatches_completed, 1);
    assert_eq!(simulation.records().len(), 2);

    // A resolved emergency no longer accepts units
    let again = simulation.dispatch(&DispatchRequest::new(id, "Y", UnitType::Medics, 1));
    assert!(matches!(again, Err(SimError::EmergencyNotFound(missing)) if missing == id));
    assert_eq!(simulation.records().len(), 2);
    assert_eq!(simulation.fleet().available("Y", UnitType::Medics).unwrap(), 1);
}

#[test]
fn test_unit_totals_do_not_wrap() {
    let mut state = SimulationState::new(&SimConfig::new(1, 10, 5));

    state.record_units(UnitType::Police, u32::MAX);
    state.record_units(UnitType::Police, u32::MAX);
    state.record_units(UnitType::Medics, u32::MAX);

    assert_eq!(state.units_dispatched[UnitType::Police.index()], 2 * u64::from(u32::MAX));
    assert_eq!(state.total_units_dispatched(), 3 * u64::from(u32::MAX));
}

#[test]
fn test_rejected_dispatches_change_nothing() {
    let (mut simulation, id) = scenario_simulation(5);
    let fleet_before: Vec<_> = simulation
        .fleet()
        .cities()
        .iter()
        .map(|city| UnitType::ALL.map(|unit_type| city.available(unit_type)))
        .collect();

    let cases = [
        (
            DispatchRequest::new(EmergencyId(SimId(99)), "Y", UnitType::Medics, 1),
            "not found",
        ),
        (DispatchRequest::new(id, "Z", UnitType::Medics, 2), "invalid source"),
        (DispatchRequest::new(id, "Nowhere", UnitType::Medics, 2), "unknown city"),
        (DispatchRequest::new(id, "Y", UnitType::Police, 2), "type mismatch"),
        (DispatchRequest::new(id, "Y", UnitType::Medics, 0), "zero count"),
        (DispatchRequest::new(id, "Y", UnitType::Medics, 3), "too many"),
    ];

    for (request, label) in &cases {
        let error = simulation.dispatch(request).unwrap_err();
        match *label {
            "not found" => assert_eq!(error, SimError::EmergencyNotFound(EmergencyId(SimId(99)))),
            "invalid source" => assert!(matches!(error, SimError::InvalidSource { .. })),
            "unknown city" => assert_eq!(error, SimError::UnknownCity("Nowhere".to_string())),
            "type mismatch" => assert!(matches!(error, SimError::UnitTypeMismatch { .. })),
            _ => assert!(matches!(error, SimError::InvalidCount { .. })),
        }
    }

    let fleet_after: Vec<_> = simulation
        .fleet()
        .cities()
        .iter()
        .map(|city| UnitType::ALL.map(|unit_type| city.available(unit_type)))
        .collect();
    assert_eq!(fleet_before, fleet_after);
    assert_eq!(simulation.emergency(id).unwrap().required_units, 2);
    assert!(simulation.records().is_empty());
    assert_eq!(simulation.state().rejected, cases.len());
}

#[test]
fn test_dispatch_after_stop_is_refused() {
    let (mut simulation, id) = scenario_simulation(5);

    let report = simulation.stop();
    assert_eq!(report.status, RunStatus::Stopped);
    assert_eq!(report.active_remaining, 1);

    assert_eq!(
        simulation.dispatch(&DispatchRequest::new(id, "Y", UnitType::Medics, 2)),
        Err(SimError::SimulationFinished)
    );
    assert!(simulation.tick().is_empty());
    assert_eq!(simulation.generator_state(), GeneratorState::Exhausted);
}

#[test]
fn test_seeded_run_reaches_exhausted_state() {
    let config = SimConfig::new(42, 1, 5);
    let mut simulation = Simulation::new(config, default_region()).unwrap();

    let id = simulation.request_next().unwrap();
    let emergency = simulation.emergency(id).unwrap().clone();
    let plan = plan_dispatch(simulation.fleet(), &emergency)
        .unwrap()
        .expect("the built-in region covers any single emergency");

    let sent: u32 = plan.iter().map(|request| request.count).sum();
    assert_eq!(sent, emergency.required_units);

    for request in &plan {
        simulation.dispatch(request).unwrap();
    }

    assert_eq!(simulation.progress().dispatches_completed, 1);
    assert_eq!(simulation.generator_state(), GeneratorState::Exhausted);
}

#[test]
fn test_plan_prefers_home_then_richest_neighbor() {
    let (simulation, id) = scenario_simulation(5);
    let emergency = simulation.emergency(id).unwrap();

    let plan = plan_dispatch(simulation.fleet(), emergency).unwrap().unwrap();

    assert_eq!(plan, vec![DispatchRequest::new(id, "Y", UnitType::Medics, 2)]);
}

#[test]
fn test_automatic_run_conserves_fleet() {
    let config = SimConfig::new(9, 30, 10);
    let region = default_region();
    let mut simulation = Simulation::new(config, region.clone()).unwrap();

    for _ in 0..300 {
        simulation.tick();
        dispatch_round(&mut simulation, RankingKey::Type);

        let progress = simulation.progress();
        assert!(progress.active_count <= 10);
        assert!(progress.dispatches_completed <= progress.target_dispatches);
    }
    assert!(simulation.progress().dispatches_completed > 0);

    let mut sent: HashMap<(String, UnitType), u32> = HashMap::new();
    for record in simulation.records() {
        *sent
            .entry((record.source_city.clone(), record.unit_type))
            .or_default() += record.count;
    }

    for city in &region.cities {
        for unit_type in UnitType::ALL {
            let initial = city.fleet.get(&unit_type).copied().unwrap_or(0);
            let available = simulation.fleet().available(&city.name, unit_type).unwrap();
            let dispatched = sent
                .get(&(city.name.clone(), unit_type))
                .copied()
                .unwrap_or(0);
            assert_eq!(dispatched + available, initial, "{} {}", city.name, unit_type);
        }
    }
}
