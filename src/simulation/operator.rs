//! Automatic operator used by the headless runner
//!
//! Works through the ranked active set and fills each emergency greedily:
//! the home city first, then neighbors with the most units available.
//! An emergency is only served when the plan covers all of its units, so
//! no units are stranded on an emergency that cannot be resolved yet.

use log::warn;

use super::dispatch::DispatchRequest;
use super::error::SimResult;
use super::fleet::FleetRegistry;
use super::ranking::RankingKey;
use super::types::Emergency;
use super::world::Simulation;

/// Candidate source cities for `emergency`, best first
fn candidate_sources(fleet: &FleetRegistry, emergency: &Emergency) -> SimResult<Vec<(String, u32)>> {
    let unit_type = emergency.unit_type;
    let home = fleet.available(&emergency.city, unit_type)?;

    let mut neighbors = Vec::new();
    for name in fleet.neighbors(&emergency.city)? {
        let available = fleet.available(&name, unit_type)?;
        neighbors.push((name, available));
    }
    neighbors.sort_by(|(name_a, count_a), (name_b, count_b)| {
        count_b.cmp(count_a).then_with(|| name_a.cmp(name_b))
    });

    Ok(std::iter::once((emergency.city.clone(), home))
        .chain(neighbors)
        .filter(|(_, available)| *available > 0)
        .collect())
}

/// Requests that together cover every unit `emergency` still needs
///
/// Returns `None` when the home city and its neighbors cannot cover it.
pub fn plan_dispatch(
    fleet: &FleetRegistry,
    emergency: &Emergency,
) -> SimResult<Option<Vec<DispatchRequest>>> {
    let mut remaining = emergency.required_units;
    let mut plan = Vec::new();

    for (city, available) in candidate_sources(fleet, emergency)? {
        if remaining == 0 {
            break;
        }
        let count = available.min(remaining);
        plan.push(DispatchRequest::new(
            emergency.id,
            city,
            emergency.unit_type,
            count,
        ));
        remaining -= count;
    }

    Ok((remaining == 0).then_some(plan))
}

/// Serve every coverable emergency in ranking order
///
/// Returns the number of emergencies resolved.
pub fn dispatch_round(simulation: &mut Simulation, key: RankingKey) -> usize {
    let mut resolved = 0;

    for emergency in simulation.list_active(key) {
        if simulation.is_finished() {
            break;
        }

        let plan = match plan_dispatch(simulation.fleet(), &emergency) {
            Ok(Some(plan)) => plan,
            Ok(None) => continue,
            Err(error) => {
                warn!("Could not plan emergency {}: {}", emergency.id, error);
                continue;
            }
        };

        for request in plan {
            match simulation.dispatch(&request) {
                Ok(receipt) => {
                    if receipt.resolved {
                        resolved += 1;
                    }
                }
                Err(error) => {
                    warn!("Dispatch for emergency {} failed: {}", emergency.id, error);
                    break;
                }
            }
        }
    }

    resolved
}
