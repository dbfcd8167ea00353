//! Turns the output of the solver into the Plan returned to the caller. When
//! the solver finds stops, the cost of the plan is the sum of the purchases
//! made at each one. Otherwise the cost falls back to an estimate for the
//! whole trip at a single reference price.

use crate::common::config::PlanConfig;
use crate::common::error::PlanError;
use crate::common::station_data::Station;
use crate::planning::structs::{
    CandidateStop, Plan, PlanStatus, PlannedStop, SolvedPath,
};

/// Pick the unit price used for whole-trip estimates: the cheapest candidate
/// on the route if there are any, otherwise the cheapest station anywhere in
/// the catalog, otherwise the configured fallback price
pub fn reference_price(
    candidates: &[CandidateStop],
    catalog: &[Station],
    config: &PlanConfig,
) -> f64 {
    candidates
        .iter()
        .map(|candidate| candidate.price)
        .min_by(|a, b| a.total_cmp(b))
        .or_else(|| {
            catalog
                .iter()
                .filter(|station| station.has_valid_price())
                .map(|station| station.price)
                .min_by(|a, b| a.total_cmp(b))
        })
        .unwrap_or(config.fallback_price)
}

/// Generate a plan with no stops, costed as if all of the fuel for the trip
/// were bought at the reference price
fn estimate_plan(
    status: PlanStatus,
    candidates: &[CandidateStop],
    catalog: &[Station],
    route_miles: f64,
    config: &PlanConfig,
) -> Plan {
    let price = reference_price(candidates, catalog, config);
    let gallons = route_miles / config.mpg;

    Plan {
        status,
        stops: Vec::new(),
        route_miles,
        total_gallons: gallons,
        final_leg_gallons: None,
        total_cost: gallons * price,
        reference_price: Some(price),
    }
}

/// Combine the solver output with the candidate and station details to
/// produce the final plan. Infeasible trips are not an error at this point,
/// they produce a plan with an estimated cost and an Infeasible status so
/// that the caller can decide how to present them. Any other error is
/// passed straight back.
pub fn aggregate(
    solution: Result<SolvedPath, PlanError>,
    candidates: &[CandidateStop],
    catalog: &[Station],
    route_miles: f64,
    config: &PlanConfig,
) -> Result<Plan, PlanError> {
    let path = match solution {
        Ok(path) => path,
        Err(PlanError::Infeasible { reachable_miles }) => {
            return Ok(estimate_plan(
                PlanStatus::Infeasible { reachable_miles },
                candidates,
                catalog,
                route_miles,
                config,
            ));
        }
        Err(err) => return Err(err),
    };

    if path.stops.is_empty() {
        return Ok(estimate_plan(
            PlanStatus::WithinRange,
            candidates,
            catalog,
            route_miles,
            config,
        ));
    }

    let stops: Vec<PlannedStop> = path
        .stops
        .iter()
        .map(|solved| {
            let candidate = &candidates[solved.candidate_inx];
            let station = &catalog[candidate.station_inx];
            PlannedStop::new(station, candidate, solved)
        })
        .collect();

    let total_gallons = stops.iter().map(|stop| stop.purchase_gallons).sum();
    let total_cost = stops.iter().map(|stop| stop.purchase_cost).sum();

    Ok(Plan {
        status: PlanStatus::Optimized,
        stops,
        route_miles,
        total_gallons,
        final_leg_gallons: Some(path.final_leg_fuel),
        total_cost,
        reference_price: None,
    })
}
