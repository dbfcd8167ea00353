//! Entry point for the planning pipeline. Each call works on its own
//! immutable route and catalog snapshot, so any number of plans can be
//! generated concurrently without coordination.

use tracing::{info, warn};

use crate::common::config::PlanConfig;
use crate::common::error::PlanError;
use crate::common::station_data::Station;
use crate::planning::candidates::select_candidates;
use crate::planning::cost::aggregate;
use crate::planning::geometry::Route;
use crate::planning::graph::build_refuel_graph;
use crate::planning::solver::solve;
use crate::planning::structs::{Plan, PlanStatus};

/// Plan the cheapest set of refuelling stops along the route, choosing from
/// the stations in the provided catalog snapshot
pub fn plan_refuel_stops(
    route: &Route,
    catalog: &[Station],
    config: &PlanConfig,
) -> Result<Plan, PlanError> {
    config.validate()?;

    let route_miles = route.length_miles();
    let candidates = select_candidates(route, catalog, config);
    let refuel = build_refuel_graph(&candidates, route_miles, config);
    let solution = solve(&refuel);

    let plan = aggregate(solution, &candidates, catalog, route_miles, config)?;

    match plan.status {
        PlanStatus::Infeasible { reachable_miles } => warn!(
            route_miles,
            reachable_miles,
            candidates = candidates.len(),
            "No feasible set of stops, falling back to a whole trip estimate"
        ),
        _ => info!(
            route_miles,
            stops = plan.stops.len(),
            total_cost = plan.total_cost,
            "Generated refuel plan"
        ),
    }

    Ok(plan)
}
