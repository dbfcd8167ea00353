//! Defines the structs which are passed between the stages of the planning
//! pipeline, and the Plan which is eventually handed back to the caller

use serde::Serialize;

use crate::common::station_data::{Coordinate, Station};

/// A station which sits close enough to the route to be considered as a
/// stop. Distances are in miles and fuel in gallons. Created fresh for every
/// planning call, never persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateStop {
    /// Index of the station in the catalog snapshot it was selected from
    pub station_inx: usize,
    pub station_id: i64,
    pub position: Coordinate,
    pub mile_marker: f64,
    pub detour_distance: f64,
    /// Fuel burned driving out to the station and back again
    pub extra_fuel: f64,
    pub price: f64,
}

/// Identifies what a node in the refuel graph represents. Stops carry the
/// index of the corresponding entry in the candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Start,
    Stop(usize),
    Destination,
}

/// Data stored against each node in the refuel graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanNode {
    pub kind: NodeKind,
    pub mile_marker: f64,
    pub extra_fuel: f64,
    pub price: Option<f64>,
}

impl PlanNode {
    pub fn start() -> Self {
        PlanNode {
            kind: NodeKind::Start,
            mile_marker: 0.0,
            extra_fuel: 0.0,
            price: None,
        }
    }

    pub fn destination(route_miles: f64) -> Self {
        PlanNode {
            kind: NodeKind::Destination,
            mile_marker: route_miles,
            extra_fuel: 0.0,
            price: None,
        }
    }

    pub fn stop(candidate_inx: usize, candidate: &CandidateStop) -> Self {
        PlanNode {
            kind: NodeKind::Stop(candidate_inx),
            mile_marker: candidate.mile_marker,
            extra_fuel: candidate.extra_fuel,
            price: Some(candidate.price),
        }
    }
}

/// Data stored against each edge in the refuel graph. Only feasible legs
/// (those needing no more than a full tank) are ever added to the graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanEdge {
    pub fuel_required: f64,
    pub cost: f64,
}

/// A stop on the solved path, before station details are attached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolvedStop {
    pub candidate_inx: usize,
    pub purchase_amount: f64,
    pub cost: f64,
}

/// The cheapest path through the refuel graph
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedPath {
    pub stops: Vec<SolvedStop>,
    /// Fuel needed to cover the leg from the last stop into the destination
    pub final_leg_fuel: f64,
    pub total_cost: f64,
}

/// A stop on the finished plan, with everything the presentation layer needs
/// in order to display it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStop {
    pub station_id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub position: Coordinate,
    pub mile_marker: f64,
    pub detour_miles: f64,
    pub price: f64,
    pub purchase_gallons: f64,
    pub purchase_cost: f64,
}

impl PlannedStop {
    pub fn new(
        station: &Station,
        candidate: &CandidateStop,
        solved: &SolvedStop,
    ) -> Self {
        PlannedStop {
            station_id: station.id,
            name: station.name.clone(),
            address: station.address.clone(),
            city: station.city.clone(),
            state: station.state.clone(),
            position: candidate.position,
            mile_marker: candidate.mile_marker,
            detour_miles: candidate.detour_distance,
            price: candidate.price,
            purchase_gallons: solved.purchase_amount,
            purchase_cost: solved.cost,
        }
    }
}

/// Describes how the total cost of a plan was arrived at
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanStatus {
    /// Stops were selected by the solver, cost is the sum of purchases
    Optimized,
    /// The whole trip fits in a single tank, cost is a whole-trip estimate
    WithinRange,
    /// No feasible set of stops exists, cost is a whole-trip estimate
    Infeasible { reachable_miles: f64 },
}

/// The finished plan, returned once per planning call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub status: PlanStatus,
    pub stops: Vec<PlannedStop>,
    pub route_miles: f64,
    /// Fuel paid for. For an optimized plan this is the sum of the purchases
    /// at each stop, which excludes the starting tank. For an estimate it is
    /// the fuel burned over the whole trip
    pub total_gallons: f64,
    /// Fuel burned between the last stop and the destination, for an
    /// optimized plan
    pub final_leg_gallons: Option<f64>,
    pub total_cost: f64,
    /// Unit price used for the whole-trip estimate, if one was made
    pub reference_price: Option<f64>,
}
