//! Builds the refuel graph: a directed acyclic graph whose nodes are the
//! start of the route, each candidate stop (in mile marker order) and the
//! destination. An edge from node i to node j means "drive from i to j and
//! refuel there", and is only added if the leg can be covered on a single
//! tank.

use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use tracing::debug;

use crate::common::config::PlanConfig;
use crate::planning::structs::{CandidateStop, NodeKind, PlanEdge, PlanNode};

pub type RefuelGraphInner = Graph<PlanNode, PlanEdge, Directed, u32>;

/// Container for the refuel graph. Nodes are added in mile marker order, so
/// node indices are already a topological ordering of the graph: every edge
/// points from a lower index to a higher one
#[derive(Debug, Clone)]
pub struct RefuelGraph {
    pub graph: RefuelGraphInner,
    pub start: NodeIndex,
    pub destination: NodeIndex,
    /// Distance the vehicle covers on a full tank, in miles
    pub range_miles: f64,
}

/// Determine the fuel needed to travel from `src` to `dst`. Arriving at a
/// stop also costs the fuel burned on the round trip off the route to reach
/// it, the destination itself needs no detour
pub fn fuel_required(src: &PlanNode, dst: &PlanNode, mpg: f64) -> f64 {
    let leg = (dst.mile_marker - src.mile_marker) / mpg;
    match dst.kind {
        NodeKind::Destination => leg,
        _ => leg + dst.extra_fuel,
    }
}

/// Generate the edge between two nodes, or None if the leg needs more fuel
/// than the tank can hold. Fuel for the final leg is bought at the last stop,
/// so edges into the destination carry no cost of their own
fn make_edge(
    src: &PlanNode,
    dst: &PlanNode,
    config: &PlanConfig,
) -> Option<PlanEdge> {
    let fuel = fuel_required(src, dst, config.mpg);
    if fuel > config.tank_capacity {
        return None;
    }

    let cost = match dst.price {
        Some(price) => fuel * price,
        None => 0.0,
    };

    Some(PlanEdge {
        fuel_required: fuel,
        cost,
    })
}

/// Based on the sorted list of candidate stops, generate the refuel graph.
/// Every pair of nodes (i, j) with i before j is considered, but as the
/// candidates are ordered by mile marker the search from each node can stop
/// as soon as the distance alone puts a stop out of range
pub fn build_refuel_graph(
    candidates: &[CandidateStop],
    route_miles: f64,
    config: &PlanConfig,
) -> RefuelGraph {
    let mut graph = RefuelGraphInner::with_capacity(
        candidates.len() + 2,
        candidates.len() * 2 + 1,
    );

    let start = graph.add_node(PlanNode::start());
    let stops: Vec<NodeIndex> = candidates
        .iter()
        .enumerate()
        .map(|(inx, candidate)| graph.add_node(PlanNode::stop(inx, candidate)))
        .collect();
    let destination = graph.add_node(PlanNode::destination(route_miles));

    let range = config.range_miles();
    let sources = std::iter::once(start).chain(stops.iter().copied());

    for (src_pos, src_inx) in sources.enumerate() {
        let src = graph[src_inx];

        // Stops which come after this node in mile marker order
        for dst_inx in stops.iter().skip(src_pos).copied() {
            let dst = graph[dst_inx];
            if dst.mile_marker - src.mile_marker > range {
                break;
            }
            if let Some(edge) = make_edge(&src, &dst, config) {
                graph.add_edge(src_inx, dst_inx, edge);
            }
        }

        let dst = graph[destination];
        if let Some(edge) = make_edge(&src, &dst, config) {
            graph.add_edge(src_inx, destination, edge);
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built refuel graph"
    );

    RefuelGraph {
        graph,
        start,
        destination,
        range_miles: range,
    }
}
