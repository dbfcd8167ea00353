//! Finds the cheapest way through the refuel graph. As the graph is acyclic
//! and its node indices are already in topological order, a single forward
//! pass relaxing the outgoing edges of each node in turn is enough to find
//! the minimum cost of reaching every node.

use petgraph::graph::EdgeIndex;
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::common::error::PlanError;
use crate::planning::graph::RefuelGraph;
use crate::planning::structs::{NodeKind, SolvedPath, SolvedStop};

/// Best known way of reaching a node: the total cost so far, and the edge
/// used to arrive (None for the start node)
#[derive(Debug, Clone, Copy)]
struct Label {
    cost: f64,
    via: Option<EdgeIndex>,
}

/// Walk back from the destination along the winning edges, then replay the
/// path forwards to attach purchase amounts to each stop
fn reconstruct_path(
    refuel: &RefuelGraph,
    labels: &[Option<Label>],
    total_cost: f64,
) -> SolvedPath {
    let graph = &refuel.graph;

    let mut edges: Vec<EdgeIndex> = Vec::new();
    let mut cur = refuel.destination;
    while let Some(Label { via: Some(edge), .. }) = labels[cur.index()] {
        edges.push(edge);
        match graph.edge_endpoints(edge) {
            Some((src, _)) => cur = src,
            None => break,
        }
    }
    edges.reverse();

    let mut stops = Vec::with_capacity(edges.len());
    let mut final_leg_fuel = 0.0;
    for edge in edges {
        let Some((_, dst)) = graph.edge_endpoints(edge) else {
            continue;
        };
        let weight = graph[edge];
        match graph[dst].kind {
            NodeKind::Stop(candidate_inx) => stops.push(SolvedStop {
                candidate_inx,
                purchase_amount: weight.fuel_required,
                cost: weight.cost,
            }),
            NodeKind::Destination => final_leg_fuel = weight.fuel_required,
            NodeKind::Start => (),
        }
    }

    SolvedPath {
        stops,
        final_leg_fuel,
        total_cost,
    }
}

/// Determine the minimum cost path from the start of the route to the
/// destination. If several paths share the minimum cost, the one found first
/// (i.e. the one whose stops come earliest in the node ordering) is kept, so
/// the result is fully determined by the order of the candidates.
///
/// If the destination cannot be reached at all, an Infeasible error is
/// returned along with the furthest point on the route the vehicle can get
/// to: a full tank's range beyond the furthest node which can be reached.
pub fn solve(refuel: &RefuelGraph) -> Result<SolvedPath, PlanError> {
    let graph = &refuel.graph;
    let mut labels: Vec<Option<Label>> = vec![None; graph.node_count()];
    labels[refuel.start.index()] = Some(Label {
        cost: 0.0,
        via: None,
    });

    for src in graph.node_indices() {
        let Some(src_label) = labels[src.index()] else {
            continue;
        };

        for eref in graph.edges(src) {
            let dst = eref.target().index();
            let cost = src_label.cost + eref.weight().cost;
            if labels[dst].is_none_or(|label| cost < label.cost) {
                labels[dst] = Some(Label {
                    cost,
                    via: Some(eref.id()),
                });
            }
        }
    }

    let reached = labels.iter().filter(|label| label.is_some()).count();
    debug!(nodes = graph.node_count(), reached, "Relaxed refuel graph");

    match labels[refuel.destination.index()] {
        Some(label) => Ok(reconstruct_path(refuel, &labels, label.cost)),
        None => {
            let route_miles = graph[refuel.destination].mile_marker;
            let reachable_miles = graph
                .node_indices()
                .filter(|inx| labels[inx.index()].is_some())
                .map(|inx| graph[inx].mile_marker + refuel.range_miles)
                .fold(0.0, f64::max)
                .min(route_miles);
            Err(PlanError::Infeasible { reachable_miles })
        }
    }
}
