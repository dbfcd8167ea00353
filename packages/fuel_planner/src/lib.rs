//! Plans refuelling stops for a long-haul vehicle travelling a fixed route.
//! Stations are projected onto the route geometry, filtered by how far off
//! the route they sit, and then connected into a graph of feasible legs which
//! is solved for the cheapest sequence of stops.

pub mod common;
pub mod loading;
pub mod planning;
