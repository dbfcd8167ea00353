//! The planning pipeline. Each stage lives in its own module and is driven in
//! order by `planner::plan_refuel_stops`:
//! geometry -> candidates -> graph -> solver -> cost

pub mod candidates;
pub mod cost;
pub mod geometry;
pub mod graph;
pub mod planner;
pub mod solver;
pub mod structs;
