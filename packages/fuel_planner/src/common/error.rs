//! Errors raised by the planning core

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("no route: the route geometry contains no points")]
    EmptyRoute,
    #[error("no route: point {index} has an invalid latitude/longitude")]
    MalformedRoute { index: usize },
    #[error("invalid planner setting {field}: {value}")]
    InvalidConfig { field: &'static str, value: f64 },
    #[error(
        "destination is out of range, the vehicle can only reach mile \
         {reachable_miles:.1}"
    )]
    Infeasible { reachable_miles: f64 },
}
