//! This module turns the payloads handed over by external collaborators
//! (routing APIs, station stores) into the immutable inputs consumed by the
//! planning core.

pub mod route;
pub mod stations;

use crate::common::error::PlanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid input definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed encoded polyline at byte {offset}")]
    Polyline { offset: usize },
    #[error("unusable route geometry: {0}")]
    Route(#[from] PlanError),
}
