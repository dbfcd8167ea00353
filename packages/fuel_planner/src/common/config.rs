//! This module contains structs which represent the vehicle and search
//! settings used while planning. In particular, the PlanConfig struct is
//! passed to every stage of the planning pipeline.

use crate::common::error::PlanError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TANK_CAPACITY_GAL: f64 = 50.0;
pub const DEFAULT_MILES_PER_GALLON: f64 = 10.0;
pub const DEFAULT_MAX_DETOUR_MILES: f64 = 20.0;
pub const DEFAULT_FALLBACK_PRICE: f64 = 3.50;

/// Stores the planner settings exactly as they are received from the caller.
/// Any setting which is not provided will take its default value
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct UserPlanConfig {
    pub tank_capacity: Option<f64>,
    pub mpg: Option<f64>,
    pub max_detour_miles: Option<f64>,
    pub fallback_price: Option<f64>,
}

impl From<UserPlanConfig> for PlanConfig {
    fn from(user: UserPlanConfig) -> PlanConfig {
        PlanConfig {
            tank_capacity: user
                .tank_capacity
                .unwrap_or(DEFAULT_TANK_CAPACITY_GAL),
            mpg: user.mpg.unwrap_or(DEFAULT_MILES_PER_GALLON),
            max_detour_miles: user
                .max_detour_miles
                .unwrap_or(DEFAULT_MAX_DETOUR_MILES),
            fallback_price: user
                .fallback_price
                .unwrap_or(DEFAULT_FALLBACK_PRICE),
        }
    }
}

/// Stores the planner settings in a format which can be used in the rest of
/// this package. Distances are in miles, fuel in gallons and prices in
/// currency per gallon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanConfig {
    pub tank_capacity: f64,
    pub mpg: f64,
    pub max_detour_miles: f64,
    pub fallback_price: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        UserPlanConfig::default().into()
    }
}

impl PlanConfig {
    /// The furthest the vehicle can travel on a single full tank
    pub fn range_miles(&self) -> f64 {
        self.tank_capacity * self.mpg
    }

    /// Reject settings which would make the fuel arithmetic meaningless,
    /// e.g. a zero fuel economy or a negative search radius
    pub fn validate(&self) -> Result<(), PlanError> {
        let positive = [
            ("tank_capacity", self.tank_capacity),
            ("mpg", self.mpg),
            ("fallback_price", self.fallback_price),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlanError::InvalidConfig { field, value });
            }
        }

        if !self.max_detour_miles.is_finite() || self.max_detour_miles < 0.0 {
            return Err(PlanError::InvalidConfig {
                field: "max_detour_miles",
                value: self.max_detour_miles,
            });
        }

        Ok(())
    }
}
