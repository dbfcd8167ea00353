//! Defines the geographic coordinate shared by routes and stations, along
//! with the station record which makes up the catalog snapshot handed to the
//! planner

use serde::{Deserialize, Serialize};

/// A latitude & longitude pair, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check that the coordinate is finite and falls within the valid range
    /// for latitudes and longitudes
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A single fuel station, as held in the catalog snapshot. Position may be
/// unknown if the station has not been geocoded yet, in which case it will
/// never be considered as a stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub position: Option<Coordinate>,
    pub price: f64,
}

impl Station {
    /// Prices feed directly into edge weights, which must be non-negative
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}
