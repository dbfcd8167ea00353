//! Defines a struct to represent a bounding box, which is used to represent
//! a 2d square(ish) on the planet's surface. This is used as a cheap
//! pre-filter on the station catalog, so that only stations which could
//! possibly fall within the detour threshold are projected onto the route.

use crate::common::station_data::Coordinate;
use crate::planning::geometry::EARTH_RADIUS_M;
use serde::Serialize;

/// Margins are inflated slightly so that float rounding in the bounding box
/// can never reject a station which the full projection would accept
const MARGIN_SLACK: f64 = 1.001;

/// A bounding box for geographical data. Contains the minimum and maximum
/// latitudes & longitudes, defining a 'rectangle' on the surface of the Earth
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BBox {
    /// Create the smallest bounding box which contains every one of the
    /// provided coordinates. Returns None if no coordinates are provided
    pub fn from_coords(coords: &[Coordinate]) -> Option<Self> {
        let first = coords.first()?;

        let mut bbox = BBox {
            min_lat: first.lat,
            min_lon: first.lon,
            max_lat: first.lat,
            max_lon: first.lon,
        };

        for coord in coords.iter().skip(1) {
            bbox.min_lat = bbox.min_lat.min(coord.lat);
            bbox.min_lon = bbox.min_lon.min(coord.lon);
            bbox.max_lat = bbox.max_lat.max(coord.lat);
            bbox.max_lon = bbox.max_lon.max(coord.lon);
        }

        Some(bbox)
    }

    /// Width of the box in degrees of longitude. Anything over 180 means the
    /// underlying route most likely crosses the antimeridian
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Grow the box by at least `margin_m` metres in every direction. The
    /// longitude margin is calculated at the most poleward latitude of the
    /// grown box, where a degree of longitude is shortest, so the result
    /// over-covers rather than under-covers. Boxes which get close to a pole
    /// are widened to cover every longitude.
    pub fn expand(&self, margin_m: f64) -> Self {
        let lat_margin =
            (margin_m / EARTH_RADIUS_M).to_degrees() * MARGIN_SLACK;

        let min_lat = (self.min_lat - lat_margin).max(-90.0);
        let max_lat = (self.max_lat + lat_margin).min(90.0);

        let poleward = min_lat.abs().max(max_lat.abs());
        let lon_scale = poleward.to_radians().cos();

        let (min_lon, max_lon) = if lon_scale <= 1e-6 {
            (-180.0, 180.0)
        } else {
            let lon_margin = (margin_m / (EARTH_RADIUS_M * lon_scale))
                .to_degrees()
                * MARGIN_SLACK;
            (
                (self.min_lon - lon_margin).max(-180.0),
                (self.max_lon + lon_margin).min(180.0),
            )
        };

        BBox {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Check whether the provided coordinate falls inside the box, edges
    /// included
    pub fn contains(&self, coord: &Coordinate) -> bool {
        coord.lat >= self.min_lat
            && coord.lat <= self.max_lat
            && coord.lon >= self.min_lon
            && coord.lon <= self.max_lon
    }
}
