//! Reads route geometry as handed over by a routing API. Two shapes are
//! accepted: a GeoJSON style list of `[lon, lat]` pairs, or a Google encoded
//! polyline string. Either may carry the total distance reported by the
//! routing API, which is checked against the length calculated here.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::common::station_data::Coordinate;
use crate::loading::LoadError;
use crate::planning::geometry::{Route, RoutePoint};

/// Relative difference between the reported and calculated route length
/// above which a warning is raised
const LENGTH_MISMATCH_TOLERANCE: f64 = 0.01;

fn default_precision() -> u32 {
    5
}

/// Route geometry exactly as it is received from the routing API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RouteInput {
    Coordinates {
        coordinates: Vec<[f64; 2]>,
        #[serde(default)]
        distance: Option<f64>,
    },
    Polyline {
        polyline: String,
        #[serde(default = "default_precision")]
        precision: u32,
        #[serde(default)]
        distance: Option<f64>,
    },
}

impl RouteInput {
    /// Unpack the raw input into an ordered list of route points, along with
    /// the distance reported for the route (in metres), if any
    pub fn into_points(
        self,
    ) -> Result<(Vec<RoutePoint>, Option<f64>), LoadError> {
        match self {
            RouteInput::Coordinates {
                coordinates,
                distance,
            } => {
                let points = coordinates
                    .into_iter()
                    .map(|[lon, lat]| Coordinate::new(lat, lon))
                    .collect();
                Ok((points, distance))
            }
            RouteInput::Polyline {
                polyline,
                precision,
                distance,
            } => Ok((decode_polyline(&polyline, precision)?, distance)),
        }
    }
}

/// Read a single signed value from an encoded polyline, advancing the
/// cursor past it
fn decode_value(bytes: &[u8], cursor: &mut usize) -> Result<i64, LoadError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let offset = *cursor;
        let byte = *bytes.get(offset).ok_or(LoadError::Polyline { offset })?;
        if !(63..=126).contains(&byte) || shift > 55 {
            return Err(LoadError::Polyline { offset });
        }

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        *cursor += 1;

        if chunk < 0x20 {
            break;
        }
    }

    if result & 1 == 1 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}

/// Decode a Google encoded polyline. Precision is the number of decimal
/// places the coordinates were encoded with: 5 for the original format, 6
/// for the variant used by OSRM and Valhalla
pub fn decode_polyline(
    encoded: &str,
    precision: u32,
) -> Result<Vec<Coordinate>, LoadError> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();

    let mut coords = Vec::new();
    let mut cursor = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while cursor < bytes.len() {
        let offset = cursor;
        lat = lat
            .checked_add(decode_value(bytes, &mut cursor)?)
            .ok_or(LoadError::Polyline { offset })?;

        let offset = cursor;
        lon = lon
            .checked_add(decode_value(bytes, &mut cursor)?)
            .ok_or(LoadError::Polyline { offset })?;

        coords.push(Coordinate::new(lat as f64 / factor, lon as f64 / factor));
    }

    Ok(coords)
}

/// Build a route from the raw input. The calculated length is always used
/// for planning, as it is consistent with the station projections, but a
/// large disagreement with the reported length is worth flagging
pub fn load_route(input: RouteInput) -> Result<Route, LoadError> {
    let (points, reported) = input.into_points()?;
    let route = Route::new(points)?;

    if let Some(reported_m) = reported.filter(|dist| *dist > 0.0) {
        let calculated_m = route.length_m();
        let mismatch = (calculated_m - reported_m).abs() / reported_m;
        if mismatch > LENGTH_MISMATCH_TOLERANCE {
            warn!(
                reported_m,
                calculated_m, "Reported route length disagrees with geometry"
            );
        }
    }

    debug!(
        points = route.points().len(),
        length_m = route.length_m(),
        "Loaded route"
    );

    Ok(route)
}

pub fn read_route(reader: impl Read) -> Result<Route, LoadError> {
    let input: RouteInput = serde_json::from_reader(reader)?;
    load_route(input)
}

pub fn read_route_file(path: impl AsRef<Path>) -> Result<Route, LoadError> {
    let file = File::open(path)?;
    read_route(BufReader::new(file))
}
