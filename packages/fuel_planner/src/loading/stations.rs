//! The functions defined here read in the station records provided by the
//! station store, and collapse them into the catalog snapshot which is handed
//! to the planner

use std::collections::hash_map::Entry;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::debug;

use crate::common::station_data::{Coordinate, Station};
use crate::loading::LoadError;

/// Container for a single raw station record. The same truck stop is often
/// listed once per supply rack, so ids are not guaranteed to be unique
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StationRecord {
    #[serde(alias = "truckstop_id")]
    pub id: i64,
    #[serde(alias = "truckstop_name")]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, alias = "latitude")]
    pub lat: Option<f64>,
    #[serde(default, alias = "longitude")]
    pub lon: Option<f64>,
    #[serde(alias = "retail_price")]
    pub price: f64,
}

impl From<StationRecord> for Station {
    /// Unpack the raw record. A position is only attached if both halves are
    /// present and valid, anything else counts as not yet geocoded
    fn from(record: StationRecord) -> Station {
        let position = match (record.lat, record.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
        .filter(Coordinate::is_valid);

        Station {
            id: record.id,
            name: record.name,
            address: record.address,
            city: record.city,
            state: record.state,
            position,
            price: record.price,
        }
    }
}

/// Decide whether `new` should replace `cur` as the catalog entry for an id.
/// A valid price always beats an invalid one, then the cheaper price wins
fn is_preferred(new: &Station, cur: &Station) -> bool {
    match (new.has_valid_price(), cur.has_valid_price()) {
        (true, false) => true,
        (true, true) => new.price < cur.price,
        _ => false,
    }
}

/// Collapse the raw records into a catalog snapshot with one station per id,
/// ordered by id. Where an id is listed more than once, the cheapest valid
/// price is kept. If the kept record has no position but another listing of
/// the same station does, that position is carried over.
pub fn build_catalog(records: Vec<StationRecord>) -> Vec<Station> {
    let n_records = records.len();
    let mut by_id: FxHashMap<i64, Station> = FxHashMap::default();

    for station in records.into_iter().map(Station::from) {
        match by_id.entry(station.id) {
            Entry::Vacant(slot) => {
                slot.insert(station);
            }
            Entry::Occupied(mut slot) => {
                let cur = slot.get_mut();
                let position = cur.position.or(station.position);
                if is_preferred(&station, cur) {
                    *cur = station;
                }
                cur.position = cur.position.or(position);
            }
        }
    }

    let mut catalog: Vec<Station> = by_id.into_values().collect();
    catalog.sort_by_key(|station| station.id);

    debug!(
        records = n_records,
        stations = catalog.len(),
        "Built station catalog"
    );

    catalog
}

pub fn read_catalog(reader: impl Read) -> Result<Vec<Station>, LoadError> {
    let records: Vec<StationRecord> = serde_json::from_reader(reader)?;
    Ok(build_catalog(records))
}

pub fn read_catalog_file(
    path: impl AsRef<Path>,
) -> Result<Vec<Station>, LoadError> {
    let file = File::open(path)?;
    read_catalog(BufReader::new(file))
}
