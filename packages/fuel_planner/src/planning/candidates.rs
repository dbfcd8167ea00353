//! Selects the stations from the catalog which sit close enough to the route
//! to be worth stopping at. Each selected station is projected onto the
//! route, giving the mile marker at which the driver would leave the route
//! and the detour needed to reach it.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::common::bbox::BBox;
use crate::common::config::PlanConfig;
use crate::common::station_data::Station;
use crate::planning::geometry::{METERS_PER_MILE, Route};
use crate::planning::structs::CandidateStop;

/// Generate the area which must contain every station within the detour
/// threshold of the route. Returns None when a bounding box cannot be
/// trusted, which is the case if the route (or its margin) touches the
/// antimeridian
fn get_search_box(route: &Route, threshold_m: f64) -> Option<BBox> {
    let route_box = BBox::from_coords(route.points())?;
    if route_box.lon_span() > 180.0 {
        return None;
    }

    let search_box = route_box.expand(threshold_m);
    if search_box.min_lon <= -180.0 || search_box.max_lon >= 180.0 {
        return None;
    }

    Some(search_box)
}

/// Project a single station onto the route, returning a CandidateStop if it
/// falls within the detour threshold. Stations without a position are
/// skipped silently, stations with an unusable position or price are
/// skipped with a warning
fn evaluate_station(
    route: &Route,
    station_inx: usize,
    station: &Station,
    search_box: Option<&BBox>,
    config: &PlanConfig,
) -> Option<CandidateStop> {
    let position = station.position?;

    // The search box is not always available to catch these
    if !position.is_valid() {
        warn!(
            station_id = station.id,
            "Skipping station with invalid position"
        );
        return None;
    }

    if let Some(bbox) = search_box {
        if !bbox.contains(&position) {
            return None;
        }
    }

    if !station.has_valid_price() {
        warn!(
            station_id = station.id,
            price = station.price,
            "Skipping station with invalid price"
        );
        return None;
    }

    let projection = route.project(&position);
    let detour_distance = projection.detour_miles();
    if detour_distance > config.max_detour_miles {
        return None;
    }

    Some(CandidateStop {
        station_inx,
        station_id: station.id,
        position,
        mile_marker: projection.mile_marker(),
        detour_distance,
        extra_fuel: 2.0 * detour_distance / config.mpg,
        price: station.price,
    })
}

/// Retrieve every station in the catalog which lies within the configured
/// detour threshold of the route, threshold included. The output is sorted
/// by mile marker, with ties broken by station ID, as this ordering is
/// relied upon when the refuel graph is built
pub fn select_candidates(
    route: &Route,
    catalog: &[Station],
    config: &PlanConfig,
) -> Vec<CandidateStop> {
    let threshold_m = config.max_detour_miles * METERS_PER_MILE;
    let search_box = get_search_box(route, threshold_m);

    let mut candidates: Vec<CandidateStop> = catalog
        .par_iter()
        .enumerate()
        .filter_map(|(inx, station)| {
            evaluate_station(route, inx, station, search_box.as_ref(), config)
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.mile_marker
            .total_cmp(&b.mile_marker)
            .then(a.station_id.cmp(&b.station_id))
            .then(a.station_inx.cmp(&b.station_inx))
    });

    debug!(
        catalog = catalog.len(),
        candidates = candidates.len(),
        prefiltered = search_box.is_some(),
        "Selected candidate stops"
    );

    candidates
}

#[cfg(test)]
mod tests {

    use approx::assert_relative_eq;

    use super::*;
    use crate::common::station_data::Coordinate;
    use crate::planning::geometry::EARTH_RADIUS_M;

    /// Miles covered by one degree of longitude at the equator
    fn miles_per_degree() -> f64 {
        EARTH_RADIUS_M * 1.0_f64.to_radians() / METERS_PER_MILE
    }

    /// Straight route along the equator, ten degrees long (~690 miles)
    fn get_test_route() -> Route {
        Route::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 5.0),
            Coordinate::new(0.0, 10.0),
        ])
        .unwrap()
    }

    fn get_test_station(id: i64, lat: f64, lon: f64, price: f64) -> Station {
        Station {
            id,
            name: format!("Station {id}"),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            position: Some(Coordinate::new(lat, lon)),
            price,
        }
    }

    /// Check that a station sitting off the route is given the right mile
    /// marker, detour and extra fuel
    #[test]
    fn test_candidate_values() {
        let route = get_test_route();
        let catalog = vec![get_test_station(1, 0.1, 2.0, 3.25)];
        let config = PlanConfig::default();

        let result = select_candidates(&route, &catalog, &config);

        assert_eq!(result.len(), 1);
        let candidate = &result[0];
        assert_eq!(candidate.station_inx, 0);
        assert_eq!(candidate.station_id, 1);
        assert_eq!(candidate.price, 3.25);
        assert_relative_eq!(
            candidate.mile_marker,
            2.0 * miles_per_degree(),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            candidate.detour_distance,
            0.1 * miles_per_degree(),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            candidate.extra_fuel,
            2.0 * candidate.detour_distance / config.mpg,
            epsilon = 1e-9
        );
    }

    /// Stations which haven't been geocoded are dropped without complaint
    #[test]
    fn test_missing_position_skipped() {
        let route = get_test_route();
        let mut station = get_test_station(1, 0.0, 1.0, 3.0);
        station.position = None;

        let result =
            select_candidates(&route, &[station], &PlanConfig::default());

        assert!(result.is_empty());
    }

    #[test]
    fn test_invalid_price_skipped() {
        let route = get_test_route();
        let catalog = vec![
            get_test_station(1, 0.0, 1.0, -2.0),
            get_test_station(2, 0.0, 2.0, f64::NAN),
            get_test_station(3, 0.0, 3.0, 3.0),
        ];

        let result =
            select_candidates(&route, &catalog, &PlanConfig::default());

        let ids: Vec<i64> = result.iter().map(|c| c.station_id).collect();
        assert_eq!(ids, vec![3]);
    }

    /// Output must be ordered by mile marker, then by station ID, regardless
    /// of the order of the catalog
    #[test]
    fn test_sorted_output() {
        let route = get_test_route();
        let catalog = vec![
            get_test_station(9, 0.0, 8.0, 3.0),
            get_test_station(5, 0.05, 3.0, 3.0),
            get_test_station(4, -0.05, 3.0, 3.0),
            get_test_station(1, 0.0, 6.0, 3.0),
        ];

        let result =
            select_candidates(&route, &catalog, &PlanConfig::default());

        let ids: Vec<i64> = result.iter().map(|c| c.station_id).collect();
        assert_eq!(ids, vec![4, 5, 1, 9]);
    }

    /// A station at exactly the threshold is kept, one mile further out and
    /// it is dropped
    #[test]
    fn test_threshold_inclusive() {
        let route = get_test_route();
        let catalog = vec![get_test_station(1, 0.2, 4.0, 3.0)];

        let detour = route
            .project(&Coordinate::new(0.2, 4.0))
            .detour_miles();

        let at_limit = PlanConfig {
            max_detour_miles: detour,
            ..PlanConfig::default()
        };
        let inside = select_candidates(&route, &catalog, &at_limit);
        assert_eq!(inside.len(), 1);

        let too_far = PlanConfig {
            max_detour_miles: detour - 1.0,
            ..PlanConfig::default()
        };
        let outside = select_candidates(&route, &catalog, &too_far);
        assert!(outside.is_empty());
    }

    /// Stations well away from the route are excluded, whether by the
    /// bounding box or by the projection
    #[test]
    fn test_distant_stations_excluded() {
        let route = get_test_route();
        let catalog = vec![
            get_test_station(1, 5.0, 5.0, 3.0),
            get_test_station(2, 0.0, 12.0, 3.0),
            get_test_station(3, 0.0, 10.2, 3.0),
        ];

        let result =
            select_candidates(&route, &catalog, &PlanConfig::default());

        let ids: Vec<i64> = result.iter().map(|c| c.station_id).collect();
        assert_eq!(ids, vec![3]);
    }

    /// Routes crossing the antimeridian fall back to projecting every
    /// station, rather than trusting a bounding box which wraps the globe
    #[test]
    fn test_antimeridian_route() {
        let route = Route::new(vec![
            Coordinate::new(0.0, 179.0),
            Coordinate::new(0.0, -179.0),
        ])
        .unwrap();
        let catalog = vec![get_test_station(1, 0.05, -179.9, 3.0)];

        assert!(get_search_box(&route, 1000.0).is_none());

        let result =
            select_candidates(&route, &catalog, &PlanConfig::default());

        assert_eq!(result.len(), 1);
        assert_relative_eq!(
            result[0].mile_marker,
            1.1 * miles_per_degree(),
            epsilon = 1e-6
        );
    }

    /// A position which cannot be projected is dropped, even when there is
    /// no bounding box to catch it
    #[test]
    fn test_invalid_position_skipped() {
        let route = Route::new(vec![
            Coordinate::new(0.0, 170.0),
            Coordinate::new(0.0, -170.0),
        ])
        .unwrap();
        let catalog = vec![
            get_test_station(1, f64::NAN, f64::NAN, 3.0),
            get_test_station(2, 0.0, 180.0, 3.0),
            get_test_station(3, 0.0, -175.0, 3.0),
        ];

        assert!(get_search_box(&route, 1000.0).is_none());

        let result =
            select_candidates(&route, &catalog, &PlanConfig::default());

        let ids: Vec<i64> = result.iter().map(|c| c.station_id).collect();
        assert_eq!(ids, vec![2, 3]);
        for candidate in result.iter() {
            assert!(candidate.mile_marker.is_finite());
            assert!(candidate.detour_distance.is_finite());
        }
    }

    #[test]
    fn test_empty_catalog() {
        let route = get_test_route();
        let result = select_candidates(&route, &[], &PlanConfig::default());
        assert!(result.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn station_near_route() -> impl Strategy<Value = (f64, f64, f64)> {
            (-0.5..=0.5, -0.5..=10.5, 2.5..=4.5)
        }

        proptest! {
            #[test]
            fn prop_sorted_and_within_threshold(
                stations in prop::collection::vec(station_near_route(), 0..40),
                max_detour in 0.0..=30.0
            ) {
                let route = get_test_route();
                let catalog: Vec<Station> = stations
                    .iter()
                    .enumerate()
                    .map(|(inx, (lat, lon, price))| {
                        get_test_station(inx as i64, *lat, *lon, *price)
                    })
                    .collect();
                let config = PlanConfig {
                    max_detour_miles: max_detour,
                    ..PlanConfig::default()
                };

                let result = select_candidates(&route, &catalog, &config);

                for pair in result.windows(2) {
                    prop_assert!(pair[0].mile_marker <= pair[1].mile_marker);
                }
                for candidate in result.iter() {
                    prop_assert!(candidate.detour_distance <= max_detour);
                }
            }

            /// The bounding box must never drop a station which the full
            /// projection would have kept
            #[test]
            fn prop_prefilter_is_conservative(
                lat in -0.5..=0.5,
                lon in -0.5..=10.5,
                max_detour in 0.0..=30.0
            ) {
                let route = get_test_route();
                let position = Coordinate::new(lat, lon);
                let detour = route.project(&position).detour_miles();
                let threshold_m = max_detour * METERS_PER_MILE;
                let search_box = get_search_box(&route, threshold_m).unwrap();

                if detour <= max_detour {
                    prop_assert!(search_box.contains(&position));
                }
            }
        }
    }
}
