//! Defines the route geometry and the projection of arbitrary points onto
//! it. Every distance in this module is measured with the same metric: each
//! segment of the route is laid out in a local equirectangular frame anchored
//! at the segment's first point, and all lengths are Euclidean within that
//! frame. The cumulative distances and the station projections therefore
//! always agree with each other.

use geo::{Closest, ClosestPoint, Distance, Euclidean, Line, Point};

use crate::common::error::PlanError;
use crate::common::station_data::Coordinate;

pub const EARTH_RADIUS_M: f64 = 6_371_008.8;
pub const METERS_PER_MILE: f64 = 1_609.344;

/// A single vertex of the route polyline
pub type RoutePoint = Coordinate;

/// Bring a longitude difference back into the range -180..=180, so that
/// routes crossing the antimeridian do not produce enormous segments
fn wrap_lon_delta(delta: f64) -> f64 {
    if delta > 180.0 {
        delta - 360.0
    } else if delta < -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

/// Position of `target` in metres, in the tangent frame anchored at `origin`
fn to_local(origin: &Coordinate, target: &Coordinate) -> Point {
    let x = wrap_lon_delta(target.lon - origin.lon).to_radians()
        * EARTH_RADIUS_M
        * origin.lat.to_radians().cos();
    let y = (target.lat - origin.lat).to_radians() * EARTH_RADIUS_M;
    Point::new(x, y)
}

fn segment_length(start: &Coordinate, end: &Coordinate) -> f64 {
    Euclidean::distance(Point::new(0.0, 0.0), to_local(start, end))
}

/// The closest approach of a point to the route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Straight line distance from the point to the route, in metres
    pub detour_m: f64,
    /// Distance along the route to the closest point, in metres
    pub along_m: f64,
    /// Index of the segment containing the closest point
    pub segment: usize,
}

impl Projection {
    pub fn detour_miles(&self) -> f64 {
        self.detour_m / METERS_PER_MILE
    }

    pub fn mile_marker(&self) -> f64 {
        self.along_m / METERS_PER_MILE
    }
}

/// An immutable route polyline, along with the cumulative distance to each
/// of its points. `cumulative[i]` is the arc length from the first point to
/// point i, so the final entry is the total length of the route
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<RoutePoint>,
    cumulative: Vec<f64>,
}

impl Route {
    /// Build a route from an ordered list of points. The points are kept
    /// exactly as provided (no reordering or deduplication). Empty routes,
    /// and routes containing invalid coordinates, are rejected
    pub fn new(points: Vec<RoutePoint>) -> Result<Route, PlanError> {
        if points.is_empty() {
            return Err(PlanError::EmptyRoute);
        }
        let invalid = points.iter().position(|point| !point.is_valid());
        if let Some(index) = invalid {
            return Err(PlanError::MalformedRoute { index });
        }

        let mut cumulative = Vec::with_capacity(points.len());
        cumulative.push(0.0);
        let mut total = 0.0;
        for pair in points.windows(2) {
            total += segment_length(&pair[0], &pair[1]);
            cumulative.push(total);
        }

        Ok(Route { points, cumulative })
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Total arc length of the route in metres
    pub fn length_m(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn length_miles(&self) -> f64 {
        self.length_m() / METERS_PER_MILE
    }

    /// Find the closest point on the route to `target`. Each segment is
    /// checked in turn, with the projection clamped to the segment itself
    /// rather than the infinite line through it. Where two segments are
    /// equally close, the earlier one wins.
    pub fn project(&self, target: &Coordinate) -> Projection {
        let origin = Point::new(0.0, 0.0);

        // A single point route has no segments, fall back to the distance
        // from the only point
        let mut best = Projection {
            detour_m: Euclidean::distance(
                origin,
                to_local(&self.points[0], target),
            ),
            along_m: 0.0,
            segment: 0,
        };

        for (inx, pair) in self.points.windows(2).enumerate() {
            let seg_len = self.cumulative[inx + 1] - self.cumulative[inx];
            let (detour_m, offset_m) =
                project_onto_segment(&pair[0], &pair[1], target, seg_len);

            if inx == 0 || detour_m < best.detour_m {
                best = Projection {
                    detour_m,
                    along_m: self.cumulative[inx] + offset_m,
                    segment: inx,
                };
            }
        }

        best
    }
}

/// Determine the distance from `target` to the segment between `start` and
/// `end`, along with the distance from `start` to the closest point on the
/// segment. Zero length segments project everything onto their start point.
fn project_onto_segment(
    start: &Coordinate,
    end: &Coordinate,
    target: &Coordinate,
    seg_len: f64,
) -> (f64, f64) {
    let origin = Point::new(0.0, 0.0);
    let point = to_local(start, target);

    if seg_len <= 0.0 {
        return (Euclidean::distance(origin, point), 0.0);
    }

    let line = Line::new(origin, to_local(start, end));
    let closest = match line.closest_point(&point) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => p,
        Closest::Indeterminate => origin,
    };

    let offset = Euclidean::distance(origin, closest).min(seg_len);
    (Euclidean::distance(point, closest), offset)
}
